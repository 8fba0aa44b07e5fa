/// Describes the segment id space of a display.
///
/// Segment ids live in `[0, count)`. The id space is partitioned into two
/// bands with different rendering roles:
///
/// - `[0, foreground_split)`: *foreground* segments — the strokes of a
///   glyph, dynamically colorized per render pass.
/// - `[foreground_split, count)`: *background* segments — fixed decorative
///   content (frames, decimal points) composited faintly.
///
/// The deployed displays use 39 or 47 segments with the split at 39.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentLayout {
    count: u8,
    foreground_split: u8,
}

impl SegmentLayout {
    /// Largest representable segment count; bounded by the `u64` bitmask
    /// backing [`SegmentSet`].
    pub const MAX_SEGMENTS: u8 = 64;

    /// Creates a layout after validating band boundaries.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if `count` is zero or exceeds
    /// [`MAX_SEGMENTS`](Self::MAX_SEGMENTS), or if `foreground_split > count`.
    pub fn new(count: u8, foreground_split: u8) -> Result<Self, LayoutError> {
        if count == 0 || count > Self::MAX_SEGMENTS {
            return Err(LayoutError::InvalidCount { count });
        }
        if foreground_split > count {
            return Err(LayoutError::InvalidSplit { foreground_split, count });
        }

        Ok(Self { count, foreground_split })
    }

    /// Number of segment ids in this layout.
    pub fn count(&self) -> u8 {
        self.count
    }

    /// First background segment id; ids below this are foreground.
    pub fn foreground_split(&self) -> u8 {
        self.foreground_split
    }

    /// Returns true if `id` is a valid segment id for this layout.
    pub fn contains(&self, id: u8) -> bool {
        id < self.count
    }

    /// Returns true if `id` belongs to the dynamically colorized band.
    pub fn is_foreground(&self, id: u8) -> bool {
        id < self.foreground_split
    }

    /// Returns true if `id` belongs to the faint decorative band.
    pub fn is_background(&self, id: u8) -> bool {
        id >= self.foreground_split && id < self.count
    }
}

impl Default for SegmentLayout {
    /// The 47-segment layout with the foreground/background split at 39.
    fn default() -> Self {
        Self { count: 47, foreground_split: 39 }
    }
}

/// Segment layout validation errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("segment count {count} outside 1..={}", SegmentLayout::MAX_SEGMENTS)]
    InvalidCount { count: u8 },

    #[error("foreground split {foreground_split} exceeds segment count {count}")]
    InvalidSplit { foreground_split: u8, count: u8 },
}

/// The set of active segment ids in one display slot.
///
/// Backed by a `u64` bitmask; [`SegmentLayout`] guarantees ids stay below
/// 64. Iteration order is ascending id, which is also the compositor's
/// draw order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentSet {
    bits: u64,
}

impl SegmentSet {
    /// Creates an empty set.
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Inserts a segment id. Inserting a present id is a no-op.
    pub fn insert(&mut self, id: u8) {
        debug_assert!(id < SegmentLayout::MAX_SEGMENTS);
        self.bits |= 1 << id;
    }

    /// Removes a segment id if present. Ids outside the representable
    /// range are ignored.
    pub fn remove(&mut self, id: u8) {
        if id < SegmentLayout::MAX_SEGMENTS {
            self.bits &= !(1 << id);
        }
    }

    /// Empties the set.
    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn contains(&self, id: u8) -> bool {
        id < SegmentLayout::MAX_SEGMENTS && self.bits & (1 << id) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Iterates active segment ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        let bits = self.bits;
        (0..SegmentLayout::MAX_SEGMENTS).filter(move |id| bits & (1 << id) != 0)
    }
}

impl FromIterator<u8> for SegmentSet {
    fn from_iter<T: IntoIterator<Item = u8>>(iter: T) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_rejects_zero_and_oversized_counts() {
        assert_eq!(
            SegmentLayout::new(0, 0),
            Err(LayoutError::InvalidCount { count: 0 })
        );
        assert_eq!(
            SegmentLayout::new(65, 0),
            Err(LayoutError::InvalidCount { count: 65 })
        );
    }

    #[test]
    fn layout_rejects_split_past_count() {
        assert_eq!(
            SegmentLayout::new(39, 40),
            Err(LayoutError::InvalidSplit { foreground_split: 40, count: 39 })
        );
    }

    #[test]
    fn layout_band_membership() {
        let layout = SegmentLayout::default();
        assert!(layout.is_foreground(0));
        assert!(layout.is_foreground(38));
        assert!(layout.is_background(39));
        assert!(layout.is_background(46));
        assert!(!layout.contains(47));
        assert!(!layout.is_background(47));
    }

    #[test]
    fn insert_is_idempotent() {
        let mut set = SegmentSet::new();
        set.insert(7);
        set.insert(7);
        assert_eq!(set.len(), 1);
        assert!(set.contains(7));
    }

    #[test]
    fn iteration_is_ascending() {
        let set: SegmentSet = [40, 3, 12, 0].into_iter().collect();
        let ids: Vec<u8> = set.iter().collect();
        assert_eq!(ids, vec![0, 3, 12, 40]);
    }

    #[test]
    fn remove_tolerates_out_of_range_ids() {
        let mut set: SegmentSet = [5].into_iter().collect();
        set.remove(64);
        set.remove(255);
        set.remove(5);
        assert!(set.is_empty());
    }

    #[test]
    fn clear_empties_set() {
        let mut set: SegmentSet = [1, 2, 3].into_iter().collect();
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }
}
