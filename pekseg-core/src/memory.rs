use pekseg_data::SegmentSet;

use crate::CoreError;

/// The display's slot grid: `cols * rows` segment sets, addressed by a
/// single row-major linear index.
///
/// Pure state. Index validity is the dispatcher's responsibility — its
/// modular cursor arithmetic keeps every index it hands us in range, so no
/// operation here can fail after construction. The grid is created once per
/// session and never resized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayMemory {
    cols: usize,
    rows: usize,
    slots: Vec<SegmentSet>,
}

impl DisplayMemory {
    /// Allocates an empty `cols * rows` grid.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDimensions`] if either dimension is zero.
    pub fn new(cols: usize, rows: usize) -> Result<Self, CoreError> {
        if cols == 0 || rows == 0 {
            return Err(CoreError::InvalidDimensions { cols, rows });
        }

        Ok(Self {
            cols,
            rows,
            slots: vec![SegmentSet::new(); cols * rows],
        })
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of slots; fixed for the session's lifetime.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Linear index for a `(col, row)` position.
    pub fn index_of(&self, col: usize, row: usize) -> usize {
        row * self.cols + col
    }

    pub fn slot(&self, index: usize) -> &SegmentSet {
        &self.slots[index]
    }

    /// Empties the segment set at `index`.
    pub fn clear_slot(&mut self, index: usize) {
        self.slots[index].clear();
    }

    /// Replaces a slot's segment set wholesale (character lookup path).
    pub fn set_slot(&mut self, index: usize, segments: SegmentSet) {
        self.slots[index] = segments;
    }

    /// Inserts one segment id into a slot. Idempotent.
    pub fn add_segment(&mut self, index: usize, id: u8) {
        self.slots[index].insert(id);
    }

    /// Empties every slot.
    pub fn clear_all(&mut self) {
        for slot in &mut self.slots {
            slot.clear();
        }
    }

    /// Copies the full slot state for a render pass.
    ///
    /// `SegmentSet` is a single `u64`, so this is a flat memcpy; the
    /// compositor works on the copy and never observes a half-mutated slot.
    pub fn snapshot(&self) -> Vec<SegmentSet> {
        self.slots.clone()
    }
}
