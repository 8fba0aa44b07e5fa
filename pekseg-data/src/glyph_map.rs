use std::collections::HashMap;

use tracing::warn;

use crate::SegmentLayout;

/// Capability interface for character-to-segments lookup.
///
/// The protocol dispatcher only needs a single total-or-empty lookup; any
/// concrete mapping structure can back it. An unmapped character is not an
/// error, it is a defined no-op at the protocol layer.
pub trait GlyphLookup {
    /// Returns the segment ids that render `ch`, or `None` if unmapped.
    fn segments(&self, ch: char) -> Option<&[u8]>;
}

/// Glyph map backed by a `HashMap`, the standard [`GlyphLookup`] backend.
///
/// Entries are validated against a [`SegmentLayout`] on insertion:
/// out-of-range segment ids are dropped with a warning rather than stored,
/// so the dispatcher never writes an invalid id into display memory.
#[derive(Debug, Clone, Default)]
pub struct GlyphMap {
    entries: HashMap<char, Vec<u8>>,
}

impl GlyphMap {
    /// A map with no entries; character-mode bytes become no-ops.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a map from `(char, segment ids)` pairs, filtering ids that do
    /// not fit `layout`.
    pub fn from_entries<I>(layout: SegmentLayout, entries: I) -> Self
    where
        I: IntoIterator<Item = (char, Vec<u8>)>,
    {
        let mut map = HashMap::new();
        for (ch, ids) in entries {
            let (valid, invalid): (Vec<u8>, Vec<u8>) =
                ids.into_iter().partition(|&id| layout.contains(id));

            if !invalid.is_empty() {
                warn!(
                    glyph = %ch,
                    dropped = ?invalid,
                    "glyph map entry references segments outside the layout"
                );
            }

            map.insert(ch, valid);
        }

        Self { entries: map }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GlyphLookup for GlyphMap {
    fn segments(&self, ch: char) -> Option<&[u8]> {
        self.entries.get(&ch).map(Vec::as_slice)
    }
}
