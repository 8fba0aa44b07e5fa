use pekseg_data::{GlyphLookup, SegmentSet};
use tracing::{debug, trace};

use crate::{ColorMode, DispatchEvent, DisplaySession, Mode};

use self::control::PAYLOAD_BASE;

/// The wire protocol's control bytes.
///
/// Every byte below `PAYLOAD_BASE` that is not listed here is ignored.
pub mod control {
    /// Move the cursor to slot 0.
    pub const START: u8 = 0x01;
    /// Switch to character mode.
    pub const CHAR_MODE: u8 = 0x02;
    /// End of unit: bump the frame counter and request a render.
    pub const END_OF_UNIT: u8 = 0x03;
    /// Request a render without advancing the frame counter.
    pub const FLUSH: u8 = 0x04;
    /// Switch to segment mode unconditionally.
    pub const SEG_MODE: u8 = 0x05;
    /// Empty the segment set of the current slot.
    pub const CLEAR_SLOT: u8 = 0x08;
    /// Ask the host to wait one pacing interval.
    pub const PACE: u8 = 0x09;
    /// Advance the cursor by one slot, wrapping at the end of the grid.
    pub const NEXT_SLOT: u8 = 0x0A;
    /// Move the cursor to slot 0.
    pub const RESET_SLOT: u8 = 0x0D;
    /// Flip the color mode between static and rainbow.
    pub const TOGGLE_COLOR_MODE: u8 = 0x0F;
    /// Flip between segment and character mode.
    pub const TOGGLE_MODE: u8 = 0x1B;
    /// Empty every slot on the display.
    pub const CLEAR_ALL: u8 = 0x7F;

    /// First segment-select byte; segment id = byte - `PAYLOAD_BASE`.
    pub const PAYLOAD_BASE: u8 = 0x21;
}

impl<G: GlyphLookup> DisplaySession<G> {
    /// Decodes one byte against the current mode and cursor, mutates
    /// display memory, and tells the host what to do next.
    ///
    /// This function is total: malformed input (a segment-select byte
    /// outside the payload window, a character absent from the glyph map)
    /// is a defined no-op, never an error. Cursor arithmetic is modular, so
    /// the cursor invariant `0 <= cursor < len` holds across any byte
    /// sequence.
    pub fn dispatch(&mut self, byte: u8) -> DispatchEvent {
        match byte {
            control::START | control::RESET_SLOT => self.set_cursor(0),
            control::CHAR_MODE => self.set_mode(Mode::Character),
            control::SEG_MODE => self.set_mode(Mode::Segment),
            control::END_OF_UNIT => {
                self.bump_frame_count();
                return DispatchEvent::Render;
            },
            control::FLUSH => return DispatchEvent::Render,
            control::CLEAR_SLOT => {
                let cursor = self.cursor();
                self.memory_mut().clear_slot(cursor);
            },
            control::PACE => return DispatchEvent::Pace,
            control::NEXT_SLOT => self.advance_cursor(),
            control::TOGGLE_COLOR_MODE => self.toggle_color_mode(),
            control::TOGGLE_MODE => {
                let flipped = match self.mode() {
                    Mode::Segment => Mode::Character,
                    Mode::Character => Mode::Segment,
                };
                self.set_mode(flipped);
            },
            control::CLEAR_ALL => self.memory_mut().clear_all(),
            _ => match self.mode() {
                Mode::Segment => self.select_segment(byte),
                Mode::Character => self.select_character(byte),
            },
        }

        DispatchEvent::None
    }

    /// Segment-select: payload bytes map to ids `[0, count)`; the cursor
    /// does not auto-advance, so one slot accumulates consecutive selects.
    fn select_segment(&mut self, byte: u8) {
        let window = PAYLOAD_BASE..PAYLOAD_BASE.saturating_add(self.layout().count());
        if !window.contains(&byte) {
            trace!(byte, "segment-select byte outside payload window, ignored");
            return;
        }

        let id = byte - PAYLOAD_BASE;
        let cursor = self.cursor();
        self.memory_mut().add_segment(cursor, id);
        trace!(segment = id, slot = cursor, "segment activated");
    }

    /// Character-select: resolve via the glyph map, replace the slot's set
    /// wholesale, and advance. A character that is unmapped, or mapped to no
    /// segments at all, changes nothing — neither the slot nor the cursor.
    fn select_character(&mut self, byte: u8) {
        let ch = char::from(byte);
        let segments: SegmentSet = match self.glyph_map().segments(ch) {
            Some(ids) if !ids.is_empty() => ids.iter().copied().collect(),
            _ => {
                trace!(byte, glyph = %ch.escape_default(), "character without segments, ignored");
                return;
            },
        };

        let cursor = self.cursor();
        self.memory_mut().set_slot(cursor, segments);
        self.advance_cursor();
        trace!(glyph = %ch.escape_default(), slot = cursor, "character written");
    }

    fn advance_cursor(&mut self) {
        let next = (self.cursor() + 1) % self.memory().len();
        self.set_cursor(next);
    }

    /// Rainbow goes back to the static default color; anything else
    /// (static or transition) goes to rainbow.
    fn toggle_color_mode(&mut self) {
        let next = match self.color_mode() {
            ColorMode::Rainbow => ColorMode::Static(self.default_color()),
            ColorMode::Static(_) | ColorMode::Transition => ColorMode::Rainbow,
        };
        debug!(from = ?self.color_mode(), to = ?next, "color mode toggled");
        self.set_color_mode(next);
    }
}

#[cfg(test)]
mod tests {
    use pekseg_data::{GlyphMap, Rgb, SegmentLayout};

    use super::{control::*, *};

    fn session() -> DisplaySession {
        DisplaySession::new(
            12,
            9,
            SegmentLayout::default(),
            GlyphMap::empty(),
            Rgb::WHITE,
        )
        .unwrap()
    }

    fn session_with_map(entries: Vec<(char, Vec<u8>)>) -> DisplaySession {
        let layout = SegmentLayout::default();
        DisplaySession::new(12, 9, layout, GlyphMap::from_entries(layout, entries), Rgb::WHITE)
            .unwrap()
    }

    #[test]
    fn new_session_starts_at_slot_zero_in_segment_mode() {
        let s = session();
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.mode(), Mode::Segment);
        assert_eq!(s.color_mode(), ColorMode::Static(Rgb::WHITE));
        assert_eq!(s.frame_count(), 0);
    }

    #[test]
    fn next_slot_wraps_after_len_steps() {
        let mut s = session();
        s.dispatch(NEXT_SLOT);
        s.dispatch(NEXT_SLOT);
        s.dispatch(NEXT_SLOT);
        assert_eq!(s.cursor(), 3);

        for _ in 3..s.memory().len() {
            s.dispatch(NEXT_SLOT);
        }
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn start_and_reset_slot_rewind_the_cursor() {
        for byte in [START, RESET_SLOT] {
            let mut s = session();
            s.dispatch(NEXT_SLOT);
            s.dispatch(NEXT_SLOT);
            assert_eq!(s.dispatch(byte), DispatchEvent::None);
            assert_eq!(s.cursor(), 0);
        }
    }

    #[test]
    fn segment_select_accumulates_without_advancing() {
        let mut s = session();
        s.dispatch(0x21);
        s.dispatch(0x22);

        assert_eq!(s.cursor(), 0);
        let slot = s.memory().slot(0);
        assert!(slot.contains(0));
        assert!(slot.contains(1));
        assert_eq!(slot.len(), 2);
    }

    #[test]
    fn out_of_window_bytes_are_ignored_in_segment_mode() {
        let mut s = session();
        // 0x20 is below the window; 0x21 + 47 is the first byte past it.
        s.dispatch(0x20);
        s.dispatch(0x21 + 47);

        assert!(s.memory().slot(0).is_empty());
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn last_payload_byte_maps_to_last_segment() {
        let mut s = session();
        s.dispatch(0x21 + 46);
        assert!(s.memory().slot(0).contains(46));
    }

    #[test]
    fn clear_slot_only_touches_the_cursor_slot() {
        let mut s = session();
        s.dispatch(0x21);
        s.dispatch(NEXT_SLOT);
        s.dispatch(0x22);
        s.dispatch(CLEAR_SLOT);

        assert!(s.memory().slot(1).is_empty());
        assert!(s.memory().slot(0).contains(0));
    }

    #[test]
    fn clear_all_empties_every_slot_regardless_of_state() {
        let mut s = session();
        for _ in 0..5 {
            s.dispatch(0x25);
            s.dispatch(NEXT_SLOT);
        }
        s.dispatch(CLEAR_ALL);

        let mem = s.memory();
        assert!((0..mem.len()).all(|i| mem.slot(i).is_empty()));
    }

    #[test]
    fn end_of_unit_renders_and_bumps_frame_count() {
        let mut s = session();
        assert_eq!(s.dispatch(END_OF_UNIT), DispatchEvent::Render);
        assert_eq!(s.frame_count(), 1);
    }

    #[test]
    fn flush_renders_without_bumping_frame_count() {
        let mut s = session();
        assert_eq!(s.dispatch(FLUSH), DispatchEvent::Render);
        assert_eq!(s.frame_count(), 0);
    }

    #[test]
    fn pace_byte_requests_pacing() {
        let mut s = session();
        assert_eq!(s.dispatch(PACE), DispatchEvent::Pace);
    }

    #[test]
    fn toggle_mode_flips_both_ways() {
        let mut s = session();
        s.dispatch(TOGGLE_MODE);
        assert_eq!(s.mode(), Mode::Character);
        s.dispatch(TOGGLE_MODE);
        assert_eq!(s.mode(), Mode::Segment);
    }

    #[test]
    fn explicit_mode_bytes_are_unconditional() {
        let mut s = session();
        s.dispatch(CHAR_MODE);
        s.dispatch(CHAR_MODE);
        assert_eq!(s.mode(), Mode::Character);
        s.dispatch(SEG_MODE);
        s.dispatch(SEG_MODE);
        assert_eq!(s.mode(), Mode::Segment);
    }

    #[test]
    fn toggle_color_mode_flips_static_and_rainbow() {
        let mut s = session();
        s.dispatch(TOGGLE_COLOR_MODE);
        assert_eq!(s.color_mode(), ColorMode::Rainbow);
        s.dispatch(TOGGLE_COLOR_MODE);
        assert_eq!(s.color_mode(), ColorMode::Static(Rgb::WHITE));
    }

    #[test]
    fn toggle_color_mode_leaves_transition_for_rainbow() {
        let mut s = session();
        s.set_color_mode(ColorMode::Transition);
        s.dispatch(TOGGLE_COLOR_MODE);
        assert_eq!(s.color_mode(), ColorMode::Rainbow);
    }

    #[test]
    fn toggle_color_mode_does_not_touch_dispatch_mode() {
        let mut s = session();
        s.dispatch(TOGGLE_COLOR_MODE);
        assert_eq!(s.mode(), Mode::Segment);
    }

    #[test]
    fn mapped_character_writes_slot_and_advances() {
        let mut s = session_with_map(vec![('A', vec![0, 1, 5])]);
        s.dispatch(CHAR_MODE);
        // Pre-existing segment is replaced, not merged.
        s.dispatch(SEG_MODE);
        s.dispatch(0x21 + 9);
        s.dispatch(CHAR_MODE);

        assert_eq!(s.dispatch(b'A'), DispatchEvent::None);
        let slot = s.memory().slot(0);
        assert!(slot.contains(0) && slot.contains(1) && slot.contains(5));
        assert!(!slot.contains(9));
        assert_eq!(s.cursor(), 1);
    }

    #[test]
    fn unmapped_character_changes_nothing() {
        let mut s = session_with_map(vec![('A', vec![0])]);
        s.dispatch(0x25);
        s.dispatch(CHAR_MODE);

        assert_eq!(s.dispatch(b'Z'), DispatchEvent::None);
        assert_eq!(s.cursor(), 0);
        assert!(s.memory().slot(0).contains(4));
        assert_eq!(s.memory().slot(0).len(), 1);
    }

    #[test]
    fn character_mapped_to_no_segments_changes_nothing() {
        // an authored-empty entry and one whose every id was filtered out
        let layout = SegmentLayout::new(8, 8).unwrap();
        let map = GlyphMap::from_entries(layout, vec![('A', vec![40, 50]), ('B', vec![])]);
        let mut s = DisplaySession::new(12, 9, layout, map, Rgb::WHITE).unwrap();

        s.dispatch(0x21);
        s.dispatch(CHAR_MODE);
        for byte in [b'A', b'B'] {
            assert_eq!(s.dispatch(byte), DispatchEvent::None);
            assert!(s.memory().slot(0).contains(0));
            assert_eq!(s.cursor(), 0);
        }
    }

    #[test]
    fn character_advance_wraps_at_end_of_grid() {
        let mut s = session_with_map(vec![('A', vec![0])]);
        s.dispatch(CHAR_MODE);
        for _ in 0..s.memory().len() {
            s.dispatch(b'A');
        }
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn payload_window_tracks_smaller_layouts() {
        let layout = SegmentLayout::new(39, 39).unwrap();
        let mut s =
            DisplaySession::new(4, 4, layout, GlyphMap::empty(), Rgb::WHITE).unwrap();

        s.dispatch(0x21 + 38);
        assert!(s.memory().slot(0).contains(38));

        s.dispatch(0x21 + 39);
        assert!(!s.memory().slot(0).contains(39));
    }
}
