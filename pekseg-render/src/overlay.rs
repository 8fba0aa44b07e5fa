//! Per-frame debug label: slot index digits plus one tick per active
//! segment. A presentation aid for verifying dispatcher state visually;
//! never enabled by default.

use pekseg_data::SegmentSet;

use crate::compositor::Frame;

const LABEL_COLOR: [u8; 4] = [0xFF, 0x00, 0xFF, 0xFF];

/// 3x5 digit glyphs, one row per byte, low three bits used.
#[rustfmt::skip]
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b010, 0b110, 0b010, 0b010, 0b111], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b111, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b001, 0b001, 0b001], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
];

/// Draws the slot index at the top-left corner and a tick mark along the
/// bottom edge for every active segment, in ascending id order.
///
/// Pixels outside the frame are clipped, so tiny frames are safe.
pub(crate) fn draw_label(frame: &mut Frame, slot: usize, segments: &SegmentSet) {
    let mut x = 1;
    for ch in slot.to_string().bytes() {
        draw_digit(frame, usize::from(ch - b'0'), x, 1);
        x += 4;
    }

    let bottom = frame.height().saturating_sub(1);
    for (i, _) in segments.iter().enumerate() {
        let tick_x = 1 + 2 * i as u32;
        put_clipped(frame, tick_x, bottom, LABEL_COLOR);
        put_clipped(frame, tick_x, bottom.saturating_sub(1), LABEL_COLOR);
    }
}

fn draw_digit(frame: &mut Frame, digit: usize, origin_x: u32, origin_y: u32) {
    for (dy, row) in DIGITS[digit].iter().enumerate() {
        for dx in 0..3u32 {
            if row & (0b100 >> dx) != 0 {
                put_clipped(frame, origin_x + dx, origin_y + dy as u32, LABEL_COLOR);
            }
        }
    }
}

fn put_clipped(frame: &mut Frame, x: u32, y: u32, rgba: [u8; 4]) {
    if x < frame.width() && y < frame.height() {
        frame.put_pixel(x, y, rgba);
    }
}

#[cfg(test)]
mod tests {
    use pekseg_core::DisplaySession;
    use pekseg_data::{GlyphMap, Rgb, SegmentLayout, Sprite, SpriteStore};

    use crate::Compositor;

    fn compositor(debug: bool) -> Compositor {
        let layout = SegmentLayout::new(2, 2).unwrap();
        let sprite = Sprite::new(16, 16, [255u8; 4].repeat(256)).unwrap();
        let store = SpriteStore::new(layout, vec![Some(sprite.clone()), Some(sprite)]).unwrap();
        Compositor::new(store, layout).debug_overlay(debug)
    }

    fn session() -> DisplaySession {
        let layout = SegmentLayout::new(2, 2).unwrap();
        DisplaySession::new(2, 1, layout, GlyphMap::empty(), Rgb::WHITE).unwrap()
    }

    #[test]
    fn overlay_marks_the_frame() {
        let s = session();
        let plain = compositor(false).render(&s);
        let labeled = compositor(true).render(&s);

        assert_ne!(plain[0].pixels(), labeled[0].pixels());
        // slot 0 draws the '0' digit at the label origin
        assert_eq!(labeled[0].pixel(1, 1), [0xFF, 0x00, 0xFF, 0xFF]);
    }

    #[test]
    fn overlay_is_deterministic() {
        let mut s = session();
        s.dispatch(0x21);
        let c = compositor(true);
        assert_eq!(c.render(&s), c.render(&s));
    }

    #[test]
    fn ticks_reflect_active_segment_count() {
        let mut s = session();
        s.dispatch(0x21);
        s.dispatch(0x22);

        let frames = compositor(true).render(&s);
        let bottom = frames[0].height() - 1;
        assert_eq!(frames[0].pixel(1, bottom), [0xFF, 0x00, 0xFF, 0xFF]);
        assert_eq!(frames[0].pixel(3, bottom), [0xFF, 0x00, 0xFF, 0xFF]);
    }
}
