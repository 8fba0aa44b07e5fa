use pekseg_core::{ColorMode, DisplaySession};
use pekseg_data::{GlyphLookup, Rgb, SegmentLayout, SegmentSet, Sprite, SpriteStore};
use tracing::{debug, warn};

use crate::{color::segment_color, overlay, recolor};

/// One fully composited slot image, RGBA8 row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    slot: usize,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Frame {
    fn filled(slot: usize, width: u32, height: u32, background: Rgb) -> Self {
        let mut pixels = Vec::with_capacity((width * height) as usize * 4);
        for _ in 0..width * height {
            pixels.extend_from_slice(&[background.r, background.g, background.b, 0xFF]);
        }
        Self { slot, width, height, pixels }
    }

    /// Index of the slot this frame belongs to.
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixel data, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Returns the RGBA pixel at `(x, y)`. Caller must stay in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y * self.width + x) as usize * 4;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }

    pub(crate) fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = (y * self.width + x) as usize * 4;
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    /// Source-over blend of a straight-alpha pixel onto the opaque canvas.
    fn blend_pixel(&mut self, x: u32, y: u32, src: [u8; 4]) {
        let [sr, sg, sb, sa] = src.map(u32::from);
        if sa == 0 {
            return;
        }

        let i = (y * self.width + x) as usize * 4;
        let inv = 255 - sa;
        self.pixels[i] = ((sr * sa + u32::from(self.pixels[i]) * inv) / 255) as u8;
        self.pixels[i + 1] = ((sg * sa + u32::from(self.pixels[i + 1]) * inv) / 255) as u8;
        self.pixels[i + 2] = ((sb * sa + u32::from(self.pixels[i + 2]) * inv) / 255) as u8;
        // canvas stays opaque
    }
}

/// Composites display memory into one frame per slot.
///
/// The compositor is pure given its inputs: it snapshots slot state, color
/// mode, and frame count once per pass, then derives pixels from nothing
/// else. Rendering is total — a frame is produced for every slot even when
/// some segments have no sprite asset.
#[derive(Debug)]
pub struct Compositor {
    store: SpriteStore,
    layout: SegmentLayout,
    background: Rgb,
    background_band_alpha: u8,
    debug_overlay: bool,
}

impl Compositor {
    /// Opacity applied to the decorative background band, roughly 12%.
    pub const DEFAULT_BAND_ALPHA: u8 = 30;

    pub fn new(store: SpriteStore, layout: SegmentLayout) -> Self {
        Self {
            store,
            layout,
            background: Rgb::BLACK,
            background_band_alpha: Self::DEFAULT_BAND_ALPHA,
            debug_overlay: false,
        }
    }

    /// Sets the opaque canvas color behind every slot.
    pub fn background(mut self, background: Rgb) -> Self {
        self.background = background;
        self
    }

    /// Sets the fixed opacity used for background-band segments.
    pub fn background_band_alpha(mut self, alpha: u8) -> Self {
        self.background_band_alpha = alpha;
        self
    }

    /// Enables the per-slot debug label (slot index + active segments).
    pub fn debug_overlay(mut self, enabled: bool) -> Self {
        self.debug_overlay = enabled;
        self
    }

    /// Pixel dimensions of every produced frame.
    pub fn cell_size(&self) -> (u32, u32) {
        self.store.cell_size()
    }

    /// Composites one frame per slot from a consistent snapshot of the
    /// session.
    ///
    /// Slot state, color mode, and frame count are read once up front; a
    /// concurrent color-mode change lands wholly in the next pass, never
    /// mid-frame.
    pub fn render<G: GlyphLookup>(&self, session: &DisplaySession<G>) -> Vec<Frame> {
        let slots = session.memory().snapshot();
        let color_mode = session.color_mode();
        let frame_count = session.frame_count();

        debug!(
            slots = slots.len(),
            frame_count,
            color_mode = ?color_mode,
            "compositing render pass"
        );

        slots
            .iter()
            .enumerate()
            .map(|(slot, segments)| self.render_slot(slot, segments, color_mode, frame_count))
            .collect()
    }

    fn render_slot(
        &self,
        slot: usize,
        segments: &SegmentSet,
        color_mode: ColorMode,
        frame_count: u64,
    ) -> Frame {
        let (width, height) = self.store.cell_size();
        let mut frame = Frame::filled(slot, width, height, self.background);

        // decorative band first, faint, ascending id
        for id in segments.iter().filter(|&id| self.layout.is_background(id)) {
            let Some(sprite) = self.lookup_sprite(id, slot) else { continue };
            self.composite_faint(&mut frame, sprite);
        }

        // glyph strokes on top, recolored, full opacity, ascending id
        for id in segments.iter().filter(|&id| self.layout.is_foreground(id)) {
            let Some(sprite) = self.lookup_sprite(id, slot) else { continue };
            let target = segment_color(id, frame_count, color_mode);
            Self::composite_recolored(&mut frame, sprite, target);
        }

        if self.debug_overlay {
            overlay::draw_label(&mut frame, slot, segments);
        }

        frame
    }

    fn lookup_sprite(&self, id: u8, slot: usize) -> Option<&Sprite> {
        let sprite = self.store.sprite(id);
        if sprite.is_none() {
            warn!(segment = id, slot, "missing sprite asset, segment skipped");
        }
        sprite
    }

    fn composite_faint(&self, frame: &mut Frame, sprite: &Sprite) {
        let band_alpha = u32::from(self.background_band_alpha);
        for y in 0..sprite.height() {
            for x in 0..sprite.width() {
                let [r, g, b, a] = sprite.pixel(x, y);
                let scaled = (u32::from(a) * band_alpha / 255) as u8;
                frame.blend_pixel(x, y, [r, g, b, scaled]);
            }
        }
    }

    fn composite_recolored(frame: &mut Frame, sprite: &Sprite, target: Rgb) {
        for y in 0..sprite.height() {
            for x in 0..sprite.width() {
                let src = recolor(sprite.pixel(x, y), target);
                frame.blend_pixel(x, y, src);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pekseg_core::{DisplaySession, control};
    use pekseg_data::{GlyphMap, SegmentLayout, Sprite, SpriteStore};

    use super::*;

    // 4 segments: ids 0..3 foreground, id 3 background.
    fn layout() -> SegmentLayout {
        SegmentLayout::new(4, 3).unwrap()
    }

    fn solid_sprite(rgba: [u8; 4]) -> Sprite {
        Sprite::new(2, 2, rgba.repeat(4)).unwrap()
    }

    fn store() -> SpriteStore {
        SpriteStore::new(
            layout(),
            vec![
                Some(solid_sprite([255, 255, 255, 255])),
                Some(solid_sprite([255, 255, 255, 255])),
                None, // deliberately missing asset
                Some(solid_sprite([255, 255, 255, 255])),
            ],
        )
        .unwrap()
    }

    fn session(cols: usize, rows: usize) -> DisplaySession {
        DisplaySession::new(cols, rows, layout(), GlyphMap::empty(), Rgb::WHITE).unwrap()
    }

    #[test]
    fn one_frame_per_slot() {
        let mut s = session(12, 9);
        s.dispatch(0x21);
        s.dispatch(control::END_OF_UNIT);

        let frames = Compositor::new(store(), layout()).render(&s);
        assert_eq!(frames.len(), 108);

        // slot 0 carries the lit segment, everything else is bare canvas
        assert_eq!(frames[0].pixel(0, 0), [255, 255, 255, 255]);
        for frame in &frames[1..] {
            assert_eq!(frame.pixel(0, 0), [0, 0, 0, 255]);
        }
    }

    #[test]
    fn rendering_twice_is_bit_identical() {
        let mut s = session(3, 2);
        s.dispatch(0x21);
        s.dispatch(0x22);
        s.dispatch(control::END_OF_UNIT);

        let compositor = Compositor::new(store(), layout());
        assert_eq!(compositor.render(&s), compositor.render(&s));
    }

    #[test]
    fn static_color_is_uniform_across_ids_and_slots() {
        let mut s = session(2, 1);
        s.set_color_mode(ColorMode::Static(Rgb::new(90, 40, 250)));
        s.dispatch(0x21);
        s.dispatch(control::NEXT_SLOT);
        s.dispatch(0x22);

        let frames = Compositor::new(store(), layout()).render(&s);
        assert_eq!(frames[0].pixel(1, 1), [90, 40, 250, 255]);
        assert_eq!(frames[1].pixel(1, 1), [90, 40, 250, 255]);
    }

    #[test]
    fn background_band_renders_faint() {
        let mut s = session(1, 1);
        s.dispatch(0x21 + 3); // background-band segment

        let frames = Compositor::new(store(), layout()).render(&s);
        // white at alpha 30 over black: 255 * 30 / 255 = 30
        assert_eq!(frames[0].pixel(0, 0), [30, 30, 30, 255]);
        assert_eq!(Compositor::DEFAULT_BAND_ALPHA, 30);
    }

    #[test]
    fn missing_sprite_is_skipped_not_fatal() {
        let mut s = session(1, 1);
        s.dispatch(0x21 + 2); // foreground id without an asset
        s.dispatch(0x21); // and one with

        let frames = Compositor::new(store(), layout()).render(&s);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].pixel(0, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn frame_count_drives_animated_modes() {
        let mut s = session(1, 1);
        s.set_color_mode(ColorMode::Transition);
        s.dispatch(0x21);

        let compositor = Compositor::new(store(), layout());
        let before = compositor.render(&s);
        s.dispatch(control::END_OF_UNIT);
        let after = compositor.render(&s);

        assert_ne!(before[0].pixel(0, 0), after[0].pixel(0, 0));
    }

    #[test]
    fn custom_background_fills_empty_slots() {
        let s = session(1, 1);
        let frames = Compositor::new(store(), layout())
            .background(Rgb::new(5, 6, 7))
            .render(&s);
        assert_eq!(frames[0].pixel(1, 1), [5, 6, 7, 255]);
    }
}
