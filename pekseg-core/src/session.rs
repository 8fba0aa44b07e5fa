use pekseg_data::{GlyphLookup, GlyphMap, Rgb, SegmentLayout};

use crate::{CoreError, DisplayMemory};

/// How a non-control byte is interpreted by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Bytes in the payload window select individual segments.
    Segment,
    /// Bytes are decoded as characters and resolved via the glyph map.
    Character,
}

/// How foreground segments are colorized during a render pass.
///
/// Independent of [`Mode`] and the cursor. Mutated by the dispatcher
/// (TOGGLE COLOR MODE) or by an external host console; only ever read by
/// the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Every foreground segment gets the same fixed color.
    Static(Rgb),
    /// Hue cycles per segment id and frame count.
    Rainbow,
    /// Cyclic three-entry palette indexed by id and frame count.
    Transition,
}

/// Outcome of dispatching one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchEvent {
    /// State may have changed; nothing for the host to do.
    None,
    /// The host should composite and present frames now.
    Render,
    /// The host should wait one pacing interval before feeding more bytes.
    Pace,
}

/// One display session: memory, cursor, mode, color mode, and frame counter
/// bundled into a single explicitly owned value.
///
/// The session is the sole owner of display memory. Bytes are processed
/// strictly in arrival order through [`dispatch`](Self::dispatch); the
/// compositor reads state through the accessors and never mutates it.
#[derive(Debug)]
pub struct DisplaySession<G = GlyphMap> {
    memory: DisplayMemory,
    cursor: usize,
    mode: Mode,
    color_mode: ColorMode,
    default_color: Rgb,
    frame_count: u64,
    layout: SegmentLayout,
    glyph_map: G,
}

impl<G: GlyphLookup> DisplaySession<G> {
    /// Creates a session with an empty grid, cursor at slot 0, segment
    /// mode, and a static color mode using `initial_color`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDimensions`] for a zero-sized grid.
    /// This is fatal to session start; there is no partial construction.
    pub fn new(
        cols: usize,
        rows: usize,
        layout: SegmentLayout,
        glyph_map: G,
        initial_color: Rgb,
    ) -> Result<Self, CoreError> {
        let memory = DisplayMemory::new(cols, rows)?;

        Ok(Self {
            memory,
            cursor: 0,
            mode: Mode::Segment,
            color_mode: ColorMode::Static(initial_color),
            default_color: initial_color,
            frame_count: 0,
            layout,
            glyph_map,
        })
    }

    pub fn memory(&self) -> &DisplayMemory {
        &self.memory
    }

    /// Current slot index; always within `[0, memory.len())`.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// External mutation path for hosts with a color console.
    pub fn set_color_mode(&mut self, color_mode: ColorMode) {
        if let ColorMode::Static(color) = color_mode {
            self.default_color = color;
        }
        self.color_mode = color_mode;
    }

    /// Completed render cycles; the time basis for animated color modes.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn layout(&self) -> SegmentLayout {
        self.layout
    }

    pub(crate) fn memory_mut(&mut self) -> &mut DisplayMemory {
        &mut self.memory
    }

    pub(crate) fn glyph_map(&self) -> &G {
        &self.glyph_map
    }

    pub(crate) fn set_cursor(&mut self, cursor: usize) {
        debug_assert!(cursor < self.memory.len());
        self.cursor = cursor;
    }

    pub(crate) fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub(crate) fn bump_frame_count(&mut self) {
        self.frame_count += 1;
    }

    pub(crate) fn default_color(&self) -> Rgb {
        self.default_color
    }
}
