//! Core data structures for the pekseg segmented glyph display.
//!
//! `pekseg-data` is the leaf crate of the workspace: pure data with no I/O.
//! It defines the segment id space ([`SegmentLayout`]), per-slot segment
//! membership ([`SegmentSet`]), the read-only sprite collection the
//! compositor draws from ([`SpriteStore`]), and the character-to-segments
//! capability interface ([`GlyphLookup`]).

mod color;
mod glyph_map;
mod segment;
mod sprite;

pub use color::Rgb;
pub use glyph_map::{GlyphLookup, GlyphMap};
pub use segment::{LayoutError, SegmentLayout, SegmentSet};
pub use sprite::{Sprite, SpriteError, SpriteStore};
