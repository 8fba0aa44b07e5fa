#![forbid(unsafe_code)]

//! Render compositor for the pekseg segmented glyph display.
//!
//! Reads a [`DisplaySession`](pekseg_core::DisplaySession) snapshot plus a
//! [`SpriteStore`](pekseg_data::SpriteStore) and produces one RGBA frame
//! per slot: background canvas, faint decorative band, then recolored glyph
//! strokes in ascending segment order. Deterministic given its inputs,
//! which is what makes golden-frame testing possible.

mod color;
mod compositor;
mod overlay;

pub use color::{TRANSITION_PALETTE, recolor, segment_color};
pub use compositor::{Compositor, Frame};
