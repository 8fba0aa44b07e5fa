#![forbid(unsafe_code)]

//! Host-agnostic protocol engine for the pekseg segmented glyph display.
//!
//! `pekseg-core` turns an incoming byte stream into display-memory
//! mutations. It owns the control-code state machine, the slot grid, and
//! the pacing configuration — all without any host I/O.
//!
//! # Primary responsibilities
//!
//! - **Display memory**: fixed grid of slots, each a set of active segments.
//! - **Dispatcher**: the byte-level control-code state machine.
//! - **Session**: one explicitly owned value bundling memory, cursor, mode,
//!   color mode, and frame counter.
//! - **Pacer**: the minimum inter-render interval ("baud" pacing).
//!
//! # Design principles
//!
//! - **No I/O**: the host feeds bytes and consumes [`DispatchEvent`]s.
//! - **Deterministic**: identical byte sequences always produce identical
//!   state.
//! - **Infallible dispatch**: malformed input is a defined no-op, never an
//!   error.

mod dispatcher;
mod error;
mod memory;
mod pacing;
mod session;

pub use dispatcher::control;
pub use error::CoreError;
pub use memory::DisplayMemory;
pub use pacing::Pacer;
pub use session::{ColorMode, DispatchEvent, DisplaySession, Mode};
