use pekseg_data::LayoutError;

/// Error categories for session construction.
///
/// These are the only caller-visible faults in the crate: once a session
/// exists, `dispatch` is total and infallible.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CoreError {
    /// Grid dimensions that produce an empty or undefined display.
    #[error("invalid display dimensions: {cols}x{rows}")]
    InvalidDimensions { cols: usize, rows: usize },

    /// A segment layout that cannot be represented.
    #[error(transparent)]
    InvalidLayout(#[from] LayoutError),
}
