//! Error types for the `hamlet-world` crate.

/// Errors that can occur while building or editing a tile grid.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A grid needs at least one row and one column.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A coordinate lies outside the grid.
    #[error("({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        /// Column that was addressed.
        x: i32,
        /// Row that was addressed.
        y: i32,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },

    /// Arithmetic overflow while sizing the grid.
    #[error("arithmetic overflow in grid calculation")]
    ArithmeticOverflow,
}
