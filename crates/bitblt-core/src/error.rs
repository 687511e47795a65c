//! Error types for bitblt-core
//!
//! Provides a unified error type for all operations in the core crate.
//! Bad arguments are reported as typed errors rather than silent no-ops;
//! degenerate geometry (zero-area or fully clipped rectangles) is never
//! an error.

use thiserror::Error;

/// bitblt-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Invalid pixel depth
    #[error("invalid pixel depth: {0} bpp")]
    InvalidDepth(u32),

    /// Colormap not allowed for this depth
    #[error("colormap not allowed for depth {0} bpp")]
    ColormapNotAllowed(u32),

    /// Colormap is full
    #[error("colormap full: {0} entries")]
    ColormapFull(usize),

    /// Incompatible image sizes
    #[error("incompatible image sizes: {0}x{1} vs {2}x{3}")]
    IncompatibleSizes(u32, u32, u32, u32),

    /// Incompatible pixel depths
    #[error("incompatible pixel depths: {0} bpp vs {1} bpp")]
    IncompatibleDepths(u32, u32),

    /// Pixel coordinates out of bounds
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height} image")]
    PixelOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Raster operation not usable in this context
    ///
    /// Returned when a two-operand opcode is handed to the uni-operand
    /// entry point. Invalid opcodes themselves are unrepresentable.
    #[error("unsupported raster operation: {0}")]
    UnsupportedOp(String),

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for bitblt-core operations
pub type Result<T> = std::result::Result<T, Error>;
