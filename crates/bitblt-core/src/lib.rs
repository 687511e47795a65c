//! bitblt-core - Packed image container and raster operations
//!
//! This crate provides the fundamental pieces of the bitblt library:
//!
//! - [`Pix`] / [`PixMut`] - The packed image container (immutable / mutable)
//! - [`RopOp`] - The 16 Boolean raster operations
//! - [`PixColormap`] - Color palette for indexed images
//!
//! Images hold 1, 2, 4, 8, 16, or 32 bit pixels packed MSB-first into
//! 32-bit words, with every row starting on a word boundary. Raster
//! operations combine arbitrary rectangles of two images (or one, for
//! the destination-only ops) at any bit alignment, and the in-place
//! band shifts move pixels within a single image without a scratch
//! buffer.
//!
//! # Example
//!
//! ```
//! use bitblt_core::{Pix, PixelDepth, RopOp};
//!
//! let src = Pix::new(100, 100, PixelDepth::Bit1).unwrap();
//! let mut src = src.try_into_mut().unwrap();
//! src.set_region(10, 10, 50, 50);
//! let src: Pix = src.into();
//!
//! let dst = Pix::new(200, 100, PixelDepth::Bit1).unwrap();
//! let mut dst = dst.try_into_mut().unwrap();
//! dst.rasterop(80, 0, 100, 100, RopOp::PAINT, &src, 0, 0).unwrap();
//! let dst: Pix = dst.into();
//! assert_eq!(dst.get_pixel(90, 10), Some(1));
//! ```

pub mod colormap;
pub mod error;
pub mod pix;

pub use colormap::{PixColormap, RgbaQuad};
pub use error::{Error, Result};
pub use pix::{Pix, PixMut, PixelDepth, RopOp};
