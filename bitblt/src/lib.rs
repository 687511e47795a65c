//! bitblt - Bit-level raster operations for packed images
//!
//! # Overview
//!
//! bitblt moves and combines rectangles of packed pixel data at
//! arbitrary bit alignment:
//!
//! - The [`Pix`] / [`PixMut`] image container (1 to 32 bpp, MSB-first
//!   packing in 32-bit words)
//! - The 16 Boolean raster operations ([`RopOp`]) with clipping
//! - In-place horizontal and vertical band shifts
//! - Shear transformations built from batched strip moves
//! - Binary morphology built from shifted blits
//!
//! # Example
//!
//! ```
//! use bitblt::{Pix, PixelDepth, RopOp};
//! use bitblt::transform::{ShearFill, h_shear_center};
//!
//! let pix = Pix::new(120, 80, PixelDepth::Bit1).unwrap();
//! let mut pm = pix.try_into_mut().unwrap();
//! pm.set_region(20, 20, 60, 30);
//! let pix: Pix = pm.into();
//!
//! let sheared = h_shear_center(&pix, 0.2, ShearFill::White).unwrap();
//! assert_eq!(sheared.width(), 120);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use bitblt_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use bitblt_morph as morph;
pub use bitblt_transform as transform;
