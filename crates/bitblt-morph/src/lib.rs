//! bitblt-morph - Binary morphology for 1 bpp images
//!
//! This crate provides morphological operations built directly on the
//! raster operations in bitblt-core:
//!
//! - Structuring elements ([`Sel`]) with hit, miss, and don't-care
//!   positions
//! - Erosion, dilation, opening, and closing
//! - Hit-miss transform for pattern detection
//!
//! Every operation runs one full-image raster operation per
//! structuring element position, so cost scales with the number of
//! hits rather than with pixel-by-pixel neighborhood scans.

pub mod binary;
mod error;
pub mod sel;

pub use error::{MorphError, MorphResult};
pub use sel::{Sel, SelElement};

pub use binary::{
    check_binary, close, close_brick, dilate, dilate_brick, erode, erode_brick,
    hit_miss_transform, open, open_brick, subtract,
};
