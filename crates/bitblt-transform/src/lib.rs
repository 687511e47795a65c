//! bitblt-transform - Geometric transformations built on raster operations
//!
//! This crate provides shear transformations:
//!
//! - Horizontal and vertical shear about an arbitrary invariant line
//! - Convenience functions for shearing about corners and centers
//! - In-place shear operating on strips within the image buffer
//!
//! All shears move whole strips of rows or columns with single raster
//! operations rather than touching individual pixels.

mod error;
pub mod shear;

pub use error::{TransformError, TransformResult};
pub use shear::{
    ShearFill, h_shear, h_shear_center, h_shear_corner, h_shear_ip, v_shear, v_shear_center,
    v_shear_corner, v_shear_ip,
};
