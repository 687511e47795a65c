//! Shear transformations for images
//!
//! A shear skews an image along one axis, leaving one line invariant
//! and shifting every other row (or column) proportionally to its
//! distance from that line:
//!
//! - Horizontal shear about `y = yloc`: row `y` shifts by
//!   `tan(angle) * (yloc - y)` pixels
//! - Vertical shear about `x = xloc`: column `x` shifts by
//!   `tan(angle) * (x - xloc)` pixels
//!
//! Because the shift is rounded to whole pixels, consecutive rows
//! usually share the same shift. The implementation groups such rows
//! into strips and moves each strip with a single raster operation,
//! so the work per image is proportional to the number of distinct
//! shifts rather than the number of rows. Strip shifts are always
//! recomputed from the closed form, never accumulated.
//!
//! # Example
//!
//! ```
//! use bitblt_transform::{ShearFill, h_shear_center};
//! use bitblt_core::{Pix, PixelDepth};
//!
//! let pix = Pix::new(100, 100, PixelDepth::Bit8).unwrap();
//! let sheared = h_shear_center(&pix, 0.1, ShearFill::White).unwrap();
//! assert_eq!(sheared.width(), 100);
//! ```

use crate::TransformResult;
use bitblt_core::{Pix, PixMut, PixelDepth, RopOp};

/// Minimum difference from +-pi/2 for shear angles; closer angles
/// would require unbounded shifts and are clamped to this limit.
const MIN_DIFF_FROM_HALF_PI: f32 = 0.04;

/// Background fill color for pixels brought in from outside the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShearFill {
    /// Fill with white pixels
    #[default]
    White,
    /// Fill with black pixels
    Black,
}

impl ShearFill {
    /// Get the fill value for a specific pixel depth.
    ///
    /// For binary images 0 is white (foreground is black); for
    /// grayscale the maximum value is white; 32-bit white leaves the
    /// alpha byte at zero.
    pub fn to_value(self, depth: PixelDepth) -> u32 {
        match self {
            ShearFill::White => match depth {
                PixelDepth::Bit1 => 0,
                PixelDepth::Bit2 => 3,
                PixelDepth::Bit4 => 15,
                PixelDepth::Bit8 => 255,
                PixelDepth::Bit16 => 65535,
                PixelDepth::Bit32 => 0xFFFF_FF00,
            },
            ShearFill::Black => match depth {
                PixelDepth::Bit1 => 1,
                _ => 0,
            },
        }
    }
}

/// Bring the angle into `[-pi/2 + mindif, pi/2 - mindif]`.
///
/// Returns `None` if the angle is effectively zero, in which case the
/// shear degenerates to a copy.
fn normalize_angle_for_shear(mut radang: f32, mindif: f32) -> Option<f32> {
    let pi2 = std::f32::consts::FRAC_PI_2;

    if radang < -pi2 || radang > pi2 {
        radang -= (radang / pi2).trunc() * pi2;
    }
    if radang > pi2 - mindif {
        radang = pi2 - mindif;
    } else if radang < -pi2 + mindif {
        radang = -pi2 + mindif;
    }
    if radang.abs() < 1e-7 || radang.tan().abs() < 1e-7 {
        return None;
    }
    Some(radang)
}

/// Maximal runs of consecutive indices in `0..n` sharing one shift.
fn strip_runs(n: u32, mut shift_at: impl FnMut(u32) -> i32) -> Vec<(u32, u32, i32)> {
    let mut runs = Vec::new();
    let mut start = 0;
    while start < n {
        let shift = shift_at(start);
        let mut end = start + 1;
        while end < n && shift_at(end) == shift {
            end += 1;
        }
        runs.push((start, end - start, shift));
        start = end;
    }
    runs
}

/// Paint a clipped rectangle with an arbitrary pixel value.
fn fill_region(pix: &mut PixMut, x: i32, y: i32, w: i32, h: i32, val: u32) {
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + w).min(pix.width() as i32);
    let y1 = (y + h).min(pix.height() as i32);
    for yy in y0..y1 {
        for xx in x0..x1 {
            // In bounds after clipping
            let _ = pix.set_pixel(xx as u32, yy as u32, val);
        }
    }
}

/// Horizontal shear about an arbitrary horizontal line.
///
/// Pixels on the line `y = yloc` remain unchanged; for positive
/// angles, rows above it shift right and rows below shift left. The
/// invariant line may lie outside the image. A near-zero angle
/// returns a deep copy.
///
/// # Example
///
/// ```
/// use bitblt_transform::{ShearFill, h_shear};
/// use bitblt_core::{Pix, PixelDepth};
///
/// let pix = Pix::new(100, 100, PixelDepth::Bit1).unwrap();
/// let sheared = h_shear(&pix, 50, 0.1, ShearFill::White).unwrap();
/// ```
pub fn h_shear(pix: &Pix, yloc: i32, radang: f32, fill: ShearFill) -> TransformResult<Pix> {
    let Some(radang) = normalize_angle_for_shear(radang, MIN_DIFF_FROM_HALF_PI) else {
        return Ok(pix.deep_clone());
    };

    let w = pix.width() as i32;
    let h = pix.height();
    let tan_angle = radang.tan();

    // create_template carries the colormap across
    let mut out = pix.create_template().try_into_mut().unwrap();
    out.set_all_arbitrary(fill.to_value(pix.depth()));

    let row_shift = |y: u32| ((yloc - y as i32) as f32 * tan_angle).round() as i32;
    for (y0, nrows, shift) in strip_runs(h, row_shift) {
        out.rasterop(shift, y0 as i32, w, nrows as i32, RopOp::Src, pix, 0, y0 as i32)?;
    }
    Ok(out.into())
}

/// Horizontal shear about the upper edge (y = 0).
pub fn h_shear_corner(pix: &Pix, radang: f32, fill: ShearFill) -> TransformResult<Pix> {
    h_shear(pix, 0, radang, fill)
}

/// Horizontal shear about the center line (y = height / 2).
pub fn h_shear_center(pix: &Pix, radang: f32, fill: ShearFill) -> TransformResult<Pix> {
    h_shear(pix, (pix.height() / 2) as i32, radang, fill)
}

/// Vertical shear about an arbitrary vertical line.
///
/// Pixels on the line `x = xloc` remain unchanged; for positive
/// angles, columns right of it shift down and columns left shift up.
pub fn v_shear(pix: &Pix, xloc: i32, radang: f32, fill: ShearFill) -> TransformResult<Pix> {
    let Some(radang) = normalize_angle_for_shear(radang, MIN_DIFF_FROM_HALF_PI) else {
        return Ok(pix.deep_clone());
    };

    let w = pix.width();
    let h = pix.height() as i32;
    let tan_angle = radang.tan();

    let mut out = pix.create_template().try_into_mut().unwrap();
    out.set_all_arbitrary(fill.to_value(pix.depth()));

    let col_shift = |x: u32| ((x as i32 - xloc) as f32 * tan_angle).round() as i32;
    for (x0, ncols, shift) in strip_runs(w, col_shift) {
        out.rasterop(x0 as i32, shift, ncols as i32, h, RopOp::Src, pix, x0 as i32, 0)?;
    }
    Ok(out.into())
}

/// Vertical shear about the left edge (x = 0).
pub fn v_shear_corner(pix: &Pix, radang: f32, fill: ShearFill) -> TransformResult<Pix> {
    v_shear(pix, 0, radang, fill)
}

/// Vertical shear about the center line (x = width / 2).
pub fn v_shear_center(pix: &Pix, radang: f32, fill: ShearFill) -> TransformResult<Pix> {
    v_shear(pix, (pix.width() / 2) as i32, radang, fill)
}

/// In-place horizontal shear.
///
/// Each strip of rows is shifted within the image buffer; no second
/// image is allocated for the common case. Colormapped images cannot
/// be refilled at the bit level (the fill would be a meaningless
/// palette index), so they are sheared through a snapshot copy and
/// the result written back.
pub fn h_shear_ip(
    pix: &mut PixMut,
    yloc: i32,
    radang: f32,
    fill: ShearFill,
) -> TransformResult<()> {
    let Some(radang) = normalize_angle_for_shear(radang, MIN_DIFF_FROM_HALF_PI) else {
        return Ok(());
    };

    let w = pix.width() as i32;
    let h = pix.height();

    if pix.has_colormap() {
        let sheared = h_shear(&pix.snapshot(), yloc, radang, fill)?;
        pix.rasterop(0, 0, w, h as i32, RopOp::Src, &sheared, 0, 0)?;
        return Ok(());
    }

    let tan_angle = radang.tan();
    let fill_value = fill.to_value(pix.depth());

    let row_shift = |y: u32| ((yloc - y as i32) as f32 * tan_angle).round() as i32;
    for (y0, nrows, shift) in strip_runs(h, row_shift) {
        pix.rasterop_hip(y0 as i32, nrows as i32, shift);
        // The band shift zero-fills the vacated span; repaint it when
        // the fill color is not all-zero bits.
        if fill_value != 0 {
            if shift > 0 {
                fill_region(pix, 0, y0 as i32, shift, nrows as i32, fill_value);
            } else if shift < 0 {
                fill_region(pix, w + shift, y0 as i32, -shift, nrows as i32, fill_value);
            }
        }
    }
    Ok(())
}

/// In-place vertical shear.
///
/// The column-band analogue of [`h_shear_ip`].
pub fn v_shear_ip(
    pix: &mut PixMut,
    xloc: i32,
    radang: f32,
    fill: ShearFill,
) -> TransformResult<()> {
    let Some(radang) = normalize_angle_for_shear(radang, MIN_DIFF_FROM_HALF_PI) else {
        return Ok(());
    };

    let w = pix.width();
    let h = pix.height() as i32;

    if pix.has_colormap() {
        let sheared = v_shear(&pix.snapshot(), xloc, radang, fill)?;
        pix.rasterop(0, 0, w as i32, h, RopOp::Src, &sheared, 0, 0)?;
        return Ok(());
    }

    let tan_angle = radang.tan();
    let fill_value = fill.to_value(pix.depth());

    let col_shift = |x: u32| ((x as i32 - xloc) as f32 * tan_angle).round() as i32;
    for (x0, ncols, shift) in strip_runs(w, col_shift) {
        pix.rasterop_vip(x0 as i32, ncols as i32, shift);
        if fill_value != 0 {
            if shift > 0 {
                fill_region(pix, x0 as i32, 0, ncols as i32, shift, fill_value);
            } else if shift < 0 {
                fill_region(pix, x0 as i32, h + shift, ncols as i32, -shift, fill_value);
            }
        }
    }
    Ok(())
}
