//! Raster operations
//!
//! Block transfers between images under one of the 16 Boolean combine
//! rules, plus destination-only fills, band shifts, and whole-image
//! logical combinations built on top of them.
//!
//! The rectangle arguments are signed and may extend past either image;
//! they are clipped to the intersection of both, and a rectangle that
//! clips to nothing is a successful no-op. Depths must match: these are
//! bit-level operations with no pixel interpretation, so a depth
//! mismatch would silently misalign pixels.

use super::rop_low::{self, RopFn, UniFn};
use super::{Pix, PixMut};
use crate::error::{Error, Result};

/// The 16 Boolean raster operations
///
/// Naming follows the combine expression applied per bit, with `Src`
/// the source operand and `Dst` the destination being overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RopOp {
    /// dst = 0
    Clear,
    /// dst = 1
    Set,
    /// dst = src
    Src,
    /// dst = !src
    NotSrc,
    /// dst = dst (no-op)
    Dst,
    /// dst = !dst
    NotDst,
    /// dst = src & dst
    SrcAndDst,
    /// dst = src | dst
    SrcOrDst,
    /// dst = src ^ dst
    SrcXorDst,
    /// dst = !src & dst
    NotSrcAndDst,
    /// dst = !src | dst
    NotSrcOrDst,
    /// dst = src & !dst
    SrcAndNotDst,
    /// dst = src | !dst
    SrcOrNotDst,
    /// dst = !(src & dst)
    Nand,
    /// dst = !(src | dst)
    Nor,
    /// dst = !(src ^ dst)
    Xnor,
}

impl RopOp {
    /// Painting a binary foreground onto a destination.
    pub const PAINT: RopOp = RopOp::SrcOrDst;

    /// Removing a binary foreground from a destination.
    pub const SUBTRACT: RopOp = RopOp::NotSrcAndDst;

    /// Whether the operation reads source pixels.
    pub fn requires_source(self) -> bool {
        !matches!(
            self,
            RopOp::Clear | RopOp::Set | RopOp::Dst | RopOp::NotDst
        )
    }

    /// The word-level combine function for this operation.
    pub(crate) fn word_fn(self) -> RopFn {
        match self {
            RopOp::Clear => |_s, _d| 0,
            RopOp::Set => |_s, _d| !0,
            RopOp::Src => |s, _d| s,
            RopOp::NotSrc => |s, _d| !s,
            RopOp::Dst => |_s, d| d,
            RopOp::NotDst => |_s, d| !d,
            RopOp::SrcAndDst => |s, d| s & d,
            RopOp::SrcOrDst => |s, d| s | d,
            RopOp::SrcXorDst => |s, d| s ^ d,
            RopOp::NotSrcAndDst => |s, d| !s & d,
            RopOp::NotSrcOrDst => |s, d| !s | d,
            RopOp::SrcAndNotDst => |s, d| s & !d,
            RopOp::SrcOrNotDst => |s, d| s | !d,
            RopOp::Nand => |s, d| !(s & d),
            RopOp::Nor => |s, d| !(s | d),
            RopOp::Xnor => |s, d| !(s ^ d),
        }
    }

    /// The destination-only function, for operations that ignore the
    /// source. `Dst` returns a function too; callers short-circuit it.
    fn uni_fn(self) -> Option<UniFn> {
        match self {
            RopOp::Clear => Some(|_d| 0),
            RopOp::Set => Some(|_d| !0),
            RopOp::Dst => Some(|d| d),
            RopOp::NotDst => Some(|d| !d),
            _ => None,
        }
    }
}

/// Clipped rectangle geometry in destination and source pixel
/// coordinates, all nonnegative and in bounds.
struct ClippedRect {
    dx: usize,
    dy: usize,
    w: usize,
    h: usize,
    sx: usize,
    sy: usize,
}

/// Clip a transfer rectangle to both images. Returns `None` when
/// nothing survives, which callers treat as a successful no-op.
#[allow(clippy::too_many_arguments)]
fn clip_rect(
    dw: i32,
    dh: i32,
    sw: i32,
    sh: i32,
    mut dx: i32,
    mut dy: i32,
    mut w: i32,
    mut h: i32,
    mut sx: i32,
    mut sy: i32,
) -> Option<ClippedRect> {
    // Clip to the source image, shifting the destination origin in step.
    if sx < 0 {
        dx -= sx;
        w += sx;
        sx = 0;
    }
    if sy < 0 {
        dy -= sy;
        h += sy;
        sy = 0;
    }
    if sx + w > sw {
        w = sw - sx;
    }
    if sy + h > sh {
        h = sh - sy;
    }

    // Clip to the destination image, shifting the source origin in step.
    if dx < 0 {
        sx -= dx;
        w += dx;
        dx = 0;
    }
    if dy < 0 {
        sy -= dy;
        h += dy;
        dy = 0;
    }
    if dx + w > dw {
        w = dw - dx;
    }
    if dy + h > dh {
        h = dh - dy;
    }

    if w <= 0 || h <= 0 {
        return None;
    }
    Some(ClippedRect {
        dx: dx as usize,
        dy: dy as usize,
        w: w as usize,
        h: h as usize,
        sx: sx as usize,
        sy: sy as usize,
    })
}

/// Clip a destination-only rectangle to the image.
fn clip_uni(
    dw: i32,
    dh: i32,
    mut dx: i32,
    mut dy: i32,
    mut w: i32,
    mut h: i32,
) -> Option<(usize, usize, usize, usize)> {
    if dx < 0 {
        w += dx;
        dx = 0;
    }
    if dy < 0 {
        h += dy;
        dy = 0;
    }
    if dx + w > dw {
        w = dw - dx;
    }
    if dy + h > dh {
        h = dh - dy;
    }
    if w <= 0 || h <= 0 {
        return None;
    }
    Some((dx as usize, dy as usize, w as usize, h as usize))
}

impl PixMut {
    /// General raster operation: combine a rectangle of `src` into a
    /// rectangle of this image under `op`.
    ///
    /// `(dx, dy)` is the destination origin, `(sx, sy)` the source
    /// origin, `(w, h)` the rectangle size in pixels. The rectangle is
    /// clipped to both images; a fully clipped rectangle is a no-op.
    /// Operations that ignore the source never read `src` pixels, but
    /// the depth check still applies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleDepths`] if the depths differ.
    #[allow(clippy::too_many_arguments)]
    pub fn rasterop(
        &mut self,
        dx: i32,
        dy: i32,
        w: i32,
        h: i32,
        op: RopOp,
        src: &Pix,
        sx: i32,
        sy: i32,
    ) -> Result<()> {
        if self.depth() != src.depth() {
            return Err(Error::IncompatibleDepths(
                self.depth().bits(),
                src.depth().bits(),
            ));
        }
        if op == RopOp::Dst {
            return Ok(());
        }
        if !op.requires_source() {
            // Destination-only ops ignore the source rectangle entirely.
            return self.rasterop_uni(dx, dy, w, h, op);
        }

        let Some(r) = clip_rect(
            self.width() as i32,
            self.height() as i32,
            src.width() as i32,
            src.height() as i32,
            dx,
            dy,
            w,
            h,
            sx,
            sy,
        ) else {
            return Ok(());
        };

        let bits = self.depth().bits() as usize;
        let dwpl = self.wpl() as usize;
        let swpl = src.wpl() as usize;
        rop_low::rasterop_low(
            self.data_mut(),
            dwpl,
            r.dx * bits,
            r.dy,
            r.w * bits,
            r.h,
            op.word_fn(),
            src.data(),
            swpl,
            r.sx * bits,
            r.sy,
        );
        Ok(())
    }

    /// Destination-only raster operation on a rectangle of this image.
    ///
    /// Only `Clear`, `Set`, `Dst`, and `NotDst` are accepted; the
    /// rectangle is clipped to the image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedOp`] for operations that read a
    /// source.
    pub fn rasterop_uni(&mut self, dx: i32, dy: i32, w: i32, h: i32, op: RopOp) -> Result<()> {
        let Some(f) = op.uni_fn() else {
            return Err(Error::UnsupportedOp(format!(
                "{op:?} requires a source operand"
            )));
        };
        if op == RopOp::Dst {
            return Ok(());
        }
        let Some((dx, dy, w, h)) =
            clip_uni(self.width() as i32, self.height() as i32, dx, dy, w, h)
        else {
            return Ok(());
        };
        let bits = self.depth().bits() as usize;
        let dwpl = self.wpl() as usize;
        rop_low::rasterop_uni_low(self.data_mut(), dwpl, dx * bits, dy, w * bits, h, f);
        Ok(())
    }

    /// Clear a rectangle to zero.
    pub fn clear_region(&mut self, x: i32, y: i32, w: i32, h: i32) {
        // Clear cannot fail.
        let _ = self.rasterop_uni(x, y, w, h, RopOp::Clear);
    }

    /// Set all bits in a rectangle.
    pub fn set_region(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let _ = self.rasterop_uni(x, y, w, h, RopOp::Set);
    }

    /// Invert all bits in a rectangle.
    pub fn invert_region(&mut self, x: i32, y: i32, w: i32, h: i32) {
        let _ = self.rasterop_uni(x, y, w, h, RopOp::NotDst);
    }

    /// Shift a vertical band of the image up or down, in place.
    ///
    /// The band spans columns `[xb, xb + wb)`, clipped to the image;
    /// `vshift > 0` moves pixels down. Rows exposed by the shift are
    /// cleared to zero; callers needing a different color repaint them.
    pub fn rasterop_vip(&mut self, xb: i32, wb: i32, vshift: i32) {
        let width = self.width() as i32;
        let h = self.height() as usize;
        let x0 = xb.max(0);
        let x1 = (xb + wb).min(width);
        if x1 <= x0 || vshift == 0 {
            return;
        }
        let bits = self.depth().bits() as usize;
        let xb_bits = x0 as usize * bits;
        let wb_bits = (x1 - x0) as usize * bits;
        let wpl = self.wpl() as usize;
        let data = self.data_mut();

        if vshift.unsigned_abs() as usize >= h {
            rop_low::rasterop_uni_low(data, wpl, xb_bits, 0, wb_bits, h, |_| 0);
            return;
        }

        if vshift > 0 {
            let shift = vshift as usize;
            // Walk bottom-up so each source row is read before being
            // overwritten.
            for y in (shift..h).rev() {
                rop_low::copy_band_row(data, wpl, xb_bits, wb_bits, y - shift, y);
            }
            rop_low::rasterop_uni_low(data, wpl, xb_bits, 0, wb_bits, shift, |_| 0);
        } else {
            let shift = vshift.unsigned_abs() as usize;
            for y in 0..h - shift {
                rop_low::copy_band_row(data, wpl, xb_bits, wb_bits, y + shift, y);
            }
            rop_low::rasterop_uni_low(data, wpl, xb_bits, h - shift, wb_bits, shift, |_| 0);
        }
    }

    /// Shift a horizontal band of the image left or right, in place.
    ///
    /// The band spans rows `[yb, yb + hb)`, clipped to the image;
    /// `hshift > 0` moves pixels toward larger x. Columns exposed by
    /// the shift are cleared to zero.
    pub fn rasterop_hip(&mut self, yb: i32, hb: i32, hshift: i32) {
        let height = self.height() as i32;
        let y0 = yb.max(0);
        let y1 = (yb + hb).min(height);
        if y1 <= y0 || hshift == 0 {
            return;
        }
        let bits = self.depth().bits() as isize;
        let row_bits = self.width() as usize * bits as usize;
        let shift = hshift as isize * bits;
        let wpl = self.wpl() as usize;
        let data = self.data_mut();
        for y in y0 as usize..y1 as usize {
            let row = &mut data[y * wpl..(y + 1) * wpl];
            rop_low::shift_row_low(row, row_bits, shift);
        }
    }

    /// AND another image into this one, pixel for pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleSizes`] or
    /// [`Error::IncompatibleDepths`] on mismatch.
    pub fn and_inplace(&mut self, other: &Pix) -> Result<()> {
        self.full_image_rop(other, RopOp::SrcAndDst)
    }

    /// OR another image into this one.
    pub fn or_inplace(&mut self, other: &Pix) -> Result<()> {
        self.full_image_rop(other, RopOp::SrcOrDst)
    }

    /// XOR another image into this one.
    pub fn xor_inplace(&mut self, other: &Pix) -> Result<()> {
        self.full_image_rop(other, RopOp::SrcXorDst)
    }

    /// Invert every bit of the image.
    pub fn invert_inplace(&mut self) {
        let w = self.width() as i32;
        let h = self.height() as i32;
        let _ = self.rasterop_uni(0, 0, w, h, RopOp::NotDst);
    }

    fn full_image_rop(&mut self, other: &Pix, op: RopOp) -> Result<()> {
        if self.width() != other.width() || self.height() != other.height() {
            return Err(Error::IncompatibleSizes(
                self.width(),
                self.height(),
                other.width(),
                other.height(),
            ));
        }
        let w = self.width() as i32;
        let h = self.height() as i32;
        self.rasterop(0, 0, w, h, op, other, 0, 0)
    }
}

impl Pix {
    /// AND two images of equal size and depth, producing a new image.
    ///
    /// The result carries this image's colormap, if any.
    pub fn and(&self, other: &Pix) -> Result<Pix> {
        self.combined(other, RopOp::SrcAndDst)
    }

    /// OR two images of equal size and depth.
    pub fn or(&self, other: &Pix) -> Result<Pix> {
        self.combined(other, RopOp::SrcOrDst)
    }

    /// XOR two images of equal size and depth.
    pub fn xor(&self, other: &Pix) -> Result<Pix> {
        self.combined(other, RopOp::SrcXorDst)
    }

    /// Produce the bitwise inverse of this image.
    pub fn invert(&self) -> Pix {
        let mut out = self.to_mut();
        out.invert_inplace();
        out.into()
    }

    fn combined(&self, other: &Pix, op: RopOp) -> Result<Pix> {
        let mut out = self.to_mut();
        out.full_image_rop(other, op)?;
        Ok(out.into())
    }
}
