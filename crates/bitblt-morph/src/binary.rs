//! Binary morphological operations
//!
//! Erosion, dilation, opening, closing, and the hit-miss transform for
//! 1 bpp images. Each operation is a short sequence of raster
//! operations: dilation accumulates OR over shifted copies of the
//! source, one full-image blit per hit in the structuring element;
//! erosion accumulates AND the same way.
//!
//! # Boundary convention
//!
//! Pixels outside the image are background. Erosion therefore clears
//! any output pixel whose neighborhood pokes past the image edge, and
//! the hit-miss transform treats out-of-image miss positions as
//! matching.

use crate::{MorphError, MorphResult, Sel};
use bitblt_core::{Pix, PixelDepth, RopOp};

/// Check that an image is 1 bpp.
pub fn check_binary(pix: &Pix) -> MorphResult<()> {
    if pix.depth() != PixelDepth::Bit1 {
        return Err(MorphError::UnsupportedDepth {
            expected: "1 bpp",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}

fn check_has_hits(sel: &Sel) -> MorphResult<()> {
    if sel.hit_offsets().next().is_none() {
        return Err(MorphError::InvalidSel("no hits".into()));
    }
    Ok(())
}

/// Dilate a binary image.
///
/// The output is the union of copies of the source translated by each
/// hit offset: one OR blit per hit.
pub fn dilate(pix: &Pix, sel: &Sel) -> MorphResult<Pix> {
    check_binary(pix)?;
    check_has_hits(sel)?;

    let w = pix.width() as i32;
    let h = pix.height() as i32;
    let mut out = pix.create_template().try_into_mut().unwrap();
    for (dx, dy) in sel.hit_offsets() {
        out.rasterop(dx, dy, w, h, RopOp::PAINT, pix, 0, 0)?;
    }
    Ok(out.into())
}

/// Erode a binary image.
///
/// The output starts all-foreground and is intersected with one
/// translated copy of the source per hit. Margins whose neighborhood
/// extends past the image edge are then cleared, since outside pixels
/// are background.
pub fn erode(pix: &Pix, sel: &Sel) -> MorphResult<Pix> {
    check_binary(pix)?;
    check_has_hits(sel)?;

    let w = pix.width() as i32;
    let h = pix.height() as i32;
    let mut out = pix.create_template().try_into_mut().unwrap();
    out.set_all();

    let (mut left, mut right, mut top, mut bottom) = (0, 0, 0, 0);
    for (dx, dy) in sel.hit_offsets() {
        out.rasterop(-dx, -dy, w, h, RopOp::SrcAndDst, pix, 0, 0)?;
        left = left.max(-dx);
        right = right.max(dx);
        top = top.max(-dy);
        bottom = bottom.max(dy);
    }

    if left > 0 {
        out.clear_region(0, 0, left, h);
    }
    if right > 0 {
        out.clear_region(w - right, 0, right, h);
    }
    if top > 0 {
        out.clear_region(0, 0, w, top);
    }
    if bottom > 0 {
        out.clear_region(0, h - bottom, w, bottom);
    }
    Ok(out.into())
}

/// Open a binary image: erosion followed by dilation.
///
/// Removes foreground features smaller than the structuring element.
pub fn open(pix: &Pix, sel: &Sel) -> MorphResult<Pix> {
    let eroded = erode(pix, sel)?;
    dilate(&eroded, sel)
}

/// Close a binary image: dilation followed by erosion.
///
/// Fills background features smaller than the structuring element.
pub fn close(pix: &Pix, sel: &Sel) -> MorphResult<Pix> {
    let dilated = dilate(pix, sel)?;
    erode(&dilated, sel)
}

/// Hit-miss transform.
///
/// A pixel survives when every hit lands on foreground and every miss
/// lands on background. Hits are AND-accumulated like an erosion;
/// misses AND in the inverted source. Miss positions outside the image
/// match by the boundary convention, so only hit margins are cleared.
pub fn hit_miss_transform(pix: &Pix, sel: &Sel) -> MorphResult<Pix> {
    check_binary(pix)?;

    let w = pix.width() as i32;
    let h = pix.height() as i32;
    let mut out = pix.create_template().try_into_mut().unwrap();
    out.set_all();

    let (mut left, mut right, mut top, mut bottom) = (0, 0, 0, 0);
    for (dx, dy) in sel.hit_offsets() {
        out.rasterop(-dx, -dy, w, h, RopOp::SrcAndDst, pix, 0, 0)?;
        left = left.max(-dx);
        right = right.max(dx);
        top = top.max(-dy);
        bottom = bottom.max(dy);
    }
    for (dx, dy) in sel.miss_offsets() {
        out.rasterop(-dx, -dy, w, h, RopOp::NotSrcAndDst, pix, 0, 0)?;
    }

    if left > 0 {
        out.clear_region(0, 0, left, h);
    }
    if right > 0 {
        out.clear_region(w - right, 0, right, h);
    }
    if top > 0 {
        out.clear_region(0, 0, w, top);
    }
    if bottom > 0 {
        out.clear_region(0, h - bottom, w, bottom);
    }
    Ok(out.into())
}

/// Subtract one binary image from another: `a & !b`.
///
/// # Errors
///
/// The images must be 1 bpp and the same size.
pub fn subtract(a: &Pix, b: &Pix) -> MorphResult<Pix> {
    check_binary(a)?;
    check_binary(b)?;
    if !a.sizes_equal(b) {
        return Err(bitblt_core::Error::IncompatibleSizes(
            a.width(),
            a.height(),
            b.width(),
            b.height(),
        )
        .into());
    }
    let mut out = a.to_mut();
    out.rasterop(
        0,
        0,
        a.width() as i32,
        a.height() as i32,
        RopOp::SUBTRACT,
        b,
        0,
        0,
    )?;
    Ok(out.into())
}

/// Dilate with a brick of the given size.
pub fn dilate_brick(pix: &Pix, width: u32, height: u32) -> MorphResult<Pix> {
    dilate(pix, &Sel::create_brick(width, height)?)
}

/// Erode with a brick of the given size.
pub fn erode_brick(pix: &Pix, width: u32, height: u32) -> MorphResult<Pix> {
    erode(pix, &Sel::create_brick(width, height)?)
}

/// Open with a brick of the given size.
pub fn open_brick(pix: &Pix, width: u32, height: u32) -> MorphResult<Pix> {
    open(pix, &Sel::create_brick(width, height)?)
}

/// Close with a brick of the given size.
pub fn close_brick(pix: &Pix, width: u32, height: u32) -> MorphResult<Pix> {
    close(pix, &Sel::create_brick(width, height)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_dot(w: u32, h: u32, x: u32, y: u32) -> Pix {
        let pix = Pix::new(w, h, PixelDepth::Bit1).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_pixel(x, y, 1).unwrap();
        pm.into()
    }

    fn count_fg(pix: &Pix) -> u32 {
        pix.data().iter().map(|w| w.count_ones()).sum()
    }

    #[test]
    fn test_depth_check() {
        let gray = Pix::new(10, 10, PixelDepth::Bit8).unwrap();
        let sel = Sel::create_brick(3, 3).unwrap();
        assert!(matches!(
            dilate(&gray, &sel),
            Err(MorphError::UnsupportedDepth { actual: 8, .. })
        ));
    }

    #[test]
    fn test_no_hits_rejected() {
        let pix = single_dot(10, 10, 5, 5);
        let sel = Sel::new(3, 3).unwrap();
        assert!(matches!(dilate(&pix, &sel), Err(MorphError::InvalidSel(_))));
        assert!(matches!(erode(&pix, &sel), Err(MorphError::InvalidSel(_))));
    }

    #[test]
    fn test_dilate_dot_to_brick() {
        let pix = single_dot(20, 20, 10, 10);
        let out = dilate_brick(&pix, 3, 3).unwrap();
        assert_eq!(count_fg(&out), 9);
        for y in 9..=11 {
            for x in 9..=11 {
                assert_eq!(out.get_pixel(x, y), Some(1), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_erode_brick_to_dot() {
        let pix = Pix::new(20, 20, PixelDepth::Bit1).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_region(9, 9, 3, 3);
        let pix: Pix = pm.into();

        let out = erode_brick(&pix, 3, 3).unwrap();
        assert_eq!(count_fg(&out), 1);
        assert_eq!(out.get_pixel(10, 10), Some(1));
    }

    #[test]
    fn test_erode_clears_image_border() {
        // All foreground: with outside as background, a 3x3 erosion
        // removes the one-pixel frame.
        let pix = Pix::new(12, 9, PixelDepth::Bit1).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_region(0, 0, 12, 9);
        let pix: Pix = pm.into();

        let out = erode_brick(&pix, 3, 3).unwrap();
        for y in 0..9u32 {
            for x in 0..12u32 {
                let interior = (1..11).contains(&x) && (1..8).contains(&y);
                assert_eq!(out.get_pixel(x, y), Some(u32::from(interior)), "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_open_removes_small_speck() {
        let pix = Pix::new(30, 30, PixelDepth::Bit1).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_region(5, 5, 10, 10);
        pm.set_pixel(25, 25, 1).unwrap(); // isolated speck
        let pix: Pix = pm.into();

        let out = open_brick(&pix, 3, 3).unwrap();
        assert_eq!(out.get_pixel(25, 25), Some(0));
        // The large block survives intact
        assert_eq!(out.get_pixel(5, 5), Some(1));
        assert_eq!(out.get_pixel(14, 14), Some(1));
        assert_eq!(count_fg(&out), 100);
    }

    #[test]
    fn test_close_fills_hole() {
        let pix = Pix::new(30, 30, PixelDepth::Bit1).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_region(5, 5, 10, 10);
        pm.set_pixel(10, 10, 0).unwrap(); // pinhole
        let pix: Pix = pm.into();

        let out = close_brick(&pix, 3, 3).unwrap();
        assert_eq!(out.get_pixel(10, 10), Some(1));
    }

    #[test]
    fn test_hit_miss_finds_left_edges() {
        // Miss to the left of a hit: matches foreground pixels whose
        // left neighbor is background.
        let sel = Sel::from_string("ox", 1, 0).unwrap();

        let pix = Pix::new(20, 5, PixelDepth::Bit1).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_region(4, 1, 6, 3);
        let pix: Pix = pm.into();

        let out = hit_miss_transform(&pix, &sel).unwrap();
        for y in 1..4u32 {
            assert_eq!(out.get_pixel(4, y), Some(1), "edge at y={y}");
            for x in 5..10u32 {
                assert_eq!(out.get_pixel(x, y), Some(0), "interior ({x}, {y})");
            }
        }
        // x = 0 columns: a foreground pixel there would have its miss
        // outside the image, which matches
        assert_eq!(out.get_pixel(0, 0), Some(0));
    }

    #[test]
    fn test_subtract() {
        let a = Pix::new(16, 4, PixelDepth::Bit1).unwrap();
        let mut am = a.try_into_mut().unwrap();
        am.set_region(0, 0, 10, 4);
        let a: Pix = am.into();

        let b = Pix::new(16, 4, PixelDepth::Bit1).unwrap();
        let mut bm = b.try_into_mut().unwrap();
        bm.set_region(5, 0, 10, 4);
        let b: Pix = bm.into();

        let out = subtract(&a, &b).unwrap();
        assert_eq!(out.get_pixel(4, 0), Some(1));
        assert_eq!(out.get_pixel(5, 0), Some(0));
        assert_eq!(count_fg(&out), 20);

        let c = Pix::new(8, 4, PixelDepth::Bit1).unwrap();
        assert!(subtract(&a, &c).is_err());
    }
}
