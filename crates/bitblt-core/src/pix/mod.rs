//! The packed pixel buffer container
//!
//! # Pixel layout
//!
//! - Image data is stored in 32-bit words
//! - Every row starts on a 32-bit boundary; the row stride (`wpl`, words
//!   per line) may exceed the minimum needed for the pixel width
//! - Pixels are packed MSB to LSB within each word
//! - Row bits beyond `width * depth` are padding and are kept at zero,
//!   so raw-word comparisons of pixel-identical images agree
//!
//! # Ownership model
//!
//! [`Pix`] uses `Arc` for cheap cloning (shared ownership). To modify
//! pixel data, convert to [`PixMut`] via [`Pix::try_into_mut`] or
//! [`Pix::to_mut`], then convert back with `Into<Pix>`. This makes the
//! destination of every raster operation an exclusive borrow, so general
//! overlapping source/destination aliasing is unrepresentable; the
//! sanctioned in-place patterns go through the dedicated band-shift
//! primitives instead.

mod access;
pub mod rop;
mod rop_low;

pub use rop::RopOp;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Pixel depth (bits per pixel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelDepth {
    /// 1-bit binary image
    Bit1 = 1,
    /// 2-bit image (4 levels)
    Bit2 = 2,
    /// 4-bit image (16 levels)
    Bit4 = 4,
    /// 8-bit grayscale or indexed color
    Bit8 = 8,
    /// 16-bit grayscale
    Bit16 = 16,
    /// 32-bit RGBA
    Bit32 = 32,
}

impl PixelDepth {
    /// Create `PixelDepth` from a raw bit count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDepth`] if `bits` is not 1, 2, 4, 8, 16, or 32.
    pub fn from_bits(bits: u32) -> Result<Self> {
        match bits {
            1 => Ok(PixelDepth::Bit1),
            2 => Ok(PixelDepth::Bit2),
            4 => Ok(PixelDepth::Bit4),
            8 => Ok(PixelDepth::Bit8),
            16 => Ok(PixelDepth::Bit16),
            32 => Ok(PixelDepth::Bit32),
            _ => Err(Error::InvalidDepth(bits)),
        }
    }

    /// Get the number of bits per pixel.
    #[inline]
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Check if a colormap is allowed for this depth.
    pub fn colormap_allowed(self) -> bool {
        matches!(
            self,
            PixelDepth::Bit1 | PixelDepth::Bit2 | PixelDepth::Bit4 | PixelDepth::Bit8
        )
    }

    /// Get the maximum pixel value representable at this depth.
    pub fn max_value(self) -> u32 {
        match self {
            PixelDepth::Bit32 => u32::MAX,
            _ => (1u32 << self.bits()) - 1,
        }
    }
}

/// Internal image data
#[derive(Debug)]
struct PixData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Depth in bits per pixel
    depth: PixelDepth,
    /// 32-bit words per line
    wpl: u32,
    /// Optional colormap for indexed images (1, 2, 4, 8 bpp)
    colormap: Option<crate::PixColormap>,
    /// The image data (packed 32-bit words)
    data: Vec<u32>,
}

/// Immutable image container
///
/// # Examples
///
/// ```
/// use bitblt_core::{Pix, PixelDepth};
///
/// let pix = Pix::new(640, 480, PixelDepth::Bit8).unwrap();
/// assert_eq!(pix.width(), 640);
/// assert_eq!(pix.wpl(), 160);
/// ```
#[derive(Debug, Clone)]
pub struct Pix {
    inner: Arc<PixData>,
}

impl Pix {
    /// Create a new image with the specified dimensions and depth.
    ///
    /// The image data is initialized to zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let wpl = Self::compute_wpl(width, depth);
        let data = vec![0u32; (wpl as usize) * (height as usize)];

        Ok(Pix {
            inner: Arc::new(PixData {
                width,
                height,
                depth,
                wpl,
                colormap: None,
                data,
            }),
        })
    }

    /// Compute words per line for given width and depth.
    ///
    /// Uses u64 arithmetic to prevent overflow for large widths.
    ///
    /// # Panics
    ///
    /// Panics if the result would exceed `u32::MAX`.
    #[inline]
    fn compute_wpl(width: u32, depth: PixelDepth) -> u32 {
        let bits_per_line = u64::from(width) * u64::from(depth.bits());
        let wpl = bits_per_line.div_ceil(32);
        u32::try_from(wpl).unwrap_or_else(|_| {
            panic!(
                "image row too large: width={} depth={:?} requires {} words",
                width, depth, wpl
            )
        })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Get the words per line.
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    /// Check whether this image has a colormap attached.
    #[inline]
    pub fn has_colormap(&self) -> bool {
        self.inner.colormap.is_some()
    }

    /// Get a reference to the image's colormap, if present.
    #[inline]
    pub fn colormap(&self) -> Option<&crate::PixColormap> {
        self.inner.colormap.as_ref()
    }

    /// Get raw access to the image data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get the number of strong references to this image.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Get the words of a specific row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        let start = (y * self.inner.wpl) as usize;
        &self.inner.data[start..start + self.inner.wpl as usize]
    }

    /// Create a new image with the same dimensions, depth, and colormap
    /// as this one, with data initialized to zero.
    pub fn create_template(&self) -> Self {
        Pix {
            inner: Arc::new(PixData {
                width: self.inner.width,
                height: self.inner.height,
                depth: self.inner.depth,
                wpl: self.inner.wpl,
                colormap: self.inner.colormap.clone(),
                data: vec![0u32; self.inner.data.len()],
            }),
        }
    }

    /// Check if two images have the same width, height, and depth.
    pub fn sizes_equal(&self, other: &Pix) -> bool {
        self.inner.width == other.inner.width
            && self.inner.height == other.inner.height
            && self.inner.depth == other.inner.depth
    }

    /// Compare pixel data and geometry for exact equality.
    ///
    /// Colormaps are not compared; only dimensions, depth, and bits.
    pub fn equals(&self, other: &Pix) -> bool {
        self.sizes_equal(other) && self.inner.data == other.inner.data
    }

    /// Create a deep copy of this image.
    ///
    /// Unlike `clone()` which shares data via `Arc`, this creates a
    /// completely independent copy.
    pub fn deep_clone(&self) -> Self {
        Pix {
            inner: Arc::new(PixData {
                width: self.inner.width,
                height: self.inner.height,
                depth: self.inner.depth,
                wpl: self.inner.wpl,
                colormap: self.inner.colormap.clone(),
                data: self.inner.data.clone(),
            }),
        }
    }

    /// Try to get mutable access to the image data.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<PixMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(PixMut { inner: data }),
            Err(arc) => Err(Pix { inner: arc }),
        }
    }

    /// Create a mutable copy of this image.
    pub fn to_mut(&self) -> PixMut {
        PixMut {
            inner: PixData {
                width: self.inner.width,
                height: self.inner.height,
                depth: self.inner.depth,
                wpl: self.inner.wpl,
                colormap: self.inner.colormap.clone(),
                data: self.inner.data.clone(),
            },
        }
    }
}

/// Mutable image container
///
/// Allows modification of image data through an exclusive borrow.
/// Convert back to an immutable [`Pix`] using `Into<Pix>`.
#[derive(Debug)]
pub struct PixMut {
    inner: PixData,
}

impl PixMut {
    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Get words per line.
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    /// Get raw access to the image data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get mutable access to the image data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u32] {
        &mut self.inner.data
    }

    /// Get mutable access to a specific row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data_mut(&mut self, y: u32) -> &mut [u32] {
        let start = (y * self.inner.wpl) as usize;
        &mut self.inner.data[start..start + self.inner.wpl as usize]
    }

    /// Check whether this image has a colormap attached.
    #[inline]
    pub fn has_colormap(&self) -> bool {
        self.inner.colormap.is_some()
    }

    /// Get a reference to the image's colormap, if present.
    #[inline]
    pub fn colormap(&self) -> Option<&crate::PixColormap> {
        self.inner.colormap.as_ref()
    }

    /// Set or remove the colormap.
    ///
    /// Colormaps are only valid for 1, 2, 4, and 8 bpp images, and the
    /// colormap depth must match the image depth.
    pub fn set_colormap(&mut self, cmap: Option<crate::PixColormap>) -> Result<()> {
        if let Some(ref cm) = cmap {
            if !self.inner.depth.colormap_allowed() {
                return Err(Error::ColormapNotAllowed(self.inner.depth.bits()));
            }
            if cm.depth() != self.inner.depth.bits() {
                return Err(Error::InvalidParameter(format!(
                    "colormap depth {} does not match image depth {}",
                    cm.depth(),
                    self.inner.depth.bits()
                )));
            }
        }
        self.inner.colormap = cmap;
        Ok(())
    }

    /// Take an independent immutable snapshot of the current state.
    pub fn snapshot(&self) -> Pix {
        Pix {
            inner: Arc::new(PixData {
                width: self.inner.width,
                height: self.inner.height,
                depth: self.inner.depth,
                wpl: self.inner.wpl,
                colormap: self.inner.colormap.clone(),
                data: self.inner.data.clone(),
            }),
        }
    }

    /// Clear all pixels to zero.
    pub fn clear(&mut self) {
        self.inner.data.fill(0);
    }

    /// Set all pixels to the maximum value.
    pub fn set_all(&mut self) {
        self.inner.data.fill(0xFFFF_FFFF);
        self.clear_unused_bits();
    }

    /// Set every pixel to an arbitrary value.
    ///
    /// The value is masked to the pixel depth. The fill is word-level:
    /// the value is replicated across each 32-bit word, which is exact
    /// for every supported depth.
    pub fn set_all_arbitrary(&mut self, val: u32) {
        let bits = self.inner.depth.bits();
        let val = val & self.inner.depth.max_value();
        let mut word = 0u32;
        let mut shift = 0;
        while shift < 32 {
            word |= val << (32 - bits - shift);
            shift += bits;
        }
        self.inner.data.fill(word);
        self.clear_unused_bits();
    }

    /// Zero the row-padding bits beyond `width * depth`.
    ///
    /// Raster operations clip in pixel coordinates and never touch the
    /// padding, but whole-buffer fills and raw writes through
    /// [`data_mut`](Self::data_mut) can set it; call this afterward to
    /// restore the invariant that padding bits are zero.
    pub fn clear_unused_bits(&mut self) {
        let valid_bits = u64::from(self.inner.width) * u64::from(self.inner.depth.bits());
        let wpl = self.inner.wpl as usize;
        let full = (valid_bits / 32) as usize;
        if full == wpl {
            return;
        }
        let mask = rop_low::left_mask((valid_bits % 32) as u32);
        for row in self.inner.data.chunks_exact_mut(wpl) {
            row[full] &= mask;
            for word in &mut row[full + 1..] {
                *word = 0;
            }
        }
    }
}

impl From<PixMut> for Pix {
    fn from(pix_mut: PixMut) -> Self {
        Pix {
            inner: Arc::new(pix_mut.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_depth() {
        assert_eq!(PixelDepth::from_bits(1).unwrap(), PixelDepth::Bit1);
        assert_eq!(PixelDepth::from_bits(32).unwrap(), PixelDepth::Bit32);
        assert!(PixelDepth::from_bits(3).is_err());

        assert_eq!(PixelDepth::Bit8.bits(), 8);
        assert_eq!(PixelDepth::Bit8.max_value(), 255);
        assert!(PixelDepth::Bit8.colormap_allowed());
        assert!(!PixelDepth::Bit32.colormap_allowed());
    }

    #[test]
    fn test_pix_creation() {
        let pix = Pix::new(100, 200, PixelDepth::Bit8).unwrap();
        assert_eq!(pix.width(), 100);
        assert_eq!(pix.height(), 200);
        assert_eq!(pix.depth(), PixelDepth::Bit8);
        // 100 * 8 = 800 bits = 25 words
        assert_eq!(pix.wpl(), 25);
    }

    #[test]
    fn test_pix_creation_invalid() {
        assert!(Pix::new(0, 100, PixelDepth::Bit8).is_err());
        assert!(Pix::new(100, 0, PixelDepth::Bit8).is_err());
    }

    #[test]
    fn test_wpl_calculation() {
        let pix = Pix::new(32, 1, PixelDepth::Bit1).unwrap();
        assert_eq!(pix.wpl(), 1);

        let pix = Pix::new(33, 1, PixelDepth::Bit1).unwrap();
        assert_eq!(pix.wpl(), 2);

        let pix = Pix::new(10, 1, PixelDepth::Bit32).unwrap();
        assert_eq!(pix.wpl(), 10);
    }

    #[test]
    fn test_pix_clone_shares_data() {
        let pix1 = Pix::new(100, 100, PixelDepth::Bit8).unwrap();
        let pix2 = pix1.clone();

        assert_eq!(pix1.ref_count(), 2);
        assert_eq!(pix1.data().as_ptr(), pix2.data().as_ptr());
    }

    #[test]
    fn test_pix_deep_clone() {
        let pix1 = Pix::new(100, 100, PixelDepth::Bit8).unwrap();
        let pix2 = pix1.deep_clone();

        assert_eq!(pix1.ref_count(), 1);
        assert_eq!(pix2.ref_count(), 1);
        assert_ne!(pix1.data().as_ptr(), pix2.data().as_ptr());
    }

    #[test]
    fn test_try_into_mut() {
        let pix = Pix::new(10, 10, PixelDepth::Bit8).unwrap();
        let shared = pix.clone();
        // Two references: conversion must fail and give the pix back
        let pix = pix.try_into_mut().unwrap_err();
        drop(shared);
        assert!(pix.try_into_mut().is_ok());
    }

    #[test]
    fn test_create_template_zeroed() {
        let pix = Pix::new(10, 10, PixelDepth::Bit8).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_pixel(5, 5, 42).unwrap();
        let pix: Pix = pm.into();

        let tmpl = pix.create_template();
        assert!(tmpl.sizes_equal(&pix));
        assert!(tmpl.data().iter().all(|&w| w == 0));
    }

    #[test]
    fn test_set_all_arbitrary() {
        let pix = Pix::new(10, 4, PixelDepth::Bit4).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_all_arbitrary(0x5);
        assert_eq!(pm.get_pixel(0, 0), Some(5));
        assert_eq!(pm.get_pixel(9, 3), Some(5));
        assert_eq!(pm.data()[0], 0x5555_5555);
    }

    #[test]
    fn test_set_all_arbitrary_masks_value() {
        let pix = Pix::new(8, 2, PixelDepth::Bit8).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_all_arbitrary(0x1FF);
        assert_eq!(pm.get_pixel(3, 1), Some(0xFF));
    }

    #[test]
    fn test_full_fills_keep_padding_clear() {
        // 20 px at 1 bpp: 12 padding bits in each row word
        let pix = Pix::new(20, 3, PixelDepth::Bit1).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_all();
        for y in 0..3 {
            assert_eq!(pm.row_data_mut(y)[0], 0xFFFF_F000);
        }

        // 18 px at 8 bpp: 16 valid bits in the last of 5 row words
        let pix = Pix::new(18, 2, PixelDepth::Bit8).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_all_arbitrary(0xAB);
        assert_eq!(pm.data()[3], 0xABAB_ABAB);
        assert_eq!(pm.data()[4], 0xABAB_0000);
        assert_eq!(pm.data()[9], 0xABAB_0000);
    }

    #[test]
    fn test_clear_unused_bits_after_raw_write() {
        let pix = Pix::new(40, 2, PixelDepth::Bit1).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        for word in pm.data_mut() {
            *word = 0xFFFF_FFFF;
        }
        pm.clear_unused_bits();
        assert_eq!(pm.data()[1], 0xFF00_0000);
        assert_eq!(pm.data()[3], 0xFF00_0000);
        assert_eq!(pm.data()[0], 0xFFFF_FFFF);
    }

    #[test]
    fn test_colormap_attach() {
        let mut cmap = crate::PixColormap::new(8).unwrap();
        cmap.add_rgb(1, 2, 3).unwrap();

        let pix = Pix::new(10, 10, PixelDepth::Bit8).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_colormap(Some(cmap)).unwrap();
        assert!(pm.has_colormap());

        let pix: Pix = pm.into();
        assert_eq!(pix.colormap().unwrap().get_rgb(0), Some((1, 2, 3)));
    }

    #[test]
    fn test_colormap_depth_checks() {
        let cmap = crate::PixColormap::new(4).unwrap();
        let pix = Pix::new(10, 10, PixelDepth::Bit8).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        assert!(pm.set_colormap(Some(cmap)).is_err());

        let cmap = crate::PixColormap::new(8).unwrap();
        let pix32 = Pix::new(10, 10, PixelDepth::Bit32).unwrap();
        let mut pm32 = pix32.try_into_mut().unwrap();
        assert!(matches!(
            pm32.set_colormap(Some(cmap)),
            Err(Error::ColormapNotAllowed(32))
        ));
    }
}
