//! Color palette for indexed images
//!
//! A minimal colormap: an ordered list of RGBA entries attached to a
//! 1, 2, 4, or 8 bpp image. Raster operations never interpret colormap
//! entries; the map exists so that clients (notably the in-place shear)
//! can detect indexed images and avoid bit-level fills that would be
//! meaningless as palette indices.

use crate::error::{Error, Result};

/// A single RGBA colormap entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbaQuad {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

/// Color palette for indexed images
#[derive(Debug, Clone)]
pub struct PixColormap {
    depth: u32,
    colors: Vec<RgbaQuad>,
}

impl PixColormap {
    /// Create an empty colormap for the given pixel depth.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDepth`] unless `depth` is 1, 2, 4, or 8.
    pub fn new(depth: u32) -> Result<Self> {
        if !matches!(depth, 1 | 2 | 4 | 8) {
            return Err(Error::InvalidDepth(depth));
        }
        Ok(PixColormap {
            depth,
            colors: Vec::new(),
        })
    }

    /// Get the pixel depth this colormap indexes.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Maximum number of entries for this depth.
    #[inline]
    pub fn capacity(&self) -> usize {
        1 << self.depth
    }

    /// Number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check whether the colormap has no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get all entries.
    #[inline]
    pub fn colors(&self) -> &[RgbaQuad] {
        &self.colors
    }

    /// Append an opaque RGB entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColormapFull`] if the map already holds
    /// `2^depth` entries.
    pub fn add_rgb(&mut self, red: u8, green: u8, blue: u8) -> Result<usize> {
        self.add_rgba(red, green, blue, 255)
    }

    /// Append an RGBA entry, returning its index.
    pub fn add_rgba(&mut self, red: u8, green: u8, blue: u8, alpha: u8) -> Result<usize> {
        if self.colors.len() >= self.capacity() {
            return Err(Error::ColormapFull(self.colors.len()));
        }
        self.colors.push(RgbaQuad {
            red,
            green,
            blue,
            alpha,
        });
        Ok(self.colors.len() - 1)
    }

    /// Get the RGB value at `index`, if present.
    pub fn get_rgb(&self, index: usize) -> Option<(u8, u8, u8)> {
        self.colors.get(index).map(|c| (c.red, c.green, c.blue))
    }

    /// Get the RGBA value at `index`, if present.
    pub fn get_rgba(&self, index: usize) -> Option<(u8, u8, u8, u8)> {
        self.colors
            .get(index)
            .map(|c| (c.red, c.green, c.blue, c.alpha))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid_depths() {
        for d in [1, 2, 4, 8] {
            let cmap = PixColormap::new(d).unwrap();
            assert_eq!(cmap.capacity(), 1 << d);
            assert!(cmap.is_empty());
        }
        assert!(PixColormap::new(16).is_err());
        assert!(PixColormap::new(0).is_err());
    }

    #[test]
    fn test_add_and_get() {
        let mut cmap = PixColormap::new(2).unwrap();
        assert_eq!(cmap.add_rgb(255, 0, 0).unwrap(), 0);
        assert_eq!(cmap.add_rgba(0, 255, 0, 128).unwrap(), 1);
        assert_eq!(cmap.get_rgb(0), Some((255, 0, 0)));
        assert_eq!(cmap.get_rgba(1), Some((0, 255, 0, 128)));
        assert_eq!(cmap.get_rgb(2), None);
    }

    #[test]
    fn test_capacity_limit() {
        let mut cmap = PixColormap::new(1).unwrap();
        cmap.add_rgb(0, 0, 0).unwrap();
        cmap.add_rgb(255, 255, 255).unwrap();
        assert!(matches!(
            cmap.add_rgb(128, 128, 128),
            Err(Error::ColormapFull(2))
        ));
    }
}
