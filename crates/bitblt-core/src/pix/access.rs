//! Pixel access functions
//!
//! Low-level functions for getting and setting individual pixels.
//!
//! # Pixel packing
//!
//! Pixels are packed MSB-to-LSB within each 32-bit word. For example,
//! in a 1-bit image, pixel 0 occupies bit 31 (MSB) of the first word.

use super::{Pix, PixMut, PixelDepth};
use crate::error::{Error, Result};

/// Get a 1-bit pixel value.
#[inline]
pub fn get_data_bit(line: &[u32], x: u32) -> u32 {
    (line[(x >> 5) as usize] >> (31 - (x & 31))) & 1
}

/// Set a 1-bit pixel value (0 or 1; only the low bit of `val` is used).
#[inline]
pub fn set_data_bit(line: &mut [u32], x: u32, val: u32) {
    let shift = 31 - (x & 31);
    let word = &mut line[(x >> 5) as usize];
    *word = (*word & !(1 << shift)) | ((val & 1) << shift);
}

/// Get a 2-bit pixel value.
#[inline]
pub fn get_data_dibit(line: &[u32], x: u32) -> u32 {
    (line[(x >> 4) as usize] >> (30 - 2 * (x & 15))) & 0x3
}

/// Set a 2-bit pixel value.
#[inline]
pub fn set_data_dibit(line: &mut [u32], x: u32, val: u32) {
    let shift = 30 - 2 * (x & 15);
    let word = &mut line[(x >> 4) as usize];
    *word = (*word & !(0x3 << shift)) | ((val & 0x3) << shift);
}

/// Get a 4-bit pixel value.
#[inline]
pub fn get_data_qbit(line: &[u32], x: u32) -> u32 {
    (line[(x >> 3) as usize] >> (28 - 4 * (x & 7))) & 0xF
}

/// Set a 4-bit pixel value.
#[inline]
pub fn set_data_qbit(line: &mut [u32], x: u32, val: u32) {
    let shift = 28 - 4 * (x & 7);
    let word = &mut line[(x >> 3) as usize];
    *word = (*word & !(0xF << shift)) | ((val & 0xF) << shift);
}

/// Get an 8-bit pixel value.
#[inline]
pub fn get_data_byte(line: &[u32], x: u32) -> u32 {
    (line[(x >> 2) as usize] >> (24 - 8 * (x & 3))) & 0xFF
}

/// Set an 8-bit pixel value.
#[inline]
pub fn set_data_byte(line: &mut [u32], x: u32, val: u32) {
    let shift = 24 - 8 * (x & 3);
    let word = &mut line[(x >> 2) as usize];
    *word = (*word & !(0xFF << shift)) | ((val & 0xFF) << shift);
}

/// Get a 16-bit pixel value.
#[inline]
pub fn get_data_two_bytes(line: &[u32], x: u32) -> u32 {
    (line[(x >> 1) as usize] >> (16 - 16 * (x & 1))) & 0xFFFF
}

/// Set a 16-bit pixel value.
#[inline]
pub fn set_data_two_bytes(line: &mut [u32], x: u32, val: u32) {
    let shift = 16 - 16 * (x & 1);
    let word = &mut line[(x >> 1) as usize];
    *word = (*word & !(0xFFFF << shift)) | ((val & 0xFFFF) << shift);
}

/// Get a pixel from a row at the given depth.
#[inline]
fn get_at_depth(line: &[u32], x: u32, depth: PixelDepth) -> u32 {
    match depth {
        PixelDepth::Bit1 => get_data_bit(line, x),
        PixelDepth::Bit2 => get_data_dibit(line, x),
        PixelDepth::Bit4 => get_data_qbit(line, x),
        PixelDepth::Bit8 => get_data_byte(line, x),
        PixelDepth::Bit16 => get_data_two_bytes(line, x),
        PixelDepth::Bit32 => line[x as usize],
    }
}

/// Set a pixel in a row at the given depth.
#[inline]
fn set_at_depth(line: &mut [u32], x: u32, depth: PixelDepth, val: u32) {
    match depth {
        PixelDepth::Bit1 => set_data_bit(line, x, val),
        PixelDepth::Bit2 => set_data_dibit(line, x, val),
        PixelDepth::Bit4 => set_data_qbit(line, x, val),
        PixelDepth::Bit8 => set_data_byte(line, x, val),
        PixelDepth::Bit16 => set_data_two_bytes(line, x, val),
        PixelDepth::Bit32 => line[x as usize] = val,
    }
}

impl Pix {
    /// Get a pixel value at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(get_at_depth(self.row_data(y), x, self.depth()))
    }
}

impl PixMut {
    /// Get a pixel value at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let start = (y * self.wpl()) as usize;
        let line = &self.data()[start..start + self.wpl() as usize];
        Some(get_at_depth(line, x, self.depth()))
    }

    /// Set a pixel value at (x, y).
    ///
    /// The value is masked to the pixel depth.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PixelOutOfBounds`] if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::PixelOutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        let depth = self.depth();
        set_at_depth(self.row_data_mut(y), x, depth, val);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_access() {
        let mut line = [0u32; 2];
        set_data_bit(&mut line, 0, 1);
        set_data_bit(&mut line, 33, 1);
        assert_eq!(line[0], 0x8000_0000);
        assert_eq!(line[1], 0x4000_0000);
        assert_eq!(get_data_bit(&line, 0), 1);
        assert_eq!(get_data_bit(&line, 1), 0);
        assert_eq!(get_data_bit(&line, 33), 1);

        set_data_bit(&mut line, 0, 0);
        assert_eq!(get_data_bit(&line, 0), 0);
    }

    #[test]
    fn test_byte_access_msb_first() {
        let mut line = [0u32; 1];
        set_data_byte(&mut line, 0, 0xAB);
        set_data_byte(&mut line, 3, 0xCD);
        assert_eq!(line[0], 0xAB00_00CD);
        assert_eq!(get_data_byte(&line, 0), 0xAB);
        assert_eq!(get_data_byte(&line, 3), 0xCD);
    }

    #[test]
    fn test_dibit_qbit_access() {
        let mut line = [0u32; 1];
        set_data_dibit(&mut line, 0, 3);
        assert_eq!(line[0], 0xC000_0000);
        set_data_qbit(&mut line, 7, 0xF);
        assert_eq!(get_data_qbit(&line, 7), 0xF);
        assert_eq!(line[0] & 0xF, 0xF);
    }

    #[test]
    fn test_two_bytes_access() {
        let mut line = [0u32; 1];
        set_data_two_bytes(&mut line, 0, 0x1234);
        set_data_two_bytes(&mut line, 1, 0x5678);
        assert_eq!(line[0], 0x1234_5678);
    }

    #[test]
    fn test_pix_get_set_pixel() {
        let pix = Pix::new(40, 3, PixelDepth::Bit1).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_pixel(39, 2, 1).unwrap();
        assert_eq!(pm.get_pixel(39, 2), Some(1));
        assert_eq!(pm.get_pixel(38, 2), Some(0));
        assert!(pm.set_pixel(40, 0, 1).is_err());

        let pix: Pix = pm.into();
        assert_eq!(pix.get_pixel(39, 2), Some(1));
        assert_eq!(pix.get_pixel(40, 2), None);
    }

    #[test]
    fn test_value_masked_to_depth() {
        let pix = Pix::new(10, 1, PixelDepth::Bit4).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_pixel(2, 0, 0x1F).unwrap();
        assert_eq!(pm.get_pixel(2, 0), Some(0xF));
    }
}
