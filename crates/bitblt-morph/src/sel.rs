//! Structuring element (SEL) for morphological operations
//!
//! A structuring element defines the neighborhood used in morphological
//! operations. The origin (cx, cy) is the reference point; hit and miss
//! offsets are reported relative to it.

use crate::{MorphError, MorphResult};

/// Element type in a structuring element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SelElement {
    /// Ignored position
    #[default]
    DontCare = 0,
    /// Must match foreground
    Hit = 1,
    /// Must match background
    Miss = 2,
}

/// Structuring element
#[derive(Debug, Clone)]
pub struct Sel {
    width: u32,
    height: u32,
    cx: u32,
    cy: u32,
    data: Vec<SelElement>,
    name: Option<String>,
}

impl Sel {
    /// Create an empty (all don't-care) structuring element with the
    /// origin at the upper left.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidSel`] for zero dimensions.
    pub fn new(width: u32, height: u32) -> MorphResult<Self> {
        if width == 0 || height == 0 {
            return Err(MorphError::InvalidSel(format!(
                "zero dimensions: {width}x{height}"
            )));
        }
        Ok(Sel {
            width,
            height,
            cx: 0,
            cy: 0,
            data: vec![SelElement::DontCare; (width * height) as usize],
            name: None,
        })
    }

    /// Create a rectangular brick of all hits with a centered origin.
    pub fn create_brick(width: u32, height: u32) -> MorphResult<Self> {
        let mut sel = Sel::new(width, height)?;
        sel.cx = width / 2;
        sel.cy = height / 2;
        sel.data.fill(SelElement::Hit);
        Ok(sel)
    }

    /// Create a structuring element from a string pattern.
    ///
    /// Rows are separated by newlines; `x` is a hit, `o` a miss, and
    /// `.` (or space) a don't-care. All rows must have equal length,
    /// and the origin must lie inside the pattern.
    ///
    /// # Example
    ///
    /// ```
    /// use bitblt_morph::Sel;
    ///
    /// let corner = Sel::from_string("oo.\noxx\n.x.", 1, 1).unwrap();
    /// assert_eq!(corner.width(), 3);
    /// ```
    pub fn from_string(pattern: &str, origin_x: u32, origin_y: u32) -> MorphResult<Self> {
        let rows: Vec<&str> = pattern.lines().collect();
        let height = rows.len() as u32;
        if height == 0 {
            return Err(MorphError::InvalidSel("empty pattern".into()));
        }
        let width = rows[0].chars().count() as u32;

        let mut sel = Sel::new(width, height)?;
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() as u32 != width {
                return Err(MorphError::InvalidSel(format!(
                    "ragged pattern: row {y} has {} chars, expected {width}",
                    row.chars().count()
                )));
            }
            for (x, c) in row.chars().enumerate() {
                let elem = match c {
                    'x' => SelElement::Hit,
                    'o' => SelElement::Miss,
                    '.' | ' ' => SelElement::DontCare,
                    _ => {
                        return Err(MorphError::InvalidSel(format!(
                            "unexpected character {c:?} at ({x}, {y})"
                        )));
                    }
                };
                sel.data[y * width as usize + x] = elem;
            }
        }
        sel.set_origin(origin_x, origin_y)?;
        Ok(sel)
    }

    /// Get the width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the origin x coordinate.
    #[inline]
    pub fn origin_x(&self) -> u32 {
        self.cx
    }

    /// Get the origin y coordinate.
    #[inline]
    pub fn origin_y(&self) -> u32 {
        self.cy
    }

    /// Get the optional name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Move the origin.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidSel`] if the origin lies outside.
    pub fn set_origin(&mut self, cx: u32, cy: u32) -> MorphResult<()> {
        if cx >= self.width || cy >= self.height {
            return Err(MorphError::InvalidSel(format!(
                "origin ({cx}, {cy}) outside {}x{} element",
                self.width, self.height
            )));
        }
        self.cx = cx;
        self.cy = cy;
        Ok(())
    }

    /// Get the element at (x, y).
    pub fn element(&self, x: u32, y: u32) -> Option<SelElement> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[(y * self.width + x) as usize])
    }

    /// Set the element at (x, y).
    pub fn set_element(&mut self, x: u32, y: u32, elem: SelElement) -> MorphResult<()> {
        if x >= self.width || y >= self.height {
            return Err(MorphError::InvalidSel(format!(
                "position ({x}, {y}) outside {}x{} element",
                self.width, self.height
            )));
        }
        self.data[(y * self.width + x) as usize] = elem;
        Ok(())
    }

    /// Offsets of all hits relative to the origin.
    pub fn hit_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.offsets_of(SelElement::Hit)
    }

    /// Offsets of all misses relative to the origin.
    pub fn miss_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.offsets_of(SelElement::Miss)
    }

    fn offsets_of(&self, kind: SelElement) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (w, cx, cy) = (self.width as i32, self.cx as i32, self.cy as i32);
        self.data
            .iter()
            .enumerate()
            .filter(move |&(_, &e)| e == kind)
            .map(move |(i, _)| {
                let x = i as i32 % w;
                let y = i as i32 / w;
                (x - cx, y - cy)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_brick() {
        assert!(Sel::new(0, 3).is_err());

        let sel = Sel::new(3, 2).unwrap();
        assert_eq!(sel.hit_offsets().count(), 0);

        let brick = Sel::create_brick(3, 3).unwrap();
        assert_eq!(brick.origin_x(), 1);
        assert_eq!(brick.origin_y(), 1);
        assert_eq!(brick.hit_offsets().count(), 9);
        assert_eq!(brick.miss_offsets().count(), 0);

        let hits: Vec<_> = brick.hit_offsets().collect();
        assert!(hits.contains(&(-1, -1)));
        assert!(hits.contains(&(0, 0)));
        assert!(hits.contains(&(1, 1)));
    }

    #[test]
    fn test_from_string() {
        let sel = Sel::from_string("x.o\n.x.", 1, 0).unwrap();
        assert_eq!(sel.width(), 3);
        assert_eq!(sel.height(), 2);
        assert_eq!(sel.element(0, 0), Some(SelElement::Hit));
        assert_eq!(sel.element(2, 0), Some(SelElement::Miss));
        assert_eq!(sel.element(1, 0), Some(SelElement::DontCare));

        let hits: Vec<_> = sel.hit_offsets().collect();
        assert_eq!(hits, vec![(-1, 0), (0, 1)]);
        let misses: Vec<_> = sel.miss_offsets().collect();
        assert_eq!(misses, vec![(1, 0)]);
    }

    #[test]
    fn test_from_string_errors() {
        assert!(Sel::from_string("", 0, 0).is_err());
        assert!(Sel::from_string("xx\nx", 0, 0).is_err());
        assert!(Sel::from_string("xq", 0, 0).is_err());
        // Origin outside the pattern
        assert!(Sel::from_string("xx", 2, 0).is_err());
    }

    #[test]
    fn test_set_element_and_origin() {
        let mut sel = Sel::new(3, 3).unwrap();
        sel.set_element(2, 2, SelElement::Miss).unwrap();
        assert_eq!(sel.element(2, 2), Some(SelElement::Miss));
        assert!(sel.set_element(3, 0, SelElement::Hit).is_err());

        sel.set_origin(2, 2).unwrap();
        assert_eq!(sel.miss_offsets().collect::<Vec<_>>(), vec![(0, 0)]);
        assert!(sel.set_origin(3, 0).is_err());
    }
}
