/// Braille Unicode canvas used for district outlines.
/// Each character cell holds a 2x4 dot grid; the outline layer is drawn on
/// top of the per-cell fill colours, so cells are read back one at a time.
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    dots: Vec<u8>, // One bit pattern per cell, row-major
}

impl BrailleCanvas {
    /// Create a canvas with the given character dimensions.
    /// Pixel resolution is width*2 x height*4.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            dots: vec![0u8; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Set a dot at pixel coordinates.
    /// Dot layout per character:
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    pub fn set_pixel(&mut self, x: usize, y: usize) {
        let (cx, cy) = (x / 2, y / 4);
        if cx >= self.width || cy >= self.height {
            return;
        }

        const BITS: [[u8; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];
        self.dots[cy * self.width + cx] |= BITS[x % 2][y % 4];
    }

    /// Set a dot using signed coordinates (negative values are off-canvas)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize);
        }
    }

    /// Braille glyph for a cell, `None` when no dot is set
    pub fn glyph(&self, col: usize, row: usize) -> Option<char> {
        if col >= self.width || row >= self.height {
            return None;
        }
        match self.dots[row * self.width + col] {
            0 => None,
            bits => char::from_u32(0x2800 + bits as u32),
        }
    }

    /// Render the canvas as lines of Braille characters
    #[cfg(test)]
    pub fn to_string(&self) -> String {
        (0..self.height)
            .map(|row| {
                (0..self.width)
                    .map(|col| self.glyph(col, row).unwrap_or('\u{2800}'))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pixel() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_pixel(0, 0);
        assert_eq!(canvas.to_string(), "⠁");
    }

    #[test]
    fn test_all_dots() {
        let mut canvas = BrailleCanvas::new(1, 1);
        for x in 0..2 {
            for y in 0..4 {
                canvas.set_pixel(x, y);
            }
        }
        assert_eq!(canvas.glyph(0, 0), Some('⣿'));
    }

    #[test]
    fn test_diagonal_spans_cells() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.set_pixel(0, 0);
        canvas.set_pixel(1, 1);
        canvas.set_pixel(2, 2);
        canvas.set_pixel(3, 3);
        // First cell: 0x01 | 0x10, second cell: 0x04 | 0x80
        assert_eq!(canvas.to_string(), "⠑⢄");
    }

    #[test]
    fn test_empty_and_out_of_bounds() {
        let mut canvas = BrailleCanvas::new(2, 2);
        canvas.set_pixel(100, 100);
        canvas.set_pixel_signed(-1, 3);
        assert_eq!(canvas.glyph(0, 0), None);
        assert_eq!(canvas.glyph(5, 0), None);
        assert_eq!((canvas.width(), canvas.height()), (2, 2));
    }
}
