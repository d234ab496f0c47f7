//! Canvas - RGBA pixel buffer with bounds-checked access

use crate::{RenderError, Result};

/// RGBA, 8 bits per channel
pub const BYTES_PER_PIXEL: usize = 4;

/// Fixed-size RGBA canvas, fully transparent when created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Canvas {
    /// Create a new canvas
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let invalid = || RenderError::InvalidSize { width, height };
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(invalid)?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| invalid())?;
        data.resize(len, 0);

        Ok(Self { width, height, data })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Check that the rectangle at (x, y) lies entirely on the canvas
    pub fn check_rect(&self, x: i64, y: i64, width: u32, rows: u32) -> Result<()> {
        let right = x + i64::from(width);
        let bottom = y + i64::from(rows);
        if x < 0 || y < 0 || right > i64::from(self.width) || bottom > i64::from(self.height) {
            // Report the first pixel that falls off
            let (bad_x, bad_y) = if x < 0 || y < 0 {
                (x, y)
            } else {
                (right.max(x + 1) - 1, bottom.max(y + 1) - 1)
            };
            return Err(self.violation(bad_x, bad_y));
        }
        Ok(())
    }

    /// Pixel at (x, y)
    pub fn pixel(&self, x: i64, y: i64) -> Result<[u8; 4]> {
        let index = self.index(x, y)?;
        let px = &self.data[index..index + BYTES_PER_PIXEL];
        Ok([px[0], px[1], px[2], px[3]])
    }

    /// Overwrite the pixel at (x, y)
    pub fn put_pixel(&mut self, x: i64, y: i64, rgba: [u8; 4]) -> Result<()> {
        let index = self.index(x, y)?;
        self.data[index..index + BYTES_PER_PIXEL].copy_from_slice(&rgba);
        Ok(())
    }

    /// `len` pixels of row `y` starting at column `x`
    pub fn span_mut(&mut self, x: i64, y: i64, len: u32) -> Result<&mut [u8]> {
        self.check_rect(x, y, len, 1)?;
        let start = self.index(x, y)?;
        let end = start + len as usize * BYTES_PER_PIXEL;
        Ok(&mut self.data[start..end])
    }

    /// Pixels with non-zero alpha in columns `[x0, x1)`
    pub fn inked_pixels(&self, x0: u32, x1: u32) -> usize {
        let x1 = x1.min(self.width);
        (0..self.height)
            .flat_map(|y| (x0..x1).map(move |x| (x, y)))
            .filter(|&(x, y)| {
                let index = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
                self.data[index + 3] != 0
            })
            .count()
    }

    fn index(&self, x: i64, y: i64) -> Result<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return Err(self.violation(x, y));
        }
        let index = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        if index + BYTES_PER_PIXEL > self.data.len() {
            return Err(self.violation(x, y));
        }
        Ok(index)
    }

    fn violation(&self, x: i64, y: i64) -> RenderError {
        RenderError::BoundsViolation {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}
