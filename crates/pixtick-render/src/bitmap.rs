//! Packed 1-bit bitmaps.

use std::fmt;

use pixtick_types::{Color, Size};

use crate::error::DisplayError;
use crate::surface::Surface;

/// A 1-bit bitmap, rows packed MSB-first and padded to whole bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Bitmap {
    size: Size,
    stride: usize,
    data: Vec<u8>,
}

impl Bitmap {
    /// An all-clear bitmap.
    pub fn new(size: Size) -> Self {
        let stride = (size.width as usize).div_ceil(8);
        Self {
            size,
            stride,
            data: vec![0; stride * size.height as usize],
        }
    }

    /// Build a bitmap from ASCII art; `#` and `X` are set, anything else is
    /// clear. Width is the longest row.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut bitmap = Self::new(Size::new(width as u32, rows.len() as u32));
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if matches!(ch, '#' | 'X') {
                    bitmap.set(x as i32, y as i32, true);
                }
            }
        }
        bitmap
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Whether `(x, y)` is set. Out-of-bounds reads are clear.
    pub fn get(&self, x: i32, y: i32) -> bool {
        self.locate(x, y)
            .is_some_and(|(byte, mask)| self.data[byte] & mask != 0)
    }

    /// Set or clear `(x, y)`. Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: i32, y: i32, on: bool) {
        if let Some((byte, mask)) = self.locate(x, y) {
            if on {
                self.data[byte] |= mask;
            } else {
                self.data[byte] &= !mask;
            }
        }
    }

    pub fn fill(&mut self, on: bool) {
        self.data.fill(if on { 0xFF } else { 0 });
        if on {
            self.mask_padding();
        }
    }

    /// Number of set pixels.
    pub fn count_set(&self) -> usize {
        self.data.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Row-major iterator over the coordinates of set pixels.
    pub fn set_pixels(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (w, h) = (self.size.width_i32(), self.size.height_i32());
        (0..h).flat_map(move |y| (0..w).map(move |x| (x, y)).filter(|&(x, y)| self.get(x, y)))
    }

    /// Packed rows, `stride` bytes each.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    fn locate(&self, x: i32, y: i32) -> Option<(usize, u8)> {
        if !self.size.contains(x, y) {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        Some((y * self.stride + x / 8, 0x80 >> (x % 8)))
    }

    fn mask_padding(&mut self) {
        let tail = self.size.width as usize % 8;
        if tail == 0 || self.stride == 0 {
            return;
        }
        let mask = !(0xFFu8 >> tail);
        for row in self.data.chunks_mut(self.stride) {
            if let Some(last) = row.last_mut() {
                *last &= mask;
            }
        }
    }
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Bitmap({})", self.size)?;
        for y in 0..self.size.height_i32() {
            for x in 0..self.size.width_i32() {
                f.write_str(if self.get(x, y) { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Surface for Bitmap {
    fn size(&self) -> Size {
        self.size
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.set(x, y, color.is_on());
    }

    fn clear(&mut self) {
        self.fill(false);
    }

    fn present(&mut self) -> Result<(), DisplayError> {
        Ok(())
    }
}
