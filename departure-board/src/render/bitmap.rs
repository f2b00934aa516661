//! One-bit frame buffer.

use std::convert::Infallible;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PointsIter, Rectangle};

/// A monochrome bitmap. `BinaryColor::On` is ink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl Bitmap {
    /// A blank bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at `(x, y)` is inked. Out of bounds is blank.
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.pixels[(y * self.width + x) as usize]
    }

    /// Number of inked pixels inside `area`.
    pub fn ink_in(&self, area: Rectangle) -> usize {
        area.points()
            .filter(|p| p.x >= 0 && p.y >= 0 && self.is_set(p.x as u32, p.y as u32))
            .count()
    }

    /// Encode as binary PBM (`P4`), ink as black.
    pub fn to_pbm(&self) -> Vec<u8> {
        let row_bytes = self.width.div_ceil(8) as usize;
        let mut out = format!("P4\n{} {}\n", self.width, self.height).into_bytes();
        out.reserve(row_bytes * self.height as usize);

        for row in self.pixels.chunks(self.width as usize) {
            let mut packed = vec![0u8; row_bytes];
            for (x, _) in row.iter().enumerate().filter(|(_, ink)| **ink) {
                packed[x / 8] |= 0x80 >> (x % 8);
            }
            out.extend_from_slice(&packed);
        }

        out
    }
}

impl OriginDimensions for Bitmap {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for Bitmap {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x < self.width && y < self.height {
                self.pixels[(y * self.width + x) as usize] = color.is_on();
            }
        }
        Ok(())
    }
}
