//! Source-texture storage and bilinear sampling.

use std::fmt;

use crate::color::Rgba;

/// A decoded source image: RGBA texels plus the average color substituted
/// whenever a sample falls off the grid.
#[derive(Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    average: Rgba,
}

impl Texture {
    /// `None` if the buffer length does not match the dimensions.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        let average = average_color(&pixels);
        Some(Self {
            width,
            height,
            pixels,
            average,
        })
    }

    pub fn from_rgba8(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        let average = average_color(&pixels);
        Self {
            width,
            height,
            pixels,
            average,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn average(&self) -> Rgba {
        self.average
    }

    fn texel(&self, x: u32, y: u32) -> Rgba {
        let idx = ((y * self.width + x) * 4) as usize;
        Rgba::new(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        )
    }

    /// Bilinear sample at fractional texel coordinates; exact on integer
    /// coordinates, `None` when any of the four source texels is off grid.
    pub fn bilinear(&self, x: f64, y: f64) -> Option<Rgba> {
        let (xf, yf) = (x.floor(), y.floor());
        if xf < 0.0 || yf < 0.0 {
            return None;
        }
        let (x1, y1) = (xf as u32, yf as u32);
        let (x2, y2) = (x1 + 1, y1 + 1);
        if x2 >= self.width || y2 >= self.height {
            return None;
        }
        let left = Rgba::lerp(self.texel(x1, y1), self.texel(x1, y2), y - yf);
        let right = Rgba::lerp(self.texel(x2, y1), self.texel(x2, y2), y - yf);
        Some(Rgba::lerp(left, right, x - xf))
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("average", &self.average)
            .finish_non_exhaustive()
    }
}

fn average_color(pixels: &[u8]) -> Rgba {
    let count = (pixels.len() / 4).max(1) as u64;
    let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
    for px in pixels.chunks_exact(4) {
        r += u64::from(px[0]);
        g += u64::from(px[1]);
        b += u64::from(px[2]);
    }
    Rgba::opaque((r / count) as u8, (g / count) as u8, (b / count) as u8)
}
