//! ARGB raster buffers and source-over compositing.
//!
//! Pixels are packed `0xAARRGGBB` in row-major order. Figures and screen
//! images paint into an [`ArgbImage`]; capture reads the RGB bytes back out.

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;

use crate::geometry::IntCoords;

/// A packed `0xAARRGGBB` color.
pub type Argb = u32;

/// Errors from constructing raster buffers.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// The pixel vector does not hold `width * height` entries.
    #[error("pixel buffer holds {actual} pixels, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// Pack four channels into an ARGB value.
#[must_use]
pub fn argb(a: u8, r: u8, g: u8, b: u8) -> Argb {
    (u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Opaque color from RGB channels.
#[must_use]
pub fn rgb(r: u8, g: u8, b: u8) -> Argb {
    argb(0xff, r, g, b)
}

/// Split an ARGB value into `[a, r, g, b]`.
#[must_use]
pub fn channels(color: Argb) -> [u8; 4] {
    color.to_be_bytes()
}

/// Composite `src` over `dst` (straight alpha).
#[must_use]
pub fn source_over(src: Argb, dst: Argb) -> Argb {
    let [sa, sr, sg, sb] = channels(src);
    match sa {
        0xff => return src,
        0 => return dst,
        _ => {}
    }
    let [da, dr, dg, db] = channels(dst);
    let sa_f = f64::from(sa) / 255.0;
    let da_f = f64::from(da) / 255.0;
    let out_a = sa_f + da_f * (1.0 - sa_f);
    if out_a <= 0.0 {
        return 0;
    }
    let mix = |s: u8, d: u8| -> u8 {
        let v = (f64::from(s) * sa_f + f64::from(d) * da_f * (1.0 - sa_f)) / out_a;
        to_byte(v)
    };
    argb(to_byte(out_a * 255.0), mix(sr, dr), mix(sg, dg), mix(sb, db))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// A width × height buffer of ARGB pixels, initially fully transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgbImage {
    width: usize,
    height: usize,
    pixels: Vec<Argb>,
}

impl ArgbImage {
    /// Create a transparent image.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0; width * height] }
    }

    /// Create an image from row-major pixels.
    ///
    /// # Errors
    ///
    /// Returns `BufferSize` if `pixels.len() != width * height`.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Argb>) -> Result<Self, RasterError> {
        if pixels.len() != width * height {
            return Err(RasterError::BufferSize { expected: width * height, actual: pixels.len() });
        }
        Ok(Self { width, height, pixels })
    }

    /// An image filled with one color.
    #[must_use]
    pub fn filled(width: usize, height: usize, color: Argb) -> Self {
        Self { width, height, pixels: vec![color; width * height] }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> Option<Argb> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Overwrite the pixel at `(x, y)`. Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: usize, y: usize, color: Argb) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Composite `color` over the pixel at signed `(x, y)`. Clipped at the edges.
    pub fn blend(&mut self, x: i64, y: i64, color: Argb) {
        let (Ok(ux), Ok(uy)) = (usize::try_from(x), usize::try_from(y)) else {
            return;
        };
        if let Some(i) = self.index(ux, uy) {
            self.pixels[i] = source_over(color, self.pixels[i]);
        }
    }

    /// Composite `other` with its top-left corner at `origin`.
    #[allow(clippy::cast_possible_wrap)]
    pub fn draw_image(&mut self, other: &ArgbImage, origin: IntCoords) {
        for y in 0..other.height {
            for x in 0..other.width {
                let color = other.pixels[y * other.width + x];
                self.blend(i64::from(origin.x) + x as i64, i64::from(origin.y) + y as i64, color);
            }
        }
    }

    /// Row-major pixel slice.
    #[must_use]
    pub fn pixels(&self) -> &[Argb] {
        &self.pixels
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}
