use crate::foundation::error::{WatermarkError, WatermarkResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Pixel dimensions of the base image.
///
/// The drawing surface is created at exactly this size and watermarking never resizes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CanvasGeometry {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasGeometry {
    /// Create a geometry with both sides non-zero.
    pub fn new(width: u32, height: u32) -> WatermarkResult<Self> {
        if width == 0 || height == 0 {
            return Err(WatermarkError::validation(
                "canvas width and height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }

    /// Canvas centre, the pivot for centred placement and tile-field rotation.
    pub fn center(self) -> Point {
        Point::new(self.width_f64() / 2.0, self.height_f64() / 2.0)
    }

    pub fn bounds(self) -> Rect {
        Rect::new(0.0, 0.0, self.width_f64(), self.height_f64())
    }

    /// Inclusive containment test against `[0, width] x [0, height]`.
    pub fn contains(self, p: Point) -> bool {
        (0.0..=self.width_f64()).contains(&p.x) && (0.0..=self.height_f64()).contains(&p.y)
    }

    /// Number of RGBA8 bytes needed to hold one full canvas.
    pub fn rgba8_len(self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Straight (non-premultiplied) RGBA8 colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::opaque(0, 0, 0);
    pub const WHITE: Self = Self::opaque(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
