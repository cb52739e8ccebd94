use std::sync::Arc;

use image::{ImageFormat, RgbaImage};

use crate::foundation::core::{CanvasGeometry, Size};
use crate::foundation::error::{WatermarkError, WatermarkResult};

/// Decoded raster in premultiplied RGBA8 form.
///
/// Used both for the base photograph and for image watermarks. Pixel data is shared, so cloning
/// is cheap and a single decoded watermark can back every tile instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
}

impl RasterImage {
    /// Wrap an already premultiplied buffer; the length must match the dimensions.
    pub fn from_premul_parts(width: u32, height: u32, rgba8_premul: Vec<u8>) -> WatermarkResult<Self> {
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(WatermarkError::validation(
                "raster byte length does not match its dimensions",
            ));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Take ownership of a straight-alpha RGBA8 image and premultiply it.
    pub fn from_rgba8(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut rgba8_premul = img.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);
        Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Native size in pixels as floating point.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }

    /// Geometry of a canvas sized to this raster.
    pub fn geometry(&self) -> WatermarkResult<CanvasGeometry> {
        CanvasGeometry::new(self.width, self.height)
    }

    pub fn premul_bytes(&self) -> &[u8] {
        self.rgba8_premul.as_slice()
    }

    /// Convert back to a straight-alpha image for encoding.
    pub fn to_rgba8(&self) -> RgbaImage {
        let mut straight = self.rgba8_premul.as_ref().clone();
        unpremultiply_rgba8_in_place(&mut straight);
        RgbaImage::from_raw(self.width, self.height, straight)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }
}

/// Decode an encoded image (any format the `image` crate reads) into a premultiplied raster.
pub fn decode_image(bytes: &[u8]) -> WatermarkResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| WatermarkError::decode(format!("decode image from memory: {e}")))?;
    Ok(RasterImage::from_rgba8(dyn_img.to_rgba8()))
}

/// Decode an image and report the container format it was stored in.
pub fn decode_image_with_format(bytes: &[u8]) -> WatermarkResult<(RasterImage, ImageFormat)> {
    let format = image::guess_format(bytes)
        .map_err(|e| WatermarkError::decode(format!("detect image format: {e}")))?;
    let raster = decode_image(bytes)?;
    Ok((raster, format))
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u32::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
