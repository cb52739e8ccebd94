//! One full render: decode the upload, composite the watermark, encode the result.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::assets::decode::decode_image_with_format;
use crate::assets::fonts::FontBook;
use crate::config::settings::WatermarkSettings;
use crate::foundation::error::{WatermarkError, WatermarkResult};
use crate::render::{CpuSurface, DrawSurface, composite};

/// Prefix of the suggested download file name.
pub const DOWNLOAD_PREFIX: &str = "watermarked-";

/// Composited image plus the container format of the upload it came from.
#[derive(Clone, Debug)]
pub struct RenderedImage {
    pub image: RgbaImage,
    pub format: ImageFormat,
}

impl RenderedImage {
    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }

    /// Encode in the upload's format. Alpha is dropped for formats that cannot store it.
    pub fn encode(&self) -> WatermarkResult<Vec<u8>> {
        let img = if format_has_alpha(self.format) {
            DynamicImage::ImageRgba8(self.image.clone())
        } else {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(self.image.clone()).to_rgb8())
        };
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, self.format).map_err(|e| {
            WatermarkError::encode(format!("encode {}: {e}", self.mime_type()))
        })?;
        Ok(out.into_inner())
    }

    /// Encode and write to `path`.
    pub fn save(&self, path: &Path) -> WatermarkResult<()> {
        let bytes = self.encode()?;
        std::fs::write(path, bytes).map_err(|e| {
            WatermarkError::encode(format!("write '{}': {e}", path.display()))
        })
    }
}

fn format_has_alpha(format: ImageFormat) -> bool {
    !matches!(format, ImageFormat::Jpeg | ImageFormat::Pnm | ImageFormat::Hdr)
}

/// File name offered for download: `watermarked-` plus the upload's own file name.
pub fn download_name(original: &str) -> String {
    let name = Path::new(original)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image.png".to_string());
    format!("{DOWNLOAD_PREFIX}{name}")
}

/// Render `settings` over the encoded image `base_bytes`.
///
/// Relative watermark image paths resolve against `assets_root`. Each call starts from the
/// decoded base; nothing carries over from an earlier render.
#[tracing::instrument(skip(base_bytes, settings, fonts), fields(bytes = base_bytes.len()))]
pub fn render_watermarked(
    base_bytes: &[u8],
    settings: &WatermarkSettings,
    assets_root: &Path,
    fonts: &mut FontBook,
) -> WatermarkResult<RenderedImage> {
    let (base, format) = decode_image_with_format(base_bytes)?;
    let raster = settings.load_image(assets_root)?;
    let config = settings.snapshot(raster);

    let mut surface = CpuSurface::new(&base, fonts)?;
    let geometry = surface.geometry();
    let ops = composite(&mut surface, geometry, &config)?;
    tracing::info!(
        width = geometry.width,
        height = geometry.height,
        ops,
        format = ?format,
        "rendered watermark"
    );

    Ok(RenderedImage {
        image: surface.to_rgba8()?,
        format,
    })
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;
