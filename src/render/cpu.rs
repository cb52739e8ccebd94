use std::sync::Arc;

use crate::assets::decode::RasterImage;
use crate::assets::fonts::{FontBook, ShapedText};
use crate::compile::{DrawOp, TextMeasure, TextStyle, WatermarkPlan};
use crate::foundation::core::{Affine, CanvasGeometry};
use crate::foundation::error::{WatermarkError, WatermarkResult};
use crate::render::backend::DrawSurface;
use crate::render::composite::over_in_place;

/// CPU drawing surface backed by `vello_cpu`.
///
/// Holds the base image as premultiplied RGBA8. Each [`DrawSurface::execute`] renders the plan
/// into a fresh transparent layer and blends that layer over the pixels, so the base stays intact
/// underneath.
pub struct CpuSurface<'f> {
    geometry: CanvasGeometry,
    width: u16,
    height: u16,
    pixels: Vec<u8>,
    fonts: &'f mut FontBook,
}

impl std::fmt::Debug for CpuSurface<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("geometry", &self.geometry)
            .field("fonts", &self.fonts)
            .finish_non_exhaustive()
    }
}

/// Shaped text reused across consecutive ops with the same content and style.
struct TextCacheEntry {
    content: Arc<str>,
    style: Arc<TextStyle>,
    shaped: ShapedText,
}

struct ImageCacheEntry {
    source: Arc<RasterImage>,
    paint: vello_cpu::Image,
}

#[derive(Default)]
struct OpCaches {
    text: Option<TextCacheEntry>,
    image: Option<ImageCacheEntry>,
}

impl<'f> CpuSurface<'f> {
    /// Start a surface holding a copy of `base`, drawing text with faces from `fonts`.
    pub fn new(base: &RasterImage, fonts: &'f mut FontBook) -> WatermarkResult<Self> {
        let geometry = base.geometry()?;
        let width: u16 = geometry
            .width
            .try_into()
            .map_err(|_| WatermarkError::validation("surface width exceeds u16"))?;
        let height: u16 = geometry
            .height
            .try_into()
            .map_err(|_| WatermarkError::validation("surface height exceeds u16"))?;
        Ok(Self {
            geometry,
            width,
            height,
            pixels: base.premul_bytes().to_vec(),
            fonts,
        })
    }

    /// Current pixels, premultiplied RGBA8.
    pub fn premul_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Copy of the current pixels as a raster.
    pub fn snapshot(&self) -> WatermarkResult<RasterImage> {
        RasterImage::from_premul_parts(
            self.geometry.width,
            self.geometry.height,
            self.pixels.clone(),
        )
    }

    /// Current pixels as straight-alpha RGBA.
    pub fn to_rgba8(&self) -> WatermarkResult<image::RgbaImage> {
        Ok(self.snapshot()?.to_rgba8())
    }

    pub fn fonts(&self) -> &FontBook {
        &*self.fonts
    }

    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &DrawOp,
        caches: &mut OpCaches,
    ) -> WatermarkResult<()> {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let opacity = op.opacity();
        if opacity <= 0.0 {
            return Ok(());
        }

        match op {
            DrawOp::Text {
                content,
                style,
                transform,
                ..
            } => {
                let reuse = caches
                    .text
                    .as_ref()
                    .is_some_and(|c| *c.content == **content && *c.style == **style);
                if !reuse {
                    let shaped = self.fonts.shape(style, content)?;
                    caches.text = Some(TextCacheEntry {
                        content: content.clone(),
                        style: style.clone(),
                        shaped,
                    });
                }
                let Some(entry) = caches.text.as_ref() else {
                    return Ok(());
                };

                // Layout box centred on the op origin.
                let centre = Affine::translate((
                    -entry.shaped.width / 2.0,
                    -entry.shaped.height / 2.0,
                ));
                ctx.set_transform(affine_to_cpu(*transform * centre));

                if opacity < 1.0 {
                    ctx.push_opacity_layer(opacity);
                }
                for line in entry.shaped.layout.lines() {
                    for item in line.items() {
                        let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                            continue;
                        };

                        let brush = run.style().brush;
                        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                            brush.r, brush.g, brush.b, brush.a,
                        ));

                        // Positioned glyphs already carry the run offset and baseline.
                        let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                            id: g.id,
                            x: g.x,
                            y: g.y,
                        });
                        ctx.glyph_run(run.run().font())
                            .font_size(run.run().font_size())
                            .fill_glyphs(glyphs);
                    }
                }
                if opacity < 1.0 {
                    ctx.pop_layer();
                }
            }
            DrawOp::Image {
                image, transform, ..
            } => {
                let reuse = caches
                    .image
                    .as_ref()
                    .is_some_and(|c| Arc::ptr_eq(&c.source, image));
                if !reuse {
                    caches.image = Some(ImageCacheEntry {
                        source: image.clone(),
                        paint: image_paint(image)?,
                    });
                }
                let Some(entry) = caches.image.as_ref() else {
                    return Ok(());
                };

                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(entry.paint.clone());
                if opacity < 1.0 {
                    ctx.push_opacity_layer(opacity);
                }
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(image.width()),
                    f64::from(image.height()),
                ));
                if opacity < 1.0 {
                    ctx.pop_layer();
                }
            }
        }
        Ok(())
    }
}

impl TextMeasure for CpuSurface<'_> {
    fn text_width(&mut self, style: &TextStyle, content: &str) -> WatermarkResult<f64> {
        Ok(self.fonts.shape(style, content)?.width)
    }
}

impl DrawSurface for CpuSurface<'_> {
    fn geometry(&self) -> CanvasGeometry {
        self.geometry
    }

    #[tracing::instrument(skip_all, fields(ops = plan.len()))]
    fn execute(&mut self, plan: &WatermarkPlan) -> WatermarkResult<()> {
        if plan.geometry != self.geometry {
            return Err(WatermarkError::validation(
                "plan geometry does not match surface",
            ));
        }

        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);

        let mut caches = OpCaches::default();
        for op in &plan.ops {
            self.draw_op(&mut ctx, op, &mut caches)?;
        }
        ctx.flush();

        let mut layer = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut layer);

        over_in_place(&mut self.pixels, layer.data_as_u8_slice(), 1.0)?;
        tracing::debug!("watermark layer blended");
        Ok(())
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn image_paint(image: &RasterImage) -> WatermarkResult<vello_cpu::Image> {
    let pixmap = premul_bytes_to_pixmap(image.premul_bytes(), image.width(), image.height())?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> WatermarkResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| WatermarkError::validation("watermark image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| WatermarkError::validation("watermark image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(WatermarkError::validation(
            "watermark image byte length mismatch",
        ));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
