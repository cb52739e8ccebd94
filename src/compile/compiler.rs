use std::sync::Arc;

use crate::compile::plan::{DrawOp, TextStyle, WatermarkPlan};
use crate::compile::tile::{TilePadding, tile_field, tile_step};
use crate::config::model::{ImagePayload, Payload, Placement, TextPayload, WatermarkConfig};
use crate::foundation::core::{Affine, CanvasGeometry, Size};
use crate::foundation::error::WatermarkResult;
use crate::placement::{Anchor, resolve};

/// Source of rendered text widths, supplied by the drawing surface that will draw the text.
pub trait TextMeasure {
    /// Advance width of `content` laid out as a single line in `style`.
    fn text_width(&mut self, style: &TextStyle, content: &str) -> WatermarkResult<f64>;
}

/// Compile a watermark snapshot into the draw operations for a canvas of `geometry`.
///
/// Pure apart from text measurement. Payloads that cannot produce visible pixels (empty text,
/// missing raster, zero opacity, non-positive size, unknown kind) compile to an empty plan.
#[tracing::instrument(skip(config, measure), fields(kind = ?config.kind()))]
pub fn compile_watermark<M>(
    geometry: CanvasGeometry,
    config: &WatermarkConfig,
    measure: &mut M,
) -> WatermarkResult<WatermarkPlan>
where
    M: TextMeasure + ?Sized,
{
    let mut plan = WatermarkPlan::empty(geometry);
    match &config.payload {
        Payload::Text(text) => {
            compile_text(geometry, &config.placement, text, measure, &mut plan)?;
        }
        Payload::Image(image) => compile_image(geometry, &config.placement, image, &mut plan),
        Payload::None => tracing::debug!("unknown watermark kind, nothing to draw"),
    }
    tracing::debug!(ops = plan.len(), "compiled watermark plan");
    Ok(plan)
}

/// Drawing-surface alpha semantics: clamp into `[0, 1]`, ignore NaN (alpha stays at 1).
pub fn effective_opacity(opacity: f64) -> f32 {
    if opacity.is_nan() {
        return 1.0;
    }
    opacity.clamp(0.0, 1.0) as f32
}

fn finite_degrees(degrees: f64) -> f64 {
    if degrees.is_finite() { degrees } else { 0.0 }
}

fn rotation(degrees: f64) -> Affine {
    Affine::rotate(finite_degrees(degrees).to_radians())
}

fn compile_text<M>(
    geometry: CanvasGeometry,
    placement: &Placement,
    text: &TextPayload,
    measure: &mut M,
    plan: &mut WatermarkPlan,
) -> WatermarkResult<()>
where
    M: TextMeasure + ?Sized,
{
    if text.content.is_empty() {
        return Ok(());
    }
    let opacity = effective_opacity(text.opacity);
    if opacity <= 0.0 || !text.font_size.is_finite() || text.font_size <= 0.0 {
        return Ok(());
    }

    let style = Arc::new(TextStyle::from_payload(text));
    let content: Arc<str> = Arc::from(text.content.as_str());
    tracing::debug!(font = %style.css_font(), "text watermark");

    let mut push = |transform: Affine| {
        plan.ops.push(DrawOp::Text {
            content: content.clone(),
            style: style.clone(),
            transform,
            opacity,
        });
    };

    match resolve(
        geometry,
        placement.position,
        placement.custom_x,
        placement.custom_y,
    ) {
        Anchor::Point(p) => {
            push(Affine::translate(p.to_vec2()) * rotation(text.rotation_degrees));
        }
        Anchor::Tile(rule) => {
            let width = measure.text_width(&style, &content)?;
            // Line-height metrics vary by font; the font size stands in for glyph height.
            let instance = Size::new(width, text.font_size);
            let step = tile_step(instance, placement.tile_gap, TilePadding::TEXT);
            tile_field(&rule, step, finite_degrees(text.rotation_degrees), push);
        }
    }
    Ok(())
}

fn compile_image(
    geometry: CanvasGeometry,
    placement: &Placement,
    image: &ImagePayload,
    plan: &mut WatermarkPlan,
) {
    let Some(raster) = &image.source else {
        tracing::debug!("watermark image not loaded, nothing to draw");
        return;
    };
    let opacity = effective_opacity(image.opacity);
    if opacity <= 0.0 || raster.width() == 0 || raster.height() == 0 {
        return;
    }

    let native = raster.size();
    let factor = image.scale / 50.0;
    let draw = Size::new(native.width * factor, native.height * factor);
    if !(draw.width.is_finite() && draw.height.is_finite() && draw.width > 0.0 && draw.height > 0.0)
    {
        tracing::debug!(scale = image.scale, "non-positive watermark size, nothing to draw");
        return;
    }

    // Native pixel rect -> draw size, centred on the local origin.
    let local = Affine::translate((-draw.width / 2.0, -draw.height / 2.0))
        * Affine::scale_non_uniform(draw.width / native.width, draw.height / native.height);

    let mut push = |transform: Affine| {
        plan.ops.push(DrawOp::Image {
            image: raster.clone(),
            transform: transform * local,
            opacity,
        });
    };

    match resolve(
        geometry,
        placement.position,
        placement.custom_x,
        placement.custom_y,
    ) {
        Anchor::Point(p) => {
            push(Affine::translate(p.to_vec2()) * rotation(image.rotation_degrees));
        }
        Anchor::Tile(rule) => {
            let step = tile_step(draw, placement.tile_gap, TilePadding::IMAGE);
            tile_field(&rule, step, finite_degrees(image.rotation_degrees), push);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/compiler.rs"]
mod tests;
