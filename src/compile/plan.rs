use std::sync::Arc;

use crate::assets::color::fill_color;
use crate::assets::decode::RasterImage;
use crate::config::model::TextPayload;
use crate::foundation::core::{Affine, CanvasGeometry, Point, Rgba8};

/// Resolved text styling for one watermark.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub family: String,
    pub size_px: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: Rgba8,
}

impl TextStyle {
    pub fn from_payload(text: &TextPayload) -> Self {
        Self {
            family: text.font_family.clone(),
            size_px: text.font_size as f32,
            bold: text.bold,
            italic: text.italic,
            color: fill_color(&text.color),
        }
    }

    /// CSS `font` shorthand, e.g. `italic bold 48px "Arial"`.
    pub fn css_font(&self) -> String {
        let mut out = String::new();
        if self.italic {
            out.push_str("italic ");
        }
        if self.bold {
            out.push_str("bold ");
        }
        out.push_str(&format!("{}px \"{}\"", self.size_px, self.family));
        out
    }
}

/// One draw call against the surface.
///
/// Every op carries its complete local-to-canvas transform and opacity; executing an op never
/// depends on state left behind by a previous one.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// Fill a single line of text whose visual centre sits at the local origin.
    Text {
        content: Arc<str>,
        style: Arc<TextStyle>,
        transform: Affine,
        opacity: f32,
    },
    /// Draw a raster whose native pixel rectangle `(0, 0)..(w, h)` is mapped by `transform`.
    Image {
        image: Arc<RasterImage>,
        transform: Affine,
        opacity: f32,
    },
}

impl DrawOp {
    pub fn transform(&self) -> Affine {
        match self {
            Self::Text { transform, .. } | Self::Image { transform, .. } => *transform,
        }
    }

    pub fn opacity(&self) -> f32 {
        match self {
            Self::Text { opacity, .. } | Self::Image { opacity, .. } => *opacity,
        }
    }

    /// Canvas position of the drawn item's own centre.
    pub fn center(&self) -> Point {
        match self {
            Self::Text { transform, .. } => *transform * Point::ZERO,
            Self::Image {
                image, transform, ..
            } => {
                let size = image.size();
                *transform * Point::new(size.width / 2.0, size.height / 2.0)
            }
        }
    }
}

/// Ordered draw operations for one watermark render.
#[derive(Clone, Debug, PartialEq)]
pub struct WatermarkPlan {
    pub geometry: CanvasGeometry,
    pub ops: Vec<DrawOp>,
}

impl WatermarkPlan {
    pub fn empty(geometry: CanvasGeometry) -> Self {
        Self {
            geometry,
            ops: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }
}
