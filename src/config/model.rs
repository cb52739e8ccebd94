use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::assets::decode::RasterImage;
use crate::placement::Position;

/// Which payload a watermark uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatermarkKind {
    #[default]
    Text,
    Image,
    /// Any other value; renders nothing.
    #[serde(other)]
    Unknown,
}

/// Placement fields shared by both payload kinds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub position: Position,
    /// Percent of canvas width, used only by [`Position::Custom`].
    pub custom_x: f64,
    /// Percent of canvas height, used only by [`Position::Custom`].
    pub custom_y: f64,
    /// Extra spacing between tiles, used only by [`Position::Tile`].
    pub tile_gap: f64,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Position::Center,
            custom_x: 50.0,
            custom_y: 50.0,
            tile_gap: 50.0,
        }
    }
}

/// Text payload. Shared verbatim between editable settings and render snapshots.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextPayload {
    /// Text to draw; empty draws nothing.
    pub content: String,
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// CSS colour string.
    pub color: String,
    /// `0.0..=1.0`; out-of-range values clamp at draw time.
    pub opacity: f64,
    #[serde(alias = "rotation")]
    pub rotation_degrees: f64,
    #[serde(alias = "isBold")]
    pub bold: bool,
    #[serde(alias = "isItalic")]
    pub italic: bool,
}

impl Default for TextPayload {
    fn default() -> Self {
        Self {
            content: "CONFIDENTIAL".to_string(),
            font_family: "Arial".to_string(),
            font_size: 48.0,
            color: "#ffffff".to_string(),
            opacity: 0.8,
            rotation_degrees: 0.0,
            bold: true,
            italic: false,
        }
    }
}

/// Image payload of a render snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct ImagePayload {
    /// Decoded watermark raster; `None` while nothing has been loaded.
    pub source: Option<Arc<RasterImage>>,
    /// Percent where `50` is native pixel size.
    pub scale: f64,
    pub opacity: f64,
    pub rotation_degrees: f64,
}

/// The active payload of a snapshot. Only the payload selected by the kind is ever present.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    Text(TextPayload),
    Image(ImagePayload),
    /// Unknown kind: nothing is drawn.
    None,
}

impl Payload {
    pub fn kind(&self) -> WatermarkKind {
        match self {
            Self::Text(_) => WatermarkKind::Text,
            Self::Image(_) => WatermarkKind::Image,
            Self::None => WatermarkKind::Unknown,
        }
    }
}

/// Immutable render snapshot consumed by the compositor.
#[derive(Clone, Debug, PartialEq)]
pub struct WatermarkConfig {
    pub placement: Placement,
    pub payload: Payload,
}

impl WatermarkConfig {
    pub fn text(placement: Placement, text: TextPayload) -> Self {
        Self {
            placement,
            payload: Payload::Text(text),
        }
    }

    pub fn image(placement: Placement, image: ImagePayload) -> Self {
        Self {
            placement,
            payload: Payload::Image(image),
        }
    }

    pub fn kind(&self) -> WatermarkKind {
        self.payload.kind()
    }
}
