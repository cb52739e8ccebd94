use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::{Deserialize, Serialize};

use crate::assets::decode::{RasterImage, decode_image};
use crate::config::model::{
    ImagePayload, Payload, Placement, TextPayload, WatermarkConfig, WatermarkKind,
};
use crate::foundation::error::{WatermarkError, WatermarkResult};
use crate::placement::Position;

/// Editable image payload settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageSettings {
    /// Watermark image file, relative paths resolve against the settings file directory.
    pub source: Option<PathBuf>,
    pub scale: f64,
    pub opacity: f64,
    #[serde(alias = "rotation")]
    pub rotation_degrees: f64,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            source: None,
            scale: 50.0,
            opacity: 0.8,
            rotation_degrees: 0.0,
        }
    }
}

/// Full editable watermark state.
///
/// Holds both payloads so switching kind keeps the other one's values, but a render only ever
/// sees the active one through [`WatermarkSettings::snapshot`]. Mutation goes through
/// [`WatermarkSettings::reduce`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WatermarkSettings {
    #[serde(alias = "type")]
    pub kind: WatermarkKind,
    pub position: Position,
    #[serde(alias = "x")]
    pub custom_x: f64,
    #[serde(alias = "y")]
    pub custom_y: f64,
    #[serde(alias = "gap")]
    pub tile_gap: f64,
    pub text: TextPayload,
    pub image: ImageSettings,
}

impl Default for WatermarkSettings {
    fn default() -> Self {
        let placement = Placement::default();
        Self {
            kind: WatermarkKind::Text,
            position: placement.position,
            custom_x: placement.custom_x,
            custom_y: placement.custom_y,
            tile_gap: placement.tile_gap,
            text: TextPayload::default(),
            image: ImageSettings::default(),
        }
    }
}

/// One field of the text payload.
#[derive(Clone, Debug, PartialEq)]
pub enum TextField {
    Content(String),
    FontFamily(String),
    FontSize(f64),
    Color(String),
    Opacity(f64),
    Rotation(f64),
    Bold(bool),
    Italic(bool),
}

/// One field of the image payload.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageField {
    Source(Option<PathBuf>),
    Scale(f64),
    Opacity(f64),
    Rotation(f64),
}

/// Placement change.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlacementUpdate {
    /// Switch mode, keeping stored custom coordinates and gap.
    Mode(Position),
    /// Switch to custom placement at the given percentages.
    Custom { x: f64, y: f64 },
    /// Switch to tiling with the given gap.
    Tile { gap: f64 },
}

/// Typed settings edit.
///
/// `SetText` and `SetImage` only touch their payload while it is the active kind, so an edit can
/// never land on the payload the user is not looking at. `SetOpacity` and `SetRotation` always
/// target the active payload.
#[derive(Clone, Debug, PartialEq)]
pub enum SettingsAction {
    SetKind(WatermarkKind),
    SetText(TextField),
    SetImage(ImageField),
    SetPosition(PlacementUpdate),
    SetOpacity(f64),
    SetRotation(f64),
}

impl WatermarkSettings {
    /// Apply one action and return the new settings.
    pub fn reduce(mut self, action: SettingsAction) -> Self {
        match action {
            SettingsAction::SetKind(kind) => self.kind = kind,
            SettingsAction::SetText(field) => {
                if self.kind != WatermarkKind::Text {
                    tracing::debug!(?field, kind = ?self.kind, "ignoring text edit");
                    return self;
                }
                let text = &mut self.text;
                match field {
                    TextField::Content(v) => text.content = v,
                    TextField::FontFamily(v) => text.font_family = v,
                    TextField::FontSize(v) => text.font_size = v,
                    TextField::Color(v) => text.color = v,
                    TextField::Opacity(v) => text.opacity = v,
                    TextField::Rotation(v) => text.rotation_degrees = v,
                    TextField::Bold(v) => text.bold = v,
                    TextField::Italic(v) => text.italic = v,
                }
            }
            SettingsAction::SetImage(field) => {
                if self.kind != WatermarkKind::Image {
                    tracing::debug!(?field, kind = ?self.kind, "ignoring image edit");
                    return self;
                }
                let image = &mut self.image;
                match field {
                    ImageField::Source(v) => image.source = v,
                    ImageField::Scale(v) => image.scale = v,
                    ImageField::Opacity(v) => image.opacity = v,
                    ImageField::Rotation(v) => image.rotation_degrees = v,
                }
            }
            SettingsAction::SetPosition(update) => match update {
                PlacementUpdate::Mode(position) => self.position = position,
                PlacementUpdate::Custom { x, y } => {
                    self.position = Position::Custom;
                    self.custom_x = x;
                    self.custom_y = y;
                }
                PlacementUpdate::Tile { gap } => {
                    self.position = Position::Tile;
                    self.tile_gap = gap;
                }
            },
            SettingsAction::SetOpacity(v) => match self.kind {
                WatermarkKind::Text => self.text.opacity = v,
                WatermarkKind::Image => self.image.opacity = v,
                WatermarkKind::Unknown => {}
            },
            SettingsAction::SetRotation(v) => match self.kind {
                WatermarkKind::Text => self.text.rotation_degrees = v,
                WatermarkKind::Image => self.image.rotation_degrees = v,
                WatermarkKind::Unknown => {}
            },
        }
        self
    }

    pub fn placement(&self) -> Placement {
        Placement {
            position: self.position,
            custom_x: self.custom_x,
            custom_y: self.custom_y,
            tile_gap: self.tile_gap,
        }
    }

    /// Freeze the active payload into a render snapshot.
    ///
    /// `raster` is the decoded watermark image and is only used for the image kind.
    pub fn snapshot(&self, raster: Option<Arc<RasterImage>>) -> WatermarkConfig {
        let payload = match self.kind {
            WatermarkKind::Text => Payload::Text(self.text.clone()),
            WatermarkKind::Image => Payload::Image(ImagePayload {
                source: raster,
                scale: self.image.scale,
                opacity: self.image.opacity,
                rotation_degrees: self.image.rotation_degrees,
            }),
            WatermarkKind::Unknown => Payload::None,
        };
        WatermarkConfig {
            placement: self.placement(),
            payload,
        }
    }

    /// Decode the watermark image when the image kind is active and a source is set.
    pub fn load_image(&self, assets_root: &Path) -> WatermarkResult<Option<Arc<RasterImage>>> {
        if self.kind != WatermarkKind::Image {
            return Ok(None);
        }
        let Some(source) = &self.image.source else {
            return Ok(None);
        };
        let path = if source.is_absolute() {
            source.clone()
        } else {
            assets_root.join(source)
        };
        let bytes = std::fs::read(&path).map_err(|e| {
            WatermarkError::decode(format!("read watermark image '{}': {e}", path.display()))
        })?;
        Ok(Some(Arc::new(decode_image(&bytes)?)))
    }

    pub fn from_json_str(s: &str) -> WatermarkResult<Self> {
        serde_json::from_str(s).map_err(|e| WatermarkError::serde(format!("parse settings JSON: {e}")))
    }

    pub fn from_json_path(path: &Path) -> WatermarkResult<Self> {
        let f = File::open(path).map_err(|e| {
            WatermarkError::serde(format!("open settings '{}': {e}", path.display()))
        })?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| WatermarkError::serde(format!("parse settings JSON: {e}")))
    }

    pub fn to_json_pretty(&self) -> WatermarkResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| WatermarkError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/settings.rs"]
mod tests;
