//! Placement resolution: where on the canvas a watermark goes.
//!
//! Every [`Position`] value resolves to something drawable. Unknown positions resolve to the
//! canvas origin instead of failing, so corrupt settings never stop a render.

use serde::{Deserialize, Serialize};

use crate::foundation::core::{CanvasGeometry, Point};

/// Corner inset as a fraction of the shorter canvas side.
pub const CORNER_MARGIN_RATIO: f64 = 0.05;

/// Placement mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// Percentage coordinates from `customX` / `customY`.
    Custom,
    /// Repeating grid across the whole canvas.
    Tile,
    /// Any value not listed above.
    #[serde(other)]
    Unknown,
}

impl Position {
    /// Parse a kebab-case position name; anything unrecognised maps to [`Position::Unknown`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "center" | "centre" => Self::Center,
            "top-left" => Self::TopLeft,
            "top-right" => Self::TopRight,
            "bottom-left" => Self::BottomLeft,
            "bottom-right" => Self::BottomRight,
            "custom" => Self::Custom,
            "tile" => Self::Tile,
            _ => Self::Unknown,
        }
    }

    pub fn is_tile(self) -> bool {
        self == Self::Tile
    }
}

/// Generating rule for tile placement.
///
/// Tile centres start at `origin` and advance by the payload-specific step while they stay below
/// `limit` on each axis. The whole field is rotated about `pivot`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileRule {
    pub origin: Point,
    pub limit: Point,
    pub pivot: Point,
}

impl TileRule {
    /// Rule covering one full canvas of overdraw on every side, so a rotated field still reaches
    /// every corner.
    pub fn covering(geometry: CanvasGeometry) -> Self {
        let (w, h) = (geometry.width_f64(), geometry.height_f64());
        Self {
            origin: Point::new(-w, -h),
            limit: Point::new(2.0 * w, 2.0 * h),
            pivot: geometry.center(),
        }
    }
}

/// Result of placement resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// Single reference point; the watermark is centred and rotated about it.
    Point(Point),
    /// Repeating grid.
    Tile(TileRule),
}

impl Anchor {
    pub fn point(self) -> Option<Point> {
        match self {
            Self::Point(p) => Some(p),
            Self::Tile(_) => None,
        }
    }
}

/// Corner inset: 5% of the shorter side, never more than half of either side.
pub fn corner_margin(geometry: CanvasGeometry) -> f64 {
    let (w, h) = (geometry.width_f64(), geometry.height_f64());
    (w.min(h) * CORNER_MARGIN_RATIO).min(w / 2.0).min(h / 2.0)
}

/// Resolve a placement mode to an anchor in canvas space.
///
/// `custom_x` / `custom_y` are percentages and only matter for [`Position::Custom`]. Values
/// outside `0..=100` produce off-canvas anchors; non-finite values count as `0`.
pub fn resolve(geometry: CanvasGeometry, position: Position, custom_x: f64, custom_y: f64) -> Anchor {
    let (w, h) = (geometry.width_f64(), geometry.height_f64());
    let m = corner_margin(geometry);

    let p = match position {
        Position::Center => geometry.center(),
        Position::TopLeft => Point::new(m, m),
        Position::TopRight => Point::new(w - m, m),
        Position::BottomLeft => Point::new(m, h - m),
        Position::BottomRight => Point::new(w - m, h - m),
        Position::Custom => Point::new(
            finite_or_zero(custom_x) / 100.0 * w,
            finite_or_zero(custom_y) / 100.0 * h,
        ),
        Position::Tile => return Anchor::Tile(TileRule::covering(geometry)),
        Position::Unknown => {
            tracing::debug!("unknown watermark position, anchoring at origin");
            Point::ZERO
        }
    };
    Anchor::Point(p)
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

#[cfg(test)]
#[path = "../tests/unit/placement.rs"]
mod tests;
