//! Photomark composites a text or image watermark onto a photograph.
//!
//! The pipeline for one render:
//!
//! - Edit a [`WatermarkSettings`] through [`SettingsAction`]s
//! - Freeze it into a [`WatermarkConfig`] snapshot
//! - [`compile_watermark`] resolves placement and emits a [`WatermarkPlan`] of draw ops
//! - A [`DrawSurface`] (the CPU one is [`CpuSurface`]) draws the plan over the base image
//!
//! [`render_watermarked`] runs all of it on encoded bytes and hands back an image ready to be
//! encoded in the upload's format.
#![forbid(unsafe_code)]

pub mod assets;
pub mod compile;
pub mod config;
pub mod foundation;
pub mod placement;
pub mod render;
pub mod session;
pub mod suggest;

pub use crate::assets::decode::{RasterImage, decode_image};
pub use crate::assets::fonts::{FONTS, FontBook};
pub use crate::compile::{DrawOp, TextMeasure, TextStyle, WatermarkPlan, compile_watermark};
pub use crate::config::model::{
    ImagePayload, Payload, Placement, TextPayload, WatermarkConfig, WatermarkKind,
};
pub use crate::config::settings::{
    ImageField, ImageSettings, PlacementUpdate, SettingsAction, TextField, WatermarkSettings,
};
pub use crate::foundation::core::{Affine, CanvasGeometry, Point, Rgba8, Size, Vec2};
pub use crate::foundation::error::{WatermarkError, WatermarkResult};
pub use crate::placement::{Anchor, Position, TileRule, resolve};
pub use crate::render::{CpuSurface, DrawSurface, composite};
pub use crate::session::{RenderedImage, download_name, render_watermarked};
pub use crate::suggest::{CaptionSuggester, FALLBACK_CAPTION, suggest_caption};
