//! Watermark snapshot to draw-op compilation.

pub mod compiler;
pub mod plan;
pub mod tile;

pub use compiler::{TextMeasure, compile_watermark, effective_opacity};
pub use plan::{DrawOp, TextStyle, WatermarkPlan};
