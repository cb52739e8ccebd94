use crate::compile::{TextMeasure, WatermarkPlan, compile_watermark};
use crate::config::model::WatermarkConfig;
use crate::foundation::core::CanvasGeometry;
use crate::foundation::error::{WatermarkError, WatermarkResult};

/// A pixel surface that already holds the base image and can draw a compiled plan on top of it.
///
/// Surfaces measure text with the same fonts they draw with, so tile spacing matches what ends up
/// on screen.
pub trait DrawSurface: TextMeasure {
    fn geometry(&self) -> CanvasGeometry;

    /// Draw every op of `plan` over the current pixels.
    ///
    /// Implementations must not carry transform or opacity from one op to the next.
    fn execute(&mut self, plan: &WatermarkPlan) -> WatermarkResult<()>;
}

/// Composite one watermark onto `surface`, whose pixels span `geometry`.
///
/// Returns the number of draw operations issued. A plan with nothing to draw leaves the surface
/// untouched.
pub fn composite<S>(
    surface: &mut S,
    geometry: CanvasGeometry,
    config: &WatermarkConfig,
) -> WatermarkResult<usize>
where
    S: DrawSurface + ?Sized,
{
    if surface.geometry() != geometry {
        return Err(WatermarkError::validation(format!(
            "surface is {}x{}, composite asked for {}x{}",
            surface.geometry().width,
            surface.geometry().height,
            geometry.width,
            geometry.height
        )));
    }

    let plan = compile_watermark(geometry, config, &mut *surface)?;
    if plan.is_empty() {
        return Ok(0);
    }
    surface.execute(&plan)?;
    Ok(plan.len())
}
