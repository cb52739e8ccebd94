use crate::foundation::core::{Affine, Size, Vec2};
use crate::placement::TileRule;

/// Fixed spacing added on top of the user gap between tile instances.
///
/// Keeps neighbouring tiles apart even with a zero gap. Text and image tiles use different
/// densities on purpose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePadding(pub f64);

impl TilePadding {
    pub const TEXT: Self = Self(100.0);
    pub const IMAGE: Self = Self(150.0);
}

/// Horizontal and vertical distance between neighbouring tile centres.
pub fn tile_step(instance: Size, gap: f64, padding: TilePadding) -> Vec2 {
    let gap = if gap.is_finite() { gap.max(0.0) } else { 0.0 };
    Vec2::new(
        instance.width + gap + padding.0,
        instance.height + gap + padding.0,
    )
}

/// Lay out a rotated tile field and hand each instance transform to `draw_one`.
///
/// The field is rotated as a whole about the rule's pivot; instances are not rotated
/// individually. Each transform maps the instance's local origin (its centre) to canvas space.
/// Columns are visited left to right, each column top to bottom. Returns the instance count.
pub fn tile_field(
    rule: &TileRule,
    step: Vec2,
    rotation_degrees: f64,
    mut draw_one: impl FnMut(Affine),
) -> usize {
    if !(step.x.is_finite() && step.y.is_finite() && step.x > 0.0 && step.y > 0.0) {
        tracing::debug!(?step, "degenerate tile step, nothing to draw");
        return 0;
    }

    let field = Affine::rotate_about(rotation_degrees.to_radians(), rule.pivot);
    let mut count = 0;
    let mut x = rule.origin.x;
    while x < rule.limit.x {
        let mut y = rule.origin.y;
        while y < rule.limit.y {
            draw_one(field * Affine::translate((x, y)));
            count += 1;
            y += step.y;
        }
        x += step.x;
    }
    count
}

#[cfg(test)]
#[path = "../../tests/unit/compile/tile.rs"]
mod tests;
