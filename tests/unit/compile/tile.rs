use super::*;
use crate::foundation::core::{CanvasGeometry, Point};

fn centers(rule: &TileRule, step: Vec2, rotation: f64) -> Vec<Point> {
    let mut out = Vec::new();
    tile_field(rule, step, rotation, |t| out.push(t * Point::ZERO));
    out
}

#[test]
fn step_adds_gap_and_padding() {
    let s = tile_step(Size::new(30.0, 40.0), 50.0, TilePadding::TEXT);
    assert_eq!(s, Vec2::new(180.0, 190.0));
    let s = tile_step(Size::new(30.0, 40.0), 50.0, TilePadding::IMAGE);
    assert_eq!(s, Vec2::new(230.0, 240.0));
}

#[test]
fn negative_gap_counts_as_zero() {
    let s = tile_step(Size::new(10.0, 10.0), -500.0, TilePadding::TEXT);
    assert_eq!(s, Vec2::new(110.0, 110.0));
}

#[test]
fn unrotated_grid_spans_overdraw_region() {
    let g = CanvasGeometry::new(800, 800).unwrap();
    let rule = TileRule::covering(g);
    let pts = centers(&rule, Vec2::new(300.0, 300.0), 0.0);

    // -800, -500, ..., 1300 on each axis: 8 x 8.
    assert_eq!(pts.len(), 64);
    assert_eq!(pts[0], Point::new(-800.0, -800.0));
    assert_eq!(pts[1], Point::new(-800.0, -500.0));
    assert!(pts.iter().all(|p| p.x >= -800.0 && p.x < 1600.0));
    assert!(pts.iter().all(|p| p.y >= -800.0 && p.y < 1600.0));
}

#[test]
fn rotation_is_applied_to_the_whole_field_about_the_pivot() {
    let g = CanvasGeometry::new(400, 200).unwrap();
    let rule = TileRule::covering(g);
    let step = Vec2::new(150.0, 150.0);
    let flat = centers(&rule, step, 0.0);
    let turned = centers(&rule, step, 180.0);
    assert_eq!(flat.len(), turned.len());

    let pivot = g.center();
    for (a, b) in flat.iter().zip(&turned) {
        let reflected = Point::new(2.0 * pivot.x - a.x, 2.0 * pivot.y - a.y);
        assert!((reflected - *b).hypot() < 1e-9);
    }
}

#[test]
fn degenerate_step_draws_nothing() {
    let rule = TileRule::covering(CanvasGeometry::new(10, 10).unwrap());
    assert_eq!(tile_field(&rule, Vec2::new(0.0, 5.0), 0.0, |_| {}), 0);
    assert_eq!(tile_field(&rule, Vec2::new(f64::NAN, 5.0), 0.0, |_| {}), 0);
}
