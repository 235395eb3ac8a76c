use super::*;
use crate::foundation::core::{NodeId, Point};
use crate::foundation::math;
use crate::scene::node::{NodeKind, ShapeKind};
use crate::style::color::Rgb;
use crate::style::paint::SolidPaint;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn snapshot(kind: NodeKind) -> ShapeSnapshot {
    ShapeSnapshot {
        node: NodeId(1),
        kind,
        transform: Affine::translate((10.0, 20.0)),
        size: Size::new(40.0, 30.0),
        style: NodeStyle {
            opacity: 0.8,
            fill: Some(SolidPaint::opaque(Rgb::WHITE)),
            stroke: None,
            stroke_weight: Some(1.0),
        },
    }
}

fn rect() -> ShapeSnapshot {
    snapshot(NodeKind::Shape(ShapeKind::Rectangle))
}

#[test]
fn translation_accumulates_per_iteration() {
    let config = IterationConfig {
        dx: Some(10.0),
        dy: Some(-3.0),
        ..IterationConfig::new(5)
    };
    let s = IterationState::compute(&rect(), &config, 3);
    assert_eq!(s.transform.translation().to_point(), Point::new(40.0, 11.0));
    assert_eq!(s.size, Size::new(40.0, 30.0));
    assert_eq!(s.rotation_delta, None);
}

#[test]
fn scaling_recenters_symmetrically() {
    let base = rect();
    let config = IterationConfig {
        d_scale_width: Some(4.0),
        d_scale_height: Some(-2.0),
        ..IterationConfig::new(5)
    };
    let s = IterationState::compute(&base, &config, 2);
    assert_eq!(s.size, Size::new(48.0, 26.0));
    assert_eq!(s.transform.translation().to_point(), Point::new(6.0, 22.0));

    let center = |t: Affine, size: Size| t * Point::new(size.width / 2.0, size.height / 2.0);
    assert_eq!(center(s.transform, s.size), center(base.transform, base.size));
}

#[test]
fn rotation_step_scales_with_iteration_and_keeps_base_rotation() {
    let mut base = rect();
    base.transform = Affine::translate((10.0, 20.0)) * math::rotation(30.0);
    let config = IterationConfig {
        d_rotation_degrees: Some(7.5),
        ..IterationConfig::new(5)
    };
    let s = IterationState::compute(&base, &config, 4);
    assert_eq!(s.rotation_delta, Some(30.0));
    assert!(close(math::rotation_degrees(s.transform), 30.0));
    assert_eq!(s.pivot, Pivot::CENTER);
}

#[test]
fn unset_ramps_keep_base_style() {
    let base = rect();
    let s = IterationState::compute(&base, &IterationConfig::new(4), 2);
    assert_eq!(s.style, base.style);
}

#[test]
fn constants_and_ramps_drive_style() {
    let config = IterationConfig {
        opacity: Some(1.0),
        opacity_end: Some(0.0),
        fill_color: Some(SolidPaint::opaque(Rgb::new(1.0, 0.0, 0.0))),
        fill_color_end: Some(SolidPaint::opaque(Rgb::new(0.0, 0.0, 1.0))),
        stroke_color: Some(SolidPaint::opaque(Rgb::BLACK)),
        stroke_weight_end: Some(5.0),
        ..IterationConfig::new(5)
    };
    let s = IterationState::compute(&rect(), &config, 2);
    assert_eq!(s.style.opacity, 0.5);
    assert_eq!(
        s.style.fill,
        Some(SolidPaint::opaque(Rgb::new(0.5, 0.0, 0.5)))
    );
    assert_eq!(s.style.stroke, Some(SolidPaint::opaque(Rgb::BLACK)));
    // No start: ramps from the base weight of 1.
    assert_eq!(s.style.stroke_weight, Some(3.0));
}

#[test]
fn groups_only_take_opacity() {
    let base = snapshot(NodeKind::Group);
    let config = IterationConfig {
        opacity: Some(0.4),
        fill_color: Some(SolidPaint::opaque(Rgb::BLACK)),
        stroke_weight: Some(9.0),
        ..IterationConfig::new(3)
    };
    let s = IterationState::compute(&base, &config, 1);
    assert_eq!(s.style.opacity, 0.4);
    assert_eq!(s.style.fill, base.style.fill);
    assert_eq!(s.style.stroke_weight, base.style.stroke_weight);

    let b = base_style(&base, &config);
    assert_eq!(b.opacity, 0.4);
    assert_eq!(b.fill, base.style.fill);
}

#[test]
fn base_takes_starts_and_constants() {
    let config = IterationConfig {
        opacity: Some(0.9),
        opacity_end: Some(0.1),
        stroke_color: Some(SolidPaint::opaque(Rgb::BLACK)),
        stroke_weight_end: Some(4.0),
        ..IterationConfig::new(3)
    };
    let base = rect();
    let s = base_style(&base, &config);
    assert_eq!(s.opacity, 0.9);
    assert_eq!(s.fill, base.style.fill);
    assert_eq!(s.stroke, Some(SolidPaint::opaque(Rgb::BLACK)));
    assert_eq!(s.stroke_weight, Some(1.0));
}
