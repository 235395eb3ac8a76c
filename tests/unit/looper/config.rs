use super::*;
use crate::style::color::Rgb;
use serde_json::json;

#[test]
fn defaults_mirror_panel_defaults_and_validate() {
    let c = IterationConfig::default();
    assert_eq!(c.iterations, 25);
    assert_eq!(c.opacity_ramp(), Ramp::linear(1.0, 0.0));
    assert!(c.fill_ramp().is_unset());
    c.validate().unwrap();
}

#[test]
fn iteration_bounds_are_inclusive() {
    IterationConfig::new(1).validate().unwrap();
    IterationConfig::new(MAX_ITERATIONS).validate().unwrap();

    for n in [0, MAX_ITERATIONS + 1] {
        let errs = IterationConfig::new(n).validate().unwrap_err();
        assert_eq!(errs.fields().collect::<Vec<_>>(), vec!["iterations"]);
    }
}

#[test]
fn every_offending_field_is_reported() {
    let c = IterationConfig {
        opacity: Some(1.5),
        opacity_end: Some(-0.1),
        d_scale_width: Some(0.005),
        d_scale_height: Some(-0.001),
        stroke_weight_end: Some(-1.0),
        ..IterationConfig::new(0)
    };
    let errs = c.validate().unwrap_err();
    assert_eq!(
        errs.fields().collect::<Vec<_>>(),
        vec![
            "iterations",
            "scaleX",
            "scaleY",
            "opacity",
            "opacityEnd",
            "strokeWeightEnd"
        ]
    );
}

#[test]
fn zero_and_large_scale_deltas_are_accepted() {
    let c = IterationConfig {
        d_scale_width: Some(0.0),
        d_scale_height: Some(-0.01),
        ..IterationConfig::new(3)
    };
    c.validate().unwrap();
}

#[test]
fn non_finite_numbers_are_rejected() {
    let c = IterationConfig {
        dx: Some(f64::NAN),
        d_rotation_degrees: Some(f64::INFINITY),
        stroke_weight: Some(f64::NAN),
        ..IterationConfig::new(3)
    };
    let errs = c.validate().unwrap_err();
    assert_eq!(
        errs.fields().collect::<Vec<_>>(),
        vec!["x", "rotation", "strokeWeight"]
    );
}

#[test]
fn parses_persisted_panel_json() {
    let c: IterationConfig = serde_json::from_value(json!({
        "iterations": 10,
        "x": 5,
        "y": -2.5,
        "rotation": 15,
        "scaleX": 0,
        "scaleY": null,
        "opacity": 1,
        "opacityEnd": 0.2,
        "fillColor": {"color": {"r": 1, "g": 0, "b": 0}, "opacity": 1},
        "fillColorEnd": "#0000ff",
        "strokeColor": null,
        "strokeColorEnd": null,
        "strokeWeight": 2,
        "strokeWeightEnd": null
    }))
    .unwrap();

    assert_eq!(c.iterations, 10);
    assert_eq!(c.dy, Some(-2.5));
    assert_eq!(c.d_scale_height, None);
    assert_eq!(c.fill_color, Some(SolidPaint::opaque(Rgb::new(1.0, 0.0, 0.0))));
    assert_eq!(c.fill_color_end, Some(SolidPaint::opaque(Rgb::new(0.0, 0.0, 1.0))));
    assert_eq!(c.stroke_weight_ramp(), Ramp::constant(2.0));
    assert_eq!(c.pivot, Pivot::CENTER);
}

#[test]
fn invalid_hex_leaves_color_ramp_unset() {
    let c: IterationConfig = serde_json::from_value(json!({
        "iterations": 3,
        "strokeColor": "not-a-color",
        "strokeColorEnd": "#12"
    }))
    .unwrap();
    assert!(c.stroke_ramp().is_unset());
}

#[test]
fn serialized_config_reloads_identically() {
    let c = IterationConfig {
        fill_color: Some(SolidPaint::opaque(Rgb::new(0.2, 0.4, 0.6))),
        stroke_weight_end: Some(4.0),
        ..IterationConfig::default()
    };
    let v = serde_json::to_value(&c).unwrap();
    assert_eq!(v["x"], json!(5.0));
    assert_eq!(v["strokeColor"], json!(null));
    let back: IterationConfig = serde_json::from_value(v).unwrap();
    assert_eq!(back, c);
}
