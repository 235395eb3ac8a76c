use crate::animation::ramp::Ramp;
use crate::foundation::error::ConfigErrors;
use crate::style::paint::{SolidPaint, deserialize_lenient_paint};
use crate::transform::pivot::Pivot;
use serde::{Deserialize, Serialize};

/// Largest accepted iteration count.
pub const MAX_ITERATIONS: u32 = 1000;
/// Smallest magnitude of a non-zero scale delta.
pub const MIN_SCALE_DELTA: f64 = 0.01;

/// User-supplied loop parameters.
///
/// Field names follow the panel's persisted JSON, so a stored config round-trips verbatim.
/// Every delta is applied `i` times to iteration `i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationConfig {
    /// Total shapes in the loop, base included.
    pub iterations: u32,
    /// Horizontal step.
    #[serde(default, rename = "x")]
    pub dx: Option<f64>,
    /// Vertical step.
    #[serde(default, rename = "y")]
    pub dy: Option<f64>,
    /// Rotation step in degrees.
    #[serde(default, rename = "rotation")]
    pub d_rotation_degrees: Option<f64>,
    /// Width step.
    #[serde(default, rename = "scaleX")]
    pub d_scale_width: Option<f64>,
    /// Height step.
    #[serde(default, rename = "scaleY")]
    pub d_scale_height: Option<f64>,
    /// Opacity constant or ramp start.
    #[serde(default)]
    pub opacity: Option<f64>,
    /// Opacity ramp end.
    #[serde(default)]
    pub opacity_end: Option<f64>,
    /// Fill constant or ramp start.
    #[serde(default, deserialize_with = "deserialize_lenient_paint")]
    pub fill_color: Option<SolidPaint>,
    /// Fill ramp end.
    #[serde(default, deserialize_with = "deserialize_lenient_paint")]
    pub fill_color_end: Option<SolidPaint>,
    /// Stroke constant or ramp start.
    #[serde(default, deserialize_with = "deserialize_lenient_paint")]
    pub stroke_color: Option<SolidPaint>,
    /// Stroke ramp end.
    #[serde(default, deserialize_with = "deserialize_lenient_paint")]
    pub stroke_color_end: Option<SolidPaint>,
    /// Stroke weight constant or ramp start.
    #[serde(default)]
    pub stroke_weight: Option<f64>,
    /// Stroke weight ramp end.
    #[serde(default)]
    pub stroke_weight_end: Option<f64>,
    /// Rotation pivot, the shape center unless configured.
    #[serde(default)]
    pub pivot: Pivot,
}

impl Default for IterationConfig {
    fn default() -> Self {
        Self {
            iterations: 25,
            dx: Some(5.0),
            dy: Some(5.0),
            d_rotation_degrees: Some(5.0),
            d_scale_width: Some(0.0),
            d_scale_height: Some(0.0),
            opacity: Some(1.0),
            opacity_end: Some(0.0),
            fill_color: None,
            fill_color_end: None,
            stroke_color: None,
            stroke_color_end: None,
            stroke_weight: None,
            stroke_weight_end: None,
            pivot: Pivot::CENTER,
        }
    }
}

impl IterationConfig {
    /// Config with `iterations` and nothing else configured.
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations,
            dx: None,
            dy: None,
            d_rotation_degrees: None,
            d_scale_width: None,
            d_scale_height: None,
            opacity: None,
            opacity_end: None,
            fill_color: None,
            fill_color_end: None,
            stroke_color: None,
            stroke_color_end: None,
            stroke_weight: None,
            stroke_weight_end: None,
            pivot: Pivot::CENTER,
        }
    }

    /// Opacity ramp.
    pub fn opacity_ramp(&self) -> Ramp<f64> {
        Ramp {
            start: self.opacity,
            end: self.opacity_end,
        }
    }

    /// Fill ramp.
    pub fn fill_ramp(&self) -> Ramp<SolidPaint> {
        Ramp {
            start: self.fill_color,
            end: self.fill_color_end,
        }
    }

    /// Stroke ramp.
    pub fn stroke_ramp(&self) -> Ramp<SolidPaint> {
        Ramp {
            start: self.stroke_color,
            end: self.stroke_color_end,
        }
    }

    /// Stroke weight ramp.
    pub fn stroke_weight_ramp(&self) -> Ramp<f64> {
        Ramp {
            start: self.stroke_weight,
            end: self.stroke_weight_end,
        }
    }

    /// Check every field, collecting all offending ones.
    pub fn validate(&self) -> Result<(), ConfigErrors> {
        let mut errors = ConfigErrors::default();

        if !(1..=MAX_ITERATIONS).contains(&self.iterations) {
            errors.push(
                "iterations",
                format!("must be between 1 and {MAX_ITERATIONS}"),
            );
        }

        for (field, value) in [
            ("x", self.dx),
            ("y", self.dy),
            ("rotation", self.d_rotation_degrees),
        ] {
            if value.is_some_and(|v| !v.is_finite()) {
                errors.push(field, "must be a finite number");
            }
        }

        for (field, value) in [
            ("scaleX", self.d_scale_width),
            ("scaleY", self.d_scale_height),
        ] {
            match value {
                Some(v) if !v.is_finite() => errors.push(field, "must be a finite number"),
                Some(v) if v != 0.0 && v.abs() < MIN_SCALE_DELTA => {
                    errors.push(field, format!("magnitude must be at least {MIN_SCALE_DELTA}"))
                }
                _ => {}
            }
        }

        for (field, value) in [("opacity", self.opacity), ("opacityEnd", self.opacity_end)] {
            if value.is_some_and(|v| !(0.0..=1.0).contains(&v)) {
                errors.push(field, "must be between 0 and 1");
            }
        }

        for (field, value) in [
            ("strokeWeight", self.stroke_weight),
            ("strokeWeightEnd", self.stroke_weight_end),
        ] {
            if value.is_some_and(|v| !(v.is_finite() && v >= 0.0)) {
                errors.push(field, "must be a finite number >= 0");
            }
        }

        for (field, paint) in [
            ("fillColor", self.fill_color),
            ("fillColorEnd", self.fill_color_end),
            ("strokeColor", self.stroke_color),
            ("strokeColorEnd", self.stroke_color_end),
        ] {
            let finite = |p: SolidPaint| {
                [p.color.r, p.color.g, p.color.b, p.opacity]
                    .iter()
                    .all(|c| c.is_finite())
            };
            if paint.is_some_and(|p| !finite(p)) {
                errors.push(field, "color channels must be finite numbers");
            }
        }

        if !(self.pivot.offset.x.is_finite() && self.pivot.offset.y.is_finite()) {
            errors.push("pivot", "offset must be finite");
        }

        errors.into_result()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/looper/config.rs"]
mod tests;
