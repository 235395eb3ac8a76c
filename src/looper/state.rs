use crate::foundation::core::{Affine, Size, Vec2};
use crate::looper::config::IterationConfig;
use crate::scene::node::Capabilities;
use crate::scene::snapshot::ShapeSnapshot;
use crate::style::paint::NodeStyle;
use crate::transform::pivot::Pivot;

/// Everything one generated copy receives, computed without touching the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationState {
    /// Iteration index, `1..iterations`.
    pub iteration: u32,
    /// Relative transform before the pivot rotation.
    pub transform: Affine,
    /// Size after the scale step.
    pub size: Size,
    /// Extra rotation about `pivot`, when a rotation step is configured.
    pub rotation_delta: Option<f64>,
    /// Rotation pivot.
    pub pivot: Pivot,
    /// Final style.
    pub style: NodeStyle,
}

impl IterationState {
    /// State of copy `iteration` of `base`.
    pub fn compute(base: &ShapeSnapshot, config: &IterationConfig, iteration: u32) -> Self {
        let i = f64::from(iteration);

        let step = Vec2::new(config.dx.unwrap_or(0.0), config.dy.unwrap_or(0.0));
        let growth = Vec2::new(
            config.d_scale_width.unwrap_or(0.0),
            config.d_scale_height.unwrap_or(0.0),
        ) * i;

        // Shift by half the growth so the copy grows symmetrically about its center.
        let translation = base.transform.translation() + step * i - growth * 0.5;
        let size = Size::new(base.size.width + growth.x, base.size.height + growth.y);

        Self {
            iteration,
            transform: base.transform.with_translation(translation),
            size,
            rotation_delta: config.d_rotation_degrees.map(|d| d * i),
            pivot: config.pivot,
            style: style_at(base, config, iteration),
        }
    }
}

/// Style for copy `iteration`: ramped where an end is configured, constant where only a start
/// is, the base's own value otherwise.
fn style_at(base: &ShapeSnapshot, config: &IterationConfig, iteration: u32) -> NodeStyle {
    let n = config.iterations;
    let caps = base.capabilities();
    let mut style = base.style;

    if let Some(v) = config
        .opacity_ramp()
        .sample(Some(base.style.opacity), n, iteration)
    {
        style.opacity = v;
    }
    if caps.contains(Capabilities::FILLABLE)
        && let Some(p) = config.fill_ramp().sample(base.style.fill, n, iteration)
    {
        style.fill = Some(p);
    }
    if caps.contains(Capabilities::STROKEABLE) {
        if let Some(p) = config.stroke_ramp().sample(base.style.stroke, n, iteration) {
            style.stroke = Some(p);
        }
        if let Some(w) = config
            .stroke_weight_ramp()
            .sample(base.style.stroke_weight, n, iteration)
        {
            style.stroke_weight = Some(w);
        }
    }
    style
}

/// Style the base shape itself takes on: every configured constant or ramp start.
pub fn base_style(base: &ShapeSnapshot, config: &IterationConfig) -> NodeStyle {
    let caps = base.capabilities();
    let mut style = base.style;

    if let Some(v) = config.opacity {
        style.opacity = v;
    }
    if caps.contains(Capabilities::FILLABLE) && config.fill_color.is_some() {
        style.fill = config.fill_color;
    }
    if caps.contains(Capabilities::STROKEABLE) {
        if config.stroke_color.is_some() {
            style.stroke = config.stroke_color;
        }
        if config.stroke_weight.is_some() {
            style.stroke_weight = config.stroke_weight;
        }
    }
    style
}

#[cfg(test)]
#[path = "../../tests/unit/looper/state.rs"]
mod tests;
