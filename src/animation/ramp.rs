use crate::style::color::Rgb;
use crate::style::paint::SolidPaint;

/// Linear ramp value for `iteration` out of `iterations` steps.
///
/// Iteration `0` yields `start` and iteration `iterations - 1` yields `end` exactly. A single
/// iteration cannot interpolate and yields `start`. Results are floored at zero so channels
/// approaching zero never go slightly negative; no upper clamp is applied.
pub fn value_at(start: f64, end: f64, iterations: u32, iteration: u32) -> f64 {
    if iterations <= 1 {
        return start.max(0.0);
    }
    if iteration == iterations - 1 {
        return end.max(0.0);
    }

    let step = (start - end).abs() / f64::from(iterations - 1);
    let i = f64::from(iteration);
    let v = if start > end {
        start - step * i
    } else {
        start + step * i
    };
    v.max(0.0)
}

/// Values that can be ramped channel by channel.
pub trait RampValue: Sized + Copy {
    /// Value at `iteration` along the ramp from `start` to `end`.
    fn ramp(start: &Self, end: &Self, iterations: u32, iteration: u32) -> Self;
}

impl RampValue for f64 {
    fn ramp(start: &Self, end: &Self, iterations: u32, iteration: u32) -> Self {
        value_at(*start, *end, iterations, iteration)
    }
}

impl RampValue for Rgb {
    fn ramp(start: &Self, end: &Self, iterations: u32, iteration: u32) -> Self {
        Rgb {
            r: value_at(start.r, end.r, iterations, iteration),
            g: value_at(start.g, end.g, iterations, iteration),
            b: value_at(start.b, end.b, iterations, iteration),
        }
    }
}

impl RampValue for SolidPaint {
    fn ramp(start: &Self, end: &Self, iterations: u32, iteration: u32) -> Self {
        SolidPaint {
            color: Rgb::ramp(&start.color, &end.color, iterations, iteration),
            opacity: value_at(start.opacity, end.opacity, iterations, iteration),
        }
    }
}

/// A `(start, end)` pair driving one attribute across the loop.
///
/// `start` alone holds a constant. `end` turns it into a linear ramp; a missing `start` then
/// ramps from the base shape's current value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp<T> {
    /// Constant or ramp start.
    pub start: Option<T>,
    /// Ramp end.
    pub end: Option<T>,
}

impl<T: RampValue> Ramp<T> {
    /// Ramp with both ends.
    pub fn linear(start: T, end: T) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Ramp holding one value.
    pub fn constant(value: T) -> Self {
        Self {
            start: Some(value),
            end: None,
        }
    }

    /// Ramp with nothing configured.
    pub fn unset() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Return `true` when neither end is configured.
    pub fn is_unset(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Value for `iteration`, or `None` when the attribute should keep the clone's own value.
    pub fn sample(&self, base: Option<T>, iterations: u32, iteration: u32) -> Option<T> {
        match (self.start, self.end) {
            (_, Some(end)) => {
                let start = self.start.or(base)?;
                Some(T::ramp(&start, &end, iterations, iteration))
            }
            (Some(start), None) => Some(start),
            (None, None) => None,
        }
    }
}

impl<T: RampValue> Default for Ramp<T> {
    fn default() -> Self {
        Self::unset()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ramp.rs"]
mod tests;
