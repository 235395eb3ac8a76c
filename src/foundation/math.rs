//! Float tolerance and affine helpers.
//!
//! Rotations follow the design-tool convention: degrees, positive turns counter-clockwise on a
//! y-down canvas. kurbo's `Affine::rotate` turns clockwise on the same canvas, hence the sign flips.

use crate::foundation::core::{Affine, Point};

pub(crate) const EPSILON: f64 = 1e-9;

pub(crate) fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Pure rotation about the local origin.
pub(crate) fn rotation(degrees: f64) -> Affine {
    Affine::rotate(-degrees.to_radians())
}

/// Rotation about `center` expressed in the same space as the transform it is applied to.
pub(crate) fn rotation_about(degrees: f64, center: Point) -> Affine {
    Affine::rotate_about(-degrees.to_radians(), center)
}

/// Rotation component of an affine, in degrees within `(-180, 180]`.
pub(crate) fn rotation_degrees(t: Affine) -> f64 {
    let [a, b, _, _, _, _] = t.as_coeffs();
    let deg = -b.atan2(a).to_degrees();
    if deg <= -180.0 { deg + 360.0 } else { deg }
}

/// Fold any angle into `(-180, 180]`.
pub(crate) fn normalize_degrees(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    if r > 180.0 { r - 360.0 } else { r }
}

pub(crate) fn affine_approx_eq(a: Affine, b: Affine, eps: f64) -> bool {
    a.as_coeffs()
        .iter()
        .zip(b.as_coeffs().iter())
        .all(|(x, y)| approx_eq(*x, *y, eps))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
