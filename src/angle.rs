//! Angle utilities used by edge selection and the tests.

use std::f64::consts::{FRAC_PI_2, PI};

/// Normalizes an angle into the range [0, π).
#[inline]
pub fn normalize_half_pi(angle: f64) -> f64 {
    let norm = angle.rem_euclid(PI);
    if norm >= PI - 1e-12 {
        0.0
    } else {
        norm
    }
}

/// Smallest unsigned difference between two line orientations, treating
/// antipodal directions as equivalent. Returns a value in [0, π/2].
#[inline]
pub fn angular_difference(a: f64, b: f64) -> f64 {
    let diff = (normalize_half_pi(a) - normalize_half_pi(b)).abs();
    if diff > FRAC_PI_2 {
        PI - diff
    } else {
        diff
    }
}

/// Orientation difference between two 2D vectors while treating antipodal
/// directions as equivalent. Returns a value in [0, π/2].
#[inline]
pub fn angle_between_dirless(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let dot = a[0] * b[0] + a[1] * b[1];
    let na = (a[0] * a[0] + a[1] * a[1]).sqrt().max(1e-12);
    let nb = (b[0] * b[0] + b[1] * b[1]).sqrt().max(1e-12);
    (dot / (na * nb)).abs().clamp(0.0, 1.0).acos()
}
