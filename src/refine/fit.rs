//! Ordinary least-squares line fitting in a local frame.

use super::types::RefinedLine;
use crate::error::MeasureError;
use crate::types::{Line, Point2};

const EPS: f64 = 1e-9;

/// Fit `y = m x + c` through `points` and return the segment spanning the
/// smallest to largest `x` of the inputs.
pub fn fit_line(points: &[Point2]) -> Result<RefinedLine, MeasureError> {
    fit_line_along(points, [1.0, 0.0])
}

/// Fit the normal coordinate as a linear function of the coordinate along
/// `axis`, both measured from the centroid, then map the endpoints back to
/// image space. The endpoints sit at the extreme axis coordinates.
pub fn fit_line_along(points: &[Point2], axis: [f64; 2]) -> Result<RefinedLine, MeasureError> {
    let n = points.len();
    if n < 2 {
        return Err(MeasureError::InsufficientPoints { found: n });
    }
    let norm = (axis[0] * axis[0] + axis[1] * axis[1]).sqrt();
    if norm <= EPS {
        return Err(MeasureError::InsufficientPoints { found: n });
    }
    let u = [axis[0] / norm, axis[1] / norm];
    let v = [-u[1], u[0]];

    let inv_n = 1.0 / n as f64;
    let origin = points.iter().fold([0.0, 0.0], |acc, p| {
        [acc[0] + p[0] * inv_n, acc[1] + p[1] * inv_n]
    });
    let local: Vec<(f64, f64)> = points
        .iter()
        .map(|p| {
            let d = [p[0] - origin[0], p[1] - origin[1]];
            (d[0] * u[0] + d[1] * u[1], d[0] * v[0] + d[1] * v[1])
        })
        .collect();

    let mut a_min = f64::INFINITY;
    let mut a_max = f64::NEG_INFINITY;
    let mut saa = 0.0;
    let mut sab = 0.0;
    let mut sb = 0.0;
    for &(a, b) in &local {
        a_min = a_min.min(a);
        a_max = a_max.max(a);
        saa += a * a;
        sab += a * b;
        sb += b;
    }
    // Axis coordinates are centred, so their sum is zero.
    if a_max - a_min <= EPS || saa <= EPS {
        return Err(MeasureError::InsufficientPoints { found: n });
    }
    let slope = sab / saa;
    let intercept = sb * inv_n;

    let residual_sq: f64 = local
        .iter()
        .map(|&(a, b)| {
            let r = b - (slope * a + intercept);
            r * r
        })
        .sum();

    let to_image = |a: f64| {
        let b = slope * a + intercept;
        [
            origin[0] + a * u[0] + b * v[0],
            origin[1] + a * u[1] + b * v[1],
        ]
    };
    Ok(RefinedLine {
        line: Line::new(to_image(a_min), to_image(a_max)),
        support: n,
        rms_residual: (residual_sq * inv_n).sqrt(),
    })
}
