//! Distance between the refined top and bottom plate edges.

use crate::error::MeasureError;
use crate::refine::RefinedLine;
use crate::types::{distance, Line, Point2};

/// Foot of the perpendicular from `p` onto `line`, with its parameter
/// (0 at `p0`, 1 at `p1`). `None` for a zero-length line.
pub fn perpendicular_foot(line: &Line, p: &Point2) -> Option<(Point2, f64)> {
    let dx = line.p1[0] - line.p0[0];
    let dy = line.p1[1] - line.p0[1];
    let len_sq = dx * dx + dy * dy;
    if len_sq <= 1e-18 {
        return None;
    }
    let t = ((p[0] - line.p0[0]) * dx + (p[1] - line.p0[1]) * dy) / len_sq;
    Some((line.point_at(t), t))
}

/// Average distance from each line's endpoints to their perpendicular feet on
/// the other line. Feet falling outside the other segment are skipped.
pub fn average_line_distance(a: &Line, b: &Line) -> Result<f64, MeasureError> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for (from, onto) in [(a, b), (b, a)] {
        for p in [from.p0, from.p1] {
            let Some((foot, t)) = perpendicular_foot(onto, &p) else {
                return Err(MeasureError::NoOverlapBetweenLines);
            };
            if (0.0..=1.0).contains(&t) {
                sum += distance(&p, &foot);
                count += 1;
            }
        }
    }
    if count == 0 {
        return Err(MeasureError::NoOverlapBetweenLines);
    }
    Ok(sum / count as f64)
}

/// Plate height in pixels from the two refined edges.
pub fn plate_height(top: &RefinedLine, bottom: &RefinedLine) -> Result<f64, MeasureError> {
    average_line_distance(&top.line, &bottom.line)
}
