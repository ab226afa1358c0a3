//! Cross-section placement and intensity sampling.

use super::types::EdgeSample;
use crate::image::ImageU8;
use crate::types::{Line, Point2};

/// `count` equally spaced points along `line`, endpoints included.
pub fn points_along(line: &Line, count: usize) -> Vec<Point2> {
    match count {
        0 => Vec::new(),
        1 => vec![line.midpoint()],
        _ => (0..count)
            .map(|i| line.point_at(i as f64 / (count - 1) as f64))
            .collect(),
    }
}

/// Sample `samples` bilinear intensities on the segment from
/// `center + half_len * normal` to `center - half_len * normal`.
pub fn sample_section(
    gray: &ImageU8<'_>,
    center: Point2,
    normal: [f64; 2],
    half_len: f64,
    samples: usize,
) -> EdgeSample {
    let start = [
        center[0] + half_len * normal[0],
        center[1] + half_len * normal[1],
    ];
    let end = [
        center[0] - half_len * normal[0],
        center[1] - half_len * normal[1],
    ];
    let mut sample = EdgeSample {
        start,
        end,
        center,
        values: Vec::with_capacity(samples),
    };
    for i in 0..samples {
        let t = if samples <= 1 {
            0.5
        } else {
            i as f64 / (samples - 1) as f64
        };
        let p = sample.position(t);
        sample
            .values
            .push(gray.sample_bilinear_clamped(p[0], p[1]));
    }
    sample
}

/// Normalized position of the middle of the largest adjacent-sample step.
pub fn steepest_step(sample: &EdgeSample) -> Option<f64> {
    let mut best: Option<(usize, f64)> = None;
    for (i, pair) in sample.values.windows(2).enumerate() {
        let step = (pair[1] - pair[0]).abs();
        if best.map_or(true, |(_, b)| step > b) {
            best = Some((i, step));
        }
    }
    let (i, _) = best?;
    Some(0.5 * (sample.sample_t(i) + sample.sample_t(i + 1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GrayImageU8;

    #[test]
    fn points_include_endpoints() {
        let line = Line::new([0.0, 0.0], [9.0, 0.0]);
        let pts = points_along(&line, 10);
        assert_eq!(pts.len(), 10);
        assert_eq!(pts[0], [0.0, 0.0]);
        assert_eq!(pts[9], [9.0, 0.0]);
        assert!((pts[4][0] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn section_runs_from_positive_normal_side() {
        let mut img = GrayImageU8::filled(20, 20, 0);
        for y in 10..20 {
            for x in 0..20 {
                img.set(x, y, 200);
            }
        }
        let s = sample_section(&img.as_view(), [10.0, 10.0], [0.0, -1.0], 4.0, 9);
        assert_eq!(s.start, [10.0, 6.0]);
        assert_eq!(s.end, [10.0, 14.0]);
        assert_eq!(s.values[0], 0.0);
        assert_eq!(s.values[8], 200.0);
        let t = steepest_step(&s).expect("has samples");
        // Step between samples 3 (y=9) and 4 (y=10).
        assert!((t - 3.5 / 8.0).abs() < 1e-12);
    }
}
