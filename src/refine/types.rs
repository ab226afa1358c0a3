//! Parameters and results of the sub-pixel edge refiner.

use crate::types::{Line, Point2};
use serde::{Deserialize, Serialize};

/// Parameters controlling cross-section sampling and the intensity fit.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineParams {
    /// Cross-sections per edge, endpoints included.
    pub points_along_edge: usize,
    /// Intensity samples per cross-section.
    pub samples_per_section: usize,
    /// Cross-section length as a fraction of the image height.
    pub section_fraction: f64,
    /// On the first pass, re-center each cross-section on its steepest step
    /// before fitting.
    pub recenter: bool,
    /// Minimum intensity range (gray levels) for a cross-section to count.
    pub min_contrast: f64,
    /// Maximum refinement passes; each pass samples around the previous fit.
    pub passes: usize,
    /// Endpoint motion (px) below which further passes are skipped.
    pub convergence_px: f64,
}

impl Default for RefineParams {
    fn default() -> Self {
        Self {
            points_along_edge: 10,
            samples_per_section: 10,
            section_fraction: 0.2,
            recenter: true,
            min_contrast: 8.0,
            passes: 3,
            convergence_px: 0.05,
        }
    }
}

/// Intensities sampled along one cross-section, from `start` to `end`.
#[derive(Clone, Debug)]
pub struct EdgeSample {
    pub start: Point2,
    pub end: Point2,
    pub center: Point2,
    pub values: Vec<f64>,
}

impl EdgeSample {
    /// Image point at normalized position `t` (0 at `start`, 1 at `end`).
    #[inline]
    pub fn position(&self, t: f64) -> Point2 {
        [
            self.start[0] + t * (self.end[0] - self.start[0]),
            self.start[1] + t * (self.end[1] - self.start[1]),
        ]
    }

    /// Normalized position of sample `i`.
    #[inline]
    pub fn sample_t(&self, i: usize) -> f64 {
        let n = self.values.len();
        if n <= 1 {
            0.5
        } else {
            i as f64 / (n - 1) as f64
        }
    }

    /// Max minus min intensity.
    pub fn contrast(&self) -> f64 {
        let (lo, hi) = self
            .values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if lo.is_finite() {
            hi - lo
        } else {
            0.0
        }
    }
}

/// Least-squares line through refined edge points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinedLine {
    pub line: Line,
    /// Number of points the line was fitted to.
    pub support: usize,
    /// RMS of the point-to-line residuals (px).
    pub rms_residual: f64,
}
