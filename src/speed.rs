//! Vehicle speed from the change of apparent plate height over frames.
//!
//! A plate of known physical size at distance `d` appears `lens_factor / d`
//! pixels tall, so `d = lens_factor / height_px`. Consecutive heights give a
//! distance change per frame, which the frame rate turns into a speed.
//!
//! Frames without a height are bridged: the distance change up to the next
//! measured frame is spread evenly over the gap, and every frame in the gap
//! receives that speed.

use crate::error::MeasureError;
use serde::{Deserialize, Serialize};

const MPS_TO_KMH: f64 = 3.6;

/// Which value [`SpeedEstimator::estimate_speed`] reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedOutput {
    /// Positive when the vehicle approaches the camera.
    #[default]
    Signed,
    /// Absolute speed.
    Magnitude,
}

/// Camera calibration and output selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedParams {
    /// Plate height in pixels times distance in meters.
    pub lens_factor: f64,
    /// Frames per second of the source video.
    pub frame_rate: f64,
    pub output: SpeedOutput,
}

impl Default for SpeedParams {
    fn default() -> Self {
        Self {
            lens_factor: 343.0,
            frame_rate: 60.0,
            output: SpeedOutput::Signed,
        }
    }
}

/// Plate height measured in one frame, if any.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameHeightRecord {
    pub frame_index: usize,
    pub height_px: Option<f64>,
}

impl FrameHeightRecord {
    pub fn new(frame_index: usize, height_px: Option<f64>) -> Self {
        Self {
            frame_index,
            height_px,
        }
    }

    /// Height usable for distance conversion: finite and positive.
    pub fn usable_height(&self) -> Option<f64> {
        self.height_px.filter(|h| h.is_finite() && *h > 0.0)
    }
}

/// Speed attributed to one frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedSample {
    pub frame_index: usize,
    pub velocity_kmh: f64,
}

/// Average speed over the trimmed segment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedEstimate {
    /// Mean signed speed; positive when approaching.
    pub velocity_kmh: f64,
    /// Absolute value of `velocity_kmh`.
    pub speed_kmh: f64,
    /// One entry per frame after the first measured frame.
    pub samples: Vec<SpeedSample>,
    pub first_frame: usize,
    pub last_frame: usize,
    /// Frames in the segment that carried a usable height.
    pub measurements: usize,
}

impl SpeedEstimate {
    pub fn value(&self, output: SpeedOutput) -> f64 {
        match output {
            SpeedOutput::Signed => self.velocity_kmh,
            SpeedOutput::Magnitude => self.speed_kmh,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SpeedEstimator {
    params: SpeedParams,
}

impl SpeedEstimator {
    /// Validate the calibration and build the estimator.
    pub fn new(params: SpeedParams) -> Result<Self, MeasureError> {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        if !ok(params.lens_factor) || !ok(params.frame_rate) {
            return Err(MeasureError::InvalidCalibration {
                lens_factor: params.lens_factor,
                frame_rate: params.frame_rate,
            });
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &SpeedParams {
        &self.params
    }

    /// Camera-to-plate distance in meters for a plate `height_px` tall.
    pub fn distance_m(&self, height_px: f64) -> f64 {
        self.params.lens_factor / height_px
    }

    /// Per-frame speeds and their mean over the span between the first and
    /// last frame with a usable height.
    pub fn estimate(&self, records: &[FrameHeightRecord]) -> Result<SpeedEstimate, MeasureError> {
        let measurements = records
            .iter()
            .filter(|r| r.usable_height().is_some())
            .count();
        let first = records.iter().position(|r| r.usable_height().is_some());
        let last = records.iter().rposition(|r| r.usable_height().is_some());
        let (Some(first), Some(last)) = (first, last) else {
            return Err(MeasureError::NoValidMeasurements { found: 0 });
        };
        if measurements < 2 {
            return Err(MeasureError::NoValidMeasurements {
                found: measurements,
            });
        }

        let span = &records[first..=last];
        let mut samples = Vec::with_capacity(span.len() - 1);
        let mut last_height = span[0].usable_height().unwrap_or(f64::NAN);
        let mut elapsed = 1usize;
        for (k, record) in span.iter().enumerate().skip(1) {
            let Some(height) = record.usable_height() else {
                elapsed += 1;
                continue;
            };
            let moved_m = self.distance_m(last_height) - self.distance_m(height);
            let velocity_kmh = moved_m / elapsed as f64 * self.params.frame_rate * MPS_TO_KMH;
            for gap_record in &span[k + 1 - elapsed..=k] {
                samples.push(SpeedSample {
                    frame_index: gap_record.frame_index,
                    velocity_kmh,
                });
            }
            last_height = height;
            elapsed = 1;
        }

        let velocity_kmh =
            samples.iter().map(|s| s.velocity_kmh).sum::<f64>() / samples.len() as f64;
        log::debug!(
            "speed: {:.2} km/h over frames {}..={} ({} measured)",
            velocity_kmh,
            span[0].frame_index,
            span[span.len() - 1].frame_index,
            measurements
        );
        Ok(SpeedEstimate {
            velocity_kmh,
            speed_kmh: velocity_kmh.abs(),
            samples,
            first_frame: span[0].frame_index,
            last_frame: span[span.len() - 1].frame_index,
            measurements,
        })
    }

    /// Average speed in km/h, signed or unsigned per [`SpeedParams::output`].
    pub fn estimate_speed(&self, records: &[FrameHeightRecord]) -> Result<f64, MeasureError> {
        self.estimate(records)
            .map(|e| e.value(self.params.output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let tol = 1e-12 * expected.abs().max(1.0);
        assert!((actual - expected).abs() <= tol, "{actual} != {expected}");
    }

    fn records(heights: &[Option<f64>]) -> Vec<FrameHeightRecord> {
        heights
            .iter()
            .enumerate()
            .map(|(i, &h)| FrameHeightRecord::new(i, h))
            .collect()
    }

    #[test]
    fn two_frames_give_one_step() {
        let est = SpeedEstimator::new(SpeedParams::default()).expect("valid calibration");
        // 343 / 34.3 = 10 m, 343 / 35 = 9.8 m.
        let e = est
            .estimate(&records(&[Some(34.3), Some(35.0)]))
            .expect("two heights");
        assert_close(e.velocity_kmh, 0.2 * 60.0 * 3.6);
        assert_eq!(e.samples.len(), 1);
        assert_eq!(e.samples[0].frame_index, 1);
    }

    #[test]
    fn receding_vehicle_is_negative_and_magnitude_is_positive() {
        let params = SpeedParams {
            output: SpeedOutput::Magnitude,
            ..SpeedParams::default()
        };
        let est = SpeedEstimator::new(params).expect("valid calibration");
        let recs = records(&[Some(35.0), Some(34.3)]);
        let e = est.estimate(&recs).expect("two heights");
        assert!(e.velocity_kmh < 0.0);
        assert_close(e.speed_kmh, -e.velocity_kmh);
        assert_close(est.estimate_speed(&recs).unwrap(), e.speed_kmh);
    }

    #[test]
    fn non_finite_heights_count_as_missing() {
        let est = SpeedEstimator::new(SpeedParams::default()).expect("valid calibration");
        let e = est
            .estimate(&records(&[Some(30.0), Some(f64::NAN), Some(-2.0), Some(32.0)]))
            .expect("two usable heights");
        assert_eq!(e.measurements, 2);
        assert_eq!(e.samples.len(), 3);
        let frames: Vec<usize> = e.samples.iter().map(|s| s.frame_index).collect();
        assert_eq!(frames, vec![1, 2, 3]);
    }

    #[test]
    fn invalid_calibration_is_rejected() {
        for (lens_factor, frame_rate) in [(0.0, 60.0), (343.0, -1.0), (f64::NAN, 60.0)] {
            let params = SpeedParams {
                lens_factor,
                frame_rate,
                ..SpeedParams::default()
            };
            assert!(matches!(
                SpeedEstimator::new(params),
                Err(MeasureError::InvalidCalibration { .. })
            ));
        }
    }

    #[test]
    fn output_parses_from_config() {
        let p: SpeedParams =
            serde_json::from_str(r#"{"frame_rate": 30, "output": "magnitude"}"#).expect("valid");
        assert_eq!(p.frame_rate, 30.0);
        assert_eq!(p.lens_factor, 343.0);
        assert_eq!(p.output, SpeedOutput::Magnitude);
    }
}
