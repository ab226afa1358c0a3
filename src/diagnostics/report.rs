use super::TimingBreakdown;
use crate::measure::PlateHeight;
use crate::speed::{FrameHeightRecord, SpeedEstimate, SpeedOutput};
use crate::video::Video;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub path: String,
    pub width: usize,
    pub height: usize,
}

/// Outcome of measuring one plate image, written by `plate_height_demo`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateReport {
    pub input: InputDescriptor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement: Option<PlateHeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timings: TimingBreakdown,
}

impl PlateReport {
    pub fn height_px(&self) -> Option<f64> {
        self.measurement.as_ref().map(|m| m.height_px)
    }
}

/// Outcome of a speed estimate over a list of frames, written by `speed_demo`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeedReport {
    pub frame_count: usize,
    pub records: Vec<FrameHeightRecord>,
    pub output: SpeedOutput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_kmh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<SpeedEstimate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timings: TimingBreakdown,
}

impl SpeedReport {
    pub fn from_video(
        video: &Video,
        output: SpeedOutput,
        estimate: Result<SpeedEstimate, String>,
        timings: TimingBreakdown,
    ) -> Self {
        let (estimate, error) = match estimate {
            Ok(e) => (Some(e), None),
            Err(e) => (None, Some(e)),
        };
        Self {
            frame_count: video.len(),
            records: video.height_records(),
            output,
            speed_kmh: estimate.as_ref().map(|e| e.value(output)),
            estimate,
            error,
            timings,
        }
    }
}

fn format_optional(val: Option<f64>) -> String {
    val.map(|v| format!("{v:.3}"))
        .unwrap_or_else(|| "-".to_string())
}

impl fmt::Display for SpeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let measured = self
            .records
            .iter()
            .filter(|r| r.usable_height().is_some())
            .count();
        write!(
            f,
            "frames={} measured={} speed_kmh={}",
            self.frame_count,
            measured,
            format_optional(self.speed_kmh)
        )?;
        if let Some(err) = &self.error {
            write!(f, " error=\"{err}\"")?;
        }
        Ok(())
    }
}
