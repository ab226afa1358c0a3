//! Per-frame detection and measurement results for one video.

use crate::speed::FrameHeightRecord;
use crate::types::BoundingBox;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A plate candidate and, when it was validated and measured, its height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateMeasurement {
    /// Plate box in frame coordinates.
    pub bbox: BoundingBox,
    pub height_px: Option<f64>,
    pub valid: bool,
    pub confidence: f64,
}

impl PlateMeasurement {
    /// Candidate rejected by plate validation; never carries a height.
    pub fn rejected(bbox: BoundingBox, confidence: f64) -> Self {
        Self {
            bbox,
            height_px: None,
            valid: false,
            confidence,
        }
    }

    /// Validated candidate with the outcome of the height measurement.
    pub fn validated(bbox: BoundingBox, confidence: f64, height_px: Option<f64>) -> Self {
        Self {
            bbox,
            height_px,
            valid: true,
            confidence,
        }
    }

    /// Height of a valid, successfully measured plate.
    pub fn measured_height(&self) -> Option<f64> {
        if self.valid {
            self.height_px
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub bbox: BoundingBox,
    #[serde(default)]
    pub plates: Vec<PlateMeasurement>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub frame_index: usize,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
}

impl Frame {
    pub fn new(frame_index: usize) -> Self {
        Self {
            frame_index,
            vehicles: Vec::new(),
        }
    }

    /// Height of the first valid measured plate, vehicles in detector order.
    pub fn plate_height(&self) -> Option<f64> {
        self.vehicles
            .iter()
            .flat_map(|v| v.plates.iter())
            .find_map(PlateMeasurement::measured_height)
    }

    pub fn height_record(&self) -> FrameHeightRecord {
        FrameHeightRecord::new(self.frame_index, self.plate_height())
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame: {}", self.frame_index)?;
        for (index, vehicle) in self.vehicles.iter().enumerate() {
            write!(f, "  Vehicle: {index}")?;
            for height in vehicle.plates.iter().filter_map(PlateMeasurement::measured_height) {
                write!(f, " plate height: {height:.4}")?;
            }
        }
        Ok(())
    }
}

/// Frames of one video in processing order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub frames: Vec<Frame>,
}

impl Video {
    pub fn new(source: Option<String>) -> Self {
        Self {
            source,
            frames: Vec::new(),
        }
    }

    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// One height record per frame, in frame order.
    pub fn height_records(&self) -> Vec<FrameHeightRecord> {
        self.frames.iter().map(Frame::height_record).collect()
    }
}
