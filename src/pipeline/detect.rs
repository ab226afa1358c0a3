//! Seams for the external vehicle and plate detectors.

use crate::image::ImageRgb8;
use crate::types::BoundingBox;
use serde::{Deserialize, Serialize};

/// Plate candidate proposed inside a vehicle patch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateCandidate {
    /// Box relative to the vehicle patch it was found in.
    pub bbox: BoundingBox,
    /// Whether plate validation accepted the candidate.
    pub valid: bool,
    pub confidence: f64,
}

/// Locates vehicles in a rectified frame.
pub trait VehicleDetector {
    fn detect_vehicles(&self, frame: &ImageRgb8<'_>) -> Vec<BoundingBox>;
}

/// Locates and validates plate candidates inside one vehicle patch.
pub trait PlateDetector {
    fn detect_plates(&self, vehicle: &ImageRgb8<'_>) -> Vec<PlateCandidate>;
}

impl<T: VehicleDetector + ?Sized> VehicleDetector for &T {
    fn detect_vehicles(&self, frame: &ImageRgb8<'_>) -> Vec<BoundingBox> {
        (**self).detect_vehicles(frame)
    }
}

impl<T: PlateDetector + ?Sized> PlateDetector for &T {
    fn detect_plates(&self, vehicle: &ImageRgb8<'_>) -> Vec<PlateCandidate> {
        (**self).detect_plates(vehicle)
    }
}
