//! Frame-by-frame driver around the external detectors.
//!
//! For every rectified frame the pipeline asks the [`VehicleDetector`] for
//! vehicle boxes, crops each vehicle, asks the [`PlateDetector`] for plate
//! candidates inside it and measures the validated ones with
//! [`PlateMeasurer`]. Measurement failures are logged and leave the plate
//! without a height; they never abort the frame. The collected [`Video`] is
//! finally handed to the [`SpeedEstimator`].

pub mod detect;
pub mod parallel;

use crate::diagnostics::{elapsed_ms, TimingBreakdown};
use crate::error::MeasureError;
use crate::image::{ImageRgb8, RgbImageU8};
use crate::measure::{MeasureParams, PlateHeight, PlateMeasurer};
use crate::speed::{SpeedEstimate, SpeedEstimator, SpeedParams};
use crate::video::{Frame, PlateMeasurement, Vehicle, Video};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub use detect::{PlateCandidate, PlateDetector, VehicleDetector};
pub use parallel::ParallelOptions;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Configuration of the whole video pipeline.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    pub measure: MeasureParams,
    pub speed: SpeedParams,
    pub parallel: ParallelOptions,
}

/// One processed frame and where its time went.
#[derive(Clone, Debug)]
pub struct FrameResult {
    pub frame: Frame,
    pub timings: TimingBreakdown,
}

/// Validated plate waiting for measurement.
struct PlateJob {
    vehicle: usize,
    plate: usize,
    patch: RgbImageU8,
}

pub struct FramePipeline<V, P> {
    vehicle_detector: V,
    plate_detector: P,
    measurer: PlateMeasurer,
    estimator: SpeedEstimator,
    parallel: ParallelOptions,
}

impl<V: VehicleDetector, P: PlateDetector> FramePipeline<V, P> {
    /// Fails only when the speed calibration is invalid.
    pub fn new(
        vehicle_detector: V,
        plate_detector: P,
        params: PipelineParams,
    ) -> Result<Self, MeasureError> {
        Ok(Self {
            vehicle_detector,
            plate_detector,
            measurer: PlateMeasurer::new(params.measure),
            estimator: SpeedEstimator::new(params.speed)?,
            parallel: params.parallel,
        })
    }

    pub fn measurer(&self) -> &PlateMeasurer {
        &self.measurer
    }

    pub fn estimator(&self) -> &SpeedEstimator {
        &self.estimator
    }

    /// Detect, crop and measure everything in one rectified frame.
    pub fn process_frame(&self, frame_index: usize, image: &ImageRgb8<'_>) -> FrameResult {
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();
        let mut frame = Frame::new(frame_index);
        let mut jobs = Vec::new();

        let vehicle_boxes = timings.time("detect_vehicles", || {
            self.vehicle_detector.detect_vehicles(image)
        });
        let plates_start = Instant::now();
        for (vehicle_idx, vehicle_box) in vehicle_boxes.into_iter().enumerate() {
            let vehicle_patch = image.crop(&vehicle_box);
            let candidates = self.plate_detector.detect_plates(&vehicle_patch.as_view());
            let mut vehicle = Vehicle {
                bbox: vehicle_box,
                plates: Vec::with_capacity(candidates.len()),
            };
            for (plate_idx, candidate) in candidates.into_iter().enumerate() {
                let plate_box = candidate.bbox.offset(vehicle_box.top, vehicle_box.left);
                if !candidate.valid {
                    vehicle
                        .plates
                        .push(PlateMeasurement::rejected(plate_box, candidate.confidence));
                    continue;
                }
                vehicle.plates.push(PlateMeasurement::validated(
                    plate_box,
                    candidate.confidence,
                    None,
                ));
                if candidate.bbox.is_empty() {
                    log::debug!(
                        "frame {frame_index}: vehicle {vehicle_idx} plate {plate_idx} has an empty box"
                    );
                    continue;
                }
                jobs.push(PlateJob {
                    vehicle: vehicle_idx,
                    plate: plate_idx,
                    patch: vehicle_patch.as_view().crop(&candidate.bbox),
                });
            }
            frame.vehicles.push(vehicle);
        }
        timings.push("detect_plates", elapsed_ms(plates_start));

        let measure_start = Instant::now();
        let results = self.measure_jobs(&jobs);
        let measure_ms = elapsed_ms(measure_start);
        let mut plate_stages = TimingBreakdown::default();
        for (job, result) in jobs.iter().zip(results) {
            match result {
                Ok(height) => {
                    plate_stages.accumulate(&height.timings);
                    frame.vehicles[job.vehicle].plates[job.plate].height_px =
                        Some(height.height_px);
                }
                Err(err) => log::debug!(
                    "frame {frame_index}: vehicle {} plate {} not measured: {err}",
                    job.vehicle,
                    job.plate
                ),
            }
        }
        timings.push("measure", measure_ms);
        for stage in plate_stages.stages {
            timings.push(format!("measure/{}", stage.label), stage.elapsed_ms);
        }
        timings.total_ms = elapsed_ms(total_start);
        FrameResult { frame, timings }
    }

    fn measure_jobs(&self, jobs: &[PlateJob]) -> Vec<Result<PlateHeight, MeasureError>> {
        let measurer = &self.measurer;
        if self.parallel.should_parallelize(jobs.len()) {
            #[cfg(feature = "parallel")]
            {
                return jobs
                    .par_iter()
                    .map(|job| measurer.measure(&job.patch.as_view()))
                    .collect();
            }
        }
        jobs.iter()
            .map(|job| measurer.measure(&job.patch.as_view()))
            .collect()
    }

    /// Process frames in order; frame indices count from zero.
    pub fn process_video<I>(&self, source: Option<String>, frames: I) -> (Video, TimingBreakdown)
    where
        I: IntoIterator<Item = RgbImageU8>,
    {
        let total_start = Instant::now();
        let mut video = Video::new(source);
        let mut timings = TimingBreakdown::default();
        for (index, image) in frames.into_iter().enumerate() {
            let result = self.process_frame(index, &image.as_view());
            log::debug!("{}", result.frame);
            timings.accumulate(&result.timings);
            video.push(result.frame);
        }
        timings.total_ms = elapsed_ms(total_start);
        (video, timings)
    }

    /// Average speed over the frames of `video`.
    pub fn estimate_speed(&self, video: &Video) -> Result<SpeedEstimate, MeasureError> {
        self.estimator.estimate(&video.height_records())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    struct FixedVehicles(Vec<BoundingBox>);

    impl VehicleDetector for FixedVehicles {
        fn detect_vehicles(&self, _frame: &ImageRgb8<'_>) -> Vec<BoundingBox> {
            self.0.clone()
        }
    }

    struct FixedPlates(Vec<PlateCandidate>);

    impl PlateDetector for FixedPlates {
        fn detect_plates(&self, _vehicle: &ImageRgb8<'_>) -> Vec<PlateCandidate> {
            self.0.clone()
        }
    }

    #[test]
    fn plate_boxes_move_to_frame_coordinates() {
        let pipeline = FramePipeline::new(
            FixedVehicles(vec![BoundingBox::new(10, 20, 60, 120)]),
            FixedPlates(vec![
                PlateCandidate {
                    bbox: BoundingBox::new(5, 5, 25, 65),
                    valid: false,
                    confidence: 0.3,
                },
                PlateCandidate {
                    bbox: BoundingBox::new(10, 10, 30, 70),
                    valid: true,
                    confidence: 0.9,
                },
            ]),
            PipelineParams::default(),
        )
        .expect("default calibration");
        let image = RgbImageU8::filled(160, 90, [80, 80, 80]);
        let result = pipeline.process_frame(4, &image.as_view());
        let plates = &result.frame.vehicles[0].plates;
        assert_eq!(result.frame.frame_index, 4);
        assert_eq!(plates[0].bbox, BoundingBox::new(15, 25, 35, 85));
        assert!(!plates[0].valid);
        assert_eq!(plates[1].bbox, BoundingBox::new(20, 30, 40, 90));
        assert!(plates[1].valid);
        // A uniform patch has no plate contour.
        assert_eq!(plates[1].height_px, None);
        assert_eq!(result.frame.plate_height(), None);
    }

    #[test]
    fn invalid_calibration_is_reported() {
        let params = PipelineParams {
            speed: SpeedParams {
                frame_rate: 0.0,
                ..SpeedParams::default()
            },
            ..PipelineParams::default()
        };
        assert!(FramePipeline::new(FixedVehicles(Vec::new()), FixedPlates(Vec::new()), params).is_err());
    }
}
