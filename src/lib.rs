#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod diagnostics;
pub mod error;
pub mod image;
pub mod measure;
pub mod pipeline;
pub mod speed;
pub mod types;
pub mod video;

// Stage-level building blocks, public for tools and tests.
pub mod angle;
pub mod config;
pub mod contour;
pub mod edges;
pub mod refine;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::MeasureError;
pub use crate::measure::{MeasureParams, PlateHeight, PlateMeasurer};
pub use crate::pipeline::{FramePipeline, PipelineParams};
pub use crate::speed::{FrameHeightRecord, SpeedEstimate, SpeedEstimator, SpeedParams};
pub use crate::video::{Frame, PlateMeasurement, Vehicle, Video};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use plate_speed::prelude::*;
///
/// # fn main() {
/// let patch = RgbImageU8::filled(160, 48, [40, 40, 40]);
/// let measurer = PlateMeasurer::new(MeasureParams::default());
/// match measurer.measure(&patch.as_view()) {
///     Ok(plate) => println!("height={:.3}px", plate.height_px),
///     Err(err) => println!("not measured: {err}"),
/// }
///
/// let estimator = SpeedEstimator::new(SpeedParams::default()).expect("valid calibration");
/// let records = [
///     FrameHeightRecord::new(0, Some(30.0)),
///     FrameHeightRecord::new(1, None),
///     FrameHeightRecord::new(2, Some(30.4)),
/// ];
/// println!("{:?}", estimator.estimate_speed(&records));
/// # }
/// ```
pub mod prelude {
    pub use crate::edges::{EdgeSelector, SelectorPolicy};
    pub use crate::image::{ImageRgb8, ImageU8, ImageView, RgbImageU8};
    pub use crate::types::{BoundingBox, Contour, Line};
    pub use crate::{
        FrameHeightRecord, MeasureError, MeasureParams, PlateMeasurer, SpeedEstimator,
        SpeedParams,
    };
}
