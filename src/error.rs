/// Reasons why a plate measurement or a speed estimate may fail.
///
/// Every variant is recoverable: a failed plate simply has no height for that
/// frame, and a failed segment has no speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MeasureError {
    /// Thresholding and cleanup left no foreground region to trace.
    NoContourFound,
    /// Too few cross-sections produced an edge location.
    InsufficientEdgeSignal { resolved: usize, required: usize },
    /// Line fitting needs at least two points at distinct positions.
    InsufficientPoints { found: usize },
    /// No perpendicular foot of either line lands on the other line.
    NoOverlapBetweenLines,
    /// Fewer than two frames in the segment carry a plate height.
    NoValidMeasurements { found: usize },
    /// Lens factor and frame rate must be finite and positive.
    InvalidCalibration { lens_factor: f64, frame_rate: f64 },
}

impl std::fmt::Display for MeasureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeasureError::NoContourFound => write!(f, "no plate contour found"),
            MeasureError::InsufficientEdgeSignal { resolved, required } => write!(
                f,
                "insufficient edge signal ({resolved} resolved points < {required})"
            ),
            MeasureError::InsufficientPoints { found } => {
                write!(f, "insufficient points for a line fit ({found} < 2)")
            }
            MeasureError::NoOverlapBetweenLines => {
                write!(f, "edge lines do not overlap")
            }
            MeasureError::NoValidMeasurements { found } => write!(
                f,
                "not enough frames with a plate height ({found} < 2)"
            ),
            MeasureError::InvalidCalibration {
                lens_factor,
                frame_rate,
            } => write!(
                f,
                "invalid calibration (lens_factor={lens_factor}, frame_rate={frame_rate})"
            ),
        }
    }
}

impl std::error::Error for MeasureError {}
