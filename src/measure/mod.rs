//! Plate height measurement on a single rectified plate patch.
//!
//! [`PlateMeasurer::measure`] chains the stages in order: optional white
//! balance, contour extraction, edge selection, sub-pixel refinement of both
//! edges and the average perpendicular distance between them. Every stage is
//! timed and the intermediate geometry is returned next to the height so that
//! callers can draw or serialize it.

pub mod height;

use crate::contour::{extract_plate_contour, ContourParams};
use crate::diagnostics::{elapsed_ms, TimingBreakdown};
use crate::edges::{EdgeSelector, SelectorPolicy};
use crate::error::MeasureError;
use crate::image::{ImageRgb8, RgbImageU8};
use crate::refine::{refine_edge, RefineParams, RefinedLine};
use crate::types::{Contour, Line};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub use height::{average_line_distance, perpendicular_foot, plate_height};

/// Parameters of the full single-patch measurement.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureParams {
    /// Apply the percentile white balance before segmentation.
    pub white_balance: bool,
    /// Percentile clipped at each end of every channel.
    pub white_balance_percent: f64,
    pub contour: ContourParams,
    pub selector: SelectorPolicy,
    pub refine: RefineParams,
}

impl Default for MeasureParams {
    fn default() -> Self {
        Self {
            white_balance: true,
            white_balance_percent: 2.0,
            contour: ContourParams::default(),
            selector: SelectorPolicy::default(),
            refine: RefineParams::default(),
        }
    }
}

/// Height of one plate together with the geometry it was derived from.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateHeight {
    pub height_px: f64,
    pub contour: Contour,
    pub coarse: [Line; 2],
    pub refined: [RefinedLine; 2],
    pub timings: TimingBreakdown,
}

#[derive(Clone, Debug, Default)]
pub struct PlateMeasurer {
    params: MeasureParams,
}

impl PlateMeasurer {
    pub fn new(params: MeasureParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &MeasureParams {
        &self.params
    }

    /// Measure the plate height in a rectified color patch.
    pub fn measure(&self, patch: &ImageRgb8<'_>) -> Result<PlateHeight, MeasureError> {
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();

        let balanced: Option<RgbImageU8> = if self.params.white_balance {
            Some(timings.time("white_balance", || {
                patch.balance_white(self.params.white_balance_percent)
            }))
        } else {
            None
        };
        let view = balanced.as_ref().map_or(*patch, |img| img.as_view());

        let contour = timings.time("contour", || {
            extract_plate_contour(&view, &self.params.contour)
        })?;
        let coarse = timings.time("select_edges", || self.params.selector.select(&contour))?;

        let gray = timings.time("gray", || view.to_gray());
        let gray_view = gray.as_view();
        let refine_start = Instant::now();
        let top = refine_edge(&gray_view, &coarse[0], &self.params.refine)?;
        let bottom = refine_edge(&gray_view, &coarse[1], &self.params.refine)?;
        timings.push("refine", elapsed_ms(refine_start));

        let height_px = timings.time("height", || plate_height(&top, &bottom))?;
        timings.total_ms = elapsed_ms(total_start);
        log::debug!(
            "plate height {:.3}px (support {}/{}, {:.2} ms)",
            height_px,
            top.support,
            bottom.support,
            timings.total_ms
        );
        Ok(PlateHeight {
            height_px,
            contour,
            coarse,
            refined: [top, bottom],
            timings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_parse_with_partial_json() {
        let p: MeasureParams = serde_json::from_str(
            r#"{"white_balance": false, "refine": {"passes": 3}, "selector": {"kind": "longest_two_edges"}}"#,
        )
        .expect("valid params");
        assert!(!p.white_balance);
        assert_eq!(p.refine.passes, 3);
        assert_eq!(p.refine.points_along_edge, 10);
        assert_eq!(p.contour.kernel_size, 7);
    }

    #[test]
    fn stage_failure_surfaces_as_error() {
        let img = RgbImageU8::filled(40, 20, [90, 90, 90]);
        let err = PlateMeasurer::default()
            .measure(&img.as_view())
            .expect_err("blank patch");
        assert_eq!(err, MeasureError::NoContourFound);
    }
}
