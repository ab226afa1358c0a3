//! Plate quadrilateral extraction from a rectified color patch.
//!
//! The patch is reduced to its HSV value channel, split with a global Otsu
//! threshold, cleaned with a closing and an opening, and the outer boundaries
//! of the remaining regions are traced. The boundary enclosing the largest area
//! is simplified with Douglas-Peucker into the plate polygon.

pub mod approx;
pub mod morph;
pub mod threshold;
pub mod trace;

use crate::error::MeasureError;
use crate::image::{GrayImageU8, ImageRgb8};
use crate::types::{polygon_area, Contour};
use serde::{Deserialize, Serialize};

pub use approx::approximate_closed;
pub use threshold::{binarize, otsu_threshold};
pub use trace::{trace_outer_boundaries, TracedBoundary};

/// Parameters of the contour extractor.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourParams {
    /// Side of the square structuring element used for closing and opening.
    pub kernel_size: usize,
    /// Douglas-Peucker tolerance as a fraction of the boundary perimeter.
    pub epsilon_fraction: f64,
}

impl Default for ContourParams {
    fn default() -> Self {
        Self {
            kernel_size: 7,
            epsilon_fraction: 0.01,
        }
    }
}

/// Cleaned binary mask of the bright plate region.
pub fn plate_mask(patch: &ImageRgb8<'_>, params: &ContourParams) -> GrayImageU8 {
    let value = patch.value_channel();
    let t = otsu_threshold(&value);
    let mask = binarize(&value, t);
    let closed = morph::close(&mask, params.kernel_size);
    morph::open(&closed, params.kernel_size)
}

/// Extract the plate polygon from a white-balanced patch.
pub fn extract_plate_contour(
    patch: &ImageRgb8<'_>,
    params: &ContourParams,
) -> Result<Contour, MeasureError> {
    let mask = plate_mask(patch, params);
    contour_from_mask(&mask, params)
}

/// Largest traced boundary of `mask`, simplified to a polygon.
pub fn contour_from_mask(
    mask: &GrayImageU8,
    params: &ContourParams,
) -> Result<Contour, MeasureError> {
    let mut best: Option<(f64, Contour)> = None;
    for region in trace_outer_boundaries(mask) {
        let area = polygon_area(&region.points);
        // Strict comparison keeps the first of equal areas.
        if best.as_ref().map_or(true, |(a, _)| area > *a) {
            best = Some((area, Contour::new(region.points)));
        }
    }
    let Some((area, boundary)) = best else {
        log::debug!("contour: no foreground region after thresholding");
        return Err(MeasureError::NoContourFound);
    };

    let epsilon = params.epsilon_fraction * boundary.perimeter();
    let polygon = Contour::new(approximate_closed(&boundary.points, epsilon));
    if polygon.len() < 3 {
        log::debug!(
            "contour: approximation kept {} vertices (area {:.1})",
            polygon.len(),
            area
        );
        return Err(MeasureError::NoContourFound);
    }
    Ok(polygon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::RgbImageU8;

    fn plate_patch(w: usize, h: usize, x0: usize, y0: usize, x1: usize, y1: usize) -> RgbImageU8 {
        let mut img = RgbImageU8::filled(w, h, [30, 30, 30]);
        for y in y0..=y1 {
            for x in x0..=x1 {
                img.put_pixel(x, y, [230, 225, 220]);
            }
        }
        img
    }

    #[test]
    fn rectangle_yields_four_corners() {
        let img = plate_patch(120, 60, 15, 12, 104, 41);
        let contour = extract_plate_contour(&img.as_view(), &ContourParams::default())
            .expect("plate visible");
        assert_eq!(
            contour.points,
            vec![[15.0, 12.0], [104.0, 12.0], [104.0, 41.0], [15.0, 41.0]]
        );
    }

    #[test]
    fn keeps_the_largest_region() {
        let mut img = plate_patch(120, 80, 40, 30, 110, 70);
        for y in 5..20 {
            for x in 5..25 {
                img.put_pixel(x, y, [230, 225, 220]);
            }
        }
        let contour = extract_plate_contour(&img.as_view(), &ContourParams::default())
            .expect("plate visible");
        assert_eq!(contour.points[0], [40.0, 30.0]);
        assert!((contour.area() - 70.0 * 40.0).abs() < 1e-9);
    }

    #[test]
    fn uniform_patch_has_no_contour() {
        let img = RgbImageU8::filled(32, 16, [120, 120, 120]);
        let err = extract_plate_contour(&img.as_view(), &ContourParams::default())
            .expect_err("nothing to segment");
        assert_eq!(err, MeasureError::NoContourFound);
    }
}
