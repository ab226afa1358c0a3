//! Sub-pixel relocation of coarse plate edges.
//!
//! Each coarse edge is probed by cross-sections perpendicular to it. Along a
//! cross-section the intensity profile of a blurred step edge is fitted with a
//! cubic, and the edge is placed where the fitted profile is steepest. The
//! resolved points are fitted with a least-squares line in the coarse edge's
//! own frame.
//!
//! The cubic's inflection is pulled toward the centre of the sampling window
//! when the edge lies far from it. With `recenter` enabled the first pass
//! shifts each window onto its steepest sample step; every later pass centres
//! its windows on the previous fit instead.

pub mod fit;
pub mod profile;
pub mod sampling;
pub mod types;

use crate::error::MeasureError;
use crate::image::ImageU8;
use crate::types::{distance, Line, Point2};
use profile::cubic_edge_position;
use sampling::{points_along, sample_section, steepest_step};

pub use fit::{fit_line, fit_line_along};
pub use types::{EdgeSample, RefineParams, RefinedLine};

const MIN_RESOLVED: usize = 2;

/// Sub-pixel edge location along one cross-section, or `None` when the profile
/// is too flat or has no inflection inside the window.
pub fn locate_edge(
    gray: &ImageU8<'_>,
    center: Point2,
    normal: [f64; 2],
    half_len: f64,
    params: &RefineParams,
    recenter: bool,
) -> Option<Point2> {
    let mut sample = sample_section(gray, center, normal, half_len, params.samples_per_section);
    if sample.contrast() < params.min_contrast {
        return None;
    }
    if recenter {
        let t = steepest_step(&sample)?;
        let shifted = sample.position(t);
        sample = sample_section(gray, shifted, normal, half_len, params.samples_per_section);
        if sample.contrast() < params.min_contrast {
            return None;
        }
    }
    let t = cubic_edge_position(&sample.values)?;
    Some(sample.position(t))
}

fn refine_once(
    gray: &ImageU8<'_>,
    line: &Line,
    params: &RefineParams,
    recenter: bool,
) -> Result<RefinedLine, MeasureError> {
    let (Some(dir), Some(normal)) = (line.direction(), line.normal()) else {
        return Err(MeasureError::InsufficientEdgeSignal {
            resolved: 0,
            required: MIN_RESOLVED,
        });
    };
    let half_len = 0.5 * params.section_fraction * gray.h as f64;
    let resolved: Vec<Point2> = points_along(line, params.points_along_edge)
        .into_iter()
        .filter_map(|p| locate_edge(gray, p, normal, half_len, params, recenter))
        .collect();
    if resolved.len() < MIN_RESOLVED {
        return Err(MeasureError::InsufficientEdgeSignal {
            resolved: resolved.len(),
            required: MIN_RESOLVED,
        });
    }
    fit_line_along(&resolved, dir)
}

/// Refine a coarse edge against the grayscale image it was found in.
pub fn refine_edge(
    gray: &ImageU8<'_>,
    coarse: &Line,
    params: &RefineParams,
) -> Result<RefinedLine, MeasureError> {
    let mut best = refine_once(gray, coarse, params, params.recenter)?;
    for pass in 1..params.passes.max(1) {
        let next = match refine_once(gray, &best.line, params, false) {
            Ok(next) => next,
            Err(err) => {
                log::debug!("refine: pass {pass} failed ({err}), keeping previous fit");
                break;
            }
        };
        let moved = distance(&next.line.p0, &best.line.p0).max(distance(&next.line.p1, &best.line.p1));
        best = next;
        if moved < params.convergence_px {
            break;
        }
    }
    Ok(best)
}
