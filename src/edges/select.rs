use crate::angle::angle_between_dirless;
use crate::error::MeasureError;
use crate::types::{Contour, Line};
use nalgebra::Matrix2;
use serde::{Deserialize, Serialize};

/// Picks the top and bottom edges of a plate polygon.
pub trait EdgeSelector {
    fn select(&self, contour: &Contour) -> Result<[Line; 2], MeasureError>;
}

/// The two longest edges, wrap-around edge included. Equal lengths keep
/// polygon order.
#[derive(Clone, Copy, Debug, Default)]
pub struct LongestTwoEdges;

impl EdgeSelector for LongestTwoEdges {
    fn select(&self, contour: &Contour) -> Result<[Line; 2], MeasureError> {
        if contour.len() < 3 {
            return Err(MeasureError::NoContourFound);
        }
        let mut edges: Vec<Line> = contour.edges().collect();
        edges.sort_by(|a, b| b.length().total_cmp(&a.length()));
        Ok([edges[0], edges[1]])
    }
}

/// Longest edge on each side of the dominant axis.
///
/// The axis is the principal direction of the length-weighted orientation
/// tensor of all edges. Edges deviating more than `max_axis_deviation_deg`
/// from it are ignored and the rest are split by which side of the vertex
/// centroid their midpoints fall on. The returned pair is ordered top first.
#[derive(Clone, Copy, Debug)]
pub struct AspectAwareSelector {
    pub max_axis_deviation_deg: f64,
}

impl Default for AspectAwareSelector {
    fn default() -> Self {
        Self {
            max_axis_deviation_deg: 20.0,
        }
    }
}

impl AspectAwareSelector {
    fn dominant_axis(edges: &[Line]) -> Option<[f64; 2]> {
        let mut tensor = Matrix2::<f64>::zeros();
        for edge in edges {
            let Some(d) = edge.direction() else {
                continue;
            };
            let w = edge.length();
            tensor[(0, 0)] += w * d[0] * d[0];
            tensor[(0, 1)] += w * d[0] * d[1];
            tensor[(1, 1)] += w * d[1] * d[1];
        }
        tensor[(1, 0)] = tensor[(0, 1)];
        if tensor.trace() <= 1e-12 {
            return None;
        }
        let eig = tensor.symmetric_eigen();
        let i = eig.eigenvalues.imax();
        let v = eig.eigenvectors.column(i);
        Some([v[0], v[1]])
    }
}

impl EdgeSelector for AspectAwareSelector {
    fn select(&self, contour: &Contour) -> Result<[Line; 2], MeasureError> {
        if contour.len() < 3 {
            return Err(MeasureError::NoContourFound);
        }
        let edges: Vec<Line> = contour.edges().collect();
        let Some(axis) = Self::dominant_axis(&edges) else {
            return LongestTwoEdges.select(contour);
        };
        let normal = [-axis[1], axis[0]];
        let n = contour.len() as f64;
        let centroid = contour
            .points
            .iter()
            .fold([0.0, 0.0], |acc, p| [acc[0] + p[0] / n, acc[1] + p[1] / n]);

        let max_dev = self.max_axis_deviation_deg.to_radians();
        let mut above: Option<Line> = None;
        let mut below: Option<Line> = None;
        for edge in &edges {
            let Some(d) = edge.direction() else {
                continue;
            };
            if angle_between_dirless(&d, &axis) > max_dev {
                continue;
            }
            let m = edge.midpoint();
            let side = (m[0] - centroid[0]) * normal[0] + (m[1] - centroid[1]) * normal[1];
            let slot = if side < 0.0 { &mut above } else { &mut below };
            if slot.map_or(true, |best| edge.length() > best.length()) {
                *slot = Some(*edge);
            }
        }

        match (above, below) {
            (Some(a), Some(b)) => {
                if a.midpoint()[1] <= b.midpoint()[1] {
                    Ok([a, b])
                } else {
                    Ok([b, a])
                }
            }
            _ => {
                log::debug!("edge selection: one side of the plate axis is empty, using longest edges");
                LongestTwoEdges.select(contour)
            }
        }
    }
}

/// Serde-configurable edge selection policy.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectorPolicy {
    LongestTwoEdges,
    AspectAware {
        #[serde(default = "default_axis_deviation")]
        max_axis_deviation_deg: f64,
    },
}

fn default_axis_deviation() -> f64 {
    AspectAwareSelector::default().max_axis_deviation_deg
}

impl Default for SelectorPolicy {
    fn default() -> Self {
        SelectorPolicy::LongestTwoEdges
    }
}

impl EdgeSelector for SelectorPolicy {
    fn select(&self, contour: &Contour) -> Result<[Line; 2], MeasureError> {
        match *self {
            SelectorPolicy::LongestTwoEdges => LongestTwoEdges.select(contour),
            SelectorPolicy::AspectAware {
                max_axis_deviation_deg,
            } => AspectAwareSelector {
                max_axis_deviation_deg,
            }
            .select(contour),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Contour {
        Contour::new(vec![[0.0, 0.0], [100.0, 0.0], [100.0, 30.0], [0.0, 30.0]])
    }

    #[test]
    fn longest_two_picks_top_and_bottom() {
        let [a, b] = LongestTwoEdges.select(&rect()).expect("four vertices");
        assert_eq!(a, Line::new([0.0, 0.0], [100.0, 0.0]));
        assert_eq!(b, Line::new([100.0, 30.0], [0.0, 30.0]));
    }

    #[test]
    fn longest_two_includes_wrap_around_edge() {
        let c = Contour::new(vec![[0.0, 30.0], [0.0, 0.0], [100.0, 0.0], [100.0, 30.0]]);
        let [a, b] = LongestTwoEdges.select(&c).expect("four vertices");
        assert_eq!(a, Line::new([0.0, 0.0], [100.0, 0.0]));
        assert_eq!(b, Line::new([100.0, 30.0], [0.0, 30.0]));
    }

    #[test]
    fn degenerate_contour_is_rejected() {
        let c = Contour::new(vec![[0.0, 0.0], [1.0, 0.0]]);
        assert_eq!(
            LongestTwoEdges.select(&c),
            Err(MeasureError::NoContourFound)
        );
        assert_eq!(
            SelectorPolicy::default().select(&c),
            Err(MeasureError::NoContourFound)
        );
    }

    #[test]
    fn aspect_aware_skips_side_edges() {
        // Top edge split in two by a spurious vertex; both sides outrank each half.
        let c = Contour::new(vec![
            [0.0, 0.0],
            [50.0, 2.0],
            [100.0, 0.0],
            [100.0, 60.0],
            [0.0, 60.0],
        ]);
        let [la, lb] = LongestTwoEdges.select(&c).expect("five vertices");
        assert_eq!(la, Line::new([100.0, 60.0], [0.0, 60.0]));
        assert_eq!(lb, Line::new([100.0, 0.0], [100.0, 60.0]));

        let [top, bottom] = AspectAwareSelector::default()
            .select(&c)
            .expect("five vertices");
        assert_eq!(top, Line::new([0.0, 0.0], [50.0, 2.0]));
        assert_eq!(bottom, Line::new([100.0, 60.0], [0.0, 60.0]));
    }

    #[test]
    fn policy_deserializes_from_json() {
        let p: SelectorPolicy = serde_json::from_str(r#"{"kind":"aspect_aware"}"#)
            .expect("valid policy");
        match p {
            SelectorPolicy::AspectAware {
                max_axis_deviation_deg,
            } => assert!((max_axis_deviation_deg - 20.0).abs() < 1e-12),
            other => panic!("unexpected policy {other:?}"),
        }
    }
}
