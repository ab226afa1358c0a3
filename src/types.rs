//! Geometric value types shared by every measurement stage.
//!
//! Coordinates follow the image convention: `x` grows to the right, `y` grows
//! downward and integer coordinates refer to pixel centers.
use serde::{Deserialize, Serialize};

/// Image-space point `[x, y]`.
pub type Point2 = [f64; 2];

const EPS: f64 = 1e-12;

/// Ordered pair of points. Length and distance ignore the order; the normal
/// and direction follow `p0 -> p1`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub p0: Point2,
    pub p1: Point2,
}

impl Line {
    pub fn new(p0: Point2, p1: Point2) -> Self {
        Self { p0, p1 }
    }

    pub fn length(&self) -> f64 {
        distance(&self.p0, &self.p1)
    }

    pub fn midpoint(&self) -> Point2 {
        [(self.p0[0] + self.p1[0]) * 0.5, (self.p0[1] + self.p1[1]) * 0.5]
    }

    /// Unit direction `p0 -> p1`, or `None` for a degenerate line.
    pub fn direction(&self) -> Option<[f64; 2]> {
        let dx = self.p1[0] - self.p0[0];
        let dy = self.p1[1] - self.p0[1];
        let norm = (dx * dx + dy * dy).sqrt();
        if norm <= EPS {
            None
        } else {
            Some([dx / norm, dy / norm])
        }
    }

    /// Unit normal, the direction rotated by +90°.
    pub fn normal(&self) -> Option<[f64; 2]> {
        self.direction().map(|d| [-d[1], d[0]])
    }

    /// Orientation angle of `p0 -> p1` in radians, in (−π, π].
    pub fn theta(&self) -> f64 {
        (self.p1[1] - self.p0[1]).atan2(self.p1[0] - self.p0[0])
    }

    /// Point at parameter `t` (0 at `p0`, 1 at `p1`).
    pub fn point_at(&self, t: f64) -> Point2 {
        [
            self.p0[0] + t * (self.p1[0] - self.p0[0]),
            self.p0[1] + t * (self.p1[1] - self.p0[1]),
        ]
    }
}

/// Closed polygon approximation of a region boundary.
///
/// Vertices keep the winding order produced by the boundary tracer; the edge
/// from the last vertex back to the first is implicit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<Point2>,
}

impl Contour {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Edges between consecutive vertices, wrap-around edge last.
    pub fn edges(&self) -> impl Iterator<Item = Line> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| Line::new(self.points[i], self.points[(i + 1) % n]))
    }

    /// Closed perimeter.
    pub fn perimeter(&self) -> f64 {
        if self.points.len() < 2 {
            return 0.0;
        }
        self.edges().map(|e| e.length()).sum()
    }

    /// Unsigned enclosed area (shoelace).
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }
}

/// Unsigned shoelace area of a closed polygon.
pub fn polygon_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        twice += a[0] * b[1] - b[0] * a[1];
    }
    0.5 * twice.abs()
}

#[inline]
pub fn distance(a: &Point2, b: &Point2) -> f64 {
    ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
}

/// Axis-aligned integer pixel box `(top, left, bottom, right)`; `bottom` and
/// `right` are exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
}

impl BoundingBox {
    pub fn new(top: i32, left: i32, bottom: i32, right: i32) -> Self {
        Self {
            top,
            left,
            bottom,
            right,
        }
    }

    pub fn width(&self) -> i32 {
        (self.right - self.left).max(0)
    }

    pub fn height(&self) -> i32 {
        (self.bottom - self.top).max(0)
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Shift the box by `(dy, dx)`, e.g. from vehicle-patch to frame coordinates.
    pub fn offset(&self, dy: i32, dx: i32) -> Self {
        Self {
            top: self.top + dy,
            left: self.left + dx,
            bottom: self.bottom + dy,
            right: self.right + dx,
        }
    }
}
