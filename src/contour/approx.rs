//! Douglas-Peucker simplification of closed pixel boundaries.
use crate::types::{distance, Point2};

/// Perpendicular distance from `p` to the infinite line through `a` and `b`.
fn line_distance(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let len = (dx * dx + dy * dy).sqrt();
    if len <= 1e-12 {
        return distance(p, a);
    }
    ((p[0] - a[0]) * dy - (p[1] - a[1]) * dx).abs() / len
}

/// Indices of `points` kept by Douglas-Peucker on an open polyline. Both
/// endpoints are always kept.
fn simplify_open(points: &[Point2], epsilon: f64) -> Vec<usize> {
    let n = points.len();
    if n <= 2 {
        return (0..n).collect();
    }
    let mut keep = vec![false; n];
    keep[0] = true;
    keep[n - 1] = true;
    let mut stack = vec![(0usize, n - 1)];
    while let Some((lo, hi)) = stack.pop() {
        if hi <= lo + 1 {
            continue;
        }
        let mut best = lo;
        let mut best_d = -1.0;
        for i in lo + 1..hi {
            let d = line_distance(&points[i], &points[lo], &points[hi]);
            if d > best_d {
                best_d = d;
                best = i;
            }
        }
        if best_d > epsilon {
            keep[best] = true;
            stack.push((lo, best));
            stack.push((best, hi));
        }
    }
    (0..n).filter(|&i| keep[i]).collect()
}

/// Simplify a closed boundary. The first point is kept and splits the loop
/// together with the point farthest from it; each half is simplified on its own
/// and the results are joined in the original order.
pub fn approximate_closed(points: &[Point2], epsilon: f64) -> Vec<Point2> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let start = points[0];
    let far = (1..n)
        .max_by(|&i, &j| {
            distance(&points[i], &start).total_cmp(&distance(&points[j], &start))
        })
        .unwrap_or(n / 2);

    let first = &points[..=far];
    let mut second: Vec<Point2> = points[far..].to_vec();
    second.push(start);

    let mut out = Vec::new();
    let kept_first = simplify_open(first, epsilon);
    out.extend(kept_first[..kept_first.len() - 1].iter().map(|&i| first[i]));
    let kept_second = simplify_open(&second, epsilon);
    out.extend(kept_second[..kept_second.len() - 1].iter().map(|&i| second[i]));
    out
}
