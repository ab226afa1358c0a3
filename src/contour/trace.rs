//! Outer-boundary tracing of 8-connected foreground regions.
//!
//! Regions are labelled in raster order of their first pixel. Each boundary is
//! followed clockwise with Moore-neighbour tracing, starting from that first
//! pixel whose west neighbour is known to be background.
use crate::image::{GrayImageU8, ImageView};
use crate::types::Point2;
use std::collections::VecDeque;

/// Neighbour offsets `(dx, dy)`, clockwise from east in y-down coordinates.
const DIRS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];
const WEST: usize = 4;

/// One traced region: its boundary pixel centers and pixel count.
#[derive(Clone, Debug)]
pub struct TracedBoundary {
    pub points: Vec<Point2>,
    pub pixel_count: usize,
}

struct Labels {
    w: usize,
    h: usize,
    ids: Vec<u32>,
}

impl Labels {
    #[inline]
    fn at(&self, x: i64, y: i64) -> u32 {
        if x < 0 || y < 0 || x >= self.w as i64 || y >= self.h as i64 {
            return 0;
        }
        self.ids[y as usize * self.w + x as usize]
    }
}

/// Trace the outer boundary of every 8-connected region of non-zero pixels.
pub fn trace_outer_boundaries(mask: &GrayImageU8) -> Vec<TracedBoundary> {
    let (w, h) = (mask.width(), mask.height());
    let mut labels = Labels {
        w,
        h,
        ids: vec![0; w * h],
    };
    let mut out = Vec::new();
    let mut queue = VecDeque::new();
    for y in 0..h {
        for x in 0..w {
            if mask.get(x, y) == 0 || labels.ids[y * w + x] != 0 {
                continue;
            }
            let id = out.len() as u32 + 1;
            let pixel_count = flood_fill(mask, &mut labels, &mut queue, x, y, id);
            let points = follow_boundary(&labels, id, (x as i64, y as i64), pixel_count);
            out.push(TracedBoundary {
                points,
                pixel_count,
            });
        }
    }
    out
}

fn flood_fill(
    mask: &GrayImageU8,
    labels: &mut Labels,
    queue: &mut VecDeque<(usize, usize)>,
    x: usize,
    y: usize,
    id: u32,
) -> usize {
    let (w, h) = (labels.w, labels.h);
    labels.ids[y * w + x] = id;
    queue.clear();
    queue.push_back((x, y));
    let mut count = 0;
    while let Some((cx, cy)) = queue.pop_front() {
        count += 1;
        for &(dx, dy) in &DIRS {
            let nx = cx as i64 + dx;
            let ny = cy as i64 + dy;
            if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            let idx = ny * w + nx;
            if mask.get(nx, ny) != 0 && labels.ids[idx] == 0 {
                labels.ids[idx] = id;
                queue.push_back((nx, ny));
            }
        }
    }
    count
}

/// Direction index of the unit offset `(dx, dy)`.
fn dir_of(dx: i64, dy: i64) -> usize {
    DIRS.iter()
        .position(|&d| d == (dx, dy))
        .unwrap_or(WEST)
}

/// Next boundary pixel clockwise from `back`, with the new backtrack
/// direction (pointing from the returned pixel to the last background cell).
fn step(labels: &Labels, id: u32, p: (i64, i64), back: usize) -> Option<((i64, i64), usize)> {
    for i in 1..=8 {
        let d = (back + i) % 8;
        let q = (p.0 + DIRS[d].0, p.1 + DIRS[d].1);
        if labels.at(q.0, q.1) == id {
            let prev_dir = (d + 7) % 8;
            let prev = (p.0 + DIRS[prev_dir].0, p.1 + DIRS[prev_dir].1);
            return Some((q, dir_of(prev.0 - q.0, prev.1 - q.1)));
        }
    }
    None
}

fn follow_boundary(labels: &Labels, id: u32, start: (i64, i64), pixel_count: usize) -> Vec<Point2> {
    let to_point = |p: (i64, i64)| [p.0 as f64, p.1 as f64];
    let mut points = vec![to_point(start)];
    let Some((second, mut back)) = step(labels, id, start, WEST) else {
        return points;
    };
    let mut current = second;
    let limit = 4 * pixel_count + 8;
    for _ in 0..limit {
        let Some((next, next_back)) = step(labels, id, current, back) else {
            break;
        };
        if current == start && next == second {
            break;
        }
        points.push(to_point(current));
        current = next;
        back = next_back;
    }
    points
}
