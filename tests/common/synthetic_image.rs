use plate_speed::image::{ImageView, ImageViewMut, RgbImageU8};
use plate_speed::types::Point2;

pub const PLATE_RGB: [u8; 3] = [235, 230, 210];
pub const BACKGROUND_RGB: [u8; 3] = [45, 50, 55];
pub const GLYPH_RGB: [u8; 3] = [20, 20, 20];

/// Axis-aligned glyph rectangle `[x0, y0, x1, y1]`, bounds inclusive.
pub type Glyph = [f64; 4];

const SUPERSAMPLE: usize = 4;

/// Corners of a `width x height` plate rotated by `angle_deg` about `center`,
/// ordered top-left, top-right, bottom-right, bottom-left.
pub fn plate_corners(center: Point2, width: f64, height: f64, angle_deg: f64) -> [Point2; 4] {
    let (s, c) = angle_deg.to_radians().sin_cos();
    let local = [
        [-width / 2.0, -height / 2.0],
        [width / 2.0, -height / 2.0],
        [width / 2.0, height / 2.0],
        [-width / 2.0, height / 2.0],
    ];
    local.map(|[x, y]| [center[0] + x * c - y * s, center[1] + x * s + y * c])
}

/// A row of axis-aligned dark character blocks across the middle of a plate.
pub fn plate_glyphs(center: Point2, width: f64, height: f64, count: usize) -> Vec<Glyph> {
    let pitch = width * 0.8 / count as f64;
    (0..count)
        .map(|i| {
            let x0 = center[0] - width * 0.4 + i as f64 * pitch + pitch * 0.2;
            [
                x0,
                center[1] - height * 0.15,
                x0 + pitch * 0.6,
                center[1] + height * 0.15,
            ]
        })
        .collect()
}

fn inside_convex(quad: &[Point2; 4], x: f64, y: f64) -> bool {
    let mut sign = None;
    for i in 0..4 {
        let a = quad[i];
        let b = quad[(i + 1) % 4];
        let cross = (b[0] - a[0]) * (y - a[1]) - (b[1] - a[1]) * (x - a[0]);
        if cross == 0.0 {
            continue;
        }
        match sign {
            None => sign = Some(cross > 0.0),
            Some(s) if s != (cross > 0.0) => return false,
            _ => {}
        }
    }
    true
}

/// Anti-aliased plate on a flat background. Pixel colors blend by the
/// fraction of a 4x4 sub-sample grid that falls inside the plate.
pub fn render_plate(width: usize, height: usize, quad: &[Point2; 4], glyphs: &[Glyph]) -> RgbImageU8 {
    let mut img = RgbImageU8::filled(width, height, BACKGROUND_RGB);
    let min_x = quad.iter().map(|p| p[0]).fold(f64::INFINITY, f64::min);
    let max_x = quad.iter().map(|p| p[0]).fold(f64::NEG_INFINITY, f64::max);
    let min_y = quad.iter().map(|p| p[1]).fold(f64::INFINITY, f64::min);
    let max_y = quad.iter().map(|p| p[1]).fold(f64::NEG_INFINITY, f64::max);
    let step = 1.0 / SUPERSAMPLE as f64;
    for y in 0..height {
        for x in 0..width {
            let (xf, yf) = (x as f64, y as f64);
            let mut covered = 0usize;
            if xf + 0.5 >= min_x && xf - 0.5 <= max_x && yf + 0.5 >= min_y && yf - 0.5 <= max_y {
                for j in 0..SUPERSAMPLE {
                    for i in 0..SUPERSAMPLE {
                        let sx = xf - 0.5 + (i as f64 + 0.5) * step;
                        let sy = yf - 0.5 + (j as f64 + 0.5) * step;
                        if inside_convex(quad, sx, sy) {
                            covered += 1;
                        }
                    }
                }
            }
            let f = covered as f64 / (SUPERSAMPLE * SUPERSAMPLE) as f64;
            let mut rgb = [0u8; 3];
            for c in 0..3 {
                let bg = BACKGROUND_RGB[c] as f64;
                rgb[c] = (bg + f * (PLATE_RGB[c] as f64 - bg)).round() as u8;
            }
            if glyphs
                .iter()
                .any(|g| g[0] <= xf && xf <= g[2] && g[1] <= yf && yf <= g[3])
            {
                rgb = GLYPH_RGB;
            }
            img.put_pixel(x, y, rgb);
        }
    }
    img
}

/// Separable Gaussian blur with replicated borders.
pub fn gaussian_blur(img: &RgbImageU8, sigma: f64) -> RgbImageU8 {
    let radius = (3.0 * sigma).ceil() as isize;
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|i| (-0.5 * (i as f64 / sigma).powi(2)).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= sum);

    let (w, h) = (img.width(), img.height());
    let clamp = |v: isize, n: usize| v.clamp(0, n as isize - 1) as usize;
    let mut horizontal = vec![0.0f64; w * h * 3];
    for y in 0..h {
        let row = img.row(y);
        for x in 0..w {
            for c in 0..3 {
                horizontal[3 * (y * w + x) + c] = kernel
                    .iter()
                    .enumerate()
                    .map(|(j, k)| k * row[3 * clamp(x as isize + j as isize - radius, w) + c] as f64)
                    .sum();
            }
        }
    }
    let mut out = RgbImageU8::filled(w, h, [0, 0, 0]);
    for y in 0..h {
        let dst = out.row_mut(y);
        for x in 0..w {
            for c in 0..3 {
                let v: f64 = kernel
                    .iter()
                    .enumerate()
                    .map(|(j, k)| {
                        let sy = clamp(y as isize + j as isize - radius, h);
                        k * horizontal[3 * (sy * w + x) + c]
                    })
                    .sum();
                dst[3 * x + c] = v.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
    out
}

/// Plate render softened the way a real lens would, `sigma = 1`.
pub fn render_blurred_plate(
    width: usize,
    height: usize,
    quad: &[Point2; 4],
    glyphs: &[Glyph],
) -> RgbImageU8 {
    gaussian_blur(&render_plate(width, height, quad, glyphs), 1.0)
}
