//! Debug overlays for plate measurements.
use super::RgbImageU8;
use crate::image::ImageView;
use crate::types::Line;

/// Rasterize a one-pixel line by stepping along its major axis. Pixels outside
/// the image are skipped.
pub fn draw_line(image: &mut RgbImageU8, line: &Line, color: [u8; 3]) {
    let dx = line.p1[0] - line.p0[0];
    let dy = line.p1[1] - line.p0[1];
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
    let (w, h) = (image.width() as f64, image.height() as f64);
    for i in 0..=steps {
        let p = line.point_at(i as f64 / steps as f64);
        let x = p[0].round();
        let y = p[1].round();
        if x < 0.0 || y < 0.0 || x >= w || y >= h {
            continue;
        }
        image.put_pixel(x as usize, y as usize, color);
    }
}

pub fn draw_lines(image: &mut RgbImageU8, lines: &[Line], color: [u8; 3]) {
    for line in lines {
        draw_line(image, line, color);
    }
}
