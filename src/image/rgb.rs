//! Interleaved RGB buffers and the color conversions applied to plate patches.
//!
//! - `value_channel`: HSV value, `max(r, g, b)`, the input to thresholding.
//! - `to_gray`: BT.601 luma used for intensity profiles.
//! - `balance_white`: per-channel percentile stretch.
//! - `crop`: box copy with border replication.
use super::traits::{ImageView, ImageViewMut};
use super::GrayImageU8;
use crate::types::BoundingBox;

/// Borrowed interleaved RGB view; `stride` counts bytes between rows.
#[derive(Clone, Copy, Debug)]
pub struct ImageRgb8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize,
    pub data: &'a [u8],
}

impl<'a> ImageRgb8<'a> {
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = y * self.stride + 3 * x;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// HSV value channel.
    pub fn value_channel(&self) -> GrayImageU8 {
        self.map_to_gray(|[r, g, b]| r.max(g).max(b))
    }

    /// Luma `0.299 r + 0.587 g + 0.114 b`, rounded to nearest.
    pub fn to_gray(&self) -> GrayImageU8 {
        self.map_to_gray(|[r, g, b]| {
            let y = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
            y.round().clamp(0.0, 255.0) as u8
        })
    }

    fn map_to_gray(&self, f: impl Fn([u8; 3]) -> u8) -> GrayImageU8 {
        let mut out = GrayImageU8::filled(self.w, self.h, 0);
        for y in 0..self.h {
            let src = self.row(y);
            let dst = out.row_mut(y);
            for (x, px) in dst.iter_mut().enumerate() {
                *px = f([src[3 * x], src[3 * x + 1], src[3 * x + 2]]);
            }
        }
        out
    }

    /// Stretch every channel so its `[percent, 100 - percent]` percentile range
    /// maps onto `[0, 255]`. Channels with an empty range are copied unchanged.
    pub fn balance_white(&self, percent: f64) -> RgbImageU8 {
        let mut out = self.to_rgb_image();
        let total = self.w * self.h;
        if total == 0 {
            return out;
        }
        let p = percent.clamp(0.0, 49.0) / 100.0;
        for c in 0..3 {
            let mut hist = [0usize; 256];
            for y in 0..self.h {
                let row = self.row(y);
                for x in 0..self.w {
                    hist[row[3 * x + c] as usize] += 1;
                }
            }
            let skip = (p * total as f64).floor() as usize;
            let lo = percentile_from_below(&hist, skip);
            let hi = percentile_from_above(&hist, skip);
            if hi <= lo {
                continue;
            }
            let scale = 255.0 / (hi - lo) as f64;
            for y in 0..self.h {
                let row = out.row_mut(y);
                for x in 0..self.w {
                    let v = row[3 * x + c] as f64;
                    row[3 * x + c] = ((v - lo as f64) * scale).round().clamp(0.0, 255.0) as u8;
                }
            }
        }
        out
    }

    /// Copy the pixels inside `bbox`; parts outside the image replicate the
    /// nearest border pixel.
    pub fn crop(&self, bbox: &BoundingBox) -> RgbImageU8 {
        let w = bbox.width() as usize;
        let h = bbox.height() as usize;
        let mut out = RgbImageU8::filled(w, h, [0, 0, 0]);
        if self.w == 0 || self.h == 0 {
            return out;
        }
        for oy in 0..h {
            let sy = (bbox.top + oy as i32).clamp(0, self.h as i32 - 1) as usize;
            let dst = out.row_mut(oy);
            for ox in 0..w {
                let sx = (bbox.left + ox as i32).clamp(0, self.w as i32 - 1) as usize;
                dst[3 * ox..3 * ox + 3].copy_from_slice(&self.pixel(sx, sy));
            }
        }
        out
    }

    pub fn to_rgb_image(&self) -> RgbImageU8 {
        let mut data = Vec::with_capacity(self.w * self.h * 3);
        for y in 0..self.h {
            data.extend_from_slice(self.row(y));
        }
        RgbImageU8 {
            width: self.w,
            height: self.h,
            data,
        }
    }
}

fn percentile_from_below(hist: &[usize; 256], skip: usize) -> usize {
    let mut acc = 0usize;
    for (v, &count) in hist.iter().enumerate() {
        acc += count;
        if acc > skip {
            return v;
        }
    }
    255
}

fn percentile_from_above(hist: &[usize; 256], skip: usize) -> usize {
    let mut acc = 0usize;
    for (v, &count) in hist.iter().enumerate().rev() {
        acc += count;
        if acc > skip {
            return v;
        }
    }
    0
}

impl<'a> ImageView for ImageRgb8<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn channels(&self) -> usize {
        3
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + 3 * self.w]
    }
}

/// Owned, tightly packed RGB buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbImageU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbImageU8 {
    /// Wrap raw interleaved bytes. Returns `None` when the length does not match.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (width.checked_mul(height)?.checked_mul(3)? == data.len()).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn from_gray(gray: &GrayImageU8) -> Self {
        let mut data = Vec::with_capacity(gray.data().len() * 3);
        for &v in gray.data() {
            data.extend_from_slice(&[v, v, v]);
        }
        Self {
            width: gray.width(),
            height: gray.height(),
            data,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn put_pixel(&mut self, x: usize, y: usize, rgb: [u8; 3]) {
        let i = 3 * (y * self.width + x);
        self.data[i..i + 3].copy_from_slice(&rgb);
    }

    pub fn as_view(&self) -> ImageRgb8<'_> {
        ImageRgb8 {
            w: self.width,
            h: self.height,
            stride: 3 * self.width,
            data: &self.data,
        }
    }
}

impl ImageView for RgbImageU8 {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.width
    }
    #[inline]
    fn height(&self) -> usize {
        self.height
    }
    #[inline]
    fn stride(&self) -> usize {
        3 * self.width
    }
    #[inline]
    fn channels(&self) -> usize {
        3
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * 3 * self.width;
        &self.data[start..start + 3 * self.width]
    }
}

impl ImageViewMut for RgbImageU8 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * 3 * self.width;
        let end = start + 3 * self.width;
        &mut self.data[start..end]
    }
}
