//! Binary morphology with a square structuring element.
//!
//! Erosion and dilation are separable min/max filters. Pixels outside the
//! image never take part in the min/max, so borders neither grow nor shrink
//! the foreground on their own.
use crate::image::{GrayImageU8, ImageView, ImageViewMut};

#[derive(Clone, Copy)]
enum Reduce {
    Min,
    Max,
}

impl Reduce {
    #[inline]
    fn apply(self, a: u8, b: u8) -> u8 {
        match self {
            Reduce::Min => a.min(b),
            Reduce::Max => a.max(b),
        }
    }
}

/// Window `[i - before, i + after]` for a kernel of size `k`, anchored at its center.
#[inline]
fn window(k: usize) -> (usize, usize) {
    let before = k / 2;
    (before, k.saturating_sub(1) - before)
}

fn filter_1d(src: &[u8], dst: &mut [u8], k: usize, op: Reduce) {
    let n = src.len();
    let (before, after) = window(k);
    for (i, out) in dst.iter_mut().enumerate() {
        let lo = i.saturating_sub(before);
        let hi = (i + after).min(n - 1);
        let mut acc = src[lo];
        for &v in &src[lo + 1..=hi] {
            acc = op.apply(acc, v);
        }
        *out = acc;
    }
}

fn filter(img: &GrayImageU8, k: usize, op: Reduce) -> GrayImageU8 {
    let (w, h) = (img.width(), img.height());
    if k <= 1 || w == 0 || h == 0 {
        return img.clone();
    }
    let mut horizontal = GrayImageU8::filled(w, h, 0);
    for y in 0..h {
        filter_1d(img.row(y), horizontal.row_mut(y), k, op);
    }
    let mut out = GrayImageU8::filled(w, h, 0);
    let mut column = vec![0u8; h];
    let mut filtered = vec![0u8; h];
    for x in 0..w {
        for (y, c) in column.iter_mut().enumerate() {
            *c = horizontal.get(x, y);
        }
        filter_1d(&column, &mut filtered, k, op);
        for (y, &v) in filtered.iter().enumerate() {
            out.set(x, y, v);
        }
    }
    out
}

pub fn erode(img: &GrayImageU8, kernel_size: usize) -> GrayImageU8 {
    filter(img, kernel_size, Reduce::Min)
}

pub fn dilate(img: &GrayImageU8, kernel_size: usize) -> GrayImageU8 {
    filter(img, kernel_size, Reduce::Max)
}

/// Dilation followed by erosion; fills gaps narrower than the kernel.
pub fn close(img: &GrayImageU8, kernel_size: usize) -> GrayImageU8 {
    erode(&dilate(img, kernel_size), kernel_size)
}

/// Erosion followed by dilation; removes specks narrower than the kernel.
pub fn open(img: &GrayImageU8, kernel_size: usize) -> GrayImageU8 {
    dilate(&erode(img, kernel_size), kernel_size)
}
