//! Global Otsu thresholding of an 8-bit channel.
use crate::image::{GrayImageU8, ImageView, ImageViewMut};

/// Foreground value written into binary masks.
pub const FOREGROUND: u8 = 255;

/// Otsu threshold of `img`. Values strictly greater than the returned level
/// belong to the upper class.
///
/// When no split separates two non-empty classes (a constant image) the
/// largest intensity present is returned, so nothing lies above it.
pub fn otsu_threshold<I: ImageView<Pixel = u8>>(img: &I) -> u8 {
    let mut hist = [0u64; 256];
    for row in img.rows() {
        for &v in row {
            hist[v as usize] += 1;
        }
    }
    otsu_from_histogram(&hist)
}

pub(crate) fn otsu_from_histogram(hist: &[u64; 256]) -> u8 {
    let total: u64 = hist.iter().sum();
    if total == 0 {
        return 0;
    }
    let sum_all: f64 = hist
        .iter()
        .enumerate()
        .map(|(v, &c)| v as f64 * c as f64)
        .sum();

    let mut best_sigma = 0.0f64;
    let mut best_t: Option<usize> = None;
    let mut w0 = 0u64;
    let mut sum0 = 0.0f64;
    for (t, &count) in hist.iter().enumerate() {
        w0 += count;
        sum0 += t as f64 * count as f64;
        let w1 = total - w0;
        if w0 == 0 || w1 == 0 {
            continue;
        }
        let mu0 = sum0 / w0 as f64;
        let mu1 = (sum_all - sum0) / w1 as f64;
        let sigma = w0 as f64 * w1 as f64 * (mu0 - mu1) * (mu0 - mu1);
        if sigma > best_sigma {
            best_sigma = sigma;
            best_t = Some(t);
        }
    }
    match best_t {
        Some(t) => t as u8,
        None => hist.iter().rposition(|&c| c > 0).unwrap_or(0) as u8,
    }
}

/// Binary mask with `FOREGROUND` where `src > threshold` and 0 elsewhere.
pub fn binarize<I: ImageView<Pixel = u8>>(src: &I, threshold: u8) -> GrayImageU8 {
    let mut out = GrayImageU8::filled(src.width(), src.height(), 0);
    for y in 0..src.height() {
        let row = src.row(y);
        for (dst, &v) in out.row_mut(y).iter_mut().zip(row) {
            if v > threshold {
                *dst = FOREGROUND;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otsu_separates_bimodal_histogram() {
        let mut data = vec![40u8; 60];
        data.extend(std::iter::repeat(200u8).take(40));
        data[3] = 45;
        data[70] = 190;
        let img = GrayImageU8::new(10, 10, data).expect("size matches");
        let t = otsu_threshold(&img);
        assert!((45..190).contains(&t), "threshold {t}");
        let mask = binarize(&img, t);
        let fg = mask.data().iter().filter(|&&v| v == FOREGROUND).count();
        assert_eq!(fg, 40);
    }

    #[test]
    fn constant_image_has_no_foreground() {
        let img = GrayImageU8::filled(4, 4, 128);
        let t = otsu_threshold(&img);
        assert_eq!(t, 128);
        assert!(binarize(&img, t).data().iter().all(|&v| v == 0));
    }
}
