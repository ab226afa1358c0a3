use super::traits::{ImageView, ImageViewMut};

/// Borrowed single-channel 8-bit view.
#[derive(Clone, Copy, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// Bilinear intensity at a sub-pixel position. Coordinates are clamped to
    /// the pixel-center range `[0, w-1] × [0, h-1]` before interpolation.
    pub fn sample_bilinear_clamped(&self, x: f64, y: f64) -> f64 {
        if self.w == 0 || self.h == 0 {
            return 0.0;
        }
        let max_x = (self.w - 1) as f64;
        let max_y = (self.h - 1) as f64;
        let xc = if x.is_finite() { x.clamp(0.0, max_x) } else { 0.0 };
        let yc = if y.is_finite() { y.clamp(0.0, max_y) } else { 0.0 };
        let x0 = xc.floor() as usize;
        let y0 = yc.floor() as usize;
        let x1 = (x0 + 1).min(self.w - 1);
        let y1 = (y0 + 1).min(self.h - 1);
        let tx = xc - x0 as f64;
        let ty = yc - y0 as f64;
        let v00 = self.get(x0, y0) as f64;
        let v10 = self.get(x1, y0) as f64;
        let v01 = self.get(x0, y1) as f64;
        let v11 = self.get(x1, y1) as f64;
        let top = v00 * (1.0 - tx) + v10 * tx;
        let bottom = v01 * (1.0 - tx) + v11 * tx;
        top * (1.0 - ty) + bottom * ty
    }
}

impl<'a> ImageView for ImageU8<'a> {
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
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}

/// Owned, tightly packed 8-bit grayscale buffer. Binary masks use the same
/// type with values `0` and `255`.
#[derive(Clone, Debug, PartialEq)]
pub struct GrayImageU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayImageU8 {
    /// Wrap raw row-major bytes. Returns `None` when the length does not match.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (width.checked_mul(height)? == data.len()).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: u8) {
        self.data[y * self.width + x] = v;
    }

    /// Borrow as a read-only `ImageU8` view.
    pub fn as_view(&self) -> ImageU8<'_> {
        ImageU8 {
            w: self.width,
            h: self.height,
            stride: self.width,
            data: &self.data,
        }
    }
}

impl ImageView for GrayImageU8 {
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
        self.width
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.width;
        &self.data[start..start + self.width]
    }
}

impl ImageViewMut for GrayImageU8 {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let start = y * self.width;
        &mut self.data[start..start + self.width]
    }
}
