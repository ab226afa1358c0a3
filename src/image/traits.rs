/// Read access to a row-major image with an element stride between rows.
///
/// `Pixel` is the element type of a row; for interleaved color images a row
/// holds `channels() * width()` elements.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn stride(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    /// Interleaved elements per pixel.
    fn channels(&self) -> usize {
        1
    }

    fn rows(&self) -> Rows<'_, Self>
    where
        Self: Sized,
    {
        Rows { image: self, y: 0 }
    }

    fn is_contiguous(&self) -> bool {
        self.stride() == self.width() * self.channels()
    }

    fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];
}

pub struct Rows<'a, I: ?Sized + ImageView> {
    image: &'a I,
    y: usize,
}

impl<'a, I: ImageView> Iterator for Rows<'a, I> {
    type Item = &'a [I::Pixel];

    fn next(&mut self) -> Option<Self::Item> {
        if self.y >= self.image.height() {
            return None;
        }
        let y = self.y;
        self.y += 1;
        Some(self.image.row(y))
    }
}
