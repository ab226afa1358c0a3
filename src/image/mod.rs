//! Strided 8-bit image buffers and the color/gray conversions used before
//! contour extraction and edge sampling.
pub mod draw;
pub mod io;
pub mod rgb;
pub mod traits;
pub mod u8;

pub use self::rgb::{ImageRgb8, RgbImageU8};
pub use self::traits::{ImageView, ImageViewMut, Rows};
pub use self::u8::{GrayImageU8, ImageU8};
