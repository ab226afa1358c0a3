//! I/O helpers for plate images and JSON.
//!
//! - `load_rgb_image`: read a PNG/JPEG/etc. into an owned RGB buffer.
//! - `save_rgb_u8` / `save_grayscale_u8`: write owned buffers to PNG.
//! - `write_json_file` / `read_json_file`: serde JSON round trips on disk.
use super::{GrayImageU8, ImageView, RgbImageU8};
use image::{DynamicImage, GrayImage, RgbImage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert to 8-bit RGB.
pub fn load_rgb_image(path: &Path) -> Result<RgbImageU8, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    RgbImageU8::new(width, height, img.into_raw())
        .ok_or_else(|| format!("Unexpected buffer size decoding {}", path.display()))
}

/// Save an RGB buffer to a PNG (or any format implied by the extension).
pub fn save_rgb_u8(buffer: &RgbImageU8, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let image = RgbImage::from_raw(
        buffer.width() as u32,
        buffer.height() as u32,
        buffer.data().to_vec(),
    )
    .ok_or_else(|| "Failed to create image buffer".to_string())?;
    DynamicImage::ImageRgb8(image)
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save an 8-bit grayscale buffer (e.g. a threshold mask) to a PNG.
pub fn save_grayscale_u8(buffer: &GrayImageU8, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let image = GrayImage::from_raw(
        buffer.width() as u32,
        buffer.height() as u32,
        buffer.data().to_vec(),
    )
    .ok_or_else(|| "Failed to create image buffer".to_string())?;
    DynamicImage::ImageLuma8(image)
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

/// Parse a JSON document from `path`.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&data).map_err(|e| format!("Failed to parse {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
