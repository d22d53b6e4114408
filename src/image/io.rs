//! I/O helpers for RGB images, masks and JSON.
//!
//! - `load_rgb_image`: read a PNG/JPEG into an owned `ImageRgb8`.
//! - `load_mask_image`: read a grayscale mask PNG and scale it to [0, 1].
//! - `save_rgb_image`: write an `ImageRgb8` to a PNG.
//! - `save_binary_mask`: write a mask or edge map as a black/white PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{BinaryMask, ImageF32, ImageRgb8};
use crate::error::{PanelError, Result};
use image::{GrayImage, Luma, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk as 8-bit RGB.
pub fn load_rgb_image(path: &Path) -> Result<ImageRgb8> {
    let img = image::open(path)?.into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    ImageRgb8::from_raw(width, height, img.into_raw())
}

/// Load a grayscale mask; 0 maps to 0.0 and 255 maps to 1.0.
pub fn load_mask_image(path: &Path) -> Result<ImageF32> {
    let img = image::open(path)?.into_luma8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img.into_raw().into_iter().map(|v| v as f32 / 255.0).collect();
    ImageF32::from_vec(width, height, data)
}

/// Save an RGB image, format chosen from the file extension.
pub fn save_rgb_image(image: &ImageRgb8, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let out = RgbImage::from_raw(image.w as u32, image.h as u32, image.to_raw())
        .ok_or_else(|| PanelError::shape("save_rgb_image", (image.w, image.h), (0, 0)))?;
    out.save(path)?;
    Ok(())
}

/// Save a boolean raster as 0/255 grayscale.
pub fn save_binary_mask(mask: &BinaryMask, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(mask.w as u32, mask.h as u32);
    for (x, y) in mask.points() {
        out.put_pixel(x as u32, y as u32, Luma([255u8]));
    }
    out.save(path)?;
    Ok(())
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|e| {
        PanelError::Config(format!("failed to serialize JSON for {}: {e}", path.display()))
    })?;
    fs::write(path, json)?;
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
