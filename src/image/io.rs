//! File helpers for frames, masks and JSON reports.
//!
//! - `load_rgb_image`: read a PNG/JPEG/etc. into an owned RGB buffer.
//! - `save_mask_png`: write a binary mask as black/white PNG.
//! - `save_rgb_png`: write an owned RGB buffer.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{ImageView, LaneMask, RgbImage8};
use crate::error::IoError;
use ::image::{GrayImage, Luma, RgbImage};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load an image from disk and convert it to 8-bit RGB.
pub fn load_rgb_image(path: &Path) -> Result<RgbImage8, IoError> {
    let img = ::image::open(path)
        .map_err(|source| IoError::Image {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    Ok(RgbImage8::new(width, height, img.into_raw()))
}

/// Save a binary mask (on = 255, off = 0).
pub fn save_mask_png(mask: &LaneMask, path: &Path) -> Result<(), IoError> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(mask.width() as u32, mask.height() as u32);
    for (y, row) in mask.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            out.put_pixel(x as u32, y as u32, Luma([if px != 0 { 255 } else { 0 }]));
        }
    }
    out.save(path).map_err(|source| IoError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Save an owned RGB buffer.
pub fn save_rgb_png(buffer: &RgbImage8, path: &Path) -> Result<(), IoError> {
    ensure_parent_dir(path)?;
    let image = RgbImage::from_raw(
        buffer.width() as u32,
        buffer.height() as u32,
        buffer.clone().into_raw(),
    )
    .ok_or_else(|| IoError::Buffer {
        path: path.to_path_buf(),
    })?;
    image.save(path).map_err(|source| IoError::Image {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), IoError> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value).map_err(|source| IoError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_parent_dir(path: &Path) -> Result<(), IoError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| IoError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}
