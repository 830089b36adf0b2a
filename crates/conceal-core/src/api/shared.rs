use std::path::Path;

use image::{ImageFormat, RgbImage};
use log::error;

use crate::error::ConcealError;
use crate::result::Result;

/// Opens any image the `image` crate can decode, alpha is dropped
pub fn load_image(file: &Path) -> Result<RgbImage> {
    let img = image::open(file).map_err(|e| {
        error!("Error opening image {file:?}: {e}");
        ConcealError::InvalidImageMedia
    })?;

    Ok(img.to_rgb8())
}

/// Only PNG targets are accepted, any lossy format would wipe the low bits
pub fn check_png_target(file: &Path) -> Result<()> {
    let is_png = file
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("png"))
        .unwrap_or(false);
    if !is_png {
        return Err(ConcealError::UnsupportedMedia);
    }

    Ok(())
}

pub fn save_png(image: &RgbImage, file: &Path) -> Result<()> {
    check_png_target(file)?;

    image
        .save_with_format(file, ImageFormat::Png)
        .map_err(|e| {
            error!("Error saving image {file:?}: {e}");
            ConcealError::ImageEncodingError
        })
}
