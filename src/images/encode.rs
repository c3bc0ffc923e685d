//! Raster re-encoding with the `image` crate.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageFormat, Luma};

use crate::error::{Error, Result};

/// Luma at or above this value becomes white in bitonal output.
const BITONAL_THRESHOLD: u8 = 128;

/// Output format for an image file suffix.
pub fn format_for_suffix(suffix: &str) -> Result<ImageFormat> {
    match suffix {
        "png" => Ok(ImageFormat::Png),
        "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
        "tif" | "tiff" => Ok(ImageFormat::Tiff),
        other => Err(Error::MissingImageWriter(other.to_string())),
    }
}

/// Encode a raster in `format`.
pub fn encode(raster: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    match format {
        // no alpha channel in JPEG
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(raster.to_rgb8()).write_to(&mut out, format)?,
        _ => raster.write_to(&mut out, format)?,
    }
    Ok(out.into_inner())
}

/// Threshold a raster to pure black and white.
pub fn to_bitonal(raster: &DynamicImage) -> GrayImage {
    let mut gray = raster.to_luma8();
    for Luma([value]) in gray.pixels_mut() {
        *value = if *value >= BITONAL_THRESHOLD { 255 } else { 0 };
    }
    gray
}

/// Encode a raster as a black and white TIFF.
pub fn encode_bitonal_tiff(raster: &DynamicImage) -> Result<Vec<u8>> {
    encode(&DynamicImage::ImageLuma8(to_bitonal(raster)), ImageFormat::Tiff)
}
