//! Chart scaling on top of the `image` crate.
//!
//! | Step | Call |
//! |---|---|
//! | Identify | `image::image_dimensions` (header only, no full decode) |
//! | Decode (JPEG, PNG, BMP, GIF, TIFF, WebP) | `image::ImageReader` with format guessing |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode | `DynamicImage::save_with_format`, format taken from the output extension |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::ResizeParams;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::path::Path;

/// Stateless [`ImageBackend`] that decodes, scales and re-encodes in process.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode by content sniffing, so a chart saved with the wrong extension
/// still loads.
fn decode(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

fn encode(img: &DynamicImage, path: &Path) -> Result<(), BackendError> {
    let format = ImageFormat::from_path(path).map_err(|_| {
        BackendError::ProcessingFailed(format!("Unsupported output format: {}", path.display()))
    })?;

    // JPEG has no alpha channel
    let img = if format == ImageFormat::Jpeg && img.color().has_alpha() {
        DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
        img.clone()
    };

    img.save_with_format(path, format).map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to encode {}: {}", path.display(), e))
    })
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError> {
        let img = decode(&params.source)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        encode(&resized, &params.output)
    }
}
