//! One thumbnail job's image work: read the size, pick the output size,
//! hand the resize to the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::scaled_dimensions;
use super::params::{ResizeParams, Scale};
use std::path::Path;

pub type Result<T> = std::result::Result<T, BackendError>;

/// `(width, height)` as the backend reports it.
fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Write a scaled copy of `source` to `output`.
///
/// Missing parent directories of `output` are created first. Creation is
/// idempotent, so workers racing on the same directory do not fail.
/// Returns the dimensions that were written.
pub fn create_scaled_copy(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    scale: Scale,
) -> Result<(u32, u32)> {
    let original = get_dimensions(backend, source)?;
    let (width, height) = scaled_dimensions(original, scale);
    if width == 0 || height == 0 {
        return Err(BackendError::ProcessingFailed(format!(
            "{}x{} at scale {} leaves an empty image",
            original.0, original.1, scale
        )));
    }

    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    backend.resize(&ResizeParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width,
        height,
    })?;
    Ok((width, height))
}
