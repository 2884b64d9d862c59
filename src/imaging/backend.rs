//! The seam between thumbnail logic and pixel work.
//!
//! [`ImageBackend`] covers the two things a scaled copy needs: reading an
//! image's size and writing a resized copy. Production code uses
//! [`RustBackend`](super::rust_backend::RustBackend); tests use
//! [`MockBackend`](tests::MockBackend), which answers from a table and
//! records every call.

use super::params::ResizeParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Image operations used by the thumbnail pipeline.
///
/// One backend is shared by every worker, so implementations are `Sync`
/// and keep no per-job state.
pub trait ImageBackend: Sync {
    /// Read width and height, ideally from the header alone.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Write `params.source` scaled to exactly `params.width`×`params.height`
    /// at `params.output`. The parent directory already exists.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;
}
