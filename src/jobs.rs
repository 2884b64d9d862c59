//! Thumbnail job collection and the freshness check.
//!
//! A [`Job`] maps one source image to the destination file that mirrors it:
//!
//! ```text
//! charts/                         thumbs/
//! ├── wasabi2/                    ├── wasabi2/
//! │   ├── fresh.png        →      │   ├── fresh.png
//! │   └── notes.txt               │
//! └── index.jpg            →      └── index.jpg
//! ```
//!
//! Collection is a deterministic walk (entries sorted by file name) so the same
//! tree always yields the same job list. Files are matched by a fixed,
//! case-insensitive extension allow-list; everything else is ignored.
//!
//! [`should_process`] decides whether a destination is stale. It only reads
//! filesystem metadata and holds no state, so workers call it concurrently.

use crate::imaging::Scale;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// File name suffixes treated as images (compared lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".bmp", ".gif", ".tiff", ".webp"];

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Cannot read source directory {0}: {1}")]
    Unreadable(PathBuf, #[source] walkdir::Error),
}

/// One source image and the destination it is written to.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub scale: Scale,
    pub overwrite: bool,
}

/// Whether a file name carries one of the [`IMAGE_EXTENSIONS`].
pub fn is_image_file(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Walk `source_root` and build a job for every image file.
///
/// The destination of each job is `destination_root` joined with the
/// source's path relative to `source_root`. Returns an empty list when no
/// images exist. Only an unreadable `source_root` is an error; unreadable
/// entries below it are logged and skipped.
pub fn collect_jobs(
    source_root: &Path,
    destination_root: &Path,
    scale: Scale,
    overwrite: bool,
) -> Result<Vec<Job>, CollectError> {
    if !source_root.is_dir() {
        return Err(CollectError::SourceNotFound(source_root.to_path_buf()));
    }

    let mut jobs = Vec::new();
    for entry in WalkDir::new(source_root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(CollectError::Unreadable(source_root.to_path_buf(), e));
            }
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        // Symlinked files count; symlinked directories are not descended
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file || !is_image_file(&entry.file_name().to_string_lossy()) {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(source_root) else {
            continue;
        };
        jobs.push(Job {
            source: entry.path().to_path_buf(),
            destination: destination_root.join(relative),
            scale,
            overwrite,
        });
    }

    debug!("Collected {} jobs from {}", jobs.len(), source_root.display());
    Ok(jobs)
}

/// Decide whether a job's destination needs to be (re)written.
///
/// - `overwrite` → always process
/// - destination missing → process
/// - destination modified at or before the source → process (stale or same age)
/// - otherwise → skip
///
/// A failed metadata lookup means "process": a redundant resize is cheaper
/// than a stale thumbnail.
pub fn should_process(source: &Path, destination: &Path, overwrite: bool) -> bool {
    if overwrite || !destination.exists() {
        return true;
    }
    let modified = |path: &Path| std::fs::metadata(path).and_then(|m| m.modified());
    match (modified(destination), modified(source)) {
        (Ok(dst), Ok(src)) => dst <= src,
        _ => true,
    }
}
