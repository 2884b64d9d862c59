//! Chart directory walking.
//!
//! Turns a directory under `data_source` into an ordered list of
//! [`Section`]s: one per visited directory, each with an optional heading
//! and an optional grid of image paths.
//!
//! ## Traversal Order
//!
//! ```text
//! ww2_kruw/                        # walk root: no heading
//! ├── top.png                      # files of a directory come first
//! ├── 2024-06-01 10-00-00/         # subdirectories in reverse name order,
//! │   ├── fees.png                 #   so the newest timestamp comes first
//! │   └── volume.png               # files in name order
//! └── 2024-05-01 10-00-00/
//!     └── volume.png
//! ```
//!
//! A directory gets a heading when it lies below `data_source` itself
//! (depth ≥ 1). Depth counts path components below `data_source`, minus
//! one, so `data_source/ww2_kruw` is depth 0 and its children depth 1.
//! The heading level is `depth + 1`, capped at `h6` when rendered.
//!
//! A directory with at least one file gets an image grid, even when none of
//! its files pass the whitelist; a directory with no files gets none.
//! Image paths are relative to `data_source` with `/` separators, ready to
//! be appended to the image and thumbnail URL prefixes.

use crate::config::SiteConfig;
use crate::dates::section_label;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One visited directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: Option<Heading>,
    /// `None` when the directory holds no files at all.
    pub images: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    /// HTML heading level, `depth + 1`.
    pub level: usize,
    pub text: String,
}

/// Walk `data_source/<dir>` and return its sections in display order.
///
/// Every heading text is `prefix` followed by the directory's month label
/// (or its name). A missing or unreadable walk root is logged and yields no
/// sections; unreadable subdirectories are skipped the same way.
pub fn walk_sections(config: &SiteConfig, dir: &str, prefix: &str) -> Vec<Section> {
    let root = config.data_source.join(dir);
    if !root.is_dir() {
        warn!("Chart directory not found: {}", root.display());
        return Vec::new();
    }

    let mut sections = Vec::new();
    visit(config, &root, prefix, &mut sections);
    debug!("Walked {}: {} sections", root.display(), sections.len());
    sections
}

fn visit(config: &SiteConfig, dir: &Path, prefix: &str, sections: &mut Vec<Section>) {
    let (files, mut subdirs) = match collect_entries(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Skipping unreadable directory {}: {}", dir.display(), e);
            return;
        }
    };

    let depth = depth_below(&config.data_source, dir);
    let heading = (depth > 0).then(|| Heading {
        level: depth + 1,
        text: format!("{}{}", prefix, section_label(&file_name(dir))),
    });

    let images = (!files.is_empty()).then(|| {
        files
            .iter()
            .filter(|f| config.is_whitelisted(&file_name(f)))
            .filter_map(|f| relative_url_path(&config.data_source, f))
            .collect()
    });

    sections.push(Section { heading, images });

    subdirs.sort_by(|a, b| b.cmp(a));
    for subdir in subdirs {
        visit(config, &subdir, prefix, sections);
    }
}

/// Split a directory's entries into sorted files and (unsorted) subdirectories.
///
/// Symlinked directories are listed but not followed.
fn collect_entries(dir: &Path) -> std::io::Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let mut files = Vec::new();
    let mut subdirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let path = entry.path();
        if file_type.is_dir() {
            subdirs.push(path);
        } else if file_type.is_symlink() && path.is_dir() {
            debug!("Not following symlinked directory {}", path.display());
        } else {
            files.push(path);
        }
    }
    files.sort();
    Ok((files, subdirs))
}

fn depth_below(data_source: &Path, dir: &Path) -> usize {
    dir.strip_prefix(data_source)
        .map(|rel| rel.components().count().saturating_sub(1))
        .unwrap_or(0)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn relative_url_path(data_source: &Path, file: &Path) -> Option<String> {
    let rel = file.strip_prefix(data_source).ok()?;
    Some(
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
    )
}
