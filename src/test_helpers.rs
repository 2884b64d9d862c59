//! Shared test utilities for the coinjoin-web test suite.
//!
//! Provides image writers, mtime manipulation, and a small chart-tree fixture
//! that the walker, renderer and generator tests share.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let data = chart_tree(tmp.path());
//! let config = site_config(&data, PAGES_JSON);
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use image::codecs::jpeg::JpegEncoder;
use image::{ImageEncoder, RgbImage, RgbaImage};

use crate::config::{SiteConfig, parse_config};

// =========================================================================
// Image and file writers
// =========================================================================

/// Write a real JPEG of the given size, creating parent directories.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, 90)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    write_file(path, &buf);
}

/// Write a real RGBA PNG of the given size, creating parent directories.
pub fn write_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let img = RgbaImage::from_fn(width, height, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 64, 200])
    });
    img.save(path).unwrap();
}

/// Write arbitrary bytes, creating parent directories.
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

// =========================================================================
// Modification times
// =========================================================================

pub fn set_modified_at(path: &Path, time: SystemTime) {
    fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

/// Backdate a file's mtime by `secs` seconds.
pub fn set_modified_ago(path: &Path, secs: u64) {
    set_modified_at(path, SystemTime::now() - Duration::from_secs(secs));
}

// =========================================================================
// Site fixtures
// =========================================================================

/// Build a small chart tree under `root/data` and return its path.
///
/// ```text
/// data/
/// ├── summary.json
/// ├── texts/wasabi2.html
/// ├── ww2_kruw/
/// │   ├── top.png
/// │   ├── 2024-05-01 10-00-00/volume.png, notes.txt
/// │   └── 2024-06-01 10-00-00/volume.png, fees.jpg
/// └── whirlpool/
///     ├── overview.png
///     └── pools/a.png, b.PNG
/// ```
pub fn chart_tree(root: &Path) -> PathBuf {
    let data = root.join("data");
    for rel in [
        "ww2_kruw/top.png",
        "ww2_kruw/2024-05-01 10-00-00/volume.png",
        "ww2_kruw/2024-05-01 10-00-00/notes.txt",
        "ww2_kruw/2024-06-01 10-00-00/volume.png",
        "ww2_kruw/2024-06-01 10-00-00/fees.jpg",
        "whirlpool/overview.png",
        "whirlpool/pools/a.png",
        "whirlpool/pools/b.PNG",
    ] {
        write_file(&data.join(rel), b"chart");
    }
    write_file(&data.join("summary.json"), r#"{"date": "14-06-2024"}"#);
    write_file(
        &data.join("texts/wasabi2.html"),
        "<p>Wasabi coordinators</p>",
    );
    data
}

/// Pages matching [`chart_tree`].
pub const PAGES_JSON: &str = r#"{
    "index": {"name": "Overview", "paths": ["whirlpool/overview.png"]},
    "wasabi2": {"name": "Wasabi 2", "active": true, "coordinators": [
        {"name": "Kruw", "dir": "ww2_kruw", "large_images": ["ww2_kruw/top.png"]},
        {"name": "Gingerwallet", "dir": "ww2_ginger"}
    ]},
    "whirlpool": {"name": "Whirlpool", "dir": "whirlpool"},
    "joinmarket": {"name": "JoinMarket", "dir": "joinmarket", "hidden": true}
}"#;

/// A validated config rooted at `data_source` with the given `pages` object.
pub fn site_config(data_source: &Path, pages: &str) -> SiteConfig {
    // Formatted by hand: a `serde_json::Value` round trip would sort page keys
    let json = format!(
        r#"{{
            "data_source": {},
            "image_url": "https://img.example/",
            "thumbnail_url": "https://thumb.example/",
            "web_base": "https://site.example/",
            "whitelist": [".png"],
            "pages": {pages}
        }}"#,
        serde_json::to_string(data_source).unwrap()
    );
    parse_config(&json).unwrap()
}
