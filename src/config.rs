//! Site configuration module.
//!
//! Loads and validates the JSON structure file (`structure.json` by default)
//! that describes every page of the report site.
//!
//! ## Example
//!
//! ```json
//! {
//!   "data_source": "data/",
//!   "image_url": "https://cdn.example.org/charts/",
//!   "thumbnail_url": "https://cdn.example.org/thumbs/",
//!   "web_base": "https://example.org/coinjoin/",
//!   "whitelist": [".png", "_cumul.jpg"],
//!   "pages": {
//!     "index":   { "name": "Overview", "paths": ["wasabi2/fresh.png"] },
//!     "wasabi2": { "name": "Wasabi 2", "active": true, "coordinators": [
//!         { "name": "zkSNACKs", "dir": "wasabi2_zksnacks" },
//!         { "name": "Kruw", "dir": "wasabi2_kruw", "large_images": ["wasabi2_kruw/top.png"] }
//!     ]},
//!     "whirlpool": { "name": "Whirlpool", "dir": "whirlpool" },
//!     "joinmarket": { "name": "JoinMarket", "dir": "joinmarket", "hidden": true }
//!   }
//! }
//! ```
//!
//! ## Page Kinds
//!
//! Every page has exactly one content source:
//!
//! - **`coordinators`**: one HTML file per coordinator under `<page>/`, each walking
//!   `data_source/<coordinator dir>`
//! - **`paths`**: a single grid of the listed image paths
//! - **`dir`**: a walk of `data_source/<dir>`
//!
//! Page order is the order of keys in the JSON object. Unknown keys are
//! rejected to catch typos early; structural mistakes are rejected at load,
//! not halfway through writing the site.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

fn default_title() -> String {
    "CoinJoin Statistics".to_string()
}

/// Validated site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Root of the chart image tree. Walk roots and image paths are relative to it.
    pub data_source: PathBuf,
    /// URL prefix for full-size images.
    pub image_url: String,
    /// URL prefix for thumbnails.
    pub thumbnail_url: String,
    /// `<base href>` of every generated page.
    pub web_base: String,
    /// Pages in document order.
    pub pages: Vec<Page>,
    /// File name suffixes that are shown in image grids.
    pub whitelist: Vec<String>,
    /// Site title used for `<title>` and the header.
    pub title: String,
    pub banner: Option<Banner>,
}

/// Notice shown above the header, e.g. pointing nightly visitors at a stable build.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Banner {
    pub text: String,
    pub url: String,
}

/// Extra section of iframes appended after the image sections.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Embeds {
    pub title: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// JSON key; names the output file.
    pub key: String,
    /// Display name in the menu and headings.
    pub name: String,
    pub active: bool,
    /// Generated but left out of the top menu.
    pub hidden: bool,
    pub source: PageSource,
    pub large_images: Vec<String>,
    pub embeds: Option<Embeds>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageSource {
    /// Never empty.
    Coordinators(Vec<Coordinator>),
    Paths(Vec<String>),
    Dir(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Coordinator {
    pub name: String,
    pub dir: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub large_images: Vec<String>,
    #[serde(default)]
    pub embeds: Option<Embeds>,
}

impl Page {
    /// Coordinators of this page, empty for `paths` and `dir` pages.
    pub fn coordinators(&self) -> &[Coordinator] {
        match &self.source {
            PageSource::Coordinators(list) => list,
            _ => &[],
        }
    }

    /// Menu target: the first coordinator's file, or the page's own file.
    pub fn link(&self) -> String {
        match self.coordinators().first() {
            Some(first) => coordinator_file(&self.key, &first.dir),
            None => format!("{}.html", self.key),
        }
    }
}

/// Output path (relative to the site root) of one coordinator page.
pub fn coordinator_file(page_key: &str, coordinator_dir: &str) -> String {
    format!("{}/{}.html", page_key, coordinator_dir)
}

impl SiteConfig {
    /// Whether `file_name` ends with one of the whitelisted suffixes.
    /// An empty suffix matches nothing.
    pub fn is_whitelisted(&self, file_name: &str) -> bool {
        self.whitelist
            .iter()
            .any(|suffix| !suffix.is_empty() && file_name.ends_with(suffix.as_str()))
    }

    #[cfg(test)]
    pub(crate) fn page(&self, key: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.key == key)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        let mut pages = Vec::with_capacity(raw.pages.len());
        for (key, raw_page) in raw.pages {
            if !seen.insert(key.clone()) {
                return Err(invalid(format!("page '{key}' is defined twice")));
            }
            pages.push(Page::from_raw(key, raw_page)?);
        }
        Ok(Self {
            data_source: raw.data_source,
            image_url: raw.image_url,
            thumbnail_url: raw.thumbnail_url,
            web_base: raw.web_base,
            pages,
            whitelist: raw.whitelist,
            title: raw.title,
            banner: raw.banner,
        })
    }
}

impl Page {
    fn from_raw(key: String, raw: RawPage) -> Result<Self, ConfigError> {
        if !is_single_segment(&key) {
            return Err(invalid(format!(
                "page key '{key}' must be a plain file name"
            )));
        }

        let source = match (raw.coordinators, raw.paths, raw.dir) {
            (Some(coordinators), None, None) => {
                validate_coordinators(&key, &coordinators)?;
                PageSource::Coordinators(coordinators)
            }
            (None, Some(paths), None) => PageSource::Paths(paths),
            (None, None, Some(dir)) => {
                if !is_relative_subpath(&dir) {
                    return Err(invalid(format!(
                        "page '{key}': dir '{dir}' must be a relative path inside data_source"
                    )));
                }
                PageSource::Dir(dir)
            }
            (None, None, None) => {
                return Err(invalid(format!(
                    "page '{key}' needs one of coordinators, paths or dir"
                )));
            }
            _ => {
                return Err(invalid(format!(
                    "page '{key}' must define only one of coordinators, paths or dir"
                )));
            }
        };

        let large_images = raw.large_images.unwrap_or_default();
        let has_extras = !large_images.is_empty() || raw.embeds.is_some();
        if has_extras && !matches!(source, PageSource::Dir(_)) {
            return Err(invalid(format!(
                "page '{key}': large_images and embeds apply to dir pages only \
                 (set them per coordinator instead)"
            )));
        }

        Ok(Self {
            key,
            name: raw.name,
            active: raw.active,
            hidden: raw.hidden,
            source,
            large_images,
            embeds: raw.embeds,
        })
    }
}

fn validate_coordinators(key: &str, coordinators: &[Coordinator]) -> Result<(), ConfigError> {
    if coordinators.is_empty() {
        return Err(invalid(format!("page '{key}' has an empty coordinators list")));
    }
    let mut dirs = HashSet::new();
    for coordinator in coordinators {
        if !is_single_segment(&coordinator.dir) {
            return Err(invalid(format!(
                "page '{key}': coordinator dir '{}' must be a plain directory name",
                coordinator.dir
            )));
        }
        if !dirs.insert(coordinator.dir.as_str()) {
            return Err(invalid(format!(
                "page '{key}': coordinator dir '{}' is used twice",
                coordinator.dir
            )));
        }
    }
    Ok(())
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Validation(message)
}

/// A name usable as one path segment: non-empty, no separators, not `.`/`..`.
fn is_single_segment(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
}

/// A relative path that cannot escape its parent.
fn is_relative_subpath(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

// =============================================================================
// Raw (unvalidated) JSON shape
// =============================================================================

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    data_source: PathBuf,
    image_url: String,
    thumbnail_url: String,
    web_base: String,
    #[serde(deserialize_with = "ordered_entries")]
    pages: Vec<(String, RawPage)>,
    whitelist: Vec<String>,
    #[serde(default = "default_title")]
    title: String,
    #[serde(default)]
    banner: Option<Banner>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPage {
    name: String,
    #[serde(default)]
    active: bool,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    coordinators: Option<Vec<Coordinator>>,
    #[serde(default)]
    paths: Option<Vec<String>>,
    #[serde(default)]
    dir: Option<String>,
    #[serde(default)]
    large_images: Option<Vec<String>>,
    #[serde(default)]
    embeds: Option<Embeds>,
}

/// Deserialize a JSON object into `(key, value)` pairs in document order.
fn ordered_entries<'de, D, V>(deserializer: D) -> Result<Vec<(String, V)>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct OrderedVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
        type Value = Vec<(String, V)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of page definitions")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, V>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(OrderedVisitor(PhantomData))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Loading
// =============================================================================

/// Parse and validate a config from JSON text.
pub fn parse_config(json: &str) -> Result<SiteConfig, ConfigError> {
    let raw: RawConfig = serde_json::from_str(json)?;
    SiteConfig::from_raw(raw)
}

/// Load and validate the config file at `path`.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
    parse_config(&content)
}
