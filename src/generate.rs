//! Static site generation.
//!
//! Walks the configured pages in order and writes one HTML file per page, or
//! one per coordinator for coordinator pages.
//!
//! ## Output Structure
//!
//! ```text
//! <output>/
//! ├── index.html                  # paths page
//! ├── whirlpool.html              # dir page
//! ├── wasabi2/                    # coordinators page
//! │   ├── ww2_kruw.html
//! │   └── ww2_ginger.html
//! └── js/lightbox.js              # embedded viewer script
//! ```
//!
//! Page bodies:
//!
//! - **coordinator**: coordinator large images, walk of `data_source/<dir>`
//!   headed `"<page> - <coordinator> - "`, coordinator embeds
//! - **paths**: a single grid of the listed images
//! - **dir**: page large images, walk of `data_source/<dir>` headed
//!   `"<page> - "`, page embeds
//!
//! `style.css`, `favicon.ico` and `legend.png` are referenced but not
//! produced; they ship with the deployed site.

use crate::config::{Coordinator, Page, PageSource, SiteConfig, coordinator_file};
use crate::content::load_snippet;
use crate::dates::BuildStamp;
use crate::render::{self, LIGHTBOX_JS_PATH, PageContext};
use crate::scan::{Section, walk_sections};
use maud::{Markup, html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

const LIGHTBOX_JS: &str = include_str!("../static/lightbox.js");

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Cannot write {0}: {1}")]
    Write(PathBuf, #[source] std::io::Error),
}

/// One written HTML file.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPage {
    /// Page display name.
    pub page: String,
    pub coordinator: Option<String>,
    /// Path relative to the output directory.
    pub path: String,
    /// Image blocks rendered, large images included.
    pub images: usize,
}

#[derive(Debug, Default)]
pub struct GenerateReport {
    pub pages: Vec<GeneratedPage>,
    /// Static assets written, relative to the output directory.
    pub assets: Vec<String>,
}

impl GenerateReport {
    pub fn total_images(&self) -> usize {
        self.pages.iter().map(|p| p.images).sum()
    }
}

/// Render a page body and count its image blocks.
struct Body {
    markup: Markup,
    images: usize,
}

/// Write the whole site into `output_dir`.
pub fn generate(
    config: &SiteConfig,
    stamp: &BuildStamp,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let mut report = GenerateReport::default();
    create_dir(output_dir)?;

    for page in &config.pages {
        match &page.source {
            PageSource::Coordinators(coordinators) => {
                create_dir(&output_dir.join(&page.key))?;
                for coordinator in coordinators {
                    let rel = coordinator_file(&page.key, &coordinator.dir);
                    let snippet = load_snippet(&config.data_source, &coordinator.dir);
                    let body = coordinator_body(config, stamp, page, coordinator);
                    let ctx = PageContext {
                        config,
                        stamp,
                        page,
                        coordinator: Some(coordinator),
                        snippet: snippet.as_deref(),
                    };
                    write_page(output_dir, &rel, render::render_page(&ctx, body.markup))?;
                    report.pages.push(GeneratedPage {
                        page: page.name.clone(),
                        coordinator: Some(coordinator.name.clone()),
                        path: rel,
                        images: body.images,
                    });
                }
            }
            PageSource::Paths(paths) => {
                let body = Body {
                    markup: render::image_grid(config, stamp, paths),
                    images: paths.len(),
                };
                report.pages.push(write_single(config, stamp, page, body, output_dir)?);
            }
            PageSource::Dir(dir) => {
                let body = dir_body(config, stamp, page, dir);
                report.pages.push(write_single(config, stamp, page, body, output_dir)?);
            }
        }
    }

    write_asset(output_dir, LIGHTBOX_JS_PATH, LIGHTBOX_JS)?;
    report.assets.push(LIGHTBOX_JS_PATH.to_string());

    info!(
        "Generated {} pages ({} images) in {}",
        report.pages.len(),
        report.total_images(),
        output_dir.display()
    );
    Ok(report)
}

fn write_single(
    config: &SiteConfig,
    stamp: &BuildStamp,
    page: &Page,
    body: Body,
    output_dir: &Path,
) -> Result<GeneratedPage, GenerateError> {
    let rel = format!("{}.html", page.key);
    let snippet = load_snippet(&config.data_source, &page.key);
    let ctx = PageContext {
        config,
        stamp,
        page,
        coordinator: None,
        snippet: snippet.as_deref(),
    };
    write_page(output_dir, &rel, render::render_page(&ctx, body.markup))?;
    Ok(GeneratedPage {
        page: page.name.clone(),
        coordinator: None,
        path: rel,
        images: body.images,
    })
}

fn coordinator_body(
    config: &SiteConfig,
    stamp: &BuildStamp,
    page: &Page,
    coordinator: &Coordinator,
) -> Body {
    let prefix = format!("{} - {} - ", page.name, coordinator.name);
    let walked = walk_sections(config, &coordinator.dir, &prefix);
    Body {
        markup: html! {
            (render::large_images(config, stamp, &coordinator.large_images))
            (render::sections(config, stamp, &walked))
            @if let Some(embeds) = &coordinator.embeds {
                (render::embeds(embeds))
            }
        },
        images: coordinator.large_images.len() + walked_images(&walked),
    }
}

fn dir_body(config: &SiteConfig, stamp: &BuildStamp, page: &Page, dir: &str) -> Body {
    let prefix = format!("{} - ", page.name);
    let walked = walk_sections(config, dir, &prefix);
    Body {
        markup: html! {
            (render::large_images(config, stamp, &page.large_images))
            (render::sections(config, stamp, &walked))
            @if let Some(embeds) = &page.embeds {
                (render::embeds(embeds))
            }
        },
        images: page.large_images.len() + walked_images(&walked),
    }
}

fn walked_images(sections: &[Section]) -> usize {
    sections
        .iter()
        .filter_map(|s| s.images.as_ref())
        .map(Vec::len)
        .sum()
}

fn create_dir(path: &Path) -> Result<(), GenerateError> {
    fs::create_dir_all(path).map_err(|e| GenerateError::Write(path.to_path_buf(), e))
}

fn write_page(output_dir: &Path, rel: &str, markup: Markup) -> Result<(), GenerateError> {
    let path = output_dir.join(rel);
    fs::write(&path, markup.into_string()).map_err(|e| GenerateError::Write(path.clone(), e))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

fn write_asset(output_dir: &Path, rel: &str, contents: &str) -> Result<(), GenerateError> {
    let path = output_dir.join(rel);
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    fs::write(&path, contents).map_err(|e| GenerateError::Write(path.clone(), e))
}
