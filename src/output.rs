//! CLI output formatting for every command.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects. Diagnostics (missing
//! snippets, unreadable entries) go through `tracing` to stderr instead.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! 001 Overview → index.html
//!     Paths: 2 images
//! 002 Wasabi 2 (active)
//!     Kruw → wasabi2/ww2_kruw.html
//!         Source: ww2_kruw/
//! 003 JoinMarket (hidden) → joinmarket.html
//!     Source: joinmarket/
//! ```
//!
//! ## Build
//!
//! ```text
//! Overview → index.html (2 images)
//! Wasabi 2
//!     Kruw → wasabi2/ww2_kruw.html (14 images)
//! Assets
//!     js/lightbox.js
//! Generated 3 pages (16 images)
//! ```
//!
//! ## Thumbnails
//!
//! ```text
//! Found 3 image(s). Processing with 10 workers...
//! [1/3] resized: thumbs/a.png
//! [2/3] skipped (already resized): thumbs/b.png
//! [3/3] failed: Processing failed: ...: thumbs/c.png
//! Done. Succeeded: 1, Skipped: 1, Failed: 1, Total: 3.
//! ```

use crate::config::{PageSource, SiteConfig, coordinator_file};
use crate::generate::GenerateReport;
use crate::thumbnails::{Summary, ThumbnailEvent};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

fn flags(active: bool, hidden: bool) -> String {
    let mut out = String::new();
    if active {
        out.push_str(" (active)");
    }
    if hidden {
        out.push_str(" (hidden)");
    }
    out
}

// ============================================================================
// Check
// ============================================================================

/// Format the validated page structure.
pub fn format_check_output(config: &SiteConfig) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, page) in config.pages.iter().enumerate() {
        let header = format!(
            "{} {}{}",
            format_index(i + 1),
            page.name,
            flags(page.active, page.hidden)
        );
        match &page.source {
            PageSource::Coordinators(coordinators) => {
                lines.push(header);
                for c in coordinators {
                    lines.push(format!(
                        "{}{}{} \u{2192} {}",
                        indent(1),
                        c.name,
                        flags(c.active, false),
                        coordinator_file(&page.key, &c.dir)
                    ));
                    lines.push(format!("{}Source: {}/", indent(2), c.dir));
                }
            }
            PageSource::Paths(paths) => {
                lines.push(format!("{} \u{2192} {}.html", header, page.key));
                lines.push(format!("{}Paths: {}", indent(1), plural(paths.len(), "image")));
            }
            PageSource::Dir(dir) => {
                lines.push(format!("{} \u{2192} {}.html", header, page.key));
                lines.push(format!("{}Source: {}/", indent(1), dir));
            }
        }
    }

    lines.push(format!(
        "{} valid (data source: {})",
        plural(config.pages.len(), "page"),
        config.data_source.display()
    ));
    lines
}

pub fn print_check_output(config: &SiteConfig) {
    for line in format_check_output(config) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format the files written by a site build.
///
/// Coordinator pages are grouped under their page name.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_group: Option<&str> = None;

    for page in &report.pages {
        let images = plural(page.images, "image");
        match &page.coordinator {
            Some(coordinator) => {
                if current_group != Some(page.page.as_str()) {
                    lines.push(page.page.clone());
                    current_group = Some(page.page.as_str());
                }
                lines.push(format!(
                    "{}{} \u{2192} {} ({})",
                    indent(1),
                    coordinator,
                    page.path,
                    images
                ));
            }
            None => {
                current_group = None;
                lines.push(format!("{} \u{2192} {} ({})", page.page, page.path, images));
            }
        }
    }

    if !report.assets.is_empty() {
        lines.push("Assets".to_string());
        for asset in &report.assets {
            lines.push(format!("{}{}", indent(1), asset));
        }
    }

    lines.push(format!(
        "Generated {} ({})",
        plural(report.pages.len(), "page"),
        plural(report.total_images(), "image")
    ));
    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Thumbnails
// ============================================================================

/// Format one progress event of a thumbnail run.
pub fn format_thumbnail_event(event: &ThumbnailEvent<'_>) -> Vec<String> {
    match event {
        ThumbnailEvent::Started { total, workers } => vec![format!(
            "Found {} image(s). Processing with {} workers...",
            total, workers
        )],
        ThumbnailEvent::Finished {
            completed,
            total,
            result,
        } => vec![format!(
            "[{}/{}] {}: {}",
            completed,
            total,
            result.message,
            result.destination.display()
        )],
    }
}

pub fn print_thumbnail_event(event: &ThumbnailEvent<'_>) {
    for line in format_thumbnail_event(event) {
        println!("{}", line);
    }
}

/// Format the closing line of a thumbnail run.
pub fn format_thumbnail_summary(summary: &Summary) -> Vec<String> {
    if summary.total() == 0 {
        vec!["No image files found. Nothing to do.".to_string()]
    } else {
        vec![format!("Done. {}.", summary)]
    }
}

pub fn print_thumbnail_summary(summary: &Summary) {
    for line in format_thumbnail_summary(summary) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::generate::GeneratedPage;
    use crate::thumbnails::{JobResult, Outcome};
    use std::path::PathBuf;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(100), "100");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(0, "image"), "0 images");
        assert_eq!(plural(1, "image"), "1 image");
        assert_eq!(plural(7, "page"), "7 pages");
    }

    // =========================================================================
    // Check output tests
    // =========================================================================

    #[test]
    fn check_output_lists_every_page_kind() {
        let config = parse_config(
            r#"{
                "data_source": "data",
                "image_url": "i/", "thumbnail_url": "t/", "web_base": "/",
                "whitelist": [".png"],
                "pages": {
                    "index": {"name": "Overview", "paths": ["a.png", "b.png"]},
                    "wasabi2": {"name": "Wasabi 2", "active": true, "coordinators": [
                        {"name": "Kruw", "dir": "ww2_kruw"}
                    ]},
                    "joinmarket": {"name": "JoinMarket", "dir": "joinmarket", "hidden": true}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(
            format_check_output(&config),
            vec![
                "001 Overview \u{2192} index.html",
                "    Paths: 2 images",
                "002 Wasabi 2 (active)",
                "    Kruw \u{2192} wasabi2/ww2_kruw.html",
                "        Source: ww2_kruw/",
                "003 JoinMarket (hidden) \u{2192} joinmarket.html",
                "    Source: joinmarket/",
                "3 pages valid (data source: data)",
            ]
        );
    }

    // =========================================================================
    // Build output tests
    // =========================================================================

    fn generated(page: &str, coordinator: Option<&str>, path: &str, images: usize) -> GeneratedPage {
        GeneratedPage {
            page: page.to_string(),
            coordinator: coordinator.map(str::to_string),
            path: path.to_string(),
            images,
        }
    }

    #[test]
    fn generate_output_groups_coordinators() {
        let report = GenerateReport {
            pages: vec![
                generated("Overview", None, "index.html", 1),
                generated("Wasabi 2", Some("Kruw"), "wasabi2/kruw.html", 4),
                generated("Wasabi 2", Some("Ginger"), "wasabi2/ginger.html", 0),
                generated("Whirlpool", None, "whirlpool.html", 3),
            ],
            assets: vec!["js/lightbox.js".to_string()],
        };

        assert_eq!(
            format_generate_output(&report),
            vec![
                "Overview \u{2192} index.html (1 image)",
                "Wasabi 2",
                "    Kruw \u{2192} wasabi2/kruw.html (4 images)",
                "    Ginger \u{2192} wasabi2/ginger.html (0 images)",
                "Whirlpool \u{2192} whirlpool.html (3 images)",
                "Assets",
                "    js/lightbox.js",
                "Generated 4 pages (8 images)",
            ]
        );
    }

    #[test]
    fn generate_output_empty_site() {
        let lines = format_generate_output(&GenerateReport::default());
        assert_eq!(lines, vec!["Generated 0 pages (0 images)"]);
    }

    // =========================================================================
    // Thumbnail output tests
    // =========================================================================

    #[test]
    fn started_line() {
        let lines = format_thumbnail_event(&ThumbnailEvent::Started {
            total: 3,
            workers: 10,
        });
        assert_eq!(lines, vec!["Found 3 image(s). Processing with 10 workers..."]);
    }

    #[test]
    fn finished_line_shows_progress_message_and_destination() {
        let result = JobResult {
            destination: PathBuf::from("thumbs/sub/a.png"),
            outcome: Outcome::Skipped,
            message: "skipped (already resized)".to_string(),
        };
        let lines = format_thumbnail_event(&ThumbnailEvent::Finished {
            completed: 2,
            total: 5,
            result: &result,
        });
        assert_eq!(lines, vec!["[2/5] skipped (already resized): thumbs/sub/a.png"]);
    }

    #[test]
    fn summary_line() {
        let summary = Summary {
            resized: 1,
            skipped: 2,
            failed: 1,
        };
        assert_eq!(
            format_thumbnail_summary(&summary),
            vec!["Done. Succeeded: 1, Skipped: 2, Failed: 1, Total: 4."]
        );
    }

    #[test]
    fn empty_run_has_distinct_message() {
        assert_eq!(
            format_thumbnail_summary(&Summary::default()),
            vec!["No image files found. Nothing to do."]
        );
    }
}
