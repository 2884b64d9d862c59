//! Collaborator files read from `data_source`.
//!
//! - `summary.json`: its `date` field becomes the "Last updated" header text
//! - `texts/<name>.html`: an HTML snippet shown above a page's charts
//! - `texts/<name>.md`: markdown fallback, rendered with pulldown-cmark
//!
//! All of these are optional. A missing or broken file is logged and the
//! page is rendered without it.

use pulldown_cmark::{Parser, html as md_html};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Deserialize)]
struct Summary {
    date: String,
}

/// `date` from `data_source/summary.json`, if present and readable.
pub fn load_summary_date(data_source: &Path) -> Option<String> {
    let path = data_source.join("summary.json");
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No summary at {}", path.display());
            return None;
        }
        Err(e) => {
            warn!("Cannot read {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str::<Summary>(&content) {
        Ok(summary) => Some(summary.date),
        Err(e) => {
            warn!("Ignoring malformed {}: {}", path.display(), e);
            None
        }
    }
}

/// HTML snippet for `name` from `data_source/texts/`.
///
/// `<name>.html` is used verbatim; otherwise `<name>.md` is rendered to
/// HTML. Returns `None` (after a warning) when neither exists.
pub fn load_snippet(data_source: &Path, name: &str) -> Option<String> {
    let texts = data_source.join("texts");

    if let Some(html) = read_optional(&texts.join(format!("{name}.html"))) {
        return Some(html);
    }
    if let Some(markdown) = read_optional(&texts.join(format!("{name}.md"))) {
        return Some(markdown_to_html(&markdown));
    }

    warn!("Text snippet not found: {}/{}.html", texts.display(), name);
    None
}

pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}

fn read_optional(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            warn!("Cannot read {}: {}", path.display(), e);
            None
        }
    }
}
