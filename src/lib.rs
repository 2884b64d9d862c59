//! # coinjoin-web
//!
//! Builds the static report site for CoinJoin statistics and the thumbnails
//! its image grids point at.
//!
//! # Two Pipelines
//!
//! ```text
//! build       structure.json + data/  →  *.html, <page>/<coordinator>.html
//! thumbnails  SRC/                    →  DST/   (scaled mirror of the tree)
//! ```
//!
//! The two share nothing at runtime. The site references thumbnails only by
//! URL (`thumbnail_url` + image path), so they can run in either order or on
//! different machines.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | JSON structure file: typed pages, validation at load |
//! | [`scan`] | Walks a chart directory into headed sections of image paths |
//! | [`dates`] | Month labels from timestamped directory names, build stamp |
//! | [`content`] | Optional collaborator files: `summary.json`, text snippets |
//! | [`render`] | Maud templates for page chrome and body blocks |
//! | [`generate`] | Writes every page and the lightbox script |
//! | [`jobs`] | Thumbnail job collection and the freshness check |
//! | [`thumbnails`] | Bounded worker pool and result aggregation |
//! | [`imaging`] | Pure-Rust decode, resize and encode behind a backend trait |
//! | [`output`] | CLI output formatting for every command |
//!
//! # Design Decisions
//!
//! ## Explicit Build Stamp
//!
//! Rendering never reads the clock. The "Last updated" text and the `?v`
//! cache-busting suffix come from a [`dates::BuildStamp`] built once in
//! `main` (or from `--date`), so the same inputs render the same bytes.
//!
//! ## Thread Pool, Not Processes
//!
//! Thumbnails are produced on a dedicated rayon pool of `--workers` threads.
//! Each job is independent and writes a distinct file; results stream back
//! over a channel to one consumer that prints progress and keeps the totals.
//! A job that errors or panics is reported as failed and never stops the
//! batch.
//!
//! ## Timestamps as the Only Cache
//!
//! A thumbnail is skipped when it is strictly newer than its source. There is
//! no manifest or content hash: deleting a thumbnail or touching a source is
//! enough to regenerate it.

pub mod config;
pub mod content;
pub mod dates;
pub mod generate;
pub mod imaging;
pub mod jobs;
pub mod output;
pub mod render;
pub mod scan;
pub mod thumbnails;

#[cfg(test)]
pub(crate) mod test_helpers;
