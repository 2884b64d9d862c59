//! Parallel thumbnail generation.
//!
//! Mirrors a source image tree into a destination tree of scaled copies.
//!
//! ## Pipeline
//!
//! ```text
//! collect_jobs ─► Vec<Job> ─► dispatch (N workers) ─► JobResult stream ─► Summary
//!                                  │
//!                                  └─ per job: should_process? → create_scaled_copy
//! ```
//!
//! Every job ends in exactly one [`Outcome`]:
//!
//! - **Resized**: the destination was (re)written.
//! - **Skipped**: the destination is newer than the source and `overwrite` is off.
//! - **Failed**: decode, encode, or I/O error for this file only. The batch goes on.
//!
//! ## Parallel Processing
//!
//! Jobs run on a dedicated [rayon](https://docs.rs/rayon) pool sized to the
//! requested worker count, so at most N files are decoded at once. Results
//! come back over a channel in completion order and are folded by a single
//! consumer on the calling thread; workers share no counters. A panicking
//! job is caught and reported as a failure instead of tearing down the pool.

use crate::imaging::{ImageBackend, Scale, create_scaled_copy};
use crate::jobs::{CollectError, Job, collect_jobs, should_process};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use thiserror::Error;
use tracing::{debug, info};

/// Default number of parallel workers.
pub const DEFAULT_WORKERS: usize = 10;

#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error(transparent)]
    Collect(#[from] CollectError),
    #[error("Cannot create {0}: {1}")]
    Destination(PathBuf, #[source] std::io::Error),
    #[error("Failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Settings for one thumbnail run.
#[derive(Debug, Clone, Copy)]
pub struct ThumbnailOptions {
    pub scale: Scale,
    pub overwrite: bool,
    pub workers: usize,
}

impl Default for ThumbnailOptions {
    fn default() -> Self {
        Self {
            scale: Scale::default(),
            overwrite: false,
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Terminal state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Resized,
    Skipped,
    Failed,
}

/// What happened to one job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobResult {
    pub destination: PathBuf,
    pub outcome: Outcome,
    pub message: String,
}

impl JobResult {
    fn resized(destination: PathBuf) -> Self {
        Self {
            destination,
            outcome: Outcome::Resized,
            message: "resized".to_string(),
        }
    }

    fn skipped(destination: PathBuf) -> Self {
        Self {
            destination,
            outcome: Outcome::Skipped,
            message: "skipped (already resized)".to_string(),
        }
    }

    fn failed(destination: PathBuf, reason: impl fmt::Display) -> Self {
        Self {
            destination,
            outcome: Outcome::Failed,
            message: format!("failed: {}", reason),
        }
    }
}

/// Progress notifications emitted while a run is in flight.
#[derive(Debug)]
pub enum ThumbnailEvent<'a> {
    /// Jobs were found and dispatch is about to start.
    Started { total: usize, workers: usize },
    /// One job reached its terminal state. `completed` counts from 1.
    Finished {
        completed: usize,
        total: usize,
        result: &'a JobResult,
    },
}

/// Running totals over a stream of [`JobResult`]s.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub resized: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl Summary {
    pub fn record(&mut self, result: &JobResult) {
        match result.outcome {
            Outcome::Resized => self.resized += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.resized + self.skipped + self.failed
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Succeeded: {}, Skipped: {}, Failed: {}, Total: {}",
            self.resized,
            self.skipped,
            self.failed,
            self.total()
        )
    }
}

/// Run a single job to its terminal state. Never panics on bad input and
/// never returns an error: failures become [`Outcome::Failed`].
pub fn execute(backend: &impl ImageBackend, job: &Job) -> JobResult {
    if !should_process(&job.source, &job.destination, job.overwrite) {
        return JobResult::skipped(job.destination.clone());
    }
    match create_scaled_copy(backend, &job.source, &job.destination, job.scale) {
        Ok((width, height)) => {
            debug!(
                "Resized {} → {} ({}x{})",
                job.source.display(),
                job.destination.display(),
                width,
                height
            );
            JobResult::resized(job.destination.clone())
        }
        Err(e) => JobResult::failed(job.destination.clone(), e),
    }
}

/// Run `jobs` on a pool of `workers` threads, handing each result to
/// `on_result` as soon as it completes.
///
/// Blocks until every job has reported. `on_result` is called exactly once
/// per job, always on the calling thread.
pub fn dispatch<B, F>(
    backend: &B,
    jobs: Vec<Job>,
    workers: usize,
    mut on_result: F,
) -> Result<(), ThumbnailError>
where
    B: ImageBackend,
    F: FnMut(JobResult),
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("thumbnail-{i}"))
        .build()?;

    let (tx, rx) = mpsc::channel::<JobResult>();

    pool.in_place_scope(|scope| {
        for job in jobs {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let result = panic::catch_unwind(AssertUnwindSafe(|| execute(backend, &job)))
                    .unwrap_or_else(|payload| {
                        JobResult::failed(job.destination.clone(), panic_reason(payload.as_ref()))
                    });
                // The receiver outlives the scope, so this cannot fail
                let _ = tx.send(result);
            });
        }
        drop(tx);

        for result in rx {
            on_result(result);
        }
    });

    Ok(())
}

fn panic_reason(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("worker panicked: {}", s)
    } else {
        "worker panicked".to_string()
    }
}

/// Mirror `source_root` into `destination_root` as scaled copies.
///
/// Returns the final [`Summary`]. A tree without images yields an empty
/// summary and no [`ThumbnailEvent::Started`] event.
pub fn generate_thumbnails(
    backend: &impl ImageBackend,
    source_root: &Path,
    destination_root: &Path,
    options: &ThumbnailOptions,
    mut on_event: impl FnMut(ThumbnailEvent<'_>),
) -> Result<Summary, ThumbnailError> {
    let jobs = collect_jobs(
        source_root,
        destination_root,
        options.scale,
        options.overwrite,
    )?;
    let mut summary = Summary::default();
    if jobs.is_empty() {
        info!("No images under {}", source_root.display());
        return Ok(summary);
    }

    std::fs::create_dir_all(destination_root)
        .map_err(|e| ThumbnailError::Destination(destination_root.to_path_buf(), e))?;

    let total = jobs.len();
    info!(
        "Processing {} images from {} with {} workers",
        total,
        source_root.display(),
        options.workers
    );
    on_event(ThumbnailEvent::Started {
        total,
        workers: options.workers,
    });

    dispatch(backend, jobs, options.workers, |result| {
        summary.record(&result);
        on_event(ThumbnailEvent::Finished {
            completed: summary.total(),
            total,
            result: &result,
        });
    })?;

    Ok(summary)
}
