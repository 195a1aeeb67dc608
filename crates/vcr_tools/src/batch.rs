//! Batch scenario runner.
//!
//! Plays every scenario file in a directory in parallel using rayon and
//! collects the reports into one JSON document.

use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::report::{self, BattleReport};
use crate::scenario::Scenario;

/// Error during batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    /// Scenario file
    pub path: PathBuf,
    /// Error message
    pub message: String,
}

/// Aggregate counts over a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Scenario files found.
    pub total: usize,
    /// Battles played to a result.
    pub played: usize,
    /// Battles loaded but not playable.
    pub unplayable: usize,
    /// Files that failed to load.
    pub failed: usize,
}

/// Results from a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResults {
    /// Directory that was scanned
    pub directory: PathBuf,
    /// Reports in file name order
    pub reports: Vec<BattleReport>,
    /// Aggregate summary
    pub summary: BatchSummary,
    /// Total runtime
    pub duration_seconds: f64,
    /// Errors encountered
    pub errors: Vec<BatchError>,
}

impl BatchResults {
    /// Save results to JSON file
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Load results from JSON file
    pub fn load(path: &Path) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(std::io::Error::other)
    }
}

/// List the `.ron` files of a directory, sorted by name.
pub fn scenario_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    files.sort();
    Ok(files)
}

/// Play every scenario in `dir`.
///
/// A file that fails to load is recorded as an error; it does not stop the
/// batch.
pub fn run_batch(dir: &Path) -> std::io::Result<BatchResults> {
    let start = Instant::now();
    let files = scenario_files(dir)?;
    info!(directory = %dir.display(), files = files.len(), "Starting batch");

    let outcomes: Vec<(PathBuf, Result<BattleReport, String>)> = files
        .par_iter()
        .map(|path| {
            let result = Scenario::load(path)
                .and_then(|scenario| report::play(&scenario, false))
                .map_err(|e| e.to_string());
            (path.clone(), result)
        })
        .collect();

    let mut results = BatchResults {
        directory: dir.to_path_buf(),
        reports: Vec::with_capacity(outcomes.len()),
        summary: BatchSummary {
            total: files.len(),
            ..BatchSummary::default()
        },
        duration_seconds: 0.0,
        errors: Vec::new(),
    };
    for (path, outcome) in outcomes {
        match outcome {
            Ok(report) => {
                if report.was_played() {
                    results.summary.played += 1;
                } else {
                    results.summary.unplayable += 1;
                }
                results.reports.push(report);
            }
            Err(message) => {
                warn!(path = %path.display(), %message, "Scenario failed");
                results.summary.failed += 1;
                results.errors.push(BatchError { path, message });
            }
        }
    }
    results.duration_seconds = start.elapsed().as_secs_f64();

    info!(
        played = results.summary.played,
        unplayable = results.summary.unplayable,
        failed = results.summary.failed,
        "Batch complete"
    );
    Ok(results)
}
