//! Run summary artifact.
//!
//! One [`ResultRecord`] per input URL, in input order, aggregated into a
//! [`RunSummary`] that is written once per run as `_log_<run_id>.json` in
//! the base output directory.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::Serialize;

use crate::config::SUMMARY_FILE_PREFIX;

/// Terminal outcome of one URL's pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureStatus {
    /// The capture was written to disk.
    Success,
    /// The pipeline failed; `error` carries the message.
    Failed,
}

/// Outcome record for one input URL. Append-only; never mutated after
/// creation.
#[derive(Clone, Debug, Serialize)]
pub struct ResultRecord {
    /// The normalized input URL.
    pub url: String,
    /// Success or failure.
    pub status: CaptureStatus,
    /// Written file path; present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Failure message; present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResultRecord {
    /// Builds a success record pointing at the written file.
    pub fn success(url: impl Into<String>, file: PathBuf) -> Self {
        Self {
            url: url.into(),
            status: CaptureStatus::Success,
            file: Some(file),
            error: None,
        }
    }

    /// Builds a failure record carrying the error message.
    pub fn failure(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: CaptureStatus::Failed,
            file: None,
            error: Some(error.into()),
        }
    }
}

/// Aggregated outcome of one batch invocation.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    /// Number of successful captures.
    pub success: usize,
    /// Number of failed captures.
    pub failed: usize,
    /// One record per input URL, in input order.
    pub results: Vec<ResultRecord>,
}

impl RunSummary {
    /// Computes success/failure counts from the accumulated records.
    pub fn from_results(results: Vec<ResultRecord>) -> Self {
        let success = results
            .iter()
            .filter(|r| r.status == CaptureStatus::Success)
            .count();
        let failed = results.len() - success;
        Self {
            success,
            failed,
            results,
        }
    }

    /// Path of the summary artifact for a given run.
    pub fn summary_path(output_dir: &Path, run_id: &str) -> PathBuf {
        output_dir.join(format!("{SUMMARY_FILE_PREFIX}{run_id}.json"))
    }

    /// Writes the summary as pretty-printed JSON into the output directory.
    ///
    /// A persistence failure is logged and swallowed; the in-memory summary
    /// remains the caller's source of truth either way.
    pub async fn persist(&self, output_dir: &Path, run_id: &str) {
        let path = Self::summary_path(output_dir, run_id);
        let json = match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize run summary: {e}");
                return;
            }
        };
        match tokio::fs::write(&path, json).await {
            Ok(()) => info!("Results log saved to {}", path.display()),
            Err(e) => warn!("Failed to write results log {}: {e}", path.display()),
        }
    }
}
