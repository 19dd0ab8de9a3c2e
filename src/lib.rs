//! domain_snap library: bulk web-page capture
//!
//! This library captures screenshots (PNG/JPEG) or PDFs of a list of web
//! pages using a headless Chromium instance, organizing outputs into
//! per-domain directories and producing a structured JSON run summary.
//!
//! # Example
//!
//! ```no_run
//! use domain_snap::{run_capture, Config, FileFormat};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file_format: FileFormat::Pdf,
//!     ..Default::default()
//! };
//!
//! let urls = vec!["https://example.com".to_string()];
//! let summary = run_capture(urls, config).await?;
//! println!("{} succeeded, {} failed", summary.success, summary.failed);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime and a locally installed
//! Chrome/Chromium binary. Use `#[tokio::main]` in your application or
//! ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod config;
mod error_handling;
pub mod ingest;
pub mod initialization;
pub mod paths;
mod pipeline;
mod session;
mod summary;

// Re-export public API
pub use config::{
    BasicCredentials, Config, CookieSpec, FileFormat, HeadlessSelector, LogFormat, LogLevel, Opt,
    Overrides, PathLayout, WaitUntil,
};
pub use error_handling::{CaptureError, ConfigError, InitializationError, LaunchError};
pub use run::{run_capture, run_capture_with_cancel, run_from_file};
pub use summary::{CaptureStatus, ResultRecord, RunSummary};

// Internal run module (contains the batch orchestration logic)
mod run {
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result};
    use chrono::Local;
    use log::{info, warn};
    use tokio_util::sync::CancellationToken;

    use crate::config::{Config, RUN_ID_FORMAT};
    use crate::error_handling::CaptureError;
    use crate::pipeline;
    use crate::session::CaptureSession;
    use crate::summary::{ResultRecord, RunSummary};

    #[derive(Debug, PartialEq, Eq)]
    enum BatchFlow {
        Continue,
        Stop,
    }

    /// Records one URL's outcome and decides whether the batch continues.
    ///
    /// Exactly one record is appended per call. A canceled or session-lost
    /// outcome stops the loop; every other failure is recovered locally.
    fn record_outcome(
        results: &mut Vec<ResultRecord>,
        url: &str,
        index: usize,
        total: usize,
        outcome: Result<PathBuf, CaptureError>,
        batch_error: &mut Option<String>,
    ) -> BatchFlow {
        match outcome {
            Ok(file) => {
                info!("[{}/{}] Saved: {}", index, total, file.display());
                results.push(ResultRecord::success(url, file));
                BatchFlow::Continue
            }
            Err(e) if e.is_canceled() => {
                warn!("[{}/{}] {}: {}", index, total, url, e);
                results.push(ResultRecord::failure(url, e.to_string()));
                BatchFlow::Stop
            }
            Err(e) => {
                warn!("[{}/{}] Error processing {}: {}", index, total, url, e);
                let session_lost = e.is_session_lost();
                if session_lost {
                    warn!("Browser session lost, abandoning remaining URLs");
                    *batch_error = Some(e.to_string());
                }
                results.push(ResultRecord::failure(url, e.to_string()));
                if session_lost {
                    BatchFlow::Stop
                } else {
                    BatchFlow::Continue
                }
            }
        }
    }

    /// Marks every unattempted URL failed so the summary stays one record
    /// per input URL. Remaining = input length minus attempted count,
    /// tracked by the explicit counter rather than inferred from result
    /// lengths.
    fn mark_unattempted(
        results: &mut Vec<ResultRecord>,
        urls: &[String],
        attempted: usize,
        batch_error: Option<&str>,
    ) {
        if attempted >= urls.len() {
            return;
        }
        let reason = match batch_error {
            Some(msg) => format!("browser-level error: {msg}"),
            None => "canceled before capture".to_string(),
        };
        for url in urls.iter().skip(attempted) {
            results.push(ResultRecord::failure(url, reason.clone()));
        }
    }

    /// Reads a URL list file and captures every entry.
    ///
    /// Convenience wrapper over [`run_capture`]; the file is parsed with
    /// [`crate::ingest::ingest_file`] semantics (comments and blank lines
    /// skipped, bad lines dropped with a diagnostic).
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened, plus every hard-failure case of
    /// [`run_capture`].
    pub async fn run_from_file(path: impl AsRef<Path>, config: Config) -> Result<RunSummary> {
        let path = path.as_ref();
        let urls = crate::ingest::ingest_file(path).await?;
        if urls.is_empty() {
            warn!("No valid URLs found in {}", path.display());
        }
        run_capture(urls, config).await
    }

    /// Captures every URL in `urls` and returns the run summary.
    ///
    /// Equivalent to [`run_capture_with_cancel`] with a token that is never
    /// canceled.
    pub async fn run_capture(urls: Vec<String>, config: Config) -> Result<RunSummary> {
        run_capture_with_cancel(urls, config, CancellationToken::new()).await
    }

    /// Captures every URL in `urls`, honoring a cancellation token.
    ///
    /// URLs are processed strictly one at a time, in input order, through a
    /// single shared browser session; exactly one [`ResultRecord`] is
    /// produced per input URL. Per-URL failures are recorded and never abort
    /// the batch. If the browser session itself dies mid-run, the remaining
    /// URLs are marked failed with a distinguishing browser-level message
    /// and the run still terminates with a summary.
    ///
    /// Cancellation is observed between pipeline stages: the in-flight page
    /// is closed, the session shut down, and the unprocessed remainder
    /// recorded with a canceled marker in the (still emitted) summary.
    ///
    /// # Errors
    ///
    /// Hard failures, returned before any per-URL work: invalid
    /// configuration, output-directory creation failure, or a browser
    /// launch failure.
    pub async fn run_capture_with_cancel(
        urls: Vec<String>,
        config: Config,
        cancel: CancellationToken,
    ) -> Result<RunSummary> {
        config.validate().context("Invalid configuration")?;

        if urls.is_empty() {
            info!("No URLs to capture");
            return Ok(RunSummary::from_results(Vec::new()));
        }

        tokio::fs::create_dir_all(&config.output_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to create output directory {}",
                    config.output_dir.display()
                )
            })?;

        // One run id shared by every derived path and the summary filename
        let run_id = Local::now().format(RUN_ID_FORMAT).to_string();
        info!(
            "Starting capture run {} ({} URLs, format: {})",
            run_id,
            urls.len(),
            config.file_format
        );

        let session = CaptureSession::start(&config)
            .await
            .context("Failed to launch browser")?;

        let total = urls.len();
        let mut results: Vec<ResultRecord> = Vec::with_capacity(total);
        let mut attempted = 0usize;
        let mut batch_error: Option<String> = None;

        for url in &urls {
            if cancel.is_cancelled() {
                warn!("Run {run_id} canceled, skipping remaining URLs");
                break;
            }

            attempted += 1;
            info!("[{}/{}] Processing: {}", attempted, total, url);

            let outcome = pipeline::capture_url(&session, url, &run_id, &config, &cancel).await;
            let flow = record_outcome(
                &mut results,
                url,
                attempted,
                total,
                outcome,
                &mut batch_error,
            );
            if flow == BatchFlow::Stop {
                break;
            }
        }

        mark_unattempted(&mut results, &urls, attempted, batch_error.as_deref());

        session.shutdown().await;

        let summary = RunSummary::from_results(results);
        summary.persist(&config.output_dir, &run_id).await;
        info!(
            "Run {} complete: {} succeeded, {} failed",
            run_id, summary.success, summary.failed
        );

        Ok(summary)
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::summary::CaptureStatus;

        fn urls(n: usize) -> Vec<String> {
            (0..n).map(|i| format!("https://site{i}.example")).collect()
        }

        fn run_outcomes(
            urls: &[String],
            mut outcomes: Vec<Result<PathBuf, CaptureError>>,
        ) -> (Vec<ResultRecord>, usize, Option<String>) {
            let total = urls.len();
            let mut results = Vec::with_capacity(total);
            let mut attempted = 0usize;
            let mut batch_error = None;
            for (url, outcome) in urls.iter().zip(outcomes.drain(..)) {
                attempted += 1;
                let flow = record_outcome(
                    &mut results,
                    url,
                    attempted,
                    total,
                    outcome,
                    &mut batch_error,
                );
                if flow == BatchFlow::Stop {
                    break;
                }
            }
            mark_unattempted(&mut results, urls, attempted, batch_error.as_deref());
            (results, attempted, batch_error)
        }

        #[test]
        fn test_one_record_per_url_in_input_order() {
            let urls = urls(3);
            let (results, attempted, _) = run_outcomes(
                &urls,
                vec![
                    Ok(PathBuf::from("a.png")),
                    Err(CaptureError::NavigationTimeout(60_000)),
                    Ok(PathBuf::from("c.png")),
                ],
            );

            assert_eq!(attempted, 3);
            assert_eq!(results.len(), urls.len());
            for (record, url) in results.iter().zip(&urls) {
                assert_eq!(&record.url, url);
            }
            // A mid-batch failure never stops the loop
            assert_eq!(results[1].status, CaptureStatus::Failed);
            assert_eq!(results[2].status, CaptureStatus::Success);
        }

        #[test]
        fn test_session_loss_marks_remaining_with_browser_level_error() {
            let urls = urls(4);
            let (results, attempted, batch_error) = run_outcomes(
                &urls,
                vec![
                    Ok(PathBuf::from("a.png")),
                    Err(CaptureError::SessionLost("ws closed".to_string())),
                    Ok(PathBuf::from("never-reached.png")),
                    Ok(PathBuf::from("never-reached.png")),
                ],
            );

            assert_eq!(attempted, 2);
            assert!(batch_error.is_some());
            assert_eq!(results.len(), urls.len());
            // The URL that hit the loss keeps its own error message
            assert_eq!(
                results[1].error.as_deref(),
                Some("browser session lost: ws closed")
            );
            // Unattempted URLs carry the distinguishing marker, in order
            for (record, url) in results[2..].iter().zip(&urls[2..]) {
                assert_eq!(&record.url, url);
                assert_eq!(record.status, CaptureStatus::Failed);
                assert_eq!(
                    record.error.as_deref(),
                    Some("browser-level error: browser session lost: ws closed")
                );
            }
        }

        #[test]
        fn test_cancellation_marks_remaining_as_canceled() {
            let urls = urls(3);
            let (results, attempted, batch_error) = run_outcomes(
                &urls,
                vec![
                    Ok(PathBuf::from("a.png")),
                    Err(CaptureError::Canceled { stage: "capture" }),
                    Ok(PathBuf::from("never-reached.png")),
                ],
            );

            assert_eq!(attempted, 2);
            assert!(batch_error.is_none());
            assert_eq!(results.len(), urls.len());
            assert_eq!(results[1].error.as_deref(), Some("canceled before capture"));
            assert_eq!(results[2].error.as_deref(), Some("canceled before capture"));
        }

        #[test]
        fn test_zero_attempts_marks_every_url_canceled() {
            let urls = urls(2);
            let mut results = Vec::new();
            mark_unattempted(&mut results, &urls, 0, None);

            assert_eq!(results.len(), urls.len());
            for (record, url) in results.iter().zip(&urls) {
                assert_eq!(&record.url, url);
                assert_eq!(record.error.as_deref(), Some("canceled before capture"));
            }
        }

        #[test]
        fn test_fully_attempted_batch_adds_no_extra_records() {
            let urls = urls(2);
            let mut results = vec![
                ResultRecord::success(&urls[0], PathBuf::from("a.png")),
                ResultRecord::success(&urls[1], PathBuf::from("b.png")),
            ];
            mark_unattempted(&mut results, &urls, 2, None);
            assert_eq!(results.len(), 2);
        }
    }
}
