//! Error type definitions.
//!
//! Errors fall into two propagation classes:
//! - **Fatal**: [`ConfigError`], [`LaunchError`] and output-directory
//!   creation failures abort the batch before or at startup.
//! - **Recovered**: [`CaptureError`] values are recorded into the per-URL
//!   result stream and never escape the batch loop. A session-lost capture
//!   error stops iteration but the run still terminates with a summary.

use std::io;
use std::path::PathBuf;

use chromiumoxide::error::CdpError;
use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Configuration rejected before any browser work starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The requested output format is not one of png, jpeg or pdf.
    #[error("unsupported file format: \"{0}\" (expected png, jpeg or pdf)")]
    UnsupportedFormat(String),

    /// JPEG quality outside the 0-100 range.
    #[error("quality must be between 0 and 100, got {0}")]
    InvalidQuality(u8),

    /// Zero-sized viewport.
    #[error("viewport dimensions must be non-zero, got {width}x{height}")]
    InvalidViewport {
        /// Configured viewport width.
        width: u32,
        /// Configured viewport height.
        height: u32,
    },
}

/// The browser engine could not be started. Fatal to the whole batch.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// The launch options could not be assembled.
    #[error("invalid browser configuration: {0}")]
    Config(String),

    /// The engine process failed to start (missing binary, resource
    /// exhaustion, handshake failure).
    #[error("failed to launch browser: {0}")]
    Spawn(#[from] CdpError),
}

/// A per-URL pipeline failure.
///
/// Recorded as a failed result for that URL; the batch continues unless
/// [`CaptureError::is_session_lost`] reports the browser itself is gone.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The URL has no hostname to derive a path from.
    #[error("URL has no hostname: {0}")]
    InvalidUrl(String),

    /// A fresh browsing context could not be created.
    #[error("failed to open page: {0}")]
    PageOpen(CdpError),

    /// Viewport/user-agent/header setup failed.
    #[error("failed to configure page: {0}")]
    PageSetup(String),

    /// A configured cookie record was rejected.
    #[error("invalid cookie for {host}: {reason}")]
    Cookie {
        /// Hostname the cookie was configured for.
        host: String,
        /// Engine-reported rejection reason.
        reason: String,
    },

    /// Navigation failed (network error, bad response).
    #[error("navigation failed: {0}")]
    Navigation(CdpError),

    /// Navigation did not complete within the configured timeout.
    #[error("navigation timed out after {0} ms")]
    NavigationTimeout(u64),

    /// The auto-scroll script could not be evaluated.
    #[error("page scroll failed: {0}")]
    Scroll(String),

    /// The engine-level screenshot/PDF call failed.
    #[error("capture failed: {0}")]
    Capture(CdpError),

    /// The per-URL target directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying filesystem error.
        source: io::Error,
    },

    /// The captured bytes could not be written.
    #[error("failed to write {path}: {source}")]
    WriteFile {
        /// Target file path.
        path: PathBuf,
        /// Underlying filesystem error.
        source: io::Error,
    },

    /// The browser process or its connection died. Stops the batch loop.
    #[error("browser session lost: {0}")]
    SessionLost(String),

    /// The run was canceled between pipeline stages.
    #[error("canceled before {stage}")]
    Canceled {
        /// Pipeline stage the cancellation was observed before.
        stage: &'static str,
    },
}

impl CaptureError {
    /// Whether this failure means the shared browser session is unusable.
    pub fn is_session_lost(&self) -> bool {
        matches!(self, CaptureError::SessionLost(_))
    }

    /// Whether this failure was a cooperative cancellation, not an error.
    pub fn is_canceled(&self) -> bool {
        matches!(self, CaptureError::Canceled { .. })
    }
}

/// Maps a CDP error either to [`CaptureError::SessionLost`] when the
/// transport to the browser is gone, or through `fallback` otherwise.
pub(crate) fn classify_cdp(
    err: CdpError,
    fallback: impl FnOnce(CdpError) -> CaptureError,
) -> CaptureError {
    if connection_lost(&err) {
        CaptureError::SessionLost(err.to_string())
    } else {
        fallback(err)
    }
}

fn connection_lost(err: &CdpError) -> bool {
    matches!(err, CdpError::Ws(_) | CdpError::ChannelSendError(_))
}
