//! Configuration constants and defaults.

/// Default base directory for captured files.
pub const DEFAULT_OUTPUT_DIR: &str = "./screenshots";

/// Default viewport width in pixels.
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1920;

/// Default viewport height in pixels.
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 1080;

/// Default device scale factor (CSS pixel to device pixel ratio).
pub const DEFAULT_DEVICE_SCALE_FACTOR: f64 = 1.0;

/// Default JPEG quality (0-100). Only meaningful for the JPEG format.
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Default post-navigation settle delay in milliseconds.
///
/// Lets dynamic content finish rendering before scrolling/capture.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;

/// Default interval between auto-scroll steps in milliseconds.
pub const DEFAULT_SCROLL_DELAY_MS: u64 = 300;

/// Default navigation timeout in milliseconds.
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 60_000;

/// Hard cap on auto-scroll ticks.
///
/// Bounds worst-case runtime on infinite-scroll pages; some of those pages
/// will not be fully captured, which is the accepted trade-off.
pub const SCROLL_MAX_TICKS: u32 = 100;

/// Pause after resetting scroll position to the top, before capture.
///
/// Lets scroll-triggered reflow settle so the capture is stable.
pub const SCROLL_RESET_PAUSE_MS: u64 = 500;

/// Quiet grace period appended after the load event for `network-idle`.
pub const NETWORK_IDLE_GRACE_MS: u64 = 500;

/// Quiet grace period appended after the load event for `network-almost-idle`.
pub const NETWORK_ALMOST_IDLE_GRACE_MS: u64 = 250;

/// Maximum length of the sanitized URL-path filename token.
///
/// Keeps derived filenames well under common filesystem limits.
pub const MAX_PATH_SEGMENT_LEN: usize = 100;

/// Maximum URL length (2048 characters) accepted by ingestion.
/// This matches common browser and server limits.
pub const MAX_URL_LENGTH: usize = 2048;

/// A4 paper width in inches, used for PDF capture.
pub const PDF_PAPER_WIDTH_INCHES: f64 = 8.27;

/// A4 paper height in inches, used for PDF capture.
pub const PDF_PAPER_HEIGHT_INCHES: f64 = 11.69;

/// PDF page margin in inches (1 cm).
pub const PDF_MARGIN_INCHES: f64 = 0.394;

/// Filename prefix for the per-run summary artifact.
pub const SUMMARY_FILE_PREFIX: &str = "_log_";

/// `chrono` format string for run identifiers (e.g. `2024-01-01_00-00-00`).
pub const RUN_ID_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Default User-Agent string presented to captured pages.
///
/// Uses a Chrome-like string so pages render their regular desktop variant.
/// Users can override this via the `--user-agent` CLI flag or the options file.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36";
