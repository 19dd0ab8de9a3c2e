//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument
//! parsing and per-run capture configuration.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, ValueEnum};
use serde::Deserialize;

use crate::config::constants::{
    DEFAULT_DEVICE_SCALE_FACTOR, DEFAULT_JPEG_QUALITY, DEFAULT_NAVIGATION_TIMEOUT_MS,
    DEFAULT_OUTPUT_DIR, DEFAULT_SCROLL_DELAY_MS, DEFAULT_SETTLE_DELAY_MS, DEFAULT_USER_AGENT,
    DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH,
};
use crate::error_handling::ConfigError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Output format for captured pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Lossless image (default)
    Png,
    /// Lossy image; honors the configured quality
    Jpeg,
    /// Paginated document (A4, printed background, 1 cm margins)
    Pdf,
}

impl FileFormat {
    /// File extension for this format, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Png => "png",
            FileFormat::Jpeg => "jpeg",
            FileFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FileFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "png" => Ok(FileFormat::Png),
            "jpeg" | "jpg" => Ok(FileFormat::Jpeg),
            "pdf" => Ok(FileFormat::Pdf),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Navigation-completion condition to wait for before the settle delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaitUntil {
    /// The load event has fired.
    Load,
    /// The DOMContentLoaded event has fired.
    DomContentLoaded,
    /// Load plus a quiet period with no network activity (default).
    NetworkIdle,
    /// Load plus a shorter quiet period.
    NetworkAlmostIdle,
}

/// Headless-mode selector for the browser engine.
///
/// `New` is Chromium's modern headless implementation and is always treated
/// as headless, never as a literal passthrough value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadlessSelector {
    /// Modern headless mode (default)
    New,
    /// Legacy "old headless" mode
    Shell,
    /// Headful; a browser window is shown
    Off,
}

/// Directory-layout policy for derived output paths.
///
/// Both policies group captures per domain; they differ in where the shared
/// run timestamp goes. The chosen policy applies to the whole run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathLayout {
    /// `{base}/{domain}/{run_id}/{path}.{ext}` (default)
    RunFolder,
    /// `{base}/{domain}/{path}_{run_id}.{ext}`
    InlineTimestamp,
}

/// Basic-auth credentials applied to pages whose hostname matches.
#[derive(Clone, Debug, Deserialize)]
pub struct BasicCredentials {
    /// Username sent in the `Authorization: Basic` header.
    pub username: String,
    /// Password sent in the `Authorization: Basic` header.
    pub password: String,
}

/// One cookie to set before navigating, keyed by hostname in the config.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieSpec {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Cookie domain; defaults to the matched hostname.
    #[serde(default)]
    pub domain: Option<String>,
    /// Cookie path; defaults to `/`.
    #[serde(default)]
    pub path: Option<String>,
    /// Secure attribute.
    #[serde(default)]
    pub secure: Option<bool>,
    /// HttpOnly attribute.
    #[serde(default)]
    pub http_only: Option<bool>,
}

/// Per-run capture configuration.
///
/// Constructed once per run and consumed read-only. Build one from defaults
/// and caller overrides via [`Overrides::merged_over`], or set fields with
/// struct-update syntax:
///
/// ```no_run
/// use domain_snap::{Config, FileFormat};
///
/// let config = Config {
///     file_format: FileFormat::Pdf,
///     scroll_page: false,
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    /// Base directory for captured files; created if absent.
    pub output_dir: PathBuf,
    /// Output format (png, jpeg or pdf).
    pub file_format: FileFormat,
    /// JPEG quality, 0-100. Ignored for png and pdf.
    pub quality: u8,
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Device scale factor.
    pub device_scale_factor: f64,
    /// Post-navigation settle delay in milliseconds.
    pub delay_ms: u64,
    /// Whether to auto-scroll pages before capture.
    pub scroll_page: bool,
    /// Interval between auto-scroll steps in milliseconds.
    pub scroll_delay_ms: u64,
    /// Navigation timeout in milliseconds.
    pub timeout_ms: u64,
    /// Navigation-completion condition.
    pub wait_until: WaitUntil,
    /// Basic-auth credentials, keyed by hostname.
    pub auth_urls: HashMap<String, BasicCredentials>,
    /// Cookies to set, keyed by hostname.
    pub cookies: HashMap<String, Vec<CookieSpec>>,
    /// Headless-mode selector for the browser engine.
    pub headless: HeadlessSelector,
    /// User-Agent string presented to pages.
    pub user_agent: String,
    /// Capture beyond the viewport (full page) instead of viewport-only.
    pub full_page: bool,
    /// Directory-layout policy for derived paths.
    pub layout: PathLayout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            file_format: FileFormat::Png,
            quality: DEFAULT_JPEG_QUALITY,
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
            device_scale_factor: DEFAULT_DEVICE_SCALE_FACTOR,
            delay_ms: DEFAULT_SETTLE_DELAY_MS,
            scroll_page: true,
            scroll_delay_ms: DEFAULT_SCROLL_DELAY_MS,
            timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            wait_until: WaitUntil::NetworkIdle,
            auth_urls: HashMap::new(),
            cookies: HashMap::new(),
            headless: HeadlessSelector::New,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            full_page: true,
            layout: PathLayout::RunFolder,
        }
    }
}

impl Config {
    /// Rejects configurations that cannot produce a valid capture.
    ///
    /// Called by the orchestrator before any browser work starts, so an
    /// invalid configuration fails fast with no partial output.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quality > 100 {
            return Err(ConfigError::InvalidQuality(self.quality));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Caller-supplied configuration overrides.
///
/// All fields are optional; a value of `None` leaves the corresponding
/// [`Config`] field at its default. The merge is field-by-field and never
/// mutates a shared default in place. Field names follow the JSON options
/// file convention (`outputDir`, `fileFormat`, `delay`, ...).
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Overrides {
    /// Base output directory.
    pub output_dir: Option<PathBuf>,
    /// Output format.
    pub file_format: Option<FileFormat>,
    /// JPEG quality.
    pub quality: Option<u8>,
    /// Viewport width.
    pub width: Option<u32>,
    /// Viewport height.
    pub height: Option<u32>,
    /// Device scale factor.
    pub device_scale_factor: Option<f64>,
    /// Settle delay in milliseconds.
    #[serde(rename = "delay")]
    pub delay_ms: Option<u64>,
    /// Whether to auto-scroll pages.
    pub scroll_page: Option<bool>,
    /// Scroll step interval in milliseconds.
    #[serde(rename = "scrollDelay")]
    pub scroll_delay_ms: Option<u64>,
    /// Navigation timeout in milliseconds.
    #[serde(rename = "timeout")]
    pub timeout_ms: Option<u64>,
    /// Navigation-completion condition.
    pub wait_until: Option<WaitUntil>,
    /// Basic-auth credentials keyed by hostname.
    pub auth_urls: Option<HashMap<String, BasicCredentials>>,
    /// Cookies keyed by hostname.
    pub cookies: Option<HashMap<String, Vec<CookieSpec>>>,
    /// Headless-mode selector.
    pub headless: Option<HeadlessSelector>,
    /// User-Agent override.
    pub user_agent: Option<String>,
    /// Full-page capture toggle.
    pub full_page: Option<bool>,
    /// Directory-layout policy.
    pub layout: Option<PathLayout>,
}

impl Overrides {
    /// Merges these overrides over `base`, field by field.
    pub fn merged_over(self, base: Config) -> Config {
        Config {
            output_dir: self.output_dir.unwrap_or(base.output_dir),
            file_format: self.file_format.unwrap_or(base.file_format),
            quality: self.quality.unwrap_or(base.quality),
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            device_scale_factor: self.device_scale_factor.unwrap_or(base.device_scale_factor),
            delay_ms: self.delay_ms.unwrap_or(base.delay_ms),
            scroll_page: self.scroll_page.unwrap_or(base.scroll_page),
            scroll_delay_ms: self.scroll_delay_ms.unwrap_or(base.scroll_delay_ms),
            timeout_ms: self.timeout_ms.unwrap_or(base.timeout_ms),
            wait_until: self.wait_until.unwrap_or(base.wait_until),
            auth_urls: self.auth_urls.unwrap_or(base.auth_urls),
            cookies: self.cookies.unwrap_or(base.cookies),
            headless: self.headless.unwrap_or(base.headless),
            user_agent: self.user_agent.unwrap_or(base.user_agent),
            full_page: self.full_page.unwrap_or(base.full_page),
            layout: self.layout.unwrap_or(base.layout),
        }
    }

    /// Layers these overrides over another override set.
    ///
    /// Used by the CLI so explicit flags win over the options file, which in
    /// turn wins over built-in defaults.
    pub fn over(self, base: Overrides) -> Overrides {
        Overrides {
            output_dir: self.output_dir.or(base.output_dir),
            file_format: self.file_format.or(base.file_format),
            quality: self.quality.or(base.quality),
            width: self.width.or(base.width),
            height: self.height.or(base.height),
            device_scale_factor: self.device_scale_factor.or(base.device_scale_factor),
            delay_ms: self.delay_ms.or(base.delay_ms),
            scroll_page: self.scroll_page.or(base.scroll_page),
            scroll_delay_ms: self.scroll_delay_ms.or(base.scroll_delay_ms),
            timeout_ms: self.timeout_ms.or(base.timeout_ms),
            wait_until: self.wait_until.or(base.wait_until),
            auth_urls: self.auth_urls.or(base.auth_urls),
            cookies: self.cookies.or(base.cookies),
            headless: self.headless.or(base.headless),
            user_agent: self.user_agent.or(base.user_agent),
            full_page: self.full_page.or(base.full_page),
            layout: self.layout.or(base.layout),
        }
    }
}

/// Command-line options.
///
/// This struct is automatically generated by `clap` from the field attributes.
/// Capture settings given here override both the built-in defaults and any
/// `--options` file.
///
/// # Examples
///
/// ```bash
/// # Basic usage
/// domain_snap urls.txt
///
/// # PDF capture into a custom directory
/// domain_snap urls.txt --format pdf --output-dir ./pdfs
///
/// # Auth credentials and cookies from a JSON options file
/// domain_snap urls.txt --options capture.json
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "domain_snap",
    about = "Captures screenshots or PDFs of a list of URLs, grouped by domain."
)]
pub struct Opt {
    /// File of URLs to read, one per line
    #[arg(value_parser)]
    pub file: PathBuf,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// JSON file of configuration overrides (authUrls, cookies, ...)
    #[arg(long)]
    pub options: Option<PathBuf>,

    /// Base output directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Output format: png|jpeg|pdf
    #[arg(long, value_enum)]
    pub format: Option<FileFormat>,

    /// JPEG quality (0-100)
    #[arg(long)]
    pub quality: Option<u8>,

    /// Viewport width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Viewport height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Post-navigation settle delay in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Navigation timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Navigation-completion condition
    #[arg(long, value_enum)]
    pub wait_until: Option<WaitUntil>,

    /// Headless mode: new|shell|off
    #[arg(long, value_enum)]
    pub headless: Option<HeadlessSelector>,

    /// User-Agent string override
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Directory-layout policy: run-folder|inline-timestamp
    #[arg(long, value_enum)]
    pub layout: Option<PathLayout>,

    /// Skip the auto-scroll pass before capture
    #[arg(long)]
    pub no_scroll: bool,

    /// Interval between auto-scroll steps in milliseconds
    #[arg(long)]
    pub scroll_delay_ms: Option<u64>,

    /// Capture only the viewport instead of the full page
    #[arg(long)]
    pub viewport_only: bool,
}

impl Opt {
    /// Converts the explicit capture flags into an [`Overrides`] value.
    pub fn cli_overrides(&self) -> Overrides {
        Overrides {
            output_dir: self.output_dir.clone(),
            file_format: self.format,
            quality: self.quality,
            width: self.width,
            height: self.height,
            delay_ms: self.delay_ms,
            scroll_page: if self.no_scroll { Some(false) } else { None },
            scroll_delay_ms: self.scroll_delay_ms,
            timeout_ms: self.timeout_ms,
            wait_until: self.wait_until,
            headless: self.headless,
            user_agent: self.user_agent.clone(),
            full_page: if self.viewport_only { Some(false) } else { None },
            layout: self.layout,
            ..Overrides::default()
        }
    }
}
