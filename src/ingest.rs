//! URL list ingestion.
//!
//! Parses a newline-delimited list of URL-like strings into valid,
//! scheme-normalized absolute URLs. Blank lines and `#` comments are skipped;
//! scheme-less entries get `https://` prepended; unrecoverable lines are
//! dropped with a diagnostic and never abort ingestion. Only a failure to
//! open the source file is a hard error.

use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::MAX_URL_LENGTH;

/// Why a single input line was rejected.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum UrlLineError {
    /// The line (after any scheme prepending) exceeds [`MAX_URL_LENGTH`].
    #[error("URL exceeds maximum length ({len} > {max})")]
    TooLong {
        /// Observed length.
        len: usize,
        /// Permitted maximum.
        max: usize,
    },

    /// The line parses to a non-http(s) scheme.
    #[error("unsupported scheme \"{0}\"")]
    UnsupportedScheme(String),

    /// The line is not a valid URL, even with `https://` prepended.
    #[error("not a valid URL, even with https:// prepended")]
    Invalid,
}

/// Parses one candidate line into a scheme-normalized absolute URL.
///
/// The line is parsed as-is first, so any spelling of an absolute http(s)
/// URL (including uppercase schemes) is accepted unchanged. Only lines that
/// fail that parse are retried with `https://` prepended; this salvages bare
/// hosts and `host:port` spellings, which the URL parser would otherwise
/// read as carrying a custom scheme. The returned string preserves the input
/// spelling (plus any prepended scheme) rather than a re-serialized form.
pub fn parse_url_line(line: &str) -> Result<String, UrlLineError> {
    let trimmed = line.trim();
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(UrlLineError::TooLong {
            len: trimmed.len(),
            max: MAX_URL_LENGTH,
        });
    }

    let direct = url::Url::parse(trimmed);
    if let Ok(parsed) = &direct {
        if matches!(parsed.scheme(), "http" | "https") {
            return if parsed.host_str().is_some() {
                Ok(trimmed.to_string())
            } else {
                Err(UrlLineError::Invalid)
            };
        }
        // A non-http(s) scheme here may still be a bare host:port
        // ("example.com:8080" parses with scheme "example.com"); fall
        // through to the salvage attempt before rejecting it
    }

    let candidate = format!("https://{trimmed}");
    if candidate.len() > MAX_URL_LENGTH {
        return Err(UrlLineError::TooLong {
            len: candidate.len(),
            max: MAX_URL_LENGTH,
        });
    }
    match url::Url::parse(&candidate) {
        Ok(parsed) if parsed.host_str().is_some() => Ok(candidate),
        _ => match direct {
            Ok(parsed) => Err(UrlLineError::UnsupportedScheme(parsed.scheme().to_string())),
            Err(_) => Err(UrlLineError::Invalid),
        },
    }
}

/// Parses newline-delimited text into an ordered list of absolute URLs.
///
/// Order is preserved and duplicates are permitted. Rejected lines are
/// logged and skipped.
pub fn ingest_text(text: &str) -> Vec<String> {
    let mut urls = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_url_line(trimmed) {
            Ok(url) => urls.push(url),
            Err(e) => warn!("Skipping invalid URL \"{trimmed}\": {e}"),
        }
    }
    urls
}

/// Reads a URL list file and parses it line by line.
///
/// # Errors
///
/// Fails only if the file itself cannot be opened or read; individual bad
/// lines are skipped with a warning.
pub async fn ingest_file(path: &Path) -> Result<Vec<String>> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open URL list file {}", path.display()))?;

    let mut urls = Vec::new();
    let mut lines = BufReader::new(file).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .with_context(|| format!("Failed to read from {}", path.display()))?
    {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match parse_url_line(trimmed) {
            Ok(url) => urls.push(url),
            Err(e) => warn!("Skipping invalid URL \"{trimmed}\": {e}"),
        }
    }
    info!("Loaded {} URLs from {}", urls.len(), path.display());
    Ok(urls)
}
