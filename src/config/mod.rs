//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, defaults)
//! - Capture configuration types and the overrides merge
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{
    BasicCredentials, Config, CookieSpec, FileFormat, HeadlessSelector, LogFormat, LogLevel, Opt,
    Overrides, PathLayout, WaitUntil,
};
