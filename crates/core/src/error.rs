//! Error types for Herald operations.
//!
//! This module defines the main error type [`HeraldError`]. Only a handful of
//! situations are real failures: bad input, unreadable configuration, and
//! both source pages being unavailable. Extraction heuristics never fail, they
//! degrade to empty results instead.
//!
//! # Example
//!
//! ```rust
//! use herald_core::{HeraldError, Result, Version};
//!
//! fn checked(raw: &str) -> Result<Version> {
//!     Version::parse(raw)
//! }
//!
//! assert!(matches!(checked("  "), Err(HeraldError::InvalidVersion(_))));
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fetching, configuration and input validation.
#[derive(Error, Debug)]
pub enum HeraldError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other transport problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided or built from a template.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The version argument is empty or cannot be embedded into a URL.
    #[error("Invalid version {0:?}: expected something like \"1.7\"")]
    InvalidVersion(String),

    /// Neither the release notes nor the release highlights could be retrieved.
    ///
    /// Each message describes why the corresponding page is missing.
    #[error("No release page could be retrieved (release notes: {notes}; highlights: {highlights})")]
    NoPages { notes: String, highlights: String },

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// File read or write errors.
    #[error("I/O error: {0}")]
    WriteError(#[from] std::io::Error),

    /// Project profile errors.
    ///
    /// Returned when a profile file cannot be read or contains an unknown key.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Report serialization errors.
    #[error("Failed to serialize report: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Result type alias for HeraldError.
pub type Result<T> = std::result::Result<T, HeraldError>;
