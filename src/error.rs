//! Error types for clean-audio
//!
//! This module provides error handling for the whole pipeline, including:
//! - Pre-flight errors (configuration, input validation)
//! - Remote API errors with the HTTP status and raw body preserved for diagnosis
//! - Remote processing failures enriched from the production detail fetch
//! - Timeout and per-file download failures

use std::time::Duration;
use thiserror::Error;

/// Result type alias for clean-audio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for clean-audio
///
/// Every variant is fatal for the run; the binary maps any of them to exit
/// code 1. Variants carry enough context to diagnose the failure from the
/// log output alone.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (e.g. missing API key), raised before any network call
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable description of the configuration issue
        message: String,
    },

    /// Input file validation failed (missing, not a regular file, unreadable)
    #[error("input file error: {0}")]
    InputFile(String),

    /// The remote API answered with a non-2xx status
    ///
    /// The raw response body is kept verbatim so the operator can see exactly
    /// what the server said.
    #[error("API request failed with status {status}: {body}")]
    Api {
        /// HTTP status code of the failed response
        status: u16,
        /// Raw response body text
        body: String,
    },

    /// A 2xx response was missing an expected field
    ///
    /// Distinct from [`Error::Api`]: the request succeeded at the HTTP level
    /// but the payload is unusable. Never retried, since resubmitting a
    /// creation request could duplicate the remote job.
    #[error("malformed API response: {0}")]
    MalformedResponse(String),

    /// No preset with the requested name exists on the server
    #[error("preset {name:?} not found ({} available)", .available.len())]
    PresetNotFound {
        /// The name that was looked up
        name: String,
        /// Every preset name the server listed, in listing order
        available: Vec<String>,
    },

    /// The remote production reached the error status
    #[error("production failed: {}", .summary.as_deref().unwrap_or("no summary available"))]
    ProcessingFailed {
        /// Error summary from the production detail fetch, if available
        summary: Option<String>,
        /// Detailed error message from the production detail fetch, if available
        message: Option<String>,
    },

    /// The polling budget was exhausted before a terminal status appeared
    #[error("processing timed out after {waited:?}; check manually at {status_url}")]
    Timeout {
        /// Wall-clock time spent waiting
        waited: Duration,
        /// Human-facing status page URL for manual follow-up
        status_url: String,
    },

    /// Downloading or writing one output file failed
    ///
    /// Aborts the batch; files downloaded before this one are left in place.
    #[error("download of {filename} failed: {reason}")]
    DownloadFailed {
        /// Server-provided name of the file that failed
        filename: String,
        /// What went wrong (HTTP status or I/O detail)
        reason: String,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Build an [`Error::Api`] from a non-2xx response, consuming its body.
    ///
    /// Reading the body is best-effort: if it cannot be read, the error still
    /// carries the status code.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
        Error::Api { status, body }
    }
}
