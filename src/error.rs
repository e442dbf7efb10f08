//! Error types for zonemaster-report.
//!
//! Validation problems in the test form are not errors in this sense; they
//! live on the rows as field errors (see `form`).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    /// An entry carried a level outside the severity model (strict mode only)
    #[error("entry {index} ({module}/{testcase}) has unknown severity level '{level}'")]
    UnknownLevel { index: usize, module: String, testcase: String, level: String },

    /// Fetching a result failed; the cause is logged, users see a fixed notice
    #[error("No data for this test.")]
    NoData(String),

    #[error("Backend request '{method}' failed: {message}")]
    Backend { method: String, message: String },

    #[error("Backend returned an error for '{method}': {message} (code {code})")]
    Rpc { method: String, code: i64, message: String, details: Vec<crate::form::ServerError> },

    #[error("Test {test_id} did not finish within {secs}s (last progress {progress}%)")]
    WaitTimeout { test_id: String, progress: u8, secs: u64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration file {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Invalid timestamp '{0}'")]
    Timestamp(String),

    #[error("Form is invalid: {0}")]
    Form(#[from] crate::form::FormError),
}

pub type Result<T> = std::result::Result<T, ReportError>;
