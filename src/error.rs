//! Error types for the Proctor grading harness.

use std::path::PathBuf;
use thiserror::Error;

/// Harness-level errors: anything that prevents a context run from
/// proceeding, as opposed to exceptional outcomes of the submission itself.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Failed to create log file {path}: {source}")]
    LogCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to capture channel: {0}")]
    ChannelWrite(#[from] std::io::Error),

    #[error("Invalid context id '{0}': must be non-empty and alphanumeric")]
    InvalidContextId(String),

    #[error("Non-existing context '{0}' selected")]
    UnknownContext(String),

    #[error("Unknown submission '{0}'")]
    UnknownSubmission(String),

    #[error("No submission available for entry-point context '{0}' (pass --submission)")]
    MissingSubmission(String),

    #[error("Invalid suite manifest: {0}")]
    InvalidManifest(String),

    #[error("Failed to read suite manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse suite manifest: {0}")]
    ManifestParse(#[from] serde_json::Error),

    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Submission raised an uncaught exception in context '{0}' (recorded in the exception log)")]
    UncaughtException(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Exceptional outcomes raised by the unit under test. These are contained at
/// the invocation boundary and recorded to the exception log; they never
/// unwind through the runner.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{kind}: {message}")]
    Raised { kind: String, message: String },

    #[error("Submission exited with status {0}")]
    NonZeroExit(i32),

    #[error("Failed to launch submission {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Capture channel failure: {0}")]
    Capture(#[from] std::io::Error),

    #[error("Submission does not support {0} invocation")]
    Unsupported(&'static str),
}

impl SubmissionError {
    /// Build a raised exception with an explicit kind (e.g. "panic").
    pub fn raised(kind: impl Into<String>, message: impl Into<String>) -> Self {
        SubmissionError::Raised {
            kind: kind.into(),
            message: message.into(),
        }
    }
}
