//! Error types for the icsgen pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while validating a catalog or generating artifacts.
///
/// Every variant is fatal to a run: the pipeline stops at the first one.
#[derive(Error, Debug)]
pub enum IcsGenError {
    /// Wrong key set or wrongly typed field.
    #[error("Schema error in {record}: {message}")]
    Schema { record: String, message: String },

    /// Correctly typed field that fails its grammar (date, duration, URL).
    #[error("Format error in {record}: {field} '{value}' is not {expected}")]
    Format {
        record: String,
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Referential error: {kind} {id} for event '{event}' is not a known {kind} id")]
    Referential {
        event: String,
        kind: &'static str,
        id: i64,
    },

    #[error("Duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: i64 },

    #[error("Duration decode error: {0}")]
    DurationDecode(String),

    #[error("Date error: {0}")]
    Date(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type alias for icsgen operations.
pub type IcsGenResult<T> = Result<T, IcsGenError>;
