//! Import errors
//!
//! The estimation pipeline itself never fails: malformed numbers and missing
//! sub-objects are defaulted. Errors only surface at the import boundary,
//! where the caller decides how to present them.

use thiserror::Error;

/// Errors raised while importing plans, people or cost assumptions
#[derive(Debug, Error)]
pub enum ImportError {
    /// Input was not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// File could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV input could not be parsed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A record that must be a JSON object was something else
    #[error("Expected a JSON object for {0}")]
    NotAnObject(String),

    /// A required field is absent
    #[error("{record} is missing required field '{field}'")]
    MissingField {
        record: String,
        field: String,
    },

    /// Cost assumption row names a service without an assumed cost
    #[error("Unknown service in cost assumptions: {0}")]
    UnknownService(String),
}

impl ImportError {
    /// Creates a missing field error
    pub fn missing_field(record: impl Into<String>, field: impl Into<String>) -> Self {
        ImportError::MissingField {
            record: record.into(),
            field: field.into(),
        }
    }
}
