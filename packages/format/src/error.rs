//! Error types for the format layer.

use thiserror::Error;

/// Errors raised while loading schemas, categories or translations.
///
/// A failing batch is rejected as a whole; formats registered by earlier
/// batches are untouched.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The batch was not valid JSON, or not the expected JSON shape.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A record in the batch is missing a required field.
    #[error("schema record {index} is missing field '{field}'")]
    MissingField { index: usize, field: &'static str },

    /// A record in the batch is structurally invalid.
    #[error("schema record {index} is invalid: {message}")]
    InvalidRecord { index: usize, message: String },

    /// A line element declares a type other than `text` or `code`.
    #[error("format '{id}' line {line} column {column}: unknown element type '{kind}'")]
    UnknownElementType {
        id: String,
        line: usize,
        column: usize,
        kind: String,
    },

    /// `commit_refresh` was called without a preceding `begin_refresh`.
    #[error("no catalog refresh in progress")]
    NoRefreshInProgress,
}

/// Result type alias for format operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
