//! Error types for the block tree.

use thiserror::Error;

/// Errors raised while building or loading blocks.
///
/// Rejected drops are not errors: insertion hands the block back instead.
#[derive(Debug, Error)]
pub enum TreeError {
    /// An instance names a format id the catalog does not know.
    #[error("unknown block format: {id}")]
    UnknownFormat { id: String },

    /// An instance record does not fit its format.
    #[error("malformed instance of '{id}': {message}")]
    MalformedInstance { id: String, message: String },

    /// Document text was not valid JSON, or not an array of instances.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TreeError {
    pub(crate) fn malformed(id: &str, message: impl Into<String>) -> Self {
        TreeError::MalformedInstance {
            id: id.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_format() {
        let err = TreeError::UnknownFormat {
            id: "frobnicate".to_string(),
        };
        assert_eq!(err.to_string(), "unknown block format: frobnicate");

        let err = TreeError::malformed("print", "expected 1 params, found 2");
        assert_eq!(
            err.to_string(),
            "malformed instance of 'print': expected 1 params, found 2"
        );
    }

    #[test]
    fn json_errors_convert() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("[");
        let err: TreeError = parse.unwrap_err().into();
        assert!(matches!(err, TreeError::Json(_)));
    }
}
