//! Error types for local persistence.

use std::io;
use std::path::PathBuf;

use codeblocks_format::SchemaError;
use codeblocks_tree::TreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("An error occurred trying to read the root path {path}: {error}")]
    RootPathInvalid { path: PathBuf, error: io::Error },

    #[error("io error on {path}: {error}")]
    Io { path: PathBuf, error: io::Error },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid function name: '{name}'")]
    InvalidName { name: String },

    #[error("function '{name}' already exists")]
    AlreadyExists { name: String },

    #[error("function '{name}' not found")]
    NotFound { name: String },

    #[error("{0}")]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    Tree(#[from] TreeError),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, error: io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            error,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
