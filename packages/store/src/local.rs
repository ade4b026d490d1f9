//! A validated local directory and JSON file helpers on top of it.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StoreError};

/// An existing, writable, canonicalized directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalRoot {
    root: PathBuf,
}

impl LocalRoot {
    pub fn new(root: impl Into<PathBuf>) -> Result<LocalRoot> {
        let root = root.into();
        let attr = fs::metadata(&root).map_err(|error| StoreError::RootPathInvalid {
            path: root.clone(),
            error,
        })?;

        if !attr.is_dir() {
            return Err(StoreError::RootPathInvalid {
                path: root,
                error: io::Error::other("Root path must be a directory."),
            });
        }

        if attr.permissions().readonly() {
            return Err(StoreError::RootPathInvalid {
                path: root,
                error: io::Error::other("Root directory must be writable"),
            });
        }

        match root.canonicalize() {
            Ok(root) => Ok(LocalRoot { root }),
            Err(error) => Err(StoreError::RootPathInvalid { path: root, error }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn file_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Read and parse a JSON file. A missing file is `Ok(None)`.
    pub fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let file_path = self.file_path(name);
        log::debug!("Reading {}...", file_path.display());
        if !file_path.exists() {
            return Ok(None);
        }

        let file = fs::File::open(&file_path).map_err(|e| StoreError::io(&file_path, e))?;
        let reader = io::BufReader::new(file);
        Ok(Some(serde_json::from_reader(reader)?))
    }

    /// Serialize `value` into a file, replacing it.
    pub fn write_json<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let file_path = self.file_path(name);
        log::debug!("Writing {}...", file_path.display());

        let s = serde_json::to_string(value)?;
        let mut f = fs::File::create(&file_path).map_err(|e| StoreError::io(&file_path, e))?;
        f.write_all(s.as_bytes())
            .map_err(|e| StoreError::io(&file_path, e))?;
        Ok(())
    }
}
