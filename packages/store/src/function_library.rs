//! A directory of named function documents.
//!
//! Each function is one file named after the function, holding a JSON array
//! of instance records. A freshly created function is an empty file and
//! reads as an empty document.

use std::fs;
use std::path::PathBuf;

use codeblocks_format::Catalog;
use codeblocks_tree::{Document, InstanceRecord, LoadReport};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Result, StoreError};
use crate::local::LocalRoot;

lazy_static! {
    static ref FUNCTION_NAME: Regex = Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9 _.-]*$").unwrap();
}

/// Whether `name` may be used as a function name.
pub fn is_valid_name(name: &str) -> bool {
    FUNCTION_NAME.is_match(name)
}

#[derive(Clone, Debug)]
pub struct FunctionLibrary {
    root: LocalRoot,
}

impl FunctionLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Result<FunctionLibrary> {
        Ok(FunctionLibrary {
            root: LocalRoot::new(root)?,
        })
    }

    pub fn root(&self) -> &LocalRoot {
        &self.root
    }

    fn checked_path(&self, name: &str) -> Result<PathBuf> {
        if !is_valid_name(name) {
            return Err(StoreError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(self.root.file_path(name))
    }

    fn existing_path(&self, name: &str) -> Result<PathBuf> {
        let path = self.checked_path(name)?;
        if !path.is_file() {
            return Err(StoreError::NotFound {
                name: name.to_string(),
            });
        }
        Ok(path)
    }

    /// Function names, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in walkdir::WalkDir::new(self.root.path())
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map_or_else(|| self.root.path().to_path_buf(), |p| p.to_path_buf());
                StoreError::io(path, e.into())
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str().filter(|n| is_valid_name(n)) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.checked_path(name).is_ok_and(|path| path.is_file())
    }

    /// Create an empty function.
    pub fn create(&self, name: &str) -> Result<()> {
        let path = self.checked_path(name)?;
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|error| match error.kind() {
                std::io::ErrorKind::AlreadyExists => StoreError::AlreadyExists {
                    name: name.to_string(),
                },
                _ => StoreError::io(&path, error),
            })?;
        log::debug!("Created function {}", path.display());
        Ok(())
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        let path = self.existing_path(name)?;
        fs::remove_file(&path).map_err(|e| StoreError::io(&path, e))?;
        log::debug!("Removed function {}", path.display());
        Ok(())
    }

    /// The records of a function. An empty file is an empty document.
    pub fn read(&self, name: &str) -> Result<Vec<InstanceRecord>> {
        let path = self.existing_path(name)?;
        log::debug!("Reading {}...", path.display());
        let text = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    /// Replace the records of a function, creating it if needed.
    pub fn write(&self, name: &str, records: &[InstanceRecord]) -> Result<()> {
        self.checked_path(name)?;
        self.root.write_json(name, &records)
    }

    /// Read a function straight into `document`.
    pub fn open(&self, name: &str, document: &mut Document, catalog: &Catalog) -> Result<LoadReport> {
        let records = self.read(name)?;
        Ok(document.load(&records, catalog))
    }

    /// Write `document` as function `name`.
    pub fn save(&self, name: &str, document: &Document) -> Result<()> {
        self.write(name, &document.serialize())
    }
}
