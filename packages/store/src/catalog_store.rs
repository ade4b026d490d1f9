//! Catalog persistence.
//!
//! A catalog is kept as three JSON files in one directory, in the same
//! shapes a remote device sends them:
//!
//! - `codeFormats.json`: array of schema records
//! - `codeFormatTranslations.json`: `{ language: { key: text } }`
//! - `codeFormatCategories.json`: array of `{ name, hue }`

use std::path::PathBuf;

use codeblocks_format::{Catalog, Category, RefreshSummary, SchemaRecord, Translations};
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::local::LocalRoot;

pub const FORMATS_FILE: &str = "codeFormats.json";
pub const TRANSLATIONS_FILE: &str = "codeFormatTranslations.json";
pub const CATEGORIES_FILE: &str = "codeFormatCategories.json";

/// What `CatalogStore::load` found on disk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CatalogLoad {
    /// Present when a formats file was loaded.
    pub formats: Option<RefreshSummary>,
    pub translations: bool,
    pub categories: bool,
}

#[derive(Clone, Debug)]
pub struct CatalogStore {
    root: LocalRoot,
}

impl CatalogStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<CatalogStore> {
        Ok(CatalogStore {
            root: LocalRoot::new(root)?,
        })
    }

    pub fn root(&self) -> &LocalRoot {
        &self.root
    }

    /// Write all three files.
    pub fn save(&self, catalog: &Catalog) -> Result<()> {
        let records: Vec<SchemaRecord> = catalog.schema_records();
        self.root.write_json(FORMATS_FILE, &records)?;
        self.root
            .write_json(TRANSLATIONS_FILE, catalog.translations())?;
        self.root.write_json(CATEGORIES_FILE, catalog.categories())?;
        log::debug!(
            "Saved {} formats to {}",
            records.len(),
            self.root.path().display()
        );
        Ok(())
    }

    /// Merge whatever files exist into `catalog`.
    ///
    /// The formats file is applied as a refresh: formats missing from it
    /// stay known but become deprecated. A failing formats file leaves the
    /// catalog as it was.
    pub fn load(&self, catalog: &mut Catalog) -> Result<CatalogLoad> {
        let mut load = CatalogLoad::default();

        if let Some(batch) = self.root.read_json::<JsonValue>(FORMATS_FILE)? {
            catalog.begin_refresh();
            match catalog.commit_refresh(batch) {
                Ok(summary) => load.formats = Some(summary),
                Err(error) => {
                    catalog.abort_refresh();
                    return Err(error.into());
                }
            }
        }

        if let Some(translations) = self.root.read_json::<Translations>(TRANSLATIONS_FILE)? {
            catalog.merge_translations(translations);
            load.translations = true;
        }

        if let Some(categories) = self.root.read_json::<Vec<Category>>(CATEGORIES_FILE)? {
            catalog.merge_categories(categories);
            load.categories = true;
        }

        Ok(load)
    }
}
