//! The Catalog - every known block format plus categories and translations.
//!
//! The catalog is an explicit object: construct it at startup and pass it by
//! reference to tree operations.
//!
//! # Refresh protocol
//!
//! A remote source replaces the catalog contents in two phases:
//!
//! 1. `begin_refresh()` marks every known format deprecated.
//! 2. `commit_refresh(batch)` registers the new batch. Formats in the batch
//!    become insertable again; formats missing from it stay deprecated but
//!    remain resolvable so existing documents keep loading.
//!
//! Between the two phases the catalog is observably "refreshing". A failed
//! commit leaves it in that state; `abort_refresh()` restores the previous
//! deprecation flags.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::category::{Category, CategoryTable};
use crate::error::{Result, SchemaError};
use crate::format::{BlockFormat, IoKind, ParameterDoc};
use crate::schema::{self, SchemaRecord};
use crate::translation::Translations;

/// A remote-sync bundle. Every part is optional.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CatalogUpdate {
    #[serde(default)]
    pub formats: Option<JsonValue>,
    #[serde(default)]
    pub translations: Option<Translations>,
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
}

/// What a committed refresh changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Ids that were not known before.
    pub added: Vec<String>,
    /// Ids that were known and got replaced.
    pub replaced: Vec<String>,
    /// Ids that were known but are absent from the batch.
    pub retired: Vec<String>,
}

/// One category of the insertable palette.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteCategory {
    pub index: usize,
    pub name: String,
    pub hue: i32,
    /// `(format id, localized name)` pairs.
    pub entries: Vec<(String, String)>,
}

#[derive(Debug)]
struct RefreshState {
    /// Deprecation flags before `begin_refresh`.
    previous: BTreeMap<String, bool>,
}

#[derive(Debug, Default)]
pub struct Catalog {
    formats: BTreeMap<String, Arc<BlockFormat>>,
    categories: CategoryTable,
    translations: Translations,
    language: Option<String>,
    refresh: Option<RefreshState>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    // === Formats ===

    /// Parse and register a schema batch (a JSON array of schema records).
    ///
    /// The batch is all-or-nothing: on error no format is inserted.
    /// Returns the number of formats registered.
    pub fn register(&mut self, batch: JsonValue) -> Result<usize> {
        let formats = schema::parse_batch(batch)?;
        Ok(self.register_formats(formats))
    }

    /// `register` for a batch still in text form.
    pub fn register_str(&mut self, batch: &str) -> Result<usize> {
        self.register(serde_json::from_str(batch)?)
    }

    /// Insert or overwrite already-built formats by id.
    pub fn register_formats(&mut self, formats: Vec<BlockFormat>) -> usize {
        let count = formats.len();
        for format in formats {
            log::debug!("Registering block format '{}'", format.id);
            self.formats.insert(format.id.clone(), Arc::new(format));
        }
        count
    }

    pub fn lookup(&self, id: &str) -> Option<Arc<BlockFormat>> {
        self.formats.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.formats.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// All formats in id order, optionally only the insertable ones.
    pub fn formats(&self, insertable_only: bool) -> Vec<&Arc<BlockFormat>> {
        self.formats
            .values()
            .filter(|f| !insertable_only || !f.deprecated)
            .collect()
    }

    /// The schema records of every known format, for persistence.
    pub fn schema_records(&self) -> Vec<SchemaRecord> {
        self.formats
            .values()
            .map(|f| SchemaRecord::from(f.as_ref()))
            .collect()
    }

    /// Type-compatibility rule for dropping `candidate` into a `kind` slot.
    pub fn compatible(&self, candidate: &BlockFormat, kind: IoKind) -> bool {
        kind.accepts(candidate)
    }

    // === Refresh ===

    /// Mark every known format deprecated.
    ///
    /// Instances already built keep their `Arc<BlockFormat>`, so nothing in
    /// an open document changes.
    pub fn mark_all_deprecated(&mut self) {
        for format in self.formats.values_mut() {
            if !format.deprecated {
                let mut deprecated = BlockFormat::clone(&**format);
                deprecated.deprecated = true;
                *format = Arc::new(deprecated);
            }
        }
    }

    /// Phase one of a refresh.
    pub fn begin_refresh(&mut self) {
        if self.refresh.is_none() {
            let previous = self
                .formats
                .iter()
                .map(|(id, f)| (id.clone(), f.deprecated))
                .collect();
            self.refresh = Some(RefreshState { previous });
        }
        self.mark_all_deprecated();
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_some()
    }

    /// Phase two of a refresh: register the replacement batch.
    pub fn commit_refresh(&mut self, batch: JsonValue) -> Result<RefreshSummary> {
        if self.refresh.is_none() {
            return Err(SchemaError::NoRefreshInProgress);
        }

        let formats = schema::parse_batch(batch)?;

        let mut summary = RefreshSummary::default();
        for format in &formats {
            if self.formats.contains_key(&format.id) {
                summary.replaced.push(format.id.clone());
            } else {
                summary.added.push(format.id.clone());
            }
        }
        summary.added.sort();
        summary.replaced.sort();
        summary.retired = self
            .formats
            .keys()
            .filter(|id| !formats.iter().any(|f| &f.id == *id))
            .cloned()
            .collect();

        self.register_formats(formats);
        self.refresh = None;

        log::info!(
            "Catalog refreshed: {} added, {} replaced, {} retired",
            summary.added.len(),
            summary.replaced.len(),
            summary.retired.len()
        );
        Ok(summary)
    }

    /// Undo `begin_refresh`, restoring the previous deprecation flags.
    pub fn abort_refresh(&mut self) {
        let Some(state) = self.refresh.take() else {
            return;
        };

        for (id, format) in self.formats.iter_mut() {
            let was_deprecated = state.previous.get(id).copied().unwrap_or(false);
            if format.deprecated != was_deprecated {
                let mut restored = BlockFormat::clone(&**format);
                restored.deprecated = was_deprecated;
                *format = Arc::new(restored);
            }
        }
    }

    /// Apply a remote-sync bundle.
    ///
    /// Any format payload other than an empty array goes through the refresh
    /// protocol; on error the refresh is aborted and nothing else in the
    /// bundle is applied.
    pub fn apply_update(&mut self, update: CatalogUpdate) -> Result<Option<RefreshSummary>> {
        let mut summary = None;

        if let Some(batch) = update.formats {
            if !batch.as_array().is_some_and(Vec::is_empty) {
                self.begin_refresh();
                match self.commit_refresh(batch) {
                    Ok(s) => summary = Some(s),
                    Err(e) => {
                        self.abort_refresh();
                        return Err(e);
                    }
                }
            }
        }

        if let Some(translations) = update.translations {
            self.merge_translations(translations);
        }

        if let Some(categories) = update.categories {
            self.merge_categories(categories);
        }

        Ok(summary)
    }

    // === Categories ===

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn merge_categories(&mut self, categories: Vec<Category>) {
        self.categories.merge(categories);
    }

    /// Localized category name; the index itself when the category is unknown.
    pub fn category_name(&self, index: usize) -> String {
        match self.categories.get(index) {
            Some(category) => self.localize(&category.name).into_owned(),
            None => index.to_string(),
        }
    }

    /// Insertable formats grouped by category, in category order.
    ///
    /// Categories without insertable formats are left out.
    pub fn palette(&self) -> Vec<PaletteCategory> {
        let mut by_category: BTreeMap<usize, Vec<(String, String)>> = BTreeMap::new();
        for format in self.formats(true) {
            by_category
                .entry(format.category)
                .or_default()
                .push((format.id.clone(), self.name_of(format).into_owned()));
        }

        by_category
            .into_iter()
            .map(|(index, entries)| PaletteCategory {
                index,
                name: self.category_name(index),
                hue: self.categories.hue(index),
                entries,
            })
            .collect()
    }

    // === Localization ===

    pub fn translations(&self) -> &Translations {
        &self.translations
    }

    pub fn merge_translations(&mut self, translations: Translations) {
        self.translations.merge(translations);
    }

    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = Some(language.into());
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Resolve a possibly-marked schema string for the active language.
    pub fn localize<'a>(&'a self, text: &'a str) -> Cow<'a, str> {
        self.translations.localize(text, self.language.as_deref())
    }

    pub fn name_of<'a>(&'a self, format: &'a BlockFormat) -> Cow<'a, str> {
        self.localize(&format.name)
    }

    pub fn description_of<'a>(&'a self, format: &'a BlockFormat) -> Cow<'a, str> {
        self.localize(&format.description)
    }

    pub fn return_description_of<'a>(&'a self, format: &'a BlockFormat) -> Cow<'a, str> {
        self.localize(&format.return_description)
    }

    pub fn notes_of<'a>(&'a self, format: &'a BlockFormat) -> Cow<'a, str> {
        self.localize(&format.notes)
    }

    pub fn parameter_docs_of(&self, format: &BlockFormat) -> Option<Vec<ParameterDoc>> {
        format.parameter_docs.as_ref().map(|docs| {
            docs.iter()
                .map(|d| ParameterDoc {
                    kind: self.localize(&d.kind).into_owned(),
                    description: self.localize(&d.description).into_owned(),
                })
                .collect()
        })
    }
}
