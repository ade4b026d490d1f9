//! Codeblocks Format Layer
//!
//! The immutable side of the block editor:
//! - `BlockFormat`: the shape and typing rules of one kind of block
//! - `Catalog`: every known format, looked up by id, with a two-phase refresh
//! - `CategoryTable`: positional `(name, hue)` pairs referenced by formats
//! - `Translations`: `@key` resolution for any schema string
//!
//! # Example
//!
//! ```rust
//! use codeblocks_format::{Catalog, IoKind};
//! use serde_json::json;
//!
//! let mut catalog = Catalog::new();
//! catalog.register(json!([{
//!     "id": "print",
//!     "category": 0,
//!     "lines": [[{"type": "text", "value": "print"}, {"type": "code", "value": "TEXT_IN"}]]
//! }])).unwrap();
//!
//! let print = catalog.lookup("print").unwrap();
//! assert_eq!(print.slot(0, 1).and_then(|s| s.io_kind()), Some(IoKind::TextIn));
//! ```

mod catalog;
mod category;
mod error;
mod format;
pub mod schema;
mod translation;

pub use catalog::{Catalog, CatalogUpdate, PaletteCategory, RefreshSummary};
pub use category::{Category, CategoryTable};
pub use error::{Result, SchemaError};
pub use format::{BlockFormat, IoKind, Line, ParameterDoc, Slot, ValueType};
pub use schema::SchemaRecord;
pub use translation::{Translations, DEFAULT_LANGUAGE, TRANSLATION_MARKER};
