//! Codeblocks Store Layer
//!
//! Local persistence for the editor:
//! - `CatalogStore`: the format, translation and category files of a catalog
//! - `FunctionLibrary`: one file per named function document
//! - `LocalRoot`: the validated directory both are built on

mod catalog_store;
mod error;
mod function_library;
mod local;

pub use catalog_store::{
    CatalogLoad, CatalogStore, CATEGORIES_FILE, FORMATS_FILE, TRANSLATIONS_FILE,
};
pub use error::{Result, StoreError};
pub use function_library::{is_valid_name, FunctionLibrary};
pub use local::LocalRoot;
