//! Codeblocks: the core of a block-based visual program editor.
//!
//! Programs are trees of blocks. Each block is an instance of a format from
//! the catalog, laid out as lines of text labels, value slots and nested
//! stacks. The editor asks the tree what lies under a point, drops dragged
//! blocks into fields or between siblings, and saves the result as JSON.
//!
//! The layers:
//! - [`format`]: block formats, categories, translations and the catalog
//! - [`tree`]: block instances, geometry, hit testing and drag and drop
//! - [`store`]: catalog files and the function library on disk
//!
//! # Example
//!
//! ```rust
//! use codeblocks::format::Catalog;
//! use codeblocks::tree::{Document, Geometry, Hit};
//! use serde_json::json;
//!
//! let mut catalog = Catalog::new();
//! catalog.register(json!([
//!     {"id": "print", "category": 0,
//!      "lines": [[{"type": "text", "value": "print"}, {"type": "code", "value": "TEXT_IN"}]]},
//!     {"id": "pi", "category": 1, "returns": "NUM",
//!      "lines": [[{"type": "text", "value": "pi"}]]}
//! ])).unwrap();
//!
//! let mut document = Document::new(Geometry::default());
//! document.attach_new_block("print", &catalog).unwrap();
//!
//! // the print label sits just inside the block's top left corner
//! let hit = document.hit_test(8.0, 8.0);
//! assert!(matches!(hit, Some(Hit::Block(_))));
//! ```

pub use codeblocks_format as format;
pub use codeblocks_store as store;
pub use codeblocks_tree as tree;

pub use codeblocks_format::{BlockFormat, Catalog, IoKind};
pub use codeblocks_store::{CatalogStore, FunctionLibrary};
pub use codeblocks_tree::{Block, BlockPath, Document, Geometry, Hit, InstanceRecord};
