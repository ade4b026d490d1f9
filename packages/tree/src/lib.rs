//! Codeblocks Tree Layer
//!
//! The mutable side of the block editor:
//! - `Block`: an instance of a format, owning its nested blocks, with cached layout
//! - `Document`: the root stack, the unit that is loaded, edited and saved
//! - `Hit`/`BlockPath`: what lies under a point, and how to get back to it
//! - `InstanceRecord`: the JSON shape of a block
//!
//! # Example
//!
//! ```rust
//! use codeblocks_format::Catalog;
//! use codeblocks_tree::{Document, Geometry};
//! use serde_json::json;
//!
//! let mut catalog = Catalog::new();
//! catalog.register(json!([{
//!     "id": "print",
//!     "category": 0,
//!     "lines": [[{"type": "text", "value": "print"}, {"type": "code", "value": "TEXT_IN"}]]
//! }])).unwrap();
//!
//! let mut document = Document::new(Geometry::default());
//! document.attach_new_block("print", &catalog).unwrap();
//! assert_eq!(document.to_json().unwrap(), r#"[{"id":"print","params":[""]}]"#);
//! ```

mod block;
mod document;
mod edit;
mod error;
mod geometry;
mod hit;
mod path;
mod record;
mod stack;

#[cfg(test)]
mod fixtures;

pub use block::{Block, Column, LineContent};
pub use document::{Document, LoadReport, SkippedBlock};
pub use edit::{midpoint_side, Side};
pub use error::{Result, TreeError};
pub use geometry::{Geometry, LayoutConfig, LayoutContext, MonospaceMetrics, Size, TextMetrics};
pub use hit::Hit;
pub use path::{BlockPath, PathError, Step};
pub use record::{InstanceRecord, Param};
