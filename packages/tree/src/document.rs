//! The document: the root stack of top-level blocks.
//!
//! Document coordinates put the root stack at `(element_padding_horizontal,
//! element_padding_vertical)`, and the document extent is the stack plus
//! that padding on every side. Paths into the document start with a step on
//! line 0 naming the top-level block.

use codeblocks_format::{Catalog, ValueType};

use crate::block::{Block, Column};
use crate::error::{Result, TreeError};
use crate::geometry::{Geometry, LayoutContext, Size};
use crate::hit::Hit;
use crate::path::{BlockPath, Step};
use crate::record::InstanceRecord;
use crate::stack;

/// A top-level record that could not be loaded.
#[derive(Debug)]
pub struct SkippedBlock {
    /// Position in the input array.
    pub index: usize,
    pub id: String,
    pub error: TreeError,
}

/// Outcome of `Document::load`.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedBlock>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

#[derive(Debug)]
pub struct Document {
    blocks: Vec<Block>,
    size: Size,
    geometry: Geometry,
    /// Last state handed out by `poll_change`.
    published: Vec<InstanceRecord>,
}

impl Default for Document {
    fn default() -> Self {
        Document::new(Geometry::default())
    }
}

impl Document {
    pub fn new(geometry: Geometry) -> Self {
        let mut document = Self {
            blocks: Vec::new(),
            size: Size::default(),
            geometry,
            published: Vec::new(),
        };
        document.recalculate_size();
        document
    }

    // === Accessors ===

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Swap the geometry and lay everything out again.
    pub fn set_geometry(&mut self, geometry: Geometry, catalog: &Catalog) {
        self.geometry = geometry;
        self.relayout(catalog);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// Resolve a document path.
    pub fn get(&self, path: &BlockPath) -> Option<&Block> {
        let first = path.first()?;
        if first.line != 0 {
            return None;
        }
        self.blocks.get(first.position)?.get(&path.tail())
    }

    /// Top edge of each top-level block, in document coordinates.
    pub fn block_offsets(&self) -> Vec<f32> {
        let config = self.geometry.config();
        stack::offsets(&self.blocks, config.element_padding_vertical)
            .into_iter()
            .map(|top| top + config.element_padding_vertical)
            .collect()
    }

    // === Building ===

    /// Append a fresh instance of `format_id` at the end of the document.
    pub fn attach_new_block(&mut self, format_id: &str, catalog: &Catalog) -> Result<BlockPath> {
        let ctx = LayoutContext::new(&self.geometry, catalog);
        let block = Block::from_catalog(format_id, &ctx)?;
        self.blocks.push(block);
        self.recalculate_size();
        log::debug!("Attached new '{}' block", format_id);
        Ok(BlockPath::root().child(Step::new(0, self.blocks.len() - 1)))
    }

    /// Replace the document contents with `records`.
    ///
    /// Records that fail to load are skipped and reported; the rest load in
    /// order. The loaded state becomes the `poll_change` baseline.
    pub fn load(&mut self, records: &[InstanceRecord], catalog: &Catalog) -> LoadReport {
        let ctx = LayoutContext::new(&self.geometry, catalog);
        let mut report = LoadReport::default();
        let mut blocks = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            match Block::from_record(record, &ctx) {
                Ok(block) => blocks.push(block),
                Err(error) => {
                    log::warn!(
                        "Skipping top-level block {} ('{}'): {}",
                        index,
                        record.id,
                        error
                    );
                    report.skipped.push(SkippedBlock {
                        index,
                        id: record.id.clone(),
                        error,
                    });
                }
            }
        }

        report.loaded = blocks.len();
        self.blocks = blocks;
        self.recalculate_size();
        self.published = self.serialize();
        report
    }

    /// `load` for document text: a JSON array of instance records.
    pub fn load_json(&mut self, json: &str, catalog: &Catalog) -> Result<LoadReport> {
        let records: Vec<InstanceRecord> = serde_json::from_str(json)?;
        Ok(self.load(&records, catalog))
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
        self.recalculate_size();
    }

    // === Serialization ===

    pub fn serialize(&self) -> Vec<InstanceRecord> {
        self.blocks.iter().map(Block::to_record).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.serialize())?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.serialize())?)
    }

    /// The serialized document if it changed since the last call (or since
    /// the last load), `None` otherwise.
    pub fn poll_change(&mut self) -> Option<Vec<InstanceRecord>> {
        let current = self.serialize();
        if current == self.published {
            return None;
        }
        self.published = current.clone();
        Some(current)
    }

    // === Point queries ===

    fn to_stack(&self, x: f32, y: f32) -> (f32, f32) {
        let config = self.geometry.config();
        (
            x - config.element_padding_horizontal,
            y - config.element_padding_vertical,
        )
    }

    pub fn hit_test(&self, x: f32, y: f32) -> Option<Hit> {
        let (x, y) = self.to_stack(x, y);
        stack::hit(&self.blocks, x, y, &self.geometry)
            .map(|(index, hit)| hit.within(Step::new(0, index)))
    }

    /// The literal type of the input field under the point, `ValueType::None`
    /// when there is none.
    pub fn input_kind_at(&self, x: f32, y: f32) -> ValueType {
        match self.hit_test(x, y) {
            Some(Hit::Field {
                block,
                line,
                column,
            }) => self
                .get(&block)
                .and_then(|owner| owner.format().slot(line, column))
                .and_then(|slot| slot.io_kind())
                .map_or(ValueType::None, |kind| kind.accepted_type()),
            _ => ValueType::None,
        }
    }

    /// The literal under the point, `Some("")` for an empty field.
    pub fn value_at(&self, x: f32, y: f32) -> Option<&str> {
        match self.hit_test(x, y)? {
            Hit::Field {
                block,
                line,
                column,
            } => match self.get(&block)?.column(line, column)? {
                Column::Literal(value) => Some(value),
                _ => Some(""),
            },
            Hit::Block(_) => None,
        }
    }

    // === Edits ===

    /// Run `f` on the block at `path`, then relayout up to the root.
    pub fn edit<R>(
        &mut self,
        path: &BlockPath,
        catalog: &Catalog,
        f: impl FnOnce(&mut Block, &LayoutContext) -> R,
    ) -> Option<R> {
        let first = path.first()?;
        if first.line != 0 {
            return None;
        }
        let tail = path.tail();
        let ctx = LayoutContext::new(&self.geometry, catalog);
        let result = self
            .blocks
            .get_mut(first.position)?
            .update_at(tail.steps(), &ctx, |block| f(block, &ctx));
        self.recalculate_size();
        result
    }

    /// Set the literal of the input field under the point.
    pub fn set_value_at(&mut self, value: &str, x: f32, y: f32, catalog: &Catalog) -> bool {
        match self.hit_test(x, y) {
            Some(Hit::Field {
                block,
                line,
                column,
            }) => self
                .edit(&block, catalog, |owner, ctx| {
                    owner.set_literal(line, column, value, ctx)
                })
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Detach the block at `path`, top-level blocks included.
    pub fn remove(&mut self, path: &BlockPath, catalog: &Catalog) -> Option<Block> {
        let first = path.first()?;
        if first.line != 0 || first.position >= self.blocks.len() {
            return None;
        }

        let tail = path.tail();
        let removed = if tail.is_root() {
            Some(self.blocks.remove(first.position))
        } else {
            let ctx = LayoutContext::new(&self.geometry, catalog);
            self.blocks[first.position].detach(&tail, &ctx)
        };

        self.recalculate_size();
        if let Some(block) = &removed {
            log::debug!("Removed '{}' block at {}", block.id(), path);
        }
        removed
    }

    /// Detach the block under the point, or the block owning the field
    /// under it. `None` over empty space.
    pub fn remove_at(&mut self, x: f32, y: f32, catalog: &Catalog) -> Option<Block> {
        let target = self.hit_test(x, y)?.block_path().clone();
        self.remove(&target, catalog)
    }

    /// Drop `block` at the point. The document always takes it: a block
    /// that fits nowhere else lands in the root stack.
    pub fn insert_at(&mut self, block: Block, x: f32, y: f32, catalog: &Catalog) {
        let (x, y) = self.to_stack(x, y);
        let id = block.id().to_string();
        let ctx = LayoutContext::new(&self.geometry, catalog);
        stack::insert(&mut self.blocks, block, x, y, &ctx);
        self.recalculate_size();
        log::debug!("Dropped '{}' block at ({}, {})", id, x, y);
    }

    // === Layout ===

    /// Lay out every block again, after a geometry or language change.
    pub fn relayout(&mut self, catalog: &Catalog) {
        let ctx = LayoutContext::new(&self.geometry, catalog);
        for block in &mut self.blocks {
            block.relayout(&ctx);
        }
        self.recalculate_size();
    }

    fn recalculate_size(&mut self) -> bool {
        let config = self.geometry.config();
        let extent = stack::extent(&self.blocks, config.element_padding_vertical);
        let size = Size::new(
            extent.width + 2.0 * config.element_padding_horizontal,
            extent.height + 2.0 * config.element_padding_vertical,
        );
        let changed = size != self.size;
        self.size = size;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use serde_json::json;

    fn document() -> (Document, Catalog) {
        (Document::new(fixtures::geometry()), fixtures::catalog())
    }

    #[test]
    fn empty_document_has_padding_extent() {
        let (document, _) = document();
        assert!(document.is_empty());
        assert_eq!(document.size(), Size::new(4.0, 4.0));
        assert_eq!(document.to_json().unwrap(), "[]");
    }

    #[test]
    fn attach_appends_and_grows() {
        let (mut document, catalog) = document();
        let first = document.attach_new_block("print", &catalog).unwrap();
        let second = document.attach_new_block("pi", &catalog).unwrap();

        assert_eq!(first.to_string(), "0.0");
        assert_eq!(second.to_string(), "0.1");
        assert_eq!(document.get(&second).map(Block::id), Some("pi"));
        assert_eq!(document.size(), Size::new(61.0, 34.0));
        assert_eq!(document.block_offsets(), vec![2.0, 18.0]);

        let err = document.attach_new_block("teleport", &catalog).unwrap_err();
        assert!(matches!(err, TreeError::UnknownFormat { .. }));
        assert_eq!(document.len(), 2);
    }

    #[test]
    fn print_scenario() {
        let (mut document, catalog) = document();
        document.attach_new_block("print", &catalog).unwrap();

        // print at (2, 2); its field spans x 35..55, y 4..14
        assert_eq!(document.input_kind_at(40.0, 9.0), ValueType::Text);
        assert!(document.set_value_at("hello", 40.0, 9.0, &catalog));
        assert_eq!(document.value_at(40.0, 9.0), Some("hello"));
        assert_eq!(
            serde_json::to_value(document.serialize()).unwrap(),
            json!([{"id": "print", "params": ["hello"]}])
        );

        assert_eq!(document.input_kind_at(10.0, 9.0), ValueType::None);
        assert_eq!(document.value_at(10.0, 9.0), None);
    }

    #[test]
    fn remove_top_level_and_nested() {
        let (mut document, catalog) = document();
        let repeat = document.attach_new_block("repeat", &catalog).unwrap();
        document.attach_new_block("print", &catalog).unwrap();

        document
            .edit(&repeat, &catalog, |repeat, ctx| {
                let print = Block::from_catalog("print", ctx).unwrap();
                repeat.push_child(1, print, ctx).is_ok()
            })
            .unwrap();
        assert_eq!(document.height(), 46.0 + 2.0 + 14.0 + 4.0);

        // nested print at (2 + 12, 2 + 16)
        let nested = document.remove_at(14.0 + 5.0, 18.0 + 5.0, &catalog).unwrap();
        assert_eq!(nested.id(), "print");
        assert_eq!(document.height(), 32.0 + 2.0 + 14.0 + 4.0);

        // repeat's own label removes repeat itself
        let repeat = document.remove_at(10.0, 9.0, &catalog).unwrap();
        assert_eq!(repeat.id(), "repeat");
        assert_eq!(document.len(), 1);
        assert_eq!(document.height(), 14.0 + 4.0);

        assert!(document.remove_at(500.0, 500.0, &catalog).is_none());
        assert!(document.remove(&BlockPath::parse("0.7").unwrap(), &catalog).is_none());
    }

    #[test]
    fn insert_at_positions() {
        let (mut document, catalog) = document();
        document.attach_new_block("add", &catalog).unwrap();

        // into add's first field: add at (2, 2), field x 6..26
        let ctx = LayoutContext::new(document.geometry(), &catalog);
        let pi = Block::from_catalog("pi", &ctx).unwrap();
        let yes = Block::from_catalog("yes", &ctx).unwrap();
        let print = Block::from_catalog("print", &ctx).unwrap();

        document.insert_at(pi, 12.0, 9.0, &catalog);
        assert_eq!(document.len(), 1);
        assert_eq!(
            document
                .get(&BlockPath::parse("0.0/0.0").unwrap())
                .map(Block::id),
            Some("pi")
        );

        // type mismatch in the upper half lands above add
        document.insert_at(yes, 30.0, 3.0, &catalog);
        assert_eq!(document.blocks()[0].id(), "yes");

        // far below lands at the end
        document.insert_at(print, 5.0, 1000.0, &catalog);
        assert_eq!(document.blocks()[2].id(), "print");
        assert_eq!(document.len(), 3);
    }

    #[test]
    fn load_skips_bad_records() {
        let (mut document, catalog) = document();
        let report = document
            .load_json(
                r#"[{"id": "print", "params": ["a"]},
                    {"id": "teleport"},
                    {"id": "repeat", "params": ["2"]},
                    {"id": "pi"}]"#,
                &catalog,
            )
            .unwrap();

        assert_eq!(report.loaded, 2);
        assert!(!report.is_complete());
        let skipped: Vec<_> = report.skipped.iter().map(|s| (s.index, s.id.as_str())).collect();
        assert_eq!(skipped, vec![(1, "teleport"), (2, "repeat")]);
        assert!(matches!(report.skipped[0].error, TreeError::UnknownFormat { .. }));
        assert!(matches!(report.skipped[1].error, TreeError::MalformedInstance { .. }));

        assert_eq!(document.len(), 2);
        assert!(document.load_json("{}", &catalog).is_err());
    }

    #[test]
    fn poll_change_reports_each_change_once() {
        let (mut document, catalog) = document();
        assert_eq!(document.poll_change(), None);

        document.attach_new_block("print", &catalog).unwrap();
        let first = document.poll_change().unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(document.poll_change(), None);

        // setting the same value again is not a change
        assert!(document.set_value_at("x", 40.0, 9.0, &catalog));
        assert!(document.poll_change().is_some());
        assert!(document.set_value_at("x", 40.0, 9.0, &catalog));
        assert_eq!(document.poll_change(), None);

        document.load(&[InstanceRecord::new("pi")], &catalog);
        assert_eq!(document.poll_change(), None);
    }

    #[test]
    fn relayout_after_geometry_change() {
        let (mut document, catalog) = document();
        document.attach_new_block("print", &catalog).unwrap();

        let mut config = fixtures::geometry().config().clone();
        config.scale = 2.0;
        let geometry = Geometry::new(
            config,
            crate::geometry::MonospaceMetrics {
                char_width: 5.0,
                line_height: 10.0,
            },
        );
        document.set_geometry(geometry, &catalog);

        // print: 8 + (25 + 8) + (40 + 8) wide, max(10, 20) + 8 tall
        assert_eq!(document.blocks()[0].size(), Size::new(89.0, 28.0));
        assert_eq!(document.size(), Size::new(97.0, 36.0));
    }
}
