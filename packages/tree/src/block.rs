//! Block instances and their layout.
//!
//! A `Block` owns its nested blocks outright: child columns hold a boxed
//! block, stack lines hold a `Vec<Block>`. Sizes are cached on every block
//! and recomputed bottom-up; any mutation through a path relayouts each
//! ancestor on the way back out, so the root is always current.
//!
//! # Layout
//!
//! A fixed line is as tall as its tallest column plus vertical inner padding
//! and as wide as its columns with inner padding between and around them.
//! A stack line is the stack indented by the gutter, with element padding
//! above and below. A block whose last line is a stack gets a closing bar.

use std::sync::Arc;

use codeblocks_format::{BlockFormat, Catalog, Line, Slot};

use crate::error::{Result, TreeError};
use crate::geometry::{LayoutContext, Size};
use crate::path::{BlockPath, Step};
use crate::stack;

/// Content of one column of a fixed line.
///
/// Text columns are always `Empty`; their label lives in the format.
/// A literal is never the empty string.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Column {
    #[default]
    Empty,
    Literal(String),
    Child(Box<Block>),
}

impl Column {
    pub fn is_empty(&self) -> bool {
        matches!(self, Column::Empty)
    }

    pub fn literal(&self) -> Option<&str> {
        match self {
            Column::Literal(value) => Some(value),
            _ => None,
        }
    }

    pub fn child(&self) -> Option<&Block> {
        match self {
            Column::Child(block) => Some(block),
            _ => None,
        }
    }

    /// `Literal` for non-empty text, `Empty` otherwise.
    pub fn from_literal(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Column::Empty
        } else {
            Column::Literal(value)
        }
    }
}

/// Content of one line, mirroring `codeblocks_format::Line`.
#[derive(Clone, Debug, PartialEq)]
pub enum LineContent {
    Columns(Vec<Column>),
    Stack(Vec<Block>),
}

impl LineContent {
    pub fn is_stack(&self) -> bool {
        matches!(self, LineContent::Stack(_))
    }
}

/// An instance of a format in the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    format: Arc<BlockFormat>,
    lines: Vec<LineContent>,
    size: Size,
    line_sizes: Vec<Size>,
    cell_sizes: Vec<Vec<Size>>,
}

impl Block {
    /// A fresh block with every column and stack empty, laid out.
    pub fn new(format: Arc<BlockFormat>, ctx: &LayoutContext) -> Self {
        let mut block = Self::r#unsized(format);
        block.recalculate_size(ctx);
        block
    }

    /// `new` for a format looked up by id.
    pub fn from_catalog(id: &str, ctx: &LayoutContext) -> Result<Self> {
        let format = ctx
            .catalog
            .lookup(id)
            .ok_or_else(|| TreeError::UnknownFormat { id: id.to_string() })?;
        Ok(Self::new(format, ctx))
    }

    /// Empty content with zero sizes. Callers must lay it out.
    pub(crate) fn r#unsized(format: Arc<BlockFormat>) -> Self {
        let lines = format
            .lines
            .iter()
            .map(|line| match line {
                Line::Columns(slots) => LineContent::Columns(vec![Column::Empty; slots.len()]),
                Line::Stack => LineContent::Stack(Vec::new()),
            })
            .collect();
        let cell_sizes = format
            .lines
            .iter()
            .map(|line| vec![Size::default(); line.slots().len()])
            .collect();

        Self {
            line_sizes: vec![Size::default(); format.lines.len()],
            format,
            lines,
            size: Size::default(),
            cell_sizes,
        }
    }

    // === Accessors ===

    pub fn format(&self) -> &Arc<BlockFormat> {
        &self.format
    }

    pub fn id(&self) -> &str {
        &self.format.id
    }

    pub fn lines(&self) -> &[LineContent] {
        &self.lines
    }

    pub fn line(&self, line: usize) -> Option<&LineContent> {
        self.lines.get(line)
    }

    pub fn column(&self, line: usize, column: usize) -> Option<&Column> {
        match self.lines.get(line)? {
            LineContent::Columns(columns) => columns.get(column),
            LineContent::Stack(_) => None,
        }
    }

    pub fn stack(&self, line: usize) -> Option<&[Block]> {
        match self.lines.get(line)? {
            LineContent::Stack(children) => Some(children),
            LineContent::Columns(_) => None,
        }
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

    pub fn line_sizes(&self) -> &[Size] {
        &self.line_sizes
    }

    pub fn line_widths(&self) -> Vec<f32> {
        self.line_sizes.iter().map(|size| size.width).collect()
    }

    pub fn line_heights(&self) -> Vec<f32> {
        self.line_sizes.iter().map(|size| size.height).collect()
    }

    /// Top edge of each line, relative to the block.
    pub fn line_offsets(&self) -> Vec<f32> {
        let mut top = 0.0;
        self.line_sizes
            .iter()
            .map(|size| {
                let offset = top;
                top += size.height;
                offset
            })
            .collect()
    }

    /// Cached size of a fixed-line column, padding excluded.
    pub fn cell_size(&self, line: usize, column: usize) -> Option<Size> {
        self.cell_sizes.get(line)?.get(column).copied()
    }

    /// Whether any column or stack holds something.
    pub fn has_content(&self) -> bool {
        self.lines.iter().any(|line| match line {
            LineContent::Columns(columns) => columns.iter().any(|c| !c.is_empty()),
            LineContent::Stack(children) => !children.is_empty(),
        })
    }

    /// Short label for collapsed views: the localized name, with `" ..."`
    /// appended when the block has content.
    pub fn summary(&self, catalog: &Catalog) -> String {
        let name = catalog.name_of(&self.format);
        if self.has_content() {
            format!("{} ...", name)
        } else {
            name.into_owned()
        }
    }

    /// Number of blocks in this subtree, this one included.
    pub fn block_count(&self) -> usize {
        1 + self
            .lines
            .iter()
            .map(|line| match line {
                LineContent::Columns(columns) => columns
                    .iter()
                    .filter_map(Column::child)
                    .map(Block::block_count)
                    .sum::<usize>(),
                LineContent::Stack(children) => children.iter().map(Block::block_count).sum(),
            })
            .sum::<usize>()
    }

    // === Navigation ===

    /// The block one step below this one.
    pub fn child(&self, step: Step) -> Option<&Block> {
        match self.lines.get(step.line)? {
            LineContent::Columns(columns) => columns.get(step.position)?.child(),
            LineContent::Stack(children) => children.get(step.position),
        }
    }

    fn child_mut(&mut self, step: Step) -> Option<&mut Block> {
        match self.lines.get_mut(step.line)? {
            LineContent::Columns(columns) => match columns.get_mut(step.position)? {
                Column::Child(block) => Some(block),
                _ => None,
            },
            LineContent::Stack(children) => children.get_mut(step.position),
        }
    }

    /// Resolve a path relative to this block.
    pub fn get(&self, path: &BlockPath) -> Option<&Block> {
        path.steps()
            .iter()
            .try_fold(self, |block, step| block.child(*step))
    }

    /// Run `f` on the block at `steps`, then relayout it and every block
    /// between it and `self`.
    ///
    /// Returns `None` when the path does not resolve; nothing is touched then.
    pub(crate) fn update_at<R>(
        &mut self,
        steps: &[Step],
        ctx: &LayoutContext,
        f: impl FnOnce(&mut Block) -> R,
    ) -> Option<R> {
        let result = match steps.split_first() {
            None => f(self),
            Some((step, rest)) => self.child_mut(*step)?.update_at(rest, ctx, f)?,
        };
        self.recalculate_size(ctx);
        Some(result)
    }

    // === Direct edits ===

    /// Set the literal of an input column. Empty text clears it.
    ///
    /// Returns `false` for text columns, non-input slots and columns holding
    /// a nested block.
    pub fn set_literal(
        &mut self,
        line: usize,
        column: usize,
        value: &str,
        ctx: &LayoutContext,
    ) -> bool {
        let takes_literal = self
            .format
            .slot(line, column)
            .and_then(Slot::io_kind)
            .is_some_and(|kind| kind.is_input());
        if !takes_literal {
            return false;
        }

        let Some(LineContent::Columns(columns)) = self.lines.get_mut(line) else {
            return false;
        };
        let Some(cell) = columns.get_mut(column) else {
            return false;
        };
        if matches!(cell, Column::Child(_)) {
            return false;
        }

        *cell = Column::from_literal(value);
        self.recalculate_size(ctx);
        true
    }

    /// Put `block` into an empty child column, if its type fits.
    ///
    /// The block is handed back when the column is not an empty child slot
    /// or the catalog rejects the type pairing.
    pub fn place_child(
        &mut self,
        line: usize,
        column: usize,
        block: Block,
        ctx: &LayoutContext,
    ) -> std::result::Result<(), Block> {
        let Some(kind) = self.format.slot(line, column).and_then(Slot::io_kind) else {
            return Err(block);
        };
        if !ctx.catalog.compatible(block.format(), kind) {
            return Err(block);
        }

        match self.lines.get_mut(line) {
            Some(LineContent::Columns(columns)) => match columns.get_mut(column) {
                Some(cell) if cell.is_empty() => *cell = Column::Child(Box::new(block)),
                _ => return Err(block),
            },
            _ => return Err(block),
        }
        self.recalculate_size(ctx);
        Ok(())
    }

    /// Insert `block` into a stack line at `index`, clamped to the stack
    /// length.
    pub fn insert_child(
        &mut self,
        line: usize,
        index: usize,
        block: Block,
        ctx: &LayoutContext,
    ) -> std::result::Result<(), Block> {
        match self.lines.get_mut(line) {
            Some(LineContent::Stack(children)) => {
                children.insert(index.min(children.len()), block);
            }
            _ => return Err(block),
        }
        self.recalculate_size(ctx);
        Ok(())
    }

    /// Append `block` to a stack line.
    pub fn push_child(
        &mut self,
        line: usize,
        block: Block,
        ctx: &LayoutContext,
    ) -> std::result::Result<(), Block> {
        self.insert_child(line, usize::MAX, block, ctx)
    }

    /// Detach the block one step below this one.
    pub fn take_child(&mut self, step: Step, ctx: &LayoutContext) -> Option<Block> {
        let taken = match self.lines.get_mut(step.line)? {
            LineContent::Columns(columns) => {
                let cell = columns.get_mut(step.position)?;
                match std::mem::take(cell) {
                    Column::Child(block) => *block,
                    other => {
                        *cell = other;
                        return None;
                    }
                }
            }
            LineContent::Stack(children) => {
                if step.position >= children.len() {
                    return None;
                }
                children.remove(step.position)
            }
        };
        self.recalculate_size(ctx);
        Some(taken)
    }

    // === Layout ===

    /// Recompute this block's cached sizes from its content.
    ///
    /// Nested blocks are assumed current. Returns whether the block's own
    /// size changed.
    pub fn recalculate_size(&mut self, ctx: &LayoutContext) -> bool {
        let config = ctx.config();
        let previous = self.size;
        let mut size = Size::default();

        for (line, content) in self.lines.iter().enumerate() {
            let line_size = match content {
                LineContent::Stack(children) => {
                    let extent = stack::extent(children, config.element_padding_vertical);
                    Size::new(
                        extent.width + config.element_padding_horizontal + config.empty_line_width,
                        extent.height + 2.0 * config.element_padding_vertical,
                    )
                }
                LineContent::Columns(columns) => {
                    let slots = self.format.lines.get(line).map_or(&[][..], Line::slots);
                    let mut line_size = Size::new(config.inner_padding_horizontal, 0.0);
                    for (column, (slot, cell)) in slots.iter().zip(columns).enumerate() {
                        let cell_size = measure_cell(slot, cell, ctx);
                        self.cell_sizes[line][column] = cell_size;
                        line_size.width += cell_size.width + config.inner_padding_horizontal;
                        line_size.height = line_size
                            .height
                            .max(cell_size.height + 2.0 * config.inner_padding_vertical);
                    }
                    line_size
                }
            };
            self.line_sizes[line] = line_size;
            size.width = size.width.max(line_size.width);
            size.height += line_size.height;
        }

        if self.format.ends_with_stack() {
            size.height += ctx.geometry.closing_line_height();
        }

        self.size = size;
        previous != size
    }

    /// Recompute every size in the subtree, deepest blocks first.
    ///
    /// Needed after the geometry or the active language changes.
    pub fn relayout(&mut self, ctx: &LayoutContext) {
        for line in &mut self.lines {
            match line {
                LineContent::Columns(columns) => {
                    for cell in columns {
                        if let Column::Child(child) = cell {
                            child.relayout(ctx);
                        }
                    }
                }
                LineContent::Stack(children) => {
                    for child in children {
                        child.relayout(ctx);
                    }
                }
            }
        }
        self.recalculate_size(ctx);
    }

    /// Content access for loaders that fill a block before laying it out.
    pub(crate) fn lines_mut(&mut self) -> &mut Vec<LineContent> {
        &mut self.lines
    }
}

/// Size of one column's content, padding ring included for nested blocks
/// and literals.
fn measure_cell(slot: &Slot, cell: &Column, ctx: &LayoutContext) -> Size {
    let config = ctx.config();
    let geometry = ctx.geometry;
    match (slot, cell) {
        (Slot::Text(text), _) => Size::new(
            geometry.text_width(&ctx.label(text)),
            geometry.text_height(),
        ),
        (Slot::Child(_), Column::Child(child)) => Size::new(
            child.width() + 2.0 * config.element_padding_horizontal,
            child.height() + 2.0 * config.element_padding_vertical,
        ),
        (Slot::Child(_), Column::Literal(value)) => Size::new(
            geometry.text_width(value) + 2.0 * config.inner_padding_horizontal,
            geometry.text_height() + 2.0 * config.inner_padding_vertical,
        ),
        (Slot::Child(_), Column::Empty) => {
            Size::new(config.empty_field_width, config.empty_field_height)
        }
    }
}
