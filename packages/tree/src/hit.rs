//! Hit testing: which block or literal field lies under a point.
//!
//! One traversal serves every point query. It walks lines top-down; within
//! a stack line the gutter belongs to the block and the stack is searched,
//! within a fixed line text and padding belong to the block, nested blocks
//! are searched, and empty or literal columns are fields when the point is
//! inside the field's vertical span.

use codeblocks_format::{Slot, ValueType};

use crate::block::{Block, Column, LineContent};
use crate::geometry::Geometry;
use crate::path::{BlockPath, Step};
use crate::stack;

/// Result of a hit test, with paths relative to where the test started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Hit {
    /// The body of a block: label text, padding, gutter or closing bar.
    Block(BlockPath),
    /// An empty or literal column of a block.
    Field {
        block: BlockPath,
        line: usize,
        column: usize,
    },
}

impl Hit {
    /// The block that was hit, or that owns the field that was hit.
    pub fn block_path(&self) -> &BlockPath {
        match self {
            Hit::Block(path) => path,
            Hit::Field { block, .. } => block,
        }
    }

    pub fn is_field(&self) -> bool {
        matches!(self, Hit::Field { .. })
    }

    /// Re-root the hit one step further up.
    pub(crate) fn within(mut self, step: Step) -> Hit {
        match &mut self {
            Hit::Block(path) => path.prepend(step),
            Hit::Field { block, .. } => block.prepend(step),
        }
        self
    }

    fn this_block() -> Hit {
        Hit::Block(BlockPath::root())
    }
}

impl Block {
    /// Find what lies under `(x, y)`, relative to this block's top-left.
    ///
    /// `None` when the point is outside the block, right of a line, or in
    /// empty space inside a stack.
    pub fn hit_test(&self, x: f32, y: f32, geometry: &Geometry) -> Option<Hit> {
        if !self.size().contains(x, y) {
            return None;
        }

        let mut top = 0.0;
        for (line, content) in self.lines().iter().enumerate() {
            let size = self.line_sizes()[line];
            if top + size.height >= y {
                if x > size.width {
                    return None;
                }
                return match content {
                    LineContent::Stack(children) => {
                        self.hit_stack_line(line, children, x, y - top, geometry)
                    }
                    LineContent::Columns(columns) => {
                        self.hit_fixed_line(line, columns, x, y - top, geometry)
                    }
                };
            }
            top += size.height;
        }

        // closing bar under a trailing stack
        (x <= geometry.config().end_line_width).then(Hit::this_block)
    }

    fn hit_stack_line(
        &self,
        line: usize,
        children: &[Block],
        x: f32,
        y: f32,
        geometry: &Geometry,
    ) -> Option<Hit> {
        let config = geometry.config();
        let gutter = config.element_padding_horizontal + config.empty_line_width;
        if x < gutter {
            return Some(Hit::this_block());
        }

        let (index, hit) = stack::hit(
            children,
            x - gutter,
            y - config.element_padding_vertical,
            geometry,
        )?;
        Some(hit.within(Step::new(line, index)))
    }

    fn hit_fixed_line(
        &self,
        line: usize,
        columns: &[Column],
        x: f32,
        y: f32,
        geometry: &Geometry,
    ) -> Option<Hit> {
        let config = geometry.config();
        let line_height = self.line_sizes()[line].height;

        let mut right = config.inner_padding_horizontal;
        if x < right {
            return Some(Hit::this_block());
        }

        for (column, cell) in columns.iter().enumerate() {
            let cell_size = self.cell_size(line, column).unwrap_or_default();
            let left = right;
            right += cell_size.width;

            if x <= right {
                let cell_top = line_height / 2.0 - cell_size.height / 2.0;
                if matches!(self.format().slot(line, column), Some(Slot::Text(_))) {
                    return Some(Hit::this_block());
                }
                return match cell {
                    Column::Child(child) => {
                        let child_x = x - left - config.element_padding_horizontal;
                        let child_y = y - cell_top - config.element_padding_vertical;
                        if child.size().contains(child_x, child_y) {
                            child
                                .hit_test(child_x, child_y, geometry)
                                .map(|hit| hit.within(Step::new(line, column)))
                        } else {
                            Some(Hit::this_block())
                        }
                    }
                    Column::Empty | Column::Literal(_) => {
                        if y >= cell_top && y <= cell_top + cell_size.height {
                            Some(Hit::Field {
                                block: BlockPath::root(),
                                line,
                                column,
                            })
                        } else {
                            Some(Hit::this_block())
                        }
                    }
                };
            }

            right += config.inner_padding_horizontal;
            if x <= right {
                return Some(Hit::this_block());
            }
        }

        Some(Hit::this_block())
    }

    // === Point queries ===

    /// The literal type of the field under the point; `ValueType::None`
    /// when no input field is there.
    pub fn input_kind_at(&self, x: f32, y: f32, geometry: &Geometry) -> ValueType {
        match self.hit_test(x, y, geometry) {
            Some(Hit::Field {
                block,
                line,
                column,
            }) => self
                .get(&block)
                .and_then(|owner| owner.format().slot(line, column))
                .and_then(Slot::io_kind)
                .map_or(ValueType::None, |kind| kind.accepted_type()),
            _ => ValueType::None,
        }
    }

    /// The literal under the point: `Some("")` for an empty field, `None`
    /// when no field is there.
    pub fn value_at(&self, x: f32, y: f32, geometry: &Geometry) -> Option<&str> {
        match self.hit_test(x, y, geometry)? {
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
}
