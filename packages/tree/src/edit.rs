//! Point-driven edits: dropping a block, detaching a block, typing a literal.
//!
//! # Dropping
//!
//! A dropped block is offered to the block under the point. Above its top or
//! below its bottom it is handed back with `Above`/`Below` so the enclosing
//! stack places it. Inside, the line under the point gets the first chance:
//! a stack line always takes it, an empty child column takes it when the
//! types fit, a nested block is offered it recursively. When no line takes
//! it, the nearest stack by midpoint does, or the block is handed back.

use codeblocks_format::Slot;

use crate::block::{Block, Column, LineContent};
use crate::geometry::LayoutContext;
use crate::hit::Hit;
use crate::path::BlockPath;
use crate::stack;

/// Outcome of offering a block to another block.
#[derive(Debug)]
pub(crate) enum Placement {
    /// Place it before the probed block in the enclosing stack.
    Above(Block),
    /// Place it after the probed block, or keep looking further down.
    Below(Block),
    /// Somewhere inside the probed block took it.
    Inserted,
}

/// Which neighbour a point between two stacks belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Previous,
    Next,
}

/// Split the space between the end of one stack and the start of the next
/// at its midpoint. The midpoint itself belongs to the previous stack.
pub fn midpoint_side(y: f32, previous_end: f32, next_start: f32) -> Side {
    if y <= (previous_end + next_start) / 2.0 {
        Side::Previous
    } else {
        Side::Next
    }
}

impl Block {
    /// Offer `block` to this block at `(x, y)`, relative to its top-left.
    pub(crate) fn probe_insert(
        &mut self,
        block: Block,
        x: f32,
        y: f32,
        ctx: &LayoutContext,
    ) -> Placement {
        let height = self.height();
        if y <= 0.0 {
            return Placement::Above(block);
        }
        if y >= height {
            return Placement::Below(block);
        }
        if x < 0.0 {
            return if y < height / 2.0 {
                Placement::Above(block)
            } else {
                Placement::Below(block)
            };
        }

        let mut block = block;
        let mut top = 0.0;
        for line in 0..self.lines().len() {
            let line_height = self.line_sizes()[line].height;
            if top + line_height >= y {
                match self.insert_into_line(block, line, x, y - top, ctx) {
                    Ok(()) => {
                        self.recalculate_size(ctx);
                        return Placement::Inserted;
                    }
                    Err(returned) => {
                        block = returned;
                        break;
                    }
                }
            }
            top += line_height;
        }

        self.insert_between_stacks(block, y, ctx)
    }

    /// Try one line. `Err` hands the block back untouched.
    fn insert_into_line(
        &mut self,
        block: Block,
        line: usize,
        x: f32,
        y: f32,
        ctx: &LayoutContext,
    ) -> Result<(), Block> {
        let config = ctx.config();
        let line_height = self.line_sizes()[line].height;
        let format = self.format().clone();

        let cell_sizes: Vec<_> = (0..format.column_count(line))
            .map(|column| self.cell_size(line, column).unwrap_or_default())
            .collect();

        match self.lines_mut().get_mut(line) {
            Some(LineContent::Stack(children)) => {
                stack::insert(
                    children,
                    block,
                    x - config.element_padding_horizontal - config.empty_line_width,
                    y - config.element_padding_vertical,
                    ctx,
                );
                Ok(())
            }
            Some(LineContent::Columns(columns)) => {
                let mut right = config.inner_padding_horizontal;
                if x < right {
                    return Err(block);
                }

                for (column, cell) in columns.iter_mut().enumerate() {
                    let cell_size = cell_sizes.get(column).copied().unwrap_or_default();
                    let left = right;
                    right += cell_size.width;

                    if x <= right {
                        let kind = match format.slot(line, column) {
                            Some(Slot::Child(kind)) => *kind,
                            _ => return Err(block),
                        };
                        return match cell {
                            Column::Literal(_) => Err(block),
                            Column::Empty => {
                                if ctx.catalog.compatible(block.format(), kind) {
                                    *cell = Column::Child(Box::new(block));
                                    Ok(())
                                } else {
                                    log::debug!(
                                        "Slot {} of '{}' rejects '{}'",
                                        kind,
                                        format.id,
                                        block.id()
                                    );
                                    Err(block)
                                }
                            }
                            Column::Child(child) => {
                                let cell_top = line_height / 2.0 - cell_size.height / 2.0;
                                match child.probe_insert(
                                    block,
                                    x - left - config.element_padding_horizontal,
                                    y - cell_top - config.element_padding_vertical,
                                    ctx,
                                ) {
                                    Placement::Inserted => Ok(()),
                                    Placement::Above(returned) | Placement::Below(returned) => {
                                        Err(returned)
                                    }
                                }
                            }
                        };
                    }

                    right += config.inner_padding_horizontal;
                    if x <= right {
                        return Err(block);
                    }
                }
                Err(block)
            }
            None => Err(block),
        }
    }

    /// No line took the block: give it to the stack whose side of the
    /// midpoint the point is on.
    fn insert_between_stacks(&mut self, block: Block, y: f32, ctx: &LayoutContext) -> Placement {
        let mut previous: Option<(usize, f32)> = None;
        let mut top = 0.0;

        for line in 0..self.lines().len() {
            let line_height = self.line_sizes()[line].height;
            if self.lines()[line].is_stack() {
                if top + line_height >= y {
                    let previous_end = previous.map_or(0.0, |(_, end)| end);
                    return match midpoint_side(y, previous_end, top) {
                        Side::Previous => self.append_to_previous(previous, block, ctx),
                        Side::Next => match self.insert_child(line, 0, block, ctx) {
                            Ok(()) => Placement::Inserted,
                            Err(returned) => Placement::Above(returned),
                        },
                    };
                }
                previous = Some((line, top + line_height));
            }
            top += line_height;
        }

        let previous_end = previous.map_or(0.0, |(_, end)| end);
        match midpoint_side(y, previous_end, self.height()) {
            Side::Previous => self.append_to_previous(previous, block, ctx),
            Side::Next => Placement::Below(block),
        }
    }

    fn append_to_previous(
        &mut self,
        previous: Option<(usize, f32)>,
        block: Block,
        ctx: &LayoutContext,
    ) -> Placement {
        let Some((line, _)) = previous else {
            return Placement::Above(block);
        };
        match self.push_child(line, block, ctx) {
            Ok(()) => Placement::Inserted,
            Err(returned) => Placement::Above(returned),
        }
    }

    // === Detach and set ===

    /// Detach the nested block under the point.
    ///
    /// A field hit detaches the block owning the field. Returns `None` when
    /// nothing is under the point or the point is on this block's own body;
    /// detaching `self` is up to whoever owns it.
    pub fn remove_at(&mut self, x: f32, y: f32, ctx: &LayoutContext) -> Option<Block> {
        let target = self.hit_test(x, y, ctx.geometry)?.block_path().clone();
        self.detach(&target, ctx)
    }

    /// Detach the block at `path`, relative to this block.
    pub fn detach(&mut self, path: &BlockPath, ctx: &LayoutContext) -> Option<Block> {
        let (parent, step) = path.split_last()?;
        self.update_at(parent.steps(), ctx, |owner| owner.take_child(step, ctx))
            .flatten()
    }

    /// Set the literal of the input field under the point.
    ///
    /// Returns `false` when no input field is there.
    pub fn set_value_at(&mut self, value: &str, x: f32, y: f32, ctx: &LayoutContext) -> bool {
        match self.hit_test(x, y, ctx.geometry) {
            Some(Hit::Field {
                block,
                line,
                column,
            }) => self
                .update_at(block.steps(), ctx, |owner| {
                    owner.set_literal(line, column, value, ctx)
                })
                .unwrap_or(false),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::geometry::Size;

    #[test]
    fn midpoint_belongs_to_previous() {
        assert_eq!(midpoint_side(120.0, 100.0, 140.0), Side::Previous);
        assert_eq!(midpoint_side(121.0, 100.0, 140.0), Side::Next);
        assert_eq!(midpoint_side(0.0, 0.0, 0.0), Side::Previous);
    }

    #[test]
    fn drop_into_compatible_field() {
        let catalog = fixtures::catalog();
        let geometry = fixtures::geometry();
        let ctx = LayoutContext::new(&geometry, &catalog);

        let mut add = Block::from_catalog("add", &ctx).unwrap();
        let pi = Block::from_catalog("pi", &ctx).unwrap();

        // first NUM_IN column: x 4..24
        assert!(matches!(
            add.probe_insert(pi, 10.0, 7.0, &ctx),
            Placement::Inserted
        ));
        assert_eq!(add.column(0, 0).and_then(Column::child).map(Block::id), Some("pi"));
        assert_eq!(add.size(), Size::new(63.0, 22.0));
    }

    #[test]
    fn drop_with_wrong_type_is_handed_back() {
        let catalog = fixtures::catalog();
        let geometry = fixtures::geometry();
        let ctx = LayoutContext::new(&geometry, &catalog);

        let mut add = Block::from_catalog("add", &ctx).unwrap();
        let yes = Block::from_catalog("yes", &ctx).unwrap();

        // upper half of a block without stacks: above it
        match add.probe_insert(yes, 10.0, 5.0, &ctx) {
            Placement::Above(returned) => assert_eq!(returned.id(), "yes"),
            other => panic!("unexpected placement: {:?}", other),
        }
        let yes = Block::from_catalog("yes", &ctx).unwrap();
        assert!(matches!(
            add.probe_insert(yes, 10.0, 9.0, &ctx),
            Placement::Below(_)
        ));
        assert!(!add.has_content());
    }

    #[test]
    fn literal_columns_reject_drops() {
        let catalog = fixtures::catalog();
        let geometry = fixtures::geometry();
        let ctx = LayoutContext::new(&geometry, &catalog);

        let mut print = Block::from_catalog("print", &ctx).unwrap();
        print.set_literal(0, 1, "hi", &ctx);
        let pi = Block::from_catalog("pi", &ctx).unwrap();
        // literal "hi": x 33..51, line height 18
        assert!(!matches!(
            print.probe_insert(pi, 40.0, 9.0, &ctx),
            Placement::Inserted
        ));
        assert_eq!(print.column(0, 1).and_then(Column::literal), Some("hi"));
    }

    #[test]
    fn drop_into_nested_field() {
        let catalog = fixtures::catalog();
        let geometry = fixtures::geometry();
        let ctx = LayoutContext::new(&geometry, &catalog);

        let mut print = Block::from_catalog("print", &ctx).unwrap();
        let add = Block::from_catalog("add", &ctx).unwrap();
        print.place_child(0, 1, add, &ctx).unwrap();
        // add sits at x 35, y 4 inside print; its second field at 37..57
        let pi = Block::from_catalog("pi", &ctx).unwrap();
        assert!(matches!(
            print.probe_insert(pi, 35.0 + 40.0, 4.0 + 7.0, &ctx),
            Placement::Inserted
        ));

        let add = print.column(0, 1).and_then(Column::child).unwrap();
        assert_eq!(add.column(0, 2).and_then(Column::child).map(Block::id), Some("pi"));
        assert_eq!(print.height(), add.height() + 4.0 + 4.0);
    }

    #[test]
    fn drop_between_stacks_splits_at_midpoint() {
        let catalog = fixtures::catalog();
        let geometry = fixtures::geometry();
        let ctx = LayoutContext::new(&geometry, &catalog);

        let fresh_fork = || {
            let mut fork = Block::from_catalog("fork", &ctx).unwrap();
            let print = Block::from_catalog("print", &ctx).unwrap();
            fork.push_child(0, print, &ctx).unwrap();
            fork
        };

        // first stack ends at 18, second starts at 32
        let fork = fresh_fork();
        assert_eq!(fork.line_offsets(), vec![0.0, 18.0, 32.0]);

        let mut fork = fresh_fork();
        let pi = Block::from_catalog("pi", &ctx).unwrap();
        assert!(matches!(fork.probe_insert(pi, 5.0, 25.0, &ctx), Placement::Inserted));
        assert_eq!(fork.stack(0).map(<[Block]>::len), Some(2));
        assert_eq!(fork.stack(2).map(<[Block]>::len), Some(0));

        let mut fork = fresh_fork();
        let pi = Block::from_catalog("pi", &ctx).unwrap();
        assert!(matches!(fork.probe_insert(pi, 5.0, 26.0, &ctx), Placement::Inserted));
        assert_eq!(fork.stack(0).map(<[Block]>::len), Some(1));
        assert_eq!(fork.stack(2).map(<[Block]>::len), Some(1));
    }

    #[test]
    fn stack_line_always_accepts() {
        let catalog = fixtures::catalog();
        let geometry = fixtures::geometry();
        let ctx = LayoutContext::new(&geometry, &catalog);

        let mut repeat = Block::from_catalog("repeat", &ctx).unwrap();
        let print = Block::from_catalog("print", &ctx).unwrap();
        // stack line spans y 14..18
        assert!(matches!(
            repeat.probe_insert(print, 20.0, 16.0, &ctx),
            Placement::Inserted
        ));
        assert_eq!(repeat.stack(1).map(<[Block]>::len), Some(1));
        assert_eq!(repeat.size(), Size::new(69.0, 46.0));
    }

    #[test]
    fn remove_detaches_owner_of_field() {
        let catalog = fixtures::catalog();
        let geometry = fixtures::geometry();
        let ctx = LayoutContext::new(&geometry, &catalog);

        let mut repeat = Block::from_catalog("repeat", &ctx).unwrap();
        for _ in 0..3 {
            let print = Block::from_catalog("print", &ctx).unwrap();
            repeat.push_child(1, print, &ctx).unwrap();
        }
        assert_eq!(repeat.height(), 78.0);

        // middle print starts at y 14 + 2 + 16, its field at x 12 + 33
        let removed = repeat.remove_at(12.0 + 40.0, 32.0 + 7.0, &ctx).unwrap();
        assert_eq!(removed.id(), "print");
        assert_eq!(repeat.stack(1).map(<[Block]>::len), Some(2));
        assert_eq!(repeat.height(), 78.0 - 16.0);

        // own body and the gap between children remove nothing
        assert!(repeat.remove_at(5.0, 5.0, &ctx).is_none());
        assert!(repeat.remove_at(20.0, 31.0, &ctx).is_none());
        assert_eq!(repeat.block_count(), 3);
    }

    #[test]
    fn set_value_through_nested_field() {
        let catalog = fixtures::catalog();
        let geometry = fixtures::geometry();
        let ctx = LayoutContext::new(&geometry, &catalog);

        let mut repeat = Block::from_catalog("repeat", &ctx).unwrap();
        let print = Block::from_catalog("print", &ctx).unwrap();
        repeat.push_child(1, print, &ctx).unwrap();

        assert!(repeat.set_value_at("hello", 12.0 + 40.0, 16.0 + 7.0, &ctx));
        let print = repeat.get(&BlockPath::parse("1.0").unwrap()).unwrap();
        assert_eq!(print.column(0, 1).and_then(Column::literal), Some("hello"));
        assert_eq!(repeat.width(), 70.0 + 12.0);

        // the repeat count field: x 38..58 on line 0
        assert!(repeat.set_value_at("3", 45.0, 7.0, &ctx));
        assert_eq!(repeat.column(0, 1).and_then(Column::literal), Some("3"));
        assert!(!repeat.set_value_at("x", 10.0, 7.0, &ctx));
    }
}
