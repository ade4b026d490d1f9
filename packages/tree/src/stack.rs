//! Vertical stacks of blocks.
//!
//! Stack lines and the document root share these routines. Coordinates are
//! relative to the stack origin: the top-left corner of its first block.

use crate::block::Block;
use crate::edit::Placement;
use crate::geometry::{Geometry, LayoutContext, Size};
use crate::hit::Hit;

/// Widest child by summed heights plus `gap` between neighbours.
///
/// An empty stack has zero extent.
pub(crate) fn extent(children: &[Block], gap: f32) -> Size {
    if children.is_empty() {
        return Size::default();
    }
    let width = children.iter().map(Block::width).fold(0.0, f32::max);
    let height = children.iter().map(Block::height).sum::<f32>()
        + gap * (children.len() - 1) as f32;
    Size::new(width, height)
}

/// Top edge of each child.
pub(crate) fn offsets(children: &[Block], gap: f32) -> Vec<f32> {
    let mut top = 0.0;
    children
        .iter()
        .map(|child| {
            let offset = top;
            top += child.height() + gap;
            offset
        })
        .collect()
}

/// The child under `(x, y)` and the hit inside it.
///
/// Gaps between children and the space right of a narrower child hit
/// nothing.
pub(crate) fn hit(children: &[Block], x: f32, y: f32, geometry: &Geometry) -> Option<(usize, Hit)> {
    if x < 0.0 || y < 0.0 {
        return None;
    }

    let gap = geometry.config().element_padding_vertical;
    let mut bottom = 0.0;
    for (index, child) in children.iter().enumerate() {
        let top = bottom;
        bottom += child.height();
        if y <= bottom {
            if x > child.width() {
                return None;
            }
            return child.hit_test(x, y - top, geometry).map(|hit| (index, hit));
        }
        bottom += gap;
        if y <= bottom {
            return None;
        }
    }
    None
}

/// Drop `block` into the stack. Always succeeds.
///
/// Each child is offered the block in turn; a child reporting "above"
/// gets it inserted before it, a nested acceptance ends the walk, and a
/// block that falls below every child is appended.
pub(crate) fn insert(children: &mut Vec<Block>, block: Block, x: f32, y: f32, ctx: &LayoutContext) {
    let gap = ctx.config().element_padding_vertical;
    let mut block = block;
    let mut top = 0.0;

    for index in 0..children.len() {
        match children[index].probe_insert(block, x, y - top, ctx) {
            Placement::Above(returned) => {
                children.insert(index, returned);
                return;
            }
            Placement::Inserted => return,
            Placement::Below(returned) => block = returned,
        }
        top += children[index].height() + gap;
    }

    children.push(block);
}
