// Copyright 2026 the Loosetree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversals: descend-only placement walks and the bidirectional
//! cursor used by queries and cleanup.
//!
//! Nodes store no parent links and no geometry. A traversal carries the
//! region of the node it stands on and recomputes child regions on the way
//! down; the cursor additionally keeps the ancestor stack so it can climb
//! back up and resume depth-first iteration at the next sibling.

use alloc::vec::Vec;

use crate::arena::{NodeArena, NodeIdx, Quadrant};
use crate::bounds::{BoundingBox, Coord};

/// The region of `bounds`' child quadrant `q`.
///
/// The split is exact for any width/height: the left column and top row get
/// the truncated halves, the right column and bottom row the remainders, so
/// `tl.width + tr.width == width` and `tl.height + bl.height == height`.
pub(crate) fn split<T: Coord>(bounds: &BoundingBox<T>, q: Quadrant) -> BoundingBox<T> {
    let left_w = T::half(bounds.width);
    let top_h = T::half(bounds.height);
    let right_w = T::sub(bounds.width, left_w);
    let bottom_h = T::sub(bounds.height, top_h);
    let mid_x = T::add(bounds.left, left_w);
    let mid_y = T::add(bounds.top, top_h);
    match q {
        Quadrant::TopLeft => BoundingBox::new(bounds.left, bounds.top, left_w, top_h),
        Quadrant::TopRight => BoundingBox::new(mid_x, bounds.top, right_w, top_h),
        Quadrant::BottomRight => BoundingBox::new(mid_x, mid_y, right_w, bottom_h),
        Quadrant::BottomLeft => BoundingBox::new(bounds.left, mid_y, left_w, bottom_h),
    }
}

/// Descend-only traversal state: where we are, what region that is, and how
/// deep. Drives placement decisions during insertion.
#[derive(Clone, Debug)]
pub(crate) struct Descent<T> {
    node: NodeIdx,
    bounds: BoundingBox<T>,
    depth: usize,
}

impl<T: Coord> Descent<T> {
    pub(crate) fn start_at(node: NodeIdx, bounds: BoundingBox<T>) -> Self {
        Self {
            node,
            bounds,
            depth: 0,
        }
    }

    #[inline]
    pub(crate) fn node(&self) -> NodeIdx {
        self.node
    }

    #[inline]
    pub(crate) fn bounds(&self) -> &BoundingBox<T> {
        &self.bounds
    }

    #[inline]
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    /// Move one level down into `q`. The slot must be occupied.
    pub(crate) fn go<O>(&mut self, arena: &NodeArena<T, O>, q: Quadrant) {
        let child = arena
            .node(self.node)
            .child(q)
            .expect("descending into an empty child slot");
        self.bounds = split(&self.bounds, q);
        self.node = child;
        self.depth += 1;
    }
}

#[derive(Clone, Debug)]
struct Level<T> {
    node: NodeIdx,
    bounds: BoundingBox<T>,
    /// The child slot this level is positioned at: the quadrant most
    /// recently entered or skipped, or `None` when no child has been
    /// visited yet.
    position: Option<Quadrant>,
}

/// Bidirectional traversal. Ancestry lives only in this stack; climbing
/// back up restores the parent level with its position marker pointing at
/// the quadrant just departed, so depth-first iteration can resume at the
/// next sibling without parent pointers on nodes.
#[derive(Clone, Debug)]
pub(crate) struct Cursor<T> {
    stack: Vec<Level<T>>,
}

impl<T: Coord> Cursor<T> {
    pub(crate) fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub(crate) fn start_at(&mut self, node: NodeIdx, bounds: BoundingBox<T>) {
        self.stack.clear();
        self.stack.push(Level {
            node,
            bounds,
            position: None,
        });
    }

    #[inline]
    pub(crate) fn is_finished(&self) -> bool {
        self.stack.is_empty()
    }

    /// Drop the whole stack; the traversal becomes finished.
    pub(crate) fn finish(&mut self) {
        self.stack.clear();
    }

    fn level(&self) -> &Level<T> {
        self.stack.last().expect("cursor used after finishing")
    }

    #[inline]
    pub(crate) fn node(&self) -> NodeIdx {
        self.level().node
    }

    #[inline]
    pub(crate) fn bounds(&self) -> &BoundingBox<T> {
        &self.level().bounds
    }

    #[inline]
    pub(crate) fn depth(&self) -> usize {
        self.stack.len() - 1
    }

    /// The child slot the current level is positioned at.
    #[inline]
    pub(crate) fn position(&self) -> Option<Quadrant> {
        self.level().position
    }

    /// Descend into `q`, marking it as the current level's position. The
    /// slot must be occupied.
    pub(crate) fn go<O>(&mut self, arena: &NodeArena<T, O>, q: Quadrant) {
        let level = self.stack.last_mut().expect("cursor used after finishing");
        level.position = Some(q);
        let child = arena
            .node(level.node)
            .child(q)
            .expect("descending into an empty child slot");
        let bounds = split(&level.bounds, q);
        self.stack.push(Level {
            node: child,
            bounds,
            position: None,
        });
    }

    /// Mark `q` as departed without descending (a pruned or empty slot).
    pub(crate) fn skip_child(&mut self, q: Quadrant) {
        let level = self.stack.last_mut().expect("cursor used after finishing");
        level.position = Some(q);
    }

    /// Climb to the parent level. Returns `false` when already at the
    /// start node; the position marker of the restored level names the
    /// quadrant just departed.
    pub(crate) fn go_up(&mut self) -> bool {
        if self.stack.len() <= 1 {
            return false;
        }
        self.stack.pop();
        true
    }
}
