// Copyright 2026 the Loosetree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazy region queries over the tree.

use crate::arena::{NodeArena, NodeIdx, Quadrant};
use crate::bounds::{BoundingBox, Coord, lt};
use crate::traversal::{Cursor, split};

/// Which predicate a query matches objects against.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum QueryKind {
    /// Object box and query region have interior overlap.
    Intersects,
    /// Object box lies fully inside the query region.
    Inside,
    /// Object box fully contains the query region.
    Contains,
}

impl QueryKind {
    fn matches<T: Coord>(self, object: &BoundingBox<T>, region: &BoundingBox<T>) -> bool {
        match self {
            Self::Intersects => object.intersects(region),
            Self::Inside => region.contains(object),
            Self::Contains => object.contains(region),
        }
    }

    /// Whether a subtree whose tight cell is `cell` can hold any match.
    ///
    /// Every object at or below a node has its box contained in that node's
    /// loose region, so a loose region disjoint from the query rules the
    /// whole subtree out. For the contains predicate, a loose region
    /// narrower or shorter than the query also rules it out: placement
    /// stores objects no larger than the loose region that admitted them,
    /// and regions only shrink with depth.
    fn enters<T: Coord>(self, cell: &BoundingBox<T>, region: &BoundingBox<T>) -> bool {
        let loose = cell.loose();
        match self {
            Self::Intersects | Self::Inside => loose.intersects(region),
            Self::Contains => {
                loose.intersects(region)
                    && !lt(loose.width, region.width)
                    && !lt(loose.height, region.height)
            }
        }
    }
}

/// Lazy depth-first iterator over the objects matching a region query.
///
/// Created by [`LooseQuadtree::query_intersects`], [`query_inside`], and
/// [`query_contains`]. Yields matches in traversal order, pruning every
/// subtree whose loose region cannot hold one. Borrows the tree immutably,
/// so the tree cannot be mutated until the query is dropped or drained.
///
/// [`LooseQuadtree::query_intersects`]: crate::LooseQuadtree::query_intersects
/// [`query_inside`]: crate::LooseQuadtree::query_inside
/// [`query_contains`]: crate::LooseQuadtree::query_contains
#[derive(Debug)]
pub struct RegionQuery<'a, T, O> {
    arena: &'a NodeArena<T, O>,
    region: BoundingBox<T>,
    kind: QueryKind,
    cursor: Cursor<T>,
    /// Index of the next untested item at the current node; meaningful only
    /// while the cursor has not yet descended from that node.
    item: usize,
}

impl<'a, T: Coord, O: Copy> RegionQuery<'a, T, O> {
    pub(crate) fn new(
        arena: &'a NodeArena<T, O>,
        root: Option<NodeIdx>,
        root_bounds: BoundingBox<T>,
        region: BoundingBox<T>,
        kind: QueryKind,
    ) -> Self {
        let mut cursor = Cursor::new();
        if let Some(root) = root {
            cursor.start_at(root, root_bounds);
        }
        Self {
            arena,
            region,
            kind,
            cursor,
            item: 0,
        }
    }
}

impl<T: Coord, O: Copy> Iterator for RegionQuery<'_, T, O> {
    type Item = O;

    fn next(&mut self) -> Option<O> {
        while !self.cursor.is_finished() {
            let node = self.arena.node(self.cursor.node());
            // Local items are tested only on first arrival; once descent
            // starts the position marker is set and they are done.
            if self.cursor.position().is_none() {
                while let Some((object, bounds)) = node.items().get(self.item) {
                    self.item += 1;
                    if self.kind.matches(bounds, &self.region) {
                        return Some(*object);
                    }
                }
            }
            // Descend into the next occupied child that survives pruning.
            let cell = *self.cursor.bounds();
            let mut next = match self.cursor.position() {
                None => Some(Quadrant::TopLeft),
                Some(p) => p.next(),
            };
            let mut descended = false;
            while let Some(q) = next {
                if node.child(q).is_some() && self.kind.enters(&split(&cell, q), &self.region) {
                    self.cursor.go(self.arena, q);
                    self.item = 0;
                    descended = true;
                    break;
                }
                self.cursor.skip_child(q);
                next = q.next();
            }
            if descended {
                continue;
            }
            if !self.cursor.go_up() {
                self.cursor.finish();
            }
        }
        None
    }
}
