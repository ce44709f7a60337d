// Copyright 2026 the Loosetree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loosetree: a loose quadtree spatial index.
//!
//! A loose quadtree stores axis-aligned bounding boxes and answers region
//! queries (intersects / fully-inside / fully-contains) over dynamic sets of
//! moving objects: collision broad-phases, viewport culling, any lookup by
//! spatial region that should beat a linear scan.
//!
//! - Insert, update, and remove objects identified by caller-stable handles;
//!   boxes are read through a [`BoundsExtractor`] (usually a closure).
//! - Each node's *loose* region is its cell doubled in extent, so objects
//!   keep their node across small movements instead of bouncing to an
//!   ancestor.
//! - The root extent grows by doubling to cover whatever is inserted, and
//!   [`LooseQuadtree::force_cleanup`] shrinks the structure back; cleanup is
//!   purely about memory residency and never changes query results.
//!
//! It is generic over the scalar type `T` and does not depend on any
//! geometry crate. Integer scalars (signed and unsigned) and floats are
//! supported uniformly; see [`Coord`].
//!
//! # Example
//!
//! ```rust
//! use loosetree::{BoundingBox, LooseQuadtree};
//!
//! let boxes = [
//!     BoundingBox::new(10.0_f32, 10.0, 4.0, 4.0),
//!     BoundingBox::new(50.0, 50.0, 2.0, 2.0),
//! ];
//! let mut tree = LooseQuadtree::new(|id: &usize| boxes[*id]);
//! tree.insert(0);
//! tree.insert(1);
//!
//! let hits: Vec<usize> = tree
//!     .query_intersects(BoundingBox::new(8.0, 8.0, 8.0, 8.0))
//!     .collect();
//! assert_eq!(hits, vec![0]);
//! ```
//!
//! Queries are lazy iterators borrowing the tree, so the borrow checker
//! rejects mutation while one is alive; drain or drop a query before
//! inserting, removing, or updating.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates. Debug builds
//! may assert.

#![no_std]

extern crate alloc;

mod arena;
mod bounds;
mod query;
mod traversal;
mod tree;

pub use bounds::{BoundingBox, Coord};
pub use query::RegionQuery;
pub use tree::{BoundsExtractor, LooseQuadtree};

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn insert_update_query_and_remove() {
        let boxes = [
            BoundingBox::new(0_i64, 0, 10, 10),
            BoundingBox::new(100, 100, 10, 10),
        ];
        let mut tree = LooseQuadtree::new(move |id: &usize| boxes[*id]);
        assert!(tree.insert(0));
        assert!(tree.insert(1));
        assert_eq!(tree.len(), 2);

        let hits: Vec<usize> = tree.query_intersects(BoundingBox::new(-1, -1, 3, 3)).collect();
        assert_eq!(hits, [0]);
        let inside: Vec<usize> = tree.query_inside(BoundingBox::new(99, 99, 12, 12)).collect();
        assert_eq!(inside, [1]);

        assert!(tree.remove(&0));
        tree.force_cleanup();
        assert_eq!(tree.len(), 1);
        assert!(tree.contains(&1));
    }
}
