// Copyright 2026 the Loosetree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The loose quadtree container: placement, root growth, removal, update,
//! and lazy structural cleanup.

use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::arena::{NodeArena, NodeIdx, Quadrant};
use crate::bounds::{BoundingBox, Coord, le, lt};
use crate::query::{QueryKind, RegionQuery};
use crate::traversal::{Cursor, Descent, split};

/// Placement never descends past this depth.
///
/// A backstop for degenerate boxes (zero extent, or floats so small the
/// split can subdivide indefinitely); real workloads stop far shallower
/// because the loose-containment test fails first.
const MAX_DEPTH: usize = 64;

/// Reads an object's current bounding box.
///
/// Extraction must be deterministic and side-effect-free, and must reflect
/// the object's box at the time of each [`LooseQuadtree::insert`] or
/// [`LooseQuadtree::update`] call. The tree records the extracted box and
/// never re-reads it between calls, so callers that mutate an object's box
/// must call `update` for the change to become visible.
///
/// Blanket-implemented for closures, which covers the common case:
///
/// ```
/// use loosetree::{BoundingBox, LooseQuadtree};
///
/// let boxes = [BoundingBox::new(0.0_f32, 0.0, 10.0, 10.0)];
/// let mut tree = LooseQuadtree::new(|id: &usize| boxes[*id]);
/// tree.insert(0);
/// ```
pub trait BoundsExtractor<T, O> {
    /// The object's current bounding box.
    fn bounds(&self, object: &O) -> BoundingBox<T>;
}

impl<T, O, F> BoundsExtractor<T, O> for F
where
    F: Fn(&O) -> BoundingBox<T>,
{
    #[inline]
    fn bounds(&self, object: &O) -> BoundingBox<T> {
        self(object)
    }
}

/// A loose quadtree over objects of type `O` with `T`-valued coordinates.
///
/// Objects are caller-stable handles (`Copy + Eq + Hash`); the tree never
/// looks inside them except through the [`BoundsExtractor`]. Each stored
/// object lives in exactly one node's local list, at the depth its size
/// permits: descent continues only while a child cell's loose region (the
/// tight cell doubled in extent around its center) still fully contains the
/// object's box. The root extent grows by doubling whenever an inserted box
/// falls outside it.
///
/// Mutation while a [`RegionQuery`] from this tree is alive is rejected at
/// compile time, since the query borrows the tree for its whole lifetime.
///
/// Single-threaded; wrap in external synchronization to share across
/// threads.
pub struct LooseQuadtree<T, O, E> {
    arena: NodeArena<T, O>,
    root: Option<NodeIdx>,
    root_bounds: BoundingBox<T>,
    owners: HashMap<O, NodeIdx>,
    len: usize,
    extractor: E,
}

impl<T: Debug, O: Debug, E> Debug for LooseQuadtree<T, O, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LooseQuadtree")
            .field("root", &self.root)
            .field("root_bounds", &self.root_bounds)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl<T, O, E> LooseQuadtree<T, O, E>
where
    T: Coord,
    O: Copy + Eq + Hash,
    E: BoundsExtractor<T, O>,
{
    /// Create an empty tree that reads object boxes through `extractor`.
    pub fn new(extractor: E) -> Self {
        Self {
            arena: NodeArena::new(),
            root: None,
            root_bounds: BoundingBox::new(T::zero(), T::zero(), T::zero(), T::zero()),
            owners: HashMap::new(),
            len: 0,
            extractor,
        }
    }

    /// Number of stored objects.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree stores no objects.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether `object` is currently stored.
    #[inline]
    pub fn contains(&self, object: &O) -> bool {
        self.owners.contains_key(object)
    }

    /// The root's current extent, or `None` while the tree is empty.
    ///
    /// The extent covers every stored object's box as of its last insert or
    /// update. It intersects each stored box but, thanks to the initial
    /// margin and loose slack, is never contained by any single one.
    pub fn loose_bounds(&self) -> Option<BoundingBox<T>> {
        if self.is_empty() {
            None
        } else {
            Some(self.root_bounds)
        }
    }

    /// Insert `object` at the depth its current box permits.
    ///
    /// Returns `false` without touching anything if the object is already
    /// present. Grows the root extent first when the box falls outside it.
    pub fn insert(&mut self, object: O) -> bool {
        if self.owners.contains_key(&object) {
            return false;
        }
        let bounds = self.extractor.bounds(&object);
        self.place(object, bounds);
        true
    }

    /// Remove `object`. Returns `false` if it was not stored.
    ///
    /// Removal is constant-time via the owner map and never restructures
    /// the tree; emptied nodes linger until [`Self::force_cleanup`].
    pub fn remove(&mut self, object: &O) -> bool {
        let Some(node) = self.owners.remove(object) else {
            return false;
        };
        let removed = self.arena.node_mut(node).remove_item(object);
        debug_assert!(removed, "owner map entry without a matching node item");
        self.len -= 1;
        true
    }

    /// Re-place `object` according to its current box.
    ///
    /// Equivalent to [`Self::remove`] followed by [`Self::insert`]: an
    /// absent object is simply inserted. Callers must call this after
    /// mutating an object's box, since the tree records the box at
    /// insertion and never re-extracts it on its own.
    pub fn update(&mut self, object: O) {
        self.remove(&object);
        let bounds = self.extractor.bounds(&object);
        self.place(object, bounds);
    }

    /// Drop every object, keeping allocated node capacity for reuse.
    pub fn clear(&mut self) {
        self.arena.reset();
        self.root = None;
        self.owners.clear();
        self.len = 0;
    }

    /// Reclaim empty nodes and shrink the root where possible.
    ///
    /// Walks the tree bottom-up, recycling every node with no items and no
    /// children into the arena's free pool, then collapses the root into
    /// its only occupied quadrant while it holds no items itself. Purely a
    /// memory-residency operation: membership, size, and all query results
    /// are identical whether or not this is ever called.
    pub fn force_cleanup(&mut self) {
        let Some(root) = self.root else {
            return;
        };
        let mut cursor = Cursor::new();
        cursor.start_at(root, self.root_bounds);
        'walk: loop {
            // Find the next occupied child past the current position.
            let mut next = match cursor.position() {
                None => Some(Quadrant::TopLeft),
                Some(p) => p.next(),
            };
            while let Some(q) = next {
                if self.arena.node(cursor.node()).child(q).is_some() {
                    cursor.go(&self.arena, q);
                    continue 'walk;
                }
                cursor.skip_child(q);
                next = q.next();
            }
            // Children exhausted: the subtree below is fully processed.
            let finished = cursor.node();
            if !cursor.go_up() {
                break;
            }
            if self.arena.node(finished).is_reclaimable() {
                let slot = cursor.position().expect("departed child has a position");
                self.arena.node_mut(cursor.node()).set_child(slot, None);
                self.arena.recycle(finished);
            }
        }
        self.collapse_root();
    }

    /// All stored objects whose box has interior overlap with `region`.
    ///
    /// Edge-to-edge touching does not count as overlap.
    pub fn query_intersects(&self, region: BoundingBox<T>) -> RegionQuery<'_, T, O> {
        RegionQuery::new(
            &self.arena,
            self.root,
            self.root_bounds,
            region,
            QueryKind::Intersects,
        )
    }

    /// All stored objects whose box lies fully inside `region`.
    pub fn query_inside(&self, region: BoundingBox<T>) -> RegionQuery<'_, T, O> {
        RegionQuery::new(
            &self.arena,
            self.root,
            self.root_bounds,
            region,
            QueryKind::Inside,
        )
    }

    /// All stored objects whose box fully contains `region`.
    pub fn query_contains(&self, region: BoundingBox<T>) -> RegionQuery<'_, T, O> {
        RegionQuery::new(
            &self.arena,
            self.root,
            self.root_bounds,
            region,
            QueryKind::Contains,
        )
    }

    /// Store `object` with `bounds` at the deepest node whose loose region
    /// still fully contains the box. The object must not be present.
    fn place(&mut self, object: O, bounds: BoundingBox<T>) {
        debug_assert!(
            le(T::zero(), bounds.width) && le(T::zero(), bounds.height),
            "bounding boxes must have non-negative extent"
        );
        if self.root.is_none() {
            // Double the first box's extent so the root starts strictly
            // larger than its first object; a minimum of one unit keeps
            // degenerate boxes from producing a zero-extent root.
            let w = if lt(bounds.width, T::one()) {
                T::one()
            } else {
                bounds.width
            };
            let h = if lt(bounds.height, T::one()) {
                T::one()
            } else {
                bounds.height
            };
            self.root_bounds = BoundingBox::new(bounds.left, bounds.top, T::dbl(w), T::dbl(h));
            self.root = Some(self.arena.alloc());
        }
        self.grow_to_cover(&bounds);

        let root = self.root.expect("root exists during placement");
        let mut walk = Descent::start_at(root, self.root_bounds);
        while walk.depth() < MAX_DEPTH {
            let region = *walk.bounds();
            let q = center_quadrant(&region, &bounds);
            let child_region = split(&region, q);
            // A degenerate split that makes no progress would loop forever.
            if child_region == region {
                break;
            }
            if !child_region.loose().contains(&bounds) {
                break;
            }
            if self.arena.node(walk.node()).child(q).is_none() {
                let child = self.arena.alloc();
                self.arena.node_mut(walk.node()).set_child(q, Some(child));
            }
            walk.go(&self.arena, q);
        }
        let node = walk.node();
        self.arena.node_mut(node).push_item(object, bounds);
        self.owners.insert(object, node);
        self.len += 1;
    }

    /// Double the root extent until it contains `bounds`, each step wrapping
    /// the old root as the quadrant that keeps its absolute region.
    ///
    /// Extends leftward/upward exactly when the box lies left of/above the
    /// current extent. Growth must stay exact for the old root's quadrant to
    /// keep its absolute region; saturating integer arithmetic breaks that
    /// near the scalar's range ends, so callers on unsigned scalars must
    /// keep coordinates far enough from zero for leftward/upward growth to
    /// subtract cleanly. Debug builds assert on saturated growth.
    fn grow_to_cover(&mut self, bounds: &BoundingBox<T>) {
        while !self.root_bounds.contains(bounds) {
            let old = self.root_bounds;
            let grow_left = lt(bounds.left, old.left);
            let grow_up = lt(bounds.top, old.top);
            let left = if grow_left {
                T::sub(old.left, old.width)
            } else {
                old.left
            };
            let top = if grow_up {
                T::sub(old.top, old.height)
            } else {
                old.top
            };
            if grow_left {
                debug_assert!(
                    T::add(left, old.width) == old.left,
                    "leftward root growth did not preserve the old extent exactly"
                );
            }
            if grow_up {
                debug_assert!(
                    T::add(top, old.height) == old.top,
                    "upward root growth did not preserve the old extent exactly"
                );
            }
            let grown = BoundingBox::new(left, top, T::dbl(old.width), T::dbl(old.height));
            if grown == old {
                // Fully saturated; guard against looping forever.
                return;
            }
            // The old root's region is the half the new extent did not
            // grow into, on each axis.
            let quadrant = match (grow_left, grow_up) {
                (false, false) => Quadrant::TopLeft,
                (true, false) => Quadrant::TopRight,
                (false, true) => Quadrant::BottomLeft,
                (true, true) => Quadrant::BottomRight,
            };
            let new_root = self.arena.alloc();
            self.arena.node_mut(new_root).set_child(quadrant, self.root);
            self.root = Some(new_root);
            self.root_bounds = grown;
        }
    }

    /// Recycle the root while it has no items and at most one child.
    fn collapse_root(&mut self) {
        while let Some(root) = self.root {
            let node = self.arena.node(root);
            if node.is_reclaimable() {
                self.arena.recycle(root);
                self.root = None;
                return;
            }
            if !node.items().is_empty() {
                return;
            }
            let Some(q) = node.only_child() else {
                return;
            };
            let child = node.child(q).expect("only_child reported an occupied slot");
            self.root_bounds = split(&self.root_bounds, q);
            self.arena.node_mut(root).set_child(q, None);
            self.arena.recycle(root);
            self.root = Some(child);
        }
    }

    #[cfg(test)]
    pub(crate) fn live_nodes(&self) -> usize {
        self.arena.live_nodes()
    }
}

/// The child quadrant whose tight cell holds the center of `bounds`.
fn center_quadrant<T: Coord>(region: &BoundingBox<T>, bounds: &BoundingBox<T>) -> Quadrant {
    let cx = T::add(bounds.left, T::half(bounds.width));
    let cy = T::add(bounds.top, T::half(bounds.height));
    let mid_x = T::add(region.left, T::half(region.width));
    let mid_y = T::add(region.top, T::half(region.height));
    match (lt(cx, mid_x), lt(cy, mid_y)) {
        (true, true) => Quadrant::TopLeft,
        (false, true) => Quadrant::TopRight,
        (true, false) => Quadrant::BottomLeft,
        (false, false) => Quadrant::BottomRight,
    }
}
