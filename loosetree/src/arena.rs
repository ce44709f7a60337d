// Copyright 2026 the Loosetree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree nodes and the pooled node allocator.

use alloc::vec::Vec;

use crate::bounds::BoundingBox;

/// How many node slots a fresh arena block reserves at once.
const BLOCK_SIZE: usize = 128;

/// One of the four child slots of a node, in traversal order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Quadrant {
    /// Top-left child.
    TopLeft,
    /// Top-right child.
    TopRight,
    /// Bottom-right child.
    BottomRight,
    /// Bottom-left child.
    BottomLeft,
}

impl Quadrant {
    pub(crate) const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
    ];

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomRight => 2,
            Self::BottomLeft => 3,
        }
    }

    /// The quadrant following `self` in traversal order, if any.
    pub(crate) const fn next(self) -> Option<Self> {
        match self {
            Self::TopLeft => Some(Self::TopRight),
            Self::TopRight => Some(Self::BottomRight),
            Self::BottomRight => Some(Self::BottomLeft),
            Self::BottomLeft => None,
        }
    }
}

/// Index of a node inside the arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(u32);

impl NodeIdx {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "node indices are intentionally 32-bit"
    )]
    const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    const fn get(self) -> usize {
        self.0 as usize
    }
}

/// A quadrant cell: four optional children plus the objects placed exactly
/// here. Geometry and ancestry are never stored; both are derived by the
/// traversals from the root extent.
#[derive(Clone, Debug)]
pub(crate) struct TreeNode<T, O> {
    children: [Option<NodeIdx>; 4],
    items: Vec<(O, BoundingBox<T>)>,
}

impl<T, O> TreeNode<T, O> {
    fn empty() -> Self {
        Self {
            children: [None; 4],
            items: Vec::new(),
        }
    }

    #[inline]
    pub(crate) fn child(&self, q: Quadrant) -> Option<NodeIdx> {
        self.children[q.slot()]
    }

    #[inline]
    pub(crate) fn set_child(&mut self, q: Quadrant, child: Option<NodeIdx>) {
        self.children[q.slot()] = child;
    }

    #[inline]
    pub(crate) fn items(&self) -> &[(O, BoundingBox<T>)] {
        &self.items
    }

    #[inline]
    pub(crate) fn push_item(&mut self, object: O, bounds: BoundingBox<T>) {
        self.items.push((object, bounds));
    }

    /// Whether this node holds no content and owns no children.
    pub(crate) fn is_reclaimable(&self) -> bool {
        self.items.is_empty() && self.children.iter().all(Option::is_none)
    }

    /// The sole occupied child slot, if exactly one is occupied.
    pub(crate) fn only_child(&self) -> Option<Quadrant> {
        let mut found = None;
        for q in Quadrant::ALL {
            if self.children[q.slot()].is_some() {
                if found.is_some() {
                    return None;
                }
                found = Some(q);
            }
        }
        found
    }
}

impl<T, O: PartialEq> TreeNode<T, O> {
    /// Remove `object` from the local list; order is irrelevant, so the
    /// last item swaps into the hole.
    pub(crate) fn remove_item(&mut self, object: &O) -> bool {
        if let Some(pos) = self.items.iter().position(|(o, _)| o == object) {
            self.items.swap_remove(pos);
            true
        } else {
            false
        }
    }
}

/// Pooled allocator for tree nodes.
///
/// Owns all node storage. `alloc` prefers recycled slots; when the free
/// list is exhausted it reserves a whole block of capacity at once. Nodes
/// go back to the general allocator only when the arena itself is dropped.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<T, O> {
    nodes: Vec<TreeNode<T, O>>,
    free_list: Vec<NodeIdx>,
}

impl<T, O> NodeArena<T, O> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Hand out an empty node, recycling before carving new storage.
    pub(crate) fn alloc(&mut self) -> NodeIdx {
        if let Some(idx) = self.free_list.pop() {
            debug_assert!(self.nodes[idx.get()].is_reclaimable());
            return idx;
        }
        if self.nodes.len() == self.nodes.capacity() {
            self.nodes.reserve(BLOCK_SIZE);
        }
        let idx = NodeIdx::new(self.nodes.len());
        self.nodes.push(TreeNode::empty());
        idx
    }

    /// Return a node to the free pool. The caller must have unlinked it
    /// from every ownership slot and traversal first.
    pub(crate) fn recycle(&mut self, idx: NodeIdx) {
        let node = &mut self.nodes[idx.get()];
        node.children = [None; 4];
        node.items.clear();
        self.free_list.push(idx);
    }

    /// Drop all nodes, keeping the allocated capacity for reuse.
    pub(crate) fn reset(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
    }

    #[inline]
    pub(crate) fn node(&self, idx: NodeIdx) -> &TreeNode<T, O> {
        &self.nodes[idx.get()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, idx: NodeIdx) -> &mut TreeNode<T, O> {
        &mut self.nodes[idx.get()]
    }

    #[cfg(test)]
    pub(crate) fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }
}
