// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region quadtree backend generic over scalar `T: Scalar`.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::{Aabb2D, Scalar};

/// Default number of boxes a node holds before it splits.
pub const DEFAULT_MAX_OBJECTS: usize = 8;

/// Default depth below which nodes stop splitting.
pub const DEFAULT_MAX_DEPTH: usize = 12;

/// Quadtree backend.
///
/// The root region is seeded from the union of all well-formed boxes on
/// [`Backend::rebuild`]. Boxes inserted later that fall outside it, and boxes
/// with NaN or inverted coordinates, are kept at the root; the root's own
/// entries are tested on every query, so nothing is ever lost, only tested
/// less efficiently until the next rebuild.
pub struct QuadTree<T: Scalar, P: Copy + Debug> {
    max_objects: usize,
    max_depth: usize,
    arena: Vec<QNode<T>>,
    len: usize,
    _p: core::marker::PhantomData<P>,
}

struct QNode<T: Scalar> {
    bounds: Aabb2D<T>,
    depth: usize,
    items: Vec<(usize, Aabb2D<T>)>,
    children: Option<[NodeIdx; 4]>,
}

impl<T: Scalar> QNode<T> {
    fn new(bounds: Aabb2D<T>, depth: usize) -> Self {
        Self {
            bounds,
            depth,
            items: Vec::new(),
            children: None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeIdx(usize);

impl NodeIdx {
    const ROOT: Self = Self(0);

    const fn new(i: usize) -> Self {
        Self(i)
    }

    const fn get(self) -> usize {
        self.0
    }
}

impl<T: Scalar, P: Copy + Debug> Default for QuadTree<T, P> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_OBJECTS, DEFAULT_MAX_DEPTH)
    }
}

impl<T: Scalar, P: Copy + Debug> QuadTree<T, P> {
    /// Create an empty quadtree with a per-node capacity and a depth limit.
    ///
    /// A capacity of zero is treated as one.
    pub fn new(max_objects_per_node: usize, max_depth: usize) -> Self {
        Self {
            max_objects: max_objects_per_node.max(1),
            max_depth,
            arena: Vec::new(),
            len: 0,
            _p: core::marker::PhantomData,
        }
    }

    /// Number of stored boxes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Depth of the deepest node (the root is depth 0).
    pub fn depth(&self) -> usize {
        self.arena.iter().map(|n| n.depth).max().unwrap_or(0)
    }

    /// Region covered by the root node, if any box was ever inserted.
    pub fn region(&self) -> Option<Aabb2D<T>> {
        self.arena.first().map(|n| n.bounds)
    }

    fn seed_root(&mut self, region: Aabb2D<T>) {
        debug_assert!(self.arena.is_empty(), "root seeded twice");
        self.arena.push(QNode::new(region, 0));
    }

    fn insert_from(&mut self, start: NodeIdx, slot: usize, aabb: Aabb2D<T>) {
        let mut at = start;
        loop {
            if let Some(children) = self.arena[at.get()].children {
                if let Some(&child) = children
                    .iter()
                    .find(|c| self.arena[c.get()].bounds.contains(&aabb))
                {
                    at = child;
                    continue;
                }
                // Straddles a split line (or lies outside the region): stays here.
                self.arena[at.get()].items.push((slot, aabb));
                return;
            }
            let node = &mut self.arena[at.get()];
            node.items.push((slot, aabb));
            let overflow = node.items.len() > self.max_objects && node.depth < self.max_depth;
            if overflow {
                self.split(at);
            }
            return;
        }
    }

    fn split(&mut self, at: NodeIdx) {
        let (bounds, depth) = {
            let n = &self.arena[at.get()];
            (n.bounds, n.depth)
        };
        let base = self.arena.len();
        for quadrant in bounds.quadrants() {
            self.arena.push(QNode::new(quadrant, depth + 1));
        }
        self.arena[at.get()].children = Some([
            NodeIdx::new(base),
            NodeIdx::new(base + 1),
            NodeIdx::new(base + 2),
            NodeIdx::new(base + 3),
        ]);
        let items = core::mem::take(&mut self.arena[at.get()].items);
        for (slot, aabb) in items {
            self.insert_from(at, slot, aabb);
        }
    }

    fn collect<F, G>(&self, keep_node: F, keep_item: G) -> Vec<usize>
    where
        F: Fn(&Aabb2D<T>) -> bool,
        G: Fn(&Aabb2D<T>) -> bool,
    {
        let mut out = Vec::new();
        if self.arena.is_empty() {
            return out;
        }
        // The root is always visited: it may hold boxes outside its own region.
        let mut stack = vec![NodeIdx::ROOT];
        while let Some(at) = stack.pop() {
            let node = &self.arena[at.get()];
            out.extend(
                node.items
                    .iter()
                    .filter(|(_, a)| keep_item(a))
                    .map(|(slot, _)| *slot),
            );
            if let Some(children) = node.children {
                stack.extend(
                    children
                        .iter()
                        .copied()
                        .filter(|c| keep_node(&self.arena[c.get()].bounds)),
                );
            }
        }
        out
    }
}

impl<T: Scalar, P: Copy + Debug> Backend<T, P> for QuadTree<T, P> {
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>) {
        if self.arena.is_empty() {
            let region = if aabb.is_well_formed() {
                aabb
            } else {
                Aabb2D::new(T::zero(), T::zero(), T::zero(), T::zero())
            };
            self.seed_root(region);
        }
        self.insert_from(NodeIdx::ROOT, slot, aabb);
        self.len += 1;
    }

    fn clear(&mut self) {
        self.arena.clear();
        self.len = 0;
    }

    fn rebuild(&mut self, items: &[(usize, Aabb2D<T>)]) {
        self.clear();
        let region = items
            .iter()
            .map(|(_, a)| *a)
            .filter(Aabb2D::is_well_formed)
            .reduce(|acc, a| acc.union(&a));
        if let Some(region) = region {
            self.seed_root(region);
        }
        for &(slot, aabb) in items {
            self.insert(slot, aabb);
        }
    }

    fn query_point<'a>(&'a self, x: T, y: T) -> Box<dyn Iterator<Item = usize> + 'a> {
        let hits = self.collect(|b| b.contains_point(x, y), |a| a.contains_point(x, y));
        Box::new(hits.into_iter())
    }

    fn query_rect<'a>(&'a self, rect: Aabb2D<T>) -> Box<dyn Iterator<Item = usize> + 'a> {
        let hits = self.collect(|b| b.intersects(&rect), |a| a.intersects(&rect));
        Box::new(hits.into_iter())
    }
}

impl<T: Scalar, P: Copy + Debug> Debug for QuadTree<T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("QuadTree")
            .field("max_objects", &self.max_objects)
            .field("max_depth", &self.max_depth)
            .field("len", &self.len)
            .field("nodes", &self.arena.len())
            .field("region", &self.region())
            .finish_non_exhaustive()
    }
}
