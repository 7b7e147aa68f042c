// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public `Index` API and generic implementation over a pluggable backend.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::backends::flatvec::FlatVec;
use crate::backends::quadtree::QuadTree;
use crate::types::{Aabb2D, Scalar};

/// A generic AABB index parameterized by a spatial backend.
///
/// Entries are addressed by insertion slot. The index has no per-entry
/// removal: call [`IndexGeneric::rebuild`] with the surviving set instead.
#[derive(Debug)]
pub struct IndexGeneric<T: Copy + PartialOrd + Debug, P: Copy + Debug, B: Backend<T, P>> {
    entries: Vec<(Aabb2D<T>, P)>,
    backend: B,
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    P: Copy + Debug,
    B: Backend<T, P> + Default,
{
    /// Create an empty index using the backend's default constructor.
    pub fn new() -> Self {
        Self::with_backend(B::default())
    }
}

impl<T, P, B> IndexGeneric<T, P, B>
where
    T: Copy + PartialOrd + Debug,
    P: Copy + Debug,
    B: Backend<T, P>,
{
    /// Create an empty index around an explicitly configured backend.
    pub fn with_backend(backend: B) -> Self {
        Self {
            entries: Vec::new(),
            backend,
        }
    }

    /// Reserve space for at least `n` entries.
    pub fn reserve(&mut self, n: usize) {
        self.entries.reserve(n);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Access the spatial backend (for statistics and debugging).
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Insert a new AABB with payload. Returns the slot it was stored in.
    pub fn insert(&mut self, aabb: Aabb2D<T>, payload: P) -> usize {
        let slot = self.entries.len();
        self.entries.push((aabb, payload));
        self.backend.insert(slot, aabb);
        slot
    }

    /// Drop every entry and re-index `items` from scratch.
    pub fn rebuild<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = (Aabb2D<T>, P)>,
    {
        self.entries.clear();
        self.entries.extend(items);
        let slots: Vec<(usize, Aabb2D<T>)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(slot, (aabb, _))| (slot, *aabb))
            .collect();
        self.backend.rebuild(&slots);
    }

    /// Clear the index.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.backend.clear();
    }

    /// Stored box and payload for a slot.
    pub fn get(&self, slot: usize) -> Option<&(Aabb2D<T>, P)> {
        self.entries.get(slot)
    }

    /// Query for payloads whose AABB contains the point.
    pub fn query_point(&self, x: T, y: T) -> impl Iterator<Item = P> + '_ {
        self.backend
            .query_point(x, y)
            .filter_map(|slot| self.entries.get(slot).map(|(_, p)| *p))
    }

    /// Query for payloads whose AABB intersects the given rectangle.
    pub fn query_rect(&self, rect: Aabb2D<T>) -> impl Iterator<Item = P> + '_ {
        self.backend
            .query_rect(rect)
            .filter_map(|slot| self.entries.get(slot).map(|(_, p)| *p))
    }
}

/// Default index using a flat vector backend.
pub type Index<T, P> = IndexGeneric<T, P, FlatVec<T, P>>;

impl<T: Copy + PartialOrd + Debug, P: Copy + Debug> Default for Index<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar, P: Copy + Debug> Index<T, P> {
    /// Create a quadtree-backed index.
    ///
    /// Nodes split once they hold more than `max_objects_per_node` boxes, and
    /// stop splitting at `max_depth`.
    pub fn with_quadtree(
        max_objects_per_node: usize,
        max_depth: usize,
    ) -> IndexGeneric<T, P, QuadTree<T, P>> {
        IndexGeneric::with_backend(QuadTree::new(max_objects_per_node, max_depth))
    }
}
