// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial indexing implementations.

use alloc::boxed::Box;

use crate::types::Aabb2D;
use core::fmt::Debug;

/// Spatial backend abstraction used by `IndexGeneric`.
///
/// Backends only see slot numbers; payloads live in the front end. There is no
/// per-slot removal: a stale slot disappears on the next [`Backend::rebuild`].
pub trait Backend<T: Copy + PartialOrd + Debug, P: Copy + Debug> {
    /// Insert a new slot into the spatial structure.
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>);

    /// Clear all spatial structures.
    fn clear(&mut self);

    /// Replace the whole contents with `items`.
    ///
    /// The default clears and inserts one by one; backends that benefit from
    /// seeing the full set up front (to size their root region) override it.
    fn rebuild(&mut self, items: &[(usize, Aabb2D<T>)]) {
        self.clear();
        for &(slot, aabb) in items {
            self.insert(slot, aabb);
        }
    }

    /// Query slots whose AABB contains the point.
    fn query_point<'a>(&'a self, x: T, y: T) -> Box<dyn Iterator<Item = usize> + 'a>;

    /// Query slots whose AABB intersects the rectangle.
    fn query_rect<'a>(&'a self, rect: Aabb2D<T>) -> Box<dyn Iterator<Item = usize> + 'a>;
}
