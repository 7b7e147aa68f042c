// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend with linear scans.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::marker::PhantomData;

use crate::backend::Backend;
use crate::types::Aabb2D;

/// Linear-scan backend. Every query visits every entry, in slot order.
pub struct FlatVec<T: Copy + PartialOrd + Debug, P: Copy + Debug> {
    entries: Vec<(usize, Aabb2D<T>)>,
    _payload: PhantomData<P>,
}

impl<T: Copy + PartialOrd + Debug, P: Copy + Debug> FlatVec<T, P> {
    fn matching<'a>(
        &'a self,
        pred: impl Fn(&Aabb2D<T>) -> bool + 'a,
    ) -> Box<dyn Iterator<Item = usize> + 'a> {
        Box::new(
            self.entries
                .iter()
                .filter(move |(_, aabb)| pred(aabb))
                .map(|&(slot, _)| slot),
        )
    }
}

impl<T: Copy + PartialOrd + Debug, P: Copy + Debug> Default for FlatVec<T, P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            _payload: PhantomData,
        }
    }
}

impl<T: Copy + PartialOrd + Debug, P: Copy + Debug> Debug for FlatVec<T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FlatVec")
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<T: Copy + PartialOrd + Debug, P: Copy + Debug> Backend<T, P> for FlatVec<T, P> {
    fn insert(&mut self, slot: usize, aabb: Aabb2D<T>) {
        self.entries.push((slot, aabb));
    }

    fn clear(&mut self) {
        self.entries.clear();
    }

    fn rebuild(&mut self, items: &[(usize, Aabb2D<T>)]) {
        self.entries.clear();
        self.entries.extend_from_slice(items);
    }

    fn query_point<'a>(&'a self, x: T, y: T) -> Box<dyn Iterator<Item = usize> + 'a> {
        self.matching(move |aabb| aabb.contains_point(x, y))
    }

    fn query_rect<'a>(&'a self, rect: Aabb2D<T>) -> Box<dyn Iterator<Item = usize> + 'a> {
        self.matching(move |aabb| aabb.intersects(&rect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rebuild_replaces_and_keeps_slot_order() {
        let mut flat = FlatVec::<f64, ()>::default();
        flat.insert(7, Aabb2D::new(0.0, 0.0, 1.0, 1.0));
        flat.rebuild(&[
            (0, Aabb2D::new(0.0, 0.0, 10.0, 10.0)),
            (1, Aabb2D::new(20.0, 20.0, 30.0, 30.0)),
            (2, Aabb2D::new(5.0, 5.0, 25.0, 25.0)),
        ]);
        let hits: Vec<_> = flat.query_rect(Aabb2D::new(0.0, 0.0, 100.0, 100.0)).collect();
        assert_eq!(hits, [0, 1, 2]);
        let hits: Vec<_> = flat.query_point(6.0, 6.0).collect();
        assert_eq!(hits, [0, 2]);
    }
}
