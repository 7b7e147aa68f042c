// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strata Index: a generic 2D AABB index for canvas culling and hit testing.
//!
//! - Rebuild the index from a snapshot of world-space boxes with user payloads.
//! - Insert single boxes between rebuilds.
//! - Query by point (hit testing) or intersecting rectangle (visibility).
//!
//! Coordinates are any [`Scalar`]; the crate has no geometry dependency. A renderer
//! turns its objects into world-space boxes and rebuilds the index from those, using
//! the payload to point back at its own storage.
//!
//! The spatial strategy sits behind the [`Backend`] trait. [`Index`] defaults to a
//! linear [`FlatVec`]; [`Index::with_quadtree`] switches to a [`QuadTree`] for
//! scenes large enough that scanning every box per frame shows up.
//!
//! # Example
//!
//! ```rust
//! use strata_index::{Index, Aabb2D};
//!
//! // Index two boxes with a quadtree (8 boxes per node, depth ≤ 12).
//! let mut idx = Index::<f64, u32>::with_quadtree(8, 12);
//! idx.rebuild([
//!     (Aabb2D::new(0.0, 0.0, 10.0, 10.0), 1),
//!     (Aabb2D::new(5.0, 5.0, 15.0, 15.0), 2),
//! ]);
//!
//! // Query a point inside the second box only.
//! let hits: Vec<_> = idx.query_point(12.0, 12.0).collect();
//! assert_eq!(hits, [2]);
//!
//! // Query a rectangle overlapping both.
//! assert_eq!(idx.query_rect(Aabb2D::new(4.0, 4.0, 6.0, 6.0)).count(), 2);
//! ```
//!
//! ## Choosing a backend
//!
//! - `FlatVec` (default): simplest and smallest, linear scans. Good for very small sets
//!   where building a tree costs more than scanning.
//! - `QuadTree`: region quadtree seeded from the union of the rebuilt boxes. Boxes that
//!   straddle a split stay at the parent, so nothing is ever pushed into two nodes and
//!   queries never return duplicates. See the [`backends`] docs for details.
//!
//! ### Float semantics
//!
//! Boxes with NaN coordinates never match a query and are kept at the quadtree root.
//! Inverted boxes are accepted and likewise never match.

#![no_std]

extern crate alloc;

pub mod backend;
pub mod backends;
pub mod index;
pub mod types;

pub use backend::Backend;
pub use backends::flatvec::FlatVec;
pub use backends::quadtree::QuadTree;
pub use index::{Index, IndexGeneric};
pub use types::{Aabb2D, Scalar};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn flat_and_quadtree_agree_on_point_queries() {
        let boxes = [
            (Aabb2D::new(0, 0, 10, 10), 1_u32),
            (Aabb2D::new(5, 5, 15, 15), 2),
            (Aabb2D::new(-20, -20, -10, -10), 3),
        ];
        let mut flat: Index<i64, u32> = Index::new();
        let mut tree = Index::<i64, u32>::with_quadtree(1, 4);
        flat.rebuild(boxes);
        tree.rebuild(boxes);

        for (x, y) in [(6, 6), (12, 12), (-15, -15), (100, 100)] {
            let mut a: Vec<_> = flat.query_point(x, y).collect();
            let mut b: Vec<_> = tree.query_point(x, y).collect();
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b, "mismatch at ({x}, {y})");
        }
    }
}
