// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Axis-aligned bounding box in 2D.
///
/// Edges are closed: two boxes that only share an edge still intersect, and a
/// point on the boundary is contained.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb2D<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y (top)
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y (bottom)
    pub max_y: T,
}

impl<T> Aabb2D<T> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Copy + PartialOrd> Aabb2D<T> {
    /// Whether this AABB contains the point.
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.min_x, x) && le(self.min_y, y) && le(x, self.max_x) && le(y, self.max_y)
    }

    /// Whether `other` lies entirely inside this AABB.
    ///
    /// Always false if either box holds an unordered (NaN) coordinate.
    pub fn contains(&self, other: &Self) -> bool {
        le(self.min_x, other.min_x)
            && le(self.min_y, other.min_y)
            && le(other.max_x, self.max_x)
            && le(other.max_y, self.max_y)
    }

    /// The intersection of two AABBs.
    pub fn intersect(&self, other: &Self) -> Self {
        let min_x = max_t(self.min_x, other.min_x);
        let min_y = max_t(self.min_y, other.min_y);
        let max_x = min_t(self.max_x, other.max_x);
        let max_y = min_t(self.max_y, other.max_y);
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Whether the two AABBs overlap (touching edges count).
    ///
    /// Boxes with unordered coordinates never intersect anything.
    pub fn intersects(&self, other: &Self) -> bool {
        le(self.min_x, other.max_x)
            && le(other.min_x, self.max_x)
            && le(self.min_y, other.max_y)
            && le(other.min_y, self.max_y)
    }

    /// Return true if the AABB is empty or inverted (no area). Assumes no NaN.
    pub fn is_empty(&self) -> bool {
        lt(self.max_x, self.min_x) || lt(self.max_y, self.min_y)
    }

    /// Smallest AABB covering both boxes.
    pub fn union(&self, other: &Self) -> Self {
        union_aabb(*self, *other)
    }
}

impl<T: Scalar> Aabb2D<T> {
    /// True when every coordinate is finite and the box is not inverted.
    pub fn is_well_formed(&self) -> bool {
        T::is_finite(self.min_x)
            && T::is_finite(self.min_y)
            && T::is_finite(self.max_x)
            && T::is_finite(self.max_y)
            && !self.is_empty()
    }

    /// Split into four equal quadrants: top-left, top-right, bottom-left, bottom-right.
    pub fn quadrants(&self) -> [Self; 4] {
        let cx = T::mid(self.min_x, self.max_x);
        let cy = T::mid(self.min_y, self.max_y);
        [
            Self::new(self.min_x, self.min_y, cx, cy),
            Self::new(cx, self.min_y, self.max_x, cy),
            Self::new(self.min_x, cy, cx, self.max_y),
            Self::new(cx, cy, self.max_x, self.max_y),
        ]
    }
}

impl Aabb2D<f64> {
    /// Box with top-left corner `(x, y)` and the given extent.
    ///
    /// A negative `w` or `h` yields an inverted box, which [`Self::is_well_formed`]
    /// rejects.
    pub const fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new(x, y, x + w, y + h)
    }
}

/// Numeric scalar abstraction for the quadtree backend.
///
/// Only what region subdivision needs: a zero, a midpoint, and a finiteness
/// check used to keep malformed boxes at the root.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Zero value for the scalar type.
    fn zero() -> Self;

    /// Midpoint between a and b (used for quadrant splits).
    fn mid(a: Self, b: Self) -> Self;

    /// Whether the value is a usable coordinate (not NaN or infinite).
    fn is_finite(v: Self) -> bool;
}

impl Scalar for f64 {
    #[inline]
    fn zero() -> Self {
        0.0
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        0.5 * (a + b)
    }

    #[inline]
    fn is_finite(v: Self) -> bool {
        v.is_finite()
    }
}

impl Scalar for i64 {
    #[inline]
    fn zero() -> Self {
        0
    }

    #[inline]
    fn mid(a: Self, b: Self) -> Self {
        // Average without overflow: (a & b) + ((a ^ b) >> 1)
        (a & b) + ((a ^ b) >> 1)
    }

    #[inline]
    fn is_finite(_v: Self) -> bool {
        true
    }
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}

pub(crate) fn union_aabb<T: PartialOrd + Copy>(a: Aabb2D<T>, b: Aabb2D<T>) -> Aabb2D<T> {
    Aabb2D {
        min_x: min_t(a.min_x, b.min_x),
        min_y: min_t(a.min_y, b.min_y),
        max_x: max_t(a.max_x, b.max_x),
        max_y: max_t(a.max_y, b.max_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touching_edges_intersect() {
        let a = Aabb2D::new(0.0, 0.0, 10.0, 10.0);
        let b = Aabb2D::new(10.0, 0.0, 20.0, 10.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&Aabb2D::new(10.5, 0.0, 20.0, 10.0)));
    }

    #[test]
    fn nan_boxes_never_intersect_or_fit() {
        let nan = Aabb2D::new(f64::NAN, 0.0, 1.0, 1.0);
        let world = Aabb2D::new(-1.0e9, -1.0e9, 1.0e9, 1.0e9);
        assert!(!nan.intersects(&world));
        assert!(!world.contains(&nan));
        assert!(!nan.is_well_formed());
    }

    #[test]
    fn quadrants_partition_the_box() {
        let q = Aabb2D::new(0_i64, 0, 10, 10).quadrants();
        assert_eq!(q[0], Aabb2D::new(0, 0, 5, 5));
        assert_eq!(q[3], Aabb2D::new(5, 5, 10, 10));
        let mid = Scalar::mid(-7_i64, 7);
        assert_eq!(mid, 0);
    }
}
