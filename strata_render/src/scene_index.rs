// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree over the world bounds of a scene snapshot.

use core::time::Duration;

use kurbo::{Point, Rect};
use strata_index::{Aabb2D, IndexGeneric, QuadTree};

use crate::config::IndexConfig;
use crate::log::debug;
use crate::scene::{SceneObject, content_stamp};

/// Why [`SceneIndex::sync`] would rebuild.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Staleness {
    /// Index matches the snapshot.
    Fresh,
    /// Objects were added or removed.
    CountChanged,
    /// Same count, but some object was edited.
    ContentChanged,
}

/// Spatial index of one scene snapshot. Payloads are positions in the snapshot.
///
/// Only visible objects with valid geometry are indexed. The index may lag the
/// snapshot by a few frames after edits; callers re-check every candidate
/// against the snapshot they are drawing.
#[derive(Debug)]
pub struct SceneIndex {
    index: IndexGeneric<f64, usize, QuadTree<f64, usize>>,
    count: Option<usize>,
    stamp: u64,
    last_rebuild: Option<Duration>,
    rebuilds: u64,
}

impl SceneIndex {
    /// Empty index with the configured node shape.
    pub fn new(config: &IndexConfig) -> Self {
        Self {
            index: IndexGeneric::with_backend(QuadTree::new(
                config.max_objects_per_node,
                config.max_depth,
            )),
            count: None,
            stamp: 0,
            last_rebuild: None,
            rebuilds: 0,
        }
    }

    /// Number of indexed objects.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Total rebuilds since creation.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// The quadtree backend, for statistics.
    pub fn tree(&self) -> &QuadTree<f64, usize> {
        self.index.backend()
    }

    /// Compare against `objects` without touching the index.
    pub fn staleness(&self, objects: &[SceneObject]) -> Staleness {
        if self.count != Some(objects.len()) {
            Staleness::CountChanged
        } else if self.stamp != content_stamp(objects) {
            Staleness::ContentChanged
        } else {
            Staleness::Fresh
        }
    }

    /// Drop every entry and index the visible, valid objects of `objects`.
    pub fn rebuild(&mut self, objects: &[SceneObject], now: Option<Duration>) {
        self.index.rebuild(
            objects
                .iter()
                .enumerate()
                .filter(|(_, o)| o.is_visible() && o.validate().is_ok())
                .map(|(slot, o)| (rect_to_aabb(o.world_bounds()), slot)),
        );
        self.count = Some(objects.len());
        self.stamp = content_stamp(objects);
        if now.is_some() {
            self.last_rebuild = now;
        }
        self.rebuilds += 1;
        debug!(
            objects = objects.len(),
            indexed = self.index.len(),
            depth = self.index.backend().depth(),
            "spatial index rebuilt"
        );
    }

    /// Rebuild if needed and allowed. Returns true if a rebuild ran.
    ///
    /// Count changes always rebuild. Content changes rebuild at once when `now`
    /// is `None`, and otherwise at most once per `min_interval`.
    pub fn sync(
        &mut self,
        objects: &[SceneObject],
        now: Option<Duration>,
        min_interval: Duration,
    ) -> bool {
        let due = match self.staleness(objects) {
            Staleness::Fresh => false,
            Staleness::CountChanged => true,
            Staleness::ContentChanged => match (now, self.last_rebuild) {
                (Some(now), Some(last)) => now.saturating_sub(last) >= min_interval,
                _ => true,
            },
        };
        if due {
            self.rebuild(objects, now);
        }
        due
    }

    /// Snapshot positions of indexed objects whose world bounds intersect `rect`.
    pub fn query_rect(&self, rect: Rect) -> impl Iterator<Item = usize> + '_ {
        self.index.query_rect(rect_to_aabb(rect))
    }

    /// Snapshot positions of indexed objects whose world bounds contain `point`.
    pub fn query_point(&self, point: Point) -> impl Iterator<Item = usize> + '_ {
        self.index.query_point(point.x, point.y)
    }
}

fn rect_to_aabb(r: Rect) -> Aabb2D<f64> {
    Aabb2D::new(r.x0, r.y0, r.x1, r.y1)
}
