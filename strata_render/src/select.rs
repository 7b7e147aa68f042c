// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility culling and level-of-detail assignment.
//!
//! The selector turns a scene snapshot into an ordered draw list:
//!
//! 1. Expand the visible world rectangle by a margin that depends on the
//!    interaction state, so objects moving back into view do not pop in.
//! 2. Collect candidates from the [`SceneIndex`] for large scenes, or by a
//!    linear filter for small ones.
//! 3. Re-check every candidate against the snapshot (the index may be stale),
//!    assign a [`DetailLevel`] from its on-screen size, and sort by layer.

use alloc::vec::Vec;

use kurbo::Rect;

use crate::config::{InteractionState, LodConfig, Optimizations, RenderConfig};
use crate::log::warn;
use crate::scene::{ObjectKind, SceneObject};
use crate::scene_index::SceneIndex;
use crate::viewport::{SurfaceSize, Viewport};

/// How much of an object's style is drawn. Ordered from cheapest to richest.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DetailLevel {
    /// One rect over the bounds in a single color.
    Micro,
    /// Fill only, with box geometry and no stroke.
    Simplified,
    /// Cached geometry, fill, stroke and text.
    Full,
}

/// One entry of a draw list.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DrawItem {
    /// Position of the object in the snapshot.
    pub slot: usize,
    /// Detail to draw at.
    pub detail: DetailLevel,
    /// Whether a text run is legible enough to lay out.
    pub show_text: bool,
}

/// Draw list and culling counters for one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Visible objects in paint order.
    pub items: Vec<DrawItem>,
    /// Objects tested and rejected as off-screen or hidden.
    pub culled: usize,
    /// Objects skipped for invalid geometry.
    pub invalid: usize,
    /// True if candidates came from the spatial index.
    pub used_index: bool,
}

/// Largest side of an object's placed bounds in logical screen pixels.
pub fn screen_size(object: &SceneObject, zoom: f64) -> f64 {
    let size = object.size();
    let scale = object.transform.scale;
    (size.x * scale.x.abs()).max(size.y * scale.y.abs()) * zoom
}

/// Detail level for an object of `screen_px` on-screen size.
///
/// Never increases as `screen_px` shrinks.
pub fn detail_for(screen_px: f64, lod: &LodConfig) -> DetailLevel {
    if screen_px < lod.micro_px {
        DetailLevel::Micro
    } else if screen_px < lod.simplified_px {
        DetailLevel::Simplified
    } else {
        DetailLevel::Full
    }
}

/// True if `object` is text large enough on screen to lay out.
pub fn text_legible(object: &SceneObject, zoom: f64, lod: &LodConfig) -> bool {
    match &object.kind {
        ObjectKind::Text(text) => {
            text.font_size * object.transform.scale.y.abs() * zoom >= lod.min_text_px
        }
        _ => true,
    }
}

/// World rectangle that is culled against: the visible area plus a margin on every side.
pub fn cull_rect(
    viewport: &Viewport,
    size: SurfaceSize,
    state: InteractionState,
    config: &RenderConfig,
) -> Rect {
    let visible = viewport.visible_world_rect(size);
    let margin = config.cull.margin(state);
    visible.inflate(visible.width() * margin, visible.height() * margin)
}

/// Build the ordered draw list for one frame.
///
/// `index` is consulted only above the configured object count and when the
/// spatial index strategy is enabled.
pub fn select_visible(
    objects: &[SceneObject],
    viewport: &Viewport,
    size: SurfaceSize,
    state: InteractionState,
    index: Option<&SceneIndex>,
    config: &RenderConfig,
) -> Selection {
    let mut selection = Selection::default();
    if !viewport.is_valid() {
        warn!(?viewport, "invalid viewport, nothing selected");
        return selection;
    }
    let area = cull_rect(viewport, size, state, config);

    let candidates: Vec<usize> = match index {
        Some(index)
            if config.uses(Optimizations::SPATIAL_INDEX)
                && objects.len() > config.index.linear_scan_threshold =>
        {
            selection.used_index = true;
            let mut slots: Vec<usize> = index.query_rect(area).collect();
            slots.sort_unstable();
            slots.dedup();
            slots
        }
        _ => (0..objects.len()).collect(),
    };

    let lod = config.uses(Optimizations::LEVEL_OF_DETAIL);
    for slot in candidates {
        let Some(object) = objects.get(slot) else {
            continue;
        };
        if !object.is_visible() {
            continue;
        }
        if let Err(err) = object.validate() {
            warn!(%err, "skipping object");
            selection.invalid += 1;
            continue;
        }
        if !intersects_closed(object.world_bounds(), area) {
            continue;
        }
        let (detail, show_text) = if lod {
            let px = screen_size(object, viewport.zoom);
            (
                detail_for(px, &config.lod),
                text_legible(object, viewport.zoom, &config.lod),
            )
        } else {
            (DetailLevel::Full, true)
        };
        selection.items.push(DrawItem {
            slot,
            detail,
            show_text,
        });
    }
    // A stale index may return slots past the end of the snapshot; only
    // snapshot objects count.
    selection.culled = objects
        .len()
        .saturating_sub(selection.items.len() + selection.invalid);

    // Stable: same-layer objects keep snapshot order.
    selection.items.sort_by_key(|item| objects[item.slot].layer);
    selection
}

fn intersects_closed(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}
