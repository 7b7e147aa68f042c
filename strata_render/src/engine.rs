// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render engine: one object per canvas, owning every cache and surface.

use core::time::Duration;

use kurbo::Point;
use strata_frame::{CallbackId, FrameDecision, FrameHost, FrameScheduler, SchedulerStats};

use crate::cache::{CacheStats, GeometryCache};
use crate::compositor::{ComposeFrame, ComposeReport, Compositor, partition};
use crate::config::{InteractionState, Optimizations, RenderConfig};
use crate::log::{trace, warn};
use crate::scene::{ObjectId, SceneObject};
use crate::scene_index::{SceneIndex, Staleness};
use crate::select::select_visible;
use crate::surface::Surface;
use crate::viewport::{SurfaceSize, Viewport};

/// Borrowed render inputs for one frame.
///
/// The snapshot is read-only for the whole frame; edits made by the owner show
/// up on the next frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameInputs<'a> {
    /// Scene snapshot in insertion order.
    pub objects: &'a [SceneObject],
    /// Camera.
    pub viewport: Viewport,
    /// Selected objects.
    pub selection: &'a [ObjectId],
    /// Objects being dragged, resized or drawn.
    pub active: &'a [ObjectId],
    /// What the user is doing.
    pub interaction: InteractionState,
    /// Shape being drawn, not yet part of the scene.
    pub preview: Option<&'a SceneObject>,
}

impl<'a> FrameInputs<'a> {
    /// Idle inputs with no selection.
    pub fn new(objects: &'a [SceneObject], viewport: Viewport) -> Self {
        Self {
            objects,
            viewport,
            selection: &[],
            active: &[],
            interaction: InteractionState::Idle,
            preview: None,
        }
    }
}

/// Cumulative counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Paint passes run.
    pub frames: u64,
    /// Layer repaints across all frames.
    pub layers_repainted: u64,
    /// Layer repaints skipped for lack of a surface.
    pub layers_skipped: u64,
    /// Objects rejected by culling.
    pub culled: u64,
    /// Objects skipped for invalid geometry.
    pub invalid_skipped: u64,
    /// Spatial index rebuilds.
    pub index_rebuilds: u64,
    /// Objects drawn by the last frame.
    pub last_drawn: usize,
    /// Geometry cache counters.
    pub cache: CacheStats,
    /// Scheduler counters.
    pub scheduler: SchedulerStats,
}

/// Viewport-adaptive renderer for one canvas.
///
/// Owns the spatial index, geometry cache, frame scheduler and the three
/// layer surfaces. Nothing here is global, so several canvases can render
/// side by side.
///
/// No entry point panics or returns an error: bad objects are skipped,
/// missing surfaces skip their layer, and after [`RenderEngine::dispose`]
/// every call is a no-op.
#[derive(Debug)]
pub struct RenderEngine<S, H> {
    config: RenderConfig,
    compositor: Compositor<S>,
    cache: GeometryCache,
    index: SceneIndex,
    scheduler: FrameScheduler,
    host: H,
    stats: FrameStats,
}

impl<S: Surface, H: FrameHost> RenderEngine<S, H> {
    /// Build an engine over the static, dynamic and overlay surfaces.
    ///
    /// Surfaces are unusable until the first [`RenderEngine::resize`] or
    /// [`RenderEngine::paint`].
    pub fn new(config: RenderConfig, surfaces: [S; 3], host: H) -> Self {
        let mut scheduler = FrameScheduler::new(config.frame.clone());
        scheduler.set_throttling(config.uses(Optimizations::THROTTLE));
        Self {
            cache: GeometryCache::new(config.cache.capacity),
            index: SceneIndex::new(&config.index),
            compositor: Compositor::new(surfaces),
            scheduler,
            host,
            stats: FrameStats::default(),
            config,
        }
    }

    /// Configuration in use.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The layer surfaces.
    pub fn compositor(&self) -> &Compositor<S> {
        &self.compositor
    }

    /// The frame host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The frame host, mutably (to fire callbacks from a manual host).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The spatial index.
    pub fn index(&self) -> &SceneIndex {
        &self.index
    }

    /// Counters since creation.
    pub fn stats(&self) -> FrameStats {
        FrameStats {
            cache: self.cache.stats(),
            scheduler: self.scheduler.stats(),
            index_rebuilds: self.index.rebuilds(),
            ..self.stats
        }
    }

    /// True once [`RenderEngine::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.scheduler.is_disposed()
    }

    /// Paint one frame now.
    ///
    /// Identical inputs produce identical surface content. A pending scheduled
    /// frame with no further requests becomes a no-op.
    pub fn paint(&mut self, inputs: &FrameInputs<'_>, size: SurfaceSize) -> ComposeReport {
        if self.is_disposed() {
            return ComposeReport::default();
        }
        let report = self.run_frame(inputs, size, None);
        self.scheduler.mark_clean();
        report
    }

    /// Signal that inputs changed. Coalesces with an already pending frame.
    pub fn request_frame(&mut self) -> bool {
        self.scheduler.request_frame(&mut self.host)
    }

    /// Handle a fired host callback. Returns true if a frame was painted.
    ///
    /// `now` is monotonic time; it drives throttling and index rebuild spacing.
    ///
    /// A callback that fires before the first resize paints nothing and leaves
    /// the request outstanding for the frame that [`RenderEngine::resize`] schedules.
    pub fn on_frame(&mut self, id: CallbackId, now: Duration, inputs: &FrameInputs<'_>) -> bool {
        let Some(size) = self.compositor.size() else {
            if self.scheduler.release(id) {
                warn!("frame fired before any resize, skipped");
                self.stats.layers_skipped += 3;
            }
            return false;
        };
        let decision = self.scheduler.on_frame(
            id,
            now,
            inputs.interaction,
            self.stats.last_drawn,
            &mut self.host,
        );
        if decision != FrameDecision::Paint {
            trace!(?decision, "frame callback without paint");
            return false;
        }
        self.run_frame(inputs, size, Some(now));
        true
    }

    /// Reallocate the surfaces for a new size and schedule a full repaint.
    pub fn resize(&mut self, size: SurfaceSize) {
        if self.is_disposed() {
            return;
        }
        self.compositor.resize(size);
        self.request_frame();
    }

    /// Cancel any pending frame and release the surfaces.
    pub fn dispose(&mut self) {
        if self.is_disposed() {
            return;
        }
        self.scheduler.dispose(&mut self.host);
        self.compositor.release();
        self.cache.clear();
    }

    /// Topmost visible object under a world-space point, by paint order.
    ///
    /// Rotated and scaled objects are tested against their exact box, not the
    /// world bounding box. Locked objects are still hit.
    pub fn hit_test(&self, objects: &[SceneObject], point: Point) -> Option<ObjectId> {
        let use_index = self.config.uses(Optimizations::SPATIAL_INDEX)
            && self.index.staleness(objects) == Staleness::Fresh;
        let hit = |slot: usize| {
            let object = objects.get(slot)?;
            if !object.is_visible() || object.validate().is_err() {
                return None;
            }
            let local = object.placement().inverse() * point;
            contains_closed(object.local_rect(), local).then_some((object.layer, slot))
        };
        let best = if use_index {
            self.index.query_point(point).filter_map(hit).max()
        } else {
            (0..objects.len()).filter_map(hit).max()
        };
        best.map(|(_, slot)| objects[slot].id)
    }

    fn run_frame(
        &mut self,
        inputs: &FrameInputs<'_>,
        size: SurfaceSize,
        now: Option<Duration>,
    ) -> ComposeReport {
        let size = size.normalized();
        if self.compositor.size() != Some(size) {
            self.compositor.resize(size);
        }
        let objects = inputs.objects;
        let indexed = self.config.uses(Optimizations::SPATIAL_INDEX)
            && objects.len() > self.config.index.linear_scan_threshold;
        if indexed {
            self.index
                .sync(objects, now, self.config.index.rebuild_interval);
        }

        let selection = select_visible(
            objects,
            &inputs.viewport,
            size,
            inputs.interaction,
            indexed.then_some(&self.index),
            &self.config,
        );
        let layers = partition(&selection.items, objects, inputs.active, &self.config);
        let frame = ComposeFrame {
            objects,
            items: &selection.items,
            layers: &layers,
            selection: inputs.selection,
            preview: inputs.preview,
            viewport: inputs.viewport,
            size,
        };
        let report = self.compositor.compose(&frame, &mut self.cache, &self.config);

        self.stats.frames += 1;
        self.stats.layers_repainted += u64::from(report.repainted.bits().count_ones());
        self.stats.layers_skipped += u64::from(report.skipped.bits().count_ones());
        self.stats.culled += selection.culled as u64;
        self.stats.invalid_skipped += selection.invalid as u64;
        self.stats.last_drawn = selection.items.len();
        trace!(
            visible = selection.items.len(),
            static_items = layers.static_items.len(),
            dynamic_items = layers.dynamic_items.len(),
            repainted = ?report.repainted,
            "frame painted"
        );
        report
    }
}

fn contains_closed(rect: kurbo::Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}
