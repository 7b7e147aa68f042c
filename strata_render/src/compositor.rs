// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Three stacked surfaces, each repainted on its own cadence.
//!
//! - [`Layer::Static`]: objects nobody is touching. Repainted only when its
//!   draw list, any of its objects, the viewport or the size changes.
//! - [`Layer::Dynamic`]: objects being dragged, resized or drawn (or every
//!   object in small scenes). Repainted on every frame.
//! - [`Layer::Overlay`]: selection chrome and the preview shape. Repainted when
//!   the selection, the outlined objects, the preview or the camera changes.
//!
//! A repaint clears the whole surface and draws it again; there is no
//! dirty-rectangle tracking inside a surface. The host stacks the surfaces
//! bottom to top in [`Compositor::surfaces`] order with plain alpha blending.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use crate::cache::GeometryCache;
use crate::config::{Optimizations, RenderConfig};
use crate::log::warn;
use crate::overlay::paint_overlay;
use crate::paint::{PaintContext, paint_object};
use crate::scene::{ObjectId, SceneObject};
use crate::select::{DetailLevel, DrawItem};
use crate::surface::Surface;
use crate::viewport::{SurfaceSize, Viewport};

/// One of the three stacked surfaces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    /// Bottom: idle content.
    Static,
    /// Middle: content in motion.
    Dynamic,
    /// Top: selection chrome and previews.
    Overlay,
}

impl Layer {
    /// Every layer, bottom to top.
    pub const ALL: [Self; 3] = [Self::Static, Self::Dynamic, Self::Overlay];

    const fn slot(self) -> usize {
        match self {
            Self::Static => 0,
            Self::Dynamic => 1,
            Self::Overlay => 2,
        }
    }

    const fn mask(self) -> LayerMask {
        match self {
            Self::Static => LayerMask::STATIC,
            Self::Dynamic => LayerMask::DYNAMIC,
            Self::Overlay => LayerMask::OVERLAY,
        }
    }
}

bitflags::bitflags! {
    /// A set of layers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct LayerMask: u8 {
        /// [`Layer::Static`].
        const STATIC  = 0b001;
        /// [`Layer::Dynamic`].
        const DYNAMIC = 0b010;
        /// [`Layer::Overlay`].
        const OVERLAY = 0b100;
    }
}

/// The draw list split between the static and dynamic layers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LayeredDrawList {
    /// Painted onto [`Layer::Static`].
    pub static_items: Vec<DrawItem>,
    /// Painted onto [`Layer::Dynamic`].
    pub dynamic_items: Vec<DrawItem>,
}

/// Split an ordered draw list between the static and dynamic layers.
///
/// Small scenes, or layering switched off, put everything on the dynamic layer.
/// Otherwise objects listed in `active` go to the dynamic layer and the rest to
/// the static one. Each half keeps the input order.
pub fn partition(
    items: &[DrawItem],
    objects: &[SceneObject],
    active: &[ObjectId],
    config: &RenderConfig,
) -> LayeredDrawList {
    if !config.uses(Optimizations::LAYERING) || items.len() < config.layers.dynamic_split_threshold
    {
        return LayeredDrawList {
            static_items: Vec::new(),
            dynamic_items: items.to_vec(),
        };
    }
    let active: BTreeSet<ObjectId> = active.iter().copied().collect();
    let (dynamic_items, static_items) = items
        .iter()
        .partition(|item| active.contains(&objects[item.slot].id));
    LayeredDrawList {
        static_items,
        dynamic_items,
    }
}

/// What the static layer looked like when last painted.
#[derive(Clone, Debug, PartialEq)]
struct StaticKey {
    entries: Vec<(ObjectId, u64, DetailLevel, bool)>,
    viewport: Viewport,
    size: SurfaceSize,
}

impl StaticKey {
    fn new(frame: &ComposeFrame<'_>) -> Self {
        Self {
            entries: frame
                .layers
                .static_items
                .iter()
                .map(|item| {
                    let o = &frame.objects[item.slot];
                    (o.id, o.revision, item.detail, item.show_text)
                })
                .collect(),
            viewport: frame.viewport,
            size: frame.size,
        }
    }
}

/// What the overlay looked like when last painted.
#[derive(Clone, Debug, PartialEq)]
struct OverlayKey {
    selection: Vec<ObjectId>,
    outlined: Vec<(ObjectId, u64)>,
    preview: Option<SceneObject>,
    viewport: Viewport,
    size: SurfaceSize,
}

impl OverlayKey {
    fn new(frame: &ComposeFrame<'_>) -> Self {
        let selected: BTreeSet<ObjectId> = frame.selection.iter().copied().collect();
        Self {
            selection: frame.selection.to_vec(),
            outlined: frame
                .items
                .iter()
                .map(|item| &frame.objects[item.slot])
                .filter(|o| selected.contains(&o.id))
                .map(|o| (o.id, o.revision))
                .collect(),
            preview: frame.preview.cloned(),
            viewport: frame.viewport,
            size: frame.size,
        }
    }
}

/// Everything the compositor needs for one frame.
#[derive(Clone, Copy, Debug)]
pub struct ComposeFrame<'a> {
    /// Scene snapshot.
    pub objects: &'a [SceneObject],
    /// Full draw list in paint order.
    pub items: &'a [DrawItem],
    /// The draw list split by layer.
    pub layers: &'a LayeredDrawList,
    /// Selected object ids.
    pub selection: &'a [ObjectId],
    /// Shape being drawn, if any.
    pub preview: Option<&'a SceneObject>,
    /// Camera.
    pub viewport: Viewport,
    /// Logical surface size.
    pub size: SurfaceSize,
}

/// Outcome of [`Compositor::compose`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ComposeReport {
    /// Layers cleared and repainted.
    pub repainted: LayerMask,
    /// Layers that needed a repaint but had no backing store.
    pub skipped: LayerMask,
    /// Objects drawn on the static and dynamic layers.
    pub objects_drawn: usize,
    /// Selection outlines drawn.
    pub outlines: usize,
}

/// Owner of the three layer surfaces.
#[derive(Debug)]
pub struct Compositor<S> {
    surfaces: [S; 3],
    size: Option<SurfaceSize>,
    static_key: Option<StaticKey>,
    overlay_key: Option<OverlayKey>,
}

impl<S: Surface> Compositor<S> {
    /// Take ownership of the static, dynamic and overlay surfaces, in that order.
    pub fn new(surfaces: [S; 3]) -> Self {
        Self {
            surfaces,
            size: None,
            static_key: None,
            overlay_key: None,
        }
    }

    /// Surfaces bottom to top.
    pub fn surfaces(&self) -> &[S; 3] {
        &self.surfaces
    }

    /// The surface backing `layer`.
    pub fn surface(&self, layer: Layer) -> &S {
        &self.surfaces[layer.slot()]
    }

    /// Logical size of the last resize, if any.
    pub fn size(&self) -> Option<SurfaceSize> {
        self.size
    }

    /// Reallocate every surface at `size` and mark all layers for repaint.
    ///
    /// Surfaces that cannot be allocated are left unavailable and skipped by
    /// [`Compositor::compose`] until the next resize. Returns the layers that are usable.
    pub fn resize(&mut self, size: SurfaceSize) -> LayerMask {
        let size = size.normalized();
        self.size = Some(size);
        self.invalidate();
        let mut usable = LayerMask::empty();
        for layer in Layer::ALL {
            match self.surfaces[layer.slot()].resize(size) {
                Ok(()) => usable |= layer.mask(),
                Err(err) => {
                    warn!(?layer, %err, "surface unavailable, skipping until next resize");
                }
            }
        }
        usable
    }

    /// Free every backing store.
    pub fn release(&mut self) {
        for surface in &mut self.surfaces {
            surface.release();
        }
        self.size = None;
        self.invalidate();
    }

    /// Force every layer to repaint on the next compose.
    pub fn invalidate(&mut self) {
        self.static_key = None;
        self.overlay_key = None;
    }

    /// Repaint whichever layers changed since the last compose.
    pub fn compose(
        &mut self,
        frame: &ComposeFrame<'_>,
        cache: &mut GeometryCache,
        config: &RenderConfig,
    ) -> ComposeReport {
        let mut report = ComposeReport::default();
        let view = frame.viewport.affine();
        let use_cache = config.uses(Optimizations::GEOMETRY_CACHE);

        let static_key = StaticKey::new(frame);
        if self.static_key.as_ref() != Some(&static_key) {
            if let Some(surface) = self.begin(Layer::Static, &mut report) {
                let mut cx = PaintContext {
                    view,
                    cache: use_cache.then_some(&mut *cache),
                    cache_polylines: true,
                };
                for item in &frame.layers.static_items {
                    let object = &frame.objects[item.slot];
                    paint_object(surface, object, item.detail, item.show_text, &mut cx);
                }
                report.objects_drawn += frame.layers.static_items.len();
                self.static_key = Some(static_key);
            }
        }

        if let Some(surface) = self.begin(Layer::Dynamic, &mut report) {
            let mut cx = PaintContext {
                view,
                cache: use_cache.then_some(&mut *cache),
                cache_polylines: false,
            };
            for item in &frame.layers.dynamic_items {
                let object = &frame.objects[item.slot];
                paint_object(surface, object, item.detail, item.show_text, &mut cx);
            }
            report.objects_drawn += frame.layers.dynamic_items.len();
        }

        let overlay_key = OverlayKey::new(frame);
        if self.overlay_key.as_ref() != Some(&overlay_key) {
            if let Some(surface) = self.begin(Layer::Overlay, &mut report) {
                report.outlines = paint_overlay(
                    surface,
                    frame.objects,
                    frame.items,
                    frame.selection,
                    frame.preview,
                    &frame.viewport,
                    &config.overlay,
                );
                self.overlay_key = Some(overlay_key);
            }
        }
        report
    }

    /// Clear `layer` for repainting, or record it as skipped.
    fn begin(&mut self, layer: Layer, report: &mut ComposeReport) -> Option<&mut S> {
        let surface = &mut self.surfaces[layer.slot()];
        if !surface.is_available() {
            warn!(?layer, size = ?self.size, "surface unavailable, layer skipped");
            report.skipped |= layer.mask();
            return None;
        }
        surface.clear();
        report.repainted |= layer.mask();
        Some(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use kurbo::Rect;

    fn objects(n: u64) -> Vec<SceneObject> {
        (0..n)
            .map(|i| {
                let x = (i % 20) as f64 * 12.0;
                let y = (i / 20) as f64 * 12.0;
                SceneObject::rectangle(i, Rect::new(x, y, x + 10.0, y + 10.0))
            })
            .collect()
    }

    fn items(n: usize) -> Vec<DrawItem> {
        (0..n)
            .map(|slot| DrawItem {
                slot,
                detail: DetailLevel::Full,
                show_text: true,
            })
            .collect()
    }

    fn compositor() -> Compositor<RecordingSurface> {
        let mut c = Compositor::new([
            RecordingSurface::new(),
            RecordingSurface::new(),
            RecordingSurface::new(),
        ]);
        assert_eq!(c.resize(SurfaceSize::new(400.0, 300.0)), LayerMask::all());
        c
    }

    #[test]
    fn small_scenes_stay_on_dynamic_layer() {
        let objs = objects(10);
        let list = partition(&items(10), &objs, &[], &RenderConfig::default());
        assert!(list.static_items.is_empty());
        assert_eq!(list.dynamic_items.len(), 10);
    }

    #[test]
    fn large_scenes_split_active_objects_out() {
        let objs = objects(300);
        let active = [ObjectId(5), ObjectId(7)];
        let list = partition(&items(300), &objs, &active, &RenderConfig::default());
        assert_eq!(list.dynamic_items.iter().map(|i| i.slot).collect::<Vec<_>>(), [5, 7]);
        assert_eq!(list.static_items.len(), 298);

        let flat = partition(
            &items(300),
            &objs,
            &[ObjectId(5)],
            &RenderConfig::default().without(Optimizations::LAYERING),
        );
        assert_eq!(flat.dynamic_items.len(), 300);
    }

    #[test]
    fn static_layer_repaints_only_on_change() {
        let mut objs = objects(300);
        let config = RenderConfig::default();
        let mut cache = GeometryCache::new(config.cache.capacity);
        let mut c = compositor();
        let all = items(300);

        let mut run = |objs: &[SceneObject], c: &mut Compositor<RecordingSurface>| {
            let layers = partition(&all, objs, &[ObjectId(0)], &config);
            let frame = ComposeFrame {
                objects: objs,
                items: &all,
                layers: &layers,
                selection: &[],
                preview: None,
                viewport: Viewport::default(),
                size: SurfaceSize::new(400.0, 300.0),
            };
            c.compose(&frame, &mut cache, &config)
        };

        let first = run(&objs, &mut c);
        assert_eq!(first.repainted, LayerMask::all());
        assert_eq!(first.objects_drawn, 300);

        let second = run(&objs, &mut c);
        assert_eq!(second.repainted, LayerMask::DYNAMIC);
        assert_eq!(second.objects_drawn, 1);

        // The dragged object changing does not touch the static layer.
        objs[0].revision += 1;
        assert_eq!(run(&objs, &mut c).repainted, LayerMask::DYNAMIC);

        objs[100].revision += 1;
        assert_eq!(
            run(&objs, &mut c).repainted,
            LayerMask::STATIC | LayerMask::DYNAMIC
        );
        assert_eq!(c.surface(Layer::Static).clears(), 2);
    }

    #[test]
    fn unavailable_surfaces_are_skipped_until_resize() {
        let config = RenderConfig::default();
        let mut cache = GeometryCache::new(8);
        let mut c = Compositor::new([
            RecordingSurface::new(),
            RecordingSurface::new(),
            RecordingSurface::new(),
        ]);
        assert_eq!(c.resize(SurfaceSize::new(0.0, 300.0)), LayerMask::empty());

        let objs = objects(3);
        let all = items(3);
        let layers = partition(&all, &objs, &[], &config);
        let frame = ComposeFrame {
            objects: &objs,
            items: &all,
            layers: &layers,
            selection: &[ObjectId(1)],
            preview: None,
            viewport: Viewport::default(),
            size: SurfaceSize::new(0.0, 300.0),
        };
        let report = c.compose(&frame, &mut cache, &config);
        assert_eq!(report.repainted, LayerMask::empty());
        assert_eq!(report.skipped, LayerMask::all());

        c.resize(SurfaceSize::new(400.0, 300.0));
        let report = c.compose(&frame, &mut cache, &config);
        assert_eq!(report.repainted, LayerMask::all());
        assert_eq!(report.outlines, 1);
    }
}
