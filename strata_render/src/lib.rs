// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strata Render: a Kurbo-native, viewport-adaptive render core for infinite canvases.
//!
//! Given a scene snapshot, a camera and a selection, the engine decides every frame
//! which objects are on screen, how cheaply each one can be drawn, and which of
//! three stacked surfaces actually need repainting.
//!
//! - Culls through a depth-bounded quadtree ([`strata_index`]) for large scenes and a
//!   linear filter for small ones, with an interaction-dependent margin.
//! - Assigns a [`DetailLevel`] per object from its on-screen size.
//! - Reuses rectangle, ellipse and polyline paths from a FIFO-bounded [`GeometryCache`].
//! - Keeps idle content on a static surface that is only repainted when it changes.
//! - Spaces scheduled frames by interaction budget through [`strata_frame`].
//!
//! It does not interpret input, edit objects, rasterize or lay out text; a [`Surface`]
//! implementation owns pixels and fonts.
//!
//! ## Pipeline
//!
//! objects, viewport, selection, interaction
//! → [`select_visible`] (consults the [`SceneIndex`])
//! → [`partition`] into static and dynamic draw lists
//! → [`Compositor::compose`] (paints via [`paint_object`] and [`paint_overlay`])
//! → three surfaces, stacked bottom to top.
//!
//! [`RenderEngine`] owns every stage and exposes the entry points: `paint`,
//! `request_frame`/`on_frame`, `resize`, `dispose` and `hit_test`.
//!
//! ## Coordinate spaces
//!
//! - Local: an object's geometry frame; `(0, 0)` is its bounds origin.
//! - World: shared by all objects; local maps to world through [`SceneObject::placement`].
//! - Screen: logical pixels; `screen = world * zoom + pan` ([`Viewport`]).
//!
//! ## Failure handling
//!
//! Nothing is returned as an error. Objects with NaN, infinite or negative geometry are
//! skipped and counted in [`FrameStats`]; layers without a backing store are skipped until
//! the next resize. Enable the `tracing` feature to see these as `warn!` events.
//!
//! # Example
//!
//! ```rust
//! use kurbo::{Rect, Vec2};
//! use strata_frame::ManualFrameHost;
//! use strata_render::{
//!     FrameInputs, Layer, RecordingSurface, RenderConfig, RenderEngine, SceneObject,
//!     SurfaceSize, Viewport,
//! };
//!
//! let mut engine = RenderEngine::new(
//!     RenderConfig::default(),
//!     [
//!         RecordingSurface::new(),
//!         RecordingSurface::new(),
//!         RecordingSurface::new(),
//!     ],
//!     ManualFrameHost::new(),
//! );
//!
//! let objects = [
//!     SceneObject::rectangle(1, Rect::new(0.0, 0.0, 50.0, 50.0)),
//!     SceneObject::rectangle(2, Rect::new(10_000.0, 10_000.0, 10_050.0, 10_050.0)),
//! ];
//! let inputs = FrameInputs::new(&objects, Viewport::new(Vec2::ZERO, 1.0));
//! let report = engine.paint(&inputs, SurfaceSize::new(800.0, 600.0));
//!
//! // Only the first rectangle is on screen.
//! assert_eq!(report.objects_drawn, 1);
//! assert!(!engine.compositor().surface(Layer::Dynamic).ops().is_empty());
//! ```
//!
//! ## Scheduled frames
//!
//! ```rust
//! use core::time::Duration;
//! use kurbo::Rect;
//! use strata_frame::ManualFrameHost;
//! use strata_render::{
//!     FrameInputs, RecordingSurface, RenderConfig, RenderEngine, SceneObject, SurfaceSize,
//!     Viewport,
//! };
//!
//! let mut engine = RenderEngine::new(
//!     RenderConfig::default(),
//!     [
//!         RecordingSurface::new(),
//!         RecordingSurface::new(),
//!         RecordingSurface::new(),
//!     ],
//!     ManualFrameHost::new(),
//! );
//! let objects = [SceneObject::ellipse(1, Rect::new(0.0, 0.0, 40.0, 20.0))];
//! let inputs = FrameInputs::new(&objects, Viewport::default());
//!
//! // Resizing schedules a repaint; the host fires it at the next refresh.
//! engine.resize(SurfaceSize::new(640.0, 480.0));
//! let id = engine.host_mut().fire().unwrap();
//! assert!(engine.on_frame(id, Duration::ZERO, &inputs));
//!
//! // Teardown cancels whatever is still pending.
//! engine.request_frame();
//! engine.dispose();
//! assert!(engine.host_mut().fire().is_none());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod log;

pub mod cache;
pub mod compositor;
pub mod config;
pub mod engine;
pub mod error;
pub mod overlay;
pub mod paint;
pub mod scene;
pub mod scene_index;
pub mod select;
pub mod surface;
pub mod viewport;

pub use cache::{CacheStats, GeometryCache, ShapeSignature};
pub use compositor::{
    ComposeFrame, ComposeReport, Compositor, Layer, LayerMask, LayeredDrawList, partition,
};
pub use config::{
    CacheConfig, CullConfig, FrameConfig, IndexConfig, InteractionState, LayerConfig, LoadTier,
    LodConfig, Optimizations, OverlayConfig, RenderConfig,
};
pub use engine::{FrameInputs, FrameStats, RenderEngine};
pub use error::{GeometryError, SurfaceError};
pub use overlay::paint_overlay;
pub use paint::{PaintContext, paint_object};
pub use scene::{
    ObjectFlags, ObjectId, ObjectKind, ObjectTransform, Rgba8, SceneObject, Style, TextAlign,
    TextStyle,
};
pub use scene_index::SceneIndex;
pub use select::{DetailLevel, DrawItem, Selection, select_visible};
pub use surface::{DrawOp, RecordingSurface, StrokeStyle, Surface};
pub use viewport::{SurfaceSize, Viewport};
