// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunables for the render engine, with documented defaults.
//!
//! Every threshold here was picked empirically for a browser-class 2D rasterizer
//! and is expected to be re-tuned per platform.

use core::time::Duration;

pub use strata_frame::{FrameConfig, InteractionState, LoadTier};

use crate::scene::Rgba8;

bitflags::bitflags! {
    /// Independently switchable strategies.
    ///
    /// Turning one off falls back to the simplest correct behavior for that
    /// stage; output stays correct, only the cost changes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Optimizations: u8 {
        /// Cull through the quadtree instead of a linear filter.
        const SPATIAL_INDEX   = 0b0000_0001;
        /// Reuse built paths across frames.
        const GEOMETRY_CACHE  = 0b0000_0010;
        /// Degrade small objects to simplified or single-rect draws.
        const LEVEL_OF_DETAIL = 0b0000_0100;
        /// Split idle objects onto a static surface that repaints only on change.
        const LAYERING        = 0b0000_1000;
        /// Space scheduled paints by the interaction budget.
        const THROTTLE        = 0b0001_0000;
    }
}

impl Default for Optimizations {
    fn default() -> Self {
        Self::all()
    }
}

/// Spatial index shape and rebuild cadence.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexConfig {
    /// A quadtree node splits once it holds more than this many boxes.
    pub max_objects_per_node: usize,
    /// Nodes at this depth never split.
    pub max_depth: usize,
    /// At or below this many objects the selector scans linearly.
    pub linear_scan_threshold: usize,
    /// Minimum spacing of rebuilds caused by edits during scheduled frames.
    pub rebuild_interval: Duration,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_objects_per_node: 8,
            max_depth: 12,
            linear_scan_threshold: 50,
            rebuild_interval: Duration::from_millis(100),
        }
    }
}

/// Geometry cache bound.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CacheConfig {
    /// Maximum number of cached paths.
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 512 }
    }
}

/// Level-of-detail thresholds in logical screen pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LodConfig {
    /// Below this on-screen size an object is a single rect.
    pub micro_px: f64,
    /// Below this on-screen size an object is filled without stroke.
    pub simplified_px: f64,
    /// Text whose on-screen font size is below this is not laid out.
    pub min_text_px: f64,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            micro_px: 2.0,
            simplified_px: 8.0,
            min_text_px: 12.0,
        }
    }
}

/// Culling margin per interaction state, as a fraction of the visible world extent
/// added on every side.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CullConfig {
    /// Margin while idle.
    pub idle: f64,
    /// Margin while panning.
    pub panning: f64,
    /// Margin while dragging.
    pub dragging: f64,
    /// Margin while drawing a preview.
    pub drawing: f64,
}

impl Default for CullConfig {
    fn default() -> Self {
        Self {
            idle: 0.2,
            panning: 0.5,
            dragging: 1.0,
            drawing: 0.5,
        }
    }
}

impl CullConfig {
    /// Margin fraction for `state`.
    pub fn margin(&self, state: InteractionState) -> f64 {
        match state {
            InteractionState::Idle => self.idle,
            InteractionState::Panning => self.panning,
            InteractionState::Dragging => self.dragging,
            InteractionState::Drawing => self.drawing,
        }
    }
}

/// Static/dynamic split policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerConfig {
    /// Below this many visible objects everything is drawn on the dynamic layer.
    pub dynamic_split_threshold: usize,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            dynamic_split_threshold: 200,
        }
    }
}

/// Selection chrome, in logical screen pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayConfig {
    /// Outline and handle border color.
    pub highlight: Rgba8,
    /// Handle fill color.
    pub handle_fill: Rgba8,
    /// Distance between an object's screen box and its outline.
    pub outset_px: f64,
    /// Dash and gap length of the outline.
    pub dash_px: f64,
    /// Side length of a resize handle.
    pub handle_px: f64,
    /// Outline stroke width.
    pub line_px: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            highlight: Rgba8::rgb(0x1e, 0x90, 0xff),
            handle_fill: Rgba8::WHITE,
            outset_px: 4.0,
            dash_px: 4.0,
            handle_px: 6.0,
            line_px: 1.5,
        }
    }
}

/// Every tunable of the render engine.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderConfig {
    /// Spatial index.
    pub index: IndexConfig,
    /// Geometry cache.
    pub cache: CacheConfig,
    /// Level of detail.
    pub lod: LodConfig,
    /// Culling margins.
    pub cull: CullConfig,
    /// Frame budgets.
    pub frame: FrameConfig,
    /// Layer split.
    pub layers: LayerConfig,
    /// Selection chrome.
    pub overlay: OverlayConfig,
    /// Enabled strategies.
    pub optimizations: Optimizations,
}

impl RenderConfig {
    /// True if `strategy` is enabled.
    pub fn uses(&self, strategy: Optimizations) -> bool {
        self.optimizations.contains(strategy)
    }

    /// Same config with `strategy` switched off.
    #[must_use]
    pub fn without(mut self, strategy: Optimizations) -> Self {
        self.optimizations.remove(strategy);
        self
    }
}
