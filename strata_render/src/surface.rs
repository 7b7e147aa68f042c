// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The immediate-mode drawing target and a recording implementation.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Affine, BezPath, Point, Rect};

use crate::error::SurfaceError;
use crate::scene::{Rgba8, TextAlign, TextStyle};
use crate::viewport::SurfaceSize;

/// Stroke parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StrokeStyle {
    /// Line width in the current transform's units.
    pub width: f64,
    /// Equal dash and gap length, or `None` for a solid line.
    pub dash: Option<f64>,
}

impl StrokeStyle {
    /// Solid line of `width`.
    pub const fn solid(width: f64) -> Self {
        Self { width, dash: None }
    }
}

/// An independently paintable raster target.
///
/// Draw state (transform and opacity) persists until changed, but callers set
/// both before drawing each object. [`Surface::clear`] wipes pixels and resets
/// the state to identity and fully opaque.
pub trait Surface {
    /// Reallocate the backing store for `size`. Clears the surface.
    fn resize(&mut self, size: SurfaceSize) -> Result<(), SurfaceError>;

    /// Free the backing store. Until the next successful resize, the surface is unavailable.
    fn release(&mut self);

    /// True if drawing would reach a backing store.
    fn is_available(&self) -> bool;

    /// Wipe to transparent and reset draw state.
    fn clear(&mut self);

    /// Transform from drawing coordinates to logical pixels.
    fn set_transform(&mut self, transform: Affine);

    /// Global alpha for subsequent draws.
    fn set_opacity(&mut self, opacity: f64);

    /// Fill a path with the nonzero rule.
    fn fill_path(&mut self, path: &BezPath, color: Rgba8);

    /// Stroke a path.
    fn stroke_path(&mut self, path: &BezPath, color: Rgba8, style: &StrokeStyle);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Rgba8);

    /// Lay out and fill a text run with its baseline start at `origin`.
    fn fill_text(&mut self, text: &TextStyle, origin: Point, color: Rgba8);

    /// Lay out and stroke a text run.
    fn stroke_text(&mut self, text: &TextStyle, origin: Point, color: Rgba8, width: f64);
}

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    /// [`Surface::set_transform`].
    Transform(Affine),
    /// [`Surface::set_opacity`].
    Opacity(f64),
    /// [`Surface::fill_path`].
    FillPath {
        /// Path drawn.
        path: BezPath,
        /// Fill color.
        color: Rgba8,
    },
    /// [`Surface::stroke_path`].
    StrokePath {
        /// Path drawn.
        path: BezPath,
        /// Stroke color.
        color: Rgba8,
        /// Stroke parameters.
        style: StrokeStyle,
    },
    /// [`Surface::fill_rect`].
    FillRect {
        /// Rectangle drawn.
        rect: Rect,
        /// Fill color.
        color: Rgba8,
    },
    /// [`Surface::fill_text`] or [`Surface::stroke_text`].
    Text {
        /// Characters laid out.
        content: String,
        /// Font family.
        font_family: String,
        /// Font size.
        font_size: f64,
        /// Alignment.
        align: TextAlign,
        /// Run origin.
        origin: Point,
        /// Paint color.
        color: Rgba8,
        /// `Some(width)` for a stroked run.
        stroke: Option<f64>,
    },
}

/// Surface that records calls instead of rasterizing.
///
/// The op list is the surface content: [`Surface::clear`] empties it, so two
/// frames are pixel-identical exactly when their op lists are equal.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    physical: Option<(u32, u32)>,
    clears: u64,
    draws: u64,
}

impl RecordingSurface {
    /// Unallocated surface. It becomes available on the first successful resize.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current content.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Physical backing-store size, if allocated.
    pub fn physical_size(&self) -> Option<(u32, u32)> {
        self.physical
    }

    /// Times the surface was cleared. Each repaint starts with a clear.
    pub fn clears(&self) -> u64 {
        self.clears
    }

    /// Drawing calls (fills, strokes, text) received since creation.
    pub fn draw_calls(&self) -> u64 {
        self.draws
    }

    fn record(&mut self, op: DrawOp) {
        if self.physical.is_none() {
            return;
        }
        if !matches!(op, DrawOp::Transform(_) | DrawOp::Opacity(_)) {
            self.draws += 1;
        }
        self.ops.push(op);
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, size: SurfaceSize) -> Result<(), SurfaceError> {
        let (width, height) = size.physical();
        self.ops.clear();
        if width == 0 || height == 0 {
            self.physical = None;
            return Err(SurfaceError::Unavailable { width, height });
        }
        self.physical = Some((width, height));
        Ok(())
    }

    fn release(&mut self) {
        self.ops.clear();
        self.physical = None;
    }

    fn is_available(&self) -> bool {
        self.physical.is_some()
    }

    fn clear(&mut self) {
        if self.physical.is_some() {
            self.ops.clear();
            self.clears += 1;
        }
    }

    fn set_transform(&mut self, transform: Affine) {
        self.record(DrawOp::Transform(transform));
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.record(DrawOp::Opacity(opacity));
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.record(DrawOp::FillPath {
            path: path.clone(),
            color,
        });
    }

    fn stroke_path(&mut self, path: &BezPath, color: Rgba8, style: &StrokeStyle) {
        self.record(DrawOp::StrokePath {
            path: path.clone(),
            color,
            style: *style,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.record(DrawOp::FillRect { rect, color });
    }

    fn fill_text(&mut self, text: &TextStyle, origin: Point, color: Rgba8) {
        self.record(text_op(text, origin, color, None));
    }

    fn stroke_text(&mut self, text: &TextStyle, origin: Point, color: Rgba8, width: f64) {
        self.record(text_op(text, origin, color, Some(width)));
    }
}

fn text_op(text: &TextStyle, origin: Point, color: Rgba8, stroke: Option<f64>) -> DrawOp {
    DrawOp::Text {
        content: text.content.clone(),
        font_family: text.font_family.clone(),
        font_size: text.font_size,
        align: text.align,
        origin,
        color,
        stroke,
    }
}
