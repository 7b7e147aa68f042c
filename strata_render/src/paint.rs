// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing one object onto a surface.

use alloc::rc::Rc;

use kurbo::{Affine, BezPath, Ellipse, Point, Rect, RoundedRect, Shape};

use crate::cache::{GeometryCache, ShapeSignature};
use crate::scene::{ObjectKind, Rgba8, SceneObject};
use crate::select::DetailLevel;
use crate::surface::{StrokeStyle, Surface};

/// Flattening tolerance for curved shapes, in local units.
const PATH_TOLERANCE: f64 = 0.1;

/// Where the painter gets reusable geometry from.
#[derive(Debug)]
pub struct PaintContext<'a> {
    /// World-to-screen transform of the frame.
    pub view: Affine,
    /// Cache to read and fill, or `None` to build every path per draw.
    pub cache: Option<&'a mut GeometryCache>,
    /// Whether polylines may be cached. Only shapes that stay put across frames should be.
    pub cache_polylines: bool,
}

impl PaintContext<'_> {
    fn geometry(
        &mut self,
        signature: ShapeSignature,
        build: impl FnOnce() -> BezPath,
    ) -> Rc<BezPath> {
        match self.cache.as_deref_mut() {
            Some(cache) => cache.get_or_create(signature, build),
            None => Rc::new(build()),
        }
    }
}

/// Draw `object` at `detail`.
///
/// Sets the transform and opacity before drawing anything, so no state from a
/// previous object or frame leaks in. Objects with invalid geometry draw nothing.
pub fn paint_object<S: Surface + ?Sized>(
    surface: &mut S,
    object: &SceneObject,
    detail: DetailLevel,
    show_text: bool,
    cx: &mut PaintContext<'_>,
) {
    if object.validate().is_err() {
        return;
    }
    surface.set_transform(cx.view * object.placement());
    surface.set_opacity(object.style.opacity.clamp(0.0, 1.0));

    let style = &object.style;
    let local = object.local_rect();
    match detail {
        DetailLevel::Micro => {
            let color = match object.kind {
                ObjectKind::Polyline { .. } => style.stroke,
                _ => style.fill.or(style.stroke),
            };
            if let Some(color) = color {
                surface.fill_rect(local, color);
            }
        }
        DetailLevel::Simplified => match &object.kind {
            ObjectKind::Polyline { points } => {
                if let Some(color) = style.stroke {
                    let path = polyline_path(points);
                    surface.stroke_path(&path, color, &StrokeStyle::solid(style.stroke_width));
                }
            }
            _ => {
                if let Some(color) = style.fill {
                    surface.fill_rect(local, color);
                }
            }
        },
        DetailLevel::Full => match &object.kind {
            ObjectKind::Rectangle { corner_radius } => {
                let (w, h, r) = (local.width(), local.height(), *corner_radius);
                let path = cx.geometry(ShapeSignature::rectangle(w, h, r), || {
                    RoundedRect::from_rect(local, r.max(0.0)).to_path(PATH_TOLERANCE)
                });
                fill_and_stroke(surface, &path, style.fill, style.stroke, style.stroke_width);
            }
            ObjectKind::Ellipse => {
                let path = cx.geometry(
                    ShapeSignature::ellipse(local.width(), local.height()),
                    || Ellipse::from_rect(local).to_path(PATH_TOLERANCE),
                );
                fill_and_stroke(surface, &path, style.fill, style.stroke, style.stroke_width);
            }
            ObjectKind::Text(text) => {
                if show_text {
                    if let Some(color) = style.fill {
                        surface.fill_text(text, Point::ORIGIN, color);
                    }
                    if let Some(color) = style.stroke {
                        surface.stroke_text(text, Point::ORIGIN, color, style.stroke_width);
                    }
                } else if let Some(color) = style.fill.or(style.stroke) {
                    // Illegible: a block where the run would be.
                    surface.fill_rect(local, color);
                }
            }
            ObjectKind::Polyline { points } => {
                let Some(color) = style.stroke else {
                    return;
                };
                let path = if cx.cache_polylines {
                    cx.geometry(ShapeSignature::polyline(points), || polyline_path(points))
                } else {
                    Rc::new(polyline_path(points))
                };
                surface.stroke_path(&path, color, &StrokeStyle::solid(style.stroke_width));
            }
        },
    }
}

fn fill_and_stroke<S: Surface + ?Sized>(
    surface: &mut S,
    path: &BezPath,
    fill: Option<Rgba8>,
    stroke: Option<Rgba8>,
    stroke_width: f64,
) {
    if let Some(color) = fill {
        surface.fill_path(path, color);
    }
    if let Some(color) = stroke
        && stroke_width > 0.0
    {
        surface.stroke_path(path, color, &StrokeStyle::solid(stroke_width));
    }
}

/// Open path through `points`.
pub fn polyline_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
    }
    path
}

/// Axis-aligned rect as a closed path.
pub(crate) fn rect_path(rect: Rect) -> BezPath {
    rect.to_path(PATH_TOLERANCE)
}
