// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selection outlines, resize handles and the in-progress preview shape.

use alloc::collections::BTreeSet;

use kurbo::{Affine, Point, Rect};

use crate::config::OverlayConfig;
use crate::paint::{PaintContext, paint_object, rect_path};
use crate::scene::{ObjectId, SceneObject, transform_rect_bbox};
use crate::select::{DetailLevel, DrawItem};
use crate::surface::{StrokeStyle, Surface};
use crate::viewport::Viewport;

/// Paint the overlay layer for one frame. Returns the number of outlines drawn.
///
/// Outlines go around selected objects that are in the draw list; selected
/// objects culled this frame get none. Handles are drawn only when exactly one
/// object is selected. Chrome is drawn in screen space so it keeps its pixel
/// size at every zoom.
pub fn paint_overlay<S: Surface + ?Sized>(
    surface: &mut S,
    objects: &[SceneObject],
    items: &[DrawItem],
    selection: &[ObjectId],
    preview: Option<&SceneObject>,
    viewport: &Viewport,
    config: &OverlayConfig,
) -> usize {
    if let Some(preview) = preview {
        let mut cx = PaintContext {
            view: viewport.affine(),
            cache: None,
            cache_polylines: false,
        };
        paint_object(surface, preview, DetailLevel::Full, true, &mut cx);
    }

    let selected: BTreeSet<ObjectId> = selection.iter().copied().collect();
    if selected.is_empty() {
        return 0;
    }
    surface.set_transform(Affine::IDENTITY);
    surface.set_opacity(1.0);

    let outline = StrokeStyle {
        width: config.line_px,
        dash: Some(config.dash_px),
    };
    let mut drawn = 0;
    let mut last = None;
    for item in items {
        let Some(object) = objects.get(item.slot) else {
            continue;
        };
        if !selected.contains(&object.id) {
            continue;
        }
        let screen = transform_rect_bbox(viewport.affine(), object.world_bounds())
            .inflate(config.outset_px, config.outset_px);
        surface.stroke_path(&rect_path(screen), config.highlight, &outline);
        drawn += 1;
        last = Some(screen);
    }

    if selected.len() == 1
        && let Some(screen) = last
    {
        paint_handles(surface, screen, config);
    }
    drawn
}

/// Centers of the eight resize handles: corners, then edge midpoints.
pub fn handle_positions(rect: Rect) -> [Point; 8] {
    let c = rect.center();
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
        Point::new(c.x, rect.y0),
        Point::new(rect.x1, c.y),
        Point::new(c.x, rect.y1),
        Point::new(rect.x0, c.y),
    ]
}

fn paint_handles<S: Surface + ?Sized>(surface: &mut S, rect: Rect, config: &OverlayConfig) {
    let half = config.handle_px / 2.0;
    let border = StrokeStyle::solid(config.line_px);
    for center in handle_positions(rect) {
        let handle = Rect::new(center.x - half, center.y - half, center.x + half, center.y + half);
        surface.fill_rect(handle, config.handle_fill);
        surface.stroke_path(&rect_path(handle), config.highlight, &border);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, RecordingSurface};
    use crate::viewport::SurfaceSize;
    use alloc::vec::Vec;
    use kurbo::Vec2;

    fn setup() -> (RecordingSurface, Vec<SceneObject>, Vec<DrawItem>) {
        let mut s = RecordingSurface::new();
        s.resize(SurfaceSize::new(200.0, 200.0)).unwrap();
        let objects = alloc::vec![
            SceneObject::rectangle(1, Rect::new(0.0, 0.0, 10.0, 10.0)),
            SceneObject::rectangle(2, Rect::new(20.0, 0.0, 30.0, 10.0)),
            SceneObject::rectangle(3, Rect::new(5000.0, 0.0, 5010.0, 10.0)),
        ];
        let items = (0..2)
            .map(|slot| DrawItem {
                slot,
                detail: DetailLevel::Full,
                show_text: true,
            })
            .collect();
        (s, objects, items)
    }

    fn count(s: &RecordingSurface, pred: impl Fn(&DrawOp) -> bool) -> usize {
        s.ops().iter().filter(|op| pred(op)).count()
    }

    #[test]
    fn single_selection_gets_dashed_outline_and_handles() {
        let (mut s, objects, items) = setup();
        let vp = Viewport::new(Vec2::new(10.0, 10.0), 2.0);
        let n = paint_overlay(
            &mut s,
            &objects,
            &items,
            &[ObjectId(2)],
            None,
            &vp,
            &OverlayConfig::default(),
        );
        assert_eq!(n, 1);
        let dashed = count(&s, |op| {
            matches!(op, DrawOp::StrokePath { style, .. } if style.dash.is_some())
        });
        assert_eq!(dashed, 1);
        assert_eq!(count(&s, |op| matches!(op, DrawOp::FillRect { .. })), 8);
        // Screen box of object 2 is (50,10)-(70,30); outline sits 4px outside it.
        let DrawOp::StrokePath { path, .. } = &s.ops()[2] else {
            panic!("expected outline");
        };
        assert_eq!(kurbo::Shape::bounding_box(path), Rect::new(46.0, 6.0, 74.0, 34.0));
    }

    #[test]
    fn multi_selection_has_no_handles_and_skips_culled() {
        let (mut s, objects, items) = setup();
        let n = paint_overlay(
            &mut s,
            &objects,
            &items,
            &[ObjectId(1), ObjectId(2), ObjectId(3)],
            None,
            &Viewport::default(),
            &OverlayConfig::default(),
        );
        assert_eq!(n, 2, "object 3 is not in the draw list");
        assert_eq!(count(&s, |op| matches!(op, DrawOp::FillRect { .. })), 0);
    }

    #[test]
    fn preview_is_painted_at_full_detail() {
        let (mut s, objects, items) = setup();
        let preview = SceneObject::ellipse(99, Rect::new(0.0, 0.0, 1.0, 1.0));
        let n = paint_overlay(
            &mut s,
            &objects,
            &items,
            &[],
            Some(&preview),
            &Viewport::new(Vec2::ZERO, 0.01),
            &OverlayConfig::default(),
        );
        assert_eq!(n, 0);
        assert_eq!(count(&s, |op| matches!(op, DrawOp::FillPath { .. })), 1);
    }
}
