// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene snapshot types: objects, kinds, styles and their placement in world space.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Affine, Point, Rect, Vec2};

use crate::error::GeometryError;

/// Stable handle of a scene object, assigned by the editing layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

bitflags::bitflags! {
    /// Per-object state flags.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ObjectFlags: u8 {
        /// Object participates in culling, painting and hit testing.
        const VISIBLE = 0b0000_0001;
        /// Object is locked against editing. Rendering ignores this flag.
        const LOCKED  = 0b0000_0010;
    }
}

impl Default for ObjectFlags {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// Straight-alpha 8-bit RGBA color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    /// Opaque color from components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    /// Color from components including alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Horizontal alignment of a text run relative to its origin.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAlign {
    /// Run starts at the origin.
    #[default]
    Start,
    /// Run is centered on the origin.
    Center,
    /// Run ends at the origin.
    End,
}

/// Text content and font parameters.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// The characters to lay out.
    pub content: String,
    /// Font family name, resolved by the surface.
    pub font_family: String,
    /// Font size in local units.
    pub font_size: f64,
    /// Alignment of the run.
    pub align: TextAlign,
}

impl TextStyle {
    /// Text in the default family at `font_size`.
    pub fn new(content: impl Into<String>, font_size: f64) -> Self {
        Self {
            content: content.into(),
            font_family: String::from("sans-serif"),
            font_size,
            align: TextAlign::Start,
        }
    }
}

/// What an object is, with the kind-specific parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectKind {
    /// Axis-aligned rectangle in local space, optionally rounded.
    Rectangle {
        /// Corner radius in local units. Clamped to half the shorter side when drawn.
        corner_radius: f64,
    },
    /// Ellipse inscribed in the bounds.
    Ellipse,
    /// A single text run.
    Text(TextStyle),
    /// Open path through points given relative to the bounds origin.
    Polyline {
        /// Path vertices.
        points: Vec<Point>,
    },
}

/// Placement of an object's bounds in world space.
///
/// Applied about the bounds origin in this order: scale, rotate, then translate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ObjectTransform {
    /// Offset added to the bounds origin.
    pub translation: Vec2,
    /// Rotation in radians, clockwise in a y-down space.
    pub rotation: f64,
    /// Non-uniform scale.
    pub scale: Vec2,
}

impl ObjectTransform {
    /// No translation, rotation or scale.
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::new(1.0, 1.0),
    };

    /// Pure translation.
    pub const fn translate(translation: Vec2) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Paint style of an object.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Style {
    /// Fill color; `None` leaves the interior unpainted.
    pub fill: Option<Rgba8>,
    /// Stroke color; `None` skips the outline.
    pub stroke: Option<Rgba8>,
    /// Stroke width in local units.
    pub stroke_width: f64,
    /// Object opacity in `0..=1`.
    pub opacity: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: Some(Rgba8::WHITE),
            stroke: Some(Rgba8::BLACK),
            stroke_width: 1.0,
            opacity: 1.0,
        }
    }
}

/// One drawable entity in a scene snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneObject {
    /// Stable identifier.
    pub id: ObjectId,
    /// Kind and kind-specific parameters.
    pub kind: ObjectKind,
    /// Local, pre-transform bounds.
    pub bounds: Rect,
    /// Placement of the bounds in world space.
    pub transform: ObjectTransform,
    /// Colors, stroke and opacity.
    pub style: Style,
    /// Paint order; higher is painted later. Ties keep snapshot order.
    pub layer: i32,
    /// Visibility and lock state.
    pub flags: ObjectFlags,
    /// Bumped by the editing layer on every mutation.
    pub revision: u64,
}

impl SceneObject {
    /// Object of `kind` at `bounds` with default style and placement.
    pub fn new(id: ObjectId, kind: ObjectKind, bounds: Rect) -> Self {
        Self {
            id,
            kind,
            bounds,
            transform: ObjectTransform::IDENTITY,
            style: Style::default(),
            layer: 0,
            flags: ObjectFlags::default(),
            revision: 0,
        }
    }

    /// Square-cornered rectangle.
    pub fn rectangle(id: u64, bounds: Rect) -> Self {
        Self::new(
            ObjectId(id),
            ObjectKind::Rectangle { corner_radius: 0.0 },
            bounds,
        )
    }

    /// Ellipse inscribed in `bounds`.
    pub fn ellipse(id: u64, bounds: Rect) -> Self {
        Self::new(ObjectId(id), ObjectKind::Ellipse, bounds)
    }

    /// Text run anchored at the bounds origin.
    pub fn text(id: u64, bounds: Rect, text: TextStyle) -> Self {
        let mut object = Self::new(ObjectId(id), ObjectKind::Text(text), bounds);
        object.style.fill = Some(Rgba8::BLACK);
        object.style.stroke = None;
        object
    }

    /// Polyline whose bounds are the box around `points`, which are given in world units.
    pub fn polyline(id: u64, points: &[Point]) -> Self {
        let bounds = points
            .iter()
            .map(|p| Rect::from_points(*p, *p))
            .reduce(|acc, r| acc.union(r))
            .unwrap_or(Rect::ZERO);
        let origin = bounds.origin().to_vec2();
        let local = points.iter().map(|p| *p - origin).collect();
        let mut object = Self::new(ObjectId(id), ObjectKind::Polyline { points: local }, bounds);
        object.style.fill = None;
        object
    }

    /// Replace the style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Replace the placement.
    #[must_use]
    pub fn with_transform(mut self, transform: ObjectTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Replace the paint order.
    #[must_use]
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Replace the flags.
    #[must_use]
    pub fn with_flags(mut self, flags: ObjectFlags) -> Self {
        self.flags = flags;
        self
    }

    /// True when the object takes part in rendering.
    pub fn is_visible(&self) -> bool {
        self.flags.contains(ObjectFlags::VISIBLE)
    }

    /// Size of the local bounds.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.bounds.width(), self.bounds.height())
    }

    /// Local geometry frame: `(0, 0)` is the bounds origin, `(w, h)` its far corner.
    pub fn local_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.bounds.width(), self.bounds.height())
    }

    /// Map from the local geometry frame to world space.
    ///
    /// `T(origin + translation) * R(rotation) * S(scale)`.
    pub fn placement(&self) -> Affine {
        let t = self.transform;
        Affine::scale_non_uniform(t.scale.x, t.scale.y)
            .then_rotate(t.rotation)
            .then_translate(self.bounds.origin().to_vec2() + t.translation)
    }

    /// Conservative world-space bounding box.
    ///
    /// Degenerate objects collapse to the world position of their origin.
    pub fn world_bounds(&self) -> Rect {
        let placement = self.placement();
        if self.bounds.width() < 0.0 || self.bounds.height() < 0.0 {
            let p = placement * Point::ORIGIN;
            return Rect::from_points(p, p);
        }
        transform_rect_bbox(placement, self.local_rect())
    }

    /// Check that the object can be drawn.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let t = self.transform;
        let finite = self.bounds.is_finite()
            && t.translation.is_finite()
            && t.rotation.is_finite()
            && t.scale.is_finite()
            && self.style.stroke_width.is_finite()
            && self.style.opacity.is_finite()
            && match &self.kind {
                ObjectKind::Rectangle { corner_radius } => corner_radius.is_finite(),
                ObjectKind::Ellipse => true,
                ObjectKind::Text(text) => text.font_size.is_finite(),
                ObjectKind::Polyline { points } => points.iter().all(|p| p.is_finite()),
            };
        if !finite {
            return Err(GeometryError::NonFinite { id: self.id });
        }
        if self.bounds.width() < 0.0 || self.bounds.height() < 0.0 {
            return Err(GeometryError::Degenerate { id: self.id });
        }
        Ok(())
    }
}

/// Transform an axis-aligned `Rect` by an `Affine` and return a conservative
/// axis-aligned bounding box.
pub fn transform_rect_bbox(affine: Affine, rect: Rect) -> Rect {
    let p0 = affine * Point::new(rect.x0, rect.y0);
    let p1 = affine * Point::new(rect.x1, rect.y0);
    let p2 = affine * Point::new(rect.x0, rect.y1);
    let p3 = affine * Point::new(rect.x1, rect.y1);
    let min_x = p0.x.min(p1.x).min(p2.x).min(p3.x);
    let min_y = p0.y.min(p1.y).min(p2.y).min(p3.y);
    let max_x = p0.x.max(p1.x).max(p2.x).max(p3.x);
    let max_y = p0.y.max(p1.y).max(p2.y).max(p3.y);
    Rect::new(min_x, min_y, max_x, max_y)
}

/// Order-sensitive fingerprint of which objects exist and how often they changed.
///
/// Two snapshots with the same stamp hold the same objects at the same revisions,
/// barring hash collisions.
pub fn content_stamp(objects: &[SceneObject]) -> u64 {
    // FNV-1a over (id, revision, flags).
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    let mut mix = |v: u64| {
        for byte in v.to_le_bytes() {
            hash ^= u64::from(byte);
            hash = hash.wrapping_mul(PRIME);
        }
    };
    for object in objects {
        mix(object.id.0);
        mix(object.revision);
        mix(u64::from(object.flags.bits()));
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;

    fn approx(a: Rect, b: Rect) -> bool {
        let eps = 1e-9;
        (a.x0 - b.x0).abs() < eps
            && (a.y0 - b.y0).abs() < eps
            && (a.x1 - b.x1).abs() < eps
            && (a.y1 - b.y1).abs() < eps
    }

    #[test]
    fn identity_placement_keeps_bounds() {
        let obj = SceneObject::rectangle(1, Rect::new(10.0, 20.0, 60.0, 40.0));
        assert!(approx(obj.world_bounds(), obj.bounds));
    }

    #[test]
    fn translation_is_relative_to_bounds_origin() {
        let obj = SceneObject::rectangle(1, Rect::new(10.0, 20.0, 60.0, 40.0))
            .with_transform(ObjectTransform::translate(Vec2::new(5.0, -5.0)));
        assert!(approx(obj.world_bounds(), Rect::new(15.0, 15.0, 65.0, 35.0)));
    }

    #[test]
    fn scale_then_rotate_about_origin() {
        // 100x10, scaled x2 horizontally, then rotated a quarter turn.
        let obj = SceneObject::rectangle(1, Rect::new(0.0, 0.0, 100.0, 10.0)).with_transform(
            ObjectTransform {
                translation: Vec2::ZERO,
                rotation: FRAC_PI_2,
                scale: Vec2::new(2.0, 1.0),
            },
        );
        // Rotate-then-scale would give a 10x200 box instead.
        assert!(approx(obj.world_bounds(), Rect::new(-10.0, 0.0, 0.0, 200.0)));
    }

    #[test]
    fn negative_extent_is_degenerate_point() {
        let obj = SceneObject::rectangle(9, Rect::new(50.0, 50.0, 40.0, 60.0));
        assert_eq!(
            obj.validate(),
            Err(GeometryError::Degenerate { id: ObjectId(9) })
        );
        let wb = obj.world_bounds();
        assert_eq!(wb.width(), 0.0);
        assert_eq!(wb.origin(), Point::new(50.0, 50.0));
    }

    #[test]
    fn nan_is_rejected() {
        let mut obj = SceneObject::ellipse(3, Rect::new(0.0, 0.0, 1.0, 1.0));
        obj.transform.rotation = f64::NAN;
        assert_eq!(
            obj.validate(),
            Err(GeometryError::NonFinite { id: ObjectId(3) })
        );
    }

    #[test]
    fn polyline_points_are_rebased_to_bounds() {
        let obj = SceneObject::polyline(
            4,
            &[Point::new(10.0, 10.0), Point::new(30.0, 15.0), Point::new(20.0, 40.0)],
        );
        assert_eq!(obj.bounds, Rect::new(10.0, 10.0, 30.0, 40.0));
        let ObjectKind::Polyline { points } = &obj.kind else {
            panic!("expected polyline");
        };
        assert_eq!(points[0], Point::ZERO);
        assert!(obj.style.fill.is_none());
    }

    #[test]
    fn stamp_tracks_revisions() {
        let a = SceneObject::rectangle(1, Rect::new(0.0, 0.0, 1.0, 1.0));
        let mut b = a.clone();
        let before = content_stamp(core::slice::from_ref(&a));
        assert_eq!(before, content_stamp(core::slice::from_ref(&b)));
        b.revision += 1;
        assert_ne!(before, content_stamp(&[b]));
    }
}
