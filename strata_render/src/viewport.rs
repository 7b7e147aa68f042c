// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Camera and surface geometry.

use kurbo::{Affine, Point, Rect, Vec2};

/// Camera state: `screen = world * zoom + pan`.
///
/// Zoom is clamped by the owner before it reaches the renderer; the renderer
/// only requires it to be positive and finite.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Screen-space offset of the world origin, in logical pixels.
    pub pan: Vec2,
    /// World-to-screen scale.
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    /// Camera with the given pan and zoom.
    pub const fn new(pan: Vec2, zoom: f64) -> Self {
        Self { pan, zoom }
    }

    /// True when the mapping is invertible and finite.
    pub fn is_valid(&self) -> bool {
        self.pan.is_finite() && self.zoom.is_finite() && self.zoom > 0.0
    }

    /// World-to-screen transform.
    pub fn affine(&self) -> Affine {
        Affine::scale(self.zoom).then_translate(self.pan)
    }

    /// Map a world point to logical screen pixels.
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.zoom + self.pan.x,
            world.y * self.zoom + self.pan.y,
        )
    }

    /// Map a logical screen point back to world space.
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.pan.x) / self.zoom,
            (screen.y - self.pan.y) / self.zoom,
        )
    }

    /// World-space rectangle covered by a surface of `size`.
    pub fn visible_world_rect(&self, size: SurfaceSize) -> Rect {
        Rect::from_points(
            self.screen_to_world(Point::ORIGIN),
            self.screen_to_world(Point::new(size.width, size.height)),
        )
    }
}

/// Logical size of the drawing area plus the device pixel ratio.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceSize {
    /// Width in logical pixels.
    pub width: f64,
    /// Height in logical pixels.
    pub height: f64,
    /// Physical pixels per logical pixel.
    pub scale_factor: f64,
}

impl SurfaceSize {
    /// Size at a device pixel ratio of 1.
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            scale_factor: 1.0,
        }
    }

    /// Same logical size at a different device pixel ratio.
    #[must_use]
    pub const fn with_scale_factor(self, scale_factor: f64) -> Self {
        Self {
            scale_factor,
            ..self
        }
    }

    /// The same size with unusable fields replaced.
    ///
    /// NaN, infinite or negative extents become zero and a scale factor that is
    /// not finite and positive becomes 1, so two normalized sizes compare equal
    /// whenever they describe the same backing store request.
    #[must_use]
    pub fn normalized(self) -> Self {
        let extent = |v: f64| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        let scale_factor = if self.scale_factor.is_finite() && self.scale_factor > 0.0 {
            self.scale_factor
        } else {
            1.0
        };
        Self {
            width: extent(self.width),
            height: extent(self.height),
            scale_factor,
        }
    }

    /// Backing-store size in whole physical pixels, rounded up.
    ///
    /// Non-finite or negative sizes map to zero.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "values are clamped to the u32 range first"
    )]
    pub fn physical(&self) -> (u32, u32) {
        let to_px = |logical: f64| {
            let px = logical * self.scale_factor;
            if !(px.is_finite() && px > 0.0) {
                return 0;
            }
            let px = px.min(f64::from(u32::MAX));
            let whole = px as u32;
            if f64::from(whole) < px {
                whole.saturating_add(1)
            } else {
                whole
            }
        };
        (to_px(self.width), to_px(self.height))
    }

    /// True when the physical backing store would have no pixels.
    pub fn is_empty(&self) -> bool {
        let (w, h) = self.physical();
        w == 0 || h == 0
    }

    /// Logical-to-physical transform.
    pub fn device_affine(&self) -> Affine {
        Affine::scale(self.scale_factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_screen_round_trip() {
        let vp = Viewport::new(Vec2::new(100.0, -50.0), 2.0);
        let world = Point::new(12.5, 40.0);
        let screen = vp.world_to_screen(world);
        assert_eq!(screen, Point::new(125.0, 30.0));
        assert_eq!(vp.affine() * world, screen);
        assert_eq!(vp.screen_to_world(screen), world);
    }

    #[test]
    fn visible_rect_follows_pan_and_zoom() {
        let vp = Viewport::new(Vec2::new(-200.0, -100.0), 0.5);
        let r = vp.visible_world_rect(SurfaceSize::new(800.0, 600.0));
        assert_eq!(r, Rect::new(400.0, 200.0, 2000.0, 1400.0));
    }

    #[test]
    fn physical_size_accounts_for_scale_factor() {
        let size = SurfaceSize::new(800.5, 600.0).with_scale_factor(2.0);
        assert_eq!(size.physical(), (1601, 1200));
        assert!(SurfaceSize::new(0.0, 600.0).is_empty());
        assert!(SurfaceSize::new(f64::NAN, 600.0).is_empty());
        assert!(!Viewport::new(Vec2::ZERO, 0.0).is_valid());
    }

    #[test]
    fn normalized_sizes_compare_equal() {
        let nan = SurfaceSize::new(f64::NAN, 600.0).with_scale_factor(f64::INFINITY);
        assert_ne!(nan, nan);
        assert_eq!(nan.normalized(), nan.normalized());
        assert_eq!(nan.normalized(), SurfaceSize::new(0.0, 600.0));
        let ok = SurfaceSize::new(800.0, 600.0).with_scale_factor(2.0);
        assert_eq!(ok.normalized(), ok);
    }
}
