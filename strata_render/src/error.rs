// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Internal failure kinds.
//!
//! None of these cross [`RenderEngine`](crate::RenderEngine) entry points: the
//! engine turns them into a skipped draw or a skipped surface, a `warn!` event
//! and a counter in [`FrameStats`](crate::FrameStats).

use crate::scene::ObjectId;

/// A raster surface could not be (re)allocated or is gone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// The requested backing store has no pixels.
    #[error("surface unavailable at {width}x{height} physical pixels")]
    Unavailable {
        /// Requested physical width.
        width: u32,
        /// Requested physical height.
        height: u32,
    },
    /// The surface was released and not resized since.
    #[error("surface is detached")]
    Detached,
}

/// An object whose geometry cannot be drawn as given.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// Bounds, transform, style or points contain NaN or infinity.
    #[error("object {id:?} has non-finite geometry")]
    NonFinite {
        /// Offending object.
        id: ObjectId,
    },
    /// Bounds have negative width or height.
    #[error("object {id:?} has negative extent")]
    Degenerate {
        /// Offending object.
        id: ObjectId,
    },
}
