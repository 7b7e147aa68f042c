// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Strata Frame: a deterministic, `no_std` repaint throttle for interactive canvases.
//!
//! ## Overview
//!
//! Interactive canvases receive far more change notifications than the display can show.
//! This crate turns any number of "something changed" signals into at most one paint per
//! display refresh, and spaces paints according to what the user is doing.
//!
//! It does not paint anything and it does not own a clock.
//! The embedder supplies a [`FrameHost`] (the platform's next-refresh callback) and the
//! current time on every fired callback, so behavior is fully reproducible in tests.
//!
//! ## Budgets
//!
//! [`FrameConfig`] holds one minimum interval per [`InteractionState`]. Dragging gets the
//! shortest interval so the dragged object tracks the pointer; idle gets the longest.
//! Load tiers relax every state once many objects are on screen.
//!
//! ## Workflow
//!
//! 1) On every input change call [`FrameScheduler::request_frame`].
//! 2) When the host fires, call [`FrameScheduler::on_frame`] and paint on
//!    [`FrameDecision::Paint`]. A callback that arrives too early is answered with
//!    [`FrameDecision::Deferred`] and a fresh callback is queued, so no request is lost.
//! 3) On teardown call [`FrameScheduler::dispose`].
//!
//! ```
//! use core::time::Duration;
//! use strata_frame::{FrameDecision, FrameScheduler, InteractionState, ManualFrameHost};
//!
//! let mut host = ManualFrameHost::new();
//! let mut frames = FrameScheduler::default();
//!
//! frames.request_frame(&mut host);
//! let id = host.fire().unwrap();
//! assert_eq!(
//!     frames.on_frame(id, Duration::from_millis(0), InteractionState::Idle, 0, &mut host),
//!     FrameDecision::Paint,
//! );
//!
//! // Two milliseconds later the user drags: too early even for the drag budget.
//! frames.request_frame(&mut host);
//! let id = host.fire().unwrap();
//! assert_eq!(
//!     frames.on_frame(id, Duration::from_millis(2), InteractionState::Dragging, 0, &mut host),
//!     FrameDecision::Deferred,
//! );
//! assert!(frames.is_pending());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod log;

pub mod config;
pub mod host;
pub mod scheduler;

pub use config::{FrameConfig, InteractionState, LoadTier};
pub use host::ManualFrameHost;
pub use scheduler::{CallbackId, FrameDecision, FrameHost, FrameScheduler, SchedulerStats};
