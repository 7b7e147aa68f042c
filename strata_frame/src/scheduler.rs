// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame scheduler: coalesce repaint requests and throttle them to a budget.
//!
//! ## Usage
//!
//! 1) Call [`FrameScheduler::request_frame`] whenever any render input changes.
//!    The first request schedules one host callback; later requests coalesce into it.
//! 2) When the host fires the callback, call [`FrameScheduler::on_frame`] with the
//!    callback id, the current time and the interaction state. Paint only on
//!    [`FrameDecision::Paint`].
//! 3) On teardown call [`FrameScheduler::dispose`]; the pending callback is cancelled
//!    and any callback that still fires afterwards is answered with
//!    [`FrameDecision::Disposed`].
//!
//! ```
//! use core::time::Duration;
//! use strata_frame::{FrameDecision, FrameScheduler, InteractionState, ManualFrameHost};
//!
//! let mut host = ManualFrameHost::new();
//! let mut frames = FrameScheduler::default();
//!
//! // Three changes before the display refreshes: one callback.
//! frames.request_frame(&mut host);
//! frames.request_frame(&mut host);
//! frames.request_frame(&mut host);
//! assert_eq!(host.scheduled_count(), 1);
//!
//! let id = host.fire().unwrap();
//! let decision = frames.on_frame(id, Duration::ZERO, InteractionState::Idle, 0, &mut host);
//! assert_eq!(decision, FrameDecision::Paint);
//! ```

use core::time::Duration;

use crate::config::{FrameConfig, InteractionState};
use crate::log::trace;

/// Handle of a callback registered with a [`FrameHost`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(pub u64);

/// The platform's "run this at the next repaint opportunity" primitive.
///
/// On the web this is `requestAnimationFrame`; natively it is a display link or
/// a vsync-driven event loop tick.
pub trait FrameHost {
    /// Register one callback for the next repaint opportunity.
    fn schedule_frame(&mut self) -> CallbackId;

    /// Cancel a callback registered with [`FrameHost::schedule_frame`].
    ///
    /// Cancelling an id that already fired is a no-op.
    fn cancel_frame(&mut self, id: CallbackId);
}

/// What the caller should do with a fired callback.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameDecision {
    /// Run one paint pass now.
    Paint,
    /// Too early for the current budget; a new callback was scheduled.
    Deferred,
    /// Nothing changed since the last paint.
    Idle,
    /// The scheduler was disposed; touch nothing.
    Disposed,
    /// The id is not the pending callback (cancelled or duplicated); ignore it.
    Stale,
}

/// Counters for diagnostics.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Calls to [`FrameScheduler::request_frame`].
    pub requests: u64,
    /// Requests folded into an already pending callback.
    pub coalesced: u64,
    /// Callbacks answered with [`FrameDecision::Deferred`].
    pub deferred: u64,
    /// Callbacks answered with [`FrameDecision::Paint`].
    pub painted: u64,
}

/// Interaction-aware repaint throttle.
///
/// At most one host callback is ever pending. A request is never dropped: if a
/// callback fires before the target interval has elapsed, the work is pushed to
/// the next callback instead.
#[derive(Clone, Debug)]
pub struct FrameScheduler {
    config: FrameConfig,
    throttle: bool,
    pending: Option<CallbackId>,
    dirty: bool,
    disposed: bool,
    last_paint: Option<Duration>,
    stats: SchedulerStats,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(FrameConfig::default())
    }
}

impl FrameScheduler {
    /// Create a scheduler with the given budgets.
    pub fn new(config: FrameConfig) -> Self {
        Self {
            config,
            throttle: true,
            pending: None,
            dirty: false,
            disposed: false,
            last_paint: None,
            stats: SchedulerStats::default(),
        }
    }

    /// The budgets in use.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Enable or disable throttling. Disabled, every fired callback with
    /// outstanding work paints.
    pub fn set_throttling(&mut self, enabled: bool) {
        self.throttle = enabled;
    }

    /// True while a host callback is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// True once [`FrameScheduler::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Timestamp of the last [`FrameDecision::Paint`].
    pub fn last_paint(&self) -> Option<Duration> {
        self.last_paint
    }

    /// Counters since creation.
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Signal that inputs changed. Returns true if a new callback was scheduled.
    pub fn request_frame(&mut self, host: &mut impl FrameHost) -> bool {
        if self.disposed {
            return false;
        }
        self.stats.requests += 1;
        self.dirty = true;
        if self.pending.is_some() {
            self.stats.coalesced += 1;
            trace!(coalesced = self.stats.coalesced, "frame request coalesced");
            return false;
        }
        self.pending = Some(host.schedule_frame());
        true
    }

    /// Handle a fired callback.
    ///
    /// `now` is monotonic time since any fixed epoch; `live_objects` is the
    /// number of objects the last frame drew, used for load relaxation.
    pub fn on_frame(
        &mut self,
        id: CallbackId,
        now: Duration,
        state: InteractionState,
        live_objects: usize,
        host: &mut impl FrameHost,
    ) -> FrameDecision {
        if self.disposed {
            return FrameDecision::Disposed;
        }
        if self.pending != Some(id) {
            return FrameDecision::Stale;
        }
        self.pending = None;
        if !self.dirty {
            return FrameDecision::Idle;
        }
        if self.throttle
            && let Some(last) = self.last_paint
        {
            let interval = self.config.target_interval(state, live_objects);
            let elapsed = now.saturating_sub(last);
            if elapsed < interval {
                self.pending = Some(host.schedule_frame());
                self.stats.deferred += 1;
                trace!(?state, ?elapsed, ?interval, "frame deferred");
                return FrameDecision::Deferred;
            }
        }
        self.dirty = false;
        self.last_paint = Some(now);
        self.stats.painted += 1;
        FrameDecision::Paint
    }

    /// Consume a fired callback without painting.
    ///
    /// The outstanding request is kept: the next [`FrameScheduler::request_frame`]
    /// schedules a fresh callback. Returns false for a stale id or after dispose.
    pub fn release(&mut self, id: CallbackId) -> bool {
        if self.disposed || self.pending != Some(id) {
            return false;
        }
        self.pending = None;
        true
    }

    /// Record that the caller painted outside a scheduled frame.
    ///
    /// A callback that is still pending then resolves to [`FrameDecision::Idle`].
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// True when a request is waiting for a paint.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Cancel pending work and refuse all further frames.
    pub fn dispose(&mut self, host: &mut impl FrameHost) {
        if let Some(id) = self.pending.take() {
            host.cancel_frame(id);
        }
        self.dirty = false;
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ManualFrameHost;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    /// Drive one display refresh at `now` and report the decision, if a callback was due.
    fn tick(
        frames: &mut FrameScheduler,
        host: &mut ManualFrameHost,
        now: Duration,
        state: InteractionState,
    ) -> Option<FrameDecision> {
        let id = host.fire()?;
        Some(frames.on_frame(id, now, state, 0, host))
    }

    #[test]
    fn burst_of_requests_paints_exactly_once_after_the_interval() {
        let mut host = ManualFrameHost::new();
        let mut frames = FrameScheduler::default();

        frames.request_frame(&mut host);
        assert_eq!(
            tick(&mut frames, &mut host, ms(0), InteractionState::Idle),
            Some(FrameDecision::Paint)
        );

        for _ in 0..5 {
            frames.request_frame(&mut host);
        }
        assert_eq!(host.scheduled_count(), 2, "one callback per burst");

        let mut paints = 0;
        let mut painted_at = None;
        for t in 1..40 {
            match tick(&mut frames, &mut host, ms(t), InteractionState::Idle) {
                Some(FrameDecision::Paint) => {
                    paints += 1;
                    painted_at.get_or_insert(t);
                }
                Some(FrameDecision::Deferred) | None => {}
                Some(other) => panic!("unexpected decision {other:?}"),
            }
        }
        assert_eq!(paints, 1);
        assert_eq!(painted_at, Some(16));
        assert_eq!(frames.stats().coalesced, 4);
    }

    #[test]
    fn dragging_uses_a_shorter_budget() {
        let mut host = ManualFrameHost::new();
        let mut frames = FrameScheduler::default();
        frames.request_frame(&mut host);
        tick(&mut frames, &mut host, ms(0), InteractionState::Dragging);

        frames.request_frame(&mut host);
        let mut painted_at = None;
        for t in 1..20 {
            if tick(&mut frames, &mut host, ms(t), InteractionState::Dragging)
                == Some(FrameDecision::Paint)
            {
                painted_at = Some(t);
                break;
            }
        }
        assert_eq!(painted_at, Some(7));
    }

    #[test]
    fn deferred_request_is_never_dropped() {
        let mut host = ManualFrameHost::new();
        let mut frames = FrameScheduler::default();
        frames.request_frame(&mut host);
        tick(&mut frames, &mut host, ms(100), InteractionState::Dragging);
        frames.request_frame(&mut host);
        assert_eq!(
            tick(&mut frames, &mut host, ms(101), InteractionState::Dragging),
            Some(FrameDecision::Deferred)
        );
        assert!(frames.is_pending(), "deferral must keep a callback queued");
    }

    #[test]
    fn callback_after_direct_paint_is_idle() {
        let mut host = ManualFrameHost::new();
        let mut frames = FrameScheduler::default();
        frames.request_frame(&mut host);
        frames.mark_clean();
        assert_eq!(
            tick(&mut frames, &mut host, ms(0), InteractionState::Idle),
            Some(FrameDecision::Idle)
        );
        assert!(!frames.is_pending());
    }

    #[test]
    fn unknown_callback_is_stale() {
        let mut host = ManualFrameHost::new();
        let mut frames = FrameScheduler::default();
        frames.request_frame(&mut host);
        tick(&mut frames, &mut host, ms(0), InteractionState::Idle);
        // A host that fires an extra callback on its own.
        let id = host.schedule_frame();
        assert_eq!(
            frames.on_frame(id, ms(50), InteractionState::Idle, 0, &mut host),
            FrameDecision::Stale
        );
    }

    #[test]
    fn dispose_cancels_pending_callback() {
        let mut host = ManualFrameHost::new();
        let mut frames = FrameScheduler::default();
        frames.request_frame(&mut host);
        let id = host.peek().unwrap();
        frames.dispose(&mut host);

        assert!(host.is_cancelled(id));
        assert_eq!(host.fire(), None, "cancelled callback must not fire");
        // A platform that races and fires anyway still gets nothing to do.
        assert_eq!(
            frames.on_frame(id, ms(100), InteractionState::Idle, 0, &mut host),
            FrameDecision::Disposed
        );
        assert!(!frames.request_frame(&mut host));
        assert_eq!(host.scheduled_count(), 1);
    }

    #[test]
    fn throttling_can_be_disabled() {
        let mut host = ManualFrameHost::new();
        let mut frames = FrameScheduler::default();
        frames.set_throttling(false);
        for t in 0..5 {
            frames.request_frame(&mut host);
            assert_eq!(
                tick(&mut frames, &mut host, ms(t), InteractionState::Idle),
                Some(FrameDecision::Paint)
            );
        }
    }

    #[test]
    fn released_callback_keeps_the_request() {
        let mut host = ManualFrameHost::new();
        let mut frames = FrameScheduler::default();
        frames.request_frame(&mut host);
        let id = host.fire().unwrap();
        assert!(frames.release(id));
        assert!(!frames.release(id), "already released");
        assert!(frames.is_dirty());
        assert!(!frames.is_pending());
        assert_eq!(frames.stats().painted, 0);

        assert!(frames.request_frame(&mut host), "a fresh callback is scheduled");
        assert_eq!(
            tick(&mut frames, &mut host, ms(0), InteractionState::Idle),
            Some(FrameDecision::Paint)
        );
    }
}
