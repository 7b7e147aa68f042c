// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`FrameHost`] driven by hand, for headless embedders and tests.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use crate::scheduler::{CallbackId, FrameHost};

/// Frame host that queues callbacks until the caller fires them.
///
/// Callbacks fire in registration order. Cancelled callbacks are skipped.
#[derive(Clone, Debug, Default)]
pub struct ManualFrameHost {
    next: u64,
    queue: VecDeque<CallbackId>,
    cancelled: Vec<CallbackId>,
}

impl ManualFrameHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total callbacks ever scheduled.
    pub fn scheduled_count(&self) -> u64 {
        self.next
    }

    /// Callbacks waiting to fire.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Next callback that would fire.
    pub fn peek(&self) -> Option<CallbackId> {
        self.queue.front().copied()
    }

    /// Pop the next callback, as the display would at a refresh.
    pub fn fire(&mut self) -> Option<CallbackId> {
        self.queue.pop_front()
    }

    /// True if `id` was cancelled before it fired.
    pub fn is_cancelled(&self, id: CallbackId) -> bool {
        self.cancelled.contains(&id)
    }
}

impl FrameHost for ManualFrameHost {
    fn schedule_frame(&mut self) -> CallbackId {
        let id = CallbackId(self.next);
        self.next += 1;
        self.queue.push_back(id);
        id
    }

    fn cancel_frame(&mut self, id: CallbackId) {
        if let Some(pos) = self.queue.iter().position(|queued| *queued == id) {
            self.queue.remove(pos);
            self.cancelled.push(id);
        }
    }
}
