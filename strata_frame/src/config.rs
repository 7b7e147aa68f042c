// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction states and per-state frame budgets.

use alloc::vec;
use alloc::vec::Vec;
use core::time::Duration;

/// What the user is doing right now, as reported by the input layer.
///
/// The render core never derives this itself; it is passed in with every frame
/// and only selects budgets and margins.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InteractionState {
    /// Nothing is moving.
    #[default]
    Idle,
    /// The camera is being panned or zoomed.
    Panning,
    /// One or more objects are being dragged or resized.
    Dragging,
    /// A new shape is being drawn and its preview follows the pointer.
    Drawing,
}

impl InteractionState {
    /// True for every state other than [`InteractionState::Idle`].
    pub const fn is_interacting(self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Relaxed frame interval once the live object count passes a threshold.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadTier {
    /// Applies when more than this many objects are live.
    pub above: usize,
    /// Minimum interval between paints at this load.
    pub interval: Duration,
}

/// Frame-time targets per interaction state.
///
/// Dragging gets the shortest interval so the dragged object tracks the
/// pointer; idle gets the longest. Heavy scenes relax every state through
/// [`FrameConfig::load_tiers`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameConfig {
    /// Interval while idle.
    pub idle: Duration,
    /// Interval while panning.
    pub panning: Duration,
    /// Interval while dragging.
    pub dragging: Duration,
    /// Interval while drawing a preview shape.
    pub drawing: Duration,
    /// Load-based relaxation, checked in order; the largest matching interval wins.
    pub load_tiers: Vec<LoadTier>,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            idle: Duration::from_millis(16),
            panning: Duration::from_millis(12),
            dragging: Duration::from_millis(7),
            drawing: Duration::from_millis(8),
            load_tiers: vec![
                LoadTier {
                    above: 300,
                    interval: Duration::from_millis(20),
                },
                LoadTier {
                    above: 1_000,
                    interval: Duration::from_millis(33),
                },
            ],
        }
    }
}

impl FrameConfig {
    /// Base interval for a state, before load relaxation.
    pub fn base_interval(&self, state: InteractionState) -> Duration {
        match state {
            InteractionState::Idle => self.idle,
            InteractionState::Panning => self.panning,
            InteractionState::Dragging => self.dragging,
            InteractionState::Drawing => self.drawing,
        }
    }

    /// Minimum time between two paints for `state` with `live_objects` on screen.
    pub fn target_interval(&self, state: InteractionState, live_objects: usize) -> Duration {
        self.load_tiers
            .iter()
            .filter(|tier| live_objects > tier.above)
            .map(|tier| tier.interval)
            .fold(self.base_interval(state), Duration::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dragging_is_fastest_idle_slowest() {
        let cfg = FrameConfig::default();
        let drag = cfg.target_interval(InteractionState::Dragging, 10);
        let pan = cfg.target_interval(InteractionState::Panning, 10);
        let idle = cfg.target_interval(InteractionState::Idle, 10);
        assert!(drag < pan && pan < idle);
    }

    #[test]
    fn heavy_scenes_relax_the_budget() {
        let cfg = FrameConfig::default();
        assert_eq!(
            cfg.target_interval(InteractionState::Dragging, 301),
            Duration::from_millis(20)
        );
        assert_eq!(
            cfg.target_interval(InteractionState::Idle, 5_000),
            Duration::from_millis(33)
        );
        assert_eq!(
            cfg.target_interval(InteractionState::Dragging, 300),
            Duration::from_millis(7),
            "threshold is exclusive"
        );
    }
}
