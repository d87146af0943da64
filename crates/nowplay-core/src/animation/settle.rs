#![forbid(unsafe_code)]

//! Settle animation: carries the panel from wherever a release left it to
//! one of the two committed extremes.
//!
//! Each [`SettleAnimator::start`] hands out a fresh [`AnimationGeneration`].
//! Frame ticks carry the generation they were scheduled for, and a tick whose
//! generation is not the live one is reported as [`SettleTick::Stale`] and
//! touches nothing. This is what keeps a late frame from overwriting the
//! offset after a new drag has taken over.
//!
//! # Invariants
//!
//! 1. At most one settle is live; starting another cancels the previous one.
//! 2. The completion callback runs exactly once, on the tick that reaches
//!    the target (or on [`SettleAnimator::finish_now`]). A cancelled settle
//!    drops its callback without calling it.
//! 3. A settle never outlives `max_settle_duration`: the tick that crosses
//!    it snaps the offset to the target and completes.
//! 4. While running, the written offset stays inside the overscroll band
//!    `[-max_overscroll, max_offset + max_overscroll]`.

use std::fmt;

use tracing::{debug, trace};
use web_time::Duration;

use super::{Animation, Spring};
use crate::config::PanelConfig;
use crate::model::{PanelModel, PanelState};

/// Token identifying one settle run. Strictly increasing per animator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationGeneration(u64);

impl AnimationGeneration {
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnimationGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Callback fired once when a settle reaches its target.
pub type CompletionFn = Box<dyn FnOnce(PanelState)>;

/// Result of feeding one frame to the animator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettleTick {
    /// The tick belonged to a cancelled or finished settle and was ignored.
    Stale,
    /// The offset moved; more frames are needed.
    Moving { offset: f64 },
    /// The offset reached the target and the state was committed.
    Settled { state: PanelState },
}

struct ActiveSettle {
    generation: AnimationGeneration,
    target: PanelState,
    spring: Spring,
    elapsed: Duration,
    on_complete: Option<CompletionFn>,
}

/// Drives [`PanelModel::offset`] toward a committed extreme with a spring.
pub struct SettleAnimator {
    config: PanelConfig,
    next_generation: u64,
    active: Option<ActiveSettle>,
}

impl fmt::Debug for SettleAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettleAnimator")
            .field("next_generation", &self.next_generation)
            .field("target", &self.target())
            .field("generation", &self.current_generation())
            .finish()
    }
}

impl SettleAnimator {
    #[must_use]
    pub fn new(config: PanelConfig) -> Self {
        Self {
            config,
            next_generation: 1,
            active: None,
        }
    }

    /// Begin settling from `from` toward `target`.
    ///
    /// `initial_velocity` is in extent units per millisecond, the unit of
    /// gesture samples, and is clamped to `max_release_velocity`. Any
    /// in-flight settle is cancelled without running its callback.
    pub fn start(
        &mut self,
        from: f64,
        target: PanelState,
        initial_velocity: f64,
        on_complete: Option<CompletionFn>,
    ) -> AnimationGeneration {
        self.cancel();

        let generation = AnimationGeneration(self.next_generation);
        self.next_generation += 1;

        let limit = self.config.max_release_velocity;
        let velocity = if initial_velocity.is_finite() {
            initial_velocity.clamp(-limit, limit)
        } else {
            0.0
        };
        let spring = Spring::new(from, target.offset(self.config.max_offset()))
            .with_velocity(velocity * 1_000.0)
            .with_stiffness(self.config.stiffness)
            .with_damping(self.config.effective_damping())
            .with_rest_threshold(self.config.rest_threshold)
            .with_velocity_threshold(self.config.rest_velocity);

        debug!(%generation, from, ?target, velocity, "settle started");
        self.active = Some(ActiveSettle {
            generation,
            target,
            spring,
            elapsed: Duration::ZERO,
            on_complete,
        });
        generation
    }

    /// Drop the in-flight settle, if any, without running its callback.
    pub fn cancel(&mut self) -> Option<AnimationGeneration> {
        let cancelled = self.active.take()?;
        debug!(generation = %cancelled.generation, "settle cancelled");
        Some(cancelled.generation)
    }

    /// Target of the in-flight settle.
    #[must_use]
    pub fn target(&self) -> Option<PanelState> {
        self.active.as_ref().map(|a| a.target)
    }

    /// Generation of the in-flight settle.
    #[must_use]
    pub fn current_generation(&self) -> Option<AnimationGeneration> {
        self.active.as_ref().map(|a| a.generation)
    }

    /// Advance the settle identified by `generation` by `dt`.
    pub fn tick(
        &mut self,
        generation: AnimationGeneration,
        dt: Duration,
        model: &mut PanelModel,
    ) -> SettleTick {
        let max_offset = self.config.max_offset();
        let overscroll = self.config.max_overscroll;
        let max_duration = self.config.max_settle_duration();

        let Some(active) = self.active.as_mut() else {
            return SettleTick::Stale;
        };
        if active.generation != generation {
            trace!(%generation, live = %active.generation, "stale settle tick ignored");
            return SettleTick::Stale;
        }

        active.spring.tick(dt);
        active.elapsed = active.elapsed.saturating_add(dt);
        if active.elapsed >= max_duration && !active.spring.is_complete() {
            debug!(%generation, "settle exceeded its time budget; snapping");
            active.spring.snap_to_target();
        }

        if active.spring.is_complete() {
            return self.complete(model);
        }

        let offset = active
            .spring
            .position()
            .clamp(-overscroll, max_offset + overscroll);
        model.offset = offset;
        trace!(%generation, offset, "settle tick");
        SettleTick::Moving { offset }
    }

    /// Jump the in-flight settle straight to its target and complete it.
    pub fn finish_now(&mut self, model: &mut PanelModel) -> Option<PanelState> {
        let active = self.active.as_mut()?;
        active.spring.snap_to_target();
        match self.complete(model) {
            SettleTick::Settled { state } => Some(state),
            _ => None,
        }
    }

    fn complete(&mut self, model: &mut PanelModel) -> SettleTick {
        let Some(mut active) = self.active.take() else {
            return SettleTick::Stale;
        };
        model.offset = active.target.offset(self.config.max_offset());
        model.state = active.target;
        debug!(generation = %active.generation, state = ?active.target, "settle complete");
        if let Some(on_complete) = active.on_complete.take() {
            on_complete(active.target);
        }
        SettleTick::Settled {
            state: active.target,
        }
    }
}
