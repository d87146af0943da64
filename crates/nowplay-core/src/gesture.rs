#![forbid(unsafe_code)]

//! Drag tracking: turns continuous pointer samples into a live panel offset
//! and, on release, into an expand/collapse decision.
//!
//! # State Machine
//!
//! [`GestureTracker`] is idle until [`on_gesture_start`](GestureTracker::on_gesture_start)
//! opens a [`DragSession`]. While the session is active every
//! [`on_gesture_move`](GestureTracker::on_gesture_move) rewrites the offset as
//! `offset_at_gesture_start + dy`, rubber-banded past either edge.
//! [`on_gesture_end`](GestureTracker::on_gesture_end) closes the session and
//! classifies the release with [`classify_release`].
//!
//! # Invariants
//!
//! 1. A non-finite sample never reaches the offset.
//! 2. During a drag the offset stays inside
//!    `[-max_overscroll, max_offset + max_overscroll]`.
//! 3. The offset handed to release classification is clamped back into
//!    `[0, max_offset]` first.
//! 4. Release classification is a pure function of velocity, displacement
//!    and release offset.
//!
//! # Failure Modes
//!
//! - A malformed move sample is dropped with a warning; the offset keeps its
//!   last good value.
//! - A malformed release sample still ends the drag: the decision falls back
//!   to the displacement actually travelled and zero velocity, so the panel
//!   always reaches a committed state.

use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, trace, warn};

use crate::config::PanelConfig;
use crate::error::{PanelError, Result};
use crate::model::{PanelModel, PanelState};

// ---------------------------------------------------------------------------
// Samples
// ---------------------------------------------------------------------------

/// One pointer sample, relative to where the gesture began.
///
/// Positive `dy` moves the panel toward collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GestureSample {
    /// Horizontal displacement since the gesture began.
    pub dx: f64,
    /// Vertical displacement since the gesture began.
    pub dy: f64,
    /// Horizontal velocity, units per millisecond.
    pub vx: f64,
    /// Vertical velocity, units per millisecond.
    pub vy: f64,
}

impl GestureSample {
    #[must_use]
    pub const fn new(dx: f64, dy: f64, vx: f64, vy: f64) -> Self {
        Self { dx, dy, vx, vy }
    }

    /// A purely vertical sample.
    #[must_use]
    pub const fn vertical(dy: f64, vy: f64) -> Self {
        Self::new(0.0, dy, 0.0, vy)
    }

    /// Reject samples carrying NaN or infinite components.
    pub fn validate(&self) -> Result<()> {
        let fields = [("dx", self.dx), ("dy", self.dy), ("vx", self.vx), ("vy", self.vy)];
        match fields.into_iter().find(|(_, value)| !value.is_finite()) {
            Some((field, _)) => Err(PanelError::InvalidSample { field }),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Release classification
// ---------------------------------------------------------------------------

/// Which rule decided a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseRule {
    /// Release speed exceeded the velocity threshold.
    Velocity,
    /// Total displacement exceeded the distance threshold.
    Distance,
    /// Neither threshold was met; nearest extreme wins.
    Midpoint,
}

/// Outcome of ending a drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseDecision {
    pub target: PanelState,
    /// Vertical velocity at release, units per millisecond.
    pub release_velocity: f64,
    pub rule: ReleaseRule,
    /// Offset at release, already clamped into `[0, max_offset]`.
    pub offset_at_release: f64,
}

/// Decide where a released drag should settle.
///
/// Rules in priority order:
///
/// 1. `|velocity| > velocity_threshold`: expand iff moving up (negative).
/// 2. `|displacement| > distance_threshold`: expand iff displaced up.
/// 3. Otherwise expand iff the offset is below the midpoint of the travel.
#[must_use]
pub fn classify_release(
    velocity: f64,
    displacement: f64,
    offset_at_release: f64,
    config: &PanelConfig,
) -> (PanelState, ReleaseRule) {
    let expand_if = |expand: bool| {
        if expand {
            PanelState::Expanded
        } else {
            PanelState::Collapsed
        }
    };

    if velocity.abs() > config.velocity_threshold {
        (expand_if(velocity < 0.0), ReleaseRule::Velocity)
    } else if displacement.abs() > config.distance_threshold {
        (expand_if(displacement < 0.0), ReleaseRule::Distance)
    } else {
        let midpoint = config.max_offset() / 2.0;
        (expand_if(offset_at_release < midpoint), ReleaseRule::Midpoint)
    }
}

/// Map a raw offset onto the visible one, resisting travel past either edge.
///
/// Inside `[0, max_offset]` the raw value passes through. Past an edge only
/// `damping` of the excess is applied, capped at `max_overscroll`.
#[must_use]
pub fn rubber_band(raw: f64, max_offset: f64, damping: f64, max_overscroll: f64) -> f64 {
    if raw < 0.0 {
        -(-raw * damping).min(max_overscroll)
    } else if raw > max_offset {
        max_offset + ((raw - max_offset) * damping).min(max_overscroll)
    } else {
        raw
    }
}

// ---------------------------------------------------------------------------
// GestureTracker
// ---------------------------------------------------------------------------

/// Ephemeral state of one drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub offset_at_gesture_start: f64,
    pub is_active: bool,
}

/// Interprets vertical drags on the panel.
#[derive(Debug, Clone)]
pub struct GestureTracker {
    config: PanelConfig,
    session: Option<DragSession>,
}

impl GestureTracker {
    #[must_use]
    pub fn new(config: PanelConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Whether a drag is in progress.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some_and(|s| s.is_active)
    }

    #[must_use]
    pub fn session(&self) -> Option<DragSession> {
        self.session
    }

    #[must_use]
    pub fn offset_at_gesture_start(&self) -> Option<f64> {
        self.session.map(|s| s.offset_at_gesture_start)
    }

    /// True when the sample is a deliberate vertical drag: more vertical
    /// than horizontal and past the minimum movement.
    #[must_use]
    pub fn should_begin_gesture(&self, sample: &GestureSample) -> bool {
        if sample.validate().is_err() {
            return false;
        }
        let vertical = sample.dy.abs();
        vertical > sample.dx.abs() && vertical > self.config.min_gesture_movement
    }

    /// Open a drag session anchored at `current_offset`.
    pub fn on_gesture_start(&mut self, current_offset: f64) {
        debug!(offset = current_offset, "drag started");
        self.session = Some(DragSession {
            offset_at_gesture_start: current_offset,
            is_active: true,
        });
    }

    /// Apply a move sample to `model.offset`. Returns the new offset.
    ///
    /// Malformed samples and samples outside a drag leave the model alone.
    pub fn on_gesture_move(&mut self, sample: &GestureSample, model: &mut PanelModel) -> Result<f64> {
        if let Err(err) = sample.validate() {
            warn!(?sample, error = %err, "dropping malformed gesture sample");
            return Err(err);
        }
        let Some(session) = self.session.filter(|s| s.is_active) else {
            return Ok(model.offset);
        };

        let raw = session.offset_at_gesture_start + sample.dy;
        let offset = rubber_band(
            raw,
            self.config.max_offset(),
            self.config.bounce_damping,
            self.config.max_overscroll,
        );
        model.offset = offset;
        trace!(raw, offset, "drag move");
        Ok(offset)
    }

    /// Close the drag and decide where to settle.
    ///
    /// Returns `None` when no drag was active.
    pub fn on_gesture_end(
        &mut self,
        sample: &GestureSample,
        model: &mut PanelModel,
    ) -> Option<ReleaseDecision> {
        let session = self.session.take().filter(|s| s.is_active)?;
        let _span = debug_span!("release", start = session.offset_at_gesture_start).entered();

        let max_offset = self.config.max_offset();
        let (velocity, displacement) = match sample.validate() {
            Ok(()) => {
                let raw = session.offset_at_gesture_start + sample.dy;
                model.offset = rubber_band(
                    raw,
                    max_offset,
                    self.config.bounce_damping,
                    self.config.max_overscroll,
                );
                (sample.vy, sample.dy)
            }
            Err(err) => {
                warn!(?sample, error = %err, "malformed release sample; using last offset");
                (0.0, model.offset - session.offset_at_gesture_start)
            }
        };

        model.offset = model.offset.clamp(0.0, max_offset);
        let (target, rule) = classify_release(velocity, displacement, model.offset, &self.config);
        debug!(
            velocity,
            displacement,
            offset = model.offset,
            ?target,
            ?rule,
            "drag released"
        );

        Some(ReleaseDecision {
            target,
            release_velocity: velocity,
            rule,
            offset_at_release: model.offset,
        })
    }

    /// Abandon the drag without a decision.
    pub fn cancel(&mut self) -> Option<DragSession> {
        self.session.take()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
