#![forbid(unsafe_code)]

//! The panel state machine exposed to the rendering layer.
//!
//! ```text
//!   Expanded ──drag──▶ Dragging ──release──▶ Settling{target} ──done──▶ Expanded|Collapsed
//!   Collapsed ─drag──▶    ▲                        │
//!                         └──────── drag ──────────┘   (interrupts the settle)
//! ```
//!
//! `request_collapse` is honoured from `Expanded` or `Settling{Expanded}` and
//! settles to the collapsed extent with zero velocity. `request_expand` is
//! its mirror image. Both are ignored during a drag.
//!
//! # Invariants
//!
//! 1. The offset has one writer at a time: the [`GestureTracker`] while
//!    `Dragging`, the [`SettleAnimator`] while `Settling`.
//! 2. A frame for any generation other than the live settle's changes
//!    nothing.
//! 3. Every release, cancel, or honoured request ends in a committed phase,
//!    either through frames or, when the scheduler refuses, immediately.
//! 4. The published [`PanelSnapshot`] is refreshed after every offset or
//!    phase change.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, trace, warn};
use web_time::Duration;

use crate::animation::{AnimationGeneration, SettleAnimator, SettleTick};
use crate::config::PanelConfig;
use crate::error::Result;
use crate::feed::SnapshotFeed;
use crate::gesture::{GestureSample, GestureTracker, ReleaseDecision, classify_release};
use crate::model::{PanelModel, PanelPhase, PanelState};
use crate::scheduler::FrameScheduler;
use crate::visual::DerivedVisualState;

/// Everything a renderer needs for one frame of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelSnapshot {
    pub offset: f64,
    pub state: PanelState,
    pub phase: PanelPhase,
    pub visuals: DerivedVisualState,
}

type SettleListeners = Rc<RefCell<Vec<Box<dyn FnMut(PanelState)>>>>;

/// Owns the panel offset and drives it from drags, settles, and requests.
pub struct PanelController {
    config: PanelConfig,
    model: PanelModel,
    phase: PanelPhase,
    tracker: GestureTracker,
    animator: SettleAnimator,
    scheduler: Box<dyn FrameScheduler>,
    feed: SnapshotFeed,
    settle_listeners: SettleListeners,
}

impl fmt::Debug for PanelController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelController")
            .field("offset", &self.model.offset)
            .field("state", &self.model.state)
            .field("phase", &self.phase)
            .field("scheduler", &self.scheduler.name())
            .finish()
    }
}

impl PanelController {
    /// Create a controller resting at `initial`.
    pub fn new(
        config: PanelConfig,
        initial: PanelState,
        scheduler: impl FrameScheduler + 'static,
    ) -> Result<Self> {
        config.validate()?;
        let model = PanelModel::at_rest(initial, config.max_offset());
        let phase = PanelPhase::from(initial);
        let feed = SnapshotFeed::new(PanelSnapshot {
            offset: model.offset,
            state: model.state,
            phase,
            visuals: DerivedVisualState::at(model.offset, config.max_offset()),
        });

        Ok(Self {
            tracker: GestureTracker::new(config.clone()),
            animator: SettleAnimator::new(config.clone()),
            config,
            model,
            phase,
            scheduler: Box::new(scheduler),
            feed,
            settle_listeners: Rc::new(RefCell::new(Vec::new())),
        })
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.model.offset
    }

    /// Last committed state. Unchanged while dragging or settling.
    #[inline]
    #[must_use]
    pub fn state(&self) -> PanelState {
        self.model.state
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    #[must_use]
    pub fn visuals(&self) -> DerivedVisualState {
        DerivedVisualState::at(self.model.offset, self.config.max_offset())
    }

    #[must_use]
    pub fn snapshot(&self) -> PanelSnapshot {
        self.feed.latest()
    }

    /// Handle to the published snapshot, for subscribing renderers.
    #[must_use]
    pub fn observe(&self) -> SnapshotFeed {
        self.feed.clone()
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Offset captured when the current drag began.
    #[must_use]
    pub fn offset_at_gesture_start(&self) -> Option<f64> {
        self.tracker.offset_at_gesture_start()
    }

    /// Generation the host should pass to [`on_frame`](Self::on_frame).
    #[must_use]
    pub fn pending_generation(&self) -> Option<AnimationGeneration> {
        self.animator.current_generation()
    }

    /// Register a callback run each time a settle reaches its target.
    /// Interrupted settles never call it.
    pub fn on_settled(&mut self, listener: impl FnMut(PanelState) + 'static) {
        self.settle_listeners.borrow_mut().push(Box::new(listener));
    }

    // -----------------------------------------------------------------------
    // Gestures
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn should_begin_gesture(&self, sample: &GestureSample) -> bool {
        self.phase != PanelPhase::Dragging && self.tracker.should_begin_gesture(sample)
    }

    /// Start a drag if `sample` qualifies, then apply it as the first move.
    pub fn try_begin_gesture(&mut self, sample: &GestureSample) -> bool {
        if !self.should_begin_gesture(sample) {
            return false;
        }
        self.on_gesture_start() && self.on_gesture_move(sample)
    }

    /// Enter `Dragging`, interrupting any settle in flight.
    ///
    /// Returns `false` if a drag is already active.
    pub fn on_gesture_start(&mut self) -> bool {
        if self.phase == PanelPhase::Dragging {
            trace!("gesture start ignored: already dragging");
            return false;
        }
        if let Some(generation) = self.animator.cancel() {
            self.scheduler.cancel_frames(generation);
            debug!(%generation, offset = self.model.offset, "settle interrupted by drag");
        }
        self.tracker.on_gesture_start(self.model.offset);
        self.set_phase(PanelPhase::Dragging);
        true
    }

    /// Apply a move sample. Returns `false` if the sample was dropped.
    pub fn on_gesture_move(&mut self, sample: &GestureSample) -> bool {
        if self.phase != PanelPhase::Dragging {
            return false;
        }
        match self.tracker.on_gesture_move(sample, &mut self.model) {
            Ok(_) => {
                self.publish();
                true
            }
            Err(_) => false,
        }
    }

    /// Release the drag and start settling toward the decided target.
    pub fn on_gesture_end(&mut self, sample: &GestureSample) -> Option<ReleaseDecision> {
        if self.phase != PanelPhase::Dragging {
            return None;
        }
        let decision = self.tracker.on_gesture_end(sample, &mut self.model)?;
        self.settle(decision.target, decision.release_velocity);
        Some(decision)
    }

    /// The platform cancelled the drag; settle to whichever extreme is nearer.
    pub fn on_gesture_cancel(&mut self) -> Option<PanelState> {
        if self.phase != PanelPhase::Dragging {
            return None;
        }
        self.tracker.cancel();
        self.model.offset = self.model.offset.clamp(0.0, self.config.max_offset());
        let (target, _) = classify_release(0.0, 0.0, self.model.offset, &self.config);
        debug!(offset = self.model.offset, ?target, "drag cancelled");
        self.settle(target, 0.0);
        Some(target)
    }

    // -----------------------------------------------------------------------
    // Requests
    // -----------------------------------------------------------------------

    /// Collapse from `Expanded` or from a settle heading to `Expanded`.
    pub fn request_collapse(&mut self) -> bool {
        self.request(PanelState::Collapsed)
    }

    /// Expand from `Collapsed` or from a settle heading to `Collapsed`.
    pub fn request_expand(&mut self) -> bool {
        self.request(PanelState::Expanded)
    }

    fn request(&mut self, target: PanelState) -> bool {
        let from = target.opposite();
        let honoured = match self.phase {
            PanelPhase::Dragging => {
                debug!(?target, "request ignored during drag");
                false
            }
            PanelPhase::Settling { target: heading } => heading == from,
            PanelPhase::Expanded => from == PanelState::Expanded,
            PanelPhase::Collapsed => from == PanelState::Collapsed,
        };
        if honoured {
            self.settle(target, 0.0);
        } else {
            trace!(?target, phase = ?self.phase, "request not applicable");
        }
        honoured
    }

    // -----------------------------------------------------------------------
    // Frames
    // -----------------------------------------------------------------------

    /// Advance the settle for `generation` by `dt`.
    ///
    /// Returns `true` while more frames are needed.
    pub fn on_frame(&mut self, generation: AnimationGeneration, dt: Duration) -> bool {
        if !matches!(self.phase, PanelPhase::Settling { .. }) {
            trace!(%generation, "frame outside settle ignored");
            return false;
        }
        match self.animator.tick(generation, dt, &mut self.model) {
            SettleTick::Stale => false,
            SettleTick::Moving { .. } => {
                self.publish();
                true
            }
            SettleTick::Settled { state } => {
                self.scheduler.cancel_frames(generation);
                self.set_phase(PanelPhase::from(state));
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn settle(&mut self, target: PanelState, velocity: f64) {
        if let Some(previous) = self.animator.current_generation() {
            self.scheduler.cancel_frames(previous);
        }
        let listeners = Rc::clone(&self.settle_listeners);
        let generation = self.animator.start(
            self.model.offset,
            target,
            velocity,
            Some(Box::new(move |state| {
                for listener in listeners.borrow_mut().iter_mut() {
                    listener(state);
                }
            })),
        );
        self.set_phase(PanelPhase::Settling { target });

        if let Err(err) = self.scheduler.request_frames(generation) {
            warn!(
                %generation,
                scheduler = self.scheduler.name(),
                error = %err,
                "frames unavailable; jumping to target"
            );
            self.scheduler.cancel_frames(generation);
            if let Some(state) = self.animator.finish_now(&mut self.model) {
                self.set_phase(PanelPhase::from(state));
            }
        }
    }

    fn set_phase(&mut self, phase: PanelPhase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, offset = self.model.offset, "panel phase");
            self.phase = phase;
        }
        self.publish();
    }

    fn publish(&self) {
        self.feed.publish(PanelSnapshot {
            offset: self.model.offset,
            state: self.model.state,
            phase: self.phase,
            visuals: self.visuals(),
        });
    }
}
