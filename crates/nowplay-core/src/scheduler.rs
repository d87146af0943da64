#![forbid(unsafe_code)]

//! Frame scheduling seam between the panel and the host's render loop.
//!
//! The controller never sleeps or spawns. When a settle starts it asks the
//! [`FrameScheduler`] for frames tagged with the settle's
//! [`AnimationGeneration`]; the host then calls
//! [`PanelController::on_frame`](crate::PanelController::on_frame) with that
//! generation once per frame until it returns `false`.

use std::cell::Cell;
use std::rc::Rc;

use crate::animation::AnimationGeneration;
use crate::error::{PanelError, Result};

/// Source of periodic frame callbacks.
pub trait FrameScheduler {
    /// Start delivering frames for `generation`.
    ///
    /// An error makes the controller skip the animation and jump straight
    /// to the target.
    fn request_frames(&mut self, generation: AnimationGeneration) -> Result<()>;

    /// Frames for `generation` are no longer wanted, either because the
    /// settle was interrupted or because it reached its target.
    fn cancel_frames(&mut self, _generation: AnimationGeneration) {}

    /// Human-readable name for logs.
    fn name(&self) -> &str;
}

/// Scheduler that only remembers which settle wants frames; the host ticks
/// by hand.
///
/// Clones share the same slot, so a host can keep one handle and give the
/// other to the controller. Only the live generation is held: a new request
/// replaces it and a matching cancel clears it.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    live: Rc<Cell<Option<AnimationGeneration>>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation currently asking for frames, if any.
    #[must_use]
    pub fn pending(&self) -> Option<AnimationGeneration> {
        self.live.get()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frames(&mut self, generation: AnimationGeneration) -> Result<()> {
        self.live.set(Some(generation));
        Ok(())
    }

    fn cancel_frames(&mut self, generation: AnimationGeneration) {
        if self.live.get() == Some(generation) {
            self.live.set(None);
        }
    }

    fn name(&self) -> &str {
        "manual"
    }
}

/// Scheduler for hosts without a frame source. Every request fails, so
/// every settle completes instantly.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableScheduler;

impl FrameScheduler for UnavailableScheduler {
    fn request_frames(&mut self, _generation: AnimationGeneration) -> Result<()> {
        Err(PanelError::scheduler("no frame source attached"))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}
