#![forbid(unsafe_code)]

//! Time-driven animation primitives used to settle the panel.
//!
//! Everything here is advanced explicitly by the host's frame callback via
//! [`Animation::tick`]; nothing spawns timers or threads.

pub mod settle;
pub mod spring;

use web_time::Duration;

pub use settle::{AnimationGeneration, CompletionFn, SettleAnimator, SettleTick};
pub use spring::Spring;

/// A value that evolves over time and eventually completes.
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its final state.
    fn is_complete(&self) -> bool;
}
