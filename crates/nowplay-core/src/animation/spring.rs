#![forbid(unsafe_code)]

//! Damped spring carrying the panel offset toward a committed extreme.
//!
//!   F = -stiffness × (position - target) - damping × velocity
//!
//! Semi-implicit Euler, subdivided into steps of at most 4ms so large frame
//! deltas stay stable. Positions are in extent units and velocities in
//! extent units per second.
//!
//! # Invariants
//!
//! 1. `position()` is unclamped; the settle animator bounds it.
//! 2. The spring rests, snapped onto the target, as soon as both the
//!    distance and the speed fall below their thresholds, including partway
//!    through one long `tick`. Once at rest it never moves again.
//! 3. Stiffness is at least 0.1 and damping is never negative.

use web_time::Duration;

use super::Animation;

const MAX_STEP_SECS: f64 = 0.004;

const DEFAULT_REST_THRESHOLD: f64 = 0.5;

const DEFAULT_VELOCITY_THRESHOLD: f64 = 1.0;

const MIN_STIFFNESS: f64 = 0.1;

/// A damped spring moving a scalar from its start position toward a target.
///
/// # Example
///
/// ```
/// use nowplay_core::animation::{Animation, Spring};
/// use web_time::Duration;
///
/// let mut spring = Spring::new(0.0, 300.0).with_stiffness(260.0).with_damping(32.25);
/// for _ in 0..120 {
///     spring.tick(Duration::from_millis(16));
/// }
/// assert!(spring.is_complete());
/// assert_eq!(spring.position(), 300.0);
/// ```
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    stiffness: f64,
    damping: f64,
    rest_threshold: f64,
    velocity_threshold: f64,
    at_rest: bool,
}

impl Spring {
    /// Spring starting at `start` and heading for `target`, at zero velocity.
    #[must_use]
    pub fn new(start: f64, target: f64) -> Self {
        Self {
            position: start,
            velocity: 0.0,
            target,
            stiffness: 170.0,
            damping: 26.0,
            rest_threshold: DEFAULT_REST_THRESHOLD,
            velocity_threshold: DEFAULT_VELOCITY_THRESHOLD,
            at_rest: false,
        }
    }

    /// Launch velocity in units per second.
    #[must_use]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    /// Clamped to a minimum of 0.1.
    #[must_use]
    pub fn with_stiffness(mut self, k: f64) -> Self {
        self.stiffness = k.max(MIN_STIFFNESS);
        self
    }

    /// Clamped to a minimum of 0.0.
    #[must_use]
    pub fn with_damping(mut self, c: f64) -> Self {
        self.damping = c.max(0.0);
        self
    }

    #[must_use]
    pub fn with_rest_threshold(mut self, threshold: f64) -> Self {
        self.rest_threshold = threshold.abs();
        self
    }

    #[must_use]
    pub fn with_velocity_threshold(mut self, threshold: f64) -> Self {
        self.velocity_threshold = threshold.abs();
        self
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Jump straight to the target and stop.
    pub fn snap_to_target(&mut self) {
        self.position = self.target;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let acceleration = -self.stiffness * displacement - self.damping * self.velocity;

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    fn settled(&self) -> bool {
        (self.position - self.target).abs() < self.rest_threshold
            && self.velocity.abs() < self.velocity_threshold
    }

    /// Advance by `dt` in sub-steps, stopping early once the spring rests.
    fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }

        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
            if self.settled() {
                self.snap_to_target();
                return;
            }
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }
}
