#![forbid(unsafe_code)]

//! Layout constants, gesture thresholds, and spring tuning for the panel.
//!
//! Offsets are measured in extent units (logical pixels) from the fully
//! expanded resting position. Gesture velocities are in extent units per
//! millisecond, which is what the release thresholds are expressed in.
//!
//! # Invariants
//!
//! A config accepted by [`PanelConfig::validate`] satisfies:
//!
//! 1. Every field is finite.
//! 2. `expanded_extent > collapsed_extent >= 0`, so `max_offset() > 0`.
//! 3. `bounce_damping` lies in `[0, 1]`.
//! 4. Thresholds, stiffness, and the rest thresholds are strictly positive.

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::{PanelError, Result};

/// Thresholds, layout extents, and spring parameters for one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Height of the panel when collapsed to the mini-player (default: 80).
    pub collapsed_extent: f64,
    /// Height of the panel when fully expanded (default: 800).
    pub expanded_extent: f64,
    /// Minimum vertical travel before a drag is recognised (default: 5).
    pub min_gesture_movement: f64,
    /// Release speed above which velocity alone decides the target (default: 0.3).
    pub velocity_threshold: f64,
    /// Release displacement above which direction decides the target (default: 30).
    pub distance_threshold: f64,
    /// Fraction of overscroll that is applied past either edge (default: 0.3).
    pub bounce_damping: f64,
    /// Hard cap on the damped overscroll past either edge (default: 60).
    pub max_overscroll: f64,
    /// Release speeds are clamped to this magnitude before settling (default: 10).
    pub max_release_velocity: f64,
    /// Spring stiffness for the settle animation (default: 260).
    pub stiffness: f64,
    /// Spring damping; `None` selects critical damping for `stiffness`.
    pub damping: Option<f64>,
    /// Distance from the target below which the spring may rest (default: 0.5).
    pub rest_threshold: f64,
    /// Speed (units/s) below which the spring may rest (default: 1.0).
    pub rest_velocity: f64,
    /// Settles still running after this long snap to their target (default: 2000).
    pub max_settle_ms: u64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            collapsed_extent: 80.0,
            expanded_extent: 800.0,
            min_gesture_movement: 5.0,
            velocity_threshold: 0.3,
            distance_threshold: 30.0,
            bounce_damping: 0.3,
            max_overscroll: 60.0,
            max_release_velocity: 10.0,
            stiffness: 260.0,
            damping: None,
            rest_threshold: 0.5,
            rest_velocity: 1.0,
            max_settle_ms: 2_000,
        }
    }
}

impl PanelConfig {
    /// Config for a panel whose travel spans `max_offset` units.
    #[must_use]
    pub fn with_travel(max_offset: f64) -> Self {
        let base = Self::default();
        Self {
            expanded_extent: base.collapsed_extent + max_offset,
            ..base
        }
    }

    #[must_use]
    pub fn with_extents(mut self, collapsed: f64, expanded: f64) -> Self {
        self.collapsed_extent = collapsed;
        self.expanded_extent = expanded;
        self
    }

    #[must_use]
    pub fn with_thresholds(mut self, velocity: f64, distance: f64) -> Self {
        self.velocity_threshold = velocity;
        self.distance_threshold = distance;
        self
    }

    #[must_use]
    pub fn with_bounce(mut self, damping: f64, max_overscroll: f64) -> Self {
        self.bounce_damping = damping;
        self.max_overscroll = max_overscroll;
        self
    }

    #[must_use]
    pub fn with_spring(mut self, stiffness: f64, damping: Option<f64>) -> Self {
        self.stiffness = stiffness;
        self.damping = damping;
        self
    }

    /// Full travel of the panel: `expanded_extent - collapsed_extent`.
    #[inline]
    #[must_use]
    pub fn max_offset(&self) -> f64 {
        self.expanded_extent - self.collapsed_extent
    }

    /// Damping actually used by the settle spring.
    #[must_use]
    pub fn effective_damping(&self) -> f64 {
        self.damping
            .unwrap_or_else(|| 2.0 * self.stiffness.max(0.0).sqrt())
    }

    #[must_use]
    pub fn max_settle_duration(&self) -> Duration {
        Duration::from_millis(self.max_settle_ms)
    }

    /// Parse a config from JSON; missing fields fall back to defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|err| PanelError::invalid_config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants listed in the module docs.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("collapsed_extent", self.collapsed_extent),
            ("expanded_extent", self.expanded_extent),
            ("min_gesture_movement", self.min_gesture_movement),
            ("velocity_threshold", self.velocity_threshold),
            ("distance_threshold", self.distance_threshold),
            ("bounce_damping", self.bounce_damping),
            ("max_overscroll", self.max_overscroll),
            ("max_release_velocity", self.max_release_velocity),
            ("stiffness", self.stiffness),
            ("rest_threshold", self.rest_threshold),
            ("rest_velocity", self.rest_velocity),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(PanelError::invalid_config(format!("{name} must be finite")));
            }
        }

        if self.collapsed_extent < 0.0 {
            return Err(PanelError::invalid_config(
                "collapsed_extent must not be negative",
            ));
        }
        if self.expanded_extent <= self.collapsed_extent {
            return Err(PanelError::invalid_config(format!(
                "expanded_extent ({}) must exceed collapsed_extent ({})",
                self.expanded_extent, self.collapsed_extent
            )));
        }
        if !(0.0..=1.0).contains(&self.bounce_damping) {
            return Err(PanelError::invalid_config(
                "bounce_damping must lie in [0, 1]",
            ));
        }
        if self.max_overscroll < 0.0 || self.min_gesture_movement < 0.0 {
            return Err(PanelError::invalid_config(
                "max_overscroll and min_gesture_movement must not be negative",
            ));
        }

        let positive = [
            ("velocity_threshold", self.velocity_threshold),
            ("distance_threshold", self.distance_threshold),
            ("max_release_velocity", self.max_release_velocity),
            ("stiffness", self.stiffness),
            ("rest_threshold", self.rest_threshold),
            ("rest_velocity", self.rest_velocity),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(PanelError::invalid_config(format!("{name} must be positive")));
            }
        }

        if let Some(damping) = self.damping
            && !(damping.is_finite() && damping > 0.0)
        {
            return Err(PanelError::invalid_config(
                "damping must be finite and positive",
            ));
        }
        if self.max_settle_ms == 0 {
            return Err(PanelError::invalid_config("max_settle_ms must be non-zero"));
        }

        Ok(())
    }
}
