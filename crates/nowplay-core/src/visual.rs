#![forbid(unsafe_code)]

//! Visual parameters derived from the panel offset.
//!
//! [`DerivedVisualState::at`] is a pure function of the offset. Offsets
//! outside `[0, max_offset]` (rubber-band overscroll) are clamped into range
//! first, so every output holds its edge value while the panel bounces:
//! opacities stay in `[0, 1]` and the action button scale stays in
//! `[ACTION_BUTTON_MIN_SCALE, 1]`.
//!
//! | Output | 0 | 0.3·max | 0.4·max | max |
//! |--------|---|---------|---------|-----|
//! | `list_opacity` | 0 | 1 | 1 | 1 |
//! | `expanded_opacity` | 1 | 0.25 | 0 | 0 |
//! | `collapsed_opacity` | 0 | 0 | 0 | 1 |
//! | `action_button_scale` | 1 | 0.985 | 0.98 | 0.95 |

use serde::Serialize;

/// Fraction of the travel over which the background list fades in.
pub const LIST_FADE_END: f64 = 0.3;

/// Fraction of the travel where the expanded view is gone and the
/// collapsed view starts to appear.
pub const CROSSFADE_SPLIT: f64 = 0.4;

/// Scale of the floating action button when fully collapsed.
pub const ACTION_BUTTON_MIN_SCALE: f32 = 0.95;

/// Render parameters for one panel offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedVisualState {
    pub list_opacity: f32,
    pub collapsed_opacity: f32,
    pub expanded_opacity: f32,
    pub action_button_scale: f32,
}

impl DerivedVisualState {
    /// Visual state for `offset` on a panel with travel `max_offset`.
    #[must_use]
    pub fn at(offset: f64, max_offset: f64) -> Self {
        if max_offset.is_nan() || max_offset <= 0.0 {
            return Self::EXPANDED;
        }
        let t = if offset.is_nan() {
            0.0
        } else {
            (offset / max_offset).clamp(0.0, 1.0)
        };

        Self {
            list_opacity: ramp(t, 0.0, LIST_FADE_END),
            collapsed_opacity: ramp(t, CROSSFADE_SPLIT, 1.0),
            expanded_opacity: 1.0 - ramp(t, 0.0, CROSSFADE_SPLIT),
            action_button_scale: 1.0 - (1.0 - ACTION_BUTTON_MIN_SCALE) * t as f32,
        }
    }

    /// Fully expanded visuals.
    pub const EXPANDED: Self = Self {
        list_opacity: 0.0,
        collapsed_opacity: 0.0,
        expanded_opacity: 1.0,
        action_button_scale: 1.0,
    };

    /// Fully collapsed visuals.
    pub const COLLAPSED: Self = Self {
        list_opacity: 1.0,
        collapsed_opacity: 1.0,
        expanded_opacity: 0.0,
        action_button_scale: ACTION_BUTTON_MIN_SCALE,
    };
}

/// 0 at or below `start`, 1 at or above `end`, linear between.
fn ramp(t: f64, start: f64, end: f64) -> f32 {
    (((t - start) / (end - start)).clamp(0.0, 1.0)) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: f64 = 300.0;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn endpoints_match_constants() {
        assert_eq!(DerivedVisualState::at(0.0, MAX), DerivedVisualState::EXPANDED);
        assert_eq!(DerivedVisualState::at(MAX, MAX), DerivedVisualState::COLLAPSED);
    }

    #[test]
    fn list_fades_in_over_first_thirty_percent() {
        assert!(close(DerivedVisualState::at(45.0, MAX).list_opacity, 0.5));
        assert!(close(DerivedVisualState::at(90.0, MAX).list_opacity, 1.0));
        assert!(close(DerivedVisualState::at(200.0, MAX).list_opacity, 1.0));
    }

    #[test]
    fn expanded_view_fades_out_by_forty_percent() {
        assert!(close(DerivedVisualState::at(60.0, MAX).expanded_opacity, 0.5));
        assert!(close(DerivedVisualState::at(120.0, MAX).expanded_opacity, 0.0));
        assert!(close(DerivedVisualState::at(250.0, MAX).expanded_opacity, 0.0));
    }

    #[test]
    fn collapsed_view_fades_in_after_forty_percent() {
        assert!(close(DerivedVisualState::at(100.0, MAX).collapsed_opacity, 0.0));
        assert!(close(DerivedVisualState::at(120.0, MAX).collapsed_opacity, 0.0));
        assert!(close(DerivedVisualState::at(210.0, MAX).collapsed_opacity, 0.5));
    }

    #[test]
    fn action_button_scales_linearly() {
        assert!(close(DerivedVisualState::at(150.0, MAX).action_button_scale, 0.975));
    }

    #[test]
    fn overscroll_holds_edge_values() {
        assert_eq!(DerivedVisualState::at(-40.0, MAX), DerivedVisualState::EXPANDED);
        assert_eq!(DerivedVisualState::at(MAX + 40.0, MAX), DerivedVisualState::COLLAPSED);
    }

    #[test]
    fn degenerate_inputs_fall_back_to_expanded() {
        assert_eq!(DerivedVisualState::at(f64::NAN, MAX), DerivedVisualState::EXPANDED);
        assert_eq!(DerivedVisualState::at(10.0, 0.0), DerivedVisualState::EXPANDED);
    }

    #[test]
    fn idempotent() {
        let a = DerivedVisualState::at(137.5, MAX);
        let b = DerivedVisualState::at(137.5, MAX);
        assert_eq!(a, b);
    }
}
