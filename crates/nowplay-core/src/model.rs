#![forbid(unsafe_code)]

//! Panel state shared between the drag tracker and the settle animator.

use serde::{Deserialize, Serialize};

/// Committed resting state of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelState {
    Expanded,
    Collapsed,
}

impl PanelState {
    /// Resting offset for this state on a panel with travel `max_offset`.
    #[inline]
    #[must_use]
    pub fn offset(self, max_offset: f64) -> f64 {
        match self {
            Self::Expanded => 0.0,
            Self::Collapsed => max_offset,
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Expanded => Self::Collapsed,
            Self::Collapsed => Self::Expanded,
        }
    }
}

/// Externally observable phase of the panel state machine.
///
/// `Dragging` and `Settling` are transient; every path out of them ends in
/// one of the committed phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelPhase {
    Expanded,
    Collapsed,
    Dragging,
    Settling { target: PanelState },
}

impl PanelPhase {
    #[inline]
    #[must_use]
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Dragging | Self::Settling { .. })
    }
}

impl From<PanelState> for PanelPhase {
    fn from(state: PanelState) -> Self {
        match state {
            PanelState::Expanded => Self::Expanded,
            PanelState::Collapsed => Self::Collapsed,
        }
    }
}

/// The single authoritative offset and committed state.
///
/// Only one writer touches `offset` at a time: the gesture tracker while
/// dragging, the settle animator while settling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelModel {
    pub offset: f64,
    pub state: PanelState,
}

impl PanelModel {
    #[must_use]
    pub fn new(offset: f64, state: PanelState) -> Self {
        Self { offset, state }
    }

    /// Model resting at `state`.
    #[must_use]
    pub fn at_rest(state: PanelState, max_offset: f64) -> Self {
        Self::new(state.offset(max_offset), state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resting_offsets() {
        assert_eq!(PanelState::Expanded.offset(300.0), 0.0);
        assert_eq!(PanelState::Collapsed.offset(300.0), 300.0);
        let model = PanelModel::at_rest(PanelState::Collapsed, 720.0);
        assert_eq!(model.offset, 720.0);
    }

    #[test]
    fn phase_from_state_is_committed() {
        assert!(!PanelPhase::from(PanelState::Expanded).is_transient());
        assert!(PanelPhase::Dragging.is_transient());
        assert!(
            PanelPhase::Settling {
                target: PanelState::Collapsed
            }
            .is_transient()
        );
    }

    #[test]
    fn opposite_flips() {
        assert_eq!(PanelState::Expanded.opposite(), PanelState::Collapsed);
        assert_eq!(PanelState::Collapsed.opposite(), PanelState::Expanded);
    }
}
