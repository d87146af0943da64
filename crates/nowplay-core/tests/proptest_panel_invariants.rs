//! Property-based invariant tests for the panel controller.
//!
//! 1. The offset stays inside the overscroll band at every sample
//! 2. The offset is inside `[0, max_offset]` whenever the panel is at rest
//! 3. Release classification is deterministic
//! 4. Every settle terminates and commits the commanded target
//! 5. Derived visuals are idempotent and monotone along each ramp
//! 6. Malformed samples never move the offset

use nowplay_core::{
    DerivedVisualState, GestureSample, ManualScheduler, PanelConfig, PanelController, PanelPhase,
    PanelState, classify_release,
};
use proptest::prelude::*;
use web_time::Duration;

const MAX: f64 = 300.0;
const OVERSCROLL: f64 = 60.0;
const FRAME: Duration = Duration::from_millis(16);

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Start,
    Move(f64, f64),
    End(f64, f64),
    Cancel,
    Collapse,
    Expand,
    Frames(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Start),
        (-2_000.0f64..2_000.0, -3.0f64..3.0).prop_map(|(dy, vy)| Op::Move(dy, vy)),
        (-2_000.0f64..2_000.0, -3.0f64..3.0).prop_map(|(dy, vy)| Op::End(dy, vy)),
        Just(Op::Cancel),
        Just(Op::Collapse),
        Just(Op::Expand),
        (1u8..40).prop_map(Op::Frames),
    ]
}

fn initial_strategy() -> impl Strategy<Value = PanelState> {
    prop_oneof![Just(PanelState::Expanded), Just(PanelState::Collapsed)]
}

fn controller(initial: PanelState) -> PanelController {
    PanelController::new(PanelConfig::with_travel(MAX), initial, ManualScheduler::new()).unwrap()
}

fn in_band(offset: f64) -> bool {
    (-OVERSCROLL..=MAX + OVERSCROLL).contains(&offset)
}

fn apply(ctl: &mut PanelController, op: &Op) {
    match *op {
        Op::Start => {
            ctl.on_gesture_start();
        }
        Op::Move(dy, vy) => {
            ctl.on_gesture_move(&GestureSample::vertical(dy, vy));
        }
        Op::End(dy, vy) => {
            ctl.on_gesture_end(&GestureSample::vertical(dy, vy));
        }
        Op::Cancel => {
            ctl.on_gesture_cancel();
        }
        Op::Collapse => {
            ctl.request_collapse();
        }
        Op::Expand => {
            ctl.request_expand();
        }
        Op::Frames(n) => {
            if let Some(generation) = ctl.pending_generation() {
                for _ in 0..n {
                    if !ctl.on_frame(generation, FRAME) {
                        break;
                    }
                }
            }
        }
    }
}

fn drain(ctl: &mut PanelController) {
    if let Some(generation) = ctl.pending_generation() {
        let mut frames = 0;
        while ctl.on_frame(generation, FRAME) {
            frames += 1;
            assert!(frames < 500, "settle did not terminate");
        }
    }
}

proptest! {
    #[test]
    fn offset_stays_in_band(
        initial in initial_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..60),
    ) {
        let mut ctl = controller(initial);
        for op in &ops {
            apply(&mut ctl, op);
            prop_assert!(in_band(ctl.offset()), "offset {} after {:?}", ctl.offset(), op);
            if !ctl.phase().is_transient() {
                prop_assert!((0.0..=MAX).contains(&ctl.offset()));
            }
        }
    }

    #[test]
    fn every_sequence_reaches_a_committed_state(
        initial in initial_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..60),
    ) {
        let mut ctl = controller(initial);
        for op in &ops {
            apply(&mut ctl, op);
        }
        if ctl.phase() == PanelPhase::Dragging {
            ctl.on_gesture_end(&GestureSample::default());
        }
        drain(&mut ctl);

        let state = ctl.state();
        prop_assert_eq!(ctl.phase(), PanelPhase::from(state));
        prop_assert_eq!(ctl.offset(), state.offset(MAX));
    }

    #[test]
    fn settle_commits_commanded_target(
        dy in -400.0f64..400.0,
        vy in -5.0f64..5.0,
    ) {
        let mut ctl = controller(PanelState::Expanded);
        ctl.on_gesture_start();
        ctl.on_gesture_move(&GestureSample::vertical(dy, vy));
        let decision = ctl.on_gesture_end(&GestureSample::vertical(dy, vy)).unwrap();
        drain(&mut ctl);
        prop_assert_eq!(ctl.state(), decision.target);
    }

    #[test]
    fn classification_is_deterministic(
        velocity in -2.0f64..2.0,
        displacement in -400.0f64..400.0,
        offset in 0.0f64..MAX,
    ) {
        let config = PanelConfig::with_travel(MAX);
        let first = classify_release(velocity, displacement, offset, &config);
        let second = classify_release(velocity, displacement, offset, &config);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn visuals_are_idempotent_and_monotone(a in -100.0f64..400.0, b in -100.0f64..400.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let v_lo = DerivedVisualState::at(lo, MAX);
        let v_hi = DerivedVisualState::at(hi, MAX);

        prop_assert_eq!(v_lo, DerivedVisualState::at(lo, MAX));
        prop_assert!(v_hi.list_opacity >= v_lo.list_opacity);
        prop_assert!(v_hi.collapsed_opacity >= v_lo.collapsed_opacity);
        prop_assert!(v_hi.expanded_opacity <= v_lo.expanded_opacity);
        prop_assert!(v_hi.action_button_scale <= v_lo.action_button_scale);
        for value in [v_hi.list_opacity, v_hi.collapsed_opacity, v_hi.expanded_opacity] {
            prop_assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn malformed_samples_never_move_offset(dy in -300.0f64..300.0, bad in 0usize..4) {
        let mut ctl = controller(PanelState::Expanded);
        ctl.on_gesture_start();
        ctl.on_gesture_move(&GestureSample::vertical(dy, 0.0));
        let before = ctl.offset();

        let mut fields = [0.0, dy, 0.0, 0.0];
        fields[bad] = f64::NAN;
        let sample = GestureSample::new(fields[0], fields[1], fields[2], fields[3]);
        prop_assert!(!ctl.on_gesture_move(&sample));
        prop_assert_eq!(ctl.offset(), before);
    }
}
