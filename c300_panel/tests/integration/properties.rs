//! Property tests: jog arithmetic, move duration, cursor bounds.

use std::time::Duration;

use c300_common::panel::axis::{Axis, CoordinateSet, Direction};
use c300_common::panel::state::{ExecutionMode, RunState};
use c300_panel::motion::MotionSimulator;
use c300_panel::state::coords::CoordinateState;
use proptest::prelude::*;

use super::{SECOND, recording_panel};

fn axis() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::X), Just(Axis::Y), Just(Axis::Z), Just(Axis::C)]
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Negative), Just(Direction::Positive)]
}

fn coords() -> impl Strategy<Value = CoordinateSet> {
    (-500.0..500.0f64, -500.0..500.0f64, -500.0..500.0f64, -360.0..360.0f64)
        .prop_map(|(x, y, z, c)| CoordinateSet::new(x, y, z, c))
}

/// Program operations applied in random order.
#[derive(Debug, Clone, Copy)]
enum Op {
    Start,
    Pause,
    Stop,
    ToggleExecution,
    Advance(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Start),
        1 => Just(Op::Pause),
        1 => Just(Op::Stop),
        1 => Just(Op::ToggleExecution),
        4 => (0u64..2500).prop_map(Op::Advance),
    ]
}

proptest! {
    #[test]
    fn jog_changes_only_the_jogged_axis(
        start in coords(),
        axis in axis(),
        direction in direction(),
        distance in 0.001..100.0f64,
    ) {
        let mut state = CoordinateState::new();
        state.set_all(start);
        let value = state.jog(axis, direction, distance).unwrap();

        prop_assert_eq!(value, start.get(axis) + direction.sign() * distance);
        for other in Axis::ALL.into_iter().filter(|a| *a != axis) {
            prop_assert_eq!(state.get(other), start.get(other));
        }
    }

    #[test]
    fn non_positive_jog_is_rejected(start in coords(), axis in axis(), distance in -100.0..=0.0f64) {
        let mut state = CoordinateState::new();
        state.set_all(start);
        prop_assert!(state.jog(axis, Direction::Positive, distance).is_err());
        prop_assert_eq!(state.current(), start);
    }

    #[test]
    fn move_duration_is_floored_and_monotonic(
        from in coords(),
        to in coords(),
        extra in 0.0..100.0f64,
        axis in axis(),
    ) {
        let sim = MotionSimulator::default();
        let base = sim.move_to(&from, &to).unwrap();
        prop_assert!(base >= Duration::from_millis(500));

        // Pushing one axis further away never shortens the move.
        let mut further = to;
        let delta = to.get(axis) - from.get(axis);
        further.set(axis, to.get(axis) + if delta >= 0.0 { extra } else { -extra });
        let longer = sim.move_to(&from, &further).unwrap();
        prop_assert!(longer >= base);
    }

    #[test]
    fn cursor_never_passes_total(
        lines in 1usize..8,
        ops in proptest::collection::vec(op(), 1..40),
    ) {
        let program: Vec<String> = (0..lines).map(|i| format!("N{i}")).collect();
        let (mut panel, seen) = recording_panel(&program.join("\n"));

        for op in ops {
            match op {
                Op::Start => { let _ = panel.start(); }
                Op::Pause => { let _ = panel.pause(); }
                Op::Stop => { let _ = panel.stop(); }
                Op::ToggleExecution => { let _ = panel.toggle_execution_mode(); }
                Op::Advance(ms) => panel.advance_by(Duration::from_millis(ms)),
            }

            let cursor = panel.cursor();
            prop_assert!(cursor.current_line <= cursor.total_lines);
            if cursor.total_lines > 0 {
                prop_assert!(cursor.current_line < cursor.total_lines);
                prop_assert!(!panel.run_state().is_stopped());
            } else {
                prop_assert_eq!(panel.run_state(), RunState::Stopped);
            }
            if panel.run_state() != RunState::Running {
                prop_assert_eq!(panel.next_deadline(), None);
            }
        }

        // Every processed line was processed in program order within a run.
        for pair in seen.lock().windows(2) {
            prop_assert!(pair[1].0 == pair[0].0 + 1 || pair[1].0 == 0);
        }
    }

    #[test]
    fn continuous_run_finishes_after_one_interval_per_line(lines in 1usize..10) {
        let program: Vec<String> = (0..lines).map(|i| format!("N{i}")).collect();
        let (mut panel, seen) = recording_panel(&program.join("\n"));
        prop_assert_eq!(panel.modes().execution, ExecutionMode::Continuous);

        panel.start().unwrap();
        if lines > 1 {
            panel.advance_by(SECOND * (lines as u32 - 2));
            prop_assert_eq!(panel.run_state(), RunState::Running);
            panel.advance_by(SECOND);
        }
        prop_assert_eq!(panel.run_state(), RunState::Stopped);
        prop_assert_eq!(seen.lock().len(), lines);
    }
}
