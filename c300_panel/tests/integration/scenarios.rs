//! Integration test: the reference scenarios of the program executor and
//! the motion simulator.

use std::time::Duration;

use c300_common::panel::axis::CoordinateSet;
use c300_common::panel::error::{PanelError, ReportKind};
use c300_common::panel::state::{ExecutionMode, OperationMode, RunState};
use c300_panel::state::executor::StepOutcome;

use super::{SECOND, auto_panel, panel, recording_panel};

// ── Scenario A: empty program ───────────────────────────────────────

#[test]
fn empty_program_is_reported_and_stays_stopped() {
    let mut panel = auto_panel("");
    assert_eq!(panel.start(), Err(PanelError::EmptyProgram));
    assert_eq!(panel.run_state(), RunState::Stopped);
    assert_eq!(panel.cursor().total_lines, 0);
    assert!(panel.notifier().contains(ReportKind::Warning, "empty"));
    assert_eq!(panel.next_deadline(), None);
}

#[test]
fn whitespace_only_program_is_empty() {
    let mut panel = auto_panel("\n   \n\t\n");
    assert_eq!(panel.start(), Err(PanelError::EmptyProgram));
    assert_eq!(panel.run_state(), RunState::Stopped);
}

// ── Scenario B: continuous run ──────────────────────────────────────

#[test]
fn continuous_run_steps_every_second_then_stops() {
    let (mut panel, seen) = recording_panel("G0 X1\nG0 Y1\nG0 Z1");

    let outcome = panel.start().unwrap();
    assert!(matches!(outcome, StepOutcome::Scheduled(_)));
    assert_eq!(panel.run_state(), RunState::Running);
    assert_eq!(panel.cursor().progress(), "1/3");
    assert_eq!(panel.highlighted_line(), Some(0));
    assert_eq!(panel.next_deadline(), Some(SECOND));

    // Nothing happens before the interval elapses.
    panel.advance_to(Duration::from_millis(999));
    assert_eq!(panel.cursor().progress(), "1/3");

    panel.advance_to(SECOND);
    assert_eq!(panel.cursor().progress(), "2/3");
    assert_eq!(panel.highlighted_line(), Some(1));
    assert_eq!(panel.next_deadline(), Some(2 * SECOND));

    panel.advance_to(2 * SECOND);
    assert_eq!(panel.run_state(), RunState::Stopped);
    assert_eq!(panel.cursor().current_line, 0);
    assert_eq!(panel.cursor().total_lines, 0);
    assert_eq!(panel.highlighted_line(), None);
    assert_eq!(panel.next_deadline(), None);

    let lines: Vec<String> = seen.lock().iter().map(|(_, l)| l.clone()).collect();
    assert_eq!(lines, ["G0 X1", "G0 Y1", "G0 Z1"]);
    assert!(panel.notifier().contains(ReportKind::Info, "program finished"));
}

#[test]
fn advancing_far_ahead_fires_steps_in_order() {
    let (mut panel, seen) = recording_panel("A\nB\nC\nD");
    panel.start().unwrap();
    panel.advance_to(10 * SECOND);

    let indices: Vec<usize> = seen.lock().iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, [0, 1, 2, 3]);
    assert_eq!(panel.run_state(), RunState::Stopped);
}

// ── Scenario C: single-step run ─────────────────────────────────────

#[test]
fn single_step_run_needs_start_for_every_line() {
    let (mut panel, seen) = recording_panel("L1\nL2\nL3");
    assert_eq!(panel.toggle_execution_mode(), Ok(ExecutionMode::SingleStep));

    assert_eq!(panel.start(), Ok(StepOutcome::AwaitingResume));
    assert_eq!(panel.run_state(), RunState::SingleStepPaused);
    assert_eq!(panel.cursor().progress(), "1/3");

    // Time alone does not advance a single-step run.
    panel.advance_by(5 * SECOND);
    assert_eq!(seen.lock().len(), 1);

    assert_eq!(panel.start(), Ok(StepOutcome::AwaitingResume));
    assert_eq!(panel.cursor().progress(), "2/3");

    assert_eq!(panel.start(), Ok(StepOutcome::Finished));
    assert_eq!(panel.run_state(), RunState::Stopped);
    assert_eq!(seen.lock().len(), 3);
}

#[test]
fn switching_to_continuous_mid_run_resumes_with_timer() {
    let (mut panel, seen) = recording_panel("L1\nL2\nL3");
    panel.toggle_execution_mode().unwrap();
    panel.start().unwrap();

    panel.toggle_execution_mode().unwrap();
    assert!(matches!(panel.start(), Ok(StepOutcome::Scheduled(_))));
    panel.advance_by(SECOND);
    assert_eq!(panel.run_state(), RunState::Stopped);
    assert_eq!(seen.lock().len(), 3);
}

// ── Pause / resume ──────────────────────────────────────────────────

#[test]
fn pause_holds_the_cursor_and_resume_continues() {
    let (mut panel, seen) = recording_panel("L1\nL2\nL3");
    panel.start().unwrap();
    panel.advance_to(Duration::from_millis(500));
    panel.pause().unwrap();
    assert_eq!(panel.run_state(), RunState::Paused);

    panel.advance_to(10 * SECOND);
    assert_eq!(seen.lock().len(), 1);
    assert_eq!(panel.cursor().progress(), "1/3");

    assert_eq!(panel.pause(), Err(PanelError::AlreadyPaused));

    panel.start().unwrap();
    assert_eq!(panel.cursor().progress(), "2/3");
    assert!(panel.notifier().contains(ReportKind::Info, "program resumed"));
    panel.advance_by(SECOND);
    assert_eq!(panel.run_state(), RunState::Stopped);
    assert_eq!(seen.lock().len(), 3);
}

#[test]
fn invalid_run_commands_are_warnings() {
    let mut panel = auto_panel("L1\nL2");
    assert_eq!(panel.pause(), Err(PanelError::NotRunning));
    panel.start().unwrap();
    assert_eq!(panel.start(), Err(PanelError::AlreadyRunning));
    assert_eq!(panel.cursor().progress(), "1/2");
    assert_eq!(panel.notifier().count(ReportKind::Warning), 2);
}

#[test]
fn stop_mid_run_cancels_the_pending_step() {
    let (mut panel, seen) = recording_panel("L1\nL2\nL3");
    panel.start().unwrap();
    assert_eq!(panel.stop(), Ok(RunState::Running));
    assert_eq!(panel.next_deadline(), None);

    panel.advance_to(5 * SECOND);
    assert_eq!(seen.lock().len(), 1);

    // A fresh start begins at line 0 again.
    panel.start().unwrap();
    assert_eq!(panel.cursor().progress(), "1/3");
    assert_eq!(seen.lock().last().map(|(i, _)| *i), Some(0));
}

// ── Scenario D: move to position ────────────────────────────────────

#[test]
fn move_to_position_takes_tenth_second_per_unit() {
    let mut panel = panel("");
    let duration = panel.move_to_position("Corner").unwrap();
    assert!((duration.as_secs_f64() - 0.7).abs() < 1e-9);
    assert!(panel.is_moving());
    assert!(panel.motion_status().is_moving());

    panel.advance_to(Duration::from_millis(699));
    assert_eq!(panel.coordinates(), CoordinateSet::ORIGIN);

    panel.advance_to(Duration::from_millis(700));
    assert!(!panel.is_moving());
    assert_eq!(panel.coordinates(), CoordinateSet::new(3.0, 4.0, 0.0, 0.0));
}

#[test]
fn short_move_takes_the_minimum_time() {
    let mut panel = panel("");
    let duration = panel.move_to_values(["0.1", "0", "0", "0"]).unwrap();
    assert_eq!(duration, Duration::from_millis(500));
}

// ── Scenario E: mode locked while running ───────────────────────────

#[test]
fn operation_mode_is_locked_while_running() {
    let mut panel = auto_panel("L1\nL2");
    panel.start().unwrap();

    assert_eq!(panel.toggle_operation_mode(), Err(PanelError::ModeLocked));
    assert_eq!(panel.modes().operation, OperationMode::Auto);
    assert!(panel.notifier().contains(ReportKind::Warning, "stop the program"));

    panel.pause().unwrap();
    assert_eq!(panel.toggle_operation_mode(), Err(PanelError::ModeLocked));

    panel.stop().unwrap();
    assert_eq!(panel.toggle_operation_mode(), Ok(OperationMode::Manual));
}
