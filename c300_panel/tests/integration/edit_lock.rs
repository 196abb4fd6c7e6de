//! Integration test: edit lock dominance and stop idempotence.

use c300_common::panel::axis::{Axis, CoordinateSet, Direction};
use c300_common::panel::error::{PanelError, ReportKind};
use c300_common::panel::state::{ExecutionMode, RunState};
use c300_panel::state::mode::ControlSurfaces;

use super::{SECOND, auto_panel, panel};

#[test]
fn edit_lock_blocks_manual_controls() {
    let mut panel = panel("");
    panel.edit_position("Corner", Axis::X, "9").unwrap();
    assert!(panel.edit_lock());

    assert_eq!(
        panel.jog(Axis::X, Direction::Positive, 1.0),
        Err(PanelError::EditLocked)
    );
    assert_eq!(panel.toggle_output("Cylinder1"), None);
    assert_eq!(panel.io().state("Cylinder1"), Some(false));
    assert_eq!(panel.move_to_position("Home"), Err(PanelError::EditLocked));
    assert_eq!(panel.set_jog_distance("5"), Err(PanelError::EditLocked));
    assert_eq!(panel.jog_distance(), 1.0);
    assert_eq!(panel.toggle_operation_mode(), Err(PanelError::EditLocked));
    assert_eq!(panel.coordinates(), CoordinateSet::ORIGIN);

    // Rejections under the edit lock are silent.
    assert_eq!(panel.notifier().count(ReportKind::Warning), 0);
}

#[test]
fn edit_lock_blocks_run_controls() {
    let mut panel = auto_panel("L1\nL2");
    panel.edit_position("Home", Axis::C, "45").unwrap();

    assert_eq!(panel.start(), Err(PanelError::EditLocked));
    assert_eq!(panel.pause(), Err(PanelError::EditLocked));
    assert_eq!(panel.toggle_execution_mode(), Err(PanelError::EditLocked));
    assert_eq!(panel.modes().execution, ExecutionMode::Continuous);
    assert_eq!(panel.run_state(), RunState::Stopped);
    assert_eq!(panel.surfaces(), ControlSurfaces::TABLE);
}

#[test]
fn edit_lock_freezes_a_running_program() {
    let mut panel = auto_panel("L1\nL2\nL3");
    panel.start().unwrap();
    panel.edit_position("Home", Axis::Y, "2").unwrap();
    let cursor = panel.cursor();

    assert_eq!(panel.surfaces(), ControlSurfaces::TABLE);
    assert_eq!(panel.pause(), Err(PanelError::EditLocked));
    assert_eq!(panel.stop(), Err(PanelError::EditLocked));
    assert_eq!(panel.run_state(), RunState::Running);
    assert_eq!(panel.cursor(), cursor);
    assert!(panel.notifier().reports().iter().all(|r| r.kind != ReportKind::Warning));

    // Once the edits are gone, stop works again.
    panel.discard_position_edits();
    assert_eq!(panel.stop(), Ok(RunState::Running));
    assert_eq!(panel.run_state(), RunState::Stopped);
    assert_eq!(panel.next_deadline(), None);
}

#[test]
fn saving_restores_the_mode_matrix() {
    let mut panel = panel("");
    panel.edit_position("Corner", Axis::Z, "-2").unwrap();
    panel.save_position_edits().unwrap();

    assert!(!panel.edit_lock());
    assert_eq!(panel.surfaces(), ControlSurfaces::MANUAL);
    assert_eq!(panel.jog(Axis::Z, Direction::Negative, 1.0), Ok(-1.0));
    assert_eq!(panel.toggle_output("Cylinder1"), Some(true));
}

#[test]
fn invalid_edit_does_not_engage_the_lock() {
    let mut panel = panel("");
    assert!(matches!(
        panel.edit_position("Corner", Axis::X, "abc"),
        Err(PanelError::InvalidTarget { axis: Axis::X, .. })
    ));
    assert!(!panel.edit_lock());
    assert_eq!(panel.notifier().count(ReportKind::Warning), 1);
}

#[test]
fn structural_table_changes_refused_while_locked() {
    let mut panel = panel("");
    panel.edit_position("Home", Axis::X, "1").unwrap();
    assert_eq!(panel.add_position(), Err(PanelError::EditLocked));
    assert_eq!(panel.delete_position("Corner"), Err(PanelError::EditLocked));
    assert_eq!(panel.positions().len(), 2);

    panel.discard_position_edits();
    assert_eq!(panel.add_position().as_deref(), Ok("Point_3"));
}

#[test]
fn stop_twice_yields_the_same_terminal_state() {
    let mut panel = auto_panel("L1\nL2\nL3");
    panel.start().unwrap();
    panel.advance_by(SECOND);

    assert_eq!(panel.stop(), Ok(RunState::Running));
    let first = (panel.run_state(), panel.cursor(), panel.highlighted_line());
    assert_eq!(panel.stop(), Ok(RunState::Stopped));
    let second = (panel.run_state(), panel.cursor(), panel.highlighted_line());

    assert_eq!(first, second);
    assert_eq!(first.0, RunState::Stopped);
    assert_eq!(first.1.current_line, 0);
    assert_eq!(first.1.total_lines, 0);
    assert_eq!(panel.notifier().count(ReportKind::Info), 2);
}

#[test]
fn stop_while_stopped_is_quiet() {
    let mut panel = auto_panel("L1");
    assert_eq!(panel.stop(), Ok(RunState::Stopped));
    assert!(panel.notifier().reports().is_empty());
}

#[test]
fn rename_goes_through_the_table_surface() {
    let mut panel = panel("");
    assert_eq!(panel.rename_position("Corner", "Bench").as_deref(), Ok("Bench"));
    assert!(panel.table().get("Bench").is_some());
    assert_eq!(panel.move_to_position("Bench"), Ok(std::time::Duration::from_millis(700)));

    let mut panel = super::panel("");
    panel.edit_position("Home", Axis::X, "1").unwrap();
    assert_eq!(panel.rename_position("Corner", "Bench"), Err(PanelError::EditLocked));
    assert!(panel.table().get("Corner").is_some());
}
