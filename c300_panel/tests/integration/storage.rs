//! Integration test: the controller over the file-backed stores.

use std::fs;
use std::path::Path;

use c300_common::io::config::{IoDefinition, IoKind};
use c300_common::panel::axis::{Axis, Direction};
use c300_common::panel::error::ReportKind;
use c300_panel::config::PanelConfig;
use c300_panel::controller::{Collaborators, PanelController};
use c300_panel::notify::RecordingNotifier;
use c300_panel::scheduler::TimerQueue;
use c300_panel::state::executor::LogLineHandler;
use c300_panel::store::{
    IoDefinitionStore, PositionStore, StoreError, TextProgram, TomlIoStore, TomlPositionStore,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

use super::TestPanel;

struct Unreachable;

impl IoDefinitionStore for Unreachable {
    fn load(&self) -> Result<Vec<IoDefinition>, StoreError> {
        Err(StoreError::Format("store unreachable".to_string()))
    }
}

fn file_panel(dir: &Path, io: Box<dyn IoDefinitionStore + Send>) -> TestPanel {
    let mut config = PanelConfig::default();
    config.resolve_storage(dir);
    let collaborators = Collaborators {
        program: Box::new(TextProgram::from_text("")),
        io,
        positions: Box::new(TomlPositionStore::new(&config.storage.positions)),
        line_handler: Box::new(LogLineHandler),
    };
    PanelController::new(
        &config,
        collaborators,
        &mut StdRng::seed_from_u64(1),
        TimerQueue::new(),
        RecordingNotifier::new(),
    )
}

#[test]
fn failed_io_load_leaves_panel_empty() {
    let dir = TempDir::new().unwrap();
    let mut panel = file_panel(dir.path(), Box::new(Unreachable));

    assert!(panel.io().is_empty());
    assert_eq!(panel.notifier().count(ReportKind::Error), 1);
    assert!(panel.notifier().contains(ReportKind::Error, "unreachable"));
    assert_eq!(panel.toggle_output("Cylinder1"), None);
}

#[test]
fn corrupt_io_file_is_an_error_not_a_partial_panel() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("io.toml");
    fs::write(
        &path,
        "[[io]]\nname = \"Sensor1\"\nkind = \"input\"\n\n[[io]]\nname = \"Sensor1\"\nkind = \"output\"\n",
    )
    .unwrap();

    let panel = file_panel(dir.path(), Box::new(TomlIoStore::new(&path)));
    assert!(panel.io().is_empty());
    assert_eq!(panel.notifier().count(ReportKind::Error), 1);
}

#[test]
fn missing_io_file_is_created_with_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("io.toml");
    let mut panel = file_panel(dir.path(), Box::new(TomlIoStore::new(&path)));

    assert!(path.exists());
    assert_eq!(panel.io().of_kind(IoKind::Input).count(), 3);
    assert_eq!(panel.io().of_kind(IoKind::Output).count(), 3);
    assert_eq!(panel.toggle_output("Cylinder3"), Some(true));
}

#[test]
fn positions_round_trip_through_the_file() {
    let dir = TempDir::new().unwrap();
    let mut panel = file_panel(dir.path(), Box::new(TomlIoStore::new(dir.path().join("io.toml"))));

    panel.jog(Axis::X, Direction::Positive, 10.0).unwrap();
    assert_eq!(panel.add_position().unwrap(), "Point_1");
    panel.edit_position("Point_1", Axis::C, "180").unwrap();
    assert_eq!(panel.save_position_edits(), Ok(1));

    let stored = TomlPositionStore::new(dir.path().join("positions.toml"))
        .list()
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].coords.x, 10.0);
    assert_eq!(stored[0].coords.c, 180.0);

    // A fresh panel sees the stored row and can move to it.
    let mut reopened = file_panel(dir.path(), Box::new(TomlIoStore::new(dir.path().join("io.toml"))));
    assert_eq!(reopened.positions().len(), 1);
    let duration = reopened.move_to_position("Point_1").unwrap();
    reopened.advance_by(duration);
    assert_eq!(reopened.coordinates().c, 180.0);
}

#[test]
fn corrupt_positions_file_reports_and_leaves_table_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("positions.toml"), "[[point]]\nname = 1\n").unwrap();
    let panel = file_panel(dir.path(), Box::new(TomlIoStore::new(dir.path().join("io.toml"))));

    assert!(panel.positions().is_empty());
    assert!(panel.notifier().contains(ReportKind::Error, "positions"));
}
