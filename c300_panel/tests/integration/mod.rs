//! Shared fixtures for the integration tests.

mod edit_lock;
mod properties;
mod scenarios;
mod storage;

use std::time::Duration;

use c300_common::io::config::IoConfig;
use c300_common::panel::axis::{CoordinateSet, Position};
use c300_panel::config::PanelConfig;
use c300_panel::controller::{Collaborators, PanelController};
use c300_panel::notify::RecordingNotifier;
use c300_panel::scheduler::TimerQueue;
use c300_panel::state::executor::LogLineHandler;
use c300_panel::store::{MemoryPositionStore, TextProgram};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub type TestPanel = PanelController<RecordingNotifier, TimerQueue>;

pub const SECOND: Duration = Duration::from_secs(1);

pub fn positions() -> Vec<Position> {
    vec![
        Position::new("Home", CoordinateSet::ORIGIN),
        Position::new("Corner", CoordinateSet::new(3.0, 4.0, 0.0, 0.0)),
    ]
}

/// Manual-mode panel with default I/O, the fixture positions and `program`.
pub fn panel(program: &str) -> TestPanel {
    let collaborators = Collaborators {
        program: Box::new(TextProgram::from_text(program)),
        io: Box::new(IoConfig::defaults()),
        positions: Box::new(MemoryPositionStore::new(positions())),
        line_handler: Box::new(LogLineHandler),
    };
    PanelController::new(
        &PanelConfig::default(),
        collaborators,
        &mut StdRng::seed_from_u64(42),
        TimerQueue::new(),
        RecordingNotifier::new(),
    )
}

/// Same as [`panel`], switched to Auto.
pub fn auto_panel(program: &str) -> TestPanel {
    let mut panel = panel(program);
    panel
        .toggle_operation_mode()
        .expect("switch to auto from power-on state");
    panel.notifier_mut().take();
    panel
}

/// Auto-mode panel whose line handler records every processed line.
pub fn recording_panel(program: &str) -> (TestPanel, std::sync::Arc<parking_lot::Mutex<Vec<(usize, String)>>>) {
    let seen = std::sync::Arc::new(parking_lot::Mutex::new(Vec::new()));
    let sink = std::sync::Arc::clone(&seen);
    let collaborators = Collaborators {
        program: Box::new(TextProgram::from_text(program)),
        io: Box::new(IoConfig::defaults()),
        positions: Box::new(MemoryPositionStore::new(positions())),
        line_handler: Box::new(move |index: usize, line: &str| {
            sink.lock().push((index, line.to_string()));
        }),
    };
    let mut panel = PanelController::new(
        &PanelConfig::default(),
        collaborators,
        &mut StdRng::seed_from_u64(42),
        TimerQueue::new(),
        RecordingNotifier::new(),
    );
    panel
        .toggle_operation_mode()
        .expect("switch to auto from power-on state");
    (panel, seen)
}
