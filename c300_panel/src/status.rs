//! Serializable panel snapshot for front ends.

use c300_common::io::config::IoKind;
use c300_common::panel::axis::{Axis, CoordinateSet};
use c300_common::panel::state::{ModePair, MotionStatus, RunState};
use serde::Serialize;

use crate::state::io_panel::IoPanel;
use crate::state::mode::ControlSurfaces;

/// One axis as shown on the panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisReading {
    pub axis: Axis,
    pub value: f64,
    /// `"12.500 mm"`, `"90.000 °"`.
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IoReading {
    pub name: String,
    pub on: bool,
}

/// Everything a front end needs to render the panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelStatus {
    pub coordinates: CoordinateSet,
    pub axes: Vec<AxisReading>,
    pub run_state: RunState,
    pub run_state_label: &'static str,
    pub modes: ModePair,
    pub current_line: usize,
    pub total_lines: usize,
    /// `"current/total"`.
    pub progress: String,
    pub highlighted_line: Option<usize>,
    pub motion: MotionStatus,
    pub edit_lock: bool,
    pub surfaces: ControlSurfaces,
    pub jog_distance: f64,
    pub inputs: Vec<IoReading>,
    pub outputs: Vec<IoReading>,
}

impl PanelStatus {
    pub fn axis_readings(coords: &CoordinateSet) -> Vec<AxisReading> {
        coords
            .iter()
            .map(|(axis, value)| AxisReading {
                axis,
                value,
                display: coords.format_axis(axis),
            })
            .collect()
    }

    pub fn io_readings(io: &IoPanel, kind: IoKind) -> Vec<IoReading> {
        io.of_kind(kind)
            .map(|p| IoReading {
                name: p.name.clone(),
                on: p.state,
            })
            .collect()
    }
}
