//! Panel error taxonomy.
//!
//! Every variant is recoverable and local: a rejected command leaves all
//! state untouched and is surfaced to the operator as a report of the
//! matching [`ReportKind`]. Variants that correspond to a disabled control
//! surface are silent (logged at debug level only).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::axis::Axis;

/// Severity of an operator-facing report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Info,
    Warning,
    Error,
}

/// Why a panel command was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PanelError {
    /// Jog distance is non-numeric, non-finite, or not strictly positive.
    #[error("invalid jog distance '{0}': enter a positive number")]
    InvalidDistance(String),

    /// A move target axis value is not a finite number.
    #[error("invalid target for axis {axis}: '{value}' is not a number")]
    InvalidTarget { axis: Axis, value: String },

    /// `start()` with no program lines loaded.
    #[error("program is empty, nothing to execute")]
    EmptyProgram,

    /// Operation mode change while a program or a move is active.
    #[error("stop the program before switching the operation mode")]
    ModeLocked,

    #[error("program is already running")]
    AlreadyRunning,

    #[error("program is not running")]
    NotRunning,

    #[error("program is already paused")]
    AlreadyPaused,

    /// Jog or move-to while a simulated move is still in flight.
    #[error("a move is already in progress")]
    MoveInProgress,

    /// The position table has unsaved edits.
    #[error("position table has unsaved edits")]
    EditLocked,

    /// The control is disabled in the current operation mode.
    #[error("{0} is disabled in the current mode")]
    ControlDisabled(&'static str),

    #[error("unknown position '{0}'")]
    UnknownPosition(String),

    #[error("position '{0}' already exists")]
    PositionExists(String),

    /// Blank position name.
    #[error("position name must not be empty")]
    EmptyName,

    /// Collaborator storage failure (program file, I/O or position store).
    #[error("storage error: {0}")]
    Store(String),
}

impl PanelError {
    /// Severity used when reporting this error to the operator.
    pub const fn report_kind(&self) -> ReportKind {
        match self {
            Self::Store(_) => ReportKind::Error,
            Self::ControlDisabled(_) | Self::EditLocked => ReportKind::Info,
            _ => ReportKind::Warning,
        }
    }

    /// Rejections by a disabled control surface are not reported.
    pub const fn is_silent(&self) -> bool {
        matches!(self, Self::ControlDisabled(_) | Self::EditLocked)
    }
}
