//! Run and mode state enums.
//!
//! `RunState` is the program executor's state; `ModePair` holds the two
//! orthogonal operator switches. Both are plain `Copy` values owned by the
//! panel controller.

use serde::{Deserialize, Serialize};

/// Program execution state (exactly one active at a time).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum RunState {
    /// No program loaded for execution; cursor at 0.
    #[default]
    Stopped = 0,
    /// Stepping through lines.
    Running = 1,
    /// Paused by the operator.
    Paused = 2,
    /// Paused after one line in single-step execution.
    SingleStepPaused = 3,
}

impl RunState {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Stopped),
            1 => Some(Self::Running),
            2 => Some(Self::Paused),
            3 => Some(Self::SingleStepPaused),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Either paused flavour; both resume with `start()`.
    #[inline]
    pub const fn is_paused(&self) -> bool {
        matches!(self, Self::Paused | Self::SingleStepPaused)
    }

    /// Operator-facing label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Running => "Running",
            Self::Paused => "Paused",
            Self::SingleStepPaused => "Paused (single step)",
        }
    }
}

/// Who drives the manipulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OperationMode {
    /// Jog and output controls enabled.
    #[default]
    Manual,
    /// Program run/pause/stop enabled.
    Auto,
}

impl OperationMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Manual => Self::Auto,
            Self::Auto => Self::Manual,
        }
    }
}

/// Program stepping policy (only consulted in `Auto`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExecutionMode {
    /// Advance automatically after the step interval.
    #[default]
    Continuous,
    /// Pause after every line until the next `start()`.
    SingleStep,
}

impl ExecutionMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Continuous => Self::SingleStep,
            Self::SingleStep => Self::Continuous,
        }
    }
}

/// Both operator mode switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ModePair {
    pub operation: OperationMode,
    pub execution: ExecutionMode,
}

/// Status of the simulated move-to-position transition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MotionStatus {
    #[default]
    Stopped,
    /// Travelling to the named target.
    Moving { target: String },
}

impl MotionStatus {
    #[inline]
    pub const fn is_moving(&self) -> bool {
        matches!(self, Self::Moving { .. })
    }
}
