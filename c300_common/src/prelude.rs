//! Prelude module for common re-exports.
//!
//! ```rust
//! use c300_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{AXIS_COUNT, DEFAULT_JOG_DISTANCE};

// ─── Panel model ────────────────────────────────────────────────────
pub use crate::panel::axis::{Axis, CoordinateSet, Direction, Position};
pub use crate::panel::error::{PanelError, ReportKind};
pub use crate::panel::state::{ExecutionMode, ModePair, MotionStatus, OperationMode, RunState};

// ─── I/O ────────────────────────────────────────────────────────────
pub use crate::io::config::{IoConfig, IoDefinition, IoKind};
