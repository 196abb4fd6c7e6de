//! Operation/execution mode switches, edit lock, and the control surface
//! projection.
//!
//! Which controls are live is a pure function of the run state, the mode
//! pair, the edit lock and whether a move is in flight. It is recomputed on
//! demand, never stored.

use bitflags::bitflags;
use c300_common::panel::error::PanelError;
use c300_common::panel::state::{ExecutionMode, ModePair, OperationMode, RunState};
use serde::{Deserialize, Serialize};
use tracing::info;

bitflags! {
    /// Enabled control surfaces.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ControlSurfaces: u16 {
        /// Axis jog buttons.
        const JOG            = 0x0001;
        /// Jog distance selector.
        const DISTANCE       = 0x0002;
        /// Digital output toggles.
        const OUTPUTS        = 0x0004;
        /// Move to a stored or typed position.
        const MOVE_TO        = 0x0008;
        const START          = 0x0010;
        const PAUSE          = 0x0020;
        const STOP           = 0x0040;
        /// Continuous / single-step switch.
        const EXECUTION_MODE = 0x0080;
        /// Manual / auto switch.
        const OPERATION_MODE = 0x0100;
        /// Position table editing (add, edit, save, delete).
        const TABLE          = 0x0200;
    }
}

impl ControlSurfaces {
    /// Manual-mode surfaces.
    pub const MANUAL: Self = Self::JOG
        .union(Self::DISTANCE)
        .union(Self::OUTPUTS)
        .union(Self::MOVE_TO)
        .union(Self::OPERATION_MODE)
        .union(Self::TABLE);

    /// Auto-mode surfaces while a program is active.
    pub const AUTO: Self = Self::START
        .union(Self::PAUSE)
        .union(Self::STOP)
        .union(Self::EXECUTION_MODE)
        .union(Self::TABLE);

    /// Project the enabled controls.
    ///
    /// - Edit lock: only the table, so edits can be saved or discarded.
    /// - Move in flight: only the table.
    /// - Manual: jog, distance, outputs, move-to, mode switch, table.
    /// - Auto: run controls, execution mode, table; the mode switch only
    ///   while stopped.
    pub fn derive(run_state: RunState, modes: ModePair, edit_lock: bool, moving: bool) -> Self {
        if edit_lock || moving {
            return Self::TABLE;
        }
        match modes.operation {
            OperationMode::Manual => Self::MANUAL,
            OperationMode::Auto if run_state.is_stopped() => Self::AUTO | Self::OPERATION_MODE,
            OperationMode::Auto => Self::AUTO,
        }
    }
}

/// Arbiter of the two mode switches and the edit lock.
#[derive(Debug, Clone, Default)]
pub struct ModeController {
    modes: ModePair,
    edit_lock: bool,
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub const fn modes(&self) -> ModePair {
        self.modes
    }

    #[inline]
    pub const fn operation_mode(&self) -> OperationMode {
        self.modes.operation
    }

    #[inline]
    pub const fn execution_mode(&self) -> ExecutionMode {
        self.modes.execution
    }

    #[inline]
    pub const fn edit_lock(&self) -> bool {
        self.edit_lock
    }

    /// Flip Manual/Auto.
    ///
    /// Only while stopped with no move in flight (`ModeLocked`), and never
    /// under the edit lock (`EditLocked`).
    pub fn toggle_operation_mode(
        &mut self,
        run_state: RunState,
        moving: bool,
    ) -> Result<OperationMode, PanelError> {
        if self.edit_lock {
            return Err(PanelError::EditLocked);
        }
        if !run_state.is_stopped() || moving {
            return Err(PanelError::ModeLocked);
        }
        self.modes.operation = self.modes.operation.toggled();
        info!(mode = ?self.modes.operation, "operation mode switched");
        Ok(self.modes.operation)
    }

    /// Flip Continuous/SingleStep. Always permitted; the executor reads the
    /// mode when it processes its next step.
    pub fn toggle_execution_mode(&mut self) -> ExecutionMode {
        self.modes.execution = self.modes.execution.toggled();
        info!(mode = ?self.modes.execution, "execution mode switched");
        self.modes.execution
    }

    pub fn set_edit_lock(&mut self, locked: bool) {
        if self.edit_lock != locked {
            info!(locked, "edit lock changed");
        }
        self.edit_lock = locked;
    }

    pub fn surfaces(&self, run_state: RunState, moving: bool) -> ControlSurfaces {
        ControlSurfaces::derive(run_state, self.modes, self.edit_lock, moving)
    }
}
