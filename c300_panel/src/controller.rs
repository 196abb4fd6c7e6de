//! The panel controller aggregate.
//!
//! `PanelController` is the single owner of every piece of live panel
//! state. Each command:
//!
//! 1. checks the control surface it needs against
//!    [`ControlSurfaces::derive`],
//! 2. delegates to the state owner,
//! 3. reports the outcome through the [`Notifier`].
//!
//! Rejections leave all state unchanged. Silent rejections (disabled
//! surface, edit lock) are logged at debug level only.
//!
//! Time advances only through [`PanelController::advance_to`], which fires
//! due timers in deadline order.

use std::time::Duration;

use c300_common::io::config::IoKind;
use c300_common::panel::axis::{Axis, CoordinateSet, Direction, Position};
use c300_common::panel::error::{PanelError, ReportKind};
use c300_common::panel::state::{ExecutionMode, ModePair, MotionStatus, OperationMode, RunState};
use rand::Rng;
use tracing::{debug, info};

use crate::config::PanelConfig;
use crate::motion::{MotionSimulator, PendingMove};
use crate::notify::{Notifier, TracingNotifier};
use crate::scheduler::{ScheduledTask, Scheduler, TimerHandle, TimerQueue};
use crate::state::coords::{CoordinateState, parse_distance};
use crate::state::executor::{ExecutionCursor, LineHandler, ProgramExecutor, StartKind, StepOutcome};
use crate::state::io_panel::IoPanel;
use crate::state::mode::{ControlSurfaces, ModeController};
use crate::status::PanelStatus;
use crate::store::{IoDefinitionStore, PositionStore, ProgramSource};
use crate::table::PositionTable;

/// External collaborators handed to the controller at construction.
pub struct Collaborators {
    pub program: Box<dyn ProgramSource + Send>,
    pub io: Box<dyn IoDefinitionStore + Send>,
    pub positions: Box<dyn PositionStore + Send>,
    pub line_handler: Box<dyn LineHandler + Send>,
}

/// Single owner of the panel state.
pub struct PanelController<N: Notifier = TracingNotifier, S: Scheduler = TimerQueue> {
    coords: CoordinateState,
    motion: MotionSimulator,
    executor: ProgramExecutor,
    io: IoPanel,
    modes: ModeController,
    table: PositionTable,

    program: Box<dyn ProgramSource + Send>,
    positions: Box<dyn PositionStore + Send>,
    line_handler: Box<dyn LineHandler + Send>,

    jog_distance: f64,
    default_jog_distance: f64,
    jog_distances: Vec<f64>,

    scheduler: S,
    notifier: N,
}

impl<N: Notifier, S: Scheduler> PanelController<N, S> {
    /// Build the controller at power-on state: origin, Manual/Continuous,
    /// stopped, outputs off, inputs seeded from `rng`.
    ///
    /// A failing I/O definition store leaves the I/O panel empty; a failing
    /// position store leaves the table empty. Both are reported as errors,
    /// neither aborts construction.
    pub fn new<R: Rng + ?Sized>(
        config: &PanelConfig,
        collaborators: Collaborators,
        rng: &mut R,
        scheduler: S,
        mut notifier: N,
    ) -> Self {
        let Collaborators {
            program,
            io: io_store,
            positions,
            line_handler,
        } = collaborators;

        let io = match io_store.load() {
            Ok(defs) => IoPanel::from_definitions(&defs, rng),
            Err(err) => {
                notifier.report(
                    ReportKind::Error,
                    &format!("failed to load I/O definitions: {err}"),
                );
                IoPanel::new()
            }
        };

        let table = match PositionTable::load(positions.as_ref()) {
            Ok(table) => table,
            Err(err) => {
                notifier.report(ReportKind::Error, &format!("failed to load positions: {err}"));
                PositionTable::new()
            }
        };

        info!(
            outputs = io.of_kind(IoKind::Output).count(),
            inputs = io.of_kind(IoKind::Input).count(),
            positions = table.rows().len(),
            "panel controller ready"
        );

        Self {
            coords: CoordinateState::new(),
            motion: MotionSimulator::new(config.motion.profile()),
            executor: ProgramExecutor::new(config.program.step_interval()),
            io,
            modes: ModeController::new(),
            table,
            program,
            positions,
            line_handler,
            jog_distance: config.jog.default_distance,
            default_jog_distance: config.jog.default_distance,
            jog_distances: config.jog.distances.clone(),
            scheduler,
            notifier,
        }
    }

    // ─── Accessors ──────────────────────────────────────────────────

    pub const fn coordinates(&self) -> CoordinateSet {
        self.coords.current()
    }

    pub const fn run_state(&self) -> RunState {
        self.executor.state()
    }

    pub const fn cursor(&self) -> ExecutionCursor {
        self.executor.cursor()
    }

    pub const fn highlighted_line(&self) -> Option<usize> {
        self.executor.highlighted_line()
    }

    /// Lines of the active run.
    pub fn program_lines(&self) -> &[String] {
        self.executor.lines()
    }

    pub const fn modes(&self) -> ModePair {
        self.modes.modes()
    }

    pub const fn edit_lock(&self) -> bool {
        self.modes.edit_lock()
    }

    pub fn is_moving(&self) -> bool {
        self.motion.is_moving()
    }

    pub fn motion_status(&self) -> MotionStatus {
        self.motion.status()
    }

    pub fn io(&self) -> &IoPanel {
        &self.io
    }

    pub fn positions(&self) -> &[Position] {
        self.table.rows()
    }

    pub fn table(&self) -> &PositionTable {
        &self.table
    }

    pub const fn jog_distance(&self) -> f64 {
        self.jog_distance
    }

    pub fn jog_distances(&self) -> &[f64] {
        &self.jog_distances
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Controls enabled right now.
    pub fn surfaces(&self) -> ControlSurfaces {
        self.modes
            .surfaces(self.executor.state(), self.motion.is_moving())
    }

    pub fn status(&self) -> PanelStatus {
        let coords = self.coords.current();
        let cursor = self.executor.cursor();
        let run_state = self.executor.state();
        PanelStatus {
            coordinates: coords,
            axes: PanelStatus::axis_readings(&coords),
            run_state,
            run_state_label: run_state.label(),
            modes: self.modes.modes(),
            current_line: cursor.current_line,
            total_lines: cursor.total_lines,
            progress: cursor.progress(),
            highlighted_line: self.executor.highlighted_line(),
            motion: self.motion.status(),
            edit_lock: self.modes.edit_lock(),
            surfaces: self.surfaces(),
            jog_distance: self.jog_distance,
            inputs: PanelStatus::io_readings(&self.io, IoKind::Input),
            outputs: PanelStatus::io_readings(&self.io, IoKind::Output),
        }
    }

    // ─── Manual commands ────────────────────────────────────────────

    /// Jog one axis by `distance`.
    pub fn jog(&mut self, axis: Axis, direction: Direction, distance: f64) -> Result<f64, PanelError> {
        let result = self
            .require(ControlSurfaces::JOG, "jog")
            .and_then(|()| self.coords.jog(axis, direction, distance));
        self.settle(result)
    }

    /// Jog one axis by the selected distance.
    pub fn jog_selected(&mut self, axis: Axis, direction: Direction) -> Result<f64, PanelError> {
        self.jog(axis, direction, self.jog_distance)
    }

    /// Select the jog distance from operator text. An invalid entry resets
    /// the selection to the configured default.
    pub fn set_jog_distance(&mut self, text: &str) -> Result<f64, PanelError> {
        let result = self
            .require(ControlSurfaces::DISTANCE, "jog distance")
            .and_then(|()| match parse_distance(text) {
                Ok(distance) => {
                    self.jog_distance = distance;
                    Ok(distance)
                }
                Err(err) => {
                    self.jog_distance = self.default_jog_distance;
                    Err(err)
                }
            });
        self.settle(result)
    }

    /// Flip a digital output. Silently ignored (`None`) when outputs are
    /// disabled or `name` is not an output.
    pub fn toggle_output(&mut self, name: &str) -> Option<bool> {
        if let Err(err) = self.require(ControlSurfaces::OUTPUTS, "output toggle") {
            debug!(output = name, reason = %err, "output toggle ignored");
            return None;
        }
        let state = self.io.toggle_output(name);
        if state.is_none() {
            debug!(output = name, "no such output");
        }
        state
    }

    /// Drive a digital input from outside the panel.
    pub fn set_input(&mut self, name: &str, state: bool) -> bool {
        self.io.set_input(name, state)
    }

    /// Start a simulated move to a stored position.
    pub fn move_to_position(&mut self, name: &str) -> Result<Duration, PanelError> {
        let result = self
            .require(ControlSurfaces::MOVE_TO, "move-to")
            .and_then(|()| {
                let positions = self.positions.list()?;
                let target = positions
                    .into_iter()
                    .find(|p| p.name == name)
                    .ok_or_else(|| PanelError::UnknownPosition(name.to_string()))?;
                self.begin_move(target.name, target.coords)
            });
        self.settle(result)
    }

    /// Start a simulated move to typed X, Y, Z, C values.
    pub fn move_to_values(&mut self, fields: [&str; 4]) -> Result<Duration, PanelError> {
        let result = self
            .require(ControlSurfaces::MOVE_TO, "move-to")
            .and_then(|()| {
                let target = CoordinateSet::parse(fields)?;
                self.begin_move(target.to_string(), target)
            });
        self.settle(result)
    }

    fn begin_move(&mut self, label: String, target: CoordinateSet) -> Result<Duration, PanelError> {
        let duration = self.motion.move_to(&self.coords.current(), &target)?;
        let handle = self.scheduler.after(duration, ScheduledTask::MoveComplete);
        let pending = PendingMove {
            label: label.clone(),
            target,
            duration,
            handle,
        };
        if let Err(err) = self.motion.begin(pending) {
            self.scheduler.cancel(handle);
            return Err(err);
        }
        self.notifier.report(
            ReportKind::Info,
            &format!("moving to {label} ({:.1} s)", duration.as_secs_f64()),
        );
        Ok(duration)
    }

    // ─── Program commands ───────────────────────────────────────────

    /// Start a new run, or resume a paused one.
    pub fn start(&mut self) -> Result<StepOutcome, PanelError> {
        let result = self.require(ControlSurfaces::START, "start").and_then(|()| {
            self.executor.start(
                self.program.as_ref(),
                self.modes.execution_mode(),
                &mut self.scheduler,
                self.line_handler.as_mut(),
            )
        });
        match self.settle(result) {
            Ok((kind, outcome)) => {
                let message = match kind {
                    StartKind::Started { total_lines } => {
                        format!("program started ({total_lines} lines)")
                    }
                    StartKind::Resumed => "program resumed".to_string(),
                };
                self.notifier.report(ReportKind::Info, &message);
                self.report_step(outcome);
                Ok(outcome)
            }
            Err(err) => Err(err),
        }
    }

    pub fn pause(&mut self) -> Result<(), PanelError> {
        let result = self
            .require(ControlSurfaces::PAUSE, "pause")
            .and_then(|()| self.executor.pause(&mut self.scheduler));
        self.settle(result)?;
        self.notifier.report(
            ReportKind::Info,
            &format!("program paused at {}", self.executor.cursor().progress()),
        );
        Ok(())
    }

    /// Stop from any state. Returns the state that was left; stopping an
    /// already stopped program changes nothing.
    pub fn stop(&mut self) -> Result<RunState, PanelError> {
        let result = self
            .require(ControlSurfaces::STOP, "stop")
            .map(|()| self.executor.stop(&mut self.scheduler));
        let previous = self.settle(result)?;
        if !previous.is_stopped() {
            self.notifier.report(ReportKind::Info, "program stopped");
        }
        Ok(previous)
    }

    /// Replace the program consumed by the next fresh start.
    pub fn set_program(&mut self, program: Box<dyn ProgramSource + Send>) {
        self.program = program;
    }

    // ─── Mode commands ──────────────────────────────────────────────

    pub fn toggle_operation_mode(&mut self) -> Result<OperationMode, PanelError> {
        let result = self
            .modes
            .toggle_operation_mode(self.executor.state(), self.motion.is_moving());
        let mode = self.settle(result)?;
        self.notifier
            .report(ReportKind::Info, &format!("switched to {mode:?} mode"));
        Ok(mode)
    }

    pub fn toggle_execution_mode(&mut self) -> Result<ExecutionMode, PanelError> {
        let result = if self.modes.edit_lock() {
            Err(PanelError::EditLocked)
        } else {
            Ok(self.modes.toggle_execution_mode())
        };
        self.settle(result)
    }

    // ─── Position table ─────────────────────────────────────────────

    /// Stage an edit of one table cell. Engages the edit lock.
    pub fn edit_position(&mut self, name: &str, axis: Axis, text: &str) -> Result<f64, PanelError> {
        let result = self
            .require(ControlSurfaces::TABLE, "position table")
            .and_then(|()| self.table.edit(name, axis, text));
        self.sync_edit_lock();
        self.settle(result)
    }

    /// Persist staged edits. Releases the edit lock on success.
    pub fn save_position_edits(&mut self) -> Result<usize, PanelError> {
        let result = self
            .require(ControlSurfaces::TABLE, "position table")
            .and_then(|()| self.table.save(self.positions.as_mut()));
        self.sync_edit_lock();
        let count = self.settle(result)?;
        self.notifier
            .report(ReportKind::Info, &format!("{count} position(s) saved"));
        Ok(count)
    }

    pub fn discard_position_edits(&mut self) {
        self.table.discard();
        self.sync_edit_lock();
    }

    /// Reload the table from the position store.
    pub fn refresh_positions(&mut self) -> Result<(), PanelError> {
        let result = self.table.refresh(self.positions.as_ref());
        self.sync_edit_lock();
        self.settle(result)
    }

    /// Record the current coordinates as a new position.
    pub fn add_position(&mut self) -> Result<String, PanelError> {
        let coords = self.coords.current();
        let result = self
            .require(ControlSurfaces::TABLE, "position table")
            .and_then(|()| self.table.add_current(self.positions.as_mut(), coords));
        let name = self.settle(result)?;
        self.notifier
            .report(ReportKind::Info, &format!("position {name} added"));
        Ok(name)
    }

    /// Rename a stored position. Returns the trimmed new name.
    pub fn rename_position(&mut self, from: &str, to: &str) -> Result<String, PanelError> {
        let result = self
            .require(ControlSurfaces::TABLE, "position table")
            .and_then(|()| self.table.rename(self.positions.as_mut(), from, to));
        let name = self.settle(result)?;
        self.notifier
            .report(ReportKind::Info, &format!("position {from} renamed to {name}"));
        Ok(name)
    }

    pub fn delete_position(&mut self, name: &str) -> Result<(), PanelError> {
        let result = self
            .require(ControlSurfaces::TABLE, "position table")
            .and_then(|()| self.table.remove(self.positions.as_mut(), name));
        self.settle(result)?;
        self.notifier
            .report(ReportKind::Info, &format!("position {name} deleted"));
        Ok(())
    }

    // ─── Time ───────────────────────────────────────────────────────

    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    /// Fire every timer due at or before `t`, then move the clock to `t`.
    pub fn advance_to(&mut self, t: Duration) {
        while let Some((handle, task)) = self.scheduler.pop_due(t) {
            self.dispatch(handle, task);
        }
        self.scheduler.advance_clock(t);
    }

    pub fn advance_by(&mut self, dt: Duration) {
        let t = self.scheduler.now() + dt;
        self.advance_to(t);
    }

    fn dispatch(&mut self, handle: TimerHandle, task: ScheduledTask) {
        match task {
            ScheduledTask::ProgramStep { run } => {
                let outcome = self.executor.on_step_timer(
                    handle,
                    run,
                    self.modes.execution_mode(),
                    &mut self.scheduler,
                    self.line_handler.as_mut(),
                );
                if let Some(outcome) = outcome {
                    self.report_step(outcome);
                }
            }
            ScheduledTask::MoveComplete => {
                if let Some(done) = self.motion.finish(handle) {
                    self.coords.set_all(done.target);
                    self.notifier.report(
                        ReportKind::Info,
                        &format!("arrived at {}: {}", done.label, done.target),
                    );
                }
            }
        }
    }

    // ─── Helpers ────────────────────────────────────────────────────

    /// Gate a command on its control surface.
    ///
    /// A disabled surface is attributed to the edit lock first, then to a
    /// move in flight, then to the operation mode.
    fn require(&self, surface: ControlSurfaces, control: &'static str) -> Result<(), PanelError> {
        if self.surfaces().contains(surface) {
            Ok(())
        } else if self.modes.edit_lock() {
            Err(PanelError::EditLocked)
        } else if self.motion.is_moving() {
            Err(PanelError::MoveInProgress)
        } else {
            Err(PanelError::ControlDisabled(control))
        }
    }

    /// Report a rejection, pass the result through.
    fn settle<T>(&mut self, result: Result<T, PanelError>) -> Result<T, PanelError> {
        if let Err(err) = &result {
            if err.is_silent() {
                debug!(reason = %err, "command ignored");
            } else {
                self.notifier.report(err.report_kind(), &err.to_string());
            }
        }
        result
    }

    fn report_step(&mut self, outcome: StepOutcome) {
        match outcome {
            StepOutcome::Scheduled(_) => {}
            StepOutcome::AwaitingResume => self.notifier.report(
                ReportKind::Info,
                &format!(
                    "{} at line {}",
                    RunState::SingleStepPaused.label(),
                    self.executor.cursor().progress()
                ),
            ),
            StepOutcome::Finished => self.notifier.report(ReportKind::Info, "program finished"),
        }
    }

    fn sync_edit_lock(&mut self) {
        self.modes.set_edit_lock(self.table.has_pending_edits());
    }
}
