//! Program executor: the automatic-mode run state machine.
//!
//! ```text
//!            start (lines > 0)                 pause
//! Stopped ───────────────────▶ Running ───────────────▶ Paused
//!    ▲                          │  ▲  ◀─────────────────   │
//!    │   stop / last line done  │  │        start          │
//!    ├──────────────────────────┘  │ start                 │
//!    │                     step ▼  │                       │
//!    │ ◀──── stop ──── SingleStepPaused                    │
//!    └─────────────────────────────────────── stop ────────┘
//! ```
//!
//! Every step marks the line as current, hands it to the [`LineHandler`],
//! and advances the cursor. In continuous execution the next step is a
//! one-shot timer owned by the executor; in single-step execution the
//! executor parks in `SingleStepPaused`. Reaching the last line stops the
//! run in either policy.
//!
//! A step timer carries the id of the run that scheduled it. `pause` and
//! `stop` cancel the pending timer, and a timer that still fires for an
//! older run, or while not `Running`, is ignored.

use c300_common::panel::error::PanelError;
use c300_common::panel::state::{ExecutionMode, RunState};
use std::time::Duration;
use tracing::{debug, info};

use crate::scheduler::{ScheduledTask, Scheduler, TimerHandle};
use crate::store::ProgramSource;

/// Pluggable processing of one program line, invoked exactly once per step.
pub trait LineHandler {
    fn execute(&mut self, index: usize, line: &str);
}

impl<F: FnMut(usize, &str)> LineHandler for F {
    fn execute(&mut self, index: usize, line: &str) {
        self(index, line)
    }
}

/// Default handler: lines carry no motion semantics, they are only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLineHandler;

impl LineHandler for LogLineHandler {
    fn execute(&mut self, index: usize, line: &str) {
        let line = line.trim();
        if !line.is_empty() {
            info!(line = index + 1, "executing: {line}");
        }
    }
}

/// Position within the loaded program.
///
/// `current_line` counts processed lines; `0 <= current_line <= total_lines`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionCursor {
    pub current_line: usize,
    pub total_lines: usize,
}

impl ExecutionCursor {
    /// `"current/total"`.
    pub fn progress(&self) -> String {
        format!("{}/{}", self.current_line, self.total_lines)
    }
}

/// How `start()` took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartKind {
    /// Fresh run from line 0.
    Started { total_lines: usize },
    /// Resumed at the current cursor.
    Resumed,
}

/// What happened after a line was processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Next step queued (continuous execution).
    Scheduled(TimerHandle),
    /// Parked in `SingleStepPaused`.
    AwaitingResume,
    /// Last line processed; the run stopped.
    Finished,
}

/// Run state, loaded lines and cursor of the automatic-mode interpreter.
#[derive(Debug)]
pub struct ProgramExecutor {
    state: RunState,
    lines: Vec<String>,
    cursor: ExecutionCursor,
    highlighted: Option<usize>,
    pending: Option<TimerHandle>,
    run: u64,
    step_interval: Duration,
}

impl ProgramExecutor {
    pub fn new(step_interval: Duration) -> Self {
        Self {
            state: RunState::Stopped,
            lines: Vec::new(),
            cursor: ExecutionCursor::default(),
            highlighted: None,
            pending: None,
            run: 0,
            step_interval,
        }
    }

    #[inline]
    pub const fn state(&self) -> RunState {
        self.state
    }

    #[inline]
    pub const fn cursor(&self) -> ExecutionCursor {
        self.cursor
    }

    /// Index of the line marked as current, if any.
    #[inline]
    pub const fn highlighted_line(&self) -> Option<usize> {
        self.highlighted
    }

    /// Lines loaded for the current run (empty when stopped).
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub const fn step_interval(&self) -> Duration {
        self.step_interval
    }

    pub const fn pending_step(&self) -> Option<TimerHandle> {
        self.pending
    }

    /// Begin a new run or resume a paused one.
    ///
    /// From `Stopped` the program is loaded from `source`, the cursor is
    /// reset and line 0 is processed immediately. From either paused state
    /// the next line is processed immediately. Rejected with
    /// `AlreadyRunning` while running and `EmptyProgram` when there is
    /// nothing to run; rejection leaves the state unchanged.
    pub fn start(
        &mut self,
        source: &dyn ProgramSource,
        mode: ExecutionMode,
        scheduler: &mut dyn Scheduler,
        handler: &mut dyn LineHandler,
    ) -> Result<(StartKind, StepOutcome), PanelError> {
        let kind = match self.state {
            RunState::Running => return Err(PanelError::AlreadyRunning),
            RunState::Paused | RunState::SingleStepPaused => {
                info!(progress = %self.cursor.progress(), "program resumed");
                StartKind::Resumed
            }
            RunState::Stopped => {
                let lines = source.load()?;
                if lines.is_empty() {
                    return Err(PanelError::EmptyProgram);
                }
                self.run = self.run.wrapping_add(1);
                self.cursor = ExecutionCursor {
                    current_line: 0,
                    total_lines: lines.len(),
                };
                self.lines = lines;
                info!(run = self.run, total_lines = self.lines.len(), "program started");
                StartKind::Started {
                    total_lines: self.lines.len(),
                }
            }
        };

        self.state = RunState::Running;
        let outcome = self.step(mode, scheduler, handler);
        Ok((kind, outcome))
    }

    /// Pause a running program, cancelling its pending step.
    pub fn pause(&mut self, scheduler: &mut dyn Scheduler) -> Result<(), PanelError> {
        match self.state {
            RunState::Running => {
                self.cancel_pending(scheduler);
                self.state = RunState::Paused;
                info!(progress = %self.cursor.progress(), "program paused");
                Ok(())
            }
            RunState::Stopped => Err(PanelError::NotRunning),
            RunState::Paused | RunState::SingleStepPaused => Err(PanelError::AlreadyPaused),
        }
    }

    /// Stop from any state. Idempotent; returns the state it left.
    pub fn stop(&mut self, scheduler: &mut dyn Scheduler) -> RunState {
        let previous = self.state;
        self.cancel_pending(scheduler);
        self.reset();
        if !previous.is_stopped() {
            info!("program stopped");
        }
        previous
    }

    /// Handle a fired `ProgramStep` timer.
    ///
    /// Returns `None` when the timer is stale: it belongs to an earlier
    /// run, to a cancelled step, or the executor is no longer running.
    pub fn on_step_timer(
        &mut self,
        handle: TimerHandle,
        run: u64,
        mode: ExecutionMode,
        scheduler: &mut dyn Scheduler,
        handler: &mut dyn LineHandler,
    ) -> Option<StepOutcome> {
        if self.state != RunState::Running || run != self.run || self.pending != Some(handle) {
            debug!(run, "stale step timer ignored");
            return None;
        }
        self.pending = None;
        Some(self.step(mode, scheduler, handler))
    }

    fn step(
        &mut self,
        mode: ExecutionMode,
        scheduler: &mut dyn Scheduler,
        handler: &mut dyn LineHandler,
    ) -> StepOutcome {
        let index = self.cursor.current_line;
        let Some(line) = self.lines.get(index) else {
            self.stop(scheduler);
            return StepOutcome::Finished;
        };

        self.highlighted = Some(index);
        handler.execute(index, line);
        self.cursor.current_line = index + 1;
        debug!(progress = %self.cursor.progress(), "step done");

        if self.cursor.current_line >= self.cursor.total_lines {
            self.stop(scheduler);
            return StepOutcome::Finished;
        }

        match mode {
            ExecutionMode::Continuous => {
                let handle = scheduler.after(
                    self.step_interval,
                    ScheduledTask::ProgramStep { run: self.run },
                );
                self.pending = Some(handle);
                StepOutcome::Scheduled(handle)
            }
            ExecutionMode::SingleStep => {
                self.state = RunState::SingleStepPaused;
                debug!("single step done, awaiting resume");
                StepOutcome::AwaitingResume
            }
        }
    }

    fn cancel_pending(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
    }

    fn reset(&mut self) {
        self.state = RunState::Stopped;
        self.cursor = ExecutionCursor::default();
        self.highlighted = None;
        self.lines.clear();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
