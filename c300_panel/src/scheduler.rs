//! One-shot timers on a virtual monotonic clock.
//!
//! Delays in the panel (inter-step interval, simulated travel) are never
//! slept on. They are queued as [`ScheduledTask`] values and handed back to
//! the controller when the host advances the clock past their deadline.
//! Timers with equal deadlines fire in scheduling order.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Opaque handle returned by [`Scheduler::after`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Work the controller performs when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    /// Process the next program line of run `run`.
    ProgramStep { run: u64 },
    /// Simulated travel finished.
    MoveComplete,
}

/// Clock/scheduler collaborator.
pub trait Scheduler {
    /// Current virtual time since the scheduler was created.
    fn now(&self) -> Duration;

    /// Schedule `task` to fire `delay` after [`now`](Self::now).
    fn after(&mut self, delay: Duration, task: ScheduledTask) -> TimerHandle;

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// cancelled.
    fn cancel(&mut self, handle: TimerHandle) -> bool;

    /// Deadline of the earliest pending timer.
    fn next_deadline(&self) -> Option<Duration>;

    /// Remove the earliest timer due at or before `until`, moving the
    /// clock to its deadline.
    fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, ScheduledTask)>;

    /// Move the clock forward to `to`. Never moves it backwards.
    fn advance_clock(&mut self, to: Duration);
}

/// Ordered timer queue keyed by `(deadline, sequence)`.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_seq: u64,
    timers: BTreeMap<(Duration, u64), ScheduledTask>,
    deadlines: HashMap<TimerHandle, Duration>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pending timers.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.deadlines.contains_key(&handle)
    }
}

impl Scheduler for TimerQueue {
    #[inline]
    fn now(&self) -> Duration {
        self.now
    }

    fn after(&mut self, delay: Duration, task: ScheduledTask) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let deadline = self.now.saturating_add(delay);
        let handle = TimerHandle(seq);
        self.timers.insert((deadline, seq), task);
        self.deadlines.insert(handle, deadline);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.deadlines.remove(&handle) {
            Some(deadline) => self.timers.remove(&(deadline, handle.0)).is_some(),
            None => false,
        }
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.timers.keys().next().map(|(deadline, _)| *deadline)
    }

    fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, ScheduledTask)> {
        let (&(deadline, seq), _) = self.timers.iter().next()?;
        if deadline > until {
            return None;
        }
        let task = self.timers.remove(&(deadline, seq))?;
        let handle = TimerHandle(seq);
        self.deadlines.remove(&handle);
        self.advance_clock(deadline);
        Some((handle, task))
    }

    fn advance_clock(&mut self, to: Duration) {
        self.now = self.now.max(to);
    }
}
