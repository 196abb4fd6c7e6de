//! Simulated move-to-position.
//!
//! Travel time is `seconds_per_unit` per unit of combined axis displacement
//! (mm and degrees count alike), never less than `min_seconds`. The
//! simulator tracks at most one move in flight; coordinates are only
//! written when that move completes.

use c300_common::consts::{DEFAULT_MIN_MOVE_SECONDS, DEFAULT_SECONDS_PER_UNIT};
use c300_common::panel::axis::{Axis, CoordinateSet};
use c300_common::panel::error::PanelError;
use c300_common::panel::state::MotionStatus;
use std::time::Duration;
use tracing::{debug, info};

use crate::scheduler::TimerHandle;

/// Timing model of a simulated move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionProfile {
    pub seconds_per_unit: f64,
    pub min_seconds: f64,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            seconds_per_unit: DEFAULT_SECONDS_PER_UNIT,
            min_seconds: DEFAULT_MIN_MOVE_SECONDS,
        }
    }
}

impl MotionProfile {
    /// Travel time in seconds for a given combined displacement.
    #[inline]
    pub fn seconds_for(&self, displacement: f64) -> f64 {
        (self.seconds_per_unit * displacement).max(self.min_seconds)
    }
}

/// A move that has started and not yet completed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMove {
    /// Position name, or a description of a typed target.
    pub label: String,
    pub target: CoordinateSet,
    pub duration: Duration,
    pub handle: TimerHandle,
}

/// Move timing and the in-flight guard.
#[derive(Debug, Clone, Default)]
pub struct MotionSimulator {
    profile: MotionProfile,
    in_flight: Option<PendingMove>,
}

impl MotionSimulator {
    pub fn new(profile: MotionProfile) -> Self {
        Self {
            profile,
            in_flight: None,
        }
    }

    pub const fn profile(&self) -> MotionProfile {
        self.profile
    }

    /// Compute the travel time from `current` to `target`.
    ///
    /// Fails with `InvalidTarget` if any target axis is not finite; nothing
    /// is started either way.
    pub fn move_to(
        &self,
        current: &CoordinateSet,
        target: &CoordinateSet,
    ) -> Result<Duration, PanelError> {
        target.validate()?;
        let displacement = current.total_displacement(target);
        let seconds = self.profile.seconds_for(displacement);
        Duration::try_from_secs_f64(seconds).map_err(|_| PanelError::InvalidTarget {
            axis: largest_delta_axis(current, target),
            value: seconds.to_string(),
        })
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<&PendingMove> {
        self.in_flight.as_ref()
    }

    pub fn status(&self) -> MotionStatus {
        match &self.in_flight {
            Some(pending) => MotionStatus::Moving {
                target: pending.label.clone(),
            },
            None => MotionStatus::Stopped,
        }
    }

    /// Enter the moving state. Rejected while another move is in flight.
    pub fn begin(&mut self, pending: PendingMove) -> Result<(), PanelError> {
        if self.in_flight.is_some() {
            return Err(PanelError::MoveInProgress);
        }
        info!(
            target = %pending.label,
            seconds = pending.duration.as_secs_f64(),
            "moving to {}",
            pending.target
        );
        self.in_flight = Some(pending);
        Ok(())
    }

    /// Leave the moving state if `handle` belongs to the move in flight.
    pub fn finish(&mut self, handle: TimerHandle) -> Option<PendingMove> {
        if self.in_flight.as_ref().map(|p| p.handle) != Some(handle) {
            debug!("completion for unknown move ignored");
            return None;
        }
        self.in_flight.take()
    }
}

fn largest_delta_axis(current: &CoordinateSet, target: &CoordinateSet) -> Axis {
    Axis::ALL
        .into_iter()
        .max_by(|a, b| {
            let da = (target.get(*a) - current.get(*a)).abs();
            let db = (target.get(*b) - current.get(*b)).abs();
            da.total_cmp(&db)
        })
        .unwrap_or(Axis::X)
}
