//! Panel-wide constants.

/// Number of manipulator axes (X, Y, Z, C).
pub const AXIS_COUNT: usize = 4;

/// Simulated travel time per unit of combined axis displacement (s/mm, s/°).
pub const DEFAULT_SECONDS_PER_UNIT: f64 = 0.1;

/// Shortest simulated move, regardless of displacement (seconds).
pub const DEFAULT_MIN_MOVE_SECONDS: f64 = 0.5;

/// Delay between program steps in continuous execution (milliseconds).
pub const DEFAULT_STEP_INTERVAL_MS: u64 = 1000;

/// Jog distances offered by the distance selector.
pub const DEFAULT_JOG_DISTANCES: [f64; 6] = [0.01, 0.1, 0.5, 1.0, 5.0, 10.0];

/// Jog distance selected at startup and after an invalid entry.
pub const DEFAULT_JOG_DISTANCE: f64 = 1.0;

/// Prefix for positions recorded from the current coordinates.
pub const POSITION_NAME_PREFIX: &str = "Point_";
