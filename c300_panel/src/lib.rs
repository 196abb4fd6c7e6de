//! # C300 Panel Library
//!
//! Control core of the simulated four-axis (X, Y, Z, C) manipulator panel.
//! The widgets of a front end are thin; everything with state or timing
//! lives here:
//!
//! 1. **CoordinateState**: live axis values, jog and set-all
//! 2. **MotionSimulator**: travel time of a move-to-position, in-flight guard
//! 3. **ProgramExecutor**: Stopped/Running/Paused/SingleStepPaused stepping
//! 4. **IoPanel**: named digital inputs and outputs
//! 5. **ModeController**: Manual/Auto, Continuous/SingleStep, edit lock
//!
//! [`controller::PanelController`] owns one of each and funnels every
//! command through a single `&mut self`. Time is virtual: delays are
//! entries in a [`scheduler::TimerQueue`] that the host advances, so the
//! whole core is deterministic under test and never blocks.

pub mod config;
pub mod controller;
pub mod motion;
pub mod notify;
pub mod scheduler;
pub mod state;
pub mod status;
pub mod store;
pub mod table;
