//! Panel state owners.
//!
//! Each submodule owns one piece of live state and enforces its own
//! invariants; mode gating is applied by the controller.

pub mod coords;
pub mod executor;
pub mod io_panel;
pub mod mode;
