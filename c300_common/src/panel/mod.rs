//! Panel data model: axes and coordinates, run/mode states, errors.

pub mod axis;
pub mod error;
pub mod state;
