//! C300 Common Library
//!
//! Shared data model and configuration loading for the C300 four-axis
//! manipulator panel.
//!
//! # Module Structure
//!
//! - [`panel`] - Axes, coordinate sets, run/mode states and the error taxonomy
//! - [`io`] - Digital I/O definitions loaded from `io.toml`
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - Panel-wide constants
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use c300_common::prelude::*;
//!
//! let target = CoordinateSet::new(3.0, 4.0, 0.0, 0.0);
//! assert_eq!(CoordinateSet::ORIGIN.total_displacement(&target), 7.0);
//! ```

pub mod config;
pub mod consts;
pub mod io;
pub mod panel;
pub mod prelude;
