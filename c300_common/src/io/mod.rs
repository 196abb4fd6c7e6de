//! Digital I/O definitions.

pub mod config;
