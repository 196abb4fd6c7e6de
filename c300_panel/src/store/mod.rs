//! Collaborator stores: program text, I/O definitions, positions.
//!
//! The core only consumes the traits below; the file-backed
//! implementations keep everything in plain text/TOML next to the panel
//! configuration.

pub mod io;
pub mod positions;
pub mod program;

use c300_common::io::config::IoDefinition;
use c300_common::panel::axis::Position;
use c300_common::panel::error::PanelError;
use std::path::PathBuf;
use thiserror::Error;

pub use io::TomlIoStore;
pub use positions::{MemoryPositionStore, TomlPositionStore};
pub use program::TextProgram;

/// Storage failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("failed to serialize: {0}")]
    Format(String),

    /// `save()` on a program buffer that was never bound to a file.
    #[error("no file selected, use save-as first")]
    NoPath,

    #[error("position '{0}' already exists")]
    Duplicate(String),

    #[error("position '{0}' not found")]
    NotFound(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<StoreError> for PanelError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(name) => PanelError::UnknownPosition(name),
            StoreError::Duplicate(name) => PanelError::PositionExists(name),
            other => PanelError::Store(other.to_string()),
        }
    }
}

/// Source of the program lines executed by a run.
pub trait ProgramSource {
    /// Ordered program lines; may be empty.
    fn load(&self) -> Result<Vec<String>, StoreError>;
}

/// Source of the digital I/O name → kind mapping.
pub trait IoDefinitionStore {
    fn load(&self) -> Result<Vec<IoDefinition>, StoreError>;
}

/// Persistent position table.
///
/// The controller only reads through [`list`](Self::list); the write side
/// serves the position table editor.
pub trait PositionStore {
    fn list(&self) -> Result<Vec<Position>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] if the name is taken.
    fn insert(&mut self, position: Position) -> Result<(), StoreError>;

    /// Fails with [`StoreError::NotFound`] if the name is unknown.
    fn update(&mut self, position: Position) -> Result<(), StoreError>;

    /// Give a row a new name, keeping its place. Fails with
    /// [`StoreError::NotFound`] or [`StoreError::Duplicate`].
    fn rename(&mut self, from: &str, to: &str) -> Result<(), StoreError>;

    /// Returns `false` if nothing was removed.
    fn remove(&mut self, name: &str) -> Result<bool, StoreError>;
}

impl IoDefinitionStore for c300_common::io::config::IoConfig {
    fn load(&self) -> Result<Vec<IoDefinition>, StoreError> {
        Ok(self.io.clone())
    }
}
