//! `io.toml`-backed I/O definition store.

use c300_common::io::config::{IoConfig, IoDefinition};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{IoDefinitionStore, StoreError};

/// Reads I/O definitions from a TOML file. A missing file is created with
/// the factory defaults.
#[derive(Debug, Clone)]
pub struct TomlIoStore {
    path: PathBuf,
}

impl TomlIoStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_defaults(&self) -> Result<IoConfig, StoreError> {
        let defaults = IoConfig::defaults();
        let text = defaults
            .to_toml()
            .map_err(|e| StoreError::Format(e.to_string()))?;
        fs::write(&self.path, text).map_err(|e| StoreError::io(&self.path, e))?;
        info!(path = %self.path.display(), "wrote default I/O definitions");
        Ok(defaults)
    }
}

impl IoDefinitionStore for TomlIoStore {
    fn load(&self) -> Result<Vec<IoDefinition>, StoreError> {
        let config = match fs::read_to_string(&self.path) {
            Ok(content) => IoConfig::from_toml(&content).map_err(|e| StoreError::Parse {
                path: self.path.clone(),
                reason: e.to_string(),
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => self.write_defaults()?,
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        debug!(count = config.io.len(), "I/O definitions loaded");
        Ok(config.io)
    }
}
