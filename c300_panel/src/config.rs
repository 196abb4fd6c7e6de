//! Panel configuration (`panel.toml`).
//!
//! ```toml
//! [shared]
//! log_level = "info"
//!
//! [motion]
//! seconds_per_unit = 0.1
//! min_move_seconds = 0.5
//!
//! [program]
//! step_interval_ms = 1000
//!
//! [jog]
//! distances = [0.01, 0.1, 0.5, 1.0, 5.0, 10.0]
//! default_distance = 1.0
//!
//! [storage]
//! positions = "positions.toml"
//! io = "io.toml"
//! ```
//!
//! Every section is optional. Relative storage paths resolve against the
//! directory of the configuration file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use c300_common::config::{ConfigError, ConfigLoader, SharedConfig};
use c300_common::consts::{
    DEFAULT_JOG_DISTANCE, DEFAULT_JOG_DISTANCES, DEFAULT_MIN_MOVE_SECONDS,
    DEFAULT_SECONDS_PER_UNIT, DEFAULT_STEP_INTERVAL_MS,
};
use serde::{Deserialize, Serialize};

use crate::motion::MotionProfile;

// ─── Sections ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionSection {
    pub seconds_per_unit: f64,
    pub min_move_seconds: f64,
}

impl Default for MotionSection {
    fn default() -> Self {
        Self {
            seconds_per_unit: DEFAULT_SECONDS_PER_UNIT,
            min_move_seconds: DEFAULT_MIN_MOVE_SECONDS,
        }
    }
}

impl MotionSection {
    pub fn profile(&self) -> MotionProfile {
        MotionProfile {
            seconds_per_unit: self.seconds_per_unit,
            min_seconds: self.min_move_seconds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProgramSection {
    /// Delay between steps in continuous execution.
    pub step_interval_ms: u64,
}

impl Default for ProgramSection {
    fn default() -> Self {
        Self {
            step_interval_ms: DEFAULT_STEP_INTERVAL_MS,
        }
    }
}

impl ProgramSection {
    pub const fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JogSection {
    /// Choices offered by the distance selector.
    pub distances: Vec<f64>,
    pub default_distance: f64,
}

impl Default for JogSection {
    fn default() -> Self {
        Self {
            distances: DEFAULT_JOG_DISTANCES.to_vec(),
            default_distance: DEFAULT_JOG_DISTANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSection {
    pub positions: PathBuf,
    pub io: PathBuf,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            positions: PathBuf::from("positions.toml"),
            io: PathBuf::from("io.toml"),
        }
    }
}

// ─── PanelConfig ────────────────────────────────────────────────────

/// Complete panel configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelConfig {
    pub shared: SharedConfig,
    pub motion: MotionSection,
    pub program: ProgramSection,
    pub jog: JogSection,
    pub storage: StorageSection,
}

impl PanelConfig {
    /// Load, validate, and resolve storage paths against the file's
    /// directory.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = <Self as ConfigLoader>::load(path)?;
        config.validate()?;
        if let Some(dir) = path.parent() {
            config.resolve_storage(dir);
        }
        Ok(config)
    }

    /// Parse and validate an in-memory document (paths left as written).
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config = <Self as ConfigLoader>::from_toml_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        positive("motion.seconds_per_unit", self.motion.seconds_per_unit)?;
        positive("motion.min_move_seconds", self.motion.min_move_seconds)?;
        if self.program.step_interval_ms == 0 {
            return Err(ConfigError::ValidationError(
                "program.step_interval_ms must be > 0".to_string(),
            ));
        }
        positive("jog.default_distance", self.jog.default_distance)?;
        for distance in &self.jog.distances {
            positive("jog.distances", *distance)?;
        }
        Ok(())
    }

    /// Make relative storage paths relative to `dir`.
    pub fn resolve_storage(&mut self, dir: &Path) {
        for path in [&mut self.storage.positions, &mut self.storage.io] {
            if path.is_relative() {
                *path = dir.join(&*path);
            }
        }
    }
}

fn positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(format!(
            "{field} must be a positive number, got {value}"
        )))
    }
}
