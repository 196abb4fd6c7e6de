//! I/O definition records, deserialized from `io.toml`.
//!
//! ```toml
//! [[io]]
//! name = "Sensor1"
//! kind = "input"
//! number = 6
//! ```
//!
//! Names are unique across inputs and outputs.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Direction of a digital I/O point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IoKind {
    /// Externally driven, read-only from the panel.
    #[serde(alias = "Input", alias = "INPUT")]
    Input,
    /// Operator-toggled in manual mode.
    #[serde(alias = "Output", alias = "OUTPUT")]
    Output,
}

/// One named digital I/O point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoDefinition {
    pub name: String,
    pub kind: IoKind,
    /// Terminal number on the I/O block (informational).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u16>,
}

impl IoDefinition {
    pub fn new(name: impl Into<String>, kind: IoKind, number: Option<u16>) -> Self {
        Self {
            name: name.into(),
            kind,
            number,
        }
    }
}

/// I/O configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IoConfigError {
    #[error("I/O config parse error: {0}")]
    Parse(String),

    #[error("duplicate I/O name '{0}'")]
    DuplicateName(String),

    #[error("I/O entry with an empty name")]
    EmptyName,
}

/// Contents of `io.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IoConfig {
    #[serde(default)]
    pub io: Vec<IoDefinition>,
}

impl IoConfig {
    /// Parse and validate.
    pub fn from_toml(content: &str) -> Result<Self, IoConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| IoConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, IoConfigError> {
        toml::to_string_pretty(self).map_err(|e| IoConfigError::Parse(e.to_string()))
    }

    /// Names must be non-empty and unique.
    pub fn validate(&self) -> Result<(), IoConfigError> {
        let mut seen = HashSet::with_capacity(self.io.len());
        for def in &self.io {
            if def.name.trim().is_empty() {
                return Err(IoConfigError::EmptyName);
            }
            if !seen.insert(def.name.as_str()) {
                return Err(IoConfigError::DuplicateName(def.name.clone()));
            }
        }
        Ok(())
    }

    /// Factory set written on first start: three sensors, three cylinders.
    pub fn defaults() -> Self {
        Self {
            io: vec![
                IoDefinition::new("Sensor1", IoKind::Input, Some(6)),
                IoDefinition::new("Sensor2", IoKind::Input, Some(7)),
                IoDefinition::new("Sensor3", IoKind::Input, Some(8)),
                IoDefinition::new("Cylinder1", IoKind::Output, Some(1)),
                IoDefinition::new("Cylinder2", IoKind::Output, Some(2)),
                IoDefinition::new("Cylinder3", IoKind::Output, Some(3)),
            ],
        }
    }

    pub fn of_kind(&self, kind: IoKind) -> impl Iterator<Item = &IoDefinition> {
        self.io.iter().filter(move |def| def.kind == kind)
    }
}
