//! Position stores: `positions.toml` on disk, or plain memory.
//!
//! ```toml
//! [[point]]
//! name = "Point_1"
//! x = 10.0
//! y = 0.0
//! z = -5.0
//! c = 90.0
//! ```

use c300_common::panel::axis::{CoordinateSet, Position};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{PositionStore, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct PointRecord {
    name: String,
    x: f64,
    y: f64,
    z: f64,
    c: f64,
}

impl From<&Position> for PointRecord {
    fn from(p: &Position) -> Self {
        Self {
            name: p.name.clone(),
            x: p.coords.x,
            y: p.coords.y,
            z: p.coords.z,
            c: p.coords.c,
        }
    }
}

impl From<PointRecord> for Position {
    fn from(r: PointRecord) -> Self {
        Position::new(r.name, CoordinateSet::new(r.x, r.y, r.z, r.c))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PointFile {
    #[serde(default)]
    point: Vec<PointRecord>,
}

/// Positions persisted in a TOML file. Every write rewrites the file.
#[derive(Debug, Clone)]
pub struct TomlPositionStore {
    path: PathBuf,
}

impl TomlPositionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Vec<Position>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        let file: PointFile = toml::from_str(&content).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;
        Ok(file.point.into_iter().map(Position::from).collect())
    }

    fn write(&self, positions: &[Position]) -> Result<(), StoreError> {
        let file = PointFile {
            point: positions.iter().map(PointRecord::from).collect(),
        };
        let text = toml::to_string_pretty(&file).map_err(|e| StoreError::Format(e.to_string()))?;
        fs::write(&self.path, text).map_err(|e| StoreError::io(&self.path, e))?;
        debug!(path = %self.path.display(), count = positions.len(), "positions written");
        Ok(())
    }

    fn modify<T>(
        &mut self,
        f: impl FnOnce(&mut Vec<Position>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut positions = self.read()?;
        let out = f(&mut positions)?;
        self.write(&positions)?;
        Ok(out)
    }
}

impl PositionStore for TomlPositionStore {
    fn list(&self) -> Result<Vec<Position>, StoreError> {
        self.read()
    }

    fn insert(&mut self, position: Position) -> Result<(), StoreError> {
        self.modify(|positions| insert_into(positions, position))
    }

    fn update(&mut self, position: Position) -> Result<(), StoreError> {
        self.modify(|positions| update_in(positions, position))
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), StoreError> {
        self.modify(|positions| rename_in(positions, from, to))
    }

    fn remove(&mut self, name: &str) -> Result<bool, StoreError> {
        self.modify(|positions| Ok(remove_from(positions, name)))
    }
}

/// In-memory position store.
#[derive(Debug, Clone, Default)]
pub struct MemoryPositionStore {
    positions: Vec<Position>,
}

impl MemoryPositionStore {
    pub fn new(positions: Vec<Position>) -> Self {
        Self { positions }
    }
}

impl PositionStore for MemoryPositionStore {
    fn list(&self) -> Result<Vec<Position>, StoreError> {
        Ok(self.positions.clone())
    }

    fn insert(&mut self, position: Position) -> Result<(), StoreError> {
        insert_into(&mut self.positions, position)
    }

    fn update(&mut self, position: Position) -> Result<(), StoreError> {
        update_in(&mut self.positions, position)
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), StoreError> {
        rename_in(&mut self.positions, from, to)
    }

    fn remove(&mut self, name: &str) -> Result<bool, StoreError> {
        Ok(remove_from(&mut self.positions, name))
    }
}

fn insert_into(positions: &mut Vec<Position>, position: Position) -> Result<(), StoreError> {
    if positions.iter().any(|p| p.name == position.name) {
        return Err(StoreError::Duplicate(position.name));
    }
    positions.push(position);
    Ok(())
}

fn update_in(positions: &mut [Position], position: Position) -> Result<(), StoreError> {
    match positions.iter_mut().find(|p| p.name == position.name) {
        Some(slot) => {
            slot.coords = position.coords;
            Ok(())
        }
        None => Err(StoreError::NotFound(position.name)),
    }
}

fn rename_in(positions: &mut [Position], from: &str, to: &str) -> Result<(), StoreError> {
    if from != to && positions.iter().any(|p| p.name == to) {
        return Err(StoreError::Duplicate(to.to_string()));
    }
    match positions.iter_mut().find(|p| p.name == from) {
        Some(slot) => {
            slot.name = to.to_string();
            Ok(())
        }
        None => Err(StoreError::NotFound(from.to_string())),
    }
}

fn remove_from(positions: &mut Vec<Position>, name: &str) -> bool {
    let before = positions.len();
    positions.retain(|p| p.name != name);
    positions.len() != before
}
