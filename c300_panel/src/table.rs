//! Position table with staged edits.
//!
//! Rows mirror the [`PositionStore`]. Cell edits are staged in memory until
//! saved; while any row is staged the panel is edit-locked. Adding,
//! renaming and removing rows go straight to the store and are refused
//! while edits are pending.

use std::collections::BTreeSet;

use c300_common::consts::POSITION_NAME_PREFIX;
use c300_common::panel::axis::{Axis, CoordinateSet, Position, parse_axis_value};
use c300_common::panel::error::PanelError;
use tracing::{debug, info};

use crate::store::{PositionStore, StoreError};

#[derive(Debug, Clone, Default)]
pub struct PositionTable {
    /// Rows as displayed, staged edits applied.
    rows: Vec<Position>,
    /// Rows as last read from or written to the store.
    committed: Vec<Position>,
    edited: BTreeSet<String>,
}

impl PositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(store: &dyn PositionStore) -> Result<Self, StoreError> {
        let rows = store.list()?;
        debug!(rows = rows.len(), "position table loaded");
        Ok(Self {
            committed: rows.clone(),
            rows,
            edited: BTreeSet::new(),
        })
    }

    pub fn rows(&self) -> &[Position] {
        &self.rows
    }

    pub fn get(&self, name: &str) -> Option<&Position> {
        self.rows.iter().find(|p| p.name == name)
    }

    /// Names of rows with unsaved edits.
    pub fn edited(&self) -> impl Iterator<Item = &str> {
        self.edited.iter().map(String::as_str)
    }

    /// Edit lock source.
    #[inline]
    pub fn has_pending_edits(&self) -> bool {
        !self.edited.is_empty()
    }

    /// Stage a new value for one cell.
    pub fn edit(&mut self, name: &str, axis: Axis, text: &str) -> Result<f64, PanelError> {
        let value = parse_axis_value(axis, text)?;
        let row = self
            .rows
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| PanelError::UnknownPosition(name.to_string()))?;
        row.coords.set(axis, value);
        self.edited.insert(name.to_string());
        debug!(position = name, %axis, value, "cell edited");
        Ok(value)
    }

    /// Write every staged row. Rows written before a failure stay
    /// committed; the rest remain staged.
    pub fn save(&mut self, store: &mut dyn PositionStore) -> Result<usize, PanelError> {
        let names: Vec<String> = self.edited.iter().cloned().collect();
        for name in &names {
            if let Some(row) = self.rows.iter().find(|p| &p.name == name) {
                store.update(row.clone())?;
                if let Some(slot) = self.committed.iter_mut().find(|p| &p.name == name) {
                    slot.coords = row.coords;
                }
            }
            self.edited.remove(name);
        }
        info!(count = names.len(), "position edits saved");
        Ok(names.len())
    }

    /// Drop staged edits and show the committed rows again.
    pub fn discard(&mut self) {
        if self.has_pending_edits() {
            debug!(count = self.edited.len(), "position edits discarded");
        }
        self.rows = self.committed.clone();
        self.edited.clear();
    }

    /// Reload from the store, keeping staged edits of rows that still exist.
    pub fn refresh(&mut self, store: &dyn PositionStore) -> Result<(), PanelError> {
        let committed = store.list()?;
        let mut rows = committed.clone();
        for row in &mut rows {
            if self.edited.contains(&row.name) {
                if let Some(staged) = self.get(&row.name) {
                    row.coords = staged.coords;
                }
            }
        }
        self.edited
            .retain(|name| committed.iter().any(|p| &p.name == name));
        self.rows = rows;
        self.committed = committed;
        Ok(())
    }

    /// Record `coords` as a new row named `Point_<n+1>` and return the name.
    pub fn add_current(
        &mut self,
        store: &mut dyn PositionStore,
        coords: CoordinateSet,
    ) -> Result<String, PanelError> {
        if self.has_pending_edits() {
            return Err(PanelError::EditLocked);
        }
        let name = self.next_name();
        let position = Position::new(name.clone(), coords);
        store.insert(position.clone())?;
        self.committed.push(position.clone());
        self.rows.push(position);
        info!(position = %name, "position added: {coords}");
        Ok(name)
    }

    /// Rename a row. The new name is trimmed and must be non-empty and
    /// unused.
    pub fn rename(
        &mut self,
        store: &mut dyn PositionStore,
        from: &str,
        to: &str,
    ) -> Result<String, PanelError> {
        if self.has_pending_edits() {
            return Err(PanelError::EditLocked);
        }
        let to = to.trim();
        if to.is_empty() {
            return Err(PanelError::EmptyName);
        }
        if self.get(from).is_none() {
            return Err(PanelError::UnknownPosition(from.to_string()));
        }
        if from == to {
            return Ok(to.to_string());
        }
        if self.get(to).is_some() {
            return Err(PanelError::PositionExists(to.to_string()));
        }
        store.rename(from, to)?;
        for row in self.rows.iter_mut().chain(self.committed.iter_mut()) {
            if row.name == from {
                row.name = to.to_string();
            }
        }
        info!(from, to, "position renamed");
        Ok(to.to_string())
    }

    pub fn remove(&mut self, store: &mut dyn PositionStore, name: &str) -> Result<(), PanelError> {
        if self.has_pending_edits() {
            return Err(PanelError::EditLocked);
        }
        if !store.remove(name)? {
            return Err(PanelError::UnknownPosition(name.to_string()));
        }
        self.rows.retain(|p| p.name != name);
        self.committed.retain(|p| p.name != name);
        info!(position = name, "position deleted");
        Ok(())
    }

    fn next_name(&self) -> String {
        let mut n = self.rows.len() + 1;
        loop {
            let name = format!("{POSITION_NAME_PREFIX}{n}");
            if self.get(&name).is_none() {
                return name;
            }
            n += 1;
        }
    }
}
