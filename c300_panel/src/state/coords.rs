//! Live axis coordinates.
//!
//! Created at the origin, mutated by jog and by move completion, never
//! reset. A rejected jog leaves every axis untouched.

use c300_common::panel::axis::{Axis, CoordinateSet, Direction};
use c300_common::panel::error::PanelError;
use tracing::debug;

/// Owner of the four live axis values.
#[derive(Debug, Clone, Default)]
pub struct CoordinateState {
    coords: CoordinateSet,
}

impl CoordinateState {
    /// Start at the origin.
    pub const fn new() -> Self {
        Self {
            coords: CoordinateSet::ORIGIN,
        }
    }

    #[inline]
    pub const fn current(&self) -> CoordinateSet {
        self.coords
    }

    #[inline]
    pub const fn get(&self, axis: Axis) -> f64 {
        self.coords.get(axis)
    }

    /// Move one axis by `direction * distance` and return its new value.
    pub fn jog(
        &mut self,
        axis: Axis,
        direction: Direction,
        distance: f64,
    ) -> Result<f64, PanelError> {
        let distance = validate_distance(distance)?;
        let value = self.coords.get(axis) + direction.sign() * distance;
        self.coords.set(axis, value);
        debug!(%axis, value, "jog");
        Ok(value)
    }

    /// Overwrite all four axes at once.
    pub fn set_all(&mut self, target: CoordinateSet) {
        self.coords = target;
    }
}

/// Accept only finite, strictly positive distances.
pub fn validate_distance(distance: f64) -> Result<f64, PanelError> {
    if distance.is_finite() && distance > 0.0 {
        Ok(distance)
    } else {
        Err(PanelError::InvalidDistance(distance.to_string()))
    }
}

/// Parse a distance entered as text.
pub fn parse_distance(text: &str) -> Result<f64, PanelError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| PanelError::InvalidDistance(text.to_string()))
}
