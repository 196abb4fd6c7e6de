//! Axes and the four-axis coordinate set.
//!
//! X, Y and Z are linear axes in millimetres; C is the rotary axis in
//! degrees. A [`CoordinateSet`] is always fully defined: there is no
//! partially-specified target.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::error::PanelError;
use crate::consts::AXIS_COUNT;

/// Manipulator axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
    /// Rotary axis.
    C = 3,
}

impl Axis {
    /// All axes in display order.
    pub const ALL: [Axis; AXIS_COUNT] = [Axis::X, Axis::Y, Axis::Z, Axis::C];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::X),
            1 => Some(Self::Y),
            2 => Some(Self::Z),
            3 => Some(Self::C),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
            Self::C => "C",
        }
    }

    /// Engineering unit: `°` for the rotary axis, `mm` otherwise.
    pub const fn unit(self) -> &'static str {
        match self {
            Self::C => "°",
            _ => "mm",
        }
    }

    #[inline]
    pub const fn is_rotary(self) -> bool {
        matches!(self, Self::C)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognized axis name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown axis '{0}' (expected X, Y, Z or C)")]
pub struct ParseAxisError(pub String);

impl FromStr for Axis {
    type Err = ParseAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "X" => Ok(Self::X),
            "Y" => Ok(Self::Y),
            "Z" => Ok(Self::Z),
            "C" => Ok(Self::C),
            _ => Err(ParseAxisError(s.to_string())),
        }
    }
}

/// Jog direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Negative,
    Positive,
}

impl Direction {
    /// `-1.0` or `+1.0`.
    #[inline]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Negative => -1.0,
            Self::Positive => 1.0,
        }
    }
}

impl FromStr for Direction {
    type Err = ParseAxisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" | "+1" | "pos" | "positive" => Ok(Self::Positive),
            "-" | "-1" | "neg" | "negative" => Ok(Self::Negative),
            other => Err(ParseAxisError(other.to_string())),
        }
    }
}

/// Four-axis coordinate set {X, Y, Z, C}.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoordinateSet {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub c: f64,
}

impl CoordinateSet {
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64, c: f64) -> Self {
        Self { x, y, z, c }
    }

    #[inline]
    pub const fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
            Axis::C => self.c,
        }
    }

    #[inline]
    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
            Axis::C => self.c = value,
        }
    }

    /// `(axis, value)` pairs in X, Y, Z, C order.
    pub fn iter(&self) -> impl Iterator<Item = (Axis, f64)> + '_ {
        Axis::ALL.into_iter().map(move |axis| (axis, self.get(axis)))
    }

    /// Parse a target from four text fields in X, Y, Z, C order.
    ///
    /// Fails with [`PanelError::InvalidTarget`] on the first field that is
    /// not a finite number.
    pub fn parse(fields: [&str; AXIS_COUNT]) -> Result<Self, PanelError> {
        let mut target = Self::ORIGIN;
        for (axis, field) in Axis::ALL.into_iter().zip(fields) {
            target.set(axis, parse_axis_value(axis, field)?);
        }
        Ok(target)
    }

    /// Ensure every axis holds a finite value.
    pub fn validate(&self) -> Result<(), PanelError> {
        match self.iter().find(|(_, value)| !value.is_finite()) {
            Some((axis, value)) => Err(PanelError::InvalidTarget {
                axis,
                value: value.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Sum of absolute per-axis deltas from `self` to `target`.
    pub fn total_displacement(&self, target: &CoordinateSet) -> f64 {
        Axis::ALL
            .into_iter()
            .map(|axis| (target.get(axis) - self.get(axis)).abs())
            .sum()
    }

    /// Display text for one axis, e.g. `12.500 mm` or `90.000 °`.
    pub fn format_axis(&self, axis: Axis) -> String {
        format!("{:.3} {}", self.get(axis), axis.unit())
    }
}

impl fmt::Display for CoordinateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X={:.3} Y={:.3} Z={:.3} C={:.3}",
            self.x, self.y, self.z, self.c
        )
    }
}

/// Parse one axis value, rejecting non-numeric and non-finite text.
pub fn parse_axis_value(axis: Axis, text: &str) -> Result<f64, PanelError> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(PanelError::InvalidTarget {
            axis,
            value: text.to_string(),
        }),
    }
}

/// Named entry of the position table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub name: String,
    pub coords: CoordinateSet,
}

impl Position {
    pub fn new(name: impl Into<String>, coords: CoordinateSet) -> Self {
        Self {
            name: name.into(),
            coords,
        }
    }
}
