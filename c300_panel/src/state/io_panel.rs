//! Digital I/O panel state.
//!
//! Outputs start off and are toggled by the operator. Inputs are driven
//! from outside the panel; the simulator seeds them with random levels.

use c300_common::io::config::{IoDefinition, IoKind};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

/// One named I/O point and its current level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IoPoint {
    pub name: String,
    pub kind: IoKind,
    pub state: bool,
}

/// Named digital inputs and outputs, in definition order.
#[derive(Debug, Clone, Default)]
pub struct IoPanel {
    points: Vec<IoPoint>,
}

impl IoPanel {
    /// Empty panel (no definitions loaded).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from definitions: outputs off, inputs at a random level.
    pub fn from_definitions<R: Rng + ?Sized>(defs: &[IoDefinition], rng: &mut R) -> Self {
        let points: Vec<IoPoint> = defs
            .iter()
            .map(|def| IoPoint {
                name: def.name.clone(),
                kind: def.kind,
                state: match def.kind {
                    IoKind::Input => rng.gen_bool(0.5),
                    IoKind::Output => false,
                },
            })
            .collect();

        debug!(
            inputs = points.iter().filter(|p| p.kind == IoKind::Input).count(),
            outputs = points.iter().filter(|p| p.kind == IoKind::Output).count(),
            "I/O panel initialized"
        );
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[IoPoint] {
        &self.points
    }

    pub fn of_kind(&self, kind: IoKind) -> impl Iterator<Item = &IoPoint> {
        self.points.iter().filter(move |p| p.kind == kind)
    }

    pub fn state(&self, name: &str) -> Option<bool> {
        self.find(name).map(|p| p.state)
    }

    /// Flip an output. Returns the new level, or `None` if `name` is not an
    /// output.
    pub fn toggle_output(&mut self, name: &str) -> Option<bool> {
        let point = self
            .points
            .iter_mut()
            .find(|p| p.name == name && p.kind == IoKind::Output)?;
        point.state = !point.state;
        info!(output = name, on = point.state, "output toggled");
        Some(point.state)
    }

    /// Set an input level from the outside world. Returns `false` if `name`
    /// is not an input.
    pub fn set_input(&mut self, name: &str, state: bool) -> bool {
        match self
            .points
            .iter_mut()
            .find(|p| p.name == name && p.kind == IoKind::Input)
        {
            Some(point) => {
                point.state = state;
                true
            }
            None => false,
        }
    }

    fn find(&self, name: &str) -> Option<&IoPoint> {
        self.points.iter().find(|p| p.name == name)
    }
}
