//! Operator-facing reports.
//!
//! The core never waits for acknowledgment: a report is fire-and-forget.

use c300_common::panel::error::ReportKind;
use tracing::{error, info, warn};

/// Notifier collaborator.
pub trait Notifier {
    fn report(&mut self, kind: ReportKind, message: &str);
}

/// Default notifier: forwards reports to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn report(&mut self, kind: ReportKind, message: &str) {
        match kind {
            ReportKind::Info => info!(target: "c300::operator", "{message}"),
            ReportKind::Warning => warn!(target: "c300::operator", "{message}"),
            ReportKind::Error => error!(target: "c300::operator", "{message}"),
        }
    }
}

/// A single recorded report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub kind: ReportKind,
    pub message: String,
}

/// Keeps every report in memory.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    reports: Vec<Report>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn last(&self) -> Option<&Report> {
        self.reports.last()
    }

    /// Drain all reports recorded so far.
    pub fn take(&mut self) -> Vec<Report> {
        std::mem::take(&mut self.reports)
    }

    pub fn count(&self, kind: ReportKind) -> usize {
        self.reports.iter().filter(|r| r.kind == kind).count()
    }

    /// True if any report of `kind` contains `needle`.
    pub fn contains(&self, kind: ReportKind, needle: &str) -> bool {
        self.reports
            .iter()
            .any(|r| r.kind == kind && r.message.contains(needle))
    }
}

impl Notifier for RecordingNotifier {
    fn report(&mut self, kind: ReportKind, message: &str) {
        self.reports.push(Report {
            kind,
            message: message.to_string(),
        });
    }
}
