//! Reporting diagnostic trait which contains internal logic for adding
//! errors and warnings into an abstract diagnostic store that some stage
//! can implement.

use crate::{report::Report, reporter::Reporter};

/// Anything that can add itself to a [Reporter].
pub trait AddToReports {
    fn add_to_reports(&self, reporter: &mut Reporter);
}

pub trait Diagnostics<E, W> {
    /// Add an error into the diagnostics store.
    fn add_error(&mut self, error: E);

    /// Add a warning into the diagnostics store.
    fn add_warning(&mut self, warning: W);

    /// Check if the diagnostics has an error.
    fn has_errors(&self) -> bool;

    /// Convert the [Diagnostics] into a [Vec<Report>].
    fn into_reports(self) -> Vec<Report>;
}

/// A simple [Diagnostics] store, keeping errors and warnings in the order
/// that they were added.
#[derive(Debug, Clone)]
pub struct DiagnosticStore<E, W> {
    pub errors: Vec<E>,
    pub warnings: Vec<W>,
}

impl<E, W> Default for DiagnosticStore<E, W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, W> DiagnosticStore<E, W> {
    pub fn new() -> Self {
        Self { errors: vec![], warnings: vec![] }
    }
}

impl<E: AddToReports, W: AddToReports> Diagnostics<E, W> for DiagnosticStore<E, W> {
    fn add_error(&mut self, error: E) {
        self.errors.push(error);
    }

    fn add_warning(&mut self, warning: W) {
        self.warnings.push(warning);
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn into_reports(self) -> Vec<Report> {
        let mut reporter = Reporter::new();

        for error in &self.errors {
            error.add_to_reports(&mut reporter);
        }

        for warning in &self.warnings {
            warning.add_to_reports(&mut reporter);
        }

        reporter.into_reports()
    }
}
