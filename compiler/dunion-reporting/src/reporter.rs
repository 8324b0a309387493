//! Collects [Report]s through a fluent builder API.
use crate::report::{Report, ReportKind};

pub type Reports = Vec<Report>;

/// Builds up a list of [Report]s, each call starts a new report that can
/// then be filled in through the [Report] builder methods.
#[derive(Debug, Default)]
pub struct Reporter {
    reports: Reports,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new report of the given kind.
    pub fn report(&mut self, kind: ReportKind) -> &mut Report {
        let mut report = Report::new();
        report.kind(kind);
        self.reports.push(report);

        let index = self.reports.len() - 1;
        &mut self.reports[index]
    }

    pub fn error(&mut self) -> &mut Report {
        self.report(ReportKind::Error)
    }

    pub fn warning(&mut self) -> &mut Report {
        self.report(ReportKind::Warning)
    }

    pub fn into_reports(self) -> Reports {
        self.reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_codes::ErrorCode;

    #[test]
    fn test_reporter_order() {
        let mut reporter = Reporter::new();
        reporter.warning().code(ErrorCode::UnreachableHandler).title("arm `D` is unreachable");
        reporter.error().code(ErrorCode::NonExhaustiveMatch).title("`C` not covered");

        let reports = reporter.into_reports();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].kind, ReportKind::Warning);
        assert!(!reports[0].is_error() && reports[1].is_error());
        assert_eq!(reports[1].error_code, Some(ErrorCode::NonExhaustiveMatch));
    }
}
