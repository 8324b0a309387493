//! All diagnostics that are related to exhaustiveness and reachability checking
//! of matches.

use dunion_reporting::{
    diagnostic::{AddToReports, DiagnosticStore},
    error_codes::ErrorCode,
    reporter::Reporter,
};
use dunion_schema::identifier::Identifier;
use dunion_utils::{
    pluralise,
    printing::{SequenceDisplay, SequenceDisplayOptions, SequenceJoinMode},
};

use crate::{Arm, Unreachability, UnreachableArm};

pub type ExhaustivenessDiagnostics = DiagnosticStore<ExhaustivenessError, ExhaustivenessWarning>;

/// Errors that can be emitted during exhaustiveness checking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExhaustivenessError {
    /// The match does not handle the given variants.
    MissingVariants { schema: Identifier, missing: Vec<Identifier> },
}

impl AddToReports for ExhaustivenessError {
    fn add_to_reports(&self, reporter: &mut Reporter) {
        match self {
            ExhaustivenessError::MissingVariants { schema, missing } => {
                let variants = SequenceDisplay::new(
                    missing,
                    SequenceDisplayOptions::with_limit(SequenceJoinMode::All, 3),
                );

                reporter
                    .error()
                    .code(ErrorCode::NonExhaustiveMatch)
                    .title(format!("non-exhaustive match on `{schema}`: {variants} not covered"))
                    .add_note(
                        "help",
                        format!(
                            "add an arm for the missing variant{}, or a wildcard arm",
                            pluralise!(missing.len())
                        ),
                    );
            }
        }
    }
}

/// Warnings that can be emitted by the exhaustiveness checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExhaustivenessWarning {
    /// The arm is never going to be selected.
    UnreachableHandler { schema: Identifier, arm: UnreachableArm },
}

impl AddToReports for ExhaustivenessWarning {
    fn add_to_reports(&self, reporter: &mut Reporter) {
        match self {
            ExhaustivenessWarning::UnreachableHandler { schema, arm } => {
                let UnreachableArm { index, arm, reason } = arm;

                let subject = match arm {
                    Arm::Variant(name) => format!("arm `{name}`"),
                    Arm::Wildcard => "wildcard arm".to_string(),
                };

                let note = match reason {
                    Unreachability::Duplicate { first } => {
                        format!("`{arm}` is already handled by arm #{first}")
                    }
                    Unreachability::Unknown => {
                        format!("union `{schema}` has no variant named `{arm}`")
                    }
                    Unreachability::AfterWildcard { wildcard } => {
                        format!("the wildcard arm #{wildcard} handles every remaining variant")
                    }
                    Unreachability::CoversNothing => {
                        "every variant is already handled by an earlier arm".to_string()
                    }
                };

                reporter
                    .warning()
                    .code(ErrorCode::UnreachableHandler)
                    .title(format!("{subject} (#{index}) is unreachable"))
                    .add_note("note", note);
            }
        }
    }
}
