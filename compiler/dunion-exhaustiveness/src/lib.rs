//! Exhaustiveness and reachability checking for matches on union values.
//!
//! A match is an ordered list of [Arm]s, each of which either names one
//! variant of the subject schema or is a wildcard. Checking a match computes
//! two properties at the same time:
//!
//! - exhaustiveness: does every variant of the schema have an arm that
//!   handles it? Variants without an arm are reported as missing.
//!
//! - reachability: will every arm ever be selected? An arm that names a
//!   variant that an earlier arm already handles, names a variant that does
//!   not exist, follows a wildcard, or is a wildcard that is left with no
//!   variants to cover, is unreachable.
//!
//! Both properties are always computed in full, so that every problem of a
//! match is reported at once. Whether unreachable arms are errors is up to
//! the caller.
//!
//! The result of a check also records which arm handles each variant. The
//! [matcher::Matcher] uses that as its dispatch table.

pub mod diagnostics;
pub mod matcher;
pub mod storage;

use std::fmt;

use diagnostics::{ExhaustivenessDiagnostics, ExhaustivenessError, ExhaustivenessWarning};
use dunion_reporting::diagnostic::Diagnostics;
use dunion_schema::{Schema, VariantIdx, WILDCARD, identifier::Identifier};
use dunion_utils::{index_vec::IndexVec, log};

/// A single arm of a match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Arm {
    /// Handles the named variant.
    Variant(Identifier),

    /// Handles every variant that is not handled by an earlier arm.
    Wildcard,
}

impl From<&str> for Arm {
    fn from(name: &str) -> Self {
        if name == WILDCARD { Arm::Wildcard } else { Arm::Variant(name.into()) }
    }
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arm::Variant(name) => write!(f, "{name}"),
            Arm::Wildcard => write!(f, "{WILDCARD}"),
        }
    }
}

/// The reason that an arm is unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unreachability {
    /// The variant is already handled by the arm at `first`.
    Duplicate { first: usize },

    /// The arm names a variant that the schema does not have.
    Unknown,

    /// The arm follows the wildcard arm at `wildcard`.
    AfterWildcard { wildcard: usize },

    /// The arm is a wildcard, but every variant is already handled.
    CoversNothing,
}

/// An arm that can never be selected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnreachableArm {
    /// The position of the arm in the match.
    pub index: usize,
    pub arm: Arm,
    pub reason: Unreachability,
}

/// The result of checking a match against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExhaustivenessReport {
    /// The name of the schema that was matched on.
    pub schema: Identifier,

    /// The variants that no arm handles, in declaration order.
    pub missing: Vec<Identifier>,

    /// The arms that can never be selected, in arm order.
    pub unreachable: Vec<UnreachableArm>,

    /// The arm that handles each variant, if any.
    pub coverage: IndexVec<VariantIdx, Option<usize>>,
}

impl ExhaustivenessReport {
    /// Check whether every variant is handled.
    pub fn is_exhaustive(&self) -> bool {
        self.missing.is_empty()
    }

    /// Check whether every variant is handled by exactly one arm, and
    /// every arm is reachable.
    pub fn is_ok(&self) -> bool {
        self.is_exhaustive() && self.unreachable.is_empty()
    }

    /// Convert the report into diagnostics. Missing variants are a single
    /// error, each unreachable arm is a warning.
    pub fn diagnostics(&self) -> ExhaustivenessDiagnostics {
        let mut diagnostics = ExhaustivenessDiagnostics::new();

        if !self.missing.is_empty() {
            diagnostics.add_error(ExhaustivenessError::MissingVariants {
                schema: self.schema.clone(),
                missing: self.missing.clone(),
            });
        }

        for arm in &self.unreachable {
            diagnostics.add_warning(ExhaustivenessWarning::UnreachableHandler {
                schema: self.schema.clone(),
                arm: arm.clone(),
            });
        }

        diagnostics
    }
}

/// Check an ordered list of arms against a schema.
pub fn check_exhaustive(schema: &Schema, arms: &[Arm]) -> ExhaustivenessReport {
    let mut coverage: IndexVec<VariantIdx, Option<usize>> =
        schema.variant_indices().map(|_| None).collect();
    let mut unreachable = vec![];
    let mut wildcard = None;

    for (index, arm) in arms.iter().enumerate() {
        let mut unreachable_because = |reason| {
            unreachable.push(UnreachableArm { index, arm: arm.clone(), reason });
        };

        if let Some(wildcard) = wildcard {
            unreachable_because(Unreachability::AfterWildcard { wildcard });
            continue;
        }

        match arm {
            Arm::Variant(name) => match schema.variant_index(name) {
                None => unreachable_because(Unreachability::Unknown),
                Some(variant) => match coverage[variant] {
                    Some(first) => unreachable_because(Unreachability::Duplicate { first }),
                    None => coverage[variant] = Some(index),
                },
            },
            Arm::Wildcard => {
                let mut covers_any = false;

                for entry in coverage.iter_mut().filter(|entry| entry.is_none()) {
                    *entry = Some(index);
                    covers_any = true;
                }

                if !covers_any {
                    unreachable_because(Unreachability::CoversNothing);
                }

                wildcard = Some(index);
            }
        }
    }

    let missing = coverage
        .iter_enumerated()
        .filter(|(_, arm)| arm.is_none())
        .map(|(variant, _)| schema.variant(variant).name.clone())
        .collect::<Vec<_>>();

    log::debug!(
        "checked {} arm(s) against `{}`: {} missing, {} unreachable",
        arms.len(),
        schema.name(),
        missing.len(),
        unreachable.len()
    );

    ExhaustivenessReport { schema: schema.name().clone(), missing, unreachable, coverage }
}

#[cfg(test)]
mod tests {
    use dunion_schema::{Variant, define_schema};
    use pretty_assertions::assert_eq;

    use super::*;

    fn abc() -> Schema {
        define_schema("Abc", ["A", "B", "C"].map(Variant::unit)).unwrap()
    }

    fn arms(names: &[&str]) -> Vec<Arm> {
        names.iter().map(|name| Arm::from(*name)).collect()
    }

    fn names(items: &[&str]) -> Vec<Identifier> {
        items.iter().map(|item| Identifier::from(*item)).collect()
    }

    #[test]
    fn test_missing_variant() {
        let report = check_exhaustive(&abc(), &arms(&["A", "B"]));

        assert_eq!(report.missing, names(&["C"]));
        assert!(report.unreachable.is_empty());
        assert!(!report.is_exhaustive());
    }

    #[test]
    fn test_unknown_variant() {
        let report = check_exhaustive(&abc(), &arms(&["A", "B", "C", "D"]));

        assert!(report.is_exhaustive());
        assert_eq!(
            report.unreachable,
            vec![UnreachableArm { index: 3, arm: "D".into(), reason: Unreachability::Unknown }]
        );
        assert!(!report.is_ok());
    }

    #[test]
    fn test_exact_cover() {
        let report = check_exhaustive(&abc(), &arms(&["C", "A", "B"]));

        assert!(report.is_ok());
        assert_eq!(
            report.coverage.iter().copied().collect::<Vec<_>>(),
            vec![Some(1), Some(2), Some(0)]
        );
    }

    #[test]
    fn test_problems_are_reported_together() {
        let report = check_exhaustive(&abc(), &arms(&["A", "A", "D"]));

        assert_eq!(report.missing, names(&["B", "C"]));
        assert_eq!(
            report.unreachable.iter().map(|arm| arm.reason).collect::<Vec<_>>(),
            vec![Unreachability::Duplicate { first: 0 }, Unreachability::Unknown]
        );

        let diagnostics = report.diagnostics();
        assert!(diagnostics.has_errors());
        assert_eq!(diagnostics.warnings.len(), 2);
    }

    #[test]
    fn test_wildcard_arms() {
        let schema = abc();

        let report = check_exhaustive(&schema, &arms(&["B", "_"]));
        assert!(report.is_ok());
        assert_eq!(
            report.coverage.iter().copied().collect::<Vec<_>>(),
            vec![Some(1), Some(0), Some(1)]
        );

        let report = check_exhaustive(&schema, &arms(&["_", "A"]));
        assert!(report.is_exhaustive());
        assert_eq!(
            report.unreachable,
            vec![UnreachableArm {
                index: 1,
                arm: "A".into(),
                reason: Unreachability::AfterWildcard { wildcard: 0 }
            }]
        );

        let report = check_exhaustive(&schema, &arms(&["A", "B", "C", "_"]));
        assert_eq!(report.unreachable[0].reason, Unreachability::CoversNothing);
    }

    #[test]
    fn test_empty_match() {
        let report = check_exhaustive(&abc(), &[]);
        assert_eq!(report.missing, names(&["A", "B", "C"]));
    }
}
