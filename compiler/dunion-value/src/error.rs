//! Errors that can occur when constructing or reading a
//! [crate::TaggedValue].
use std::fmt;

use dunion_reporting::{error_codes::ErrorCode, report::Report};
use dunion_schema::{FieldIdx, VariantIdx, identifier::Identifier, ty::FieldTy};

/// A construction or access error. A failed construction never produces a
/// value, and a failed access never yields the contents of a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The named variant does not exist in the schema.
    UnknownVariant { schema: Identifier, name: Identifier },

    /// The variant index is past the end of the variants of the schema.
    VariantOutOfBounds { schema: Identifier, variant: VariantIdx, count: usize },

    /// The number of values that were given to a constructor does not match
    /// the number of fields of the variant.
    ArityMismatch { variant: Identifier, expected: usize, given: usize },

    /// A value does not have the declared type of its field.
    TypeMismatch { variant: Identifier, field: FieldIdx, expected: FieldTy, given: FieldTy },

    /// A field of a variant was read while another variant is active.
    InactiveVariantAccess { requested: Identifier, active: Identifier },

    /// The field index is past the end of the fields of the variant.
    FieldOutOfBounds { variant: Identifier, field: usize, arity: usize },

    /// A value of one schema was used where a value of another is expected.
    SchemaMismatch { expected: Identifier, given: Identifier },
}

impl ValueError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ValueError::UnknownVariant { .. } => ErrorCode::UnknownVariant,
            ValueError::VariantOutOfBounds { .. } => ErrorCode::VariantOutOfBounds,
            ValueError::ArityMismatch { .. } => ErrorCode::ArityMismatch,
            ValueError::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            ValueError::InactiveVariantAccess { .. } => ErrorCode::InactiveVariantAccess,
            ValueError::FieldOutOfBounds { .. } => ErrorCode::FieldOutOfBounds,
            ValueError::SchemaMismatch { .. } => ErrorCode::SchemaMismatch,
        }
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueError::UnknownVariant { schema, name } => {
                write!(f, "no variant named `{name}` in union `{schema}`")
            }
            ValueError::VariantOutOfBounds { schema, variant, count } => {
                write!(
                    f,
                    "variant #{variant} is out of bounds for `{schema}`, which has {count} variant{}",
                    dunion_utils::pluralise!(*count)
                )
            }
            ValueError::ArityMismatch { variant, expected, given } => {
                write!(
                    f,
                    "variant `{variant}` takes {expected} field{}, but {given} {} given",
                    dunion_utils::pluralise!(*expected),
                    if *given == 1 { "was" } else { "were" }
                )
            }
            ValueError::TypeMismatch { variant, field, expected, given } => {
                write!(
                    f,
                    "field {field} of `{variant}` expects a value of type `{expected}`, \
                     but a value of type `{given}` was given"
                )
            }
            ValueError::InactiveVariantAccess { requested, active } => {
                write!(f, "cannot read a field of `{requested}` while `{active}` is active")
            }
            ValueError::FieldOutOfBounds { variant, field, arity } => {
                write!(
                    f,
                    "field {field} is out of bounds for `{variant}`, which has {arity} field{}",
                    dunion_utils::pluralise!(*arity)
                )
            }
            ValueError::SchemaMismatch { expected, given } => {
                write!(f, "expected a value of union `{expected}`, found union `{given}`")
            }
        }
    }
}

impl std::error::Error for ValueError {}

impl From<ValueError> for Report {
    fn from(error: ValueError) -> Self {
        let mut report = Report::new();
        report.code(error.code()).title(&error);

        if let ValueError::InactiveVariantAccess { .. } = error {
            report.add_note("help", "check the tag of the value before reading its fields");
        }

        report
    }
}
