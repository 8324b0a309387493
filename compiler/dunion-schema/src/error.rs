//! Errors that can occur when defining a [crate::Schema].
use std::fmt;

use dunion_reporting::{error_codes::ErrorCode, report::Report};

use crate::{VariantIdx, identifier::Identifier};

/// A declaration error. These are detected once, when the schema is
/// defined, and can only be fixed by changing the declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two variants of the schema share the same name.
    DuplicateVariantName {
        schema: Identifier,
        name: Identifier,

        /// The variant that first used the name.
        first: VariantIdx,

        /// The variant that re-used the name.
        duplicate: VariantIdx,
    },

    /// The schema has no variants, and so would be uninhabited.
    EmptySchema { schema: Identifier },

    /// A variant takes the name that is reserved for wildcard arms.
    ReservedVariantName { schema: Identifier, variant: VariantIdx },

    /// Two fields of the same variant share the same name.
    DuplicateFieldName { schema: Identifier, variant: Identifier, name: Identifier },
}

impl SchemaError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SchemaError::DuplicateVariantName { .. } => ErrorCode::DuplicateVariantName,
            SchemaError::EmptySchema { .. } => ErrorCode::EmptySchema,
            SchemaError::DuplicateFieldName { .. } => ErrorCode::DuplicateFieldName,
            SchemaError::ReservedVariantName { .. } => ErrorCode::ReservedVariantName,
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::DuplicateVariantName { schema, name, .. } => {
                write!(f, "variant `{name}` is defined multiple times in union `{schema}`")
            }
            SchemaError::EmptySchema { schema } => {
                write!(f, "union `{schema}` has no variants")
            }
            SchemaError::DuplicateFieldName { schema, variant, name } => {
                write!(f, "field `{name}` is defined multiple times in `{schema}::{variant}`")
            }
            SchemaError::ReservedVariantName { schema, variant } => {
                let name = crate::WILDCARD;
                write!(f, "variant #{variant} of union `{schema}` cannot be named `{name}`")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

impl From<SchemaError> for Report {
    fn from(error: SchemaError) -> Self {
        let mut report = Report::new();
        report.code(error.code()).title(&error);

        match &error {
            SchemaError::DuplicateVariantName { first, duplicate, .. } => {
                report.add_note(
                    "note",
                    format!("first defined as variant #{}, then again as #{}", first, duplicate),
                );
            }
            SchemaError::EmptySchema { .. } => {
                report.add_note("note", "a union with no variants can never be constructed");
            }
            SchemaError::ReservedVariantName { .. } => {
                report.add_note("note", "`_` is the wildcard arm of a match");
            }
            SchemaError::DuplicateFieldName { .. } => {}
        }

        report
    }
}
