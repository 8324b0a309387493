//! Dunion error and warning reporting.
pub mod diagnostic;
pub mod error_codes;
pub mod report;
pub mod reporter;
