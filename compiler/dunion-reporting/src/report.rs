//! The [Report] data structure, which is the rendered form of every error
//! and warning that the crates in the workspace produce.
use std::fmt;

use dunion_utils::highlight::{highlight, Colour, Modifier};

use crate::error_codes::ErrorCode;

/// The kind of [Report].
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum ReportKind {
    /// The report is an error.
    Error,

    /// The report is a warning.
    Warning,
}

impl ReportKind {
    /// Get the label of the [ReportKind], without any highlighting.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Error => "error",
            ReportKind::Warning => "warn",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.as_str();

        match self {
            ReportKind::Error => {
                write!(f, "{}", highlight(Colour::Red | Modifier::Bold, label))
            }
            ReportKind::Warning => {
                write!(f, "{}", highlight(Colour::Yellow | Modifier::Bold, label))
            }
        }
    }
}

/// An additional note attached to a [Report].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportNote {
    pub label: String,
    pub message: String,
}

impl ReportNote {
    pub fn new(label: impl ToString, message: impl ToString) -> Self {
        Self { label: label.to_string(), message: message.to_string() }
    }
}

/// A single error, warning or informational message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// The kind of the report.
    pub kind: ReportKind,

    /// The headline of the report.
    pub title: String,

    /// An optional associated error code.
    pub error_code: Option<ErrorCode>,

    /// Any additional notes.
    pub notes: Vec<ReportNote>,
}

impl Default for Report {
    fn default() -> Self {
        Self::new()
    }
}

impl Report {
    /// Create a new empty error [Report].
    pub fn new() -> Self {
        Self { kind: ReportKind::Error, title: String::new(), error_code: None, notes: vec![] }
    }

    /// Set the kind of the [Report].
    pub fn kind(&mut self, kind: ReportKind) -> &mut Self {
        self.kind = kind;
        self
    }

    /// Set the title of the [Report].
    pub fn title(&mut self, title: impl ToString) -> &mut Self {
        self.title = title.to_string();
        self
    }

    /// Set the [ErrorCode] of the [Report].
    pub fn code(&mut self, code: ErrorCode) -> &mut Self {
        self.error_code = Some(code);
        self
    }

    /// Add a note to the [Report].
    pub fn add_note(&mut self, label: impl ToString, message: impl ToString) -> &mut Self {
        self.notes.push(ReportNote::new(label, message));
        self
    }

    /// Check whether the [Report] is an error.
    pub fn is_error(&self) -> bool {
        self.kind == ReportKind::Error
    }

    /// Render the [Report] without any terminal highlighting.
    pub fn to_plain_string(&self) -> String {
        let mut rendered = match self.error_code {
            Some(code) => format!("{}[{code}]: {}", self.kind.as_str(), self.title),
            None => format!("{}: {}", self.kind.as_str(), self.title),
        };

        for note in &self.notes {
            rendered.push_str(&format!("\n  = {}: {}", note.label, note.message));
        }

        rendered
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.error_code {
            Some(code) => write!(f, "{}[{code}]: {}", self.kind, self.title)?,
            None => write!(f, "{}: {}", self.kind, self.title)?,
        }

        for note in &self.notes {
            write!(
                f,
                "\n  {} {}: {}",
                highlight(Colour::Blue | Modifier::Bold, "="),
                note.label,
                note.message
            )?;
        }

        Ok(())
    }
}
