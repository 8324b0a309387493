//! Utilities for printing sequences of items in human readable error
//! messages, i.e. "`A`, `B`, and `C`".
use std::fmt;

/// Returns an `s` when the given count is not one, used to pluralise words
/// in diagnostic messages.
#[macro_export]
macro_rules! pluralise {
    ($count:expr) => {
        if $count == 1 { "" } else { "s" }
    };
}

/// How the items of a [SequenceDisplay] relate to one another.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SequenceJoinMode {
    /// One of the items is meant.
    Either,

    /// All of the items are meant.
    All,
}

impl SequenceJoinMode {
    pub fn as_conjunctive(&self) -> &'static str {
        match self {
            SequenceJoinMode::Either => "or",
            SequenceJoinMode::All => "and",
        }
    }
}

/// Options for a [SequenceDisplay].
#[derive(Debug, Clone, Copy)]
pub struct SequenceDisplayOptions {
    pub mode: SequenceJoinMode,

    /// The maximum number of items that are printed before the rest are
    /// summarised as "N others".
    pub limit: Option<usize>,
}

impl SequenceDisplayOptions {
    pub fn new(mode: SequenceJoinMode) -> Self {
        Self { mode, limit: None }
    }

    pub fn with_limit(mode: SequenceJoinMode, limit: usize) -> Self {
        Self { mode, limit: Some(limit) }
    }
}

/// Displays a sequence of items joined by commas and a conjunctive.
pub struct SequenceDisplay<'a, T> {
    pub items: &'a [T],
    options: SequenceDisplayOptions,
}

impl<'a, T> SequenceDisplay<'a, T> {
    pub fn new(items: &'a [T], options: SequenceDisplayOptions) -> Self {
        Self { items, options }
    }

    /// Create a [SequenceDisplay] with [SequenceJoinMode::Either].
    pub fn either(items: &'a [T]) -> Self {
        Self::new(items, SequenceDisplayOptions::new(SequenceJoinMode::Either))
    }

    /// Create a [SequenceDisplay] with [SequenceJoinMode::All].
    pub fn all(items: &'a [T]) -> Self {
        Self::new(items, SequenceDisplayOptions::new(SequenceJoinMode::All))
    }
}

impl<T: fmt::Display> fmt::Display for SequenceDisplay<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let conjunctive = self.options.mode.as_conjunctive();
        let limit = self.options.limit.unwrap_or(usize::MAX).max(1);

        // Items that are printed, and the number of items that are summarised.
        let shown = &self.items[..self.items.len().min(limit)];
        let hidden = self.items.len() - shown.len();

        for (index, item) in shown.iter().enumerate() {
            let is_last = index + 1 == shown.len();

            match (index, is_last) {
                (0, _) => write!(f, "`{item}`")?,
                (_, true) if hidden == 0 && shown.len() == 2 => {
                    write!(f, " {conjunctive} `{item}`")?
                }
                (_, true) if hidden == 0 => write!(f, ", {conjunctive} `{item}`")?,
                _ => write!(f, ", `{item}`")?,
            }
        }

        if hidden > 0 {
            write!(f, " {conjunctive} {hidden} other{}", pluralise!(hidden))?;
        }

        Ok(())
    }
}

/// Which set of characters to use when drawing boxes and tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CharacterSet {
    #[default]
    Unicode,
    Ascii,
}
