//! Terminal highlighting for diagnostics and log messages.
use std::ops::BitOr;

/// Variants of highlighter colour that can be used.
#[derive(Debug, Clone, Copy)]
pub enum Colour {
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

/// Colour modifiers specifying if the colour should also
/// apply a text effect such as bold or underlined.
#[derive(Debug, Clone, Copy)]
pub enum Modifier {
    Bold,
    Underline,
}

impl BitOr<Modifier> for Colour {
    type Output = Decoration;

    fn bitor(self, rhs: Modifier) -> Self::Output {
        Decoration { colour: self, modifier: rhs }
    }
}

impl BitOr<Colour> for Modifier {
    type Output = Decoration;

    fn bitor(self, rhs: Colour) -> Self::Output {
        Decoration { colour: rhs, modifier: self }
    }
}

/// Anything that can produce an ANSI escape sequence.
pub trait Highlighter {
    fn escape_code(&self) -> &'static str;

    /// Any additional escape codes that should follow the primary
    /// one.
    fn trailing_code(&self) -> &'static str {
        ""
    }
}

impl Highlighter for Colour {
    fn escape_code(&self) -> &'static str {
        match self {
            Colour::Red => "\u{001b}[31;1m",
            Colour::Green => "\u{001b}[32;1m",
            Colour::Yellow => "\u{001b}[33;1m",
            Colour::Blue => "\u{001b}[34;1m",
            Colour::Magenta => "\u{001b}[35;1m",
            Colour::Cyan => "\u{001b}[36;1m",
        }
    }
}

impl Highlighter for Modifier {
    fn escape_code(&self) -> &'static str {
        match self {
            Modifier::Bold => "\u{001b}[1m",
            Modifier::Underline => "\u{001b}[4m",
        }
    }
}

/// The union of a colour and a text modifier, produced by `Colour | Modifier`.
#[derive(Debug, Clone, Copy)]
pub struct Decoration {
    pub colour: Colour,
    pub modifier: Modifier,
}

impl Highlighter for Decoration {
    fn escape_code(&self) -> &'static str {
        self.colour.escape_code()
    }

    fn trailing_code(&self) -> &'static str {
        self.modifier.escape_code()
    }
}

/// Apply a [Highlighter] to the message, resetting the effect at the end of
/// the message.
pub fn highlight(highlighter: impl Highlighter, message: impl ToString) -> String {
    const RESET: &str = "\u{001b}[0m";

    format!(
        "{}{}{}{RESET}",
        highlighter.escape_code(),
        highlighter.trailing_code(),
        message.to_string()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_resets() {
        let text = highlight(Colour::Red | Modifier::Bold, "error");

        assert!(text.starts_with("\u{001b}[31;1m\u{001b}[1m"));
        assert!(text.ends_with("error\u{001b}[0m"));
    }
}
