use super::lexer::TokenKind;
use std::fmt;
use std::ops::Range;

/// A problem found while parsing. The parser records it and keeps going.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("error at position {} ({slice:?}): {kind}", .span.start)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub span: Range<usize>,
    pub slice: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// The digits after a dice marker or modifier keyword are missing or out of range.
    InvalidOperand(TokenKind),
    /// An integer literal does not fit in 64 bits.
    IntegerOverflow,
    UnclosedParen,
    NoPrefixRule(TokenKind),
    TooDeep(usize),
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidOperand(kind) => write!(f, "could not parse operand of {} as an integer", kind),
            Self::IntegerOverflow => write!(f, "integer literal is too large"),
            Self::UnclosedParen => write!(f, "expected ')'"),
            Self::NoPrefixRule(TokenKind::Eof) => write!(f, "unexpected end of input"),
            Self::NoPrefixRule(kind) => write!(f, "no prefix parse rule for {}", kind),
            Self::TooDeep(max) => write!(f, "expression nests deeper than {} levels", max),
        }
    }
}

/// Every diagnostic from one parse, in source order.
#[derive(thiserror::Error, Debug, Clone, Default, PartialEq)]
#[error("{}", join(.0))]
pub struct Diagnostics(pub Vec<Diagnostic>);

impl Diagnostics {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }
}

fn join(diagnostics: &[Diagnostic]) -> String {
    let diagnostics: Vec<_> = diagnostics.iter().map(ToString::to_string).collect();
    diagnostics.join("; ")
}

impl<'d> IntoIterator for &'d Diagnostics {
    type Item = &'d Diagnostic;
    type IntoIter = std::slice::Iter<'d, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
