use logos::Logos;
use std::fmt;
use std::ops::Range;

/// The raw lexical classes recognized by logos. `Lexer` folds these into the
/// public [`TokenKind`]s and trims the marker characters off their text.
#[derive(Logos, Debug, Copy, Clone, Eq, PartialEq)]
enum RawToken {
    #[regex(r"[0-9]+")]
    Integer,
    #[regex(r"d[0-9]+")]
    Dice,

    #[regex(r"qu[0-9]*")]
    Quantity,
    #[regex(r"mi[0-9]*")]
    Minimum,
    #[regex(r"ma[0-9]*")]
    Maximum,
    #[regex(r"kh[0-9]*")]
    KeepHighest,
    #[regex(r"kl[0-9]*")]
    KeepLowest,

    #[regex(r"\[[^\]]*\]")]
    Tag,
    #[regex(r"\[[^\]]*")]
    UnclosedTag,
    #[regex(r"[A-Za-z_]+")]
    Word,

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,

    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[error]
    Error,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TokenKind {
    Integer,
    Dice,
    Quantity,
    Minimum,
    Maximum,
    KeepHighest,
    KeepLowest,
    Tag,
    LeftParen,
    RightParen,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Illegal,
    Eof,
}

impl TokenKind {
    pub const DICE_MODIFIERS: &'static [Self] = &[
        Self::Tag,
        Self::Quantity,
        Self::Minimum,
        Self::Maximum,
        Self::KeepHighest,
        Self::KeepLowest,
    ];

    pub fn as_str(&self) -> &'static str {
        use TokenKind::*;

        match self {
            Integer => "<integer>",
            Dice => "<dice>",
            Quantity => "'qu'",
            Minimum => "'mi'",
            Maximum => "'ma'",
            KeepHighest => "'kh'",
            KeepLowest => "'kl'",
            Tag => "<tag>",
            LeftParen => "'('",
            RightParen => "')'",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Percent => "'%'",
            Caret => "'^'",
            Illegal => "<illegal>",
            Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// The token's payload: digits for dice and modifiers, the inner text for
    /// tags, and the full slice for everything else.
    pub text: &'a str,
    pub span: Range<usize>,
}

impl<'a> Token<'a> {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

pub struct Lexer<'a> {
    inner: logos::Lexer<'a, RawToken>,
}

impl<'a> Lexer<'a> {
    pub fn new(s: &'a str) -> Self {
        Self {
            inner: RawToken::lexer(s),
        }
    }

    /// Returns the next token. Once the input is exhausted every call yields
    /// an `Eof` token positioned at the end of the input.
    pub fn next_token(&mut self) -> Token<'a> {
        let raw = match self.inner.next() {
            Some(raw) => raw,
            None => {
                let end = self.inner.source().len();
                return Token {
                    kind: TokenKind::Eof,
                    text: "",
                    span: end..end,
                };
            }
        };

        let slice = self.inner.slice();
        let (kind, text) = match raw {
            RawToken::Integer => (TokenKind::Integer, slice),
            RawToken::Dice => (TokenKind::Dice, &slice[1..]),
            RawToken::Quantity => (TokenKind::Quantity, &slice[2..]),
            RawToken::Minimum => (TokenKind::Minimum, &slice[2..]),
            RawToken::Maximum => (TokenKind::Maximum, &slice[2..]),
            RawToken::KeepHighest => (TokenKind::KeepHighest, &slice[2..]),
            RawToken::KeepLowest => (TokenKind::KeepLowest, &slice[2..]),
            RawToken::Tag => (TokenKind::Tag, &slice[1..slice.len() - 1]),
            RawToken::LeftParen => (TokenKind::LeftParen, slice),
            RawToken::RightParen => (TokenKind::RightParen, slice),
            RawToken::Plus => (TokenKind::Plus, slice),
            RawToken::Minus => (TokenKind::Minus, slice),
            RawToken::Star => (TokenKind::Star, slice),
            RawToken::Slash => (TokenKind::Slash, slice),
            RawToken::Percent => (TokenKind::Percent, slice),
            RawToken::Caret => (TokenKind::Caret, slice),
            RawToken::UnclosedTag | RawToken::Word | RawToken::Error => {
                (TokenKind::Illegal, slice)
            }
        };

        Token {
            kind,
            text,
            span: self.inner.span(),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.is(TokenKind::Eof) {
            None
        } else {
            Some(token)
        }
    }
}
