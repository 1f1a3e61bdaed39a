use super::error::{Diagnostic, DiagnosticKind, Diagnostics};
use super::{ast::*, lexer::*, Parse};
use crate::common::*;

/// The nesting cap [`crate::roll`] parses with.
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
enum Precedence {
    Lowest,
    Sum,
    Product,
    Exponent,
    Prefix,
}

pub struct Parser<'a> {
    source: &'a str,
    lexer: Lexer<'a>,
    current: Token<'a>,
    peek: Token<'a>,
    diagnostics: Vec<Diagnostic>,
    depth: usize,
    max_depth: Option<usize>,
    abandoned: bool,
}

impl<'a> Parser<'a> {
    const SUM_OPS: &'static [TokenKind] = &[TokenKind::Plus, TokenKind::Minus];

    const PRODUCT_OPS: &'static [TokenKind] =
        &[TokenKind::Star, TokenKind::Slash, TokenKind::Percent];

    const EXPONENT_OPS: &'static [TokenKind] = &[TokenKind::Caret];

    pub fn new(s: &'a str) -> Self {
        let mut lexer = Lexer::new(s);
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            source: s,
            lexer,
            current,
            peek,
            diagnostics: Vec::new(),
            depth: 0,
            max_depth: None,
            abandoned: false,
        }
    }

    /// Caps how deeply expressions may nest. Parentheses, prefix operators
    /// and each further operator in a chain add a level. Anything deeper is
    /// reported and the rest of the input is dropped.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn parse(mut self) -> Parse<'a> {
        let program = self.parse_program();
        Parse {
            program,
            diagnostics: Diagnostics(self.diagnostics),
        }
    }

    fn advance(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }

    fn peek_matches(&self, kind: TokenKind) -> bool {
        self.peek.is(kind)
    }

    fn peek_matches_any(&self, options: &[TokenKind]) -> bool {
        options.contains(&self.peek.kind)
    }

    fn slice(&self) -> &'a str {
        &self.source[self.current.span.clone()]
    }

    fn diagnose_at(&mut self, kind: DiagnosticKind, token: &Token<'a>) {
        let diagnostic = Diagnostic {
            kind,
            span: token.span.clone(),
            slice: self.source[token.span.clone()].to_string(),
        };
        log::debug!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    fn diagnose(&mut self, kind: DiagnosticKind) {
        let token = self.current.clone();
        self.diagnose_at(kind, &token);
    }

    fn precedence(kind: TokenKind) -> Precedence {
        if Self::SUM_OPS.contains(&kind) {
            Precedence::Sum
        } else if Self::PRODUCT_OPS.contains(&kind) {
            Precedence::Product
        } else if Self::EXPONENT_OPS.contains(&kind) {
            Precedence::Exponent
        } else {
            Precedence::Lowest
        }
    }

    fn infix_operator(kind: TokenKind) -> Option<InfixOperator> {
        use InfixOperator::*;

        Some(match kind {
            TokenKind::Plus => Add,
            TokenKind::Minus => Sub,
            TokenKind::Star => Mul,
            TokenKind::Slash => Div,
            TokenKind::Percent => Rem,
            TokenKind::Caret => Pow,
            _ => return None,
        })
    }

    fn parse_program(&mut self) -> Program<'a> {
        let mut statements = Vec::new();
        while !self.current.is(TokenKind::Eof) {
            statements.push(self.parse_expression(Precedence::Lowest));
            self.advance();
        }
        Program::new(statements)
    }

    /// Parses one expression starting at the current token. On return the
    /// current token is the last one the expression used.
    fn parse_expression(&mut self, precedence: Precedence) -> Node<'a> {
        if let Some(max) = self.max_depth {
            if self.depth >= max {
                return self.abandon(max);
            }
        }

        let depth = self.depth;
        self.depth += 1;
        let mut left = self.parse_prefix();
        while !self.peek_matches(TokenKind::Eof) && precedence < Self::precedence(self.peek.kind) {
            // a chain like `1 + 2 + 3` nests to the left
            self.depth += 1;
            self.advance();
            left = self.parse_infix(left);
        }
        self.depth = depth;

        left
    }

    fn abandon(&mut self, max: usize) -> Node<'a> {
        if !self.abandoned {
            self.diagnose(DiagnosticKind::TooDeep(max));
            self.abandoned = true;
        }

        let start = self.current.span.start;
        while !self.peek_matches(TokenKind::Eof) {
            self.advance();
        }
        Node::Illegal(&self.source[start..])
    }

    fn parse_prefix(&mut self) -> Node<'a> {
        match self.current.kind {
            TokenKind::Integer => {
                let adjacent = self.peek_matches(TokenKind::Dice)
                    && self.current.span.end == self.peek.span.start;
                if adjacent {
                    let quantity = self.parse_operand();
                    self.advance();
                    self.parse_dice(quantity)
                } else {
                    self.parse_integer()
                }
            }
            TokenKind::Dice => self.parse_dice(0),
            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_expression(Precedence::Prefix);
                Node::new_prefix(PrefixOperator::Neg, operand)
            }
            TokenKind::LeftParen => self.parse_grouped(),
            TokenKind::Illegal => Node::Illegal(self.current.text),
            TokenKind::Eof => {
                self.diagnose(DiagnosticKind::NoPrefixRule(TokenKind::Eof));
                Node::Illegal(TokenKind::Eof.as_str())
            }
            kind => {
                self.diagnose(DiagnosticKind::NoPrefixRule(kind));
                Node::Illegal(self.slice())
            }
        }
    }

    fn parse_infix(&mut self, left: Node<'a>) -> Node<'a> {
        let kind = self.current.kind;
        let op = Self::infix_operator(kind).expect("only operators have a binding precedence");
        let precedence = Self::precedence(kind);

        self.advance();
        let right = self.parse_expression(precedence);
        Node::new_infix(op, left, right)
    }

    fn parse_grouped(&mut self) -> Node<'a> {
        self.advance();
        let inner = self.parse_expression(Precedence::Lowest);

        if self.peek_matches(TokenKind::RightParen) {
            self.advance();
        } else if !self.abandoned {
            let peek = self.peek.clone();
            self.diagnose_at(DiagnosticKind::UnclosedParen, &peek);
        }
        inner
    }

    fn parse_integer(&mut self) -> Node<'a> {
        let text = self.current.text;
        let value = match text.parse::<Int>() {
            Ok(value) => value,
            Err(_) => {
                self.diagnose(DiagnosticKind::IntegerOverflow);
                return Node::Illegal(text);
            }
        };

        let mut tags = Vec::new();
        while self.peek_matches(TokenKind::Tag) {
            self.advance();
            tags.push(self.current.text);
        }

        Node::Integer(IntegerLiteral { text, tags, value })
    }

    fn parse_dice(&mut self, quantity: UInt) -> Node<'a> {
        let mut dice = DiceLiteral {
            quantity,
            ..DiceLiteral::new(self.parse_operand())
        };

        while self.peek_matches_any(TokenKind::DICE_MODIFIERS) {
            self.advance();
            match self.current.kind {
                TokenKind::Tag => dice.tags.push(self.current.text),
                TokenKind::Quantity => dice.quantity = self.parse_operand(),
                TokenKind::Minimum => dice.min_value = self.parse_operand(),
                TokenKind::Maximum => dice.max_value = self.parse_operand(),
                TokenKind::KeepHighest => dice.keep_highest = self.parse_operand(),
                TokenKind::KeepLowest => dice.keep_lowest = self.parse_operand(),
                _ => unreachable!(),
            }
        }

        Node::Dice(dice)
    }

    /// Reads the current token's digits as an unsigned operand, or 0 with a
    /// diagnostic when there are none or they are out of range.
    fn parse_operand(&mut self) -> UInt {
        match self.current.text.parse() {
            Ok(x) => x,
            Err(_) => {
                self.diagnose(DiagnosticKind::InvalidOperand(self.current.kind));
                0
            }
        }
    }
}
