use crate::common::*;
use crate::ops::{self, DiceOperator};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program<'a> {
    pub statements: Vec<Node<'a>>,
}

impl<'a> Program<'a> {
    pub(crate) fn new(statements: Vec<Node<'a>>) -> Self {
        Self { statements }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl fmt::Display for Program<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, statement) in self.statements.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", statement)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    Integer(IntegerLiteral<'a>),
    Dice(DiceLiteral<'a>),
    Prefix(PrefixOperator, Box<Node<'a>>),
    Infix(Box<Node<'a>>, InfixOperator, Box<Node<'a>>),
    /// A token that could not start an expression. Evaluating it fails.
    Illegal(&'a str),
}

impl<'a> Node<'a> {
    pub(crate) fn new_prefix(op: PrefixOperator, operand: Self) -> Self {
        Self::Prefix(op, Box::new(operand))
    }

    pub(crate) fn new_infix(op: InfixOperator, left: Self, right: Self) -> Self {
        Self::Infix(Box::new(left), op, Box::new(right))
    }
}

impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(x) => x.fmt(f),
            Self::Dice(x) => x.fmt(f),
            Self::Prefix(op, x) => write!(f, "({}{})", op, x),
            Self::Infix(l, op, r) => write!(f, "({} {} {})", l, op, r),
            Self::Illegal(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegerLiteral<'a> {
    pub text: &'a str,
    pub tags: Vec<&'a str>,
    pub value: Int,
}

impl fmt::Display for IntegerLiteral<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)?;
        fmt_tags(&self.tags, f)
    }
}

/// A dice literal with its modifiers. Numeric fields use 0 for "not given".
#[derive(Debug, Clone, PartialEq)]
pub struct DiceLiteral<'a> {
    pub tags: Vec<&'a str>,
    pub size: UInt,
    pub quantity: UInt,
    pub min_value: UInt,
    pub max_value: UInt,
    pub keep_highest: UInt,
    pub keep_lowest: UInt,
}

impl<'a> DiceLiteral<'a> {
    pub fn new(size: UInt) -> Self {
        Self {
            tags: Vec::new(),
            size,
            quantity: 0,
            min_value: 0,
            max_value: 0,
            keep_highest: 0,
            keep_lowest: 0,
        }
    }

    /// The number of dice to roll; an unset quantity rolls one die.
    pub fn quantity(&self) -> UInt {
        self.quantity.max(1)
    }

    /// The operators to apply to the raw rolls, in application order.
    pub fn operators(&self) -> Vec<DiceOperator> {
        let mut ret = Vec::new();
        if let Some(x) = NonZeroUInt::new(self.max_value) {
            ret.push(ops::Maximum::new(x).into());
        }
        if let Some(x) = NonZeroUInt::new(self.min_value) {
            ret.push(ops::Minimum::new(x).into());
        }
        if let Some(x) = NonZeroUInt::new(self.keep_highest) {
            ret.push(ops::KeepHighest::new(x).into());
        }
        if let Some(x) = NonZeroUInt::new(self.keep_lowest) {
            ret.push(ops::KeepLowest::new(x).into());
        }
        ret
    }
}

/// The canonical text, `[quantity]d<size>[mi<n>][ma<n>][kl<n>][kh<n>][tag]...`.
/// This is also the base of the literal's metadata key.
impl fmt::Display for DiceLiteral<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quantity > 0 {
            write!(f, "{}", self.quantity)?;
        }
        write!(f, "d{}", self.size)?;

        let modifiers = [
            ("mi", self.min_value),
            ("ma", self.max_value),
            ("kl", self.keep_lowest),
            ("kh", self.keep_highest),
        ];
        for (keyword, x) in modifiers {
            if x > 0 {
                write!(f, "{}{}", keyword, x)?;
            }
        }

        fmt_tags(&self.tags, f)
    }
}

fn fmt_tags(tags: &[&str], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for tag in tags {
        write!(f, "[{}]", tag)?;
    }
    Ok(())
}
