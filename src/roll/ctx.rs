use super::{
    error::EvalError,
    metadata::{Metadata, Resolution},
    roller::Roller,
    RResult,
};
use crate::common::*;
use crate::ops::{self, DiceOperate};
use crate::parse::{
    ast,
    visit::{self, Accept},
};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

pub type DefaultRoller = rand::prelude::ThreadRng;

/// The roll bound used by [`RollContext::default`].
pub const DEFAULT_MAX_ROLLS: usize = 10_000;

/// Evaluates programs against a source of randomness, optionally capping the
/// number of dice rolled per evaluation.
pub struct RollContext<R = DefaultRoller> {
    max_rolls: Option<usize>,
    rolls: usize,
    roller: R,
    metadata: Metadata,
}

impl<R: Roller> RollContext<R> {
    pub fn new(max_rolls: Option<usize>, roller: R) -> Self {
        Self {
            max_rolls,
            rolls: 0,
            roller,
            metadata: Metadata::default(),
        }
    }

    pub fn new_bounded(max_rolls: usize, roller: R) -> Self {
        Self::new(Some(max_rolls), roller)
    }

    pub fn new_unbounded(roller: R) -> Self {
        Self::new(None, roller)
    }

    fn count_rolls(&mut self, n: usize) -> RResult<()> {
        self.rolls = self.rolls.saturating_add(n);
        if self.max_rolls.map_or(false, |max| self.rolls > max) {
            Err(EvalError::TooManyRolls)
        } else {
            Ok(())
        }
    }

    pub fn roll(&mut self, num: NonZeroUsize, sides: NonZeroUInt) -> RResult<NonEmpty<UInt>> {
        self.count_rolls(num.get())?;
        Ok(self.roller.roll_n(num, sides))
    }

    /// Evaluates every statement of `program` and returns the last value
    /// along with the terms resolved on the way. The metadata is partial when
    /// the value is an error.
    pub fn eval(&mut self, program: &ast::Program<'_>) -> Evaluation {
        self.rolls = 0;
        self.metadata = Metadata::default();

        let value = program.accept(self);
        let metadata = std::mem::take(&mut self.metadata);
        match &value {
            Ok(x) => log::debug!(
                "evaluated {} = {} ({} terms, {} dice)",
                program,
                x,
                metadata.len(),
                self.rolls
            ),
            Err(why) => log::debug!("evaluating {} failed: {}", program, why),
        }

        Evaluation { value, metadata }
    }
}

impl Default for RollContext {
    fn default() -> Self {
        Self::new_bounded(DEFAULT_MAX_ROLLS, rand::thread_rng())
    }
}

impl<'a, R: Roller> visit::AstVisitor<'a> for RollContext<R> {
    type Output = RResult<Int>;

    fn visit_program(&mut self, program: &ast::Program<'a>) -> Self::Output {
        let mut value = Err(EvalError::EmptyExpression);
        for statement in &program.statements {
            value = Ok(statement.accept(self)?);
        }
        value
    }

    fn visit_integer(&mut self, x: &ast::IntegerLiteral<'a>) -> Self::Output {
        self.metadata
            .record(x.text.to_string(), Resolution::integer(x.text, &x.tags, x.value));
        Ok(x.value)
    }

    fn visit_dice(&mut self, dice: &ast::DiceLiteral<'a>) -> Self::Output {
        let sides = NonZeroUInt::new(dice.size).ok_or(EvalError::NoSides)?;
        let num = NonZeroUsize::new(dice.quantity() as usize).expect("quantity is at least one");
        let raw = self.roll(num, sides)?;

        // clamps come first, so the keeps only ever select from clamped rolls
        let (clamps, keeps): (Vec<_>, Vec<_>) =
            dice.operators().into_iter().partition(|op| op.is_clamp());
        let clamped = clamps.iter().fold(raw.clone(), |rolls, op| op.operate(rolls));
        let rolls = keeps.iter().fold(clamped.clone(), |rolls, op| op.operate(rolls));
        let dropped = ops::dropped_indices(&clamped, &rolls);
        let value = rolls.iter().fold(0 as Int, |acc, &x| acc.wrapping_add(Int::from(x)));

        let literal = dice.to_string();
        log::trace!("rolled {}: {:?} -> {:?} = {}", literal, raw, rolls, value);
        self.metadata.record(
            literal.clone(),
            Resolution::dice(literal, &dice.tags, raw, rolls, value, dropped),
        );
        Ok(value)
    }

    fn visit_prefix(&mut self, op: &PrefixOperator, operand: &ast::Node<'a>) -> Self::Output {
        let value = operand.accept(self)?;
        Ok(match op {
            PrefixOperator::Neg => value.wrapping_neg(),
        })
    }

    fn visit_infix(
        &mut self,
        l: &ast::Node<'a>,
        op: &InfixOperator,
        r: &ast::Node<'a>,
    ) -> Self::Output {
        let left = l.accept(self)?;
        let right = r.accept(self)?;
        apply(*op, left, right)
    }

    fn visit_illegal(&mut self, text: &'a str) -> Self::Output {
        Err(EvalError::Illegal(text.to_string()))
    }
}

fn apply(op: InfixOperator, l: Int, r: Int) -> RResult<Int> {
    use InfixOperator::*;

    Ok(match op {
        Add => l.wrapping_add(r),
        Sub => l.wrapping_sub(r),
        Mul => l.wrapping_mul(r),
        Div => l.wrapping_div(if r == 0 { 1 } else { r }),
        Rem if r == 0 => return Err(EvalError::ZeroRemainder),
        Rem => l.wrapping_rem(r),
        Pow => pow(l, r),
    })
}

/// `base^exp` with wrapping multiplication. Non-positive exponents give 1.
fn pow(mut base: Int, exp: Int) -> Int {
    if exp <= 0 {
        return 1;
    }

    let mut exp = exp as u64;
    let mut ret: Int = 1;
    while exp > 0 {
        if exp & 1 == 1 {
            ret = ret.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exp >>= 1;
    }
    ret
}

/// The result of evaluating one program.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub value: RResult<Int>,
    pub metadata: Metadata,
}

impl Evaluation {
    /// Whether evaluation ran to the end. If not, the metadata only covers
    /// the terms resolved before the error.
    pub fn is_complete(&self) -> bool {
        self.value.is_ok()
    }

    pub fn into_outcome(self) -> RResult<Outcome> {
        Ok(Outcome {
            value: self.value?,
            metadata: self.metadata,
        })
    }
}

/// A successful evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub value: Int,
    pub metadata: Metadata,
}
