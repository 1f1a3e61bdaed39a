//! Dice expressions: `3d6kh2 + 4` style arithmetic with auditable rolls.
//!
//! [`roll`] parses and evaluates an expression in one step. For more control,
//! [`parse::parse`] an expression yourself and evaluate the program with a
//! [`RollContext`], which also reports the terms resolved before an error.

mod common;
mod error;
pub mod ops;
pub mod parse;
pub mod roll;

pub use common::{Int, InfixOperator, NonEmpty, PrefixOperator, UInt};
pub use error::Error;
pub use roll::{Evaluation, Metadata, Outcome, Resolution, RollContext, Roller, TermKey};

/// Rolls `input` with the thread-local RNG, the default roll bound and the
/// default nesting cap.
pub fn roll(input: &str) -> Result<Outcome, Error> {
    roll_with(input, &mut RollContext::default())
}

/// Rolls `input` in `ctx`, parsing with [`parse::DEFAULT_MAX_DEPTH`]. Any parse
/// diagnostic is an error here.
pub fn roll_with<R: Roller>(input: &str, ctx: &mut RollContext<R>) -> Result<Outcome, Error> {
    let program = parse::Parser::new(input)
        .with_max_depth(Some(parse::DEFAULT_MAX_DEPTH))
        .parse()
        .into_result()?;
    Ok(ctx.eval(&program).into_outcome()?)
}
