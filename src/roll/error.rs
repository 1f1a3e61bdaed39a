use thiserror::Error;

/// Every value is an [`Int`](crate::Int) and every operator accepts any two
/// of them, so there is no type mismatch or unknown operator case.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("illegal token: {0}")]
    Illegal(String),
    #[error("cannot roll a die with zero sides")]
    NoSides,
    #[error("cannot take modulus by zero")]
    ZeroRemainder,
    #[error("too many dice rolled")]
    TooManyRolls,
    #[error("empty expression")]
    EmptyExpression,
}
