use crate::parse::Diagnostics;
use crate::roll::EvalError;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("{0}")]
    Parse(#[from] Diagnostics),
    #[error("{0}")]
    Eval(#[from] EvalError),
}
