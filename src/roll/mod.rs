mod ctx;
mod error;
mod metadata;
mod roller;
mod stringify;

type RResult<T> = Result<T, EvalError>;

pub use ctx::{DefaultRoller, Evaluation, Outcome, RollContext, DEFAULT_MAX_ROLLS};
pub use error::EvalError;
pub use metadata::{InvalidKey, Metadata, Resolution, TermKey};
pub use roller::Roller;
pub use stringify::{MarkdownStringifier, SimpleStringifier, Stringify};

#[cfg(test)]
pub(crate) use roller::StepRoller;
