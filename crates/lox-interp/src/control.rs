//! Runtime errors and non-local control flow.
//!
//! Evaluation threads a `Result` whose error side is [`Unwind`]: either a
//! genuine runtime error on its way to the top-level reporter, or a
//! `return` carrying its value back to the nearest function call. Rust has
//! no exceptions to borrow for this, so the unwind is an explicit signal
//! propagated with `?`; the two cases part ways in `LoxFunction::call`,
//! which absorbs `Return` and lets errors keep going.

use thiserror::Error;

use crate::value::Value;

/// A runtime error, reported at the top level as
/// `message` followed by `[line N]`.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{message}")]
pub struct RuntimeError {
    /// Source line of the token that triggered the error
    pub line: u32,
    /// Stable, user-visible message text
    pub message: String,
}

impl RuntimeError {
    /// Create an error at `line`.
    pub fn new(line: u32, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Non-local exit from statement execution.
#[derive(Debug)]
pub enum Unwind {
    /// A `return` statement unwinding to the enclosing function call
    Return(Value),
    /// A runtime error unwinding to the top-level interpret loop
    Error(RuntimeError),
}

impl From<RuntimeError> for Unwind {
    fn from(error: RuntimeError) -> Self {
        Unwind::Error(error)
    }
}

/// Result of executing statements or evaluating expressions.
pub type ExecResult<T = ()> = Result<T, Unwind>;
