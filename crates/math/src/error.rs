//! Arithmetic error types

use thiserror::Error;

/// Failures of the arithmetic primitives' safe-range contract
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("Multiplication overflow")]
    MultiplicationOverflow,

    #[error("Result does not fit the target width")]
    ResultOverflow,

    #[error("Division by zero")]
    DivisionByZero,
}

/// Result type using math errors
pub type MathResult<T> = Result<T, MathError>;
