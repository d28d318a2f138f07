//! Evaluation errors
//!
//! Every failure the calculator can report while evaluating a token. All of
//! them are local to the token that caused them: the stack is left exactly as
//! it was and evaluation continues with the next token.

use std::fmt;

/// Error raised while evaluating a single token
#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Divisor was zero
    DivisionByZero,
    /// Bit shift by a negative amount
    NegativeShift,
    /// Bit shift by 64 or more bits
    ShiftOverflow,
    /// Any other argument outside a function's domain
    Domain(String),
    /// Stack shallower than the function's arity
    NotEnoughArguments,
    /// Operation needs at least one stack element
    EmptyStack,
    /// Batch-only function used outside batch mode
    BatchOnly(String),
    /// Token matches nothing the calculator knows
    UnknownToken(String),
    /// `<NAME` for an unbound register
    UnknownVariable(String),
    /// Name not registered by the extension script
    UnknownExtension(String),
    /// `undo` before anything happened in this session
    NothingToUndo,
    /// Extension function failed or could not be loaded
    Extension(String),
    /// Extension function returned something other than a number
    NotANumber(String),
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::DivisionByZero => write!(f, "division by null"),
            CalcError::NegativeShift => write!(f, "negative shift amount"),
            CalcError::ShiftOverflow => write!(f, "shift amount too large"),
            CalcError::Domain(msg) => write!(f, "{}", msg),
            CalcError::NotEnoughArguments => {
                write!(f, "stack doesn't provide enough arguments")
            }
            CalcError::EmptyStack => write!(f, "stack is empty"),
            CalcError::BatchOnly(name) => {
                write!(f, "function {} only supported in batch mode", name)
            }
            CalcError::UnknownToken(token) => {
                write!(f, "unknown command or operator: {}", token)
            }
            CalcError::UnknownVariable(name) => {
                write!(f, "variable {} doesn't exist", name)
            }
            CalcError::UnknownExtension(name) => {
                write!(f, "no extension function named {}", name)
            }
            CalcError::NothingToUndo => write!(f, "nothing to undo"),
            CalcError::Extension(msg) => write!(f, "extension failed: {}", msg),
            CalcError::NotANumber(name) => {
                write!(f, "function {} did not return a float64", name)
            }
        }
    }
}

impl std::error::Error for CalcError {}
