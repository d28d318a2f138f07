//! rpn Core: primitives shared by the calculator crates
//!
//! # Modules
//!
//! - `error`: `CalcError`, the per-token failure type
//! - `stack`: the number stack with one level of undo
//! - `format`: result and list formatting

pub mod error;
pub mod format;
pub mod stack;

pub use error::CalcError;
pub use format::{DEFAULT_PRECISION, format_number, list_to_string};
pub use stack::Stack;
