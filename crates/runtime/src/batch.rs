//! Batch functions
//!
//! Functions that consume the whole stack. They are only reachable in batch
//! mode; `args` is the stack bottom to top and is never empty.

use crate::functions::{Arity, FunctionTable};
use rpn_core::CalcError;
use std::sync::LazyLock;

/// Shared batch table, built on first use
pub static BATCH_FUNCTIONS: LazyLock<FunctionTable> = LazyLock::new(batch_functions);

fn sum(args: &[f64]) -> Result<f64, CalcError> {
    Ok(args.iter().sum())
}

fn min(args: &[f64]) -> Result<f64, CalcError> {
    args.iter()
        .copied()
        .reduce(f64::min)
        .ok_or(CalcError::EmptyStack)
}

fn max(args: &[f64]) -> Result<f64, CalcError> {
    args.iter()
        .copied()
        .reduce(f64::max)
        .ok_or(CalcError::EmptyStack)
}

fn mean(args: &[f64]) -> Result<f64, CalcError> {
    if args.is_empty() {
        return Err(CalcError::EmptyStack);
    }
    Ok(args.iter().sum::<f64>() / args.len() as f64)
}

// Middle element in stack order; the stack is not sorted first.
fn median(args: &[f64]) -> Result<f64, CalcError> {
    args.get(args.len() / 2).copied().ok_or(CalcError::EmptyStack)
}

/// Build the table of whole-stack functions
pub fn batch_functions() -> FunctionTable {
    FunctionTable::new()
        .section("Batch functions")
        .with("sum", Arity::Batch, "sum of all values", sum)
        .with("min", Arity::Batch, "minimum of all values", min)
        .with("max", Arity::Batch, "maximum of all values", max)
        .with("mean", Arity::Batch, "arithmetic mean", mean)
        .with("median", Arity::Batch, "middle value of the stack", median)
        .with_alias("+", "sum")
        .with_alias("avg", "mean")
}
