//! Hook for editing the stack outside the calculator

/// Lets the user edit the stack as text
///
/// Implementations receive the current stack (bottom first) and return the
/// edited file contents in the [`crate::stackfile`] format. The evaluator
/// parses the result and replaces the stack.
pub trait StackEditor {
    fn edit(&self, items: &[f64]) -> Result<String, String>;
}
