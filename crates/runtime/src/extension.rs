//! Extension functions supplied by a user script
//!
//! The evaluator only sees the [`Extension`] trait. [`NoExtension`] is used
//! when no script is loaded; the Lua bridge lives in [`crate::lua`].

use rpn_core::CalcError;

/// A function registered by an extension script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionFunction {
    pub name: String,
    /// `-1` whole stack, `0` inspect the top, `n` consume n items
    pub arity: i32,
    pub help: String,
}

/// Source of user-defined functions
pub trait Extension {
    /// Declared arity of `name`, or `None` if it is not registered
    fn declared_arity(&self, name: &str) -> Option<i32>;

    /// Call `name` with operands in stack order (deepest first)
    fn invoke(&self, name: &str, args: &[f64]) -> Result<f64, CalcError>;

    /// All registered functions, sorted by name
    fn functions(&self) -> Vec<ExtensionFunction>;
}

/// Extension with no functions
#[derive(Debug, Clone, Copy, Default)]
pub struct NoExtension;

impl Extension for NoExtension {
    fn declared_arity(&self, _name: &str) -> Option<i32> {
        None
    }

    fn invoke(&self, name: &str, _args: &[f64]) -> Result<f64, CalcError> {
        Err(CalcError::UnknownExtension(name.to_string()))
    }

    fn functions(&self) -> Vec<ExtensionFunction> {
        Vec::new()
    }
}
