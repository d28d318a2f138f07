//! Stand-in for the Lua bridge when the "lua" feature is disabled.
//!
//! Loading always fails with a message telling the user how to enable it.

use crate::extension::{Extension, ExtensionFunction};
use rpn_core::CalcError;
use std::path::Path;

const FEATURE_MSG: &str = "lua feature not enabled. Rebuild with: cargo build --features lua";

#[derive(Debug)]
pub struct LuaExtension {
    _private: (),
}

impl LuaExtension {
    pub fn load(path: &Path) -> Result<Self, String> {
        Err(format!("cannot load {}: {}", path.display(), FEATURE_MSG))
    }

    pub fn from_source(chunk_name: &str, _source: &str) -> Result<Self, String> {
        Err(format!("cannot load {}: {}", chunk_name, FEATURE_MSG))
    }
}

impl Extension for LuaExtension {
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
