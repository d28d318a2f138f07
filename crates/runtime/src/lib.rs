//! rpn Runtime: everything a token can resolve to besides a number
//!
//! - `functions`: fixed-arity operators and math functions
//! - `batch`: whole-stack functions, only available in batch mode
//! - `constants`: named constants such as `Pi`
//! - `extension` / `lua`: user functions loaded from a Lua script

pub mod batch;
pub mod constants;
pub mod extension;
pub mod functions;
pub mod special;

#[cfg(feature = "lua")]
pub mod lua;

#[cfg(not(feature = "lua"))]
#[path = "lua_stub.rs"]
pub mod lua;

// Function tables
pub use batch::{BATCH_FUNCTIONS, batch_functions};
pub use functions::{
    Arity, Function, FunctionTable, MathFn, NORMAL_FUNCTIONS, normal_functions,
};

// Constants
pub use constants::{CONSTANTS, constant, constant_names};

// Extensions
pub use extension::{Extension, ExtensionFunction, NoExtension};
pub use lua::LuaExtension;
