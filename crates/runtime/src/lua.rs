//! Lua extension bridge
//!
//! A script is loaded into its own Lua state with only the base, table,
//! math and string libraries opened. The script must define `init()`, which
//! announces its functions through `register(name, arity, help)`:
//!
//! ```lua
//! function lower(a, b)
//!   if a < b then return a else return b end
//! end
//!
//! function init()
//!   register("lower", 2, "lower of two values")
//! end
//! ```
//!
//! Functions with arity `n > 0` receive n numbers, arity `0` receives the top
//! of the stack and arity `-1` receives the whole stack as one sequence table.
//! Every function must return a number.

use crate::extension::{Extension, ExtensionFunction};
use mlua::{Function, Lua, LuaOptions, StdLib, Value, Variadic};
use rpn_core::CalcError;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;
use tracing::{debug, warn};

type Registry = Rc<RefCell<BTreeMap<String, ExtensionFunction>>>;

/// Extension functions backed by a sandboxed Lua state
pub struct LuaExtension {
    lua: Lua,
    registry: Registry,
}

impl std::fmt::Debug for LuaExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LuaExtension")
            .field("functions", &self.registry.borrow().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl LuaExtension {
    /// Load and initialize a script file
    pub fn load(path: &Path) -> Result<Self, String> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_source(&path.display().to_string(), &source)
    }

    /// Load and initialize a script from memory; `chunk_name` shows up in
    /// Lua error messages
    pub fn from_source(chunk_name: &str, source: &str) -> Result<Self, String> {
        let lua = Lua::new_with(
            StdLib::TABLE | StdLib::MATH | StdLib::STRING,
            LuaOptions::default(),
        )
        .map_err(|e| format!("Failed to create Lua state: {}", e))?;

        let registry: Registry = Rc::new(RefCell::new(BTreeMap::new()));
        install_register(&lua, Rc::clone(&registry))
            .map_err(|e| format!("Failed to install register(): {}", e))?;

        lua.load(source)
            .set_name(chunk_name)
            .exec()
            .map_err(|e| format!("Failed to load {}: {}", chunk_name, e))?;

        let init: Option<Function> = lua
            .globals()
            .get("init")
            .map_err(|e| format!("{}: init is not a function: {}", chunk_name, e))?;
        let Some(init) = init else {
            return Err(format!("{}: script does not define init()", chunk_name));
        };
        init.call::<()>(())
            .map_err(|e| format!("{}: init() failed: {}", chunk_name, e))?;

        let extension = LuaExtension { lua, registry };
        let globals = extension.lua.globals();
        for function in extension.functions() {
            let defined: Option<Function> = globals.get(function.name.as_str()).ok().flatten();
            if defined.is_none() {
                warn!(name = %function.name, "registered extension function is not defined");
            }
        }
        debug!(
            script = chunk_name,
            count = extension.registry.borrow().len(),
            "loaded lua extension"
        );
        Ok(extension)
    }

    fn call(&self, function: &ExtensionFunction, args: &[f64]) -> mlua::Result<Value> {
        let func: Function = self.lua.globals().get(function.name.as_str())?;
        match function.arity {
            -1 => {
                let list = self.lua.create_sequence_from(args.iter().copied())?;
                func.call::<Value>(list)
            }
            0 => func.call::<Value>(args.last().copied().unwrap_or_default()),
            _ => func.call::<Value>(Variadic::from_iter(args.iter().copied())),
        }
    }
}

/// Expose `register(name, arity, help)` to the script
fn install_register(lua: &Lua, registry: Registry) -> mlua::Result<()> {
    let register = lua.create_function(
        move |_, (name, arity, help): (String, i64, Option<String>)| {
            if arity < -1 || arity > i64::from(i32::MAX) {
                return Err(mlua::Error::RuntimeError(format!(
                    "register: invalid arity {} for {}",
                    arity, name
                )));
            }
            debug!(name = %name, arity, "registering extension function");
            registry.borrow_mut().insert(
                name.clone(),
                ExtensionFunction {
                    name,
                    arity: arity as i32,
                    help: help.unwrap_or_default(),
                },
            );
            Ok(())
        },
    )?;
    lua.globals().set("register", register)
}

impl Extension for LuaExtension {
    fn declared_arity(&self, name: &str) -> Option<i32> {
        self.registry.borrow().get(name).map(|f| f.arity)
    }

    fn invoke(&self, name: &str, args: &[f64]) -> Result<f64, CalcError> {
        let Some(function) = self.registry.borrow().get(name).cloned() else {
            return Err(CalcError::UnknownExtension(name.to_string()));
        };

        debug!(name, ?args, "calling lua function");
        match self.call(&function, args) {
            Ok(Value::Number(n)) => Ok(n),
            Ok(Value::Integer(i)) => Ok(i as f64),
            Ok(_) => Err(CalcError::NotANumber(name.to_string())),
            Err(e) => Err(CalcError::Extension(e.to_string())),
        }
    }

    fn functions(&self) -> Vec<ExtensionFunction> {
        self.registry.borrow().values().cloned().collect()
    }
}
