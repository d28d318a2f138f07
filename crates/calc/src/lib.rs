//! rpn Calc: the evaluation engine behind the `rpn` binary
//!
//! # Modules
//!
//! - `evaluator`: the session type, [`Evaluator`]
//! - `token`: pure word classification
//! - `commands`: management command tables
//! - `help` / `manual`: user documentation
//! - `config`: [`CalcConfig`] and its TOML file
//! - `stackfile` / `editor`: editing the stack as text

pub mod commands;
pub mod config;
pub mod editor;
pub mod evaluator;
pub mod help;
pub mod manual;
pub mod stackfile;
pub mod token;

pub use config::{CalcConfig, DEFAULT_STACK_WINDOW, default_config_path};
pub use editor::StackEditor;
pub use evaluator::Evaluator;
pub use manual::MANUAL;

// Re-exported so front ends only need this crate
pub use rpn_core::CalcError;
pub use rpn_runtime::{Extension, LuaExtension, NoExtension};
