//! Calculator configuration
//!
//! Settings come from three layers, lowest precedence first: the defaults,
//! an optional TOML file and the command line. The file is looked up at
//! `$XDG_CONFIG_HOME/rpn/config.toml` (or the platform config directory):
//!
//! ```toml
//! precision = 4
//! batch = false
//! show-stack = true
//! intermediate = false
//! stack-window = 5
//! ```
//!
//! Every key is optional.

use rpn_core::DEFAULT_PRECISION;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Number of stack items shown by `showstack`
pub const DEFAULT_STACK_WINDOW: usize = 5;

/// Session settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CalcConfig {
    /// Decimal places for non-integral results
    pub precision: usize,
    /// Start in batch mode
    pub batch: bool,
    /// Start with debug output enabled
    pub debug: bool,
    /// Print the last stack items after every line
    pub show_stack: bool,
    /// Print every intermediate result, not just the last of a line
    pub intermediate: bool,
    /// Input is piped or given on the command line; never read from the file
    #[serde(skip)]
    pub stdin: bool,
    /// How many items `show_stack` prints
    pub stack_window: usize,
}

impl Default for CalcConfig {
    fn default() -> Self {
        CalcConfig {
            precision: DEFAULT_PRECISION,
            batch: false,
            debug: false,
            show_stack: false,
            intermediate: false,
            stdin: false,
            stack_window: DEFAULT_STACK_WINDOW,
        }
    }
}

impl CalcConfig {
    pub fn new() -> Self {
        CalcConfig::default()
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_batch(mut self, batch: bool) -> Self {
        self.batch = batch;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_show_stack(mut self, show_stack: bool) -> Self {
        self.show_stack = show_stack;
        self
    }

    pub fn with_intermediate(mut self, intermediate: bool) -> Self {
        self.intermediate = intermediate;
        self
    }

    pub fn with_stdin(mut self, stdin: bool) -> Self {
        self.stdin = stdin;
        self
    }

    pub fn with_stack_window(mut self, stack_window: usize) -> Self {
        self.stack_window = stack_window;
        self
    }

    /// Parse a TOML configuration
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Read and parse a TOML configuration file
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml(&content).map_err(|e| format!("{}: {}", path.display(), e))
    }

    /// Load the default file if it exists, otherwise use the defaults
    pub fn load_default() -> Result<Self, String> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// Location of the optional config file: `$XDG_CONFIG_HOME/rpn/config.toml`,
/// falling back to the platform config directory
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config);
        if path.is_absolute() {
            return Some(path.join("rpn").join("config.toml"));
        }
    }

    dirs::config_dir().map(|dir| dir.join("rpn").join("config.toml"))
}
