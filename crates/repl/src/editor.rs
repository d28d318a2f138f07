//! `edit` support: the stack is written to a temp file and opened in
//! `$EDITOR` (default `vi`).

use rpn_calc::StackEditor;
use rpn_calc::stackfile;
use std::io::Write;
use std::process::Command;

/// Opens the stack in the user's editor
pub struct ExternalEditor;

impl ExternalEditor {
    /// Program and arguments from `$EDITOR`, e.g. `code --wait`
    fn command_line() -> Result<Vec<String>, String> {
        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
        let parts = shlex::split(&editor)
            .ok_or_else(|| format!("Cannot parse $EDITOR: {}", editor))?;
        if parts.is_empty() {
            return Err("$EDITOR is empty".to_string());
        }
        Ok(parts)
    }
}

impl StackEditor for ExternalEditor {
    fn edit(&self, items: &[f64]) -> Result<String, String> {
        let mut file = tempfile::Builder::new()
            .prefix("rpn-stack")
            .tempfile()
            .map_err(|e| format!("Failed to create temp file: {}", e))?;
        file.write_all(stackfile::render(items).as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| format!("Failed to write temp file: {}", e))?;

        let parts = Self::command_line()?;
        let status = Command::new(&parts[0])
            .args(&parts[1..])
            .arg(file.path())
            .status()
            .map_err(|e| format!("Failed to open editor '{}': {}", parts[0], e))?;
        if !status.success() {
            return Err(format!("Editor exited with: {:?}", status.code()));
        }

        std::fs::read_to_string(file.path())
            .map_err(|e| format!("Failed to read edited stack: {}", e))
    }
}
