//! Tab completion for the interactive prompt.
//!
//! Completes the word under the cursor against every name the evaluator
//! knows: commands, operators, functions, constants and extension functions.

use rustyline::completion::{Completer, Pair};
use rustyline::{Context, Helper, Highlighter, Hinter, Validator};

/// rustyline helper with a fixed list of completion candidates
#[derive(Helper, Highlighter, Hinter, Validator)]
pub struct RpnHelper {
    names: Vec<String>,
}

impl RpnHelper {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Start of the word ending at `pos` and the matching candidates
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let head = &line[..pos];
        let start = head
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let prefix = &head[start..];

        let pairs = self
            .names
            .iter()
            .filter(|name| name.starts_with(prefix))
            .map(|name| Pair {
                display: name.clone(),
                replacement: name.clone(),
            })
            .collect();
        (start, pairs)
    }
}

impl Completer for RpnHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}
