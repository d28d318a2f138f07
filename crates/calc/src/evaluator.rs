//! The evaluation engine
//!
//! An [`Evaluator`] owns one calculator session: the stack, the variable
//! registers, the history, the mode flags and the loaded extension. Input is
//! processed a line at a time:
//!
//! 1. strip comments and surrounding whitespace
//! 2. split into words
//! 3. classify every word ([`crate::token::classify`]) and execute it
//!
//! A failing word is reported on the output sink and leaves the stack as it
//! was; evaluation carries on with the next word.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut calc = Evaluator::new(CalcConfig::new());
//! calc.evaluate("80 20 + 2 / 4 x")?;
//! assert_eq!(calc.stack().peek(), Some(200.0));
//! ```

use crate::commands::{COMMANDS, CommandKind};
use crate::config::CalcConfig;
use crate::editor::StackEditor;
use crate::help::render_help;
use crate::manual::MANUAL;
use crate::stackfile;
use crate::token::{Context, Token, classify, strip_comment};
use rpn_core::{CalcError, Stack, format_number, list_to_string};
use rpn_runtime::{
    Arity, BATCH_FUNCTIONS, Extension, NORMAL_FUNCTIONS, NoExtension, constant_names,
};
use std::collections::BTreeMap;
use std::io::{self, Write};
use tracing::debug;

/// One calculator session
pub struct Evaluator {
    stack: Stack,
    config: CalcConfig,
    vars: BTreeMap<String, f64>,
    history: Vec<String>,
    extension: Box<dyn Extension>,
    editor: Option<Box<dyn StackEditor>>,
    out: Box<dyn Write>,
    exit_requested: bool,
}

impl Evaluator {
    /// Create a session writing to stdout, without extension functions
    pub fn new(config: CalcConfig) -> Self {
        let mut stack = Stack::new();
        stack.set_debug(config.debug);
        Evaluator {
            stack,
            config,
            vars: BTreeMap::new(),
            history: Vec::new(),
            extension: Box::new(NoExtension),
            editor: None,
            out: Box::new(io::stdout()),
            exit_requested: false,
        }
    }

    /// Use `extension` to resolve user functions
    pub fn with_extension(mut self, extension: Box<dyn Extension>) -> Self {
        self.extension = extension;
        self
    }

    /// Send results and diagnostics to `out` instead of stdout
    pub fn with_output(mut self, out: Box<dyn Write>) -> Self {
        self.out = out;
        self
    }

    /// Enable the `edit` command
    pub fn with_editor(mut self, editor: Box<dyn StackEditor>) -> Self {
        self.editor = Some(editor);
        self
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn config(&self) -> &CalcConfig {
        &self.config
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn vars(&self) -> &BTreeMap<String, f64> {
        &self.vars
    }

    pub fn set_batch(&mut self, batch: bool) {
        self.config.batch = batch;
    }

    pub fn set_stdin(&mut self, stdin: bool) {
        self.config.stdin = stdin;
    }

    /// True once `exit` or `quit` was evaluated
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    fn emit(&mut self, text: impl std::fmt::Display) {
        let _ = writeln!(self.out, "{}", text);
    }

    /// Evaluate one line of input
    ///
    /// Every failing word is reported on the output sink; the first failure
    /// is also returned so that callers can set an exit status.
    pub fn evaluate(&mut self, line: &str) -> Result<(), CalcError> {
        let stripped = strip_comment(line);
        let words: Vec<&str> = stripped.split_whitespace().collect();
        if words.is_empty() {
            return Ok(());
        }

        let mut first_error = None;
        for (index, word) in words.iter().enumerate() {
            let last = index + 1 == words.len();
            if let Err(e) = self.evaluate_word(word, last) {
                self.emit(format_args!("Error: {}", e));
                first_error.get_or_insert(e);
            }
            if self.exit_requested {
                break;
            }
        }

        if self.config.show_stack && !self.config.stdin {
            self.show_stack();
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn evaluate_word(&mut self, word: &str, last: bool) -> Result<(), CalcError> {
        let token = classify(
            word,
            &Context {
                batch: self.config.batch,
                extension: self.extension.as_ref(),
            },
        );
        if self.config.debug {
            debug!(word, ?token, "classified");
        }

        match token {
            Token::Number(value) => {
                self.stack.backup();
                self.stack.push(value);
                Ok(())
            }
            Token::Function(function) => {
                let args = self.operands(function.arity)?;
                let result = function.call(&args)?;
                self.commit(function.name, function.arity, &args, result, last);
                Ok(())
            }
            Token::BatchOnly(name) => Err(CalcError::BatchOnly(name.to_string())),
            Token::Extension { name, arity } => {
                let arity = Arity::from_declared(i64::from(arity)).ok_or_else(|| {
                    CalcError::Extension(format!("invalid arity {} for {}", arity, name))
                })?;
                let args = self.operands(arity)?;
                let result = self.extension.invoke(name, &args)?;
                self.commit(name, arity, &args, result, last);
                Ok(())
            }
            Token::Store(name) => {
                let value = self.stack.peek().ok_or(CalcError::EmptyStack)?;
                self.vars.insert(name.to_string(), value);
                Ok(())
            }
            Token::Recall(name) => {
                let value = *self
                    .vars
                    .get(name)
                    .ok_or_else(|| CalcError::UnknownVariable(name.to_string()))?;
                self.stack.backup();
                self.stack.push(value);
                Ok(())
            }
            Token::Command(command) => self.run_command(command.kind),
            Token::Help => {
                let help = render_help(self.extension.as_ref());
                self.emit(help.trim_end());
                Ok(())
            }
            Token::Unknown(word) => Err(CalcError::UnknownToken(word.to_string())),
        }
    }

    /// Collect the operands for a call without touching the stack
    fn operands(&self, arity: Arity) -> Result<Vec<f64>, CalcError> {
        if self.stack.len() < arity.required_depth() {
            return Err(CalcError::NotEnoughArguments);
        }

        Ok(match arity {
            Arity::Batch => self.stack.all(),
            Arity::Inspect => self.stack.last(1),
            Arity::Fixed(n) => self.stack.last(n),
        })
    }

    /// Replace the operands by the result of a successful call
    fn commit(&mut self, name: &str, arity: Arity, args: &[f64], result: f64, last: bool) {
        match arity {
            Arity::Inspect => {}
            Arity::Batch => {
                self.stack.backup();
                self.stack.clear();
                self.stack.push(result);
            }
            Arity::Fixed(n) => {
                self.stack.backup();
                self.stack.shift(n);
                self.stack.push(result);
            }
        }

        if arity != Arity::Inspect {
            self.history
                .push(format!("{} {} = {}", list_to_string(args), name, result));
        }

        if self.config.intermediate || last {
            self.show_result(result);
        }
    }

    fn show_result(&mut self, result: f64) {
        let formatted = format_number(result, self.config.precision);
        if self.config.stdin {
            self.emit(formatted);
        } else {
            self.emit(format_args!("= {}", formatted));
        }
    }

    fn show_stack(&mut self) {
        let window = self.config.stack_window;
        let items = self.stack.last(window);
        let more = if self.stack.len() > window { "... " } else { "" };
        self.emit(format_args!("stack: {}{}", more, list_to_string(&items)));
    }

    fn run_command(&mut self, kind: CommandKind) -> Result<(), CalcError> {
        match kind {
            CommandKind::Exit => self.exit_requested = true,
            CommandKind::Manual => self.emit(MANUAL.trim_end()),

            CommandKind::ToggleDebug => {
                self.config.debug = !self.config.debug;
                self.stack.set_debug(self.config.debug);
                let message = format!("debugging set to {}", self.config.debug);
                self.emit(message);
            }
            CommandKind::NoDebug => {
                self.config.debug = false;
                self.stack.set_debug(false);
            }
            CommandKind::ToggleBatch => {
                self.config.batch = !self.config.batch;
                let message = format!("batchmode set to {}", self.config.batch);
                self.emit(message);
            }
            CommandKind::NoBatch => self.config.batch = false,
            CommandKind::ToggleShowStack => {
                self.config.show_stack = !self.config.show_stack;
                let message = format!("show stack set to {}", self.config.show_stack);
                self.emit(message);
            }
            CommandKind::NoShowStack => self.config.show_stack = false,

            CommandKind::Dump => self.dump(),
            CommandKind::History => {
                let history = self.history.join("\n");
                if !history.is_empty() {
                    self.emit(history);
                }
            }
            CommandKind::Vars => self.show_vars(),
            CommandKind::Hex => {
                let top = self.stack.peek().ok_or(CalcError::EmptyStack)? as i64;
                if top < 0 {
                    self.emit(format_args!("-0x{:x}", top.unsigned_abs()));
                } else {
                    self.emit(format_args!("0x{:x}", top));
                }
            }

            CommandKind::Clear => {
                self.stack.backup();
                self.stack.clear();
            }
            CommandKind::Shift => {
                self.stack.backup();
                self.stack.shift(1);
            }
            CommandKind::Reverse => {
                self.stack.backup();
                self.stack.reverse();
            }
            CommandKind::Swap => {
                if self.stack.len() < 2 {
                    return Err(CalcError::NotEnoughArguments);
                }
                self.stack.backup();
                self.stack.swap()?;
            }
            CommandKind::Undo => self.stack.restore()?,
            CommandKind::Dup => {
                let top = self.stack.peek().ok_or(CalcError::EmptyStack)?;
                self.stack.backup();
                self.stack.push(top);
            }
            CommandKind::Edit => self.edit()?,
        }
        Ok(())
    }

    fn dump(&mut self) {
        let line = format!(
            "Stack revision {}: {}",
            self.stack.revision(),
            list_to_string(self.stack.as_slice())
        );
        self.emit(line.trim_end());

        if self.config.debug {
            let line = match self.stack.backup_revision() {
                Some(rev) => format!(
                    "Backup revision {}: {}",
                    rev,
                    list_to_string(self.stack.backup_items())
                ),
                None => "Backup: none".to_string(),
            };
            self.emit(line.trim_end());
        }
    }

    fn show_vars(&mut self) {
        if self.vars.is_empty() {
            self.emit("no vars registered");
            return;
        }

        let mut lines = vec![format!("{:<20}     {}", "VARIABLE", "VALUE")];
        for (name, value) in &self.vars {
            lines.push(format!(
                "{:<20}  -> {}",
                name,
                format_number(*value, self.config.precision)
            ));
        }
        self.emit(lines.join("\n"));
    }

    fn edit(&mut self) -> Result<(), CalcError> {
        if self.stack.is_empty() {
            return Err(CalcError::EmptyStack);
        }
        let Some(editor) = self.editor.as_ref() else {
            return Err(CalcError::Domain(
                "editing the stack is not available".to_string(),
            ));
        };

        let text = editor
            .edit(self.stack.as_slice())
            .map_err(|e| CalcError::Domain(format!("could not edit stack: {}", e)))?;
        let (items, diagnostics) = stackfile::parse(&text);

        self.stack.backup();
        self.stack.replace(items);
        for diagnostic in diagnostics {
            self.emit(diagnostic);
        }
        Ok(())
    }

    /// Help text including extension functions
    pub fn render_help(&self) -> String {
        render_help(self.extension.as_ref())
    }

    /// Prompt for interactive mode, e.g. `rpn->batch [3]» `
    pub fn prompt(&self) -> String {
        let batch = if self.config.batch { "->batch" } else { "" };
        let (debug, rev) = if self.config.debug {
            ("->debug", format!("/rev{}", self.stack.revision()))
        } else {
            ("", String::new())
        };
        format!("rpn{}{} [{}{}]» ", batch, debug, self.stack.len(), rev)
    }

    /// Every name the evaluator understands, for tab completion
    pub fn completions(&self) -> Vec<String> {
        let mut names: Vec<String> = COMMANDS
            .names()
            .chain(NORMAL_FUNCTIONS.names())
            .chain(BATCH_FUNCTIONS.names())
            .chain(constant_names())
            .chain(["help", "?"])
            .map(str::to_string)
            .chain(self.extension.functions().into_iter().map(|f| f.name))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Capture(Rc<RefCell<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Capture {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    fn session(config: CalcConfig) -> (Evaluator, Capture) {
        let capture = Capture::default();
        let calc = Evaluator::new(config).with_output(Box::new(capture.clone()));
        (calc, capture)
    }

    #[test]
    fn test_operands_are_not_consumed_on_failure() {
        let (mut calc, _) = session(CalcConfig::new());
        assert_eq!(calc.evaluate("5 0 /"), Err(CalcError::DivisionByZero));
        assert_eq!(calc.stack().all(), vec![5.0, 0.0]);
    }

    #[test]
    fn test_not_enough_arguments() {
        let (mut calc, out) = session(CalcConfig::new());
        assert_eq!(calc.evaluate("5 +"), Err(CalcError::NotEnoughArguments));
        assert_eq!(calc.stack().all(), vec![5.0]);
        assert!(out.text().contains("stack doesn't provide enough arguments"));
    }

    #[test]
    fn test_result_prefix() {
        let (mut calc, out) = session(CalcConfig::new());
        calc.evaluate("1 2 +").unwrap();
        assert_eq!(out.text(), "= 3\n");

        let (mut calc, out) = session(CalcConfig::new().with_stdin(true));
        calc.evaluate("1 2 +").unwrap();
        assert_eq!(out.text(), "3\n");
    }

    #[test]
    fn test_only_last_result_shown() {
        let (mut calc, out) = session(CalcConfig::new());
        calc.evaluate("1 2 + 3 *").unwrap();
        assert_eq!(out.text(), "= 9\n");

        let (mut calc, out) = session(CalcConfig::new().with_intermediate(true));
        calc.evaluate("1 2 + 3 *").unwrap();
        assert_eq!(out.text(), "= 3\n= 9\n");
    }

    #[test]
    fn test_precision() {
        let (mut calc, out) = session(CalcConfig::new().with_precision(4));
        calc.evaluate("1 3 /").unwrap();
        assert_eq!(out.text(), "= 0.3333\n");
    }

    #[test]
    fn test_history() {
        let (mut calc, _) = session(CalcConfig::new());
        calc.evaluate("15 15 +").unwrap();
        calc.evaluate("2 x").unwrap();
        assert_eq!(calc.history(), &["15 15 + = 30", "30 2 x = 60"]);
    }

    #[test]
    fn test_continues_after_error() {
        let (mut calc, out) = session(CalcConfig::new());
        assert_eq!(
            calc.evaluate("1 foo 2 +"),
            Err(CalcError::UnknownToken("foo".to_string()))
        );
        assert_eq!(calc.stack().all(), vec![3.0]);
        assert!(out.text().contains("Error: unknown command or operator: foo"));
    }

    #[test]
    fn test_prompt() {
        let (mut calc, _) = session(CalcConfig::new());
        assert_eq!(calc.prompt(), "rpn [0]» ");
        calc.evaluate("1 2").unwrap();
        calc.evaluate("batch").unwrap();
        assert_eq!(calc.prompt(), "rpn->batch [2]» ");
        calc.evaluate("debug").unwrap();
        assert_eq!(calc.prompt(), "rpn->batch->debug [2/rev2]» ");
    }

    #[test]
    fn test_exit_stops_line() {
        let (mut calc, _) = session(CalcConfig::new());
        calc.evaluate("1 quit 2").unwrap();
        assert!(calc.exit_requested());
        assert_eq!(calc.stack().all(), vec![1.0]);
    }

    #[test]
    fn test_completions() {
        let (calc, _) = session(CalcConfig::new());
        let names = calc.completions();
        for name in ["undo", "sqrt", "median", "Pi", "help", "*"] {
            assert!(names.iter().any(|n| n == name), "missing {}", name);
        }
        let mut sorted = names.clone();
        sorted.dedup();
        assert_eq!(sorted.len(), names.len());
    }
}
