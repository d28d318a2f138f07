//! Token classification
//!
//! Turning a word of input into a [`Token`] is pure: it looks at the function
//! tables, the loaded extension and the batch flag, but never at the stack.
//! The evaluator executes the token in a separate step.
//!
//! Precedence, first match wins:
//!
//! 1. decimal number
//! 2. `HH:MM` time or `0x` hex integer
//! 3. constant
//! 4. function tables (batch table first while in batch mode)
//! 5. extension functions
//! 6. `>NAME` / `<NAME` registers
//! 7. management commands
//! 8. `help` / `?`

use crate::commands::{COMMANDS, Command};
use regex::Regex;
use rpn_runtime::{BATCH_FUNCTIONS, Extension, Function, NORMAL_FUNCTIONS, constant};
use std::sync::LazyLock;

static COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^\\])#.*").unwrap_or_else(|e| panic!("invalid comment pattern: {}", e))
});

static REGISTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([<>])([A-Z][A-Za-z0-9_]*)$")
        .unwrap_or_else(|e| panic!("invalid register pattern: {}", e))
});

static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):(\d+)$").unwrap_or_else(|e| panic!("invalid time pattern: {}", e))
});

/// Remove a trailing `# comment`; an escaped `\#` becomes a literal `#`
pub fn strip_comment(line: &str) -> String {
    COMMENT.replace(line, "$1").replace("\\#", "#")
}

/// Classified word of input
#[derive(Debug, Clone)]
pub enum Token<'a> {
    /// Literal, time, hex integer or constant
    Number(f64),
    /// Built-in operator or function from one of the tables
    Function(&'static Function),
    /// Batch-only function used outside batch mode
    BatchOnly(&'a str),
    /// Function registered by the extension script
    Extension { name: &'a str, arity: i32 },
    /// `>NAME`: bind the top of the stack
    Store(&'a str),
    /// `<NAME`: push a bound value
    Recall(&'a str),
    /// Management command
    Command(&'static Command),
    Help,
    Unknown(&'a str),
}

/// What classification may consult besides the word itself
pub struct Context<'e> {
    pub batch: bool,
    pub extension: &'e dyn Extension,
}

/// Classify one whitespace-free word
pub fn classify<'a>(word: &'a str, ctx: &Context<'_>) -> Token<'a> {
    if let Some(value) = parse_number(word) {
        return Token::Number(value);
    }

    if let Some(value) = constant(word) {
        return Token::Number(value);
    }

    if ctx.batch {
        if let Some(function) = BATCH_FUNCTIONS.get(word) {
            return Token::Function(function);
        }
        if let Some(function) = NORMAL_FUNCTIONS.get(word) {
            return Token::Function(function);
        }
    } else {
        if let Some(function) = NORMAL_FUNCTIONS.get(word) {
            return Token::Function(function);
        }
        if BATCH_FUNCTIONS.contains(word) {
            return Token::BatchOnly(word);
        }
    }

    if let Some(arity) = ctx.extension.declared_arity(word) {
        return Token::Extension { name: word, arity };
    }

    if let Some(caps) = REGISTER.captures(word) {
        let name = &word[1..];
        return match caps.get(1).map(|m| m.as_str()) {
            Some(">") => Token::Store(name),
            _ => Token::Recall(name),
        };
    }

    if let Some(command) = COMMANDS.get(word) {
        return Token::Command(command);
    }

    match word {
        "help" | "?" => Token::Help,
        _ => Token::Unknown(word),
    }
}

/// Parse a literal: decimal float, `HH:MM` or `0x` hex integer
fn parse_number(word: &str) -> Option<f64> {
    if let Ok(value) = word.parse::<f64>() {
        return Some(value);
    }

    if let Some(caps) = TIME.captures(word) {
        let hours: f64 = caps[1].parse().ok()?;
        let minutes: f64 = caps[2].parse().ok()?;
        return Some(hours + minutes / 60.0);
    }

    let hex = word
        .strip_prefix("0x")
        .or_else(|| word.strip_prefix("0X"))?;
    i64::from_str_radix(hex, 16).ok().map(|value| value as f64)
}
