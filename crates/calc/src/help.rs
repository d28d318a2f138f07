//! Help text
//!
//! Rendered from the live tables, so it always lists exactly what the
//! calculator understands, including the functions of the loaded extension.

use crate::commands::COMMANDS;
use rpn_runtime::{BATCH_FUNCTIONS, CONSTANTS, Extension, Function, NORMAL_FUNCTIONS};
use std::fmt::Write;

fn entry(out: &mut String, name: &str, help: &str) {
    let _ = writeln!(out, "{:<20} {}", name, help);
}

fn function_entry(out: &mut String, function: &Function) {
    if function.aliases.is_empty() {
        entry(out, function.name, function.help);
    } else {
        let name = format!("{} ({})", function.name, function.aliases.join(", "));
        entry(out, &name, function.help);
    }
}

/// Render the full help: commands, operators, functions, constants and
/// extension functions
pub fn render_help(extension: &dyn Extension) -> String {
    let mut out = String::new();

    for group in COMMANDS.groups() {
        let _ = writeln!(out, "{}:", group.title);
        for command in group.commands {
            if command.aliases.is_empty() {
                entry(&mut out, command.name, command.help);
            } else {
                let name = format!("{}|{}", command.name, command.aliases.join("|"));
                entry(&mut out, &name, command.help);
            }
        }
        out.push('\n');
    }
    entry(&mut out, "help|?", "show this message");
    entry(&mut out, ">NAME", "put last stack element into variable NAME");
    entry(&mut out, "<NAME", "retrieve variable NAME and put it onto the stack");
    out.push('\n');

    for table in [&*NORMAL_FUNCTIONS, &*BATCH_FUNCTIONS] {
        for (title, functions) in table.sections() {
            let _ = writeln!(out, "{}:", title);
            for function in functions {
                function_entry(&mut out, function);
            }
            out.push('\n');
        }
    }

    let _ = writeln!(out, "Constants:");
    let names: Vec<&str> = CONSTANTS.iter().map(|(name, _)| *name).collect();
    let _ = writeln!(out, "{}", names.join(" "));

    let functions = extension.functions();
    if !functions.is_empty() {
        let _ = writeln!(out, "\nExtension functions:");
        for function in functions {
            entry(&mut out, &function.name, &function.help);
        }
    }

    out
}
