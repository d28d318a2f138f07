//! Management commands
//!
//! Commands never compute a value. They change settings, display state or
//! rearrange the stack. They are grouped into four tables, each shown under
//! its own heading in the help output.

use std::collections::HashMap;
use std::sync::LazyLock;

/// What a command does when executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    // general
    Exit,
    Manual,
    // settings
    ToggleDebug,
    NoDebug,
    ToggleBatch,
    NoBatch,
    ToggleShowStack,
    NoShowStack,
    // show
    Dump,
    History,
    Vars,
    Hex,
    // stack
    Clear,
    Shift,
    Reverse,
    Swap,
    Undo,
    Dup,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub help: &'static str,
    pub kind: CommandKind,
}

/// A titled table of commands
#[derive(Debug)]
pub struct CommandGroup {
    pub title: &'static str,
    pub commands: &'static [Command],
}

const fn command(
    name: &'static str,
    aliases: &'static [&'static str],
    help: &'static str,
    kind: CommandKind,
) -> Command {
    Command {
        name,
        aliases,
        help,
        kind,
    }
}

static SETTINGS: &[Command] = &[
    command("debug", &["d"], "toggle debugging", CommandKind::ToggleDebug),
    command("nodebug", &[], "disable debugging", CommandKind::NoDebug),
    command("batch", &["b"], "toggle batch mode", CommandKind::ToggleBatch),
    command("nobatch", &[], "disable batch mode", CommandKind::NoBatch),
    command(
        "showstack",
        &["s"],
        "toggle display of the last stack items",
        CommandKind::ToggleShowStack,
    ),
    command(
        "noshowstack",
        &[],
        "disable display of the stack",
        CommandKind::NoShowStack,
    ),
];

static SHOW: &[Command] = &[
    command("dump", &["p"], "display the stack contents", CommandKind::Dump),
    command("history", &["h"], "display calculation history", CommandKind::History),
    command("vars", &["v"], "show list of variables", CommandKind::Vars),
    command(
        "hex",
        &[],
        "show last stack item in hex form (converted to int)",
        CommandKind::Hex,
    ),
];

static STACK: &[Command] = &[
    command("clear", &["c"], "clear the whole stack", CommandKind::Clear),
    command("shift", &[], "remove the last element of the stack", CommandKind::Shift),
    command("reverse", &[], "reverse the stack elements", CommandKind::Reverse),
    command("swap", &[], "exchange the last two elements", CommandKind::Swap),
    command("undo", &["u"], "undo last operation", CommandKind::Undo),
    command("dup", &[], "duplicate last stack item", CommandKind::Dup),
    command("edit", &[], "edit the stack interactively", CommandKind::Edit),
];

static GENERAL: &[Command] = &[
    command("exit", &["quit"], "exit program", CommandKind::Exit),
    command("manual", &[], "show manual", CommandKind::Manual),
];

/// All command tables plus a name and alias index
#[derive(Debug)]
pub struct CommandTables {
    groups: Vec<CommandGroup>,
    names: HashMap<&'static str, &'static Command>,
}

impl CommandTables {
    fn build() -> Self {
        let groups = vec![
            CommandGroup {
                title: "Configuration commands",
                commands: SETTINGS,
            },
            CommandGroup {
                title: "Show commands",
                commands: SHOW,
            },
            CommandGroup {
                title: "Stack manipulation commands",
                commands: STACK,
            },
            CommandGroup {
                title: "Other commands",
                commands: GENERAL,
            },
        ];

        let mut names = HashMap::new();
        for group in &groups {
            for command in group.commands {
                names.insert(command.name, command);
                for alias in command.aliases {
                    names.insert(*alias, command);
                }
            }
        }

        CommandTables { groups, names }
    }

    pub fn get(&self, name: &str) -> Option<&'static Command> {
        self.names.get(name).copied()
    }

    pub fn groups(&self) -> &[CommandGroup] {
        &self.groups
    }

    /// Every command name and alias
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names.keys().copied()
    }
}

pub static COMMANDS: LazyLock<CommandTables> = LazyLock::new(CommandTables::build);
