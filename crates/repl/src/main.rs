//! rpn - reverse polish notation calculator
//!
//! Usage:
//!   rpn                     # Interactive prompt
//!   rpn 2 2 +               # Evaluate the arguments and exit
//!   echo 2 2 + | rpn        # Evaluate standard input line by line
//!   echo 1 2 3 | rpn +      # Same, then apply + to the whole stack
//!
//! Interactive commands:
//!   help, ?                 # List commands, operators and functions
//!   manual                  # Show the manual
//!   quit, exit              # Exit (ctrl-d and ctrl-c work too)

mod completion;
mod editor;

use clap::{CommandFactory, Parser as ClapParser};
use clap_complete::{Shell, generate};
use completion::RpnHelper;
use editor::ExternalEditor;
use rpn_calc::{CalcConfig, Evaluator, Extension, LuaExtension, MANUAL, NoExtension};
use rustyline::Editor;
use rustyline::config::Config;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Number of lines kept in the history file
const HISTORY_LIMIT: usize = 500;

#[derive(ClapParser)]
#[command(name = "rpn")]
#[command(version = env!("CARGO_PKG_VERSION"), disable_version_flag = true)]
#[command(about = "Reverse polish notation calculator", long_about = None)]
struct Args {
    /// Print version
    #[arg(short = 'v', long, action = clap::ArgAction::Version)]
    version: (),

    /// Enable batch mode
    #[arg(short, long)]
    batch: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Show the last stack items after every line
    #[arg(short = 's', long)]
    show_stack: bool,

    /// Print every intermediate result
    #[arg(short, long)]
    intermediate: bool,

    /// Show the manual and exit
    #[arg(short, long)]
    manual: bool,

    /// Lua script with extension functions (default: ~/.rpn.lua)
    #[arg(short = 'c', long = "config", value_name = "LUA")]
    script: Option<PathBuf>,

    /// Decimal places for non-integral results
    #[arg(short, long, value_name = "N")]
    precision: Option<usize>,

    /// Settings file (default: $XDG_CONFIG_HOME/rpn/config.toml)
    #[arg(long, value_name = "TOML")]
    rc: Option<PathBuf>,

    /// Print shell completions and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Expression to evaluate; with piped input, an operator applied to the whole stack
    #[arg(allow_negative_numbers = true)]
    expression: Vec<String>,
}

fn main() {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        let mut cmd = Args::command();
        generate(shell, &mut cmd, "rpn", &mut io::stdout());
        return;
    }

    init_tracing(args.debug);

    if args.manual {
        println!("{}", MANUAL);
        return;
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let extension = match load_extension(args.script.as_ref()) {
        Ok(extension) => extension,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let mut calc = Evaluator::new(config)
        .with_extension(extension)
        .with_editor(Box::new(ExternalEditor));

    let stdin = io::stdin();
    let code = if args.expression.len() > 1 {
        run_once(&mut calc, &args.expression.join(" "))
    } else if !stdin.is_terminal() {
        run_piped(&mut calc, stdin.lock(), &args.expression)
    } else if !args.expression.is_empty() {
        run_once(&mut calc, &args.expression.join(" "))
    } else {
        run_interactive(&mut calc);
        0
    };
    process::exit(code);
}

/// Log to stderr; `RUST_LOG` overrides the defaults
fn init_tracing(debug: bool) {
    // Stack and evaluator events are already gated by the session's debug
    // toggle, so they may pass the filter unconditionally.
    let default = if debug {
        "warn,rpn=debug,rpn_core=debug,rpn_runtime=debug,rpn_calc=debug"
    } else {
        "warn,rpn_core=debug,rpn_calc=debug"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

/// Defaults, then the settings file, then command line flags
fn load_config(args: &Args) -> Result<CalcConfig, String> {
    let mut config = match &args.rc {
        Some(path) => CalcConfig::load(path)?,
        None => CalcConfig::load_default()?,
    };

    if args.batch {
        config.batch = true;
    }
    if args.debug {
        config.debug = true;
    }
    if args.show_stack {
        config.show_stack = true;
    }
    if args.intermediate {
        config.intermediate = true;
    }
    if let Some(precision) = args.precision {
        config.precision = precision;
    }
    Ok(config)
}

/// Load the given script, or `~/.rpn.lua` if it exists
fn load_extension(script: Option<&PathBuf>) -> Result<Box<dyn Extension>, String> {
    let path = match script {
        Some(path) => path.clone(),
        None => match dirs::home_dir().map(|home| home.join(".rpn.lua")) {
            Some(path) if path.exists() => path,
            _ => return Ok(Box::new(NoExtension)),
        },
    };

    debug!(path = %path.display(), "loading extension script");
    let extension = LuaExtension::load(&path)?;
    Ok(Box::new(extension))
}

/// Evaluate the command line arguments as one line
fn run_once(calc: &mut Evaluator, line: &str) -> i32 {
    calc.set_stdin(true);
    match calc.evaluate(line) {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

/// Evaluate every line of standard input, then the optional expression in
/// batch mode (`echo 1 2 3 | rpn +`)
fn run_piped(calc: &mut Evaluator, input: impl BufRead, expression: &[String]) -> i32 {
    calc.set_stdin(true);
    let mut code = 0;

    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                return 1;
            }
        };
        if calc.evaluate(&line).is_err() {
            code = 1;
        }
        if calc.exit_requested() {
            return code;
        }
    }

    if !expression.is_empty() {
        calc.set_batch(true);
        if calc.evaluate(&expression.join(" ")).is_err() {
            code = 1;
        }
    }
    code
}

fn run_interactive(calc: &mut Evaluator) {
    let config = match Config::builder().max_history_size(HISTORY_LIMIT) {
        Ok(builder) => builder.auto_add_history(false).build(),
        Err(e) => {
            eprintln!("Error initializing readline: {}", e);
            process::exit(1);
        }
    };
    let mut rl: Editor<RpnHelper, DefaultHistory> = match Editor::with_config(config) {
        Ok(editor) => editor,
        Err(e) => {
            eprintln!("Error initializing readline: {}", e);
            process::exit(1);
        }
    };
    rl.set_helper(Some(RpnHelper::new(calc.completions())));

    let history_file = history_file();
    if let Some(ref path) = history_file {
        let _ = rl.load_history(path);
    }

    loop {
        match rl.readline(&calc.prompt()) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                // failures are already reported by the evaluator
                let _ = calc.evaluate(&line);
                if calc.exit_requested() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    if let Some(ref path) = history_file {
        let _ = rl.save_history(path);
    }
}

/// History file: ~/.rpn-history
fn history_file() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".rpn-history"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::{Cursor, Write};
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

    fn calc() -> (Evaluator, Capture) {
        let capture = Capture::default();
        let calc = Evaluator::new(CalcConfig::new()).with_output(Box::new(capture.clone()));
        (calc, capture)
    }

    fn text(capture: &Capture) -> String {
        String::from_utf8_lossy(&capture.0.borrow()).into_owned()
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["rpn", "-b", "-p", "4", "1", "2", "+"]).unwrap();
        assert!(args.batch);
        assert_eq!(args.precision, Some(4));
        assert_eq!(args.expression, vec!["1", "2", "+"]);
    }

    #[test]
    fn test_version_flag() {
        for flag in ["-v", "--version"] {
            let err = Args::try_parse_from(["rpn", flag]).err().unwrap();
            assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
        }
        assert!(Args::try_parse_from(["rpn", "-V"]).is_err());
    }

    #[test]
    fn test_negative_numbers_are_expressions() {
        let args = Args::try_parse_from(["rpn", "-5", "3", "+"]);
        // "-5" is a number, not a flag
        assert_eq!(args.unwrap().expression, vec!["-5", "3", "+"]);
    }

    #[test]
    fn test_run_once() {
        let (mut calc, out) = calc();
        assert_eq!(run_once(&mut calc, "2 2 +"), 0);
        assert_eq!(text(&out), "4\n");

        let (mut calc, _) = self::calc();
        assert_eq!(run_once(&mut calc, "1 0 /"), 1);
    }

    #[test]
    fn test_run_piped_with_operator() {
        let (mut calc, out) = calc();
        let input = Cursor::new("1 2 3\n");
        assert_eq!(run_piped(&mut calc, input, &["+".to_string()]), 0);
        assert_eq!(text(&out), "6\n");
    }

    #[test]
    fn test_run_piped_lines() {
        let (mut calc, out) = calc();
        let input = Cursor::new("2 2 +\n# comment\n3 x\n");
        assert_eq!(run_piped(&mut calc, input, &[]), 0);
        assert_eq!(text(&out), "4\n12\n");
    }
}
