//! Text printed by the `manual` command and `rpn -m`

pub const MANUAL: &str = r##"NAME
    rpn - reverse polish notation calculator

SYNOPSIS
    rpn [-bdsim] [-c <lua script>] [-p <precision>] [--rc <config>] [<expression>...]

DESCRIPTION
    Numbers are put onto a stack. Operators and functions take their
    operands from the top of the stack and put the result back. Entering

        80 20 + 2 / 4 x

    computes ((80 + 20) / 2) * 4 = 200.

MODES
    Interactive
        Run rpn without arguments on a terminal. The prompt shows the
        stack depth, TAB completes names, ctrl-d / ctrl-c or "quit" exits.

    Command line
        rpn 2 2 +          prints 4 and exits.

    Standard input
        echo 2 2 + | rpn   evaluates every line and prints the results.
        echo 1 2 3 | rpn +  enables batch mode and applies + to the whole
                            stack, printing 6.

    Batch mode
        Toggled with "batch" or started with -b. Batch functions (sum,
        min, max, mean, median) consume the whole stack; in batch mode
        "+" means "sum".

INPUT
    Numbers may be decimal (-1.5, 1e3), hex integers (0xff) or times
    (2:30 is 2.5 hours). Everything after "#" is a comment; write \#
    for a literal "#".

STACK
    undo goes back to the stack before the last operation. dump prints
    the stack (and the backup when debugging). reverse, swap, shift, dup
    and clear rearrange it. edit opens the stack in $EDITOR (default vi),
    one number per line.

VARIABLES
    >NAME stores the top of the stack in NAME without removing it, <NAME
    pushes it back. Names start with an uppercase letter. vars lists
    them.

EXTENDING RPN WITH LUA
    rpn loads ~/.rpn.lua (or the script given with -c) on startup. The
    script must define init(), which registers functions:

        function add(a, b)
          return a + b
        end

        function init()
          register("add", 2, "addition")
        end

    The second argument of register() is the number of operands:

        0     receives the top of the stack, the stack is not changed
        1..n  receives n operands which are replaced by the result
        -1    receives the whole stack as a table, the stack is replaced
              by the result

    Functions must return a number. Only the base, table, math and string
    libraries are available to scripts.

CONFIGURATION
    Defaults can be set in $XDG_CONFIG_HOME/rpn/config.toml (or the file
    given with --rc): precision, batch, debug, show-stack, intermediate
    and stack-window. Command line flags override the file.

    Set RUST_LOG=rpn=debug for diagnostics on stderr.

GETTING HELP
    "help" or "?" lists every command, operator and function.
"##;
