//! End-to-end evaluation tests
//!
//! Each test drives an `Evaluator` with whole input lines and checks the
//! resulting stack, the printed output or the reported error.

use rpn_calc::{CalcConfig, CalcError, Evaluator, StackEditor};
use std::cell::RefCell;
use std::io::{self, Write};
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

fn calc_with(config: CalcConfig) -> (Evaluator, Capture) {
    let capture = Capture::default();
    let calc = Evaluator::new(config).with_output(Box::new(capture.clone()));
    (calc, capture)
}

fn calc() -> (Evaluator, Capture) {
    calc_with(CalcConfig::new())
}

/// Evaluate `line` and return the top of the stack
fn eval(line: &str) -> f64 {
    let (mut calc, _) = calc();
    calc.evaluate(line).unwrap();
    calc.stack().peek().unwrap()
}

fn eval_batch(line: &str) -> f64 {
    let (mut calc, _) = calc_with(CalcConfig::new().with_batch(true));
    calc.evaluate(line).unwrap();
    calc.stack().peek().unwrap()
}

#[test]
fn test_basic_operators() {
    assert_eq!(eval("15 15 +"), 30.0);
    assert_eq!(eval("100 50 -"), 50.0);
    assert_eq!(eval("4 4 x"), 16.0);
    assert_eq!(eval("4 4 *"), 16.0);
    assert_eq!(eval("10 2 /"), 5.0);
    assert_eq!(eval("4 2 ^"), 16.0);
}

#[test]
fn test_swap_then_divide() {
    assert_eq!(eval("2 16 swap /"), 8.0);
}

#[test]
fn test_percent() {
    assert_eq!(eval("400 20 %"), 80.0);
    assert_eq!(eval("400 20 %-"), 320.0);
    assert_eq!(eval("400 20 %+"), 480.0);
}

#[test]
fn test_math_functions() {
    assert_eq!(eval("9 2 mod"), 1.0);
    assert_eq!(eval("9 2 remainder"), 1.0);
    assert_eq!(eval("16 sqrt"), 4.0);
    assert_eq!(eval("15.5 ceil"), 16.0);
    assert_eq!(eval("6 4 dim"), 2.0);
}

#[test]
fn test_constants() {
    assert_eq!(eval("Pi 2 *"), 6.283185307179586);
    assert_eq!(eval("Pi Sqrt2 +"), 4.555806215962888);
}

#[test]
fn test_bitwise() {
    assert_eq!(eval("1 3 and"), 1.0);
    assert_eq!(eval("1 3 or"), 3.0);
    assert_eq!(eval("1 3 xor"), 2.0);
    assert_eq!(eval("1 4 <"), 16.0);
}

#[test]
fn test_shift_overflow_keeps_stack() {
    let (mut calc, out) = calc();
    assert_eq!(
        calc.evaluate("4611686018427387904 2 <"),
        Err(CalcError::ShiftOverflow)
    );
    assert_eq!(calc.stack().all(), vec![4611686018427387904.0, 2.0]);
    assert!(out.text().contains("shift amount too large"));
}

#[test]
fn test_shift_operand_out_of_range_keeps_stack() {
    let (mut calc, out) = calc();
    assert!(matches!(
        calc.evaluate("1e300 1 <"),
        Err(CalcError::Domain(_))
    ));
    assert_eq!(calc.stack().all(), vec![1e300, 1.0]);
    assert!(out.text().contains("out of integer range"));
    assert!(calc.history().is_empty());
}

#[test]
fn test_converters() {
    assert_eq!(eval("111 inch-to-cm"), 281.94);
    assert_eq!(eval("111 gallons-to-liters"), 420.135);
    assert_eq!(eval("111 meters-to-yards"), 1.2139107611548556);
    assert_eq!(eval("111 miles-to-kilometers"), 178.599);
}

#[test]
fn test_batch_functions() {
    assert_eq!(eval_batch("1 2 3 4 5 median"), 3.0);
    assert_eq!(eval_batch("2 2 8 2 2 mean"), 3.2);
    assert_eq!(eval_batch("2 2 8 2 2 avg"), 3.2);
    assert_eq!(eval_batch("1 2 3 sum"), 6.0);
    assert_eq!(eval_batch("1 2 3 +"), 6.0);
    assert_eq!(eval_batch("5 -3 9 min"), -3.0);
    assert_eq!(eval_batch("5 -3 9 max"), 9.0);
}

#[test]
fn test_batch_result_replaces_stack() {
    let (mut calc, _) = calc_with(CalcConfig::new().with_batch(true));
    calc.evaluate("1 2 3 4 sum").unwrap();
    assert_eq!(calc.stack().all(), vec![10.0]);
}

#[test]
fn test_clear_in_batch_mode() {
    assert_eq!(eval_batch("1 1 1 1 1 clear 1 1 sum"), 2.0);
}

#[test]
fn test_batch_only_outside_batch_mode() {
    let (mut calc, out) = calc();
    assert_eq!(
        calc.evaluate("1 2 3 median"),
        Err(CalcError::BatchOnly("median".to_string()))
    );
    assert_eq!(calc.stack().all(), vec![1.0, 2.0, 3.0]);
    assert!(out.text().contains("only supported in batch mode"));
}

#[test]
fn test_batch_toggle_command() {
    let (mut calc, _) = calc();
    calc.evaluate("batch 1 2 3 median").unwrap();
    assert_eq!(calc.stack().all(), vec![2.0]);
    calc.evaluate("nobatch").unwrap();
    assert!(!calc.config().batch);
}

#[test]
fn test_reverse() {
    assert_eq!(eval("100 500 reverse -"), 400.0);
}

#[test]
fn test_undo() {
    assert_eq!(eval("4 4 + undo *"), 16.0);
}

#[test]
fn test_undo_without_history() {
    let (mut calc, _) = calc();
    assert_eq!(calc.evaluate("undo"), Err(CalcError::NothingToUndo));
    assert!(calc.stack().is_empty());
}

#[test]
fn test_division_by_zero_keeps_stack() {
    let (mut calc, out) = calc();
    assert_eq!(calc.evaluate("5 0 /"), Err(CalcError::DivisionByZero));
    assert_eq!(calc.stack().all(), vec![5.0, 0.0]);
    assert!(out.text().contains("division by null"));
}

#[test]
fn test_variables() {
    assert_eq!(eval("10 >TEN clear 5 <TEN *"), 50.0);
}

#[test]
fn test_unknown_variable() {
    let (mut calc, _) = calc();
    assert_eq!(
        calc.evaluate("<NOPE"),
        Err(CalcError::UnknownVariable("NOPE".to_string()))
    );
}

#[test]
fn test_store_on_empty_stack() {
    let (mut calc, _) = calc();
    assert_eq!(calc.evaluate(">X"), Err(CalcError::EmptyStack));
    assert!(calc.vars().is_empty());
}

#[test]
fn test_comments_and_whitespace() {
    for line in [
        "5",
        "  5",
        "5  ",
        "\t5\t",
        "5#19",
        "5 #19",
        "5   #   19",
        "5 # 19 + 3",
    ] {
        let (mut calc, _) = calc();
        calc.evaluate(line).unwrap();
        assert_eq!(calc.stack().all(), vec![5.0], "input {:?}", line);
    }

    let (mut calc, out) = calc();
    calc.evaluate("# just a comment").unwrap();
    calc.evaluate("").unwrap();
    calc.evaluate("   ").unwrap();
    assert!(calc.stack().is_empty());
    assert!(out.text().is_empty());
}

#[test]
fn test_escaped_hash_is_not_a_comment() {
    let (mut calc, out) = calc();
    assert_eq!(
        calc.evaluate("5 \\# 6"),
        Err(CalcError::UnknownToken("#".to_string()))
    );
    // the rest of the line is still evaluated
    assert_eq!(calc.stack().all(), vec![5.0, 6.0]);
    assert!(out.text().contains("unknown command or operator: #"));
}

#[test]
fn test_dup_and_shift() {
    let (mut calc, _) = calc();
    calc.evaluate("3 dup").unwrap();
    assert_eq!(calc.stack().all(), vec![3.0, 3.0]);
    calc.evaluate("shift").unwrap();
    assert_eq!(calc.stack().all(), vec![3.0]);
    calc.evaluate("c").unwrap();
    assert_eq!(calc.evaluate("dup"), Err(CalcError::EmptyStack));
}

#[test]
fn test_swap_needs_two_items() {
    let (mut calc, _) = calc();
    assert_eq!(calc.evaluate("1 swap"), Err(CalcError::NotEnoughArguments));
    assert_eq!(calc.stack().all(), vec![1.0]);
}

#[test]
fn test_show_commands_do_not_mutate() {
    let (mut calc, out) = calc();
    calc.evaluate("1 2 + >X 255").unwrap();
    let before = calc.stack().all();
    let rev = calc.stack().revision();

    calc.evaluate("dump history vars hex").unwrap();
    assert_eq!(calc.stack().all(), before);
    assert_eq!(calc.stack().revision(), rev);

    let text = out.text();
    assert!(text.contains("Stack revision"));
    assert!(text.contains("1 2 + = 3"));
    assert!(text.contains("VARIABLE"));
    assert!(text.contains("0xff"));
}

#[test]
fn test_vars_empty() {
    let (mut calc, out) = calc();
    calc.evaluate("vars").unwrap();
    assert_eq!(out.text(), "no vars registered\n");
}

#[test]
fn test_show_stack() {
    let (mut calc, out) = calc_with(CalcConfig::new().with_show_stack(true));
    calc.evaluate("1 2 3 4 5 6").unwrap();
    assert_eq!(out.text(), "stack: ... 2 3 4 5 6\n");

    let (mut calc, out) = calc_with(CalcConfig::new().with_show_stack(true).with_stdin(true));
    calc.evaluate("1 2").unwrap();
    assert!(out.text().is_empty());
}

#[test]
fn test_help_lists_functions() {
    let (mut calc, out) = calc();
    calc.evaluate("?").unwrap();
    let text = out.text();
    assert!(text.contains("sqrt"));
    assert!(text.contains("median"));
    assert!(text.contains("undo|u"));
}

#[test]
fn test_manual() {
    let (mut calc, out) = calc();
    calc.evaluate("manual").unwrap();
    assert!(out.text().contains("EXTENDING RPN WITH LUA"));
}

struct ScriptedEditor(&'static str);

impl StackEditor for ScriptedEditor {
    fn edit(&self, items: &[f64]) -> Result<String, String> {
        assert!(!items.is_empty());
        Ok(self.0.to_string())
    }
}

#[test]
fn test_edit_replaces_stack() {
    let (calc, out) = calc();
    let mut calc = calc.with_editor(Box::new(ScriptedEditor("# header\n7\nseven\n8\n")));
    calc.evaluate("1 2 3 edit").unwrap();
    assert_eq!(calc.stack().all(), vec![7.0, 8.0]);
    assert!(out.text().contains("line 3: seven is not a floating point number"));

    calc.evaluate("undo").unwrap();
    assert_eq!(calc.stack().all(), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_edit_without_editor() {
    let (mut calc, _) = calc();
    assert!(matches!(calc.evaluate("1 edit"), Err(CalcError::Domain(_))));
    assert_eq!(calc.stack().all(), vec![1.0]);
}

#[test]
fn test_debug_toggle() {
    let (mut calc, out) = calc();
    calc.evaluate("d").unwrap();
    assert!(calc.config().debug);
    assert!(calc.stack().debug());
    calc.evaluate("1 dump").unwrap();
    assert!(out.text().contains("Backup revision 0:"));
    calc.evaluate("nodebug").unwrap();
    assert!(!calc.stack().debug());
}
