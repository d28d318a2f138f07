//! Evaluator tests with a Lua extension script loaded
#![cfg(feature = "lua")]

use rpn_calc::{CalcConfig, CalcError, Evaluator, LuaExtension};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

const SCRIPT: &str = r#"
function lower(a, b)
  if a < b then return a else return b end
end

function parallelresistance(list)
  local sum = 0
  for _, r in ipairs(list) do
    sum = sum + 1 / r
  end
  return 1 / sum
end

function half(x)
  return x / 2
end

function broken(a, b)
  return nil
end

function init()
  register("lower", 2, "lower of two values")
  register("parallelresistance", -1, "parallel resistance")
  register("half", 0, "show half of the top item")
  register("broken", 2, "returns nil")
end
"#;

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

fn calc() -> (Evaluator, Capture) {
    let mut file = tempfile::Builder::new().suffix(".lua").tempfile().unwrap();
    file.write_all(SCRIPT.as_bytes()).unwrap();
    let extension = LuaExtension::load(file.path()).unwrap();

    let capture = Capture::default();
    let calc = Evaluator::new(CalcConfig::new())
        .with_extension(Box::new(extension))
        .with_output(Box::new(capture.clone()));
    (calc, capture)
}

#[test]
fn test_fixed_arity_function() {
    let (mut calc, out) = calc();
    calc.evaluate("5 3 lower").unwrap();
    assert_eq!(calc.stack().all(), vec![3.0]);
    assert_eq!(out.text(), "= 3\n");
    assert_eq!(calc.history(), &["5 3 lower = 3"]);
}

#[test]
fn test_batch_function_without_batch_mode() {
    let (mut calc, _) = calc();
    calc.evaluate("100 200 300 parallelresistance").unwrap();
    assert_eq!(calc.stack().len(), 1);
    let result = calc.stack().peek().unwrap();
    assert!((result - 54.54545454545455).abs() < 1e-12);
}

#[test]
fn test_inspect_function_keeps_stack() {
    let (mut calc, out) = calc();
    calc.evaluate("1 9 half").unwrap();
    assert_eq!(calc.stack().all(), vec![1.0, 9.0]);
    assert_eq!(out.text(), "= 4.50\n");
    assert!(calc.history().is_empty());
}

#[test]
fn test_not_enough_arguments() {
    let (mut calc, _) = calc();
    assert_eq!(calc.evaluate("1 lower"), Err(CalcError::NotEnoughArguments));
    assert_eq!(calc.evaluate("clear half"), Err(CalcError::NotEnoughArguments));
}

#[test]
fn test_non_number_result_keeps_stack() {
    let (mut calc, out) = calc();
    assert_eq!(
        calc.evaluate("1 2 broken"),
        Err(CalcError::NotANumber("broken".to_string()))
    );
    assert_eq!(calc.stack().all(), vec![1.0, 2.0]);
    assert!(out.text().contains("did not return a float64"));
}

#[test]
fn test_extension_names_in_help_and_completion() {
    let (calc, _) = calc();
    assert!(calc.render_help().contains("parallel resistance"));
    assert!(calc.completions().iter().any(|name| name == "lower"));
}
