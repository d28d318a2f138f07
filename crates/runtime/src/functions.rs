//! Function tables
//!
//! A [`FunctionTable`] maps operator and function names to a [`Function`]:
//! its arity, a one-line help text and a pure transformation from the
//! operands to a result. Tables are built once at startup and never change.
//!
//! Aliases point at the same entry as their canonical name, so `*` and `x`
//! resolve to one and the same [`Function`].
//!
//! Operand order follows the stack: for `a b -`, `args[0]` is `a` (deeper)
//! and `args[1]` is `b` (top).

use crate::special;
use rpn_core::CalcError;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Pure transformation of a function's operands
pub type MathFn = fn(&[f64]) -> Result<f64, CalcError>;

/// Number of stack items a function wants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Consume the whole stack
    Batch,
    /// Look at the top item without consuming it
    Inspect,
    /// Consume exactly this many items
    Fixed(usize),
}

impl Arity {
    /// Decode the numeric convention used by extension scripts:
    /// `-1` batch, `0` inspect, `n` fixed
    pub fn from_declared(n: i64) -> Option<Arity> {
        match n {
            -1 => Some(Arity::Batch),
            0 => Some(Arity::Inspect),
            n if n > 0 => Some(Arity::Fixed(n as usize)),
            _ => None,
        }
    }

    /// Numeric form, inverse of [`Arity::from_declared`]
    pub fn declared(self) -> i64 {
        match self {
            Arity::Batch => -1,
            Arity::Inspect => 0,
            Arity::Fixed(n) => n as i64,
        }
    }

    /// Minimum stack depth needed before the function may run
    pub fn required_depth(self) -> usize {
        match self {
            Arity::Batch | Arity::Inspect => 1,
            Arity::Fixed(n) => n,
        }
    }
}

/// A callable operator or function
#[derive(Debug, Clone)]
pub struct Function {
    pub name: &'static str,
    /// Help heading this function is listed under
    pub section: &'static str,
    pub aliases: Vec<&'static str>,
    pub arity: Arity,
    pub help: &'static str,
    pub func: MathFn,
}

impl Function {
    /// Run the transformation; `args` must hold the declared number of operands
    pub fn call(&self, args: &[f64]) -> Result<f64, CalcError> {
        (self.func)(args)
    }
}

/// Immutable name -> function map with alias support
#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    entries: Vec<Function>,
    names: BTreeMap<&'static str, usize>,
    section: &'static str,
}

impl FunctionTable {
    pub fn new() -> Self {
        FunctionTable::default()
    }

    /// Start a new help section; following functions are listed under it
    pub fn section(mut self, title: &'static str) -> Self {
        self.section = title;
        self
    }

    /// Add a function (builder pattern)
    pub fn with(
        mut self,
        name: &'static str,
        arity: Arity,
        help: &'static str,
        func: MathFn,
    ) -> Self {
        self.names.insert(name, self.entries.len());
        self.entries.push(Function {
            name,
            section: self.section,
            aliases: Vec::new(),
            arity,
            help,
            func,
        });
        self
    }

    /// Register `alias` as another name for `target`
    ///
    /// # Panics
    ///
    /// Panics if `target` is not in the table. Tables are static, so this
    /// is a programming error caught by the unit tests.
    pub fn with_alias(mut self, alias: &'static str, target: &'static str) -> Self {
        let index = *self
            .names
            .get(target)
            .unwrap_or_else(|| panic!("alias {} for unknown function {}", alias, target));
        self.entries[index].aliases.push(alias);
        self.names.insert(alias, index);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Function> {
        self.names.get(name).map(|&index| &self.entries[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Every name including aliases, sorted
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names.keys().copied()
    }

    /// Canonical entries in definition order
    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.entries.iter()
    }

    /// Canonical entries grouped by help section, in definition order
    pub fn sections(&self) -> Vec<(&'static str, Vec<&Function>)> {
        let mut sections: Vec<(&'static str, Vec<&Function>)> = Vec::new();
        for entry in &self.entries {
            match sections.last_mut() {
                Some((title, group)) if *title == entry.section => group.push(entry),
                _ => sections.push((entry.section, vec![entry])),
            }
        }
        sections
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Define a one-operand function: `unary!(table, "name", "help", |a| expr)`
macro_rules! unary {
    ($table:expr, $name:expr, $help:expr, |$a:ident| $body:expr) => {
        $table.with($name, Arity::Fixed(1), $help, |args| {
            let $a = args[0];
            Ok($body)
        })
    };
}

/// Define a two-operand function: `binary!(table, "name", "help", |a, b| expr)`
macro_rules! binary {
    ($table:expr, $name:expr, $help:expr, |$a:ident, $b:ident| $body:expr) => {
        $table.with($name, Arity::Fixed(2), $help, |args| {
            let ($a, $b) = (args[0], args[1]);
            Ok($body)
        })
    };
}

fn divide(args: &[f64]) -> Result<f64, CalcError> {
    if args[1] == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    Ok(args[0] / args[1])
}

/// Symmetric percentage difference between two values
fn percent_difference(args: &[f64]) -> Result<f64, CalcError> {
    let (a, b) = (args[0], args[1]);
    let mean = (a + b) / 2.0;
    if mean == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    Ok(((a - b).abs() / mean) * 100.0)
}

/// Integer part of a shift operand; must fit in an i64
fn shift_operand(value: f64) -> Result<i64, CalcError> {
    // i64::MIN is exactly representable, 2^63 is the first value past i64::MAX
    if !value.is_finite() || value < i64::MIN as f64 || value >= 9_223_372_036_854_775_808.0 {
        return Err(CalcError::Domain(format!(
            "shift operand {} is out of integer range",
            value
        )));
    }
    Ok(value as i64)
}

fn shift_amount(amount: f64) -> Result<u32, CalcError> {
    if amount.is_nan() {
        return Err(CalcError::Domain("shift amount is not a number".to_string()));
    }
    if amount < 0.0 {
        return Err(CalcError::NegativeShift);
    }
    if amount >= 64.0 {
        return Err(CalcError::ShiftOverflow);
    }
    Ok(amount as u32)
}

/// Left shift; fails if any set bit (or the sign) would be lost
fn shift_left(args: &[f64]) -> Result<f64, CalcError> {
    let value = shift_operand(args[0])?;
    let amount = shift_amount(args[1])?;
    let shifted = value << amount;
    if shifted >> amount != value {
        return Err(CalcError::ShiftOverflow);
    }
    Ok(shifted as f64)
}

/// Arithmetic right shift
fn shift_right(args: &[f64]) -> Result<f64, CalcError> {
    let value = shift_operand(args[0])?;
    let amount = shift_amount(args[1])?;
    Ok((value >> amount) as f64)
}

/// Shared fixed-arity table, built on first use
pub static NORMAL_FUNCTIONS: LazyLock<FunctionTable> = LazyLock::new(normal_functions);

/// Build the table of fixed-arity operators and functions
pub fn normal_functions() -> FunctionTable {
    let table = FunctionTable::new();

    // =========================================================================
    // Basic operators
    // =========================================================================

    let table = table.section("Basic operators");
    let table = binary!(table, "+", "add", |a, b| a + b);
    let table = binary!(table, "-", "subtract", |a, b| a - b);
    let table = binary!(table, "x", "multiply", |a, b| a * b);
    let table = table.with("/", Arity::Fixed(2), "divide", divide);
    let table = binary!(table, "^", "power", |a, b| a.powf(b));

    // =========================================================================
    // Percent
    // =========================================================================

    let table = table.section("Percent functions");
    let table = binary!(table, "%", "percent", |a, b| (a / 100.0) * b);
    let table = binary!(table, "%-", "subtract percent", |a, b| a - ((a / 100.0) * b));
    let table = binary!(table, "%+", "add percent", |a, b| a + ((a / 100.0) * b));
    let table = table.with(
        "%d",
        Arity::Fixed(2),
        "percentage difference",
        percent_difference,
    );

    // =========================================================================
    // Math functions
    // =========================================================================

    let table = table.section("Math functions");
    let table = binary!(table, "mod", "remainder of division", |a, b| {
        libm::remainder(a, b)
    });
    let table = unary!(table, "sqrt", "square root", |a| a.sqrt());
    let table = unary!(table, "abs", "absolute value", |a| a.abs());
    let table = unary!(table, "acos", "arccosine", |a| a.acos());
    let table = unary!(table, "acosh", "inverse hyperbolic cosine", |a| a.acosh());
    let table = unary!(table, "asin", "arcsine", |a| a.asin());
    let table = unary!(table, "asinh", "inverse hyperbolic sine", |a| a.asinh());
    let table = unary!(table, "atan", "arctangent", |a| a.atan());
    let table = binary!(table, "atan2", "arctangent of a/b", |a, b| a.atan2(b));
    let table = unary!(table, "atanh", "inverse hyperbolic tangent", |a| a.atanh());
    let table = unary!(table, "cbrt", "cube root", |a| a.cbrt());
    let table = unary!(table, "ceil", "round up", |a| a.ceil());
    let table = unary!(table, "cos", "cosine", |a| a.cos());
    let table = unary!(table, "cosh", "hyperbolic cosine", |a| a.cosh());
    let table = unary!(table, "erf", "error function", |a| libm::erf(a));
    let table = unary!(table, "erfc", "complementary error function", |a| {
        libm::erfc(a)
    });
    let table = unary!(table, "erfcinv", "inverse complementary error function", |a| {
        special::erfcinv(a)
    });
    let table = unary!(table, "erfinv", "inverse error function", |a| {
        special::erfinv(a)
    });
    let table = unary!(table, "exp", "e^x", |a| a.exp());
    let table = unary!(table, "exp2", "2^x", |a| a.exp2());
    let table = unary!(table, "expm1", "e^x - 1", |a| a.exp_m1());
    let table = unary!(table, "floor", "round down", |a| a.floor());
    let table = unary!(table, "gamma", "gamma function", |a| libm::tgamma(a));
    let table = unary!(table, "ilogb", "binary exponent as integer", |a| {
        libm::ilogb(a) as f64
    });
    let table = unary!(table, "j0", "bessel function of the first kind, order 0", |a| {
        libm::j0(a)
    });
    let table = unary!(table, "j1", "bessel function of the first kind, order 1", |a| {
        libm::j1(a)
    });
    let table = unary!(table, "log", "natural logarithm", |a| a.ln());
    let table = unary!(table, "log10", "decimal logarithm", |a| a.log10());
    let table = unary!(table, "log1p", "ln(1 + x)", |a| a.ln_1p());
    let table = unary!(table, "log2", "binary logarithm", |a| a.log2());
    let table = unary!(table, "logb", "binary exponent", |a| special::logb(a));
    let table = binary!(table, "pow", "power", |a, b| a.powf(b));
    let table = unary!(table, "round", "round half away from zero", |a| a.round());
    let table = unary!(table, "roundtoeven", "round half to even", |a| {
        a.round_ties_even()
    });
    let table = unary!(table, "sin", "sine", |a| a.sin());
    let table = unary!(table, "sinh", "hyperbolic sine", |a| a.sinh());
    let table = unary!(table, "tan", "tangent", |a| a.tan());
    let table = unary!(table, "tanh", "hyperbolic tangent", |a| a.tanh());
    let table = unary!(table, "trunc", "integer part", |a| a.trunc());
    let table = unary!(table, "y0", "bessel function of the second kind, order 0", |a| {
        libm::y0(a)
    });
    let table = unary!(table, "y1", "bessel function of the second kind, order 1", |a| {
        libm::y1(a)
    });
    let table = binary!(table, "copysign", "magnitude of a with sign of b", |a, b| {
        a.copysign(b)
    });
    let table = binary!(table, "dim", "max(a - b, 0)", |a, b| libm::fdim(a, b));
    let table = binary!(table, "hypot", "sqrt(a*a + b*b)", |a, b| a.hypot(b));

    // =========================================================================
    // Bitwise operators (on the integer part)
    // =========================================================================

    let table = table.section("Bitwise operators");
    let table = binary!(table, "and", "bitwise and", |a, b| {
        ((a as i64) & (b as i64)) as f64
    });
    let table = binary!(table, "or", "bitwise or", |a, b| ((a as i64) | (b as i64)) as f64);
    let table = binary!(table, "xor", "bitwise xor", |a, b| {
        ((a as i64) ^ (b as i64)) as f64
    });
    let table = table.with("<", Arity::Fixed(2), "left shift", shift_left);
    let table = table.with(">", Arity::Fixed(2), "right shift", shift_right);

    // =========================================================================
    // Unit converters
    // =========================================================================

    let table = table.section("Conversion functions");
    let table = unary!(table, "cm-to-inch", "centimeters to inches", |a| a / 2.54);
    let table = unary!(table, "inch-to-cm", "inches to centimeters", |a| a * 2.54);
    let table = unary!(table, "gallons-to-liters", "US gallons to liters", |a| {
        a * 3.785
    });
    let table = unary!(table, "liters-to-gallons", "liters to US gallons", |a| {
        a / 3.785
    });
    let table = unary!(table, "yards-to-meters", "yards to meters", |a| a * 91.44);
    let table = unary!(table, "meters-to-yards", "meters to yards", |a| a / 91.44);
    let table = unary!(table, "miles-to-kilometers", "miles to kilometers", |a| {
        a * 1.609
    });
    let table = unary!(table, "kilometers-to-miles", "kilometers to miles", |a| {
        a / 1.609
    });

    table.with_alias("*", "x").with_alias("remainder", "mod")
}
