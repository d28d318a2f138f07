//! Named mathematical constants

use std::f64::consts;

/// Every constant the calculator knows, in help order
pub const CONSTANTS: &[(&str, f64)] = &[
    ("Pi", consts::PI),
    ("Phi", 1.618_033_988_749_895),
    ("Sqrt2", consts::SQRT_2),
    ("SqrtE", 1.648_721_270_700_128_2),
    ("SqrtPi", 1.772_453_850_905_516),
    ("SqrtPhi", 1.272_019_649_514_069),
    ("Ln2", consts::LN_2),
    ("Log2E", consts::LOG2_E),
    ("Ln10", consts::LN_10),
    ("Log10E", consts::LOG10_E),
];

/// Look up a constant by its exact (case-sensitive) name
pub fn constant(name: &str) -> Option<f64> {
    CONSTANTS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, value)| *value)
}

pub fn constant_names() -> impl Iterator<Item = &'static str> {
    CONSTANTS.iter().map(|(name, _)| *name)
}
