//! Number formatting for results, history and stack listings

/// Default number of decimal places for non-integral results
pub const DEFAULT_PRECISION: usize = 2;

/// Format a result: integral values get no decimals, everything else uses
/// `precision` decimal places
pub fn format_number(value: f64, precision: usize) -> String {
    if value == value.trunc() {
        format!("{:.0}", value)
    } else {
        format!("{:.*}", precision, value)
    }
}

/// Render a list of numbers separated by single spaces, shortest exact form
pub fn list_to_string(items: &[f64]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_has_no_decimals() {
        assert_eq!(format_number(30.0, 2), "30");
        assert_eq!(format_number(-4.0, 5), "-4");
    }

    #[test]
    fn test_fraction_uses_precision() {
        assert_eq!(format_number(3.2, 2), "3.20");
        assert_eq!(format_number(std::f64::consts::PI, 4), "3.1416");
    }

    #[test]
    fn test_list_to_string() {
        assert_eq!(list_to_string(&[1.0, 2.5, 3.0]), "1 2.5 3");
        assert_eq!(list_to_string(&[]), "");
    }
}
