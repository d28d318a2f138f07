//! Plain-text stack format used for editing the stack externally
//!
//! One number per line, bottom of the stack first. Lines starting with `#`
//! and trailing `# comments` are ignored.

use crate::token::strip_comment;

/// Written at the top of every rendered stack file
pub const HEADER: &str = "\
# add or remove numbers as you wish.
# each number must be on its own line.
# numbers must be floating point formatted.
";

/// Render the stack, bottom first, below [`HEADER`]
pub fn render(items: &[f64]) -> String {
    let mut out = String::from(HEADER);
    for item in items {
        out.push_str(&item.to_string());
        out.push('\n');
    }
    out
}

/// Parse a stack file
///
/// Returns the numbers found plus one diagnostic per malformed line. A bad
/// line is skipped; it never aborts the parse.
pub fn parse(text: &str) -> (Vec<f64>, Vec<String>) {
    let mut items = Vec::new();
    let mut diagnostics = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let stripped = strip_comment(raw);
        let line = stripped.trim();
        if line.is_empty() {
            continue;
        }

        match line.parse::<f64>() {
            Ok(value) => items.push(value),
            Err(_) => diagnostics.push(format!(
                "line {}: {} is not a floating point number",
                index + 1,
                line
            )),
        }
    }

    (items, diagnostics)
}
