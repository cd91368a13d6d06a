//! String conversion for pub field values.

use serde_json::Value;

/// Render a field value as text.
///
/// Values are stringified, never type-checked. The conventions match how the
/// platform displays stored values: strings verbatim, `null` as `"null"`,
/// numbers in the shortest form that round-trips (`2.0` is `2`, `-0.0` is `0`,
/// `1e21` is `1e+21`), arrays joined with `,` and objects as `[object Object]`.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format_float(f).unwrap_or_else(|| n.to_string()),
            _ => n.to_string(),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Format a float the way the platform prints numbers: plain decimal notation
/// for decimal exponents in `-6..21`, scientific notation with a signed exponent
/// outside it.
fn format_float(f: f64) -> Option<String> {
    if f == 0.0 {
        return Some("0".to_string());
    }
    if f < 0.0 {
        return format_float(-f).map(|s| format!("-{s}"));
    }
    if !f.is_finite() {
        return None;
    }

    // Shortest round-trip digits, e.g. "1.5e-7"
    let scientific = format!("{f:e}");
    let (mantissa, exponent) = scientific.split_once('e')?;
    let exponent: i32 = exponent.parse().ok()?;
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = i32::try_from(digits.len()).ok()?;
    let n = exponent + 1;

    let formatted = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat(usize::try_from(n - k).ok()?))
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(usize::try_from(n).ok()?);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat(usize::try_from(-n).ok()?))
    } else {
        let sign = if n - 1 >= 0 { '+' } else { '-' };
        let (first, rest) = digits.split_at(1);
        let exp = (n - 1).abs();
        if rest.is_empty() {
            format!("{first}e{sign}{exp}")
        } else {
            format!("{first}.{rest}e{sign}{exp}")
        }
    };
    Some(formatted)
}
