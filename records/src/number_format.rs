//! FILENAME: records/src/number_format.rs
//! PURPOSE: Number formatting and lenient number parsing for report cells.
//! CONTEXT: Raw numbers are shown in general form (no needless decimals);
//! computed sums are shown with a fixed number of decimals and a thousands
//! separator. Text typed by field operators may use a decimal comma.

/// Format a number in general form (shortest sensible representation).
pub fn format_general(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return String::new();
    }

    let abs_value = value.abs();

    // Use scientific notation for very large or very small numbers
    if abs_value >= 1e15 || abs_value < 1e-4 {
        return format!("{:e}", value);
    }

    // For integers, don't show decimal point
    if value.fract() == 0.0 {
        return format!("{:.0}", value);
    }

    // Up to 10 decimals, trailing zeros trimmed
    let formatted = format!("{:.10}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Format a number with fixed decimals and a thousands separator
/// (`1234.5` with 2 decimals gives `1,234.50`).
pub fn format_decimal(value: f64, decimal_places: u8) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let rounded = format!("{:.prec$}", value, prec = decimal_places as usize);
    add_thousands_separator(&rounded)
}

/// Add thousands separators to a numeric string.
fn add_thousands_separator(s: &str) -> String {
    let mut parts = s.splitn(2, '.');
    let integer_part = parts.next().unwrap_or("");
    let decimal_part = parts.next();

    let negative = integer_part.starts_with('-');
    let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    let mut result = String::new();
    let len = digits.len();

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    if negative {
        result.insert(0, '-');
    }

    if let Some(decimal) = decimal_part {
        result.push('.');
        result.push_str(decimal);
    }

    result
}

/// Parse text as a decimal number. Accepts a plain decimal point or a
/// single decimal comma (`16,38`); anything else is not a number.
pub fn parse_numeric(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(n) = text.parse::<f64>() {
        return n.is_finite().then_some(n);
    }

    if text.matches(',').count() == 1 && !text.contains('.') {
        if let Ok(n) = text.replace(',', ".").parse::<f64>() {
            return n.is_finite().then_some(n);
        }
    }

    None
}
