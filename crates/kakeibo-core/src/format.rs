//! Yen and percentage formatting for messages and reports

/// Group digits with commas: 1234567 -> "1,234,567"
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Signed yen: "+¥1,234", "-¥5,678", "¥0"
pub fn format_currency(value: i64) -> String {
    let formatted = group_thousands(value.unsigned_abs());
    match value.signum() {
        1 => format!("+¥{}", formatted),
        -1 => format!("-¥{}", formatted),
        _ => format!("¥{}", formatted),
    }
}

/// Unsigned yen: "¥1,234" for both 1234 and -1234
pub fn format_amount(value: i64) -> String {
    format!("¥{}", group_thousands(value.unsigned_abs()))
}

/// Rounded yen for fractional values such as averages
pub fn format_amount_f64(value: f64) -> String {
    format_amount(value.round() as i64)
}

/// Ratio as a percentage with one decimal: 0.1234 -> "12.3%"
pub fn format_percentage(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

/// Ratio as a whole percentage: 0.256 -> "26%"
pub fn format_percentage_int(ratio: f64) -> String {
    format!("{}%", (ratio * 100.0).round() as i64)
}

/// Signed change rate for trend display; `None` renders as a dash
pub fn format_change(rate: Option<f64>) -> String {
    match rate {
        Some(r) if r > 0.0 => format!("+{}", format_percentage(r)),
        Some(r) => format_percentage(r),
        None => "-".to_string(),
    }
}
