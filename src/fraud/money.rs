//! Dollar formatting for fraud flag messages.

/// Format cents as `$1,234.56`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let dollars = group_thousands(cents / 100);
    format!("{sign}${dollars}.{:02}", cents % 100)
}

/// Format a fractional cent amount (e.g. an average), rounded to the nearest cent.
pub fn format_cents_f64(cents: f64) -> String {
    format_cents(cents.round() as i64)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_thousands_separators() {
        assert_eq!(format_cents(0), "$0.00");
        assert_eq!(format_cents(5), "$0.05");
        assert_eq!(format_cents(12_500), "$125.00");
        assert_eq!(format_cents(100_000), "$1,000.00");
        assert_eq!(format_cents(15_000_000), "$150,000.00");
        assert_eq!(format_cents(123_456_789), "$1,234,567.89");
        assert_eq!(format_cents(-1_050), "-$10.50");
    }

    #[test]
    fn rounds_fractional_cents() {
        assert_eq!(format_cents_f64(12_499.6), "$125.00");
        assert_eq!(format_cents_f64(33.333), "$0.33");
    }
}
