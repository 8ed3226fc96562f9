/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use petition_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by half an ULP at the target precision so exact midpoints such as
    // 1.005 round up instead of down.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let grouped = group_thousands(&integer_part.to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` is "0.xx"; keep the ".xx".
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative && result.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format a record count with thousands separators.
///
/// ```
/// use petition_core::formatting::format_count;
///
/// assert_eq!(format_count(15342), "15,342");
/// ```
pub fn format_count(count: usize) -> String {
    group_thousands(&count.to_string())
}

/// Format a percentage with one decimal place, e.g. `"61.5%"`.
///
/// ```
/// use petition_core::formatting::format_percent;
///
/// assert_eq!(format_percent(61.54), "61.5%");
/// assert_eq!(format_percent(0.0), "0.0%");
/// ```
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_number(value, 1))
}

/// Format a duration in days rounded to a whole number, e.g. `"412 days"`.
pub fn format_days(days: f64) -> String {
    let whole = days.round() as i64;
    if whole == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", group_signed(whole))
    }
}

/// Cut `label` to at most `max_chars` characters, appending `…` when cut.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let kept: String = label.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

fn group_signed(value: i64) -> String {
    let grouped = group_thousands(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_number ────────────────────────────────────────────────────────

    #[test]
    fn test_format_number_zero() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_number_with_thousands() {
        assert_eq!(format_number(1_234.5, 1), "1,234.5");
        assert_eq!(format_number(1_000.0, 0), "1,000");
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(-9_876.5, 1), "-9,876.5");
    }

    #[test]
    fn test_format_number_negative_rounding_to_zero() {
        assert_eq!(format_number(-0.04, 1), "0.0");
    }

    #[test]
    fn test_format_number_rounds_up() {
        assert_eq!(format_number(1.005, 2), "1.01");
    }

    // ── format_count / format_percent ────────────────────────────────────────

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(33.333), "33.3%");
        assert_eq!(format_percent(100.0), "100.0%");
    }

    // ── format_days ──────────────────────────────────────────────────────────

    #[test]
    fn test_format_days_rounds() {
        assert_eq!(format_days(411.6), "412 days");
        assert_eq!(format_days(0.0), "0 days");
        assert_eq!(format_days(1.2), "1 day");
        assert_eq!(format_days(1234.0), "1,234 days");
    }

    // ── truncate_label ───────────────────────────────────────────────────────

    #[test]
    fn test_truncate_label_short_unchanged() {
        assert_eq!(truncate_label("ACME", 25), "ACME");
    }

    #[test]
    fn test_truncate_label_counts_chars() {
        let label = "FARMACÊUTICA ÇÃO LTDA";
        let cut = truncate_label(label, 10);
        assert_eq!(cut.chars().count(), 10);
        assert!(cut.ends_with('…'));
    }
}
