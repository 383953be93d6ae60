fn group_thousands(value: u64) -> String {
    let s = value.to_string().chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in s.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('.');
        }
        out.push(*ch);
    }
    out.into_iter().rev().collect()
}

/// Indonesian-style number: `.` groups thousands, `,` starts decimals (at most two).
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let fraction = cents % 100;
    if fraction == 0 {
        format!("{sign}{whole}")
    } else if fraction % 10 == 0 {
        format!("{sign}{whole},{}", fraction / 10)
    } else {
        format!("{sign}{whole},{fraction:02}")
    }
}

pub fn format_currency(amount: f64) -> String {
    let formatted = format_number(amount);
    match formatted.strip_prefix('-') {
        Some(rest) => format!("-Rp.{rest}"),
        None => format!("Rp.{formatted}"),
    }
}

pub fn format_optional(value: Option<f64>, money: bool) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if money => format_currency(v),
        Some(v) => format_number(v),
    }
}

/// Local date part of an ISO timestamp, `DD/MM/YYYY`. Unparseable input is shown as-is.
pub fn format_date(raw: Option<&str>) -> String {
    match raw {
        None => "-".to_string(),
        Some(raw) => crate::forms::date_part(raw)
            .map(|date| date.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_with_dots() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(999.0), "999");
        assert_eq!(format_number(1_000.0), "1.000");
        assert_eq!(format_number(1_234_567.0), "1.234.567");
    }

    #[test]
    fn keeps_short_decimals() {
        assert_eq!(format_number(1500.5), "1.500,5");
        assert_eq!(format_number(12.34), "12,34");
        assert_eq!(format_number(-2500.0), "-2.500");
    }

    #[test]
    fn currency_prefix_and_sign() {
        assert_eq!(format_currency(75_000.0), "Rp.75.000");
        assert_eq!(format_currency(-10_000.0), "-Rp.10.000");
        assert_eq!(format_optional(None, true), "-");
        assert_eq!(format_optional(Some(3.0), false), "3");
    }

    #[test]
    fn dates_render_day_first() {
        assert_eq!(format_date(Some("2024-05-01T12:00:00.000Z")), "01/05/2024");
        assert_eq!(format_date(Some("yesterday")), "yesterday");
        assert_eq!(format_date(None), "-");
    }
}
