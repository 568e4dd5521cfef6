/// Format a float as an amount with thousands separators: $1,234.56
pub fn money_in(val: f64, symbol: &str) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    if negative {
        format!("-{symbol}{with_commas}.{dec_part}")
    } else {
        format!("{symbol}{with_commas}.{dec_part}")
    }
}

/// Share of `part` in `total` as a percentage. A zero total is 0%.
pub fn percent(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part / total * 100.0
    }
}

/// Compact axis label: 950, 1.5k, 12k, 2.5M.
pub fn compact(val: f64) -> String {
    let abs = val.abs();
    let (scaled, suffix) = if abs >= 1_000_000.0 {
        (val / 1_000_000.0, "M")
    } else if abs >= 1000.0 {
        (val / 1000.0, "k")
    } else {
        return format!("{}", val.round() as i64);
    };
    if scaled == scaled.trunc() {
        format!("{}{suffix}", scaled as i64)
    } else {
        format!("{scaled:.1}{suffix}")
    }
}
