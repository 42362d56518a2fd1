//! Tick and value label formatting.

/// Year ticks print as integers; fractional ticks get no label.
pub fn year_label(value: f64) -> Option<String> {
    if value.fract() == 0.0 && value.is_finite() {
        Some(format!("{}", value as i64))
    } else {
        None
    }
}

/// Currency abbreviated to billions, e.g. `$1.25B`. Zero prints as `0`.
///
/// Below `$0.01B` three significant digits are kept, so `5e6` prints as
/// `$0.005B` rather than `$0B`.
pub fn billions_label(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let billions = value.abs() / 1e9;
    let decimals = if billions < 0.01 {
        (2 - billions.log10().floor() as i32).clamp(2, 12) as usize
    } else {
        2
    };
    let scaled = format!("{billions:.decimals$}");
    let trimmed = scaled.trim_end_matches('0').trim_end_matches('.');
    format!("{sign}${trimmed}B")
}

/// Plain number with no trailing zeros.
pub fn number_label(value: f64) -> String {
    // avoid "-0"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}")
}

/// One decimal, for values printed above bars.
pub fn score_label(value: f64) -> String {
    format!("{value:.1}")
}
