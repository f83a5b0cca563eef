/// Placeholder shown for profile fields the service left empty.
pub const NOT_AVAILABLE: &str = "N/A";

/// Return the trimmed value, or [`NOT_AVAILABLE`] when missing or blank.
pub fn text_or_na(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned())
}

/// Format an audit ratio with two decimals, or [`NOT_AVAILABLE`].
pub fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(value) if value.is_finite() => format!("{value:.2}"),
        _ => NOT_AVAILABLE.to_owned(),
    }
}

/// Compact XP rendering: `950`, `12.3 kB`, `1.50 MB` (the service counts XP in bytes).
pub fn format_xp(amount: i64) -> String {
    let magnitude = amount.unsigned_abs();
    let sign = if amount < 0 { "-" } else { "" };

    if magnitude >= 1_000_000 {
        format!("{sign}{:.2} MB", magnitude as f64 / 1_000_000.0)
    } else if magnitude >= 1_000 {
        format!("{sign}{:.1} kB", magnitude as f64 / 1_000.0)
    } else {
        format!("{sign}{magnitude} B")
    }
}
