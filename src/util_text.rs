use chrono::{DateTime, Utc};

/// Split a Hive asset string into amount and currency code
/// Examples: "1.234 HBD" -> (1.234, "HBD"), "0.000 HIVE" -> (0.0, "HIVE")
pub fn parse_asset(s: &str) -> Option<(f64, &str)> {
    let mut parts = s.split_whitespace();
    let amount = parts.next()?.parse::<f64>().ok()?;
    let currency = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((amount, currency))
}

/// Format a pending payout for display, keeping the node's currency code
/// Examples: "$1.23 HBD", "0.000 HIVE" when the code is not HBD
pub fn format_payout(raw: &str) -> String {
    match parse_asset(raw) {
        Some((amount, "HBD")) => format!("${amount:.2} HBD"),
        Some((amount, code)) => format!("{amount:.3} {code}"),
        None if raw.is_empty() => "-".to_string(),
        None => raw.to_string(),
    }
}

/// Day-first date with minutes, in UTC (e.g. "02/01/2024 03:04")
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%d/%m/%Y %H:%M").to_string()
}

/// Vote weight with two decimals (e.g. "123.50")
pub fn format_vote_weight(weight: f64) -> String {
    format!("{weight:.2}")
}

/// Truncate to at most `max_chars` characters, appending "..." when cut.
/// Counts chars, not bytes, so multi-byte text never splits mid-codepoint.
pub fn excerpt(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
