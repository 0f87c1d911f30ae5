//! Display helpers shared by the dashboard screens.
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const HASH_PREVIEW_CHARS: usize = 12;

/// Formats an amount with two decimals and `,` thousands separators.
///
/// ```rust
/// use engine::format::format_amount;
///
/// assert_eq!(format_amount(1234567.891), "1,234,567.89");
/// assert_eq!(format_amount(-0.5), "-0.50");
/// ```
#[must_use]
pub fn format_amount(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{:.2}", value.abs());
    let (int_part, dec_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // Values that round to zero are shown unsigned.
    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped}.{dec_part}")
}

/// Formats an amount in the given ISO currency, `USD` when unknown.
#[must_use]
pub fn format_currency(value: f64, code: Option<&str>) -> String {
    let code = code
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .unwrap_or("USD");
    let body = format_amount(value);
    let (sign, digits) = match body.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", body.as_str()),
    };

    match code.to_ascii_uppercase().as_str() {
        "USD" => format!("{sign}${digits}"),
        "EUR" => format!("{sign}€{digits}"),
        "GBP" => format!("{sign}£{digits}"),
        other => format!("{sign}{other} {digits}"),
    }
}

/// Short form of a chain hash: the first 12 characters and an ellipsis.
#[must_use]
pub fn truncate_hash(hash: &str) -> String {
    let preview: String = hash.chars().take(HASH_PREVIEW_CHARS).collect();
    format!("{preview}...")
}

/// Block explorer link for a chain transaction, always with the full hash.
#[must_use]
pub fn explorer_url(explorer_base: &str, hash: &str) -> String {
    format!("{}/transaction/{hash}", explorer_base.trim_end_matches('/'))
}

/// Parses an entry date as an instant.
///
/// Accepts RFC 3339 timestamps, naive ISO date-times (read as UTC) and plain
/// ISO dates (midnight UTC).
#[must_use]
pub fn parse_entry_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

/// `Mar 31, 2024`, or the raw text when the date cannot be read.
#[must_use]
pub fn format_entry_date(raw: &str) -> String {
    parse_entry_date(raw)
        .map(|ts| ts.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}
