// Utility helpers for parsing and basic statistics.
//
// This module centralizes the loosely-typed text handling coming out of the
// backend export so the rest of the code can assume clean, typed values.
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in exports (commas, spaces, text).
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters, which also keeps
///   `NaN` and `inf` out.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Trimmed text, or `None` when the field is missing or blank.
pub fn non_blank(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

pub fn parse_timestamp_safe(s: Option<&str>) -> Option<NaiveDateTime> {
    // `created_at` comes out as RFC 3339; older exports only carry the date.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let s = format!("{:.*}", decimals, n.abs());
    let neg = n.is_sign_negative() && s.chars().any(|c| c != '0' && c != '.');
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Use `num-format` to insert commas into the integer portion; values
    // past `i64` keep their plain digits.
    let mut res = match int_part.parse::<i64>() {
        Ok(int_val) => int_val.to_formatted_string(&Locale::en),
        Err(_) => int_part.to_string(),
    };
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts in console messages
    // (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}
