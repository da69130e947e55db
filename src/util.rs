// Parsing and formatting helpers.
//
// Cost exports are hand-edited spreadsheets, so cells are parsed
// forgivingly here and the rest of the code works with typed values.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Parse a cost cell into `f64`.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
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
    let s = s.replace(",", "");
    s.parse::<f64>().ok()
}

/// Cost cell as stored in the long table: unparsable or blank becomes NaN.
pub fn parse_cost(s: &str) -> f64 {
    parse_f64_safe(Some(s)).unwrap_or(f64::NAN)
}

pub fn parse_u32_safe(s: Option<&str>) -> Option<u32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<u32>().ok()
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    // `YYYY-MM-DD`
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Format a floating-point value with a fixed number of decimal places and
/// locale-aware thousands separators (e.g., `1,234,567.89`).
///
/// Non-finite values render as `n/a`.
pub fn format_number(n: f64, decimals: usize) -> String {
    if !n.is_finite() {
        return "n/a".to_string();
    }
    let s = format!("{:.*}", decimals, n.abs());
    let neg = n < 0.0 && s.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Past u128 the digits are printed without grouping rather than lost.
    let mut res = match int_part.parse::<u128>() {
        Ok(v) => v.to_formatted_string(&Locale::en),
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
    n.to_formatted_string(&Locale::en)
}
