//! Number Normalizer Module
//! Parses locale-formatted numeric strings (pt-BR style) into floats.
//!
//! Report cells arrive as strings like `"1.234,56"`: `.` is a thousands
//! separator and `,` the decimal separator. Aggregation must never abort on
//! a malformed cell, so the lenient entry point maps anything unparseable
//! to `0.0` instead of raising an error.

/// Strict parse: `None` for missing, empty, or non-numeric input.
///
/// Used where "is this cell a number at all" matters, e.g. the table sort
/// comparator choosing between numeric and lexicographic ordering.
pub fn try_parse_number(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    // "1.234,56" -> "1234.56"
    let normalized = raw.replace('.', "").replacen(',', ".", 1);

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => None,
    }
}

/// Lenient parse: malformed or absent cells become `0.0`.
///
/// This is the normalizer used by every accumulation path; a single bad
/// cell degrades to zero and the rest of the file keeps contributing.
pub fn parse_number(raw: Option<&str>) -> f64 {
    try_parse_number(raw).unwrap_or(0.0)
}
