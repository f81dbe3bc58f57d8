//! Permissive readers for loosely typed JSON fields
//!
//! Partially edited records must never fail to import: anything that is not
//! a usable number becomes 0 (or `None` where absence is meaningful).

use serde_json::Value;

/// Parse a JSON number or numeric string, `None` otherwise
fn parse_number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Dollar amount or rate; missing and malformed values are 0
pub(crate) fn amount(value: Option<&Value>) -> f64 {
    value.and_then(parse_number).unwrap_or(0.0)
}

/// Non-negative whole count; fractions are floored, negatives become 0
pub(crate) fn count(value: Option<&Value>) -> u32 {
    let raw = value.and_then(parse_number).unwrap_or(0.0);
    if raw <= 0.0 {
        0
    } else {
        raw.floor().min(u32::MAX as f64) as u32
    }
}

/// Strictly positive amount, `None` for empty strings, zero or garbage
pub(crate) fn positive_amount(value: Option<&Value>) -> Option<f64> {
    value.and_then(parse_number).filter(|v| *v > 0.0)
}

/// Whether a value is present but could not be read as a number
pub(crate) fn is_malformed_number(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(v) => parse_number(v).is_none(),
    }
}

/// String field, also accepting numbers (ids are sometimes numeric)
pub(crate) fn text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
