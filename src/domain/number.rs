//! Lenient numeric handling for raw form input.
//!
//! Form fields hold whatever the user typed. Nothing here rejects input:
//! text that is not a number becomes `NaN` and is sent to the service as
//! JSON `null`.

use serde::Serializer;

/// Largest integer an f64 represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Coerce a whole field value to a number.
///
/// Blank input coerces to `0`, anything unparseable to `NaN`.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Parse the longest numeric prefix of `raw`, `NaN` when there is none.
///
/// `"350000 KM"` parses as `350000`, `"abc"` as `NaN`.
pub fn parse_lenient_float(raw: &str) -> f64 {
    let s = raw.trim_start();
    let end = s
        .char_indices()
        .take_while(|(_, c)| matches!(c, '0'..='9' | '+' | '-' | '.' | 'e' | 'E'))
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(0);

    // Only ASCII characters were accepted, so every byte index is a char boundary
    let candidate = &s[..end];
    (1..=candidate.len())
        .rev()
        .find_map(|n| candidate[..n].parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// Serialize an f64 the way the service expects numbers on the wire:
/// integral values as JSON integers, non-finite values as `null`.
pub fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if !value.is_finite() {
        serializer.serialize_none()
    } else if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_handles_blank_and_garbage() {
        assert_eq!(coerce_number(" 3 "), 3.0);
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("2.5"), 2.5);
        assert!(coerce_number("three").is_nan());
    }

    #[test]
    fn lenient_parse_takes_numeric_prefix() {
        assert_eq!(parse_lenient_float("350000"), 350000.0);
        assert_eq!(parse_lenient_float("  1250.75 KM"), 1250.75);
        assert_eq!(parse_lenient_float("1e3x"), 1000.0);
        assert_eq!(parse_lenient_float("12e"), 12.0);
        assert!(parse_lenient_float("abc").is_nan());
        assert!(parse_lenient_float("-").is_nan());
        assert!(parse_lenient_float("").is_nan());
    }

    #[test]
    fn numbers_serialize_like_json_numbers() {
        #[derive(serde::Serialize)]
        struct Wrap(#[serde(serialize_with = "serialize_number")] f64);

        assert_eq!(serde_json::to_string(&Wrap(1076.0)).unwrap(), "1076");
        assert_eq!(serde_json::to_string(&Wrap(2.5)).unwrap(), "2.5");
        assert_eq!(serde_json::to_string(&Wrap(f64::NAN)).unwrap(), "null");
    }
}
