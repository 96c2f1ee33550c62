//! # Numeric Input Handling
//!
//! Form fields arrive as free text, already-parsed numbers, or nothing at
//! all. [`FieldValue`] models that union and [`FieldValue::parse_or`] coerces
//! it to a usable `f64` with a per-field fallback, so the estimation engine
//! never has to deal with missing or malformed input.
//!
//! A value of exactly zero is treated as "not filled in" and coerces to the
//! fallback. Fields where zero would be meaningful (none in this domain:
//! lot sizes, produced units and day counts all fall back to a safe default
//! rather than divide by zero) rely on this.
//!
//! ## Example
//!
//! ```rust
//! use costeo_core::numeric::FieldValue;
//!
//! assert_eq!(FieldValue::from("2.5").parse_or(1.0), 2.5);
//! assert_eq!(FieldValue::from("").parse_or(1.0), 1.0);
//! assert_eq!(FieldValue::from("abc").parse_or(1.0), 1.0);
//! assert_eq!(FieldValue::Number(0.0).parse_or(1.0), 1.0);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// FIELD VALUES
// ============================================================================

/// A raw form-field value before numeric coercion.
///
/// Deserializes untagged, so `3.5`, `"3.5"` and `null` in a JSON payload all
/// become a `FieldValue` without the caller pre-cleaning anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    /// A number the caller already parsed
    Number(f64),
    /// Free text as typed, possibly with stray whitespace
    Text(String),
    /// Field never filled in (JSON `null`)
    #[default]
    Empty,
}

impl FieldValue {
    /// Coerce to `f64`, falling back to `default` when the value is absent,
    /// unparseable, non-finite, or exactly zero.
    ///
    /// Text must parse as a complete number after trimming; trailing garbage
    /// ("12abc") falls back rather than salvaging a prefix. Negative values
    /// pass through untouched, validation is a separate concern.
    pub fn parse_or(&self, default: f64) -> f64 {
        let parsed = match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok(),
            FieldValue::Empty => None,
        };
        match parsed {
            Some(n) if n.is_finite() && n != 0.0 => n,
            _ => default,
        }
    }

    /// True when no usable number is present (the fallback would be used
    /// whatever its value).
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Number(n) => !n.is_finite() || *n == 0.0,
            FieldValue::Text(s) => !matches!(
                s.trim().parse::<f64>(),
                Ok(n) if n.is_finite() && n != 0.0
            ),
            FieldValue::Empty => true,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

// ============================================================================
// MONEY ROUNDING
// ============================================================================

/// Round a monetary amount to 2 decimal places, half away from zero.
///
/// All money figures in results are rounded with this at the point they are
/// produced; intermediate math stays at full precision unless a formula
/// deliberately consumes a rounded figure (per-material costs do).
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_passthrough() {
        assert_eq!(FieldValue::Number(12.5).parse_or(0.0), 12.5);
        assert_eq!(FieldValue::Number(-3.0).parse_or(0.0), -3.0);
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(FieldValue::from("42").parse_or(0.0), 42.0);
        assert_eq!(FieldValue::from("  3.75  ").parse_or(0.0), 3.75);
        assert_eq!(FieldValue::from("-1.5").parse_or(0.0), -1.5);
    }

    #[test]
    fn test_fallback_on_garbage() {
        assert_eq!(FieldValue::from("abc").parse_or(7.0), 7.0);
        assert_eq!(FieldValue::from("12abc").parse_or(7.0), 7.0);
        assert_eq!(FieldValue::from("").parse_or(7.0), 7.0);
        assert_eq!(FieldValue::from("   ").parse_or(7.0), 7.0);
        assert_eq!(FieldValue::Empty.parse_or(7.0), 7.0);
    }

    #[test]
    fn test_zero_coerces_to_fallback() {
        assert_eq!(FieldValue::Number(0.0).parse_or(1.0), 1.0);
        assert_eq!(FieldValue::from("0").parse_or(1.0), 1.0);
        assert_eq!(FieldValue::from("0.0").parse_or(1.0), 1.0);
    }

    #[test]
    fn test_non_finite_coerces_to_fallback() {
        assert_eq!(FieldValue::Number(f64::NAN).parse_or(2.0), 2.0);
        assert_eq!(FieldValue::Number(f64::INFINITY).parse_or(2.0), 2.0);
        assert_eq!(FieldValue::from("NaN").parse_or(2.0), 2.0);
    }

    #[test]
    fn test_is_blank() {
        assert!(FieldValue::Empty.is_blank());
        assert!(FieldValue::from("").is_blank());
        assert!(FieldValue::from("xyz").is_blank());
        assert!(FieldValue::Number(0.0).is_blank());
        assert!(!FieldValue::Number(5.0).is_blank());
        assert!(!FieldValue::from("5").is_blank());
    }

    #[test]
    fn test_serde_untagged() {
        let v: Vec<FieldValue> = serde_json::from_str(r#"[3.5, "2", null]"#).unwrap();
        assert_eq!(v[0], FieldValue::Number(3.5));
        assert_eq!(v[1], FieldValue::Text("2".to_string()));
        assert_eq!(v[2], FieldValue::Empty);
    }

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(10.0 / 3.0), 3.33);
        assert_eq!(round_money(2.346), 2.35);
        // exact halves round away from zero (0.125 * 100 is exactly 12.5)
        assert_eq!(round_money(0.125), 0.13);
        assert_eq!(round_money(-0.125), -0.13);
        assert_eq!(round_money(0.0), 0.0);
    }
}
