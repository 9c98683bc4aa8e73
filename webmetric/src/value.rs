//! Primitive type inference for extracted values.
//!
//! JSONPath renders every match as text. Conditions, however, branch on the
//! type of the value (`result > 5` is numeric, `result == 'ok'` is textual), so
//! the text is coerced back into the most specific primitive it can represent.

use serde::{Deserialize, Serialize};

/// The kind of a [`PrimitiveValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// Signed 64-bit integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// Anything else.
    String,
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int64 => write!(f, "int64"),
            Self::Float64 => write!(f, "float64"),
            Self::Bool => write!(f, "bool"),
            Self::String => write!(f, "string"),
        }
    }
}

/// A scalar value with its inferred type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimitiveValue {
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// String value
    String(String),
}

impl PrimitiveValue {
    /// Returns the kind of this value.
    #[must_use]
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Int(_) => PrimitiveKind::Int64,
            Self::Float(_) => PrimitiveKind::Float64,
            Self::Bool(_) => PrimitiveKind::Bool,
            Self::String(_) => PrimitiveKind::String,
        }
    }

    /// Returns the value as a float if it is numeric.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::Bool(_) | Self::String(_) => None,
        }
    }
}

impl std::fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(fl) => write!(f, "{fl}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

/// Coerces raw text into the most specific primitive it parses as.
///
/// The order is fixed: integer, then float, then boolean, then the original
/// string. Coercion never fails.
///
/// # Examples
///
/// ```
/// use webmetric::value::{coerce, PrimitiveValue};
///
/// assert_eq!(coerce("42"), PrimitiveValue::Int(42));
/// assert_eq!(coerce("42.5"), PrimitiveValue::Float(42.5));
/// assert_eq!(coerce("true"), PrimitiveValue::Bool(true));
/// assert_eq!(coerce("abc"), PrimitiveValue::String("abc".to_string()));
/// ```
#[must_use]
pub fn coerce(raw: &str) -> PrimitiveValue {
    if let Ok(i) = raw.parse::<i64>() {
        return PrimitiveValue::Int(i);
    }

    if let Ok(f) = raw.parse::<f64>() {
        return PrimitiveValue::Float(f);
    }

    if let Some(b) = parse_bool(raw) {
        return PrimitiveValue::Bool(b);
    }

    PrimitiveValue::String(raw.to_string())
}

/// Parses the `true`/`false` family, ignoring case.
fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("t") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") || raw.eq_ignore_ascii_case("f") {
        Some(false)
    } else {
        None
    }
}

/// The single value extracted from a response body.
///
/// Keeps the text exactly as the JSONPath evaluator rendered it next to its
/// coerced form, so the measurement can report the original text.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedValue {
    raw: String,
    value: PrimitiveValue,
}

impl ExtractedValue {
    /// Coerces `raw` and keeps both representations.
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let value = coerce(&raw);
        Self { raw, value }
    }

    /// The text as extracted.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The coerced value.
    #[must_use]
    pub fn value(&self) -> &PrimitiveValue {
        &self.value
    }

    /// The inferred kind.
    #[must_use]
    pub fn kind(&self) -> PrimitiveKind {
        self.value.kind()
    }

    /// Consumes the value, returning the extracted text.
    #[must_use]
    pub fn into_raw(self) -> String {
        self.raw
    }
}

impl std::fmt::Display for ExtractedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_integer() {
        assert_eq!(coerce("42"), PrimitiveValue::Int(42));
        assert_eq!(coerce("-7"), PrimitiveValue::Int(-7));
        assert_eq!(coerce("0"), PrimitiveValue::Int(0));
        assert_eq!(coerce("+5"), PrimitiveValue::Int(5));
    }

    #[test]
    fn test_coerce_integer_boundaries() {
        assert_eq!(
            coerce("9223372036854775807"),
            PrimitiveValue::Int(i64::MAX)
        );
        assert_eq!(
            coerce("-9223372036854775808"),
            PrimitiveValue::Int(i64::MIN)
        );

        // One past i64::MAX no longer fits and falls through to float
        assert_eq!(coerce("9223372036854775808").kind(), PrimitiveKind::Float64);
    }

    #[test]
    fn test_coerce_float() {
        assert_eq!(coerce("42.5"), PrimitiveValue::Float(42.5));
        assert_eq!(coerce("-0.25"), PrimitiveValue::Float(-0.25));
        assert_eq!(coerce("1e3"), PrimitiveValue::Float(1000.0));
        assert_eq!(coerce("42.0"), PrimitiveValue::Float(42.0));
    }

    #[test]
    fn test_coerce_bool() {
        assert_eq!(coerce("true"), PrimitiveValue::Bool(true));
        assert_eq!(coerce("TRUE"), PrimitiveValue::Bool(true));
        assert_eq!(coerce("True"), PrimitiveValue::Bool(true));
        assert_eq!(coerce("t"), PrimitiveValue::Bool(true));
        assert_eq!(coerce("false"), PrimitiveValue::Bool(false));
        assert_eq!(coerce("False"), PrimitiveValue::Bool(false));
        assert_eq!(coerce("F"), PrimitiveValue::Bool(false));
    }

    #[test]
    fn test_coerce_integer_wins_over_bool() {
        // "1" and "0" are valid booleans in some parsers but must stay integers
        assert_eq!(coerce("1"), PrimitiveValue::Int(1));
        assert_eq!(coerce("0"), PrimitiveValue::Int(0));
    }

    #[test]
    fn test_coerce_string_fallback() {
        assert_eq!(coerce("abc"), PrimitiveValue::String("abc".to_string()));
        assert_eq!(coerce(""), PrimitiveValue::String(String::new()));
        assert_eq!(coerce(" 42"), PrimitiveValue::String(" 42".to_string()));
        assert_eq!(coerce("yes"), PrimitiveValue::String("yes".to_string()));
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(PrimitiveKind::Int64.to_string(), "int64");
        assert_eq!(PrimitiveKind::Float64.to_string(), "float64");
        assert_eq!(PrimitiveKind::Bool.to_string(), "bool");
        assert_eq!(PrimitiveKind::String.to_string(), "string");
    }

    #[test]
    fn test_rerender_reproduces_text() {
        for text in ["7", "-12", "42.5", "0.001", "true", "false", "healthy"] {
            let value = coerce(text);
            assert_eq!(value.to_string(), text, "kind {}", value.kind());
        }
    }

    #[test]
    fn test_extracted_value_keeps_raw_text() {
        let extracted = ExtractedValue::new("42.0");
        assert_eq!(extracted.kind(), PrimitiveKind::Float64);
        assert_eq!(extracted.value(), &PrimitiveValue::Float(42.0));
        assert_eq!(extracted.raw(), "42.0");
        assert_eq!(extracted.to_string(), "42.0");
        assert_eq!(extracted.into_raw(), "42.0");
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(PrimitiveValue::Int(3).as_f64(), Some(3.0));
        assert_eq!(PrimitiveValue::Float(2.5).as_f64(), Some(2.5));
        assert_eq!(PrimitiveValue::Bool(true).as_f64(), None);
        assert_eq!(PrimitiveValue::String("x".into()).as_f64(), None);
    }
}
