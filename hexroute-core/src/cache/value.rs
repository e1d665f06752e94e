//! Tagged values held by the cache and their text form.

use std::fmt;

/// A memoized result: integer, float, or opaque text.
///
/// Values round-trip through text. [`CacheValue::parse`] tries a float
/// first, collapses integral floats to [`CacheValue::Integer`], and falls
/// back to [`CacheValue::Text`]. Recording `60.0` therefore reloads as the
/// integer `60`.
///
/// Integers are bounded by `i64`. An integral value beyond that range, such
/// as `1e300`, reloads as [`CacheValue::Float`] rather than as an exact
/// integer.
/// An empty field is text and marks a call that produced no result.
///
/// # Examples
///
/// ```
/// use hexroute_core::CacheValue;
///
/// assert_eq!(CacheValue::parse("60.0"), CacheValue::Integer(60));
/// assert_eq!(CacheValue::parse("3.5"), CacheValue::Float(3.5));
/// assert_eq!(CacheValue::parse("n/a"), CacheValue::Text("n/a".into()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum CacheValue {
    /// An integral number.
    Integer(i64),
    /// A non-integral (or out-of-range) number.
    Float(f64),
    /// Anything that does not parse as a number.
    Text(String),
}

impl CacheValue {
    /// Decode a stored value.
    ///
    /// Surrounding whitespace is ignored for numbers. Integral floats outside
    /// the `i64` range stay floats.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(float) => Self::from_float(float),
            Err(_) => Self::Text(raw.to_owned()),
        }
    }

    /// Numeric view of the value; `None` for text.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "integers only reach the cache through integral floats"
    )]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(integer) => Some(*integer as f64),
            Self::Float(float) => Some(*float),
            Self::Text(_) => None,
        }
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "the cast only happens once the value is known to be integral and in range"
    )]
    fn from_float(float: f64) -> Self {
        // 2^63 is exactly representable; anything at or beyond it overflows.
        const UPPER: f64 = 9_223_372_036_854_775_808.0;
        const LOWER: f64 = -9_223_372_036_854_775_808.0;
        if float.is_finite() && float.fract() == 0.0 && (LOWER..UPPER).contains(&float) {
            Self::Integer(float as i64)
        } else {
            Self::Float(float)
        }
    }
}

impl fmt::Display for CacheValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(integer) => write!(f, "{integer}"),
            Self::Float(float) if float.is_finite() && float.fract() == 0.0 => {
                write!(f, "{float:.1}")
            }
            Self::Float(float) => write!(f, "{float}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

impl From<i64> for CacheValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for CacheValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for CacheValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for CacheValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}
