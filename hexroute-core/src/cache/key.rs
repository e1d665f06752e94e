//! Canonical cache keys derived from call arguments.
//!
//! A key is the JSON encoding of the argument list. The layout is fixed so
//! that keys stay byte-compatible with existing cache files:
//!
//! - positional arguments form a JSON array;
//! - when keyword arguments are present the key is the two-element array
//!   `[positional, keywords]`, with keyword names sorted;
//! - items are separated by `", "` and object keys from values by `": "`;
//! - strings escape every non-ASCII character as lowercase `\uXXXX` UTF-16
//!   units;
//! - floats always carry a fractional part or an exponent (`1.0`, `1e+16`,
//!   `1e-05`), so `1` and `1.0` produce different keys.

use std::fmt;

use serde_json::{Map, Number, Value};

use crate::{Cell, TravelMode};

/// Canonical, comparable encoding of one call's arguments.
///
/// # Examples
///
/// ```
/// use hexroute_core::{CacheKey, Cell, TravelMode};
///
/// let key = CacheKey::for_duration(
///     &Cell::from("87b91694effffff"),
///     &Cell::from("87b916948ffffff"),
///     &TravelMode::driving(),
/// );
/// assert_eq!(key.as_str(), r#"["87b91694effffff", "87b916948ffffff", "driving"]"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a call with positional arguments only.
    #[must_use]
    pub fn from_args(args: &[Value]) -> Self {
        let mut out = String::new();
        encode_array(args, &mut out);
        Self(out)
    }

    /// Key for a call with positional and keyword arguments.
    ///
    /// Falls back to [`CacheKey::from_args`] when `kwargs` is empty, so a
    /// call that passes no keywords matches one that never could.
    #[must_use]
    pub fn from_call(args: &[Value], kwargs: &Map<String, Value>) -> Self {
        if kwargs.is_empty() {
            return Self::from_args(args);
        }
        let mut out = String::from("[");
        encode_array(args, &mut out);
        out.push_str(", ");
        encode_object(kwargs, &mut out);
        out.push(']');
        Self(out)
    }

    /// Key for a directional duration query.
    #[must_use]
    pub fn for_duration(source: &Cell, destination: &Cell, mode: &TravelMode) -> Self {
        Self::from_args(&[
            Value::from(source.as_str()),
            Value::from(destination.as_str()),
            Value::from(mode.as_str()),
        ])
    }

    /// Wrap a key read back from a store.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the encoded key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn encode(value: &Value, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(number) => encode_number(number, out),
        Value::String(text) => encode_string(text, out),
        Value::Array(items) => encode_array(items, out),
        Value::Object(map) => encode_object(map, out),
    }
}

fn encode_array(items: &[Value], out: &mut String) {
    out.push('[');
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        encode(item, out);
    }
    out.push(']');
}

fn encode_object(map: &Map<String, Value>, out: &mut String) {
    // `Map` iterates in insertion order when `preserve_order` is enabled
    // anywhere in the build, so sort explicitly.
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|lhs, rhs| lhs.0.cmp(rhs.0));
    out.push('{');
    for (index, (name, value)) in entries.into_iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        encode_string(name, out);
        out.push_str(": ");
        encode(value, out);
    }
    out.push('}');
}

fn encode_number(number: &Number, out: &mut String) {
    match number.as_f64() {
        Some(float) if number.is_f64() => encode_float(float, out),
        _ => out.push_str(&number.to_string()),
    }
}

/// Shortest round-trip float repr with a mandatory fraction or exponent.
fn encode_float(float: f64, out: &mut String) {
    // `Debug` already switches to scientific notation below 1e-4 and from
    // 1e16 upwards; only the exponent needs an explicit sign and two digits.
    let repr = format!("{float:?}");
    let Some((mantissa, exponent)) = repr.split_once('e') else {
        out.push_str(&repr);
        return;
    };
    let (sign, digits) = exponent
        .strip_prefix('-')
        .map_or(('+', exponent), |digits| ('-', digits));
    out.push_str(mantissa);
    out.push('e');
    out.push(sign);
    if digits.len() < 2 {
        out.push('0');
    }
    out.push_str(digits);
}

fn encode_string(text: &str, out: &mut String) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            ' '..='~' => out.push(ch),
            _ => {
                let mut units = [0_u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{unit:04x}"));
                }
            }
        }
    }
    out.push('"');
}
