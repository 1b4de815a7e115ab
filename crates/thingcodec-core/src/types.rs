/*!
 * Core data types for thingcodec.
 *
 * This module defines the identifiers and the loosely-typed values that flow between the host
 * framework and a device's bus topics.
 */
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unique identifier for a configured accessory instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Id(String);

impl Id {
    /// Create a new ID with a random UUID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create an ID from a string
    pub fn from_string<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_string())
    }

    /// Get the string representation of the ID
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Default for Id {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Self::from_string(s)
    }
}

/// A property value as seen by the framework or carried on the bus.
///
/// Bus payloads usually arrive as strings, so the numeric accessors are lenient about
/// textual numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    /// Null value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Float(f64),
    /// String value
    String(String),
}

impl Value {
    /// Try to get a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Parse the value as an integer code.
    ///
    /// Integers pass through and floats truncate toward zero. Strings are trimmed and their
    /// leading (optionally signed) run of digits is parsed, so `"255"`, `" 1 "` and `"2.7"`
    /// give 255, 1 and 2. Anything without leading digits gives `None`.
    pub fn parse_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(f) if f.is_finite() => Some(f.trunc() as i64),
            Value::String(s) => parse_leading_integer(s),
            _ => None,
        }
    }

    /// Coerce the value to a number.
    ///
    /// Strings must hold a complete decimal number once surrounding whitespace is removed.
    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            Value::Integer(i) => *i as f64,
            Value::Float(f) => *f,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };

        number.is_finite().then_some(number)
    }
}

fn parse_leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let magnitude: i64 = rest[..digits_end].parse().ok()?;

    Some(if negative { -magnitude } else { magnitude })
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) if x.fract() == 0.0 && x.abs() < 1e15 => write!(f, "{}", *x as i64),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = Id::new();
        assert!(!id.as_str().is_empty());
        assert_ne!(Id::new(), id);

        let id: Id = "hallway".into();
        assert_eq!(id.as_str(), "hallway");
        assert_eq!(format!("{}", id), "hallway");
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(Value::from(255).parse_integer(), Some(255));
        assert_eq!(Value::from("255").parse_integer(), Some(255));
        assert_eq!(Value::from(" 1 ").parse_integer(), Some(1));
        assert_eq!(Value::from("2.7").parse_integer(), Some(2));
        assert_eq!(Value::from("-3abc").parse_integer(), Some(-3));
        assert_eq!(Value::from(1.9).parse_integer(), Some(1));

        assert_eq!(Value::from("abc").parse_integer(), None);
        assert_eq!(Value::from("").parse_integer(), None);
        assert_eq!(Value::from("-").parse_integer(), None);
        assert_eq!(Value::from(true).parse_integer(), None);
        assert_eq!(Value::Null.parse_integer(), None);
        assert_eq!(Value::Float(f64::NAN).parse_integer(), None);
    }

    #[test]
    fn test_as_number() {
        assert_eq!(Value::from(70).as_number(), Some(70.0));
        assert_eq!(Value::from(21.5).as_number(), Some(21.5));
        assert_eq!(Value::from(" 72.5 ").as_number(), Some(72.5));

        assert_eq!(Value::from("72F").as_number(), None);
        assert_eq!(Value::from("").as_number(), None);
        assert_eq!(Value::from("NaN").as_number(), None);
        assert_eq!(Value::from(false).as_number(), None);
    }

    #[test]
    fn test_display_as_payload() {
        assert_eq!(Value::from(68).to_string(), "68");
        assert_eq!(Value::Float(100.0).to_string(), "100");
        assert_eq!(Value::Float(21.5).to_string(), "21.5");
        assert_eq!(Value::from("S").to_string(), "S");
        assert_eq!(Value::Null.to_string(), "");
    }

    #[test]
    fn test_untagged_serde() {
        let v: Value = serde_json::from_str("42").unwrap();
        assert_eq!(v, Value::Integer(42));

        let v: Value = serde_json::from_str("\"HEAT\"").unwrap();
        assert_eq!(v.as_str(), Some("HEAT"));

        assert_eq!(serde_json::to_string(&Value::Float(1.5)).unwrap(), "1.5");
    }
}
