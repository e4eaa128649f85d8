//! Typed cell values.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

static INTEGER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").unwrap());

// Needs a fraction or an exponent; plain digit runs are integers.
static FLOAT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:(?:[0-9]+\.[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+)$")
        .unwrap()
});

/// A scalar value stored in a flat row or table cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Missing value
    #[default]
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integer that fits in 64 bits
    Int(i64),
    /// Finite floating-point number
    Float(f64),
    /// Anything else
    String(String),
}

impl Scalar {
    /// Coerce raw XML text into the most specific scalar type.
    ///
    /// Attempts run in a fixed order on the trimmed text: empty, boolean
    /// (case-insensitive), integer, float, then string. Integers that overflow
    /// `i64` and floats that overflow to infinity stay strings.
    ///
    /// ```
    /// use xml2table::Scalar;
    ///
    /// assert_eq!(Scalar::coerce("TRUE"), Scalar::Bool(true));
    /// assert_eq!(Scalar::coerce(" 42 "), Scalar::Int(42));
    /// assert_eq!(Scalar::coerce("29.99"), Scalar::Float(29.99));
    /// assert_eq!(Scalar::coerce("abc"), Scalar::String("abc".to_string()));
    /// ```
    pub fn coerce(raw: &str) -> Self {
        let text = raw.trim();

        if text.is_empty() {
            return Scalar::Null;
        }
        if text.eq_ignore_ascii_case("true") {
            return Scalar::Bool(true);
        }
        if text.eq_ignore_ascii_case("false") {
            return Scalar::Bool(false);
        }
        if INTEGER_REGEX.is_match(text) {
            if let Ok(n) = text.parse::<i64>() {
                return Scalar::Int(n);
            }
        } else if FLOAT_REGEX.is_match(text) {
            if let Ok(f) = text.parse::<f64>() {
                if f.is_finite() {
                    return Scalar::Float(f);
                }
            }
        }

        Scalar::String(text.to_string())
    }

    /// Check if this is the null marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Get the value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer, if it is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the value as a float; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Float(f) => Some(*f),
            Scalar::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Get the value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Short type name, used by the CLI `info` command.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "bool",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::String(_) => "string",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}
