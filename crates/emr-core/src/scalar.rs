//! Typed scalar values ("atoms") carried by record `typ`/`val` columns
//!
//! A column is parsed as an integer if it parses as one, else as a float
//! if it parses as one, else kept as the raw string; an empty column is
//! "absent" rather than an empty string.

use std::fmt;

/// A dynamically-typed record field value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
    Absent,
}

impl Scalar {
    /// Parse an "atom": integer, then float, then raw string. The empty
    /// string is `Absent` rather than an empty `Str`.
    pub fn atom(text: &str) -> Scalar {
        if text.is_empty() {
            return Scalar::Absent;
        }
        if let Ok(i) = text.parse::<i64>() {
            return Scalar::Int(i);
        }
        if let Ok(f) = text.parse::<f64>() {
            return Scalar::Float(f);
        }
        Scalar::Str(text.to_string())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Scalar::Absent)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Str(s) => write!(f, "{}", s),
            Scalar::Absent => Ok(()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::atom(s)
    }
}
