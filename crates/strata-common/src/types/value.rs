//! Literal values.

use super::LogicalType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A literal value as it appears in a predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit floating point.
    Float64(f64),
    /// String value.
    String(Arc<str>),
    /// Days since the Unix epoch.
    Date(i32),
    /// Microseconds since the Unix epoch.
    Timestamp(i64),
}

impl Value {
    /// Returns the natural type of this literal.
    #[must_use]
    pub const fn logical_type(&self) -> LogicalType {
        match self {
            Self::Null => LogicalType::Unknown,
            Self::Bool(_) => LogicalType::Boolean,
            Self::Int64(_) => LogicalType::Int64,
            Self::Float64(_) => LogicalType::Float64,
            Self::String(_) => LogicalType::Varchar,
            Self::Date(_) => LogicalType::Date,
            Self::Timestamp(_) => LogicalType::Timestamp,
        }
    }

    /// Returns true if this is the NULL literal.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean payload, if this is a boolean literal.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "'{s}'"),
            Self::Date(d) => write!(f, "DATE {d}"),
            Self::Timestamp(t) => write!(f, "TIMESTAMP {t}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(Arc::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_logical_type() {
        assert_eq!(Value::from(3_i64).logical_type(), LogicalType::Int64);
        assert_eq!(Value::from(1.5).logical_type(), LogicalType::Float64);
        assert_eq!(Value::from("a").logical_type(), LogicalType::Varchar);
        assert_eq!(Value::Null.logical_type(), LogicalType::Unknown);
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::from(true).to_string(), "TRUE");
        assert_eq!(Value::from("abc").to_string(), "'abc'");
        assert_eq!(Value::Null.to_string(), "NULL");
    }

    #[test]
    fn test_as_bool() {
        assert_eq!(Value::Bool(false).as_bool(), Some(false));
        assert_eq!(Value::Int64(0).as_bool(), None);
    }
}
