//! Declared column types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared SQL type of a column, as known to the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalType {
    /// Boolean.
    Boolean,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point.
    Float64,
    /// Variable-length string.
    Varchar,
    /// Calendar date, stored as days since the Unix epoch.
    Date,
    /// Timestamp, stored as microseconds since the Unix epoch.
    Timestamp,
    /// The type could not be resolved.
    Unknown,
}

impl LogicalType {
    /// Returns true if values of this type map onto the shared numeric domain.
    #[must_use]
    pub const fn is_orderable_numeric(&self) -> bool {
        matches!(
            self,
            Self::Boolean | Self::Int32 | Self::Int64 | Self::Float64 | Self::Date | Self::Timestamp
        )
    }

    /// Returns true if the numeric domain of this type has unit spacing.
    ///
    /// Timestamps are treated as continuous: their resolution is far below
    /// the width of any range worth estimating.
    #[must_use]
    pub const fn is_discrete(&self) -> bool {
        matches!(self, Self::Boolean | Self::Int32 | Self::Int64 | Self::Date)
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Boolean => "BOOLEAN",
            Self::Int32 => "INTEGER",
            Self::Int64 => "BIGINT",
            Self::Float64 => "DOUBLE",
            Self::Varchar => "VARCHAR",
            Self::Date => "DATE",
            Self::Timestamp => "TIMESTAMP",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}
