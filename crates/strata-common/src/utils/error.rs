//! Error types for Strata.

use crate::types::ColumnId;
use thiserror::Error;

/// Result type alias using the Strata error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the estimator.
///
/// Unknown inputs are never errors: they travel as NaN fields through the
/// statistics algebra. Only caller-side precondition failures land here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A predicate references a column the input statistics do not carry.
    #[error("no statistics for column {0}")]
    MissingColumnStats(ColumnId),

    /// A logical connective outside AND/OR reached the connective dispatch.
    #[error("unimplemented logical binary operator {0}")]
    UnsupportedConnective(String),

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
