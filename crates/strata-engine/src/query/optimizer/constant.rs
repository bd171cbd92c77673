//! Literal-to-domain conversion.
//!
//! Range estimation works on a single `f64` domain. A [`ConstantResolver`]
//! maps a predicate literal onto that domain given the declared type of the
//! column it is compared with; `None` means "not convertible" and degrades
//! the comparison to its unknown-bound branch.

use hashbrown::HashMap;
use strata_common::types::{ColumnId, LogicalType, Value};

/// Converts literals onto the shared numeric domain.
///
/// Implementations must be deterministic for a fixed literal and type
/// within one planning pass.
pub trait ConstantResolver: Send + Sync {
    /// Returns the domain value of `literal` for a column of type `declared`.
    fn resolve(&self, literal: &Value, declared: LogicalType) -> Option<f64>;
}

/// Default resolver for the orderable numeric types.
///
/// Booleans map to 0/1, dates to days since the epoch and timestamps to
/// microseconds since the epoch. Strings, NULL and unknown declared types
/// are not convertible.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainConverter;

impl ConstantResolver for DomainConverter {
    fn resolve(&self, literal: &Value, declared: LogicalType) -> Option<f64> {
        if !declared.is_orderable_numeric() {
            return None;
        }
        match (literal, declared) {
            (Value::Bool(b), LogicalType::Boolean) => Some(if *b { 1.0 } else { 0.0 }),
            (Value::Int64(v), LogicalType::Int32 | LogicalType::Int64 | LogicalType::Float64) => {
                Some(*v as f64)
            }
            (Value::Float64(v), LogicalType::Int32 | LogicalType::Int64 | LogicalType::Float64) => {
                v.is_finite().then_some(*v)
            }
            (Value::Date(d), LogicalType::Date) => Some(f64::from(*d)),
            (Value::Date(d), LogicalType::Timestamp) => {
                Some(f64::from(*d) * MICROS_PER_DAY)
            }
            (Value::Timestamp(t), LogicalType::Timestamp) => Some(*t as f64),
            _ => None,
        }
    }
}

const MICROS_PER_DAY: f64 = 86_400_000_000.0;

/// Declared types of the columns visible to a predicate.
///
/// Columns without an entry read as [`LogicalType::Unknown`].
#[derive(Debug, Clone, Default)]
pub struct TypeProvider {
    types: HashMap<ColumnId, LogicalType>,
}

impl TypeProvider {
    /// Creates an empty type context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the type of a column.
    pub fn with_type(mut self, id: impl Into<ColumnId>, ty: LogicalType) -> Self {
        self.types.insert(id.into(), ty);
        self
    }

    /// Returns the declared type of a column.
    #[must_use]
    pub fn get(&self, id: &ColumnId) -> LogicalType {
        self.types.get(id).copied().unwrap_or(LogicalType::Unknown)
    }
}

impl FromIterator<(ColumnId, LogicalType)> for TypeProvider {
    fn from_iter<I: IntoIterator<Item = (ColumnId, LogicalType)>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().collect(),
        }
    }
}
