//! Scalar expression statistics.
//!
//! Estimates the distribution of a derived column. Only column references
//! and literals have rules; any other shape is unknown.

use super::constant::{ConstantResolver, DomainConverter};
use crate::query::plan::LogicalExpression;
use std::sync::Arc;
use strata_core::statistics::{ColumnStats, RelationStats};

/// Derives [`ColumnStats`] for scalar expressions.
#[derive(Clone)]
pub struct ScalarStatsCalculator {
    resolver: Arc<dyn ConstantResolver>,
}

impl ScalarStatsCalculator {
    /// Creates a calculator using [`DomainConverter`] for literals.
    #[must_use]
    pub fn new() -> Self {
        Self::with_resolver(Arc::new(DomainConverter))
    }

    /// Creates a calculator with a custom literal resolver.
    #[must_use]
    pub fn with_resolver(resolver: Arc<dyn ConstantResolver>) -> Self {
        Self { resolver }
    }

    /// Estimates the values `expr` takes over the rows of `input`.
    ///
    /// Never fails: shapes without a rule yield [`ColumnStats::unknown`].
    #[must_use]
    pub fn calculate(&self, expr: &LogicalExpression, input: &RelationStats) -> ColumnStats {
        match expr {
            LogicalExpression::Column(id) => input
                .column(id)
                .copied()
                .unwrap_or_else(ColumnStats::unknown),
            LogicalExpression::Literal(value) if value.is_null() => {
                ColumnStats::zero().with_average_row_size(f64::NAN)
            }
            LogicalExpression::Literal(value) => self
                .resolver
                .resolve(value, value.logical_type())
                .map_or_else(ColumnStats::unknown, ColumnStats::single_value),
            _ => ColumnStats::unknown(),
        }
    }
}

impl Default for ScalarStatsCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ScalarStatsCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScalarStatsCalculator").finish_non_exhaustive()
    }
}
