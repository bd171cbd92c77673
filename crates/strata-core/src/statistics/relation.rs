//! Relation-level estimate.

use super::{ColumnStats, same_estimate};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strata_common::types::ColumnId;

/// Estimated output of a plan node: row count plus per-column statistics.
///
/// Every column visible at this point of the plan has an entry. Unknown
/// facts are NaN fields inside a present [`ColumnStats`], never a missing
/// entry. The only estimate without entries is [`RelationStats::unknown`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationStats {
    output_row_count: f64,
    column_stats: IndexMap<ColumnId, ColumnStats>,
}

impl RelationStats {
    /// Creates an estimate with the given row count and no columns.
    #[must_use]
    pub fn new(output_row_count: f64) -> Self {
        Self {
            output_row_count,
            column_stats: IndexMap::new(),
        }
    }

    /// The universal fallback: unknown row count, no column entries.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(f64::NAN)
    }

    /// Returns true if this is the unknown sentinel.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.output_row_count.is_nan() && self.column_stats.is_empty()
    }

    /// Estimated number of output rows.
    #[must_use]
    pub fn output_row_count(&self) -> f64 {
        self.output_row_count
    }

    /// Statistics for one column, if the relation carries it.
    #[must_use]
    pub fn column(&self, id: &ColumnId) -> Option<&ColumnStats> {
        self.column_stats.get(id)
    }

    /// Iterates over the columns in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = (&ColumnId, &ColumnStats)> {
        self.column_stats.iter()
    }

    /// Iterates over the column identifiers in insertion order.
    pub fn column_ids(&self) -> impl Iterator<Item = &ColumnId> {
        self.column_stats.keys()
    }

    /// Number of column entries.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_stats.len()
    }

    /// Adds or replaces the statistics of a column.
    #[must_use]
    pub fn with_column(mut self, id: impl Into<ColumnId>, stats: ColumnStats) -> Self {
        self.column_stats.insert(id.into(), stats);
        self
    }

    /// Replaces the row count, keeping every column.
    #[must_use]
    pub fn with_output_row_count(mut self, output_row_count: f64) -> Self {
        self.output_row_count = output_row_count;
        self
    }

    /// Applies `f` to the row count, keeping every column.
    #[must_use]
    pub fn map_output_row_count(&self, f: impl FnOnce(f64) -> f64) -> Self {
        self.clone().with_output_row_count(f(self.output_row_count))
    }

    /// Applies `f` to one column, if present.
    #[must_use]
    pub fn map_column(&self, id: &ColumnId, f: impl FnOnce(ColumnStats) -> ColumnStats) -> Self {
        let mut result = self.clone();
        if let Some(stats) = result.column_stats.get_mut(id) {
            *stats = f(*stats);
        }
        result
    }

    /// Returns an estimate with zero rows over the same columns, each
    /// reduced to the empty distribution.
    #[must_use]
    pub fn cleared(&self) -> Self {
        Self {
            output_row_count: 0.0,
            column_stats: self
                .column_stats
                .keys()
                .map(|id| (id.clone(), ColumnStats::zero()))
                .collect(),
        }
    }
}

impl PartialEq for RelationStats {
    fn eq(&self, other: &Self) -> bool {
        same_estimate(self.output_row_count, other.output_row_count)
            && self.column_stats == other.column_stats
    }
}

impl Default for RelationStats {
    fn default() -> Self {
        Self::unknown()
    }
}
