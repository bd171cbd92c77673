//! Statistics for cost-based query optimization.
//!
//! This module provides:
//! - Columns: distinct values, min/max, null fraction, average row size
//! - Relations: output row count plus per-column statistics
//! - Algebra: union and difference of two estimates over the same base
//!   relation
//!
//! Every field is an `f64` and NaN means "unknown". Unknown values
//! propagate through the algebra instead of failing it.

mod column;
mod math;
mod relation;

pub use column::ColumnStats;
pub use math::{
    add_stats, estimated_domain_cardinality, subtract_non_range_stats, subtract_stats,
};
pub use relation::RelationStats;

/// Smallest distinct-value count a non-empty scaled column is reduced to.
pub const MIN_DISTINCT_VALUES: f64 = 1.0;

/// Scales a distinct-value count by a selectivity without letting a
/// non-empty result claim zero distinct values.
#[must_use]
pub fn scale_distinct_values(ndv: f64, selectivity: f64) -> f64 {
    if ndv.is_nan() || selectivity.is_nan() {
        return f64::NAN;
    }
    let scaled = ndv * selectivity;
    if ndv > 0.0 && selectivity > 0.0 {
        scaled.max(ndv.min(MIN_DISTINCT_VALUES))
    } else {
        scaled.max(0.0)
    }
}

/// Treats two estimates as equal when both are unknown.
pub(crate) fn same_estimate(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}
