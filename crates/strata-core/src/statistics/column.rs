//! Per-column distribution estimate.

use super::same_estimate;
use serde::{Deserialize, Serialize};

/// Estimated distribution of a single column.
///
/// All fields live on a shared `f64` domain; NaN means unknown. Values are
/// immutable: the `with_*` methods return an updated copy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ColumnStats {
    distinct_values_count: f64,
    nulls_fraction: f64,
    low_value: f64,
    high_value: f64,
    average_row_size: f64,
}

impl ColumnStats {
    /// Returns the estimate with every field unknown.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            distinct_values_count: f64::NAN,
            nulls_fraction: f64::NAN,
            low_value: f64::NAN,
            high_value: f64::NAN,
            average_row_size: f64::NAN,
        }
    }

    /// Returns the distribution of a column in an empty relation.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            distinct_values_count: 0.0,
            nulls_fraction: 1.0,
            low_value: f64::NAN,
            high_value: f64::NAN,
            average_row_size: 0.0,
        }
    }

    /// Returns the distribution of a column holding one known value.
    #[must_use]
    pub const fn single_value(value: f64) -> Self {
        Self {
            distinct_values_count: 1.0,
            nulls_fraction: 0.0,
            low_value: value,
            high_value: value,
            average_row_size: f64::NAN,
        }
    }

    /// Estimated number of distinct non-null values.
    #[must_use]
    pub const fn distinct_values_count(&self) -> f64 {
        self.distinct_values_count
    }

    /// Estimated fraction of rows holding NULL.
    #[must_use]
    pub const fn nulls_fraction(&self) -> f64 {
        self.nulls_fraction
    }

    /// Estimated lower bound of non-null values.
    #[must_use]
    pub const fn low_value(&self) -> f64 {
        self.low_value
    }

    /// Estimated upper bound of non-null values.
    #[must_use]
    pub const fn high_value(&self) -> f64 {
        self.high_value
    }

    /// Estimated average size of a value, in bytes.
    #[must_use]
    pub const fn average_row_size(&self) -> f64 {
        self.average_row_size
    }

    /// Fraction of rows holding a non-null value (NaN when unknown).
    #[must_use]
    pub fn values_fraction(&self) -> f64 {
        1.0 - self.nulls_fraction
    }

    /// Returns true if both bounds are known.
    #[must_use]
    pub fn has_range(&self) -> bool {
        !self.low_value.is_nan() && !self.high_value.is_nan()
    }

    /// Returns true if every field is unknown.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        same_column(self, &Self::unknown())
    }

    /// Sets the distinct value count.
    #[must_use]
    pub const fn with_distinct_values_count(mut self, ndv: f64) -> Self {
        self.distinct_values_count = ndv;
        self
    }

    /// Sets the nulls fraction.
    #[must_use]
    pub const fn with_nulls_fraction(mut self, fraction: f64) -> Self {
        self.nulls_fraction = fraction;
        self
    }

    /// Sets both bounds.
    #[must_use]
    pub const fn with_range(mut self, low: f64, high: f64) -> Self {
        self.low_value = low;
        self.high_value = high;
        self
    }

    /// Sets the lower bound.
    #[must_use]
    pub const fn with_low_value(mut self, low: f64) -> Self {
        self.low_value = low;
        self
    }

    /// Sets the upper bound.
    #[must_use]
    pub const fn with_high_value(mut self, high: f64) -> Self {
        self.high_value = high;
        self
    }

    /// Sets the average row size.
    #[must_use]
    pub const fn with_average_row_size(mut self, size: f64) -> Self {
        self.average_row_size = size;
        self
    }
}

fn same_column(a: &ColumnStats, b: &ColumnStats) -> bool {
    same_estimate(a.distinct_values_count, b.distinct_values_count)
        && same_estimate(a.nulls_fraction, b.nulls_fraction)
        && same_estimate(a.low_value, b.low_value)
        && same_estimate(a.high_value, b.high_value)
        && same_estimate(a.average_row_size, b.average_row_size)
}

impl PartialEq for ColumnStats {
    fn eq(&self, other: &Self) -> bool {
        same_column(self, other)
    }
}

impl Default for ColumnStats {
    fn default() -> Self {
        Self::unknown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_equals_unknown() {
        assert_eq!(ColumnStats::unknown(), ColumnStats::unknown());
        assert!(ColumnStats::unknown().is_unknown());
        assert!(!ColumnStats::zero().is_unknown());
    }

    #[test]
    fn test_with_methods_copy() {
        let base = ColumnStats::unknown()
            .with_distinct_values_count(100.0)
            .with_nulls_fraction(0.1)
            .with_range(0.0, 999.0);
        let narrowed = base.with_high_value(499.0);

        assert_eq!(base.high_value(), 999.0);
        assert_eq!(narrowed.high_value(), 499.0);
        assert_eq!(narrowed.low_value(), 0.0);
        assert!(narrowed.has_range());
        assert!((narrowed.values_fraction() - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_single_value() {
        let stats = ColumnStats::single_value(42.0);
        assert_eq!(stats.distinct_values_count(), 1.0);
        assert_eq!(stats.low_value(), 42.0);
        assert_eq!(stats.high_value(), 42.0);
        assert_eq!(stats.nulls_fraction(), 0.0);
    }

    #[test]
    fn test_zero_has_no_range() {
        let zero = ColumnStats::zero();
        assert_eq!(zero.distinct_values_count(), 0.0);
        assert!(!zero.has_range());
    }

    #[test]
    fn test_serde_known_values() {
        let stats = ColumnStats::single_value(7.0).with_average_row_size(8.0);
        let json = serde_json::to_string(&stats).unwrap();
        let back: ColumnStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }
}
