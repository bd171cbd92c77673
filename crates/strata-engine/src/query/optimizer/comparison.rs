//! Comparison selectivity.
//!
//! Estimates the output of `column <op> constant` and `column <op> column`
//! filters assuming values are spread uniformly over `[low, high]`. `<>` is
//! always derived as the complement of `=` so the two add up to the input.

use crate::config::EstimatorConfig;
use crate::query::plan::BinaryOp;
use strata_common::types::{ColumnId, LogicalType};
use strata_common::utils::error::{Error, Result};
use strata_core::statistics::{
    ColumnStats, RelationStats, estimated_domain_cardinality, scale_distinct_values,
    subtract_stats,
};

/// Spacing of the values a column can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericDomain {
    /// Consecutive values differ by one: `[low, high]` holds
    /// `high - low + 1` values.
    Discrete,
    /// Values are dense: `[low, high]` has width `high - low`.
    Continuous,
}

impl NumericDomain {
    /// Returns the domain of a declared column type.
    #[must_use]
    pub const fn for_type(ty: LogicalType) -> Self {
        if ty.is_discrete() {
            Self::Discrete
        } else {
            Self::Continuous
        }
    }

    /// Rewrites a range comparison against `value` into a bound and a side.
    ///
    /// On a discrete domain strict comparisons become inclusive ones:
    /// `x < 5` is `x <= 4`.
    fn normalize(self, op: BinaryOp, value: f64) -> (Side, f64) {
        match self {
            Self::Continuous => match op {
                BinaryOp::Lt => (Side::Below { inclusive: false }, value),
                BinaryOp::Le => (Side::Below { inclusive: true }, value),
                BinaryOp::Gt => (Side::Above { inclusive: false }, value),
                _ => (Side::Above { inclusive: true }, value),
            },
            Self::Discrete => match op {
                BinaryOp::Lt => (Side::Below { inclusive: true }, value.ceil() - 1.0),
                BinaryOp::Le => (Side::Below { inclusive: true }, value.floor()),
                BinaryOp::Gt => (Side::Above { inclusive: true }, value.floor() + 1.0),
                _ => (Side::Above { inclusive: true }, value.ceil()),
            },
        }
    }

    /// Fraction of `[low, high]` on the satisfying side of `bound`.
    fn fraction(self, side: Side, bound: f64, low: f64, high: f64) -> f64 {
        let fraction = match self {
            Self::Discrete => {
                let width = high - low + 1.0;
                if width <= 0.0 {
                    return 0.0;
                }
                match side {
                    Side::Below { .. } => (bound - low + 1.0) / width,
                    Side::Above { .. } => (high - bound + 1.0) / width,
                }
            }
            Self::Continuous => {
                let width = high - low;
                if width <= 0.0 {
                    // Single-valued column: all or nothing.
                    let holds = match side {
                        Side::Below { inclusive: true } => low <= bound,
                        Side::Below { inclusive: false } => low < bound,
                        Side::Above { inclusive: true } => low >= bound,
                        Side::Above { inclusive: false } => low > bound,
                    };
                    return if holds { 1.0 } else { 0.0 };
                }
                match side {
                    Side::Below { .. } => (bound - low) / width,
                    Side::Above { .. } => (high - bound) / width,
                }
            }
        };
        fraction.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Below { inclusive: bool },
    Above { inclusive: bool },
}

impl Side {
    const fn is_inclusive(self) -> bool {
        match self {
            Self::Below { inclusive } | Self::Above { inclusive } => inclusive,
        }
    }
}

/// Estimates comparison filters over one input estimate.
pub struct ComparisonStatsCalculator<'a> {
    input: &'a RelationStats,
    config: &'a EstimatorConfig,
}

impl<'a> ComparisonStatsCalculator<'a> {
    /// Creates a calculator over `input`.
    #[must_use]
    pub fn new(input: &'a RelationStats, config: &'a EstimatorConfig) -> Self {
        Self { input, config }
    }

    /// Estimates `column <op> value`.
    ///
    /// A NaN `value` (literal not convertible) degrades to the unknown-bound
    /// branch of each formula.
    pub fn column_to_constant(
        &self,
        column: &ColumnId,
        value: f64,
        op: BinaryOp,
        domain: NumericDomain,
    ) -> Result<RelationStats> {
        let stats = self.column_stats(column)?;
        Ok(match op {
            BinaryOp::Eq => self.equal_to_constant(column, &stats, value, domain),
            BinaryOp::Ne => subtract_stats(
                self.input,
                &self.equal_to_constant(column, &stats, value, domain),
            ),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                self.range_to_constant(column, &stats, value, op, domain)
            }
            _ => self.unknown_filter(),
        })
    }

    /// Estimates `left <op> right` for two columns.
    ///
    /// `a > b` is evaluated as `b < a`, so a comparison and its reflection
    /// produce identical estimates.
    pub fn column_to_column(
        &self,
        left: &ColumnId,
        right: &ColumnId,
        op: BinaryOp,
    ) -> Result<RelationStats> {
        let a = self.column_stats(left)?;
        let b = self.column_stats(right)?;
        Ok(match op {
            BinaryOp::Eq => self.columns_equal(left, &a, right, &b),
            BinaryOp::Ne => {
                subtract_stats(self.input, &self.columns_equal(left, &a, right, &b))
            }
            BinaryOp::Lt => self.column_less_than(left, &a, right, &b, false),
            BinaryOp::Le => self.column_less_than(left, &a, right, &b, true),
            BinaryOp::Gt => self.column_less_than(right, &b, left, &a, false),
            BinaryOp::Ge => self.column_less_than(right, &b, left, &a, true),
            _ => self.unknown_filter(),
        })
    }

    /// Estimates `column IS NULL`, or `column IS NOT NULL` when `negated`.
    ///
    /// An unknown null fraction falls back to the unknown-predicate
    /// coefficient.
    pub fn is_null(&self, column: &ColumnId, negated: bool) -> Result<RelationStats> {
        let stats = self.column_stats(column)?;
        let nulls = stats.nulls_fraction();
        if nulls.is_nan() {
            tracing::trace!(%column, "nulls fraction unknown, using default selectivity");
            return Ok(self.unknown_filter());
        }
        let nulls = nulls.clamp(0.0, 1.0);

        let (selectivity, filtered) = if negated {
            (1.0 - nulls, stats.with_nulls_fraction(0.0))
        } else {
            (
                nulls,
                ColumnStats::zero().with_average_row_size(stats.average_row_size()),
            )
        };
        if selectivity == 0.0 {
            return Ok(self.input.cleared());
        }
        Ok(self.filtered(selectivity).with_column(column.clone(), filtered))
    }

    fn column_stats(&self, id: &ColumnId) -> Result<ColumnStats> {
        match self.input.column(id) {
            Some(stats) => Ok(*stats),
            // An input of unknown size carries no per-column obligations.
            None if self.input.output_row_count().is_nan() => Ok(ColumnStats::unknown()),
            None => Err(Error::MissingColumnStats(id.clone())),
        }
    }

    fn unknown_filter(&self) -> RelationStats {
        let coefficient = self.config.unknown_filter_coefficient;
        self.input.map_output_row_count(|rows| rows * coefficient)
    }

    fn equal_to_constant(
        &self,
        id: &ColumnId,
        stats: &ColumnStats,
        value: f64,
        domain: NumericDomain,
    ) -> RelationStats {
        if stats.has_range() && (value < stats.low_value() || value > stats.high_value()) {
            return self.input.cleared();
        }
        // A discrete column holds no value between two integers.
        if domain == NumericDomain::Discrete && value.fract() != 0.0 {
            return self.input.cleared();
        }

        let ndv = stats.distinct_values_count();
        let selectivity = if ndv.is_nan() {
            tracing::trace!(column = %id, "distinct values unknown, using default selectivity");
            self.config.unknown_filter_coefficient
        } else {
            non_null_fraction(stats) / ndv.max(1.0)
        };
        if selectivity == 0.0 {
            return self.input.cleared();
        }

        let filtered = if value.is_nan() {
            stats.with_distinct_values_count(1.0).with_nulls_fraction(0.0)
        } else {
            ColumnStats::single_value(value).with_average_row_size(stats.average_row_size())
        };
        self.filtered(selectivity).with_column(id.clone(), filtered)
    }

    fn range_to_constant(
        &self,
        id: &ColumnId,
        stats: &ColumnStats,
        value: f64,
        op: BinaryOp,
        domain: NumericDomain,
    ) -> RelationStats {
        let (side, bound) = domain.normalize(op, value);
        let (low, high) = (stats.low_value(), stats.high_value());

        let fraction = if stats.has_range() && !bound.is_nan() {
            let fraction = domain.fraction(side, bound, low, high);
            // An inclusive bound inside a continuous range matches at least
            // the rows holding that value.
            if domain == NumericDomain::Continuous
                && side.is_inclusive()
                && (low..=high).contains(&bound)
            {
                fraction.max(value_share(stats))
            } else {
                fraction
            }
        } else {
            tracing::trace!(column = %id, "range bounds unknown, using default selectivity");
            self.config.default_range_selectivity
        };
        if fraction == 0.0 {
            return self.input.cleared();
        }

        // f64::min/max keep the known side when either operand is NaN.
        let (new_low, new_high) = match side {
            Side::Below { .. } => (low, high.min(bound)),
            Side::Above { .. } => (low.max(bound), high),
        };
        let ndv = cap_by_domain(
            scale_distinct_values(stats.distinct_values_count(), fraction),
            new_low,
            new_high,
            domain,
        );
        let filtered = stats
            .with_range(new_low, new_high)
            .with_distinct_values_count(ndv)
            .with_nulls_fraction(0.0);

        self.filtered(non_null_fraction(stats) * fraction)
            .with_column(id.clone(), filtered)
    }

    fn columns_equal(
        &self,
        left: &ColumnId,
        a: &ColumnStats,
        right: &ColumnId,
        b: &ColumnStats,
    ) -> RelationStats {
        let low = a.low_value().max(b.low_value());
        let high = a.high_value().min(b.high_value());
        if a.has_range() && b.has_range() && low > high {
            return self.input.cleared();
        }

        let (a_ndv, b_ndv) = (a.distinct_values_count(), b.distinct_values_count());
        if a_ndv.is_nan() || b_ndv.is_nan() {
            tracing::trace!(%left, %right, "distinct values unknown, using default selectivity");
            return self.unknown_filter();
        }

        let a_fraction = overlap_fraction(a, low, high);
        let b_fraction = overlap_fraction(b, low, high);
        let a_overlap_ndv = scale_distinct_values(a_ndv, a_fraction);
        let b_overlap_ndv = scale_distinct_values(b_ndv, b_fraction);

        // Each side's share of rows inside the overlap, then one collision
        // per distinct value of the larger side.
        let a_share = non_null_fraction(a) * a_fraction;
        let b_share = non_null_fraction(b) * b_fraction;
        let selectivity = (a_share * b_share) / a_overlap_ndv.max(b_overlap_ndv).max(1.0);
        if selectivity == 0.0 {
            return self.input.cleared();
        }

        let ndv = a_overlap_ndv.min(b_overlap_ndv);
        self.filtered(selectivity)
            .with_column(left.clone(), matched(a, ndv, low, high))
            .with_column(right.clone(), matched(b, ndv, low, high))
    }

    /// Estimates `smaller < larger` (or `<=`).
    fn column_less_than(
        &self,
        smaller: &ColumnId,
        a: &ColumnStats,
        larger: &ColumnId,
        b: &ColumnStats,
        inclusive: bool,
    ) -> RelationStats {
        if !a.has_range() || !b.has_range() {
            tracing::trace!(%smaller, %larger, "range bounds unknown, using default selectivity");
            let selectivity = self.config.default_range_selectivity;
            return self.input.map_output_row_count(|rows| rows * selectivity);
        }

        let probability = less_than_probability(a, b, inclusive);
        let selectivity = non_null_fraction(a) * non_null_fraction(b) * probability;
        if selectivity == 0.0 {
            return self.input.cleared();
        }

        let a_high = a.high_value().min(b.high_value());
        let b_low = b.low_value().max(a.low_value());
        let a_ndv = scale_distinct_values(
            a.distinct_values_count(),
            overlap_fraction(a, a.low_value(), a_high),
        );
        let b_ndv = scale_distinct_values(
            b.distinct_values_count(),
            overlap_fraction(b, b_low, b.high_value()),
        );

        self.filtered(selectivity)
            .with_column(
                smaller.clone(),
                a.with_high_value(a_high)
                    .with_distinct_values_count(a_ndv)
                    .with_nulls_fraction(0.0),
            )
            .with_column(
                larger.clone(),
                b.with_low_value(b_low)
                    .with_distinct_values_count(b_ndv)
                    .with_nulls_fraction(0.0),
            )
    }

    fn filtered(&self, selectivity: f64) -> RelationStats {
        self.input.map_output_row_count(|rows| rows * selectivity)
    }
}

/// Non-null share of rows; unknown null counts are taken as no nulls.
fn non_null_fraction(stats: &ColumnStats) -> f64 {
    let fraction = stats.values_fraction();
    if fraction.is_nan() {
        1.0
    } else {
        fraction.clamp(0.0, 1.0)
    }
}

/// Share of a column's non-null rows holding any single one of its values;
/// zero when the distinct count is unknown.
fn value_share(stats: &ColumnStats) -> f64 {
    let ndv = stats.distinct_values_count();
    if ndv.is_nan() { 0.0 } else { 1.0 / ndv.max(1.0) }
}

fn cap_by_domain(ndv: f64, low: f64, high: f64, domain: NumericDomain) -> f64 {
    let limit = estimated_domain_cardinality(low, high, domain == NumericDomain::Discrete);
    if limit.is_nan() || ndv.is_nan() {
        ndv
    } else {
        ndv.min(limit)
    }
}

/// Share of a column's values lying in `[low, high]`.
///
/// A point inside a wider range holds one of the column's distinct values.
fn overlap_fraction(stats: &ColumnStats, low: f64, high: f64) -> f64 {
    if !stats.has_range() || low.is_nan() || high.is_nan() {
        return 1.0;
    }
    let width = stats.high_value() - stats.low_value();
    if width <= 0.0 {
        return 1.0;
    }
    if low == high {
        let ndv = stats.distinct_values_count();
        return if ndv.is_nan() { 1.0 } else { 1.0 / ndv.max(1.0) };
    }
    ((high - low) / width).clamp(0.0, 1.0)
}

fn matched(stats: &ColumnStats, ndv: f64, low: f64, high: f64) -> ColumnStats {
    stats
        .with_distinct_values_count(ndv)
        .with_range(low, high)
        .with_nulls_fraction(0.0)
}

/// `P(A < B)` for independent values spread uniformly over each column's
/// range.
fn less_than_probability(a: &ColumnStats, b: &ColumnStats, inclusive: bool) -> f64 {
    let (a_low, a_high) = (a.low_value(), a.high_value());
    let (b_low, b_high) = (b.low_value(), b.high_value());
    let a_width = a_high - a_low;
    let b_width = b_high - b_low;

    let probability = match (a_width > 0.0, b_width > 0.0) {
        (false, false) => {
            let holds = if inclusive { a_low <= b_low } else { a_low < b_low };
            if holds { 1.0 } else { 0.0 }
        }
        (false, true) => (b_high - a_low) / b_width,
        (true, false) => (b_low - a_low) / a_width,
        (true, true) => {
            // Average of A's CDF over B's range.
            let integral = |x: f64| {
                if x <= a_low {
                    0.0
                } else if x <= a_high {
                    (x - a_low) * (x - a_low) / (2.0 * a_width)
                } else {
                    a_width / 2.0 + (x - a_high)
                }
            };
            (integral(b_high) - integral(b_low)) / b_width
        }
    };
    probability.clamp(0.0, 1.0)
}
