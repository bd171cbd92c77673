//! Union and difference of relation estimates.
//!
//! Both operands describe filters over the same base relation. The
//! functions are total: NaN inputs yield NaN outputs for the fields they
//! feed, and negative intermediate counts are clamped to zero.

use super::{ColumnStats, MIN_DISTINCT_VALUES, RelationStats};
use indexmap::IndexSet;
use strata_common::types::ColumnId;

/// Upper bound on the number of distinct values a `[low, high]` range holds.
///
/// A single point holds one value. Otherwise only a `discrete` domain, whose
/// values are one apart, bounds the count; a continuous range does not.
#[must_use]
pub fn estimated_domain_cardinality(low: f64, high: f64, discrete: bool) -> f64 {
    if low.is_nan() || high.is_nan() {
        return f64::NAN;
    }
    if low == high {
        1.0
    } else if discrete {
        (high.floor() - low.ceil() + 1.0).max(0.0)
    } else {
        f64::INFINITY
    }
}

/// Estimates rows satisfying either of two possibly overlapping filters.
///
/// The estimates carry no column types, so the merged distinct count is
/// only capped when the merged range is a single point.
#[must_use]
pub fn add_stats(left: &RelationStats, right: &RelationStats) -> RelationStats {
    let left_rows = left.output_row_count();
    let right_rows = right.output_row_count();
    let mut result = RelationStats::new(left_rows + right_rows);

    for id in union_column_ids(left, right) {
        let a = column_or_unknown(left, &id);
        let b = column_or_unknown(right, &id);
        result = result.with_column(id, add_column_stats(&a, left_rows, &b, right_rows));
    }
    result
}

fn add_column_stats(a: &ColumnStats, a_rows: f64, b: &ColumnStats, b_rows: f64) -> ColumnStats {
    // f64::min/max already defer to the known side when one bound is NaN.
    let low = a.low_value().min(b.low_value());
    let high = a.high_value().max(b.high_value());

    let summed = a.distinct_values_count() + b.distinct_values_count();
    let distinct = if summed.is_nan() {
        f64::NAN
    } else {
        let domain = estimated_domain_cardinality(low, high, false);
        if domain.is_nan() { summed } else { summed.min(domain) }
    };

    ColumnStats::unknown()
        .with_distinct_values_count(distinct)
        .with_nulls_fraction(weighted_average(
            a.nulls_fraction(),
            a_rows,
            b.nulls_fraction(),
            b_rows,
        ))
        .with_range(low, high)
        .with_average_row_size(weighted_average(
            a.average_row_size(),
            a_rows,
            b.average_row_size(),
            b_rows,
        ))
}

/// Estimates rows of `total` that do not satisfy the sub-filter `part`.
///
/// Bounds are kept from `total`; when no rows remain every column becomes
/// the empty distribution.
#[must_use]
pub fn subtract_stats(total: &RelationStats, part: &RelationStats) -> RelationStats {
    subtract(total, part, true)
}

/// Like [`subtract_stats`], but only the cardinality side of each column
/// shrinks: bounds and average row size stay exactly as in `total`.
///
/// Removes the double-counted conjunction from an OR estimate, whose
/// extremes still come from whichever disjunct produced them.
#[must_use]
pub fn subtract_non_range_stats(total: &RelationStats, part: &RelationStats) -> RelationStats {
    subtract(total, part, false)
}

fn subtract(total: &RelationStats, part: &RelationStats, subtract_range: bool) -> RelationStats {
    let total_rows = total.output_row_count();
    let part_rows = part.output_row_count();
    let rows = non_negative(total_rows - part_rows);
    let mut result = RelationStats::new(rows);

    for (id, t) in total.columns() {
        let p = column_or_unknown(part, id);
        let stats = if subtract_range && rows == 0.0 {
            ColumnStats::zero()
        } else {
            let nulls = remaining_nulls_fraction(t, total_rows, &p, part_rows, rows);
            t.with_distinct_values_count(remaining_distinct_values(t, &p, rows))
                .with_nulls_fraction(nulls)
        };
        result = result.with_column(id.clone(), stats);
    }
    result
}

fn remaining_distinct_values(total: &ColumnStats, part: &ColumnStats, rows: f64) -> f64 {
    let t = total.distinct_values_count();
    let remaining = non_negative(t - part.distinct_values_count());
    // Remaining rows still hold at least one distinct value unless the
    // column was all NULL to begin with.
    if remaining == 0.0 && rows > 0.0 && t > 0.0 && total.nulls_fraction() < 1.0 {
        t.min(MIN_DISTINCT_VALUES)
    } else {
        remaining
    }
}

fn remaining_nulls_fraction(
    total: &ColumnStats,
    total_rows: f64,
    part: &ColumnStats,
    part_rows: f64,
    rows: f64,
) -> f64 {
    let total_nulls = total.nulls_fraction() * total_rows;
    // An empty part contributes no nulls whatever its fraction says.
    let part_nulls = if part_rows == 0.0 {
        0.0
    } else {
        part.nulls_fraction() * part_rows
    };
    let nulls = non_negative(total_nulls - part_nulls);
    if nulls.is_nan() || rows.is_nan() {
        f64::NAN
    } else if rows == 0.0 {
        total.nulls_fraction()
    } else {
        (nulls / rows).clamp(0.0, 1.0)
    }
}

fn weighted_average(a: f64, a_weight: f64, b: f64, b_weight: f64) -> f64 {
    if a_weight == 0.0 {
        return b;
    }
    if b_weight == 0.0 {
        return a;
    }
    (a * a_weight + b * b_weight) / (a_weight + b_weight)
}

/// Clamps to zero while keeping NaN unknown.
fn non_negative(value: f64) -> f64 {
    if value.is_nan() { value } else { value.max(0.0) }
}

fn column_or_unknown(stats: &RelationStats, id: &ColumnId) -> ColumnStats {
    stats.column(id).copied().unwrap_or_else(ColumnStats::unknown)
}

fn union_column_ids(left: &RelationStats, right: &RelationStats) -> IndexSet<ColumnId> {
    left.column_ids().chain(right.column_ids()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn column(ndv: f64, nulls: f64, low: f64, high: f64) -> ColumnStats {
        ColumnStats::unknown()
            .with_distinct_values_count(ndv)
            .with_nulls_fraction(nulls)
            .with_range(low, high)
            .with_average_row_size(8.0)
    }

    fn relation(rows: f64, x: ColumnStats) -> RelationStats {
        RelationStats::new(rows).with_column("x", x)
    }

    fn x(stats: &RelationStats) -> ColumnStats {
        *stats.column(&ColumnId::new("x")).unwrap()
    }

    #[test]
    fn test_domain_cardinality() {
        assert_eq!(estimated_domain_cardinality(0.0, 999.0, true), 1000.0);
        assert_eq!(estimated_domain_cardinality(0.5, 3.5, true), 3.0);
        assert_eq!(estimated_domain_cardinality(3.5, 3.5, false), 1.0);
        assert!(estimated_domain_cardinality(0.0, 10.0, false).is_infinite());
        assert!(estimated_domain_cardinality(f64::NAN, 1.0, true).is_nan());
    }

    #[test]
    fn test_add_stats_disjoint_ranges() {
        let a = relation(500.0, column(50.0, 0.0, 0.0, 499.0));
        let b = relation(199.0, column(19.9, 0.0, 801.0, 999.0));
        let sum = add_stats(&a, &b);

        assert!((sum.output_row_count() - 699.0).abs() < EPS);
        let merged = x(&sum);
        assert_eq!(merged.low_value(), 0.0);
        assert_eq!(merged.high_value(), 999.0);
        assert!((merged.distinct_values_count() - 69.9).abs() < EPS);
        assert!((merged.average_row_size() - 8.0).abs() < EPS);
    }

    #[test]
    fn test_add_stats_caps_distinct_for_single_point() {
        let a = relation(10.0, ColumnStats::single_value(4.0));
        let sum = add_stats(&a, &a);
        assert_eq!(x(&sum).distinct_values_count(), 1.0);
    }

    #[test]
    fn test_add_stats_leaves_whole_number_ranges_uncapped() {
        // Whole-number bounds say nothing about the column type: a float
        // column over [0, 10] may hold far more than 11 values.
        let a = relation(250.0, column(125.0, 0.0, 0.0, 2.5));
        let b = relation(250.0, column(125.0, 0.0, 7.5, 10.0));
        let sum = add_stats(&a, &b);
        assert!((x(&sum).distinct_values_count() - 250.0).abs() < EPS);
    }

    #[test]
    fn test_add_stats_weights_nulls_by_rows() {
        let a = relation(300.0, column(10.0, 0.5, 0.0, 9.0));
        let b = relation(100.0, column(10.0, 0.1, 0.0, 9.0));
        let sum = add_stats(&a, &b);
        // (0.5 * 300 + 0.1 * 100) / 400
        assert!((x(&sum).nulls_fraction() - 0.4).abs() < EPS);
    }

    #[test]
    fn test_add_stats_nan_bound_defers_to_other_side() {
        let a = relation(10.0, column(5.0, 0.0, f64::NAN, f64::NAN));
        let b = relation(10.0, column(5.0, 0.0, 2.0, 4.0));
        let merged = x(&add_stats(&a, &b));
        assert_eq!(merged.low_value(), 2.0);
        assert_eq!(merged.high_value(), 4.0);

        let both_unknown = x(&add_stats(&a, &a));
        assert!(both_unknown.low_value().is_nan());
        assert!((both_unknown.distinct_values_count() - 10.0).abs() < EPS);
    }

    #[test]
    fn test_add_stats_with_empty_side() {
        let a = relation(500.0, column(50.0, 0.2, 0.0, 499.0));
        let empty = a.cleared();
        let sum = add_stats(&a, &empty);
        assert_eq!(sum, a);
    }

    #[test]
    fn test_add_stats_unknown_ndv_propagates() {
        let a = relation(10.0, column(f64::NAN, 0.0, 0.0, 9.0));
        let b = relation(10.0, column(3.0, 0.0, 0.0, 9.0));
        assert!(x(&add_stats(&a, &b)).distinct_values_count().is_nan());
    }

    #[test]
    fn test_subtract_stats() {
        let total = relation(1000.0, column(100.0, 0.1, 0.0, 999.0));
        let part = relation(9.0, ColumnStats::single_value(500.0));
        let rest = subtract_stats(&total, &part);

        assert!((rest.output_row_count() - 991.0).abs() < EPS);
        let col = x(&rest);
        assert!((col.distinct_values_count() - 99.0).abs() < EPS);
        assert_eq!(col.low_value(), 0.0);
        assert_eq!(col.high_value(), 999.0);
        // 100 null rows remain among 991.
        assert!((col.nulls_fraction() - 100.0 / 991.0).abs() < EPS);
    }

    #[test]
    fn test_subtract_stats_to_zero_rows() {
        let total = relation(10.0, column(1.0, 0.0, 5.0, 5.0));
        let rest = subtract_stats(&total, &total);

        assert_eq!(rest.output_row_count(), 0.0);
        assert_eq!(x(&rest), ColumnStats::zero());
    }

    #[test]
    fn test_subtract_stats_never_negative() {
        let total = relation(10.0, column(5.0, 0.0, 0.0, 9.0));
        let part = relation(20.0, column(10.0, 0.0, 0.0, 9.0));
        let rest = subtract_stats(&total, &part);
        assert_eq!(rest.output_row_count(), 0.0);
    }

    #[test]
    fn test_subtract_keeps_one_distinct_value_for_remaining_rows() {
        let total = RelationStats::new(100.0)
            .with_column("x", column(10.0, 0.0, 0.0, 9.0))
            .with_column("y", column(4.0, 0.0, 0.0, 3.0));
        // The part narrowed x only; y is carried unchanged.
        let part = RelationStats::new(10.0)
            .with_column("x", ColumnStats::single_value(3.0))
            .with_column("y", column(4.0, 0.0, 0.0, 3.0));
        let rest = subtract_stats(&total, &part);

        let y = rest.column(&ColumnId::new("y")).unwrap();
        assert!((y.distinct_values_count() - MIN_DISTINCT_VALUES).abs() < EPS);
    }

    #[test]
    fn test_subtract_unknown_rows_propagates() {
        let total = relation(f64::NAN, column(5.0, 0.0, 0.0, 9.0));
        let part = relation(2.0, column(1.0, 0.0, 1.0, 1.0));
        let rest = subtract_stats(&total, &part);
        assert!(rest.output_row_count().is_nan());
        assert!(x(&rest).nulls_fraction().is_nan());
    }

    #[test]
    fn test_subtract_non_range_keeps_bounds() {
        let total = relation(699.0, column(69.9, 0.0, 0.0, 999.0));
        let part = relation(50.0, column(10.0, 0.0, 100.0, 200.0).with_average_row_size(4.0));
        let rest = subtract_non_range_stats(&total, &part);

        assert!((rest.output_row_count() - 649.0).abs() < EPS);
        let col = x(&rest);
        assert!((col.distinct_values_count() - 59.9).abs() < EPS);
        assert_eq!(col.low_value(), 0.0);
        assert_eq!(col.high_value(), 999.0);
        assert_eq!(col.average_row_size(), 8.0);
    }

    #[test]
    fn test_subtract_non_range_with_empty_part_is_identity() {
        let total = relation(699.0, column(69.9, 0.0, 0.0, 999.0));
        let rest = subtract_non_range_stats(&total, &total.cleared());
        assert_eq!(rest, total);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_relation() -> impl Strategy<Value = RelationStats> {
            (0u32..10_000, 1u32..200, 0u32..100, -100i32..100, 0i32..500).prop_map(
                |(rows, ndv, nulls, low, width)| {
                    relation(
                        f64::from(rows),
                        column(
                            f64::from(ndv),
                            f64::from(nulls) / 100.0,
                            f64::from(low),
                            f64::from(low + width),
                        ),
                    )
                },
            )
        }

        proptest! {
            #[test]
            fn test_union_never_undercounts(a in arb_relation(), b in arb_relation()) {
                let sum = add_stats(&a, &b);
                prop_assert!(
                    sum.output_row_count() >= a.output_row_count().max(b.output_row_count())
                );
                let merged = x(&sum);
                prop_assert!(
                    merged.distinct_values_count()
                        <= estimated_domain_cardinality(merged.low_value(), merged.high_value(), false)
                );
                prop_assert!((0.0..=1.0).contains(&merged.nulls_fraction()));
            }

            #[test]
            fn test_difference_never_negative(a in arb_relation(), b in arb_relation()) {
                for rest in [subtract_stats(&a, &b), subtract_non_range_stats(&a, &b)] {
                    prop_assert!(rest.output_row_count() >= 0.0);
                    let col = x(&rest);
                    prop_assert!(col.distinct_values_count() >= 0.0);
                    prop_assert!((0.0..=1.0).contains(&col.nulls_fraction()));
                }
            }
        }
    }
}
