//! Algebraic laws of the filter estimator over randomly generated inputs.

use proptest::prelude::*;
use strata_common::{ColumnId, LogicalType};
use strata_core::statistics::{ColumnStats, RelationStats, add_stats, subtract_stats};
use strata_engine::{
    BinaryOp, EstimatorConfig, FilterStatsCalculator, LogicalExpression, TypeProvider,
};

fn arb_column() -> BoxedStrategy<ColumnStats> {
    (1u32..500, 0u32..50, -500i32..500, 0i32..2000)
        .prop_map(|(ndv, nulls, low, width)| {
            ColumnStats::unknown()
                .with_distinct_values_count(f64::from(ndv))
                .with_nulls_fraction(f64::from(nulls) / 100.0)
                .with_range(f64::from(low), f64::from(low + width))
        })
        .boxed()
}

/// A real-valued column whose bounds fall on quarters.
fn arb_float_column() -> BoxedStrategy<ColumnStats> {
    (1u32..500, 0u32..50, -2000i32..2000, 0i32..8000)
        .prop_map(|(ndv, nulls, low, width)| {
            ColumnStats::unknown()
                .with_distinct_values_count(f64::from(ndv))
                .with_nulls_fraction(f64::from(nulls) / 100.0)
                .with_range(f64::from(low) / 4.0, f64::from(low + width) / 4.0)
        })
        .boxed()
}

fn arb_input() -> BoxedStrategy<RelationStats> {
    (1u32..100_000, arb_column(), arb_column(), arb_float_column())
        .prop_map(|(rows, x, y, f)| {
            RelationStats::new(f64::from(rows))
                .with_column("x", x)
                .with_column("y", y)
                .with_column("f", f)
        })
        .boxed()
}

/// A quarter-step constant around the float column's bounds.
fn arb_float_constant() -> BoxedStrategy<f64> {
    (-4000i32..12_000).prop_map(|k| f64::from(k) / 4.0).boxed()
}

fn arb_comparison() -> BoxedStrategy<BinaryOp> {
    prop_oneof![
        Just(BinaryOp::Eq),
        Just(BinaryOp::Ne),
        Just(BinaryOp::Lt),
        Just(BinaryOp::Le),
        Just(BinaryOp::Gt),
        Just(BinaryOp::Ge),
    ]
    .boxed()
}

fn arb_narrowing_comparison() -> BoxedStrategy<BinaryOp> {
    prop_oneof![
        Just(BinaryOp::Eq),
        Just(BinaryOp::Lt),
        Just(BinaryOp::Le),
        Just(BinaryOp::Gt),
        Just(BinaryOp::Ge),
    ]
    .boxed()
}

fn types() -> TypeProvider {
    TypeProvider::new()
        .with_type("x", LogicalType::Int64)
        .with_type("y", LogicalType::Int64)
        .with_type("f", LogicalType::Float64)
}

fn calculator() -> FilterStatsCalculator {
    FilterStatsCalculator::new(EstimatorConfig::default())
}

fn filter(predicate: &LogicalExpression, input: &RelationStats) -> RelationStats {
    calculator().filter_stats(input, predicate, &types()).unwrap()
}

fn x_compared(op: BinaryOp, constant: i64) -> LogicalExpression {
    LogicalExpression::binary(
        LogicalExpression::column("x"),
        op,
        LogicalExpression::literal(constant),
    )
}

fn f_compared(op: BinaryOp, constant: f64) -> LogicalExpression {
    LogicalExpression::binary(
        LogicalExpression::column("f"),
        op,
        LogicalExpression::literal(constant),
    )
}

fn distinct_values(stats: &RelationStats, column: &str) -> f64 {
    stats
        .column(&ColumnId::new(column))
        .unwrap()
        .distinct_values_count()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #[test]
    fn test_complement_union_restores_input(
        input in arb_input(),
        op in arb_comparison(),
        constant in -1000i64..3000,
    ) {
        let p = x_compared(op, constant);
        let kept = filter(&p, &input);
        let rejected = filter(&LogicalExpression::not(p), &input);
        let union = add_stats(&kept, &rejected);
        prop_assert!(close(union.output_row_count(), input.output_row_count()));
    }

    #[test]
    fn test_predicate_and_its_negation_is_empty(
        input in arb_input(),
        op in arb_narrowing_comparison(),
        constant in -1000i64..3000,
    ) {
        let p = x_compared(op, constant);
        // AND filters by its right side first, so `p` narrows before `NOT p` runs.
        let contradiction = LogicalExpression::and(LogicalExpression::not(p.clone()), p);
        prop_assert_eq!(filter(&contradiction, &input).output_row_count(), 0.0);
    }

    #[test]
    fn test_float_complement_union_restores_input(
        input in arb_input(),
        op in arb_comparison(),
        constant in arb_float_constant(),
    ) {
        let p = f_compared(op, constant);
        let kept = filter(&p, &input);
        let rejected = filter(&LogicalExpression::not(p), &input);
        let union = add_stats(&kept, &rejected);
        prop_assert!(close(union.output_row_count(), input.output_row_count()));
    }

    #[test]
    fn test_float_predicate_and_its_negation_is_empty(
        input in arb_input(),
        op in arb_narrowing_comparison(),
        constant in arb_float_constant(),
    ) {
        let p = f_compared(op, constant);
        let contradiction = LogicalExpression::and(LogicalExpression::not(p.clone()), p);
        prop_assert_eq!(filter(&contradiction, &input).output_row_count(), 0.0);
    }

    #[test]
    fn test_float_narrowing_never_increases_rows(
        input in arb_input(),
        a in arb_float_constant(),
        b in arb_float_constant(),
    ) {
        let (smaller, larger) = (a.min(b), a.max(b));
        for op in [BinaryOp::Lt, BinaryOp::Le] {
            let narrow = filter(&f_compared(op, smaller), &input);
            let wide = filter(&f_compared(op, larger), &input);
            prop_assert!(narrow.output_row_count() <= wide.output_row_count());
        }
        for op in [BinaryOp::Gt, BinaryOp::Ge] {
            let narrow = filter(&f_compared(op, larger), &input);
            let wide = filter(&f_compared(op, smaller), &input);
            prop_assert!(narrow.output_row_count() <= wide.output_row_count());
        }
    }

    #[test]
    fn test_comparisons_keep_distinct_values_in_bounds(
        input in arb_input(),
        op in arb_comparison(),
        int_constant in -1000i64..3000,
        float_constant in arb_float_constant(),
    ) {
        for (column, predicate) in [
            ("x", x_compared(op, int_constant)),
            ("f", f_compared(op, float_constant)),
        ] {
            let result = filter(&predicate, &input);
            let ndv = distinct_values(&result, column);
            prop_assert!(ndv <= distinct_values(&input, column));
            if result.output_row_count() > 0.0 {
                prop_assert!(ndv > 0.0);
            }
        }
    }

    #[test]
    fn test_equality_with_single_valued_column_matches_constant(
        input in arb_input(),
        value in -1000i32..3000,
    ) {
        let input = input.with_column("y", ColumnStats::single_value(f64::from(value)));
        let joined = filter(
            &LogicalExpression::binary(
                LogicalExpression::column("x"),
                BinaryOp::Eq,
                LogicalExpression::column("y"),
            ),
            &input,
        );
        let constant = filter(&x_compared(BinaryOp::Eq, i64::from(value)), &input);
        prop_assert!(close(joined.output_row_count(), constant.output_row_count()));
    }

    #[test]
    fn test_constants(input in arb_input()) {
        prop_assert_eq!(filter(&LogicalExpression::literal(true), &input), input.clone());
        prop_assert_eq!(filter(&LogicalExpression::literal(false), &input).output_row_count(), 0.0);
    }

    #[test]
    fn test_equality_is_idempotent(input in arb_input(), constant in -1000i64..3000) {
        let p = x_compared(BinaryOp::Eq, constant);
        let once = filter(&p, &input);
        let twice = filter(&p, &once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_narrowing_never_increases_rows(
        input in arb_input(),
        a in -1000i64..3000,
        b in -1000i64..3000,
    ) {
        let (smaller, larger) = (a.min(b), a.max(b));
        for op in [BinaryOp::Lt, BinaryOp::Le] {
            let narrow = filter(&x_compared(op, smaller), &input);
            let wide = filter(&x_compared(op, larger), &input);
            prop_assert!(narrow.output_row_count() <= wide.output_row_count());
        }
        for op in [BinaryOp::Gt, BinaryOp::Ge] {
            let narrow = filter(&x_compared(op, larger), &input);
            let wide = filter(&x_compared(op, smaller), &input);
            prop_assert!(narrow.output_row_count() <= wide.output_row_count());
        }
    }

    #[test]
    fn test_column_comparisons_are_symmetric(input in arb_input()) {
        let x = || LogicalExpression::column("x");
        let y = || LogicalExpression::column("y");

        let xy = filter(&LogicalExpression::binary(x(), BinaryOp::Eq, y()), &input);
        let yx = filter(&LogicalExpression::binary(y(), BinaryOp::Eq, x()), &input);
        prop_assert_eq!(xy, yx);

        let lt = filter(&LogicalExpression::binary(x(), BinaryOp::Lt, y()), &input);
        let gt = filter(&LogicalExpression::binary(y(), BinaryOp::Gt, x()), &input);
        prop_assert_eq!(lt, gt);
    }

    #[test]
    fn test_union_and_difference_bounds(
        input in arb_input(),
        left_op in arb_comparison(),
        left_constant in -1000i64..3000,
        right_op in arb_comparison(),
        right_constant in -1000i64..3000,
    ) {
        let a = filter(&x_compared(left_op, left_constant), &input);
        let b = filter(&x_compared(right_op, right_constant), &input);

        let union = add_stats(&a, &b);
        prop_assert!(union.output_row_count() >= a.output_row_count().max(b.output_row_count()));
        prop_assert!(subtract_stats(&a, &b).output_row_count() >= 0.0);
        prop_assert!(subtract_stats(&b, &a).output_row_count() >= 0.0);
    }
}
