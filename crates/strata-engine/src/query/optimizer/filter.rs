//! Filter statistics.
//!
//! Walks a predicate tree and derives the estimate of the rows that pass
//! it. Comparisons are estimated at the leaves; AND applies its conjuncts
//! one after the other, NOT subtracts, and OR combines by
//! inclusion-exclusion. Predicate shapes without a rule keep a fixed
//! fraction of the rows.

use super::comparison::{ComparisonStatsCalculator, NumericDomain};
use super::constant::{ConstantResolver, DomainConverter, TypeProvider};
use crate::config::EstimatorConfig;
use crate::query::plan::{BinaryOp, LogicalExpression, UnaryOp};
use std::sync::Arc;
use strata_common::types::{ColumnId, Value};
use strata_common::utils::error::{Error, Result};
use strata_core::statistics::{
    RelationStats, add_stats, subtract_non_range_stats, subtract_stats,
};

/// Estimates the output of a filter from its input estimate and predicate.
///
/// Holds no per-call state; one calculator can serve concurrent planners.
#[derive(Clone)]
pub struct FilterStatsCalculator {
    config: EstimatorConfig,
    resolver: Arc<dyn ConstantResolver>,
}

impl FilterStatsCalculator {
    /// Creates a calculator using [`DomainConverter`] for literals.
    #[must_use]
    pub fn new(config: EstimatorConfig) -> Self {
        Self::with_resolver(config, Arc::new(DomainConverter))
    }

    /// Creates a calculator after checking `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if a coefficient is out of range.
    pub fn try_new(config: EstimatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Creates a calculator with a custom literal resolver.
    #[must_use]
    pub fn with_resolver(config: EstimatorConfig, resolver: Arc<dyn ConstantResolver>) -> Self {
        Self { config, resolver }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimates the rows of `input` satisfying `predicate`.
    ///
    /// # Errors
    ///
    /// Returns an error if the predicate references a column `input` has no
    /// statistics for, or if the tree holds a connective the estimator does
    /// not implement.
    pub fn filter_stats(
        &self,
        input: &RelationStats,
        predicate: &LogicalExpression,
        types: &TypeProvider,
    ) -> Result<RelationStats> {
        let visitor = FilterVisitor {
            calculator: self,
            types,
        };
        let output = visitor.process(predicate, input)?;
        tracing::debug!(
            input_rows = input.output_row_count(),
            output_rows = output.output_row_count(),
            "estimated filter"
        );
        Ok(output)
    }

    /// Estimate for a predicate the estimator cannot analyze.
    #[must_use]
    pub fn filter_stats_for_unknown_expression(&self, input: &RelationStats) -> RelationStats {
        let coefficient = self.config.unknown_filter_coefficient;
        input.map_output_row_count(|rows| rows * coefficient)
    }
}

impl std::fmt::Debug for FilterStatsCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterStatsCalculator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

struct FilterVisitor<'a> {
    calculator: &'a FilterStatsCalculator,
    types: &'a TypeProvider,
}

impl FilterVisitor<'_> {
    fn process(&self, expr: &LogicalExpression, input: &RelationStats) -> Result<RelationStats> {
        match expr {
            LogicalExpression::Literal(literal) => Ok(match literal.as_bool() {
                Some(true) => input.clone(),
                Some(false) => input.cleared(),
                None => self.unknown(input, "non-boolean literal"),
            }),
            LogicalExpression::Unary {
                op: UnaryOp::Not,
                operand,
            } => Ok(subtract_stats(input, &self.process(operand, input)?)),
            LogicalExpression::Unary {
                op: op @ (UnaryOp::IsNull | UnaryOp::IsNotNull),
                operand,
            } => match operand.as_column() {
                Some(column) => ComparisonStatsCalculator::new(input, &self.calculator.config)
                    .is_null(column, *op == UnaryOp::IsNotNull),
                None => Ok(self.unknown(input, "null check on an expression")),
            },
            LogicalExpression::Binary { left, op, right } if op.is_logical() => {
                self.visit_logical(left, *op, right, input)
            }
            LogicalExpression::Binary { left, op, right } if op.is_comparison() => {
                self.visit_comparison(left, *op, right, input)
            }
            _ => Ok(self.unknown(input, "unsupported expression")),
        }
    }

    fn visit_logical(
        &self,
        left: &LogicalExpression,
        op: BinaryOp,
        right: &LogicalExpression,
        input: &RelationStats,
    ) -> Result<RelationStats> {
        match op {
            // The right conjunct filters first, the left one filters its result.
            BinaryOp::And => {
                let right_stats = self.process(right, input)?;
                self.process(left, &right_stats)
            }
            BinaryOp::Or => {
                let left_stats = self.process(left, input)?;
                let right_stats = self.process(right, input)?;
                let and_stats = self.process(left, &right_stats)?;
                Ok(subtract_non_range_stats(
                    &add_stats(&left_stats, &right_stats),
                    &and_stats,
                ))
            }
            other => Err(Error::UnsupportedConnective(other.to_string())),
        }
    }

    fn visit_comparison(
        &self,
        left: &LogicalExpression,
        op: BinaryOp,
        right: &LogicalExpression,
        input: &RelationStats,
    ) -> Result<RelationStats> {
        let comparison = ComparisonStatsCalculator::new(input, &self.calculator.config);
        match (left, right) {
            (LogicalExpression::Column(a), LogicalExpression::Column(b)) => {
                comparison.column_to_column(a, b, op)
            }
            (LogicalExpression::Column(column), LogicalExpression::Literal(value)) => comparison
                .column_to_constant(
                    column,
                    self.literal_value(column, value),
                    op,
                    self.domain(column),
                ),
            (LogicalExpression::Literal(value), LogicalExpression::Column(column)) => comparison
                .column_to_constant(
                    column,
                    self.literal_value(column, value),
                    op.flip(),
                    self.domain(column),
                ),
            _ => Ok(self.unknown(input, "comparison is not column-vs-column or column-vs-literal")),
        }
    }

    fn literal_value(&self, column: &ColumnId, literal: &Value) -> f64 {
        let declared = self.types.get(column);
        self.calculator
            .resolver
            .resolve(literal, declared)
            .unwrap_or_else(|| {
                tracing::trace!(%column, %literal, %declared, "literal not convertible");
                f64::NAN
            })
    }

    fn domain(&self, column: &ColumnId) -> NumericDomain {
        NumericDomain::for_type(self.types.get(column))
    }

    fn unknown(&self, input: &RelationStats, reason: &str) -> RelationStats {
        tracing::trace!(reason, "using unknown filter coefficient");
        self.calculator.filter_stats_for_unknown_expression(input)
    }
}
