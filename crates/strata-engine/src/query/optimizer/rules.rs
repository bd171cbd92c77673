//! Per-plan-node stats rules.
//!
//! A [`StatsRule`] handles one kind of plan node: it either declines or
//! derives the node's estimate from those of its children, which it reads
//! through a [`StatsLookup`]. [`ComposableStatsCalculator`] tries its rules
//! in order.

use super::constant::TypeProvider;
use super::filter::FilterStatsCalculator;
use super::scalar::ScalarStatsCalculator;
use crate::config::EstimatorConfig;
use crate::query::plan::LogicalOperator;
use strata_common::utils::error::Result;
use strata_core::statistics::RelationStats;

/// Source of already computed child estimates.
pub trait StatsLookup {
    /// Returns the estimate of `node`.
    fn stats_of(&self, node: &LogicalOperator) -> RelationStats;
}

impl<F> StatsLookup for F
where
    F: Fn(&LogicalOperator) -> RelationStats,
{
    fn stats_of(&self, node: &LogicalOperator) -> RelationStats {
        self(node)
    }
}

/// Estimation strategy for one kind of plan node.
pub trait StatsRule: Send + Sync {
    /// Rule name for diagnostics.
    fn name(&self) -> &'static str;

    /// Derives the estimate of `node`, or returns `None` if the rule does
    /// not apply to it.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is malformed for this rule, such as a
    /// filter predicate referencing a column its input does not have.
    fn calculate(
        &self,
        node: &LogicalOperator,
        lookup: &dyn StatsLookup,
        types: &TypeProvider,
    ) -> Result<Option<RelationStats>>;
}

/// Computes the estimate of any plan node.
pub trait StatsCalculator {
    /// Derives the estimate of `node`.
    ///
    /// # Errors
    ///
    /// Propagates the error of the rule handling `node`.
    fn calculate_stats(
        &self,
        node: &LogicalOperator,
        lookup: &dyn StatsLookup,
        types: &TypeProvider,
    ) -> Result<RelationStats>;
}

/// Semi-join: a fixed fraction of the source rows find a match.
#[derive(Debug, Clone)]
pub struct SemiJoinStatsRule {
    coefficient: f64,
}

impl SemiJoinStatsRule {
    /// Creates the rule with the configured semi-join coefficient.
    #[must_use]
    pub fn new(config: &EstimatorConfig) -> Self {
        Self {
            coefficient: config.semi_join_coefficient,
        }
    }
}

impl StatsRule for SemiJoinStatsRule {
    fn name(&self) -> &'static str {
        "SemiJoin"
    }

    fn calculate(
        &self,
        node: &LogicalOperator,
        lookup: &dyn StatsLookup,
        _types: &TypeProvider,
    ) -> Result<Option<RelationStats>> {
        let LogicalOperator::SemiJoin(semi_join) = node else {
            return Ok(None);
        };
        let source = lookup.stats_of(&semi_join.source);
        let coefficient = self.coefficient;
        Ok(Some(source.map_output_row_count(|rows| rows * coefficient)))
    }
}

/// Filter: runs the predicate interpreter over the input estimate.
#[derive(Debug, Clone)]
pub struct FilterStatsRule {
    calculator: FilterStatsCalculator,
}

impl FilterStatsRule {
    /// Creates the rule around a filter calculator.
    #[must_use]
    pub fn new(calculator: FilterStatsCalculator) -> Self {
        Self { calculator }
    }
}

impl StatsRule for FilterStatsRule {
    fn name(&self) -> &'static str {
        "Filter"
    }

    fn calculate(
        &self,
        node: &LogicalOperator,
        lookup: &dyn StatsLookup,
        types: &TypeProvider,
    ) -> Result<Option<RelationStats>> {
        let LogicalOperator::Filter(filter) = node else {
            return Ok(None);
        };
        let input = lookup.stats_of(&filter.input);
        self.calculator
            .filter_stats(&input, &filter.predicate, types)
            .map(Some)
    }
}

/// Project: keeps the input row count and estimates each output column.
#[derive(Debug, Clone, Default)]
pub struct ProjectStatsRule {
    scalar: ScalarStatsCalculator,
}

impl ProjectStatsRule {
    /// Creates the rule around a scalar calculator.
    #[must_use]
    pub fn new(scalar: ScalarStatsCalculator) -> Self {
        Self { scalar }
    }
}

impl StatsRule for ProjectStatsRule {
    fn name(&self) -> &'static str {
        "Project"
    }

    fn calculate(
        &self,
        node: &LogicalOperator,
        lookup: &dyn StatsLookup,
        _types: &TypeProvider,
    ) -> Result<Option<RelationStats>> {
        let LogicalOperator::Project(project) = node else {
            return Ok(None);
        };
        let input = lookup.stats_of(&project.input);
        let output = project.projections.iter().fold(
            RelationStats::new(input.output_row_count()),
            |output, (id, expr)| output.with_column(id.clone(), self.scalar.calculate(expr, &input)),
        );
        Ok(Some(output))
    }
}

/// Tries an ordered list of rules; the first one that applies wins.
///
/// Nodes no rule applies to get [`RelationStats::unknown`].
pub struct ComposableStatsCalculator {
    rules: Vec<Box<dyn StatsRule>>,
}

impl ComposableStatsCalculator {
    /// Creates a calculator over `rules`, tried in order.
    #[must_use]
    pub fn new(rules: Vec<Box<dyn StatsRule>>) -> Self {
        Self { rules }
    }

    /// Creates a calculator with the filter, project and semi-join rules.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfig`](strata_common::utils::error::Error::InvalidConfig)
    /// if a coefficient is out of range.
    pub fn with_default_rules(config: &EstimatorConfig) -> Result<Self> {
        Ok(Self::new(vec![
            Box::new(FilterStatsRule::new(FilterStatsCalculator::try_new(config.clone())?)),
            Box::new(ProjectStatsRule::default()),
            Box::new(SemiJoinStatsRule::new(config)),
        ]))
    }

    /// Returns the rule names in the order they are tried.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|rule| rule.name())
    }
}

impl StatsCalculator for ComposableStatsCalculator {
    fn calculate_stats(
        &self,
        node: &LogicalOperator,
        lookup: &dyn StatsLookup,
        types: &TypeProvider,
    ) -> Result<RelationStats> {
        for rule in &self.rules {
            if let Some(stats) = rule.calculate(node, lookup, types)? {
                tracing::trace!(rule = rule.name(), node = node.name(), "stats rule applied");
                return Ok(stats);
            }
        }
        tracing::debug!(node = node.name(), "no stats rule matched");
        Ok(RelationStats::unknown())
    }
}

impl std::fmt::Debug for ComposableStatsCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rule_names()).finish()
    }
}
