//! # strata-engine
//!
//! Statistics estimation for the cost-based planner: given the estimate
//! of a plan node's input and a filter predicate, derive the estimate of
//! the node's output.
//!
//! ## Modules
//!
//! - [`config`] - Estimator coefficients
//! - [`query`] - Predicate and plan representation, and the estimators

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod query;

pub use config::EstimatorConfig;
pub use query::optimizer::{
    ComparisonStatsCalculator, ComposableStatsCalculator, ConstantResolver, DomainConverter,
    FilterStatsCalculator, ScalarStatsCalculator, StatsCalculator, StatsLookup, StatsRule,
    TypeProvider,
};
pub use query::plan::{BinaryOp, LogicalExpression, LogicalOperator, UnaryOp};
