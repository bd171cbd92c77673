//! Statistics estimation for cost-based planning.
//!
//! Derives the estimate of a plan node's output from the estimates of its
//! inputs.
//!
//! ## Submodules
//!
//! - [`constant`] - Converting predicate literals onto the numeric domain
//! - [`comparison`] - Column-vs-constant and column-vs-column comparisons
//! - [`filter`] - The predicate interpreter
//! - [`scalar`] - Estimates for scalar (non-boolean) expressions
//! - [`rules`] - Per-plan-node stats rules and their composition

pub mod comparison;
pub mod constant;
pub mod filter;
pub mod rules;
pub mod scalar;

pub use comparison::{ComparisonStatsCalculator, NumericDomain};
pub use constant::{ConstantResolver, DomainConverter, TypeProvider};
pub use filter::FilterStatsCalculator;
pub use rules::{
    ComposableStatsCalculator, FilterStatsRule, ProjectStatsRule, SemiJoinStatsRule,
    StatsCalculator, StatsLookup, StatsRule,
};
pub use scalar::ScalarStatsCalculator;
