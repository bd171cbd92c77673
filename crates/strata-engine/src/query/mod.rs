//! Query representation and statistics estimation.
//!
//! - **Plan**: predicate expressions and the plan nodes the stats rules consume
//! - **Optimizer**: filter, comparison and scalar estimators, and the
//!   per-node stats rules composing them

pub mod optimizer;
pub mod plan;

pub use plan::{LogicalExpression, LogicalOperator};
