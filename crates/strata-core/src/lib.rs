//! # strata-core
//!
//! Statistics model and the estimate algebra used by the filter estimator.
//!
//! ## Modules
//!
//! - [`statistics`] - Column and relation estimates, and the union and
//!   difference operations combining them

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod statistics;

pub use statistics::{ColumnStats, RelationStats};
