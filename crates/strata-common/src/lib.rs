//! # strata-common
//!
//! Foundation layer for Strata: identifier and value types plus the
//! shared error type.
//!
//! This crate provides the building blocks used by all other Strata
//! crates. It has no internal dependencies and should be kept minimal.
//!
//! ## Modules
//!
//! - [`types`] - Core type definitions (ColumnId, Value, LogicalType)
//! - [`utils`] - Utility functions and helpers (errors)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod types;
pub mod utils;

// Re-export commonly used types at crate root
pub use types::{ColumnId, LogicalType, Value};
pub use utils::error::{Error, Result};
