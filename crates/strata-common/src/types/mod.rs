//! Core type definitions for Strata.
//!
//! - Column identifiers ([`ColumnId`])
//! - Declared column types ([`LogicalType`])
//! - Literal values appearing in predicates ([`Value`])

mod column_id;
mod logical_type;
mod value;

pub use column_id::ColumnId;
pub use logical_type::LogicalType;
pub use value::Value;
