//! Logical plan representation.
//!
//! Only the shapes the estimators look at are modeled: predicate
//! expressions, and the plan nodes that have a stats rule. Expression
//! trees arrive pre-validated from the planner.

use std::fmt;
use strata_common::types::{ColumnId, Value};

/// A logical operator in the query plan.
#[derive(Debug, Clone)]
pub enum LogicalOperator {
    /// Scan a base table.
    Scan(ScanOp),

    /// Filter rows based on a predicate.
    Filter(FilterOp),

    /// Compute output columns from input columns.
    Project(ProjectOp),

    /// Keep source rows with a match in the filtering source.
    SemiJoin(SemiJoinOp),
}

impl LogicalOperator {
    /// Returns the operator name for diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Scan(_) => "Scan",
            Self::Filter(_) => "Filter",
            Self::Project(_) => "Project",
            Self::SemiJoin(_) => "SemiJoin",
        }
    }
}

/// Scan a base table.
#[derive(Debug, Clone)]
pub struct ScanOp {
    /// Table name.
    pub table: String,
}

/// Filter rows based on a predicate.
#[derive(Debug, Clone)]
pub struct FilterOp {
    /// The filter predicate.
    pub predicate: LogicalExpression,
    /// Input operator.
    pub input: Box<LogicalOperator>,
}

/// Compute output columns from input columns.
#[derive(Debug, Clone)]
pub struct ProjectOp {
    /// Output column and the expression computing it.
    pub projections: Vec<(ColumnId, LogicalExpression)>,
    /// Input operator.
    pub input: Box<LogicalOperator>,
}

/// Semi-join: keeps rows of `source` with a match in `filtering_source`.
#[derive(Debug, Clone)]
pub struct SemiJoinOp {
    /// Rows being filtered.
    pub source: Box<LogicalOperator>,
    /// Rows providing the match set.
    pub filtering_source: Box<LogicalOperator>,
}

/// A logical expression.
#[derive(Debug, Clone, PartialEq)]
pub enum LogicalExpression {
    /// A literal value.
    Literal(Value),

    /// A column reference.
    Column(ColumnId),

    /// Binary operation.
    Binary {
        /// Left operand.
        left: Box<LogicalExpression>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<LogicalExpression>,
    },

    /// Unary operation.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<LogicalExpression>,
    },

    /// Function call.
    FunctionCall {
        /// Function name.
        name: String,
        /// Arguments.
        args: Vec<LogicalExpression>,
    },

    /// CASE expression.
    Case {
        /// Test expression (for simple CASE).
        operand: Option<Box<LogicalExpression>>,
        /// WHEN clauses.
        when_clauses: Vec<(LogicalExpression, LogicalExpression)>,
        /// ELSE clause.
        else_clause: Option<Box<LogicalExpression>>,
    },
}

impl LogicalExpression {
    /// Column reference.
    pub fn column(id: impl Into<ColumnId>) -> Self {
        Self::Column(id.into())
    }

    /// Literal value.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::Literal(value.into())
    }

    /// Binary operation.
    pub fn binary(left: Self, op: BinaryOp, right: Self) -> Self {
        Self::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// `left AND right`.
    pub fn and(left: Self, right: Self) -> Self {
        Self::binary(left, BinaryOp::And, right)
    }

    /// `left OR right`.
    pub fn or(left: Self, right: Self) -> Self {
        Self::binary(left, BinaryOp::Or, right)
    }

    /// `NOT operand`.
    pub fn not(operand: Self) -> Self {
        Self::Unary {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        }
    }

    /// Returns the referenced column, if this is a column reference.
    #[must_use]
    pub fn as_column(&self) -> Option<&ColumnId> {
        match self {
            Self::Column(id) => Some(id),
            _ => None,
        }
    }
}

/// Binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Equality comparison (=).
    Eq,
    /// Inequality comparison (<>).
    Ne,
    /// Less than (<).
    Lt,
    /// Less than or equal (<=).
    Le,
    /// Greater than (>).
    Gt,
    /// Greater than or equal (>=).
    Ge,

    /// Logical AND.
    And,
    /// Logical OR.
    Or,

    /// Addition (+).
    Add,
    /// Subtraction (-).
    Sub,
    /// Multiplication (*).
    Mul,
    /// Division (/).
    Div,

    /// Pattern matching (LIKE).
    Like,
}

impl BinaryOp {
    /// Returns true for `=`, `<>`, `<`, `<=`, `>`, `>=`.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge
        )
    }

    /// Returns true for AND and OR.
    #[must_use]
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Returns the comparison with its operands swapped, so that
    /// `a op b` holds exactly when `b op.flip() a` does.
    ///
    /// Operators other than comparisons are returned unchanged.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Lt => Self::Gt,
            Self::Le => Self::Ge,
            Self::Gt => Self::Lt,
            Self::Ge => Self::Le,
            other => other,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Like => "LIKE",
        };
        f.write_str(symbol)
    }
}

/// Unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Logical NOT.
    Not,
    /// IS NULL check.
    IsNull,
    /// IS NOT NULL check.
    IsNotNull,
}
