//! Sharding conditions and pagination extracted from the statement.

use super::ordering::qualify;
use crate::ast::Span;
use smol_str::SmolStr;

/// A column referenced by a sharding condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub owner: Option<SmolStr>,
    pub name: SmolStr,
}

impl Column {
    /// `owner.name` or `name`.
    pub fn qualified_name(&self) -> SmolStr {
        qualify(self.owner.as_deref(), &self.name)
    }
}

/// The predicate shapes a router can use to narrow the target shards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOperator {
    Equal,
    In,
    Between,
}

/// A value on the right-hand side of a sharding condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionValue {
    /// A literal, unquoted.
    Literal(SmolStr),
    /// A `?` placeholder with its zero-based parameter index.
    Parameter(usize),
}

/// `column = v`, `column IN (v, ...)` or `column BETWEEN v AND v`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: Column,
    pub operator: ConditionOperator,
    pub values: Vec<ConditionValue>,
}

/// A LIMIT/OFFSET operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitValue {
    Literal { value: i64, span: Span },
    Parameter { index: usize, span: Span },
}

impl LimitValue {
    pub fn span(&self) -> &Span {
        match self {
            LimitValue::Literal { span, .. } | LimitValue::Parameter { span, .. } => span,
        }
    }
}

/// Pagination parsed by a dialect hook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Limit {
    pub offset: Option<LimitValue>,
    pub row_count: Option<LimitValue>,
}
