//! Projection items.

use crate::normalize::{exact_value, same_name};
use smol_str::SmolStr;
use std::fmt;

/// Aggregate functions the merge layer knows how to combine across shards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationKind {
    Max,
    Min,
    Sum,
    Avg,
    Count,
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AggregationKind::Max => "MAX",
            AggregationKind::Min => "MIN",
            AggregationKind::Sum => "SUM",
            AggregationKind::Avg => "AVG",
            AggregationKind::Count => "COUNT",
        })
    }
}

/// A plain projection item: a column, an expression or `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonItem {
    /// Normalized expression text (quotes stripped, tokens concatenated).
    pub expression: SmolStr,
    pub alias: Option<SmolStr>,
    pub is_star: bool,
}

/// An aggregate call in the projection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationItem {
    pub kind: AggregationKind,
    /// The parenthesised argument exactly as written, e.g. `(score)`.
    pub inner_expression: SmolStr,
    /// Normalized `KIND(inner)` text, e.g. `AVG(score)`.
    pub expression: SmolStr,
    pub alias: Option<SmolStr>,
    /// 1-based position in the projection list; `None` for derived items.
    pub ordinal: Option<usize>,
    /// `COUNT` then `SUM` companions, present only for `AVG`.
    pub derived: Vec<AggregationItem>,
}

impl AggregationItem {
    /// Creates an aggregation item over `inner_expression`.
    pub fn new(
        kind: AggregationKind,
        inner_expression: impl Into<SmolStr>,
        alias: Option<SmolStr>,
        ordinal: Option<usize>,
    ) -> Self {
        let inner_expression = inner_expression.into();
        let expression = exact_value(&format!("{kind}{inner_expression}"));
        Self {
            kind,
            inner_expression,
            expression,
            alias,
            ordinal,
            derived: Vec::new(),
        }
    }
}

/// One entry of the projection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectItem {
    Common(CommonItem),
    Aggregation(AggregationItem),
}

impl SelectItem {
    /// Normalized expression text used for alias and column matching.
    pub fn expression(&self) -> &str {
        match self {
            SelectItem::Common(item) => &item.expression,
            SelectItem::Aggregation(item) => &item.expression,
        }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            SelectItem::Common(item) => item.alias.as_deref(),
            SelectItem::Aggregation(item) => item.alias.as_deref(),
        }
    }

    /// Returns true for a bare `*` item.
    pub fn is_star(&self) -> bool {
        matches!(self, SelectItem::Common(CommonItem { is_star: true, .. }))
    }

    pub fn as_aggregation(&self) -> Option<&AggregationItem> {
        match self {
            SelectItem::Aggregation(item) => Some(item),
            SelectItem::Common(_) => None,
        }
    }

    /// Case-insensitive match of `name` against this item's expression or alias.
    pub fn matches(&self, name: &str) -> bool {
        same_name(self.expression(), name) || self.alias().is_some_and(|alias| same_name(alias, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregation_expression_is_normalized() {
        let item = AggregationItem::new(AggregationKind::Avg, "(`score`)", None, Some(2));
        assert_eq!(item.expression, "AVG(score)");
        assert_eq!(item.inner_expression, "(`score`)");
        assert_eq!(item.ordinal, Some(2));
        assert!(item.derived.is_empty());
    }

    #[test]
    fn matches_expression_or_alias() {
        let item = SelectItem::Common(CommonItem {
            expression: "user_id".into(),
            alias: Some("uid".into()),
            is_star: false,
        });
        assert!(item.matches("USER_ID"));
        assert!(item.matches("Uid"));
        assert!(!item.matches("order_id"));
        assert!(!item.is_star());
    }

    #[test]
    fn star_items() {
        let star = SelectItem::Common(CommonItem {
            expression: "*".into(),
            alias: None,
            is_star: true,
        });
        assert!(star.is_star());
        assert!(star.as_aggregation().is_none());
    }
}
