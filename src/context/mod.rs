//! The semantic model produced by SELECT analysis.
//!
//! A [`SelectContext`] is built by exactly one parse call and handed back
//! finished; the rewriting and routing layers only read it.

mod condition;
mod edit;
mod item;
mod ordering;
mod table;

pub use condition::{Column, Condition, ConditionOperator, ConditionValue, Limit, LimitValue};
pub use edit::Edit;
pub use item::{AggregationItem, AggregationKind, CommonItem, SelectItem};
pub(crate) use ordering::qualify;
pub use ordering::{GroupByItem, OrderByItem, OrderDirection};
pub use table::TableRef;

/// Everything the rewrite and routing layers need to know about one SELECT.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectContext {
    pub(crate) distinct: bool,
    pub(crate) contains_star: bool,
    pub(crate) items: Vec<SelectItem>,
    pub(crate) tables: Vec<TableRef>,
    pub(crate) conditions: Vec<Condition>,
    pub(crate) group_by: Vec<GroupByItem>,
    pub(crate) order_by: Vec<OrderByItem>,
    pub(crate) limit: Option<Limit>,
    pub(crate) edits: Vec<Edit>,
    pub(crate) select_list_end_position: usize,
    pub(crate) parameter_index: usize,
}

impl SelectContext {
    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    /// True when the projection list contains a bare `*`.
    pub fn contains_star(&self) -> bool {
        self.contains_star
    }

    /// Projection items in the order they were written.
    pub fn items(&self) -> &[SelectItem] {
        &self.items
    }

    /// Registered table sources in the order they were written.
    pub fn tables(&self) -> &[TableRef] {
        &self.tables
    }

    /// Sharding conditions extracted from WHERE.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn group_by(&self) -> &[GroupByItem] {
        &self.group_by
    }

    pub fn order_by(&self) -> &[OrderByItem] {
        &self.order_by
    }

    pub fn limit(&self) -> Option<&Limit> {
        self.limit.as_ref()
    }

    /// Rewrite instructions in generation order (not position order).
    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    /// Rewrite instructions sorted by source position; ties keep generation order.
    pub fn sorted_edits(&self) -> Vec<Edit> {
        let mut edits = self.edits.clone();
        edits.sort_by_key(Edit::position);
        edits
    }

    /// Inserted projection fragments, in generation order.
    pub fn column_insertions(&self) -> impl Iterator<Item = &str> {
        self.edits.iter().filter_map(|edit| match edit {
            Edit::ColumnInsertion { text, .. } => Some(text.as_str()),
            Edit::IdentifierSubstitution { .. } => None,
        })
    }

    /// Offset where additional projection columns are spliced in.
    pub fn select_list_end_position(&self) -> usize {
        self.select_list_end_position
    }

    /// Number of positional parameters consumed up to the end of WHERE
    /// (plus any consumed by dialect pagination clauses).
    pub fn parameter_index(&self) -> usize {
        self.parameter_index
    }

    /// Looks up a registered table by name or alias.
    pub fn find_table(&self, reference: &str) -> Option<&TableRef> {
        self.tables
            .iter()
            .find(|table| table.is_referenced_by(reference))
    }

    /// Records pagination parsed by a dialect clause hook.
    pub fn set_limit(&mut self, limit: Limit) {
        self.limit = Some(limit);
    }

    /// Overrides the running positional-parameter count.
    pub fn set_parameter_index(&mut self, index: usize) {
        self.parameter_index = index;
    }
}
