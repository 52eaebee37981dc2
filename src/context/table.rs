//! Registered table sources.

use crate::ast::Span;
use crate::normalize::same_name;
use smol_str::SmolStr;

/// A FROM or JOIN source eligible for physical-name rewriting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    /// The name exactly as written, quotes included.
    pub raw_name: SmolStr,
    /// `raw_name` with quotes stripped.
    pub name: SmolStr,
    pub alias: Option<SmolStr>,
    /// Where `raw_name` appears in the statement.
    pub span: Span,
}

impl TableRef {
    /// Returns true if `reference` names this table (case-insensitive).
    pub fn is_named(&self, reference: &str) -> bool {
        same_name(&self.name, reference)
    }

    /// Returns true if `reference` is this table's name or alias.
    pub fn is_referenced_by(&self, reference: &str) -> bool {
        self.is_named(reference)
            || self
                .alias
                .as_deref()
                .is_some_and(|alias| same_name(alias, reference))
    }
}
