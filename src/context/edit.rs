//! Positional rewrite instructions against the original SQL text.

use smol_str::SmolStr;

/// A text patch the rewriting layer applies to the original statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Splice `text` (`"<expr> AS <alias> "`) into the projection list
    /// at `position`, after the last declared item.
    ColumnInsertion { position: usize, text: SmolStr },
    /// The table identifier `original` found at `position` must be replaced
    /// by its shard-resolved physical name.
    IdentifierSubstitution { position: usize, original: SmolStr },
}

impl Edit {
    /// Byte offset the edit applies to.
    pub fn position(&self) -> usize {
        match self {
            Edit::ColumnInsertion { position, .. }
            | Edit::IdentifierSubstitution { position, .. } => *position,
        }
    }

    pub fn is_column_insertion(&self) -> bool {
        matches!(self, Edit::ColumnInsertion { .. })
    }

    pub fn is_identifier_substitution(&self) -> bool {
        matches!(self, Edit::IdentifierSubstitution { .. })
    }

    /// The payload text: inserted fragment or original identifier.
    pub fn text(&self) -> &str {
        match self {
            Edit::ColumnInsertion { text, .. } => text,
            Edit::IdentifierSubstitution { original, .. } => original,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let insert = Edit::ColumnInsertion {
            position: 22,
            text: "name AS sharding_gen_1 ".into(),
        };
        let table = Edit::IdentifierSubstitution {
            position: 14,
            original: "t".into(),
        };
        assert_eq!(insert.position(), 22);
        assert!(insert.is_column_insertion());
        assert_eq!(table.text(), "t");
        assert!(table.is_identifier_substitution());
    }
}
