//! Byte offsets into the statement text.

use std::ops::Range;

use smol_str::SmolStr;

use crate::normalize::exact_value;

/// Half-open byte range into the SQL the tokens were lexed from.
///
/// Rewrite edits are expressed in the same units, so a span can slice the
/// original string directly.
pub type Span = Range<usize>;

/// A value together with where it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }

    /// Offset of the first byte; this is where substitutions are anchored.
    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }
}

impl Spanned<SmolStr> {
    /// The identifier with its quoting removed.
    pub fn normalized(&self) -> SmolStr {
        exact_value(&self.node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_follow_the_source() {
        let sql = "SELECT `o`.id FROM t_order o";
        let owner = Spanned::new(SmolStr::new("`o`"), 7..10);
        assert_eq!(&sql[owner.span.clone()], "`o`");
        assert_eq!(owner.start(), 7);
        assert_eq!(owner.end(), 10);
    }

    #[test]
    fn normalized_strips_quotes() {
        let owner = Spanned::new(SmolStr::new("[t_order]"), 0..9);
        assert_eq!(owner.normalized(), "t_order");
        assert_eq!(owner.node, "[t_order]");
    }
}
