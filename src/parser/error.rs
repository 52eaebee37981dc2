//! Parse failures.
//!
//! Both failure kinds are fatal: the parse stops at the first one and no
//! partial [`SelectContext`](crate::SelectContext) is returned.

use crate::ast::Span;
use crate::diag::{Diag, convert_diag_to_report};
use crate::lexer::token::TokenKind;
use miette::Report;
use std::fmt;

/// Constructs recognised syntactically but rejected by the rewrite planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unsupported {
    /// A parenthesised subquery used as a FROM-clause table source.
    Subquery,
    /// A set operator (`UNION`, `EXCEPT`, `INTERSECT`, `MINUS`) after the query body.
    SetOperator(TokenKind),
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unsupported::Subquery => f.write_str("subquery as a table source"),
            Unsupported::SetOperator(kind) => write!(f, "set operator {kind}"),
        }
    }
}

/// Classification of a parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// The statement uses a construct this layer refuses to plan.
    UnsupportedConstruct(Unsupported),
    /// A mandatory token was missing or the text could not be lexed.
    MalformedInput,
}

/// A fatal failure while analysing a SELECT statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    diag: Box<Diag>,
}

/// Common result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

impl ParseError {
    /// Wraps a diagnostic as a malformed-input failure.
    pub fn malformed(diag: Diag) -> Self {
        let diag = if diag.code.is_none() {
            diag.with_code("P001")
        } else {
            diag
        };
        Self {
            kind: ParseErrorKind::MalformedInput,
            diag: Box::new(diag),
        }
    }

    /// Builds an unsupported-construct failure located at `span`.
    pub fn unsupported(construct: Unsupported, span: Span) -> Self {
        let (label, help) = match construct {
            Unsupported::Subquery => (
                "subquery starts here",
                "rewrite the subquery as a join or run it separately",
            ),
            Unsupported::SetOperator(_) => (
                "set operator here",
                "run each SELECT separately and combine the results in the caller",
            ),
        };
        let diag = Diag::error(format!("cannot support {construct}"))
            .with_primary_label(span, label)
            .with_help(help)
            .with_code("P002");
        Self {
            kind: ParseErrorKind::UnsupportedConstruct(construct),
            diag: Box::new(diag),
        }
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    /// Returns the rejected construct for unsupported-construct failures.
    pub fn unsupported_construct(&self) -> Option<Unsupported> {
        match self.kind {
            ParseErrorKind::UnsupportedConstruct(construct) => Some(construct),
            ParseErrorKind::MalformedInput => None,
        }
    }

    pub fn is_malformed(&self) -> bool {
        self.kind == ParseErrorKind::MalformedInput
    }

    pub fn diag(&self) -> &Diag {
        &self.diag
    }

    /// Location of the offending token, if known.
    pub fn span(&self) -> Option<&Span> {
        self.diag.primary_span()
    }

    /// Renders this failure against the statement text with `miette`.
    pub fn to_report(&self, source: &str) -> Report {
        convert_diag_to_report(&self.diag, source)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diag.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_gets_default_code() {
        let error = ParseError::malformed(Diag::error("expected BY").with_primary_label(6..10, "here"));
        assert!(error.is_malformed());
        assert_eq!(error.diag().code.as_deref(), Some("P001"));
        assert_eq!(error.span(), Some(&(6..10)));
        assert_eq!(error.unsupported_construct(), None);
    }

    #[test]
    fn malformed_keeps_lexer_code() {
        let error = ParseError::malformed(Diag::error("unclosed string literal").with_code("L002"));
        assert_eq!(error.diag().code.as_deref(), Some("L002"));
    }

    #[test]
    fn unsupported_names_the_construct() {
        let error = ParseError::unsupported(Unsupported::SetOperator(TokenKind::Union), 16..21);
        assert_eq!(error.to_string(), "cannot support set operator UNION");
        assert_eq!(
            error.kind(),
            &ParseErrorKind::UnsupportedConstruct(Unsupported::SetOperator(TokenKind::Union))
        );
        assert!(!error.is_malformed());

        let subquery = ParseError::unsupported(Unsupported::Subquery, 14..15);
        assert_eq!(subquery.to_string(), "cannot support subquery as a table source");
        assert_eq!(subquery.diag().code.as_deref(), Some("P002"));
    }

    #[test]
    fn renders_as_report() {
        let error = ParseError::unsupported(Unsupported::Subquery, 14..15);
        let report = error.to_report("SELECT a FROM (SELECT 1) t");
        assert_eq!(report.to_string(), "cannot support subquery as a table source");
    }
}
