//! Scalar expression nodes.

use super::{Span, Spanned};
use smol_str::SmolStr;

/// A parsed scalar operand.
///
/// Only the shapes the rewrite planner inspects are modelled precisely;
/// everything else (function calls, arithmetic, CASE, ...) collapses into
/// [`Expression::Other`] and is passed through untouched.
/// Names are kept exactly as written, quotes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// A bare column or alias name, e.g. `user_id`.
    Identifier { name: SmolStr, span: Span },
    /// An owner-qualified reference, e.g. `o.user_id`.
    Property {
        owner: Spanned<SmolStr>,
        name: SmolStr,
        span: Span,
    },
    /// A numeric literal, e.g. `2` or `1.5`.
    Number { value: SmolStr, span: Span },
    /// A positional `?` placeholder with its zero-based index.
    Parameter { index: usize, span: Span },
    /// A string literal with its quotes removed.
    Text { value: SmolStr, span: Span },
    /// Any operand this layer does not interpret.
    Other { span: Span },
}

impl Expression {
    /// Returns the source span of the whole operand.
    pub fn span(&self) -> &Span {
        match self {
            Expression::Identifier { span, .. }
            | Expression::Property { span, .. }
            | Expression::Number { span, .. }
            | Expression::Parameter { span, .. }
            | Expression::Text { span, .. }
            | Expression::Other { span } => span,
        }
    }

    /// Returns the numeric value truncated to an integer, if this is a number.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Expression::Number { value, .. } => value
                .parse::<i64>()
                .ok()
                .or_else(|| value.parse::<f64>().ok().map(|v| v.trunc() as i64)),
            _ => None,
        }
    }

    /// Returns true for operands that name a column.
    pub fn is_column(&self) -> bool {
        matches!(
            self,
            Expression::Identifier { .. } | Expression::Property { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_of_every_variant() {
        let property = Expression::Property {
            owner: Spanned::new("o".into(), 0..1),
            name: "id".into(),
            span: 0..4,
        };
        assert_eq!(property.span(), &(0..4));
        assert_eq!(Expression::Other { span: 5..9 }.span(), &(5..9));
        let text = Expression::Text {
            value: "x".into(),
            span: 2..5,
        };
        assert_eq!(text.span(), &(2..5));
    }

    #[test]
    fn numbers_convert_to_integers() {
        let int = Expression::Number {
            value: "2".into(),
            span: 0..1,
        };
        let float = Expression::Number {
            value: "3.7".into(),
            span: 0..3,
        };
        assert_eq!(int.as_integer(), Some(2));
        assert_eq!(float.as_integer(), Some(3));
        assert_eq!(Expression::Other { span: 0..1 }.as_integer(), None);
    }

    #[test]
    fn columns_are_identifiers_and_properties() {
        let ident = Expression::Identifier {
            name: "name".into(),
            span: 0..4,
        };
        assert!(ident.is_column());
        assert!(!Expression::Parameter { index: 0, span: 0..1 }.is_column());
    }
}
