//! Spans and the scalar expression nodes handed back by the expression parser.

mod expression;
mod span;

pub use expression::Expression;
pub use span::{Span, Spanned};
