//! SELECT analysis for a SQL sharding layer.
//!
//! This library reads a single SELECT statement and records what a sharding
//! router and rewriter need to know about it: the projection (with aggregate
//! functions and the companions `AVG` needs across shards), the tables and
//! their aliases, sharding conditions from WHERE, grouping and ordering keys,
//! and positional edits that turn the logical statement into per-shard SQL.
//! Failures carry structured diagnostics rendered with miette.
//!
//! # Example
//!
//! ```
//! use sharding_parser::{Edit, parse_select};
//!
//! let sql = "SELECT AVG(price) FROM t_order o WHERE o.user_id = ? ORDER BY created";
//! let context = parse_select(sql).unwrap();
//!
//! assert_eq!(context.tables()[0].name, "t_order");
//! assert_eq!(context.conditions().len(), 1);
//!
//! let inserted: Vec<_> = context.column_insertions().collect();
//! assert_eq!(
//!     inserted,
//!     [
//!         "COUNT(price) AS sharding_gen_1 ",
//!         "SUM(price) AS sharding_gen_2 ",
//!         "created AS sharding_gen_3 ",
//!     ]
//! );
//! assert!(matches!(
//!     context.sorted_edits().last(),
//!     Some(Edit::IdentifierSubstitution { original, .. }) if original == "t_order"
//! ));
//! ```

pub mod ast;
pub mod context;
pub mod diag;
pub mod lexer;
pub mod normalize;
pub mod parser;

// Re-export syntax span primitives.
pub use ast::{Expression, Span, Spanned};

pub use context::{
    AggregationItem, AggregationKind, Column, CommonItem, Condition, ConditionOperator,
    ConditionValue, Edit, GroupByItem, Limit, LimitValue, OrderByItem, OrderDirection,
    SelectContext, SelectItem, TableRef,
};
pub use diag::{Diag, DiagLabel, LabelRole};
pub use lexer::token::{Token, TokenKind};
pub use lexer::{Lexer, LexerResult, tokenize};
pub use parser::{
    ClauseHook, Dialect, ParseError, ParseErrorKind, ParseResult, SelectParser, Unsupported,
};

/// Analyses `sql` with the generic dialect.
pub fn parse_select(sql: &str) -> ParseResult<SelectContext> {
    parse_select_with(sql, Dialect::generic())
}

/// Tokenizes and analyses `sql` with `dialect`.
///
/// The first lexer diagnostic, if any, is returned as a malformed-input error.
pub fn parse_select_with(sql: &str, dialect: Dialect) -> ParseResult<SelectContext> {
    let LexerResult {
        tokens,
        diagnostics,
    } = tokenize(sql);
    if let Some(diag) = diagnostics.into_iter().next() {
        return Err(ParseError::malformed(diag));
    }
    SelectParser::new(&tokens, sql, dialect).parse()
}
