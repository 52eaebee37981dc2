//! Dialect configuration.
//!
//! The clause walk is dialect-neutral; a [`Dialect`] toggles `DISTINCT ON`
//! support and supplies optional hooks that run at fixed points of the walk.
//! Hooks receive the whole parser so they can read tokens, consume them and
//! record results in the context.

use crate::context::{Limit, LimitValue};
use crate::lexer::token::TokenKind;
use crate::parser::SelectParser;
use crate::parser::error::ParseResult;
use std::fmt;

/// A dialect-specific clause parser invoked at a fixed point of the walk.
pub type ClauseHook = fn(&mut SelectParser<'_>) -> ParseResult<()>;

/// Dialect-specific behaviour of the SELECT analysis.
#[derive(Clone, Copy)]
pub struct Dialect {
    pub name: &'static str,
    /// Whether `DISTINCT ON (...)` is recognised after `DISTINCT`.
    pub supports_distinct_on: bool,
    /// Runs after GROUP BY / HAVING.
    pub after_group_by: Option<ClauseHook>,
    /// Replaces the default set-operator rejection after the query body.
    pub query_rest: Option<ClauseHook>,
    /// Runs after ORDER BY; pagination and locking clauses live here.
    pub after_order_by: Option<ClauseHook>,
}

impl Dialect {
    /// No hooks and no `DISTINCT ON`.
    pub const fn generic() -> Self {
        Self {
            name: "generic",
            supports_distinct_on: false,
            after_group_by: None,
            query_rest: None,
            after_order_by: None,
        }
    }

    /// MySQL: `LIMIT n`, `LIMIT offset, n`, `LIMIT n OFFSET m`, then
    /// `FOR UPDATE` or `LOCK IN SHARE MODE`.
    pub const fn mysql() -> Self {
        Self {
            name: "mysql",
            supports_distinct_on: false,
            after_group_by: None,
            query_rest: None,
            after_order_by: Some(parse_mysql_trailing_clauses),
        }
    }

    /// PostgreSQL: `DISTINCT ON`, `LIMIT`/`OFFSET`/`FETCH` in any order, and
    /// `FOR UPDATE | SHARE [NOWAIT]`.
    pub const fn postgresql() -> Self {
        Self {
            name: "postgresql",
            supports_distinct_on: true,
            after_group_by: None,
            query_rest: None,
            after_order_by: Some(parse_postgresql_trailing_clauses),
        }
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::generic()
    }
}

impl fmt::Debug for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dialect")
            .field("name", &self.name)
            .field("supports_distinct_on", &self.supports_distinct_on)
            .field("after_group_by", &self.after_group_by.is_some())
            .field("query_rest", &self.query_rest.is_some())
            .field("after_order_by", &self.after_order_by.is_some())
            .finish()
    }
}

/// Parses a row count or offset: an integer literal or a `?` placeholder.
fn parse_limit_value(parser: &mut SelectParser<'_>) -> ParseResult<LimitValue> {
    let stream = parser.stream_mut();
    let token = stream.current().clone();
    match token.kind {
        TokenKind::IntegerLiteral => {
            let value = token.text.parse::<i64>().map_err(|_| {
                stream.error_here(format!("row count {} is out of range", token.text))
            })?;
            stream.advance();
            Ok(LimitValue::Literal {
                value,
                span: token.span,
            })
        }
        TokenKind::Parameter => {
            stream.advance();
            let index = stream.next_parameter();
            let consumed = stream.parameter_index();
            parser.context_mut().set_parameter_index(consumed);
            Ok(LimitValue::Parameter {
                index,
                span: token.span,
            })
        }
        _ => Err(stream.error_here(format!(
            "expected row count, found '{}'",
            token.text
        ))),
    }
}

fn parse_mysql_trailing_clauses(parser: &mut SelectParser<'_>) -> ParseResult<()> {
    if parser.stream_mut().consume(TokenKind::Limit) {
        let first = parse_limit_value(parser)?;
        let limit = if parser.stream_mut().consume(TokenKind::Comma) {
            Limit {
                offset: Some(first),
                row_count: Some(parse_limit_value(parser)?),
            }
        } else if parser.stream_mut().consume(TokenKind::Offset) {
            Limit {
                offset: Some(parse_limit_value(parser)?),
                row_count: Some(first),
            }
        } else {
            Limit {
                offset: None,
                row_count: Some(first),
            }
        };
        tracing::debug!(target: "sharding_parser::parse", ?limit, "parsed LIMIT");
        parser.context_mut().set_limit(limit);
    }

    let stream = parser.stream_mut();
    if stream.consume(TokenKind::For) {
        stream.expect(TokenKind::Update)?;
    } else if stream.consume(TokenKind::Lock) {
        stream.expect(TokenKind::In)?;
        stream.expect(TokenKind::Share)?;
        stream.expect(TokenKind::Mode)?;
    }
    Ok(())
}

fn parse_postgresql_trailing_clauses(parser: &mut SelectParser<'_>) -> ParseResult<()> {
    let mut limit = Limit::default();
    loop {
        let stream = parser.stream_mut();
        if stream.consume(TokenKind::Limit) {
            if !stream.consume(TokenKind::All) {
                limit.row_count = Some(parse_limit_value(parser)?);
            }
        } else if stream.consume(TokenKind::Offset) {
            limit.offset = Some(parse_limit_value(parser)?);
            parser
                .stream_mut()
                .consume_any(&[TokenKind::Row, TokenKind::Rows]);
        } else if stream.consume(TokenKind::Fetch) {
            stream.expect_any(&[TokenKind::First, TokenKind::Next])?;
            if !parser
                .stream()
                .check_any(&[TokenKind::Row, TokenKind::Rows])
            {
                limit.row_count = Some(parse_limit_value(parser)?);
            }
            let stream = parser.stream_mut();
            stream.expect_any(&[TokenKind::Row, TokenKind::Rows])?;
            stream.expect(TokenKind::Only)?;
        } else if stream.consume(TokenKind::For) {
            stream.expect_any(&[TokenKind::Update, TokenKind::Share])?;
            stream.consume(TokenKind::Nowait);
        } else {
            break;
        }
    }
    if limit != Limit::default() {
        tracing::debug!(target: "sharding_parser::parse", ?limit, "parsed LIMIT/OFFSET");
        parser.context_mut().set_limit(limit);
    }
    Ok(())
}
