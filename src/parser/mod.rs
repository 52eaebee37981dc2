//! SELECT statement analysis.
//!
//! [`SelectParser`] walks a lexed statement clause by clause and records what
//! a sharding router needs into a [`SelectContext`]: the select items, the
//! tables, the ordering and grouping keys, the WHERE conditions and the edits
//! required to rewrite the statement per shard. Dialect-specific clauses are
//! delegated to the hooks of a [`Dialect`].

pub mod base;
mod condition;
pub mod dialect;
pub mod error;
pub mod expression;
mod ordering;
mod projection;
mod table;

use crate::ast::{Expression, Spanned};
use crate::context::{Edit, SelectContext};
use crate::lexer::token::{Token, TokenKind};
use smol_str::{SmolStr, format_smolstr};
use tracing::field;

pub use base::TokenStream;
pub use dialect::{ClauseHook, Dialect};
pub use error::{ParseError, ParseErrorKind, ParseResult, Unsupported};
pub use expression::ExpressionParser;

/// Prefix of the aliases generated for derived columns.
pub const DERIVED_ALIAS_PREFIX: &str = "sharding_gen_";

/// Single-use analyser for one SELECT statement.
pub struct SelectParser<'a> {
    stream: TokenStream<'a>,
    dialect: Dialect,
    context: SelectContext,
    derived_column_offset: usize,
    /// Column insertions waiting for the final select-list end position.
    column_insertions: Vec<SmolStr>,
    /// `owner.` fragments seen in the select list, resolved once tables are known.
    owner_candidates: Vec<Spanned<SmolStr>>,
}

impl<'a> SelectParser<'a> {
    /// Creates a parser over `tokens`, lexed from `source`.
    pub fn new(tokens: &'a [Token], source: &'a str, dialect: Dialect) -> Self {
        Self {
            stream: TokenStream::new(tokens, source),
            dialect,
            context: SelectContext::default(),
            derived_column_offset: 0,
            column_insertions: Vec::new(),
            owner_candidates: Vec::new(),
        }
    }

    /// Analyses the whole statement and returns the populated context.
    pub fn parse(mut self) -> ParseResult<SelectContext> {
        let span = tracing::debug_span!(
            target: "sharding_parser::parse",
            "parse_select",
            dialect = self.dialect.name,
            items = field::Empty,
            tables = field::Empty,
            edits = field::Empty,
        );
        let _guard = span.enter();

        let result = self.parse_statement();
        if let Err(error) = &result {
            tracing::debug!(
                target: "sharding_parser::parse",
                error = %error,
                "select analysis failed"
            );
        }
        result?;

        span.record("items", self.context.items.len());
        span.record("tables", self.context.tables.len());
        span.record("edits", self.context.edits.len());
        Ok(self.context)
    }

    fn parse_statement(&mut self) -> ParseResult<()> {
        self.query()?;
        let order_by = self.parse_order_by()?;
        self.context.order_by.extend(order_by);
        let after_order_by = self.dialect.after_order_by;
        if let Some(hook) = after_order_by {
            hook(self)?;
        }
        self.flush_column_insertions();
        Ok(())
    }

    fn query(&mut self) -> ParseResult<()> {
        self.stream.expect(TokenKind::Select)?;
        self.parse_distinct()?;
        self.parse_select_list()?;
        self.parse_from()?;
        self.resolve_owner_candidates();
        self.parse_where()?;
        self.parse_group_by()?;
        let after_group_by = self.dialect.after_group_by;
        if let Some(hook) = after_group_by {
            hook(self)?;
        }
        let query_rest = self.dialect.query_rest;
        match query_rest {
            Some(hook) => hook(self),
            None => self.reject_set_operators(),
        }
    }

    /// Fails if the current token starts a set operation.
    ///
    /// This is the default query-rest behaviour; dialect hooks that replace it
    /// can call it to keep the rejection.
    pub fn reject_set_operators(&mut self) -> ParseResult<()> {
        let token = self.stream.current();
        if !token.kind.is_set_operator() {
            return Ok(());
        }
        tracing::debug!(
            target: "sharding_parser::parse",
            operator = %token.kind,
            "rejecting set operator"
        );
        Err(ParseError::unsupported(
            Unsupported::SetOperator(token.kind),
            token.span.clone(),
        ))
    }

    /// Parses one operand at the current position.
    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        ExpressionParser::new(&mut self.stream).parse_expression()
    }

    /// Parses one operand and, when it is a column whose owner names a
    /// registered table, records a substitution at the owner.
    pub fn parse_table_expression(&mut self) -> ParseResult<Expression> {
        let expression = self.parse_expression()?;
        if let Expression::Property { owner, .. } = &expression {
            let name = owner.normalized();
            if self.context.tables.iter().any(|table| table.is_named(&name)) {
                self.push_substitution(owner.node.clone(), owner.start());
            }
        }
        Ok(expression)
    }

    /// Overrides the running positional-parameter counter.
    pub fn set_parameter_index(&mut self, index: usize) {
        self.stream.set_parameter_index(index);
    }

    pub fn parameter_index(&self) -> usize {
        self.stream.parameter_index()
    }

    pub fn stream(&self) -> &TokenStream<'a> {
        &self.stream
    }

    /// Mutable access to the token stream, for dialect hooks.
    pub fn stream_mut(&mut self) -> &mut TokenStream<'a> {
        &mut self.stream
    }

    pub fn context(&self) -> &SelectContext {
        &self.context
    }

    /// Mutable access to the context under construction, for dialect hooks.
    pub fn context_mut(&mut self) -> &mut SelectContext {
        &mut self.context
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Produces the next `sharding_gen_<n>` alias.
    fn generate_alias(&mut self) -> SmolStr {
        self.derived_column_offset += 1;
        let alias = format_smolstr!("{DERIVED_ALIAS_PREFIX}{}", self.derived_column_offset);
        tracing::debug!(
            target: "sharding_parser::parse",
            alias = %alias,
            "generated derived column alias"
        );
        alias
    }

    fn queue_column_insertion(&mut self, text: SmolStr) {
        self.column_insertions.push(text);
    }

    fn flush_column_insertions(&mut self) {
        let position = self.context.select_list_end_position;
        for text in self.column_insertions.drain(..) {
            self.context
                .edits
                .push(Edit::ColumnInsertion { position, text });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn analyse(sql: &str) -> ParseResult<SelectContext> {
        let tokens = tokenize(sql).tokens;
        SelectParser::new(&tokens, sql, Dialect::generic()).parse()
    }

    #[test]
    fn requires_select_keyword() {
        let error = analyse("UPDATE t SET a = 1").unwrap_err();
        assert!(error.is_malformed());
        assert_eq!(error.to_string(), "expected SELECT, found 'UPDATE'");
    }

    #[test]
    fn derived_aliases_count_from_one() {
        let context = analyse("SELECT AVG(a), b FROM t ORDER BY c").unwrap();
        let aliases: Vec<_> = context
            .column_insertions()
            .map(str::to_string)
            .collect();
        assert_eq!(
            aliases,
            [
                "COUNT(a) AS sharding_gen_1 ",
                "SUM(a) AS sharding_gen_2 ",
                "c AS sharding_gen_3 ",
            ]
        );
    }

    #[test]
    fn set_operator_rejected_after_group_by() {
        let error = analyse("SELECT a FROM t GROUP BY a EXCEPT SELECT a FROM u").unwrap_err();
        assert_eq!(
            error.unsupported_construct(),
            Some(Unsupported::SetOperator(TokenKind::Except))
        );
    }

    #[test]
    fn parameter_index_can_be_overridden() {
        let sql = "SELECT a FROM t WHERE a = ?";
        let tokens = tokenize(sql).tokens;
        let mut parser = SelectParser::new(&tokens, sql, Dialect::generic());
        parser.set_parameter_index(3);
        assert_eq!(parser.parameter_index(), 3);
        let context = parser.parse().unwrap();
        assert_eq!(context.parameter_index(), 4);
    }
}
