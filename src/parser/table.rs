//! FROM clause: table sources, joins and join conditions.

use super::SelectParser;
use crate::context::{Edit, TableRef};
use crate::lexer::token::TokenKind;
use crate::normalize::exact_value;
use crate::parser::error::{ParseError, ParseResult, Unsupported};
use smol_str::SmolStr;

impl SelectParser<'_> {
    /// Parses an optional `FROM` clause with all of its joins.
    pub fn parse_from(&mut self) -> ParseResult<()> {
        if self.stream.consume(TokenKind::From) {
            self.parse_table()?;
        }
        Ok(())
    }

    /// Parses one table source followed by any joins.
    pub fn parse_table(&mut self) -> ParseResult<()> {
        if self.stream.check(TokenKind::LParen) {
            let span = self.stream.current().span.clone();
            tracing::debug!(target: "sharding_parser::parse", "rejecting subquery table source");
            return Err(ParseError::unsupported(Unsupported::Subquery, span));
        }
        self.parse_table_factor()?;
        self.parse_join_table()
    }

    fn parse_table_factor(&mut self) -> ParseResult<()> {
        let token = self.stream.current().clone();
        if !token.kind.is_identifier_like() {
            return Err(self.stream.error_here(if token.kind == TokenKind::Eof {
                "expected table name, found end of statement".to_string()
            } else {
                format!("expected table name, found '{}'", token.text)
            }));
        }
        self.stream.advance();

        if self.stream.consume(TokenKind::Dot) {
            // Schema-qualified sources are not rewritten.
            self.stream.advance();
            self.stream.parse_alias()?;
            tracing::debug!(
                target: "sharding_parser::parse",
                schema = %token.text,
                "skipping schema-qualified table"
            );
            return Ok(());
        }

        self.push_substitution(token.text.clone(), token.start());
        let alias = self.stream.parse_alias()?;
        tracing::debug!(
            target: "sharding_parser::parse",
            table = %token.text,
            alias = ?alias,
            "registered table"
        );
        self.context.tables.push(TableRef {
            name: exact_value(&token.text),
            raw_name: token.text,
            alias,
            span: token.span,
        });
        Ok(())
    }

    fn parse_join_table(&mut self) -> ParseResult<()> {
        if !self.stream.skip_join()? {
            return Ok(());
        }
        self.parse_table()?;
        if self.stream.consume(TokenKind::On) {
            loop {
                self.parse_table_condition()?;
                self.stream.expect(TokenKind::Eq)?;
                self.parse_table_condition()?;
                if !self.stream.consume(TokenKind::And) {
                    break;
                }
            }
        } else if self.stream.consume(TokenKind::Using) {
            self.stream.skip_parentheses()?;
        }
        self.parse_join_table()
    }

    /// Parses one side of an ON equality, recording a substitution when its
    /// owner is a registered table name.
    fn parse_table_condition(&mut self) -> ParseResult<()> {
        self.parse_table_expression()?;
        Ok(())
    }

    pub(super) fn push_substitution(&mut self, original: SmolStr, position: usize) {
        self.context
            .edits
            .push(Edit::IdentifierSubstitution { position, original });
    }
}
