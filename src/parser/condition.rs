//! WHERE and HAVING predicates.
//!
//! Predicates are walked rather than modelled: the walk consumes every token
//! of the clause and keeps the simple `column = v`, `column IN (...)` and
//! `column BETWEEN v AND v` shapes a router can shard on. Conditions are only
//! kept when the whole clause is a conjunction.

use super::SelectParser;
use crate::ast::Expression;
use crate::context::{Column, Condition, ConditionOperator, ConditionValue};
use crate::lexer::token::TokenKind;
use crate::normalize::exact_value;
use crate::parser::error::ParseResult;

fn column_of(expression: &Expression) -> Option<Column> {
    match expression {
        Expression::Identifier { name, .. } => Some(Column {
            owner: None,
            name: exact_value(name),
        }),
        Expression::Property { owner, name, .. } => Some(Column {
            owner: Some(owner.normalized()),
            name: exact_value(name),
        }),
        _ => None,
    }
}

fn value_of(expression: &Expression) -> Option<ConditionValue> {
    match expression {
        Expression::Number { value, .. } | Expression::Text { value, .. } => {
            Some(ConditionValue::Literal(value.clone()))
        }
        Expression::Parameter { index, .. } => Some(ConditionValue::Parameter(*index)),
        _ => None,
    }
}

/// Collects the values of an IN list or BETWEEN bounds; `None` if any is not
/// a literal or placeholder.
fn values_of(expressions: &[Expression]) -> Option<Vec<ConditionValue>> {
    expressions.iter().map(value_of).collect()
}

fn equal_condition(left: &Expression, right: &Expression) -> Option<Condition> {
    let (column, value) = match (column_of(left), column_of(right)) {
        (Some(column), None) => (column, value_of(right)?),
        (None, Some(column)) => (column, value_of(left)?),
        _ => return None,
    };
    Some(Condition {
        column,
        operator: ConditionOperator::Equal,
        values: vec![value],
    })
}

impl SelectParser<'_> {
    /// Parses an optional WHERE clause.
    ///
    /// Without any registered table the clause is left for later steps, which
    /// matches statements such as `SELECT 1` or schema-qualified sources.
    pub(super) fn parse_where(&mut self) -> ParseResult<()> {
        if self.context.tables.is_empty() {
            return Ok(());
        }
        if self.stream.consume(TokenKind::Where) {
            if let Some(conditions) = self.parse_predicates()? {
                tracing::debug!(
                    target: "sharding_parser::parse",
                    conditions = conditions.len(),
                    "collected sharding conditions"
                );
                self.context.conditions = conditions;
            }
        }
        self.context.parameter_index = self.stream.parameter_index();
        Ok(())
    }

    /// Walks a HAVING clause; nothing is recorded.
    pub(super) fn parse_having(&mut self) -> ParseResult<()> {
        self.parse_predicates()?;
        Ok(())
    }

    /// Walks an AND/OR chain of predicates.
    ///
    /// Returns `None` if any top-level `OR` was seen.
    fn parse_predicates(&mut self) -> ParseResult<Option<Vec<Condition>>> {
        let mut conditions = Vec::new();
        let mut disjunctive = false;
        loop {
            if let Some(condition) = self.parse_predicate()? {
                conditions.push(condition);
            }
            if self
                .stream
                .consume_any(&[TokenKind::And, TokenKind::DoubleAmp])
            {
                continue;
            }
            if self.stream.consume(TokenKind::Or) {
                disjunctive = true;
                continue;
            }
            break;
        }
        Ok(if disjunctive { None } else { Some(conditions) })
    }

    fn parse_predicate(&mut self) -> ParseResult<Option<Condition>> {
        let mut negated = false;
        while self.stream.consume_any(&[TokenKind::Not, TokenKind::Bang]) {
            negated = !negated;
        }

        let left = self.parse_table_expression()?;
        if self.stream.consume(TokenKind::Not) {
            negated = true;
        }

        let condition = match self.stream.kind() {
            TokenKind::Eq => {
                self.stream.advance();
                let right = self.parse_table_expression()?;
                equal_condition(&left, &right)
            }
            TokenKind::In => {
                self.stream.advance();
                let values = self.parse_in_list()?;
                column_of(&left).zip(values).map(|(column, values)| Condition {
                    column,
                    operator: ConditionOperator::In,
                    values,
                })
            }
            TokenKind::Between => {
                self.stream.advance();
                let low = self.parse_table_expression()?;
                self.stream.expect(TokenKind::And)?;
                let high = self.parse_table_expression()?;
                column_of(&left)
                    .zip(values_of(&[low, high]))
                    .map(|(column, values)| Condition {
                        column,
                        operator: ConditionOperator::Between,
                        values,
                    })
            }
            TokenKind::Is => {
                self.stream.advance();
                self.stream.consume(TokenKind::Not);
                self.stream
                    .expect_any(&[TokenKind::Null, TokenKind::True, TokenKind::False])?;
                None
            }
            TokenKind::Like => {
                self.stream.advance();
                self.parse_table_expression()?;
                None
            }
            kind if kind.is_comparison() => {
                self.stream.advance();
                self.parse_table_expression()?;
                None
            }
            _ => None,
        };

        Ok(if negated { None } else { condition })
    }

    /// Parses `( v, ... )` after IN. A subquery is skipped and yields `None`.
    fn parse_in_list(&mut self) -> ParseResult<Option<Vec<ConditionValue>>> {
        if self.stream.peek().kind == TokenKind::Select {
            self.stream.skip_parentheses()?;
            return Ok(None);
        }
        self.stream.expect(TokenKind::LParen)?;
        let mut expressions = Vec::new();
        loop {
            expressions.push(self.parse_table_expression()?);
            if !self.stream.consume(TokenKind::Comma) {
                break;
            }
        }
        self.stream.expect(TokenKind::RParen)?;
        Ok(values_of(&expressions))
    }
}
