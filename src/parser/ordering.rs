//! ORDER BY, GROUP BY and projection alias resolution.

use super::SelectParser;
use crate::ast::Expression;
use crate::context::{GroupByItem, OrderByItem, OrderDirection, qualify};
use crate::lexer::token::TokenKind;
use crate::normalize::{exact_value, same_name};
use crate::parser::error::ParseResult;
use smol_str::{SmolStr, format_smolstr};

/// Splits a column reference into its normalized owner and name.
fn column_parts(expression: &Expression) -> Option<(Option<SmolStr>, SmolStr)> {
    match expression {
        Expression::Identifier { name, .. } => Some((None, exact_value(name))),
        Expression::Property { owner, name, .. } => {
            Some((Some(owner.normalized()), exact_value(name)))
        }
        _ => None,
    }
}

impl SelectParser<'_> {
    /// Parses an optional `ORDER [SIBLINGS] BY` clause and returns its items.
    ///
    /// Items are returned rather than stored so dialects that allow ORDER BY
    /// in other positions can reuse the parser; derived column insertions are
    /// still queued as a side effect.
    pub fn parse_order_by(&mut self) -> ParseResult<Vec<OrderByItem>> {
        if !self.stream.consume(TokenKind::Order) {
            return Ok(Vec::new());
        }
        self.stream.consume(TokenKind::Siblings);
        self.stream.expect(TokenKind::By)?;

        let mut items = Vec::new();
        loop {
            if let Some(item) = self.parse_order_by_item()? {
                items.push(item);
            }
            if !self.stream.consume(TokenKind::Comma) {
                break;
            }
        }
        Ok(items)
    }

    fn parse_order_by_item(&mut self) -> ParseResult<Option<OrderByItem>> {
        let expression = self.parse_table_expression()?;
        let direction = self.parse_direction();

        if let Expression::Number { .. } = expression {
            return Ok(expression
                .as_integer()
                .and_then(|index| usize::try_from(index).ok())
                .map(|index| OrderByItem::ByPosition { index, direction }));
        }
        let Some((owner, name)) = column_parts(&expression) else {
            return Ok(None);
        };

        let qualified = qualify(owner.as_deref(), &name);
        let alias = self.resolve_alias(&qualified);
        self.inject_missing_column(&qualified, alias.as_ref());
        Ok(Some(OrderByItem::ByName {
            owner,
            name,
            direction,
            alias,
        }))
    }

    pub(super) fn parse_group_by(&mut self) -> ParseResult<()> {
        if self.stream.consume(TokenKind::Group) {
            self.stream.expect(TokenKind::By)?;
            loop {
                self.parse_group_by_item()?;
                if !self.stream.consume(TokenKind::Comma) {
                    break;
                }
            }
            while self.stream.consume_any(&[TokenKind::With, TokenKind::Rollup]) {}
        }
        if self.stream.consume(TokenKind::Having) {
            self.parse_having()?;
        }
        Ok(())
    }

    fn parse_group_by_item(&mut self) -> ParseResult<()> {
        let expression = self.parse_table_expression()?;
        let direction = self.parse_direction();
        let Some((owner, name)) = column_parts(&expression) else {
            return Ok(());
        };

        let qualified = qualify(owner.as_deref(), &name);
        let alias = self.resolve_alias(&qualified);
        self.context.group_by.push(GroupByItem {
            owner,
            name,
            direction,
            alias: alias.clone(),
        });
        self.inject_missing_column(&qualified, alias.as_ref());
        Ok(())
    }

    fn parse_direction(&mut self) -> OrderDirection {
        if self.stream.consume(TokenKind::Desc) {
            OrderDirection::Desc
        } else {
            self.stream.consume(TokenKind::Asc);
            OrderDirection::Asc
        }
    }

    /// Finds the projection alias the merge layer should read `name` from.
    ///
    /// With `*` in the projection no alias is needed. An item whose expression
    /// is `name` lends its own alias (possibly none); an item aliased `name`
    /// yields `name`. Otherwise a fresh derived alias is generated.
    fn resolve_alias(&mut self, name: &str) -> Option<SmolStr> {
        if self.context.contains_star {
            return None;
        }
        let raw = exact_value(name);
        for item in &self.context.items {
            if same_name(&exact_value(item.expression()), &raw) {
                return item.alias().map(SmolStr::new);
            }
            if item
                .alias()
                .is_some_and(|alias| same_name(alias, &raw))
            {
                return Some(raw);
            }
        }
        Some(self.generate_alias())
    }

    /// Queues `<expression> AS <alias> ` when no projection item provides the
    /// column and an alias exists to expose it under.
    fn inject_missing_column(&mut self, expression: &str, alias: Option<&SmolStr>) {
        let present = self
            .context
            .items
            .iter()
            .any(|item| item.matches(expression));
        if present {
            return;
        }
        if let Some(alias) = alias {
            self.queue_column_insertion(format_smolstr!("{expression} AS {alias} "));
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::context::{OrderByItem, OrderDirection, SelectContext};
    use crate::lexer::tokenize;
    use crate::parser::{Dialect, ParseResult, SelectParser};

    fn analyse(sql: &str) -> ParseResult<SelectContext> {
        let tokens = tokenize(sql).tokens;
        SelectParser::new(&tokens, sql, Dialect::generic()).parse()
    }

    #[test]
    fn order_by_existing_column_reuses_its_alias() {
        let context = analyse("SELECT name AS n FROM t ORDER BY name DESC").unwrap();
        assert_eq!(
            context.order_by(),
            [OrderByItem::ByName {
                owner: None,
                name: "name".into(),
                direction: OrderDirection::Desc,
                alias: Some("n".into()),
            }]
        );
        assert_eq!(context.column_insertions().count(), 0);
    }

    #[test]
    fn order_by_alias_name() {
        let context = analyse("SELECT COUNT(*) AS cnt FROM t ORDER BY cnt").unwrap();
        assert_eq!(context.order_by()[0].alias(), Some("cnt"));
        assert_eq!(context.column_insertions().count(), 0);
    }

    #[test]
    fn order_by_unaliased_projection_column() {
        let context = analyse("SELECT name FROM t ORDER BY name").unwrap();
        assert_eq!(context.order_by()[0].alias(), None);
        assert_eq!(context.column_insertions().count(), 0);
    }

    #[test]
    fn order_by_missing_column_is_injected() {
        let sql = "SELECT a FROM t ORDER BY t.b, c ASC";
        let context = analyse(sql).unwrap();
        assert_eq!(context.order_by()[0].alias(), Some("sharding_gen_1"));
        assert_eq!(context.order_by()[1].alias(), Some("sharding_gen_2"));
        assert_eq!(context.order_by()[1].direction(), OrderDirection::Asc);
        let inserted: Vec<_> = context.column_insertions().collect();
        assert_eq!(inserted, ["t.b AS sharding_gen_1 ", "c AS sharding_gen_2 "]);
        assert!(context
            .edits()
            .iter()
            .filter(|edit| edit.is_column_insertion())
            .all(|edit| edit.position() == 9));
    }

    #[test]
    fn star_projection_needs_no_alias() {
        let context = analyse("SELECT * FROM t ORDER BY b").unwrap();
        assert_eq!(context.order_by()[0].alias(), None);
        assert_eq!(context.column_insertions().count(), 0);
    }

    #[test]
    fn positional_and_opaque_items() {
        let context = analyse("SELECT a, b FROM t ORDER BY 2 DESC, UPPER(a), 1").unwrap();
        assert_eq!(
            context.order_by(),
            [
                OrderByItem::ByPosition {
                    index: 2,
                    direction: OrderDirection::Desc
                },
                OrderByItem::ByPosition {
                    index: 1,
                    direction: OrderDirection::Asc
                },
            ]
        );
    }

    #[test]
    fn order_siblings_by() {
        let context = analyse("SELECT a FROM t ORDER SIBLINGS BY a").unwrap();
        assert_eq!(context.order_by().len(), 1);
    }

    #[test]
    fn order_without_by_is_malformed() {
        let error = analyse("SELECT a FROM t ORDER a").unwrap_err();
        assert!(error.is_malformed());
        assert_eq!(error.to_string(), "expected BY, found 'a'");
    }

    #[test]
    fn group_by_items_and_rollup() {
        let context =
            analyse("SELECT user_id, SUM(x) FROM t GROUP BY user_id DESC, o.status WITH ROLLUP")
                .unwrap();
        let group_by = context.group_by();
        assert_eq!(group_by.len(), 2);
        assert_eq!(group_by[0].name, "user_id");
        assert_eq!(group_by[0].direction, OrderDirection::Desc);
        assert_eq!(group_by[0].alias, None);
        assert_eq!(group_by[1].qualified_name(), "o.status");
        assert_eq!(group_by[1].alias.as_deref(), Some("sharding_gen_1"));
        let inserted: Vec<_> = context.column_insertions().collect();
        assert_eq!(inserted, ["o.status AS sharding_gen_1 "]);
    }

    #[test]
    fn group_by_then_order_by_share_the_alias_counter() {
        let context = analyse("SELECT AVG(x) FROM t GROUP BY a ORDER BY b").unwrap();
        assert_eq!(context.group_by()[0].alias.as_deref(), Some("sharding_gen_3"));
        assert_eq!(context.order_by()[0].alias(), Some("sharding_gen_4"));
        assert_eq!(context.column_insertions().count(), 4);
    }

    #[test]
    fn group_by_alias_reference_is_not_injected() {
        let context = analyse("SELECT status AS s, COUNT(*) FROM t GROUP BY s").unwrap();
        assert_eq!(context.group_by()[0].alias.as_deref(), Some("s"));
        assert_eq!(context.column_insertions().count(), 0);
    }
}
