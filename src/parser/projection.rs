//! DISTINCT handling and the select list.

use super::SelectParser;
use crate::ast::{Span, Spanned};
use crate::context::{AggregationItem, AggregationKind, CommonItem, SelectItem};
use crate::lexer::token::TokenKind;
use crate::normalize::exact_value;
use crate::parser::error::ParseResult;
use smol_str::{SmolStr, format_smolstr};

/// Tokens that end an accumulated projection expression.
const ITEM_TERMINATORS: &[TokenKind] = &[
    TokenKind::As,
    TokenKind::Comma,
    TokenKind::From,
    TokenKind::Eof,
    TokenKind::Semicolon,
];

fn aggregation_kind(kind: TokenKind) -> Option<AggregationKind> {
    match kind {
        TokenKind::Max => Some(AggregationKind::Max),
        TokenKind::Min => Some(AggregationKind::Min),
        TokenKind::Sum => Some(AggregationKind::Sum),
        TokenKind::Avg => Some(AggregationKind::Avg),
        TokenKind::Count => Some(AggregationKind::Count),
        _ => None,
    }
}

impl SelectParser<'_> {
    pub(super) fn parse_distinct(&mut self) -> ParseResult<()> {
        if self.stream.consume_any(&[
            TokenKind::Distinct,
            TokenKind::Distinctrow,
            TokenKind::Union,
        ]) {
            self.context.distinct = true;
            if self.dialect.supports_distinct_on && self.stream.consume(TokenKind::On) {
                self.stream.skip_parentheses()?;
            }
        } else {
            self.stream.consume(TokenKind::All);
        }
        Ok(())
    }

    pub(super) fn parse_select_list(&mut self) -> ParseResult<()> {
        let mut ordinal = 1;
        loop {
            let item = self.parse_select_item(ordinal)?;
            if item.is_star() {
                self.context.contains_star = true;
            }
            self.context.items.push(item);
            ordinal += 1;
            if !self.stream.consume(TokenKind::Comma) {
                break;
            }
        }
        self.context.select_list_end_position = self.stream.current().start();
        self.derive_average_columns();
        Ok(())
    }

    fn parse_select_item(&mut self, ordinal: usize) -> ParseResult<SelectItem> {
        let token = self.stream.current().clone();

        if token.kind == TokenKind::Star || exact_value(&token.text) == "*" {
            self.stream.advance();
            return Ok(SelectItem::Common(CommonItem {
                expression: SmolStr::new_static("*"),
                alias: self.stream.parse_alias()?,
                is_star: true,
            }));
        }

        let mut expression = String::new();
        if let Some(kind) = aggregation_kind(token.kind) {
            if self.stream.peek().kind == TokenKind::LParen {
                self.stream.advance();
                let inner = self.stream.skip_parentheses()?;
                if !self.stream.kind().is_composite_operator() {
                    return Ok(SelectItem::Aggregation(AggregationItem::new(
                        kind,
                        inner,
                        self.stream.parse_alias()?,
                        Some(ordinal),
                    )));
                }
                expression.push_str(&token.text);
                expression.push_str(&inner);
            }
        }

        // Opening parentheses not yet closed; terminators inside them are
        // part of the item.
        let mut open_groups: Vec<Span> = Vec::new();
        loop {
            let fragment = self.stream.current().clone();
            match fragment.kind {
                TokenKind::Eof if !open_groups.is_empty() => {
                    let open = open_groups.swap_remove(0);
                    return Err(self.stream.unclosed_parenthesis(open));
                }
                kind if open_groups.is_empty()
                    && (ITEM_TERMINATORS.contains(&kind) || kind.is_set_operator()) =>
                {
                    break;
                }
                TokenKind::LParen => open_groups.push(fragment.span.clone()),
                TokenKind::RParen => {
                    open_groups.pop();
                }
                TokenKind::Parameter => {
                    self.stream.next_parameter();
                }
                _ => {}
            }
            expression.push_str(&fragment.text);
            self.stream.advance();
            if fragment.kind.is_identifier_like() && self.stream.check(TokenKind::Dot) {
                self.owner_candidates
                    .push(Spanned::new(fragment.text, fragment.span));
            }
        }

        Ok(SelectItem::Common(CommonItem {
            expression: exact_value(&expression),
            alias: self.stream.parse_alias()?,
            is_star: false,
        }))
    }

    /// Attaches `COUNT` and `SUM` companions to every `AVG` item.
    ///
    /// Runs once the select list is complete so all AVG aliases are generated
    /// before any ORDER BY or GROUP BY alias.
    fn derive_average_columns(&mut self) {
        let averages: Vec<(usize, SmolStr)> = self
            .context
            .items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match item {
                SelectItem::Aggregation(item) if item.kind == AggregationKind::Avg => {
                    Some((index, item.inner_expression.clone()))
                }
                _ => None,
            })
            .collect();

        for (index, inner) in averages {
            let mut derived = Vec::with_capacity(2);
            for kind in [AggregationKind::Count, AggregationKind::Sum] {
                let alias = self.generate_alias();
                self.queue_column_insertion(format_smolstr!("{kind}{inner} AS {alias} "));
                derived.push(AggregationItem::new(kind, inner.clone(), Some(alias), None));
            }
            if let Some(SelectItem::Aggregation(item)) = self.context.items.get_mut(index) {
                item.derived = derived;
            }
        }
    }

    /// Turns select-list `owner.` fragments that name a registered table into
    /// identifier substitutions.
    pub(super) fn resolve_owner_candidates(&mut self) {
        for candidate in std::mem::take(&mut self.owner_candidates) {
            let owner = candidate.normalized();
            if self.context.tables.iter().any(|table| table.is_named(&owner)) {
                self.push_substitution(candidate.node.clone(), candidate.start());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::context::{AggregationKind, SelectContext, SelectItem};
    use crate::lexer::tokenize;
    use crate::parser::{Dialect, SelectParser};

    fn analyse_with(sql: &str, dialect: Dialect) -> SelectContext {
        let tokens = tokenize(sql).tokens;
        SelectParser::new(&tokens, sql, dialect).parse().unwrap()
    }

    fn analyse(sql: &str) -> SelectContext {
        analyse_with(sql, Dialect::generic())
    }

    #[test]
    fn star_sets_contains_star() {
        let context = analyse("SELECT * FROM t");
        assert!(context.contains_star());
        assert_eq!(context.items().len(), 1);
        assert!(context.items()[0].is_star());
    }

    #[test]
    fn owner_star_is_not_a_bare_star() {
        let context = analyse("SELECT o.* FROM t_order o");
        assert!(!context.contains_star());
        assert_eq!(context.items()[0].expression(), "o.*");
    }

    #[test]
    fn aggregation_items_keep_ordinal_and_alias() {
        let context = analyse("SELECT name, COUNT(*) AS cnt, MAX(`score`) top FROM t");
        let count = context.items()[1].as_aggregation().unwrap();
        assert_eq!(count.kind, AggregationKind::Count);
        assert_eq!(count.expression, "COUNT(*)");
        assert_eq!(count.inner_expression, "(*)");
        assert_eq!(count.alias.as_deref(), Some("cnt"));
        assert_eq!(count.ordinal, Some(2));

        let max = context.items()[2].as_aggregation().unwrap();
        assert_eq!(max.expression, "MAX(score)");
        assert_eq!(max.alias.as_deref(), Some("top"));
        assert_eq!(max.ordinal, Some(3));
    }

    #[test]
    fn aggregate_followed_by_operator_is_common() {
        let context = analyse("SELECT SUM(a) + 1 AS total FROM t");
        match &context.items()[0] {
            SelectItem::Common(item) => {
                assert_eq!(item.expression, "SUM(a)+1");
                assert_eq!(item.alias.as_deref(), Some("total"));
            }
            other => panic!("expected common item, got {other:?}"),
        }
    }

    #[test]
    fn aggregate_keyword_without_call_is_common() {
        let context = analyse("SELECT count FROM t");
        assert!(matches!(&context.items()[0], SelectItem::Common(item) if item.expression == "count"));
    }

    #[test]
    fn average_gets_count_and_sum_companions() {
        let sql = "SELECT AVG(score) FROM t";
        let context = analyse(sql);
        let avg = context.items()[0].as_aggregation().unwrap();
        assert_eq!(avg.derived.len(), 2);
        assert_eq!(avg.derived[0].kind, AggregationKind::Count);
        assert_eq!(avg.derived[0].alias.as_deref(), Some("sharding_gen_1"));
        assert_eq!(avg.derived[1].kind, AggregationKind::Sum);
        assert_eq!(avg.derived[1].alias.as_deref(), Some("sharding_gen_2"));
        assert_eq!(avg.derived[1].ordinal, None);

        assert_eq!(context.select_list_end_position(), sql.find("FROM").unwrap());
        let inserted: Vec<_> = context.column_insertions().collect();
        assert_eq!(
            inserted,
            ["COUNT(score) AS sharding_gen_1 ", "SUM(score) AS sharding_gen_2 "]
        );
    }

    #[test]
    fn commas_inside_calls_do_not_split_items() {
        let context = analyse("SELECT IFNULL(a, COALESCE(b, 0)) AS v, c FROM t");
        assert_eq!(context.items().len(), 2);
        assert_eq!(context.items()[0].expression(), "IFNULL(a,COALESCE(b,0))");
        assert_eq!(context.items()[0].alias(), Some("v"));
        assert_eq!(context.items()[1].expression(), "c");
    }

    #[test]
    fn owner_fragments_inside_calls_are_candidates() {
        let sql = "SELECT UPPER(t_order.name), CONCAT(o.a, (t_order.b)) FROM t_order o";
        let context = analyse(sql);
        let positions: Vec<_> = context
            .edits()
            .iter()
            .filter(|edit| edit.is_identifier_substitution())
            .map(|edit| edit.position())
            .collect();
        assert_eq!(positions, [58, 13, 41]);
    }

    #[test]
    fn placeholders_in_projection_are_counted() {
        let context = analyse("SELECT ?, IFNULL(a, ?) FROM t WHERE id = ?");
        assert_eq!(context.parameter_index(), 3);
        assert_eq!(context.conditions().len(), 1);
    }

    #[test]
    fn unclosed_call_in_projection() {
        let sql = "SELECT UPPER(a FROM t";
        let tokens = tokenize(sql).tokens;
        let error = SelectParser::new(&tokens, sql, Dialect::generic())
            .parse()
            .unwrap_err();
        assert_eq!(error.to_string(), "unclosed parenthesis");
        assert_eq!(error.span(), Some(&(12..13)));
    }

    #[test]
    fn set_operator_ends_the_item() {
        let sql = "SELECT 1 UNION SELECT 2";
        let tokens = tokenize(sql).tokens;
        let error = SelectParser::new(&tokens, sql, Dialect::generic())
            .parse()
            .unwrap_err();
        assert_eq!(
            error.unsupported_construct(),
            Some(crate::parser::Unsupported::SetOperator(crate::lexer::token::TokenKind::Union))
        );
    }

    #[test]
    fn distinct_variants() {
        assert!(analyse("SELECT DISTINCT a FROM t").is_distinct());
        assert!(analyse("SELECT DISTINCTROW a FROM t").is_distinct());
        assert!(!analyse("SELECT ALL a FROM t").is_distinct());

        let context = analyse_with("SELECT DISTINCT ON (a) a, b FROM t", Dialect::postgresql());
        assert!(context.is_distinct());
        assert_eq!(context.items().len(), 2);
        assert_eq!(context.items()[0].expression(), "a");
    }

    #[test]
    fn owner_fragments_resolve_against_table_names() {
        let sql = "SELECT t_order.id, o.name FROM t_order o";
        let context = analyse(sql);
        let substitutions: Vec<_> = context
            .edits()
            .iter()
            .filter(|edit| edit.is_identifier_substitution())
            .map(|edit| (edit.position(), edit.text().to_string()))
            .collect();
        assert_eq!(
            substitutions,
            [(31, "t_order".to_string()), (7, "t_order".to_string())]
        );
    }

    #[test]
    fn select_list_end_without_from() {
        let context = analyse("SELECT 1");
        assert_eq!(context.select_list_end_position(), 8);
        assert_eq!(context.items()[0].expression(), "1");
    }
}
