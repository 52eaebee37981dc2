//! Operand parsing.
//!
//! The sharding layer only needs to recognise column references, numbers,
//! placeholders and string literals. Anything else is consumed as a balanced
//! unit and reported as [`Expression::Other`] so the clause parsers can
//! continue at the right token.

use crate::ast::{Expression, Spanned};
use crate::diag::Diag;
use crate::lexer::token::TokenKind;
use crate::normalize::unquote_literal;
use crate::parser::base::TokenStream;
use crate::parser::error::{ParseError, ParseResult};

/// Parser for a single scalar operand, borrowing the caller's stream.
pub struct ExpressionParser<'s, 'a> {
    stream: &'s mut TokenStream<'a>,
}

impl<'s, 'a> ExpressionParser<'s, 'a> {
    /// Creates a new expression parser.
    pub fn new(stream: &'s mut TokenStream<'a>) -> Self {
        Self { stream }
    }

    /// Parses one operand followed by any chain of composite operators.
    ///
    /// `a + b * ?` is consumed whole and yields `Other`; placeholders inside
    /// the chain still advance the parameter counter.
    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        let start = self.stream.current().start();
        let primary = self.parse_primary()?;
        if !self.stream.kind().is_composite_operator() {
            return Ok(primary);
        }
        while self.stream.kind().is_composite_operator() {
            self.stream.advance();
            self.parse_primary()?;
        }
        Ok(Expression::Other {
            span: start..self.stream.previous_end(),
        })
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        let token = self.stream.current().clone();
        match token.kind {
            kind if kind.is_identifier_like() => self.parse_name(),
            TokenKind::IntegerLiteral | TokenKind::FloatLiteral => {
                self.stream.advance();
                Ok(Expression::Number {
                    value: token.text,
                    span: token.span,
                })
            }
            TokenKind::Parameter => {
                self.stream.advance();
                Ok(Expression::Parameter {
                    index: self.stream.next_parameter(),
                    span: token.span,
                })
            }
            TokenKind::StringLiteral => {
                self.stream.advance();
                Ok(Expression::Text {
                    value: unquote_literal(&token.text),
                    span: token.span,
                })
            }
            TokenKind::Null | TokenKind::True | TokenKind::False | TokenKind::Variable => {
                self.stream.advance();
                Ok(Expression::Other { span: token.span })
            }
            TokenKind::Plus | TokenKind::Sub | TokenKind::Tilde | TokenKind::Bang => {
                self.stream.advance();
                let operand = self.parse_primary()?;
                Ok(Expression::Other {
                    span: token.start()..operand.span().end,
                })
            }
            TokenKind::LParen | TokenKind::Exists => {
                self.stream.consume(TokenKind::Exists);
                self.skip_group(token.start())
            }
            TokenKind::Case => self.skip_case(),
            _ => Err(self.stream.error_here(if token.kind == TokenKind::Eof {
                "expected expression, found end of statement".to_string()
            } else {
                format!("expected expression, found '{}'", token.text)
            })),
        }
    }

    /// Parses `name`, `owner.name`, a function call, or a longer dotted path.
    fn parse_name(&mut self) -> ParseResult<Expression> {
        let first = self.stream.current().clone();
        self.stream.advance();

        if self.stream.check(TokenKind::LParen) {
            return self.skip_group(first.start());
        }
        if !self.stream.check(TokenKind::Dot) {
            return Ok(Expression::Identifier {
                name: first.text,
                span: first.span,
            });
        }

        self.stream.advance();
        let second = self.stream.current().clone();
        if second.kind == TokenKind::Star {
            self.stream.advance();
            return Ok(Expression::Other {
                span: first.start()..second.end(),
            });
        }
        if !second.kind.is_identifier_like() && !second.kind.is_keyword() {
            return Err(self
                .stream
                .error_here(format!("expected column name after '{}.'", first.text)));
        }
        self.stream.advance();

        if self.stream.check(TokenKind::Dot) || self.stream.check(TokenKind::LParen) {
            while self.stream.consume(TokenKind::Dot) {
                self.stream.advance();
            }
            if self.stream.check(TokenKind::LParen) {
                self.stream.skip_parentheses()?;
            }
            return Ok(Expression::Other {
                span: first.start()..self.stream.previous_end(),
            });
        }

        let span = first.start()..second.end();
        Ok(Expression::Property {
            owner: Spanned::new(first.text, first.span),
            name: second.text,
            span,
        })
    }

    fn skip_group(&mut self, start: usize) -> ParseResult<Expression> {
        self.stream.skip_parentheses()?;
        Ok(Expression::Other {
            span: start..self.stream.previous_end(),
        })
    }

    /// Consumes `CASE ... END`, including nested CASE blocks.
    fn skip_case(&mut self) -> ParseResult<Expression> {
        let start = self.stream.current().start();
        let mut depth = 0usize;
        loop {
            match self.stream.kind() {
                TokenKind::Case => depth += 1,
                TokenKind::End => {
                    depth -= 1;
                    if depth == 0 {
                        self.stream.advance();
                        return Ok(Expression::Other {
                            span: start..self.stream.previous_end(),
                        });
                    }
                }
                TokenKind::Parameter => {
                    self.stream.next_parameter();
                }
                TokenKind::Eof => {
                    return Err(ParseError::malformed(
                        Diag::error("CASE without matching END")
                            .with_primary_label(start..start + 4, "CASE starts here"),
                    ));
                }
                _ => {}
            }
            self.stream.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(source: &str) -> (Expression, usize, bool) {
        let tokens = tokenize(source).tokens;
        let mut stream = TokenStream::new(&tokens, source);
        let expression = ExpressionParser::new(&mut stream).parse_expression().unwrap();
        (expression, stream.parameter_index(), stream.at_end())
    }

    #[test]
    fn identifiers_and_properties() {
        let (expression, _, done) = parse("user_id");
        assert!(done);
        assert_eq!(
            expression,
            Expression::Identifier {
                name: "user_id".into(),
                span: 0..7
            }
        );

        let (expression, _, _) = parse("`o`.`user_id`");
        match expression {
            Expression::Property { owner, name, span } => {
                assert_eq!(owner.node, "`o`");
                assert_eq!(owner.span, 0..3);
                assert_eq!(name, "`user_id`");
                assert_eq!(span, 0..13);
            }
            other => panic!("expected property, got {other:?}"),
        }
    }

    #[test]
    fn aggregate_keywords_are_plain_names() {
        let (expression, _, _) = parse("count");
        assert!(matches!(expression, Expression::Identifier { name, .. } if name == "count"));
    }

    #[test]
    fn literals_and_parameters() {
        let (expression, params, _) = parse("42");
        assert_eq!(expression.as_integer(), Some(42));
        assert_eq!(params, 0);

        let (expression, params, _) = parse("?");
        assert_eq!(expression, Expression::Parameter { index: 0, span: 0..1 });
        assert_eq!(params, 1);

        let (expression, _, _) = parse("'it''s'");
        assert_eq!(
            expression,
            Expression::Text {
                value: "it's".into(),
                span: 0..7
            }
        );
    }

    #[test]
    fn composite_chain_collapses_to_other() {
        let (expression, params, done) = parse("price * ? + 1");
        assert_eq!(expression, Expression::Other { span: 0..13 });
        assert_eq!(params, 1);
        assert!(done);
    }

    #[test]
    fn function_calls_and_groups_are_opaque() {
        let (expression, params, done) = parse("IFNULL(a, ?)");
        assert_eq!(expression, Expression::Other { span: 0..12 });
        assert_eq!(params, 1);
        assert!(done);

        let (expression, _, _) = parse("COUNT(*)");
        assert_eq!(expression, Expression::Other { span: 0..8 });

        let (expression, _, _) = parse("(a + b)");
        assert_eq!(expression, Expression::Other { span: 0..7 });
    }

    #[test]
    fn dotted_paths_and_star() {
        let (expression, _, done) = parse("db.t.col");
        assert_eq!(expression, Expression::Other { span: 0..8 });
        assert!(done);

        let (expression, _, _) = parse("o.*");
        assert_eq!(expression, Expression::Other { span: 0..3 });
    }

    #[test]
    fn case_blocks_are_skipped() {
        let (expression, params, done) =
            parse("CASE WHEN a = ? THEN CASE b WHEN 1 THEN 2 END ELSE 3 END");
        assert!(matches!(expression, Expression::Other { .. }));
        assert_eq!(params, 1);
        assert!(done);
    }

    #[test]
    fn unary_minus() {
        let (expression, _, _) = parse("-1");
        assert_eq!(expression, Expression::Other { span: 0..2 });
    }

    #[test]
    fn missing_operand_is_malformed() {
        let tokens = tokenize("FROM").tokens;
        let mut stream = TokenStream::new(&tokens, "FROM");
        let error = ExpressionParser::new(&mut stream).parse_expression().unwrap_err();
        assert!(error.is_malformed());
        assert_eq!(error.to_string(), "expected expression, found 'FROM'");
    }
}
