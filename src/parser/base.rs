//! Token stream navigation shared by every clause parser.
//!
//! The stream also owns the running positional-parameter counter, because
//! placeholders are consumed wherever tokens are skipped or parsed.

use crate::ast::Span;
use crate::diag::Diag;
use crate::lexer::token::{Token, TokenKind};
use crate::normalize::exact_value;
use crate::parser::error::{ParseError, ParseResult};
use smol_str::SmolStr;

static EOF_TOKEN: Token = Token {
    kind: TokenKind::Eof,
    span: 0..0,
    text: SmolStr::new_static(""),
};

/// Cursor over a lexed statement.
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    source: &'a str,
    pos: usize,
    parameter_index: usize,
}

impl<'a> TokenStream<'a> {
    /// Creates a new token stream over `tokens`, lexed from `source`.
    pub fn new(tokens: &'a [Token], source: &'a str) -> Self {
        Self {
            tokens,
            source,
            pos: 0,
            parameter_index: 0,
        }
    }

    /// Returns the current token.
    ///
    /// Past the end this is the last token, which is EOF for lexer output.
    pub fn current(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOF_TOKEN)
    }

    /// Returns the kind of the current token.
    pub fn kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Returns the token after the current one.
    pub fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos + 1)
            .or_else(|| self.tokens.last())
            .unwrap_or(&EOF_TOKEN)
    }

    /// Advances to the next token. Does nothing once the last token is reached.
    pub fn advance(&mut self) {
        if self.pos < self.tokens.len().saturating_sub(1) {
            self.pos += 1;
        }
    }

    /// End offset of the most recently consumed token.
    pub fn previous_end(&self) -> usize {
        match self.pos.checked_sub(1).and_then(|index| self.tokens.get(index)) {
            Some(token) => token.end(),
            None => self.current().start(),
        }
    }

    pub fn check(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    pub fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind())
    }

    /// Returns true at the end of input.
    pub fn at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Consumes the current token if it matches `kind`.
    pub fn consume(&mut self, kind: TokenKind) -> bool {
        self.consume_any(&[kind])
    }

    /// Consumes the current token if it matches any of `kinds`.
    pub fn consume_any(&mut self, kinds: &[TokenKind]) -> bool {
        if self.check_any(kinds) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a mandatory token and returns its span.
    pub fn expect(&mut self, kind: TokenKind) -> ParseResult<Span> {
        self.expect_any(&[kind])
    }

    /// Consumes a mandatory token of one of `kinds` and returns its span.
    pub fn expect_any(&mut self, kinds: &[TokenKind]) -> ParseResult<Span> {
        if self.check_any(kinds) {
            let span = self.current().span.clone();
            self.advance();
            return Ok(span);
        }
        let expected = kinds
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" or ");
        Err(self.error_here(format!(
            "expected {expected}, found {}",
            self.describe_current()
        )))
    }

    /// Creates a malformed-input error at the current token.
    pub fn error_here(&self, message: impl Into<String>) -> ParseError {
        ParseError::malformed(
            Diag::error(message.into()).with_primary_label(self.current().span.clone(), "here"),
        )
    }

    fn describe_current(&self) -> String {
        let token = self.current();
        if token.kind == TokenKind::Eof {
            "end of statement".to_string()
        } else {
            format!("'{}'", token.text)
        }
    }

    /// Consumes a balanced `( ... )` group and returns its exact source text.
    ///
    /// Placeholders inside the group advance the parameter counter. Returns an
    /// empty string without consuming anything if the current token is not `(`.
    pub fn skip_parentheses(&mut self) -> ParseResult<SmolStr> {
        if !self.check(TokenKind::LParen) {
            return Ok(SmolStr::default());
        }
        let open = self.current().span.clone();
        let mut depth = 0usize;
        loop {
            match self.kind() {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        let end = self.current().end();
                        self.advance();
                        return Ok(SmolStr::new(&self.source[open.start..end]));
                    }
                }
                TokenKind::Parameter => self.parameter_index += 1,
                TokenKind::Eof => return Err(self.unclosed_parenthesis(open)),
                _ => {}
            }
            self.advance();
        }
    }

    /// Error for a `(` at `open` that the statement never closes.
    pub fn unclosed_parenthesis(&self, open: Span) -> ParseError {
        ParseError::malformed(
            Diag::error("unclosed parenthesis")
                .with_primary_label(open, "opened here")
                .with_secondary_label(self.current().span.clone(), "statement ends here"),
        )
    }

    /// Consumes any JOIN-family keyword sequence (a comma counts as a join).
    pub fn skip_join(&mut self) -> ParseResult<bool> {
        if self.consume_any(&[TokenKind::Left, TokenKind::Right, TokenKind::Full]) {
            self.consume(TokenKind::Outer);
            self.expect(TokenKind::Join)?;
            return Ok(true);
        }
        if self.consume(TokenKind::Inner) {
            self.expect(TokenKind::Join)?;
            return Ok(true);
        }
        if self.consume_any(&[TokenKind::Join, TokenKind::Comma, TokenKind::StraightJoin]) {
            return Ok(true);
        }
        if self.consume(TokenKind::Natural) {
            self.consume_any(&[TokenKind::Left, TokenKind::Right, TokenKind::Full]);
            self.consume_any(&[TokenKind::Outer, TokenKind::Inner]);
            self.expect(TokenKind::Join)?;
            return Ok(true);
        }
        if self.consume(TokenKind::Cross) {
            self.expect_any(&[TokenKind::Join, TokenKind::Apply])?;
            return Ok(true);
        }
        if self.check(TokenKind::Outer) && self.peek().kind == TokenKind::Apply {
            self.advance();
            self.advance();
            return Ok(true);
        }
        Ok(false)
    }

    /// Parses an optional alias: `AS name`, or a bare name or string.
    ///
    /// The alias is returned normalized. `AS` followed by a symbol yields no
    /// alias and leaves the symbol in place; `AS` followed by a reserved word
    /// is malformed.
    pub fn parse_alias(&mut self) -> ParseResult<Option<SmolStr>> {
        if self.consume(TokenKind::As) {
            if self.kind().is_symbol() {
                return Ok(None);
            }
            if !self.kind().is_identifier_like() && !self.check(TokenKind::StringLiteral) {
                return Err(self.error_here(format!(
                    "expected alias after AS, found {}",
                    self.describe_current()
                )));
            }
            let alias = exact_value(&self.current().text);
            self.advance();
            return Ok(Some(alias));
        }
        if self.check_any(&[
            TokenKind::Identifier,
            TokenKind::QuotedIdentifier,
            TokenKind::StringLiteral,
        ]) {
            let alias = exact_value(&self.current().text);
            self.advance();
            return Ok(Some(alias));
        }
        Ok(None)
    }

    /// Running count of positional parameters consumed so far.
    pub fn parameter_index(&self) -> usize {
        self.parameter_index
    }

    pub fn set_parameter_index(&mut self, index: usize) {
        self.parameter_index = index;
    }

    /// Returns the index for the placeholder being consumed and advances the counter.
    pub fn next_parameter(&mut self) -> usize {
        let index = self.parameter_index;
        self.parameter_index += 1;
        index
    }
}
