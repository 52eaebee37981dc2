//! Lexical analysis for SQL.
//!
//! Raw scanning is driven by a `logos` automaton; words are then classified
//! through the keyword table. The lexer never stops at the first problem:
//! invalid characters and unterminated quotes are reported as diagnostics and
//! scanning continues, so every token keeps an exact byte span into the
//! original statement.

pub mod keywords;
pub mod token;

use crate::diag::Diag;
use logos::Logos;
use token::{Token, TokenKind};

/// Result of lexical analysis.
///
/// Contains both the tokens produced and any diagnostics encountered during scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerResult {
    /// The tokens produced, including an EOF token at the end.
    pub tokens: Vec<Token>,
    /// Diagnostics (errors) encountered during lexing.
    pub diagnostics: Vec<Diag>,
}

/// Whether a quoted token found its closing delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closure {
    Closed,
    Unclosed,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"--[^\n]*", logos::skip)]
    #[regex(r"#[^\n]*", logos::skip)]
    LineComment,

    #[token("/*", scan_block_comment)]
    BlockComment(Closure),

    #[regex(r"[\p{L}_][\p{L}\p{N}_$]*")]
    Word,

    #[token("'", |lex| scan_quoted(lex, '\''))]
    Quoted(Closure),

    #[token("`", |lex| scan_quoted(lex, '`'))]
    #[token("\"", |lex| scan_quoted(lex, '"'))]
    #[token("[", |lex| scan_quoted(lex, ']'))]
    Delimited(Closure),

    #[regex(r"[0-9]+")]
    Integer,

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    Float,

    #[token("?")]
    Question,

    #[regex(r"@@?[A-Za-z_][A-Za-z0-9_.$]*")]
    Variable,

    #[token("+")]
    Plus,
    #[token("-")]
    Sub,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("^")]
    Caret,
    #[token("=")]
    Eq,
    #[token("<>")]
    NotEq,
    #[token("!=")]
    NotEqBang,
    #[token("<=>")]
    NullSafeEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("|")]
    Pipe,
    #[token("||")]
    DoublePipe,
    #[token("&")]
    Ampersand,
    #[token("&&")]
    DoubleAmp,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("::")]
    DoubleColon,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
}

/// Scans the body of a quoted token after its opening delimiter.
///
/// A doubled closing delimiter stands for itself; string literals and
/// double-quoted names additionally honour backslash escapes.
fn scan_quoted(lex: &mut logos::Lexer<'_, RawToken>, close: char) -> Closure {
    let rest = lex.remainder();
    let backslash_escapes = matches!(close, '\'' | '"');
    let mut chars = rest.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        if backslash_escapes && ch == '\\' {
            chars.next();
            continue;
        }
        if ch == close {
            if close != ']' && matches!(chars.peek(), Some((_, next)) if *next == close) {
                chars.next();
                continue;
            }
            lex.bump(index + ch.len_utf8());
            return Closure::Closed;
        }
    }

    lex.bump(rest.len());
    Closure::Unclosed
}

/// Scans a `/* ... */` comment, including MySQL `/*! ... */` hints.
fn scan_block_comment(lex: &mut logos::Lexer<'_, RawToken>) -> Closure {
    let rest = lex.remainder();
    match rest.find("*/") {
        Some(index) => {
            lex.bump(index + 2);
            Closure::Closed
        }
        None => {
            lex.bump(rest.len());
            Closure::Unclosed
        }
    }
}

/// A lexical analyzer for SQL source text.
pub struct Lexer<'a> {
    /// The source text being lexed.
    source: &'a str,
    /// Accumulated tokens.
    tokens: Vec<Token>,
    /// Accumulated diagnostics.
    diagnostics: Vec<Diag>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Tokenizes the source text and returns the result.
    ///
    /// This consumes the lexer and returns both tokens and diagnostics.
    pub fn tokenize(mut self) -> LexerResult {
        let mut raw = RawToken::lexer(self.source);

        while let Some(result) = raw.next() {
            let span = raw.span();
            match result {
                Ok(kind) => self.scan_token(kind, span),
                Err(()) => {
                    let text = self.source.get(span.clone()).unwrap_or_default();
                    self.error(span, &format!("invalid character '{text}'"), "L001");
                }
            }
        }

        // Always add EOF token
        let eof_pos = self.source.len();
        self.tokens
            .push(Token::new(TokenKind::Eof, eof_pos..eof_pos, ""));

        LexerResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    /// Classifies a single raw token.
    fn scan_token(&mut self, raw: RawToken, span: std::ops::Range<usize>) {
        let kind = match raw {
            RawToken::LineComment => return,
            RawToken::BlockComment(Closure::Closed) => return,
            RawToken::BlockComment(Closure::Unclosed) => {
                self.error(span, "unclosed block comment", "L002");
                return;
            }
            RawToken::Word => {
                keywords::lookup_keyword(&self.source[span.clone()]).unwrap_or(TokenKind::Identifier)
            }
            RawToken::Quoted(closure) => {
                if closure == Closure::Unclosed {
                    self.error(span.clone(), "unclosed string literal", "L002");
                }
                TokenKind::StringLiteral
            }
            RawToken::Delimited(closure) => {
                if closure == Closure::Unclosed {
                    self.error(span.clone(), "unclosed quoted identifier", "L002");
                }
                TokenKind::QuotedIdentifier
            }
            RawToken::Integer => TokenKind::IntegerLiteral,
            RawToken::Float => TokenKind::FloatLiteral,
            RawToken::Question => TokenKind::Parameter,
            RawToken::Variable => TokenKind::Variable,
            RawToken::Plus => TokenKind::Plus,
            RawToken::Sub => TokenKind::Sub,
            RawToken::Star => TokenKind::Star,
            RawToken::Slash => TokenKind::Slash,
            RawToken::Percent => TokenKind::Percent,
            RawToken::Caret => TokenKind::Caret,
            RawToken::Eq => TokenKind::Eq,
            RawToken::NotEq => TokenKind::NotEq,
            RawToken::NotEqBang => TokenKind::NotEqBang,
            RawToken::NullSafeEq => TokenKind::NullSafeEq,
            RawToken::Lt => TokenKind::Lt,
            RawToken::Gt => TokenKind::Gt,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::GtEq => TokenKind::GtEq,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::DoublePipe => TokenKind::DoublePipe,
            RawToken::Ampersand => TokenKind::Ampersand,
            RawToken::DoubleAmp => TokenKind::DoubleAmp,
            RawToken::Tilde => TokenKind::Tilde,
            RawToken::Bang => TokenKind::Bang,
            RawToken::DoubleColon => TokenKind::DoubleColon,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Dot => TokenKind::Dot,
            RawToken::Colon => TokenKind::Colon,
        };
        self.add_token(kind, span);
    }

    /// Adds a token to the token stream.
    fn add_token(&mut self, kind: TokenKind, span: std::ops::Range<usize>) {
        let text = &self.source[span.clone()];
        self.tokens.push(Token::new(kind, span, text));
    }

    /// Adds an error diagnostic with an explicit span and code.
    fn error(&mut self, span: std::ops::Range<usize>, message: &str, code: &str) {
        self.diagnostics.push(
            Diag::error(message)
                .with_primary_label(span, "here")
                .with_code(code),
        );
    }
}

/// Convenience function to tokenize a source string.
///
/// This is the main entry point for lexical analysis.
pub fn tokenize(source: &str) -> LexerResult {
    Lexer::new(source).tokenize()
}
