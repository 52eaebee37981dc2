//! Token types and representations for SQL lexical analysis.

use crate::ast::Span;
use smol_str::SmolStr;
use std::fmt;

/// The kind of a lexical token in SQL.
///
/// Kinds carry no payload; the literal source text lives on [`Token::text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords - query structure
    Select,
    Distinct,
    Distinctrow,
    All,
    From,
    Where,
    Group,
    By,
    Having,
    Order,
    Siblings,
    Asc,
    Desc,
    As,
    With,
    Rollup,

    // Keywords - joins
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    Natural,
    StraightJoin,
    Apply,
    On,
    Using,

    // Keywords - set operators
    Union,
    Except,
    Intersect,
    Minus,

    // Keywords - predicates and logic
    And,
    Or,
    Not,
    In,
    Between,
    Like,
    Is,
    Exists,
    Case,
    When,
    Then,
    Else,
    End,

    // Keywords - literals
    Null,
    True,
    False,

    // Keywords - aggregate functions
    Max,
    Min,
    Sum,
    Avg,
    Count,

    // Keywords - pagination and locking
    Limit,
    Offset,
    Fetch,
    First,
    Next,
    Row,
    Rows,
    Only,
    For,
    Update,
    Share,
    Nowait,
    Lock,
    Mode,

    // Identifiers
    Identifier,
    QuotedIdentifier,

    // Literals
    StringLiteral,
    IntegerLiteral,
    FloatLiteral,

    // Placeholders and variables
    Parameter, // ?
    Variable,  // @name or @@name

    // Operators
    Plus,         // +
    Sub,          // -
    Star,         // *
    Slash,        // /
    Percent,      // %
    Caret,        // ^
    Eq,           // =
    NotEq,        // <>
    NotEqBang,    // !=
    NullSafeEq,   // <=>
    Lt,           // <
    Gt,           // >
    LtEq,         // <=
    GtEq,         // >=
    Pipe,         // |
    DoublePipe,   // ||
    Ampersand,    // &
    DoubleAmp,    // &&
    Tilde,        // ~
    Bang,         // !
    DoubleColon,  // ::

    // Punctuation
    LParen,    // (
    RParen,    // )
    Comma,     // ,
    Semicolon, // ;
    Dot,       // .
    Colon,     // :

    // Special
    Eof,
}

impl TokenKind {
    /// Returns true if this token kind is a keyword.
    pub fn is_keyword(&self) -> bool {
        !matches!(
            self,
            TokenKind::Identifier
                | TokenKind::QuotedIdentifier
                | TokenKind::StringLiteral
                | TokenKind::IntegerLiteral
                | TokenKind::FloatLiteral
                | TokenKind::Parameter
                | TokenKind::Variable
                | TokenKind::Eof
        ) && !self.is_operator()
            && !self.is_punctuation()
    }

    /// Returns true if this token kind is an operator.
    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Sub
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Caret
                | TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::NotEqBang
                | TokenKind::NullSafeEq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::LtEq
                | TokenKind::GtEq
                | TokenKind::Pipe
                | TokenKind::DoublePipe
                | TokenKind::Ampersand
                | TokenKind::DoubleAmp
                | TokenKind::Tilde
                | TokenKind::Bang
                | TokenKind::DoubleColon
        )
    }

    /// Returns true if this token kind is punctuation.
    pub fn is_punctuation(&self) -> bool {
        matches!(
            self,
            TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::Dot
                | TokenKind::Colon
        )
    }

    /// Returns true if this is a symbol (operator or punctuation).
    pub fn is_symbol(&self) -> bool {
        self.is_operator() || self.is_punctuation()
    }

    /// Returns true for arithmetic, bitwise and concatenation operators that
    /// continue a scalar operand.
    pub fn is_composite_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Sub
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Caret
                | TokenKind::Pipe
                | TokenKind::DoublePipe
                | TokenKind::Ampersand
                | TokenKind::DoubleColon
        )
    }

    /// Returns true for comparison operators.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::NotEqBang
                | TokenKind::NullSafeEq
                | TokenKind::Lt
                | TokenKind::Gt
                | TokenKind::LtEq
                | TokenKind::GtEq
        )
    }

    /// Returns true for keywords that may also name a column or table.
    pub fn is_non_reserved(&self) -> bool {
        matches!(
            self,
            TokenKind::Max
                | TokenKind::Min
                | TokenKind::Sum
                | TokenKind::Avg
                | TokenKind::Count
                | TokenKind::Siblings
                | TokenKind::Rollup
                | TokenKind::Apply
                | TokenKind::First
                | TokenKind::Next
                | TokenKind::Row
                | TokenKind::Rows
                | TokenKind::Only
                | TokenKind::Share
                | TokenKind::Nowait
                | TokenKind::Mode
                | TokenKind::Offset
        )
    }

    /// Returns true if a token of this kind can be used as a name.
    pub fn is_identifier_like(&self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::QuotedIdentifier)
            || self.is_non_reserved()
    }

    /// Returns true for set operators that may follow a query body.
    pub fn is_set_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Union | TokenKind::Except | TokenKind::Intersect | TokenKind::Minus
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::Select => "SELECT",
            TokenKind::Distinct => "DISTINCT",
            TokenKind::Distinctrow => "DISTINCTROW",
            TokenKind::All => "ALL",
            TokenKind::From => "FROM",
            TokenKind::Where => "WHERE",
            TokenKind::Group => "GROUP",
            TokenKind::By => "BY",
            TokenKind::Having => "HAVING",
            TokenKind::Order => "ORDER",
            TokenKind::Siblings => "SIBLINGS",
            TokenKind::Asc => "ASC",
            TokenKind::Desc => "DESC",
            TokenKind::As => "AS",
            TokenKind::With => "WITH",
            TokenKind::Rollup => "ROLLUP",
            TokenKind::Join => "JOIN",
            TokenKind::Inner => "INNER",
            TokenKind::Left => "LEFT",
            TokenKind::Right => "RIGHT",
            TokenKind::Full => "FULL",
            TokenKind::Outer => "OUTER",
            TokenKind::Cross => "CROSS",
            TokenKind::Natural => "NATURAL",
            TokenKind::StraightJoin => "STRAIGHT_JOIN",
            TokenKind::Apply => "APPLY",
            TokenKind::On => "ON",
            TokenKind::Using => "USING",
            TokenKind::Union => "UNION",
            TokenKind::Except => "EXCEPT",
            TokenKind::Intersect => "INTERSECT",
            TokenKind::Minus => "MINUS",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::In => "IN",
            TokenKind::Between => "BETWEEN",
            TokenKind::Like => "LIKE",
            TokenKind::Is => "IS",
            TokenKind::Exists => "EXISTS",
            TokenKind::Case => "CASE",
            TokenKind::When => "WHEN",
            TokenKind::Then => "THEN",
            TokenKind::Else => "ELSE",
            TokenKind::End => "END",
            TokenKind::Null => "NULL",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Max => "MAX",
            TokenKind::Min => "MIN",
            TokenKind::Sum => "SUM",
            TokenKind::Avg => "AVG",
            TokenKind::Count => "COUNT",
            TokenKind::Limit => "LIMIT",
            TokenKind::Offset => "OFFSET",
            TokenKind::Fetch => "FETCH",
            TokenKind::First => "FIRST",
            TokenKind::Next => "NEXT",
            TokenKind::Row => "ROW",
            TokenKind::Rows => "ROWS",
            TokenKind::Only => "ONLY",
            TokenKind::For => "FOR",
            TokenKind::Update => "UPDATE",
            TokenKind::Share => "SHARE",
            TokenKind::Nowait => "NOWAIT",
            TokenKind::Lock => "LOCK",
            TokenKind::Mode => "MODE",
            TokenKind::Identifier => "identifier",
            TokenKind::QuotedIdentifier => "quoted identifier",
            TokenKind::StringLiteral => "string literal",
            TokenKind::IntegerLiteral => "integer literal",
            TokenKind::FloatLiteral => "decimal literal",
            TokenKind::Parameter => "?",
            TokenKind::Variable => "variable",
            TokenKind::Plus => "+",
            TokenKind::Sub => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Caret => "^",
            TokenKind::Eq => "=",
            TokenKind::NotEq => "<>",
            TokenKind::NotEqBang => "!=",
            TokenKind::NullSafeEq => "<=>",
            TokenKind::Lt => "<",
            TokenKind::Gt => ">",
            TokenKind::LtEq => "<=",
            TokenKind::GtEq => ">=",
            TokenKind::Pipe => "|",
            TokenKind::DoublePipe => "||",
            TokenKind::Ampersand => "&",
            TokenKind::DoubleAmp => "&&",
            TokenKind::Tilde => "~",
            TokenKind::Bang => "!",
            TokenKind::DoubleColon => "::",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Dot => ".",
            TokenKind::Colon => ":",
            TokenKind::Eof => "<EOF>",
        };
        f.write_str(text)
    }
}

/// A lexical token with its kind, source span and literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in source text.
    pub span: Span,
    /// The exact source text covered by `span`, quotes included.
    pub text: SmolStr,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span, text: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
        }
    }

    /// Byte offset where the token starts.
    pub fn start(&self) -> usize {
        self.span.start
    }

    /// Byte offset just past the token.
    pub fn end(&self) -> usize {
        self.span.end
    }
}
