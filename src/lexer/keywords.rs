//! Keyword recognition and classification for SQL.
//!
//! SQL keywords are case-insensitive; anything not listed here lexes as an
//! identifier.

use super::token::TokenKind;

/// Looks up a keyword by name (case-insensitive).
pub fn lookup_keyword(name: &str) -> Option<TokenKind> {
    match name.to_ascii_uppercase().as_str() {
        // Query structure
        "SELECT" => Some(TokenKind::Select),
        "DISTINCT" => Some(TokenKind::Distinct),
        "DISTINCTROW" => Some(TokenKind::Distinctrow),
        "ALL" => Some(TokenKind::All),
        "FROM" => Some(TokenKind::From),
        "WHERE" => Some(TokenKind::Where),
        "GROUP" => Some(TokenKind::Group),
        "BY" => Some(TokenKind::By),
        "HAVING" => Some(TokenKind::Having),
        "ORDER" => Some(TokenKind::Order),
        "SIBLINGS" => Some(TokenKind::Siblings),
        "ASC" => Some(TokenKind::Asc),
        "DESC" => Some(TokenKind::Desc),
        "AS" => Some(TokenKind::As),
        "WITH" => Some(TokenKind::With),
        "ROLLUP" => Some(TokenKind::Rollup),

        // Joins
        "JOIN" => Some(TokenKind::Join),
        "INNER" => Some(TokenKind::Inner),
        "LEFT" => Some(TokenKind::Left),
        "RIGHT" => Some(TokenKind::Right),
        "FULL" => Some(TokenKind::Full),
        "OUTER" => Some(TokenKind::Outer),
        "CROSS" => Some(TokenKind::Cross),
        "NATURAL" => Some(TokenKind::Natural),
        "STRAIGHT_JOIN" => Some(TokenKind::StraightJoin),
        "APPLY" => Some(TokenKind::Apply),
        "ON" => Some(TokenKind::On),
        "USING" => Some(TokenKind::Using),

        // Set operators
        "UNION" => Some(TokenKind::Union),
        "EXCEPT" => Some(TokenKind::Except),
        "INTERSECT" => Some(TokenKind::Intersect),
        "MINUS" => Some(TokenKind::Minus),

        // Predicates and logic
        "AND" => Some(TokenKind::And),
        "OR" => Some(TokenKind::Or),
        "NOT" => Some(TokenKind::Not),
        "IN" => Some(TokenKind::In),
        "BETWEEN" => Some(TokenKind::Between),
        "LIKE" => Some(TokenKind::Like),
        "IS" => Some(TokenKind::Is),
        "EXISTS" => Some(TokenKind::Exists),
        "CASE" => Some(TokenKind::Case),
        "WHEN" => Some(TokenKind::When),
        "THEN" => Some(TokenKind::Then),
        "ELSE" => Some(TokenKind::Else),
        "END" => Some(TokenKind::End),

        // Literals
        "NULL" => Some(TokenKind::Null),
        "TRUE" => Some(TokenKind::True),
        "FALSE" => Some(TokenKind::False),

        // Aggregates
        "MAX" => Some(TokenKind::Max),
        "MIN" => Some(TokenKind::Min),
        "SUM" => Some(TokenKind::Sum),
        "AVG" => Some(TokenKind::Avg),
        "COUNT" => Some(TokenKind::Count),

        // Pagination and locking
        "LIMIT" => Some(TokenKind::Limit),
        "OFFSET" => Some(TokenKind::Offset),
        "FETCH" => Some(TokenKind::Fetch),
        "FIRST" => Some(TokenKind::First),
        "NEXT" => Some(TokenKind::Next),
        "ROW" => Some(TokenKind::Row),
        "ROWS" => Some(TokenKind::Rows),
        "ONLY" => Some(TokenKind::Only),
        "FOR" => Some(TokenKind::For),
        "UPDATE" => Some(TokenKind::Update),
        "SHARE" => Some(TokenKind::Share),
        "NOWAIT" => Some(TokenKind::Nowait),
        "LOCK" => Some(TokenKind::Lock),
        "MODE" => Some(TokenKind::Mode),

        _ => None,
    }
}

/// Returns true if the given name is a keyword (case-insensitive).
pub fn is_keyword(name: &str) -> bool {
    lookup_keyword(name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_case_insensitive() {
        assert_eq!(lookup_keyword("select"), Some(TokenKind::Select));
        assert_eq!(lookup_keyword("SeLeCt"), Some(TokenKind::Select));
        assert_eq!(lookup_keyword("straight_join"), Some(TokenKind::StraightJoin));
        assert_eq!(lookup_keyword("DistinctRow"), Some(TokenKind::Distinctrow));
    }

    #[test]
    fn non_keywords_are_not_found() {
        assert_eq!(lookup_keyword("t_order"), None);
        assert_eq!(lookup_keyword("user_id"), None);
        assert!(!is_keyword("score"));
        assert!(is_keyword("minus"));
    }
}
