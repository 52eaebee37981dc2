//! Identifier normalization.

use smol_str::SmolStr;

/// Characters used to quote identifiers or literals across dialects.
const QUOTE_CHARS: &[char] = &['[', ']', '`', '\'', '"'];

/// Strips every quoting character from `value`.
///
/// `` `t_order` ``, `"t_order"` and `[t_order]` all normalize to `t_order`.
/// Quote characters are removed wherever they appear, so `` `o`.`id` ``
/// becomes `o.id`.
pub fn exact_value(value: &str) -> SmolStr {
    if !value.contains(QUOTE_CHARS) {
        return SmolStr::new(value);
    }
    value.chars().filter(|ch| !QUOTE_CHARS.contains(ch)).collect()
}

/// Returns the value of a quoted string literal.
///
/// The outer quotes are removed and doubled or backslash-escaped quotes
/// collapse to one. Text without surrounding quotes is returned unchanged.
pub fn unquote_literal(literal: &str) -> SmolStr {
    let mut chars = literal.chars();
    let quote = match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && (open == '\'' || open == '"') => open,
        _ => return SmolStr::new(literal),
    };
    let body = chars.as_str();
    let mut value = String::with_capacity(body.len());
    let mut iter = body.chars().peekable();
    while let Some(ch) = iter.next() {
        if (ch == quote || ch == '\\') && iter.peek() == Some(&quote) {
            iter.next();
            value.push(quote);
        } else {
            value.push(ch);
        }
    }
    SmolStr::from(value)
}

/// Case-insensitive comparison of two already normalized names.
pub fn same_name(left: &str, right: &str) -> bool {
    left.eq_ignore_ascii_case(right)
}
