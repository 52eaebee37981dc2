//! Common test utilities
//!
//! Shared helpers for the integration tests.
//!
//! # Parsing Helpers
//! - [`analyse`] - Analyse a statement with the generic dialect, panicking on failure
//! - [`analyse_with`] - Same, with an explicit dialect
//! - [`analyse_err`] - Analyse a statement that is expected to fail
//!
//! # Rewrite Helpers
//! - [`rewrite`] - Apply a context's edits to the original SQL text
//! - [`substitution_positions`] - Offsets of all identifier substitutions

#![allow(dead_code)]

use sharding_parser::{Dialect, Edit, ParseError, SelectContext, parse_select_with};

/// Analyse `sql` with the generic dialect.
///
/// # Panics
/// Panics with the rendered diagnostic if analysis fails.
pub fn analyse(sql: &str) -> SelectContext {
    analyse_with(sql, Dialect::generic())
}

/// Analyse `sql` with `dialect`, panicking with the rendered diagnostic on failure.
pub fn analyse_with(sql: &str, dialect: Dialect) -> SelectContext {
    match parse_select_with(sql, dialect) {
        Ok(context) => context,
        Err(error) => panic!(
            "unexpected failure for `{sql}`:\n{:?}",
            error.to_report(sql)
        ),
    }
}

/// Analyse `sql` and return the error it must produce.
pub fn analyse_err(sql: &str) -> ParseError {
    match parse_select_with(sql, Dialect::generic()) {
        Ok(context) => panic!("expected `{sql}` to fail, got {context:#?}"),
        Err(error) => error,
    }
}

/// Applies every edit of `context` to `sql`.
///
/// Substitutions replace the original identifier with `physical(name)`;
/// insertions splice `, <text>` in front of the text at their position.
/// Edits are applied back to front so earlier offsets stay valid.
pub fn rewrite(sql: &str, context: &SelectContext, physical: impl Fn(&str) -> String) -> String {
    let mut result = sql.to_string();
    let edits = context.sorted_edits();
    for edit in edits.iter().rev() {
        match edit {
            Edit::ColumnInsertion { position, text } => {
                result.insert_str(*position, &format!(", {text}"));
            }
            Edit::IdentifierSubstitution { position, original } => {
                result.replace_range(*position..*position + original.len(), &physical(original));
            }
        }
    }
    result
}

/// Offsets of the identifier substitutions, in position order.
pub fn substitution_positions(context: &SelectContext) -> Vec<usize> {
    context
        .sorted_edits()
        .iter()
        .filter(|edit| edit.is_identifier_substitution())
        .map(Edit::position)
        .collect()
}
