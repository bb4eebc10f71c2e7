//! String escaping utilities for PostgreSQL statements.

/// Escape a string for use inside a single-quoted SQL literal.
///
/// Doubles embedded single quotes; backslashes are left alone since
/// `standard_conforming_strings` is on by default.
pub fn escape_literal(s: &str) -> String {
    s.replace('\'', "''")
}

/// Render a string as a complete single-quoted SQL literal.
#[inline]
pub fn quote_literal(s: &str) -> String {
    format!("'{}'", escape_literal(s))
}

/// Render a list of strings as comma-separated SQL literals.
pub fn quote_literal_list(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| quote_literal(v))
        .collect::<Vec<_>>()
        .join(", ")
}
