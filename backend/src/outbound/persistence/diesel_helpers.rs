//! SQL helpers shared by the Diesel adapters.

use diesel::sql_types::Text;

diesel::define_sql_function! {
    /// PostgreSQL `lower(text)`, used for case-insensitive name matches.
    fn lower(value: Text) -> Text;
}

/// Wrap `needle` for a `LIKE`/`ILIKE` substring match, escaping wildcards.
pub fn contains_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
