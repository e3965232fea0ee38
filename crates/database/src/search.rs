//! Free-text name matching shared by student and history search.
//!
//! A query is split into whitespace tokens. Every token is matched as a
//! case-insensitive substring against each column, and all of those
//! comparisons are joined with `OR`: a row matching any single token in any
//! column is returned.
//!
//! SQLite's `LIKE` only folds ASCII case, so searchable columns have a
//! `*_folded` twin written with [`fold`] and tokens are folded the same way.

use sqlx::{QueryBuilder, Sqlite};

/// Unicode case folding applied to both stored names and query tokens.
pub fn fold(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Split a query into folded search tokens.
pub fn tokenize(query: &str) -> Vec<String> {
    query.split_whitespace().map(fold).collect()
}

/// Build a `LIKE` pattern matching `token` anywhere, with wildcards escaped.
pub fn like_pattern(token: &str) -> String {
    let mut pattern = String::with_capacity(token.len() + 2);
    pattern.push('%');
    for c in token.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Append `(col1 LIKE ? OR col2 LIKE ? OR ...)` covering every token.
///
/// `tokens` must not be empty.
pub fn push_token_filter<'args>(
    builder: &mut QueryBuilder<'args, Sqlite>,
    tokens: &[String],
    columns: &[&str],
) {
    debug_assert!(!tokens.is_empty());

    builder.push("(");
    let mut first = true;
    for token in tokens {
        let pattern = like_pattern(token);
        for column in columns {
            if !first {
                builder.push(" OR ");
            }
            first = false;
            builder
                .push(*column)
                .push(" LIKE ")
                .push_bind(pattern.clone())
                .push(" ESCAPE '\\'");
        }
    }
    builder.push(")");
}
