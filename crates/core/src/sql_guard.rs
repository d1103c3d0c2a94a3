//! Cleaning and safety checks for model-generated SQL.
//!
//! Generated SQL is untrusted input. [`clean_sql`] normalizes what the model
//! returns (code fences, whitespace, terminator) and [`validate_select`]
//! rejects anything that is not a single read-only `SELECT`/`WITH` statement.
//! The database layer additionally runs accepted statements inside a
//! read-only transaction.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;

/// Keywords that must never appear as whole words in generated SQL.
pub const FORBIDDEN_KEYWORDS: &[&str] = &[
    "DROP", "DELETE", "TRUNCATE", "ALTER", "CREATE", "INSERT", "UPDATE", "GRANT", "REVOKE",
];

static FORBIDDEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"(?i)\b({})\b", FORBIDDEN_KEYWORDS.join("|"));
    Regex::new(&pattern).expect("forbidden keyword pattern is valid")
});

static CODE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(sql)?").expect("code fence pattern is valid"));

/// Strip Markdown fences, collapse whitespace and terminate with one `;`.
pub fn clean_sql(raw: &str) -> String {
    let unfenced = CODE_FENCE_RE.replace_all(raw, " ");
    let collapsed = unfenced.split_whitespace().collect::<Vec<_>>().join(" ");
    let body = collapsed.trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    if body.is_empty() {
        return String::new();
    }
    format!("{body};")
}

/// The statement without its trailing terminator, ready to embed as a subquery.
pub fn strip_terminator(sql: &str) -> &str {
    sql.trim().trim_end_matches(';').trim_end()
}

/// Accept only a single read-only `SELECT` or `WITH` statement.
pub fn validate_select(sql: &str) -> Result<(), CoreError> {
    let body = strip_terminator(sql);
    if body.is_empty() {
        return Err(CoreError::UnsafeSql("empty statement".into()));
    }

    let upper = body.to_uppercase();
    if !(upper.starts_with("SELECT") || upper.starts_with("WITH")) {
        return Err(CoreError::UnsafeSql(
            "statement must start with SELECT or WITH".into(),
        ));
    }

    if let Some(m) = FORBIDDEN_RE.find(body) {
        return Err(CoreError::UnsafeSql(format!(
            "forbidden keyword {}",
            m.as_str().to_uppercase()
        )));
    }

    if body.contains(';') {
        return Err(CoreError::UnsafeSql("multiple statements".into()));
    }

    if body.contains("--") || body.contains("/*") {
        return Err(CoreError::UnsafeSql("comments are not allowed".into()));
    }

    Ok(())
}
