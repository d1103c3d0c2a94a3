//! Cache key derivation.
//!
//! Questions are normalized before hashing so trivially different phrasings
//! ("Top 5 batsmen?" vs "top 5  batsmen") share a cache entry.

use std::time::Duration;

use sha2::{Digest, Sha256};

/// Cache namespaces and their default time-to-live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheNamespace {
    /// Question -> generated SQL.
    Sql,
    /// Question -> final reply text.
    Answer,
    /// Player id -> profile JSON.
    Player,
}

impl CacheNamespace {
    pub fn prefix(self) -> &'static str {
        match self {
            CacheNamespace::Sql => "sql",
            CacheNamespace::Answer => "answer",
            CacheNamespace::Player => "player",
        }
    }

    pub fn default_ttl(self) -> Duration {
        match self {
            CacheNamespace::Sql => Duration::from_secs(3600),
            CacheNamespace::Answer => Duration::from_secs(1800),
            CacheNamespace::Player => Duration::from_secs(7200),
        }
    }
}

/// Lower-case, trim, collapse whitespace and drop trailing punctuation.
pub fn normalize_question(question: &str) -> String {
    question
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(['?', '!', '.'])
        .trim_end()
        .to_string()
}

/// Key for a question-scoped entry: `"{namespace}:{sha256(normalized)}"`.
pub fn question_key(namespace: CacheNamespace, question: &str) -> String {
    let digest = Sha256::digest(normalize_question(question).as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("{}:{hex}", namespace.prefix())
}

/// Key for an id-scoped entry: `"{namespace}:{id}"`.
pub fn id_key(namespace: CacheNamespace, id: i64) -> String {
    format!("{}:{id}", namespace.prefix())
}
