//! Cache entry model.

use auction_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `cache_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CacheEntry {
    pub key: String,
    pub value: serde_json::Value,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}
