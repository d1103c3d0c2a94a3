//! Player search popularity counters.

use auction_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `search_counts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SearchCount {
    pub player_name: String,
    pub count: i64,
    pub last_searched_at: Timestamp,
}
