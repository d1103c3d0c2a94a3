//! Repository for player search popularity counters.

use auction_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::search_count::SearchCount;

const COLUMNS: &str = "player_name, count, last_searched_at";

/// Provides search counter operations.
pub struct SearchCountRepo;

impl SearchCountRepo {
    /// Record one search for `player_name`, returning the new count.
    pub async fn increment(pool: &PgPool, player_name: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO search_counts (player_name, count, last_searched_at) \
             VALUES ($1, 1, NOW()) \
             ON CONFLICT (player_name) DO UPDATE SET \
                count = search_counts.count + 1, \
                last_searched_at = NOW() \
             RETURNING count",
        )
        .bind(player_name)
        .fetch_one(pool)
        .await
    }

    /// The most searched players, highest count first.
    pub async fn top(pool: &PgPool, limit: i64) -> Result<Vec<SearchCount>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM search_counts \
             ORDER BY count DESC, player_name ASC \
             LIMIT $1"
        );
        sqlx::query_as::<_, SearchCount>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Total searches across all players.
    pub async fn total(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COALESCE(SUM(count), 0)::BIGINT FROM search_counts")
            .fetch_one(pool)
            .await
    }

    /// Delete counters not touched since `cutoff`. Returns the number removed.
    pub async fn purge_stale(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM search_counts WHERE last_searched_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
