//! Repository for the `cache_entries` key/value table.
//!
//! Expired rows are invisible to [`CacheRepo::get`] even before the purge
//! job removes them.

use std::time::Duration;

use sqlx::PgPool;

use crate::models::cache::CacheEntry;

const COLUMNS: &str = "key, value, expires_at, created_at";

/// Provides expiring key/value operations.
pub struct CacheRepo;

impl CacheRepo {
    /// Fetch a live entry's value.
    pub async fn get(pool: &PgPool, key: &str) -> Result<Option<serde_json::Value>, sqlx::Error> {
        sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT value FROM cache_entries WHERE key = $1 AND expires_at > NOW()",
        )
        .bind(key)
        .fetch_optional(pool)
        .await
    }

    /// Fetch a live entry with its metadata.
    pub async fn find_entry(pool: &PgPool, key: &str) -> Result<Option<CacheEntry>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM cache_entries WHERE key = $1 AND expires_at > NOW()");
        sqlx::query_as::<_, CacheEntry>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite an entry that expires `ttl` from now.
    pub async fn set(
        pool: &PgPool,
        key: &str,
        value: &serde_json::Value,
        ttl: Duration,
    ) -> Result<(), sqlx::Error> {
        let ttl_secs = ttl.as_secs_f64();
        sqlx::query(
            "INSERT INTO cache_entries (key, value, expires_at) \
             VALUES ($1, $2, NOW() + make_interval(secs => $3)) \
             ON CONFLICT (key) DO UPDATE SET \
                value = EXCLUDED.value, \
                expires_at = EXCLUDED.expires_at, \
                created_at = NOW()",
        )
        .bind(key)
        .bind(value)
        .bind(ttl_secs)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove an entry. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, key: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE key = $1")
            .bind(key)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every expired entry. Returns the number removed.
    pub async fn purge_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cache_entries WHERE expires_at <= NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
