//! Best-effort cache over `cache_entries`.
//!
//! Read and write failures are logged and treated as misses so a cache
//! outage never fails a user request.

use std::time::Duration;

use auction_db::repositories::CacheRepo;
use auction_db::DbPool;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Clone)]
pub struct ResponseCache {
    pool: DbPool,
}

impl ResponseCache {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match CacheRepo::get(&self.pool, key).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(v) => {
                    tracing::debug!(key, "Cache hit");
                    Some(v)
                }
                Err(e) => {
                    tracing::warn!(key, error = %e, "Cached value has unexpected shape, ignoring");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, error = %e, "Cache value not serializable");
                return;
            }
        };
        if let Err(e) = CacheRepo::set(&self.pool, key, &value, ttl).await {
            tracing::warn!(key, error = %e, "Cache write failed");
        }
    }

    pub async fn invalidate(&self, key: &str) {
        if let Err(e) = CacheRepo::delete(&self.pool, key).await {
            tracing::warn!(key, error = %e, "Cache delete failed");
        }
    }

    pub async fn get_text(&self, key: &str) -> Option<String> {
        self.get_json::<String>(key).await
    }

    pub async fn set_text(&self, key: &str, text: &str, ttl: Duration) {
        self.set_json(key, &text, ttl).await;
    }
}
