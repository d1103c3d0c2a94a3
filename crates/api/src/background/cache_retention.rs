//! Periodic cleanup of expired cache entries and stale search counters.

use std::time::Duration;

use auction_db::repositories::{CacheRepo, SearchCountRepo};
use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(600);

/// Search counters untouched for this many days are dropped.
pub const SEARCH_COUNT_RETENTION_DAYS: i64 = 30;

/// Outcome of one cleanup pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PurgeReport {
    pub cache_entries: u64,
    pub search_counts: u64,
}

/// Delete expired cache rows and stale search counters once.
pub async fn purge_once(pool: &PgPool) -> Result<PurgeReport, sqlx::Error> {
    let cache_entries = CacheRepo::purge_expired(pool).await?;
    let cutoff = Utc::now() - chrono::Duration::days(SEARCH_COUNT_RETENTION_DAYS);
    let search_counts = SearchCountRepo::purge_stale(pool, cutoff).await?;
    Ok(PurgeReport {
        cache_entries,
        search_counts,
    })
}

/// Run the cache retention loop until `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        retention_days = SEARCH_COUNT_RETENTION_DAYS,
        "Cache retention job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Cache retention job stopping");
                break;
            }
            _ = interval.tick() => {
                match purge_once(&pool).await {
                    Ok(report) if report.cache_entries > 0 || report.search_counts > 0 => {
                        tracing::info!(
                            cache_entries = report.cache_entries,
                            search_counts = report.search_counts,
                            "Cache retention: purged rows"
                        );
                    }
                    Ok(_) => tracing::debug!("Cache retention: nothing to purge"),
                    Err(e) => tracing::error!(error = %e, "Cache retention: cleanup failed"),
                }
            }
        }
    }
}
