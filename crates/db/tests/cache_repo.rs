//! Integration tests for the expiring key/value cache and search counters.

use std::time::Duration;

use auction_db::repositories::{CacheRepo, SearchCountRepo};
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn set_get_overwrite_delete(pool: PgPool) {
    let ttl = Duration::from_secs(60);
    CacheRepo::set(&pool, "sql:abc", &json!("SELECT 1;"), ttl)
        .await
        .unwrap();
    assert_eq!(
        CacheRepo::get(&pool, "sql:abc").await.unwrap(),
        Some(json!("SELECT 1;"))
    );

    CacheRepo::set(&pool, "sql:abc", &json!("SELECT 2;"), ttl)
        .await
        .unwrap();
    assert_eq!(
        CacheRepo::get(&pool, "sql:abc").await.unwrap(),
        Some(json!("SELECT 2;"))
    );

    assert!(CacheRepo::delete(&pool, "sql:abc").await.unwrap());
    assert!(!CacheRepo::delete(&pool, "sql:abc").await.unwrap());
    assert_eq!(CacheRepo::get(&pool, "sql:abc").await.unwrap(), None);
}

#[sqlx::test(migrations = "./migrations")]
async fn expired_entries_are_misses_and_purged(pool: PgPool) {
    CacheRepo::set(&pool, "answer:old", &json!("stale"), Duration::from_secs(60))
        .await
        .unwrap();
    CacheRepo::set(&pool, "answer:new", &json!("fresh"), Duration::from_secs(60))
        .await
        .unwrap();
    sqlx::query("UPDATE cache_entries SET expires_at = NOW() - INTERVAL '1 second' WHERE key = 'answer:old'")
        .execute(&pool)
        .await
        .unwrap();

    assert_eq!(CacheRepo::get(&pool, "answer:old").await.unwrap(), None);
    assert_eq!(CacheRepo::purge_expired(&pool).await.unwrap(), 1);
    assert!(CacheRepo::find_entry(&pool, "answer:new")
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn search_counts_rank_and_purge(pool: PgPool) {
    for name in ["Virat Kohli", "MS Dhoni", "Virat Kohli"] {
        SearchCountRepo::increment(&pool, name).await.unwrap();
    }

    let top = SearchCountRepo::top(&pool, 10).await.unwrap();
    assert_eq!(top[0].player_name, "Virat Kohli");
    assert_eq!(top[0].count, 2);
    assert_eq!(SearchCountRepo::total(&pool).await.unwrap(), 3);

    sqlx::query("UPDATE search_counts SET last_searched_at = NOW() - INTERVAL '40 days' WHERE player_name = 'MS Dhoni'")
        .execute(&pool)
        .await
        .unwrap();
    let cutoff = Utc::now() - chrono::Duration::days(30);
    assert_eq!(SearchCountRepo::purge_stale(&pool, cutoff).await.unwrap(), 1);
    assert_eq!(SearchCountRepo::top(&pool, 10).await.unwrap().len(), 1);
}
