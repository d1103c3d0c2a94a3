//! Operator CLI: schema bootstrap, sample data, diagnostics, vector
//! indexing and cache maintenance.

use std::sync::Arc;

use anyhow::{bail, Context};
use auction_ai::{EmbeddingProvider, GeminiProvider, VectorStore};
use auction_api::background::cache_retention;
use auction_api::config::ServerConfig;
use auction_core::cache_key::{id_key, CacheNamespace};
use auction_core::canned::CannedQuery;
use auction_core::format;
use auction_core::player::PlayerProfile;
use auction_db::repositories::{CacheRepo, PlayerRepo, QueryRepo};
use auction_db::DbPool;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "auction-admin", about = "Maintenance tasks for the auction insights assistant")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply migrations and list the tables
    InitDb,
    /// Insert the sample players, warm the player cache and index them
    Seed,
    /// Print row counts and run the top-batsmen diagnostic query
    Check,
    /// (Re)index every player into the vector store
    IndexVectors,
    /// Delete expired cache entries and stale search counters
    PurgeCache,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, "Running admin command");

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = auction_db::create_pool(&database_url)
        .await
        .context("failed to connect to database")?;

    match cli.command {
        Command::InitDb => init_db(&pool).await,
        Command::Seed => seed(&pool).await,
        Command::Check => check(&pool).await,
        Command::IndexVectors => index_vectors(&pool).await,
        Command::PurgeCache => purge_cache(&pool).await,
    }
}

async fn init_db(pool: &DbPool) -> anyhow::Result<()> {
    auction_db::run_migrations(pool)
        .await
        .context("failed to run migrations")?;
    let tables = auction_db::list_tables(pool).await?;

    println!("Database initialized. Tables:");
    for table in tables {
        println!("  - {table}");
    }
    Ok(())
}

async fn seed(pool: &DbPool) -> anyhow::Result<()> {
    auction_db::run_migrations(pool)
        .await
        .context("failed to run migrations")?;

    let report = auction_db::seed::seed_sample_players(pool).await?;
    println!(
        "Inserted {} player(s), skipped {} existing.",
        report.inserted.len(),
        report.skipped.len()
    );

    let ttl = CacheNamespace::Player.default_ttl();
    for profile in &report.inserted {
        let value = serde_json::to_value(profile)?;
        CacheRepo::set(pool, &id_key(CacheNamespace::Player, profile.id), &value, ttl).await?;
        tracing::debug!(player_id = profile.id, name = %profile.name, "Cached player profile");
    }
    println!("Cached {} player profile(s).", report.inserted.len());

    match vector_store(&ServerConfig::from_env())? {
        Some(store) if !report.inserted.is_empty() => {
            let indexed = index(&store, &report.inserted).await?;
            println!("Indexed {indexed} player(s) into the vector store.");
        }
        Some(_) => println!("No new players to index."),
        None => println!("Vector store not configured, skipping indexing."),
    }
    Ok(())
}

async fn check(pool: &DbPool) -> anyhow::Result<()> {
    let counts = PlayerRepo::counts(pool).await?;
    println!("Players:       {}", counts.players);
    println!("Batting stats: {}", counts.batting_stats);
    println!("Bowling stats: {}", counts.bowling_stats);

    let question = "Top 5 batsmen by IPL runs";
    let rows = QueryRepo::fetch_json_rows(
        pool,
        CannedQuery::TopBatsmen.sql(),
        std::time::Duration::from_secs(5),
    )
    .await
    .context("diagnostic query failed")?;
    println!();
    println!("{}", format::query_result(question, &rows));
    Ok(())
}

async fn index_vectors(pool: &DbPool) -> anyhow::Result<()> {
    let Some(store) = vector_store(&ServerConfig::from_env())? else {
        bail!("QDRANT_URL and GEMINI_API_KEY must be set to index players");
    };
    let profiles = PlayerRepo::list_profiles(pool).await?;
    let indexed = index(&store, &profiles).await?;
    println!("Indexed {indexed} player(s) into the vector store.");
    Ok(())
}

async fn purge_cache(pool: &DbPool) -> anyhow::Result<()> {
    let report = cache_retention::purge_once(pool).await?;
    println!(
        "Purged {} expired cache entries and {} stale search counters.",
        report.cache_entries, report.search_counts
    );
    Ok(())
}

/// Build the vector store client when both Qdrant and Gemini are configured.
fn vector_store(config: &ServerConfig) -> anyhow::Result<Option<VectorStore>> {
    let (Some(qdrant), Some(gemini)) = (&config.qdrant, &config.gemini) else {
        return Ok(None);
    };
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(GeminiProvider::new(
        &gemini.api_key,
        &gemini.model,
        &gemini.embedding_model,
    )?);
    Ok(Some(VectorStore::new(
        &qdrant.url,
        qdrant.api_key.clone(),
        embedder,
    )?))
}

async fn index(store: &VectorStore, profiles: &[PlayerProfile]) -> anyhow::Result<usize> {
    tracing::info!(players = profiles.len(), "Indexing players");
    store
        .ensure_collection()
        .await
        .context("failed to prepare Qdrant collection")?;
    Ok(store.upsert_players(profiles).await?)
}
