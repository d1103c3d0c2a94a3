//! The message-answering pipeline.
//!
//! [`Assistant::reply`] detects the intent of an inbound message and routes
//! it to a player lookup, the valuation model, semantic search, or the
//! question-answering path (canned query, then text-to-SQL). It always
//! produces a reply: failures are logged and turned into an apology.

mod cache;
mod players;
mod queries;

use std::sync::Arc;
use std::time::Duration;

use auction_ai::{LlmProvider, PlayerIndex, ResponseComposer, TextToSqlEngine};
use auction_core::cache_key::CacheNamespace;
use auction_core::format::{ERROR_MESSAGE, HELP_MESSAGE};
use auction_core::intent::{detect_intent, Intent};
use auction_core::player::SimilarPlayer;
use auction_db::DbPool;

pub use cache::ResponseCache;

use crate::config::ServerConfig;
use crate::error::AppResult;

/// Timeouts and cache lifetimes used by the pipeline.
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    /// Overall budget for one reply; exceeding it yields the apology.
    pub reply_timeout: Duration,
    pub query_timeout: Duration,
    pub sql_cache_ttl: Duration,
    pub answer_cache_ttl: Duration,
    pub player_cache_ttl: Duration,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            reply_timeout: Duration::from_secs(24),
            query_timeout: Duration::from_secs(5),
            sql_cache_ttl: CacheNamespace::Sql.default_ttl(),
            answer_cache_ttl: CacheNamespace::Answer.default_ttl(),
            player_cache_ttl: CacheNamespace::Player.default_ttl(),
        }
    }
}

impl AssistantSettings {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            reply_timeout: config.reply_timeout(),
            query_timeout: config.query_timeout(),
            sql_cache_ttl: Duration::from_secs(config.sql_cache_ttl_secs),
            answer_cache_ttl: Duration::from_secs(config.answer_cache_ttl_secs),
            ..Self::default()
        }
    }
}

pub struct Assistant {
    pool: DbPool,
    cache: ResponseCache,
    sql_engine: Option<TextToSqlEngine>,
    composer: ResponseComposer,
    index: Option<Arc<dyn PlayerIndex>>,
    settings: AssistantSettings,
}

impl Assistant {
    pub fn new(
        pool: DbPool,
        llm: Option<Arc<dyn LlmProvider>>,
        index: Option<Arc<dyn PlayerIndex>>,
        settings: AssistantSettings,
    ) -> Self {
        Self {
            cache: ResponseCache::new(pool.clone()),
            pool,
            sql_engine: llm.clone().map(TextToSqlEngine::new),
            composer: ResponseComposer::new(llm),
            index,
            settings,
        }
    }

    /// Whether a language model is available for translation and composing.
    pub fn llm_configured(&self) -> bool {
        self.sql_engine.is_some()
    }

    /// Answer a user message. Never fails: errors and replies that take
    /// longer than the reply budget become an apology.
    pub async fn reply(&self, message: &str) -> String {
        let budget = self.settings.reply_timeout;
        match tokio::time::timeout(budget, self.handle(message.trim())).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Assistant pipeline failed");
                ERROR_MESSAGE.to_string()
            }
            Err(_) => {
                tracing::error!(budget_ms = budget.as_millis() as u64, "Assistant reply timed out");
                ERROR_MESSAGE.to_string()
            }
        }
    }

    async fn handle(&self, message: &str) -> AppResult<String> {
        if message.is_empty() {
            return Ok(HELP_MESSAGE.to_string());
        }

        let intent = detect_intent(message);
        tracing::info!(intent = intent.as_str(), "Intent detected");

        match intent {
            Intent::PlayerStats => self.player_stats(message).await,
            Intent::Valuation => self.valuation(message).await,
            Intent::Comparison => self.comparison(message).await,
            Intent::HiddenGems => self.hidden_gems(message).await,
            Intent::Ranking | Intent::GeneralQuery => self.answer_question(message, intent).await,
        }
    }

    /// Semantic search; `None` when no index is configured or the search failed.
    async fn search_index(&self, query: &str, limit: usize) -> Option<Vec<SimilarPlayer>> {
        let index = self.index.as_ref()?;
        match index.search_similar(query, limit).await {
            Ok(hits) => Some(hits),
            Err(e) => {
                tracing::warn!(error = %e, "Vector search failed");
                None
            }
        }
    }
}
