//! Question answering: answer cache, canned queries, then text-to-SQL.

use auction_core::cache_key::{question_key, CacheNamespace};
use auction_core::canned::CannedQuery;
use auction_core::format::{self, HELP_MESSAGE, NO_RESULTS_MESSAGE};
use auction_core::intent::Intent;
use auction_core::sql_guard::validate_select;
use auction_db::repositories::QueryRepo;

use super::Assistant;
use crate::error::AppResult;

const GENERATION_FAILED: &str = "Could not generate valid SQL query";
const EXECUTION_FAILED: &str = "Query execution failed";

/// Hits shown when a general question falls back to semantic search.
const FALLBACK_SEARCH_LIMIT: usize = 5;

impl Assistant {
    pub(super) async fn answer_question(&self, question: &str, intent: Intent) -> AppResult<String> {
        let answer_key = question_key(CacheNamespace::Answer, question);
        if let Some(cached) = self.cache.get_text(&answer_key).await {
            return Ok(cached);
        }

        if let Some(canned) = CannedQuery::match_question(question) {
            match QueryRepo::fetch_json_rows(&self.pool, canned.sql(), self.settings.query_timeout)
                .await
            {
                Ok(rows) => {
                    tracing::info!(query = canned.name(), rows = rows.len(), "Answered with canned query");
                    let reply = format::query_result(question, &rows);
                    if !rows.is_empty() {
                        self.cache
                            .set_text(&answer_key, &reply, self.settings.answer_cache_ttl)
                            .await;
                    }
                    return Ok(reply);
                }
                Err(e) => {
                    tracing::warn!(query = canned.name(), error = %e, "Canned query failed, trying text-to-SQL");
                }
            }
        }

        match self.generated_answer(question).await {
            Ok(reply) => {
                if reply != NO_RESULTS_MESSAGE {
                    self.cache
                        .set_text(&answer_key, &reply, self.settings.answer_cache_ttl)
                        .await;
                }
                Ok(reply)
            }
            Err(reason) if intent == Intent::GeneralQuery => {
                tracing::info!(reason, "Falling back to semantic search");
                match self.search_index(question, FALLBACK_SEARCH_LIMIT).await {
                    Some(hits) if !hits.is_empty() => Ok(format::similar_players(&hits)),
                    _ => Ok(HELP_MESSAGE.to_string()),
                }
            }
            Err(reason) => Ok(format::query_failure(reason)),
        }
    }

    /// Translate, execute and compose. `Err` carries a user-facing reason.
    async fn generated_answer(&self, question: &str) -> Result<String, &'static str> {
        let sql = self.sql_for(question).await?;

        let rows = QueryRepo::fetch_json_rows(&self.pool, &sql, self.settings.query_timeout)
            .await
            .map_err(|e| {
                tracing::warn!(sql = %sql, error = %e, "Generated SQL failed to execute");
                EXECUTION_FAILED
            })?;
        tracing::info!(rows = rows.len(), "Executed generated SQL");

        if rows.is_empty() {
            return Ok(NO_RESULTS_MESSAGE.to_string());
        }
        Ok(self
            .composer
            .compose(question, &serde_json::Value::Array(rows))
            .await)
    }

    /// SQL for a question, from the SQL cache or the language model.
    async fn sql_for(&self, question: &str) -> Result<String, &'static str> {
        let key = question_key(CacheNamespace::Sql, question);
        if let Some(sql) = self.cache.get_text(&key).await {
            if validate_select(&sql).is_ok() {
                return Ok(sql);
            }
            tracing::warn!(key = %key, "Cached SQL failed validation, regenerating");
            self.cache.invalidate(&key).await;
        }

        let Some(engine) = &self.sql_engine else {
            tracing::debug!("No language model configured for text-to-SQL");
            return Err(GENERATION_FAILED);
        };

        match engine.translate(question).await {
            Ok(sql) => {
                self.cache
                    .set_text(&key, &sql, self.settings.sql_cache_ttl)
                    .await;
                Ok(sql)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Text-to-SQL failed");
                Err(GENERATION_FAILED)
            }
        }
    }
}
