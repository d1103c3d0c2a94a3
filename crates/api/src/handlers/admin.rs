//! Operator endpoints: proactive sends, broadcasts and usage stats.
//!
//! All endpoints require [`RequireAdminToken`].

use std::sync::Arc;

use auction_core::error::CoreError;
use auction_core::search::clamp_limit;
use auction_db::models::search_count::SearchCount;
use auction_db::repositories::SearchCountRepo;
use auction_messaging::{MessageSender, SentMessage};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::admin_auth::RequireAdminToken;
use crate::response::DataResponse;
use crate::state::AppState;

/// Concurrent sends during a broadcast.
const BROADCAST_CONCURRENCY: usize = 4;

const DEFAULT_STATS_LIMIT: i64 = 10;
const MAX_STATS_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub to: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    pub status: &'static str,
    pub sid: String,
    pub to: String,
}

#[derive(Debug, Deserialize)]
pub struct BroadcastRequest {
    pub recipients: Vec<String>,
    pub message: String,
}

/// Outcome for a single broadcast recipient.
#[derive(Debug, Serialize)]
pub struct RecipientResult {
    pub recipient: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BroadcastResponse {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<RecipientResult>,
}

#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UsageStats {
    pub popular_players: Vec<SearchCount>,
    pub total_searches: i64,
}

fn sender(state: &AppState) -> AppResult<Arc<dyn MessageSender>> {
    state
        .sender
        .clone()
        .ok_or_else(|| AppError::ServiceUnavailable("Outbound messaging is not configured".into()))
}

fn require_message(message: &str) -> AppResult<()> {
    if message.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "message must not be empty".into(),
        )));
    }
    Ok(())
}

/// POST /whatsapp/send
pub async fn send_message(
    _admin: RequireAdminToken,
    State(state): State<AppState>,
    Json(input): Json<SendRequest>,
) -> AppResult<impl IntoResponse> {
    require_message(&input.message)?;
    let sender = sender(&state)?;

    let SentMessage { sid, to, .. } = sender.send(&input.to, &input.message).await?;
    tracing::info!(to = %to, sid = %sid, "Proactive message sent");

    Ok(Json(SendResponse {
        status: "sent",
        sid,
        to,
    }))
}

/// POST /broadcast
///
/// Sends to every recipient; a failed recipient does not stop the rest.
/// Results are returned in request order.
pub async fn broadcast(
    _admin: RequireAdminToken,
    State(state): State<AppState>,
    Json(input): Json<BroadcastRequest>,
) -> AppResult<impl IntoResponse> {
    require_message(&input.message)?;
    let sender = sender(&state)?;
    let message = input.message.as_str();

    let results: Vec<RecipientResult> = stream::iter(input.recipients)
        .map(|recipient| {
            let sender = Arc::clone(&sender);
            async move {
                match sender.send(&recipient, message).await {
                    Ok(sent) => RecipientResult {
                        recipient,
                        status: "sent",
                        sid: Some(sent.sid),
                        error: None,
                    },
                    Err(e) => {
                        tracing::warn!(recipient = %recipient, error = %e, "Broadcast send failed");
                        RecipientResult {
                            recipient,
                            status: "failed",
                            sid: None,
                            error: Some(e.to_string()),
                        }
                    }
                }
            }
        })
        .buffered(BROADCAST_CONCURRENCY)
        .collect()
        .await;

    let successful = results.iter().filter(|r| r.status == "sent").count();
    let response = BroadcastResponse {
        total: results.len(),
        successful,
        failed: results.len() - successful,
        results,
    };
    tracing::info!(
        total = response.total,
        successful = response.successful,
        failed = response.failed,
        "Broadcast finished"
    );

    Ok(Json(response))
}

/// GET /stats?limit=N
///
/// Most searched players and the total number of searches.
pub async fn stats(
    _admin: RequireAdminToken,
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_STATS_LIMIT, MAX_STATS_LIMIT);
    let popular_players = SearchCountRepo::top(&state.pool, limit).await?;
    let total_searches = SearchCountRepo::total(&state.pool).await?;

    Ok(Json(DataResponse {
        data: UsageStats {
            popular_players,
            total_searches,
        },
    }))
}
