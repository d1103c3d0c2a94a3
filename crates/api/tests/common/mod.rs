#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use auction_ai::{AiError, LlmProvider, PlayerIndex};
use auction_api::assistant::{Assistant, AssistantSettings};
use auction_api::config::ServerConfig;
use auction_api::routes;
use auction_api::state::AppState;
use auction_core::player::SimilarPlayer;
use auction_messaging::{MessageSender, MessagingError, SentMessage};
use axum::body::Body;
use axum::http::{HeaderName, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub const ADMIN_TOKEN: &str = "test-admin-token";

/// Build a test `ServerConfig` with every external service disabled.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        query_timeout_secs: 5,
        gemini: None,
        qdrant: None,
        twilio: None,
        webhook_signature: None,
        admin_api_token: Some(ADMIN_TOKEN.to_string()),
        sql_cache_ttl_secs: 3600,
        answer_cache_ttl_secs: 1800,
    }
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// Answers translation prompts with `sql` and composing prompts with `reply`.
pub struct ScriptedLlm {
    pub sql: String,
    pub reply: String,
    pub calls: AtomicUsize,
}

impl ScriptedLlm {
    pub fn new(sql: &str, reply: &str) -> Arc<Self> {
        Arc::new(Self {
            sql: sql.to_string(),
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if prompt.contains("SQL Query:") {
            Ok(format!("```sql\n{}\n```", self.sql))
        } else {
            Ok(self.reply.clone())
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// A model that takes `delay` to answer anything.
pub struct SlowLlm {
    pub delay: Duration,
}

#[async_trait]
impl LlmProvider for SlowLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, AiError> {
        tokio::time::sleep(self.delay).await;
        Ok("SELECT name FROM players".to_string())
    }

    fn name(&self) -> &str {
        "slow"
    }
}

/// Returns the same hits for every search.
pub struct FixedIndex(pub Vec<SimilarPlayer>);

#[async_trait]
impl PlayerIndex for FixedIndex {
    async fn search_similar(
        &self,
        _query: &str,
        limit: usize,
    ) -> Result<Vec<SimilarPlayer>, AiError> {
        Ok(self.0.iter().take(limit).cloned().collect())
    }

    async fn is_healthy(&self) -> bool {
        true
    }
}

pub fn similar(player_id: i64, name: &str, score: f32) -> SimilarPlayer {
    SimilarPlayer {
        player_id,
        name: name.to_string(),
        role: Some("Batsman".to_string()),
        country: Some("India".to_string()),
        similarity_score: score,
    }
}

/// Records every send; recipients listed in `failing` get a 400 from the "gateway".
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<(String, String)>>,
    pub failing: HashSet<String>,
}

impl RecordingSender {
    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: recipients.iter().map(|r| r.to_string()).collect(),
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, to: &str, body: &str) -> Result<SentMessage, MessagingError> {
        if self.failing.contains(to) {
            return Err(MessagingError::HttpStatus {
                status: 400,
                message: "The 'To' number is not a valid phone number.".to_string(),
            });
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((to.to_string(), body.to_string()));
        Ok(SentMessage {
            sid: format!("SM{:04}", sent.len()),
            to: format!("whatsapp:{}", to.trim_start_matches("whatsapp:")),
            status: "queued".to_string(),
        })
    }
}

/// Optional services wired into a test app.
#[derive(Default)]
pub struct TestServices {
    pub llm: Option<Arc<dyn LlmProvider>>,
    pub index: Option<Arc<dyn PlayerIndex>>,
    pub sender: Option<Arc<dyn MessageSender>>,
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build the full application router with no external services.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, test_config(), TestServices::default())
}

/// Build the full application router with all middleware layers.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (request ID, timeout, tracing, panic
/// recovery) that production uses.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig, services: TestServices) -> Router {
    let settings = AssistantSettings::from_config(&config);
    let request_timeout = config.request_timeout();
    let assistant = Assistant::new(pool.clone(), services.llm, services.index.clone(), settings);

    let state = AppState {
        pool,
        config: Arc::new(config),
        assistant: Arc::new(assistant),
        player_index: services.index,
        sender: services.sender,
    };

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::app_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a JSON body, optionally with a bearer token.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST an `application/x-www-form-urlencoded` body, with optional extra headers.
pub async fn post_form(
    app: Router,
    uri: &str,
    fields: &[(&str, &str)],
    headers: &[(&str, &str)],
) -> Response {
    let body = serde_urlencoded::to_string(fields).unwrap();
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    app.oneshot(builder.body(Body::from(body)).unwrap())
        .await
        .unwrap()
}

/// Send a WhatsApp message through the webhook and return the response.
pub async fn send_whatsapp(app: Router, body: &str) -> Response {
    post_form(
        app,
        "/whatsapp/webhook",
        &[
            ("Body", body),
            ("From", "whatsapp:+15551234567"),
            ("MessageSid", "SM0000000000000000000000000000001"),
        ],
        &[],
    )
    .await
}

pub async fn body_text(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
