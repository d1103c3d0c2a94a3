use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderName, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use auction_ai::{EmbeddingProvider, GeminiProvider, LlmProvider, PlayerIndex, VectorStore};
use auction_api::assistant::{Assistant, AssistantSettings};
use auction_api::background::cache_retention;
use auction_api::config::ServerConfig;
use auction_api::routes;
use auction_api::state::AppState;
use auction_messaging::{MessageSender, TwilioClient};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,auction_api=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = auction_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    auction_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    auction_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Language model ---
    let gemini = config.gemini.as_ref().map(|g| {
        Arc::new(
            GeminiProvider::new(&g.api_key, &g.model, &g.embedding_model)
                .expect("Failed to build Gemini client"),
        )
    });
    match &gemini {
        Some(g) => tracing::info!(model = %g.model, "Gemini configured"),
        None => tracing::warn!("GEMINI_API_KEY not set, text-to-SQL and composing disabled"),
    }

    // --- Vector store ---
    let player_index: Option<Arc<dyn PlayerIndex>> = match (&config.qdrant, &gemini) {
        (Some(qdrant), Some(gemini)) => {
            let embedder: Arc<dyn EmbeddingProvider> = gemini.clone();
            let store = VectorStore::new(&qdrant.url, qdrant.api_key.clone(), embedder)
                .expect("Failed to build Qdrant client");
            if let Err(e) = store.ensure_collection().await {
                tracing::warn!(error = %e, "Qdrant collection check failed, continuing");
            }
            tracing::info!(url = %qdrant.url, "Vector store configured");
            Some(Arc::new(store) as Arc<dyn PlayerIndex>)
        }
        (Some(_), None) => {
            tracing::warn!("QDRANT_URL set but no embedding model configured, vector search disabled");
            None
        }
        _ => {
            tracing::warn!("QDRANT_URL not set, vector search disabled");
            None
        }
    };

    // --- Outbound messaging ---
    let sender: Option<Arc<dyn MessageSender>> = config.twilio.clone().map(|twilio| {
        let client = TwilioClient::new(twilio).expect("Failed to build Twilio client");
        Arc::new(client) as Arc<dyn MessageSender>
    });
    if sender.is_none() {
        tracing::warn!("Twilio credentials not set, outbound messaging disabled");
    }
    if config.webhook_signature.is_none() {
        tracing::warn!("TWILIO_WEBHOOK_URL not set, webhook signatures are not verified");
    }

    // --- Assistant ---
    let llm: Option<Arc<dyn LlmProvider>> = gemini.map(|g| g as Arc<dyn LlmProvider>);
    let assistant = Assistant::new(
        pool.clone(),
        llm,
        player_index.clone(),
        AssistantSettings::from_config(&config),
    );

    // --- Cache retention ---
    let retention_cancel = tokio_util::sync::CancellationToken::new();
    let retention_handle = tokio::spawn(cache_retention::run(
        pool.clone(),
        retention_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        assistant: Arc::new(assistant),
        player_index,
        sender,
    };

    // --- Request ID header name ---
    let request_id_header = HeaderName::from_static("x-request-id");

    // --- Router ---
    let app = Router::new()
        .merge(routes::app_routes())
        // -- Middleware stack (applied bottom-up) --
        // Panic recovery: catch panics and return 500.
        .layer(CatchPanicLayer::new())
        // Request timeout.
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout(),
        ))
        // Propagate request ID to response.
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        // Structured request/response tracing.
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Set request ID on incoming requests.
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        // Shared state.
        .with_state(state);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    retention_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), retention_handle).await;
    tracing::info!("Cache retention job stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM to initiate graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
