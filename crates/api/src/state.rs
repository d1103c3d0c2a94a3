use std::sync::Arc;

use auction_ai::PlayerIndex;
use auction_messaging::MessageSender;

use crate::assistant::Assistant;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable. Optional services are decided once at startup from
/// configuration; `None` means the feature is disabled.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: auction_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Message-answering pipeline used by the webhook.
    pub assistant: Arc<Assistant>,
    /// Semantic player index (Qdrant), reported by `/health`.
    pub player_index: Option<Arc<dyn PlayerIndex>>,
    /// Outbound WhatsApp sender for the operator endpoints.
    pub sender: Option<Arc<dyn MessageSender>>,
}
