//! Operator routes, guarded by the admin bearer token.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// ```text
/// POST /whatsapp/send    -> send_message
/// POST /broadcast        -> broadcast
/// GET  /stats            -> stats
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/whatsapp/send", post(admin::send_message))
        .route("/broadcast", post(admin::broadcast))
        .route("/stats", get(admin::stats))
}
