use axum::routing::post;
use axum::Router;

use crate::handlers::whatsapp;
use crate::state::AppState;

/// Webhook routes.
///
/// ```text
/// POST /whatsapp/webhook    -> webhook
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/whatsapp/webhook", post(whatsapp::webhook))
}
