pub mod admin;
pub mod health;
pub mod whatsapp;

use axum::Router;

use crate::state::AppState;

/// Build the full route tree (everything except middleware).
///
/// ```text
/// GET  /                      service banner
/// GET  /health                dependency health
///
/// POST /whatsapp/webhook      Twilio inbound webhook (TwiML reply)
///
/// POST /whatsapp/send         proactive message (operator token)
/// POST /broadcast             message many recipients (operator token)
/// GET  /stats                 search popularity (operator token)
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(whatsapp::router())
        .merge(admin::router())
}
