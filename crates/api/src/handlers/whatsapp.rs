//! Handler for the Twilio WhatsApp webhook.

use auction_core::error::CoreError;
use auction_core::twiml;
use auction_messaging::signature::SIGNATURE_HEADER;
use auction_messaging::validate_signature;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Form;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// The fields of a Twilio inbound message that the assistant uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub body: String,
    pub from: String,
    pub message_sid: String,
}

impl InboundMessage {
    /// Pick `Body`, `From` and `MessageSid` out of the raw form fields.
    pub fn from_form(params: &[(String, String)]) -> AppResult<Self> {
        let field = |name: &str| {
            params
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
                .ok_or_else(|| AppError::BadRequest(format!("Missing form field: {name}")))
        };

        Ok(Self {
            body: field("Body")?,
            from: field("From")?,
            message_sid: field("MessageSid")?,
        })
    }
}

/// POST /whatsapp/webhook
///
/// Answers an inbound WhatsApp message with TwiML. The full form is kept
/// as a list of pairs so the signature covers every posted field.
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(params): Form<Vec<(String, String)>>,
) -> AppResult<Response> {
    if let Some(sig) = &state.config.webhook_signature {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if !validate_signature(&sig.auth_token, &sig.url, &params, signature) {
            tracing::warn!("Rejected webhook with invalid Twilio signature");
            return Err(AppError::Core(CoreError::Forbidden(
                "Invalid Twilio signature".into(),
            )));
        }
    }

    let msg = InboundMessage::from_form(&params)?;
    tracing::info!(from = %msg.from, sid = %msg.message_sid, "Inbound WhatsApp message");

    let reply = state.assistant.reply(&msg.body).await;
    tracing::info!(
        to = %msg.from,
        sid = %msg.message_sid,
        reply_chars = reply.chars().count(),
        "Replying via TwiML"
    );

    Ok(twiml_response(twiml::message_response(&reply)))
}

fn twiml_response(xml: String) -> Response {
    ([(CONTENT_TYPE, "application/xml")], xml).into_response()
}
