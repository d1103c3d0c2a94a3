//! Outbound WhatsApp messages via the Twilio Messages REST API.
//!
//! Transient failures (network errors, HTTP 429 and 5xx) are retried up to
//! three times with exponential backoff (1 s, 2 s, 4 s). Client errors such
//! as an invalid recipient fail immediately. Once Twilio has answered 2xx the
//! message is queued, so nothing after that point is retried.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const API_BASE: &str = "https://api.twilio.com/2010-04-01";

/// Retry delays in seconds (exponential backoff: 1s, 2s, 4s).
const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// HTTP request timeout for a single send attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const WHATSAPP_PREFIX: &str = "whatsapp:";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Twilio answered with a non-2xx status.
    #[error("Twilio returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// Twilio accepted the message but its response body was unreadable.
    #[error("Could not decode Twilio response: {0}")]
    Decode(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),
}

impl MessagingError {
    /// Whether another attempt could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            MessagingError::Request(_) => true,
            MessagingError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            MessagingError::Decode(_) | MessagingError::InvalidRecipient(_) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Sender seam
// ---------------------------------------------------------------------------

/// A message accepted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentMessage {
    pub sid: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub status: String,
}

/// Anything that can deliver a WhatsApp message.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<SentMessage, MessagingError>;
}

/// Prefix a phone number with `whatsapp:` unless it already has it.
pub fn whatsapp_address(number: &str) -> String {
    let number = number.trim();
    if number.starts_with(WHATSAPP_PREFIX) {
        number.to_string()
    } else {
        format!("{WHATSAPP_PREFIX}{number}")
    }
}

// ---------------------------------------------------------------------------
// TwilioClient
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender number, with or without the `whatsapp:` prefix.
    pub from_number: String,
}

pub struct TwilioClient {
    config: TwilioConfig,
    base_url: String,
    retry_delays: Vec<Duration>,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct TwilioErrorBody {
    message: Option<String>,
}

impl TwilioClient {
    pub fn new(config: TwilioConfig) -> Result<Self, MessagingError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            config,
            base_url: API_BASE.to_string(),
            retry_delays: RETRY_DELAYS_SECS.map(Duration::from_secs).to_vec(),
            client,
        })
    }

    /// Point the client at a different API root (test servers, proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Replace the backoff schedule; one retry per entry.
    pub fn with_retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = delays;
        self
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.base_url, self.config.account_sid
        )
    }

    /// Execute a single POST and decode the created message.
    async fn try_send(&self, to: &str, body: &str) -> Result<SentMessage, MessagingError> {
        let from = whatsapp_address(&self.config.from_number);
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[("From", from.as_str()), ("To", to), ("Body", body)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<TwilioErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(MessagingError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let mut sent = response
            .json::<SentMessage>()
            .await
            .map_err(|e| MessagingError::Decode(e.to_string()))?;
        if sent.to.is_empty() {
            sent.to = to.to_string();
        }
        Ok(sent)
    }
}

#[async_trait]
impl MessageSender for TwilioClient {
    async fn send(&self, to: &str, body: &str) -> Result<SentMessage, MessagingError> {
        if to.trim().trim_start_matches(WHATSAPP_PREFIX).is_empty() {
            return Err(MessagingError::InvalidRecipient(to.to_string()));
        }
        let to = whatsapp_address(to);

        for (attempt, delay) in self.retry_delays.iter().enumerate() {
            match self.try_send(&to, body).await {
                Ok(sent) => return Ok(sent),
                Err(e) if e.is_transient() => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        to = %to,
                        error = %e,
                        "Twilio send attempt failed, retrying"
                    );
                    tokio::time::sleep(*delay).await;
                }
                Err(e) => {
                    tracing::error!(to = %to, error = %e, "Twilio rejected message");
                    return Err(e);
                }
            }
        }

        // Final attempt after the last backoff.
        self.try_send(&to, body).await.inspect_err(|e| {
            tracing::error!(to = %to, error = %e, "Twilio send failed after all retries");
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn client() -> TwilioClient {
        TwilioClient::new(TwilioConfig {
            account_sid: "AC123".into(),
            auth_token: "secret".into(),
            from_number: "+14155238886".into(),
        })
        .unwrap()
    }

    #[test]
    fn address_gets_prefix_once() {
        assert_eq!(whatsapp_address("+919800000000"), "whatsapp:+919800000000");
        assert_eq!(
            whatsapp_address("whatsapp:+919800000000"),
            "whatsapp:+919800000000"
        );
    }

    #[test]
    fn messages_url_includes_account() {
        assert_eq!(
            client().with_base_url("http://localhost:9/").messages_url(),
            "http://localhost:9/Accounts/AC123/Messages.json"
        );
    }

    #[test]
    fn only_throttling_and_server_errors_are_transient() {
        let status = |status| MessagingError::HttpStatus {
            status,
            message: String::new(),
        };
        assert!(status(429).is_transient());
        assert!(status(503).is_transient());
        assert!(!status(400).is_transient());
        assert!(!status(401).is_transient());
        assert!(!MessagingError::InvalidRecipient("x".into()).is_transient());
        assert!(!MessagingError::Decode("eof".into()).is_transient());
    }

    #[tokio::test]
    async fn empty_recipient_is_rejected_without_a_request() {
        assert_matches!(
            client().send("whatsapp:", "hi").await,
            Err(MessagingError::InvalidRecipient(_))
        );
    }

    #[test]
    fn error_display_includes_status() {
        let err = MessagingError::HttpStatus {
            status: 400,
            message: "The 'To' number is not a valid phone number.".into(),
        };
        assert_eq!(
            err.to_string(),
            "Twilio returned HTTP 400: The 'To' number is not a valid phone number."
        );
    }
}
