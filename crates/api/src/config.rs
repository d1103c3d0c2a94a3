use std::time::Duration;

use auction_messaging::TwilioConfig;

/// Gemini model settings.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub embedding_model: String,
}

/// Qdrant connection settings.
#[derive(Debug, Clone)]
pub struct QdrantConfig {
    pub url: String,
    pub api_key: Option<String>,
}

/// Inputs for verifying `X-Twilio-Signature` on inbound webhooks.
#[derive(Debug, Clone)]
pub struct WebhookSignatureConfig {
    /// Public URL Twilio posts to, exactly as configured in the console.
    pub url: String,
    pub auth_token: String,
}

/// Server configuration loaded from environment variables.
///
/// External services are optional: when their variables are unset the
/// corresponding feature is disabled and the service degrades gracefully.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`). Webhook replies are
    /// cut off earlier, see [`ServerConfig::reply_timeout`].
    pub request_timeout_secs: u64,
    /// Statement timeout for generated SQL in seconds (default: `5`).
    pub query_timeout_secs: u64,
    pub gemini: Option<GeminiConfig>,
    pub qdrant: Option<QdrantConfig>,
    /// Outbound sender credentials.
    pub twilio: Option<TwilioConfig>,
    /// Enabled when both `TWILIO_WEBHOOK_URL` and `TWILIO_AUTH_TOKEN` are set.
    pub webhook_signature: Option<WebhookSignatureConfig>,
    /// Bearer token guarding operator endpoints; `None` disables them.
    pub admin_api_token: Option<String>,
    pub sql_cache_ttl_secs: u64,
    pub answer_cache_ttl_secs: u64,
}

/// A trimmed, non-empty environment variable.
fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

fn env_u64(name: &str, default: u64) -> u64 {
    env_opt(name)
        .map(|v| {
            v.parse()
                .unwrap_or_else(|_| panic!("{name} must be a valid u64"))
        })
        .unwrap_or(default)
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default              |
    /// |--------------------------|----------------------|
    /// | `HOST`                   | `0.0.0.0`            |
    /// | `PORT`                   | `8000`               |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                 |
    /// | `QUERY_TIMEOUT_SECS`     | `5`                  |
    /// | `GEMINI_API_KEY`         | unset (LLM disabled) |
    /// | `GEMINI_MODEL`           | `gemini-1.5-flash`   |
    /// | `GEMINI_EMBEDDING_MODEL` | `text-embedding-004` |
    /// | `QDRANT_URL`             | unset (no vectors)   |
    /// | `QDRANT_API_KEY`         | unset                |
    /// | `TWILIO_ACCOUNT_SID`     | unset (no outbound)  |
    /// | `TWILIO_AUTH_TOKEN`      | unset                |
    /// | `TWILIO_WHATSAPP_NUMBER` | unset                |
    /// | `TWILIO_WEBHOOK_URL`     | unset (no signature check) |
    /// | `ADMIN_API_TOKEN`        | unset (operator endpoints off) |
    /// | `SQL_CACHE_TTL_SECS`     | `3600`               |
    /// | `ANSWER_CACHE_TTL_SECS`  | `1800`               |
    ///
    /// Panics on unparsable numbers so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "8000")
            .parse()
            .expect("PORT must be a valid u16");

        let gemini = env_opt("GEMINI_API_KEY").map(|api_key| GeminiConfig {
            api_key,
            model: env_or("GEMINI_MODEL", "gemini-1.5-flash"),
            embedding_model: env_or("GEMINI_EMBEDDING_MODEL", "text-embedding-004"),
        });

        let qdrant = env_opt("QDRANT_URL").map(|url| QdrantConfig {
            url,
            api_key: env_opt("QDRANT_API_KEY"),
        });

        let auth_token = env_opt("TWILIO_AUTH_TOKEN");

        let twilio = match (
            env_opt("TWILIO_ACCOUNT_SID"),
            auth_token.clone(),
            env_opt("TWILIO_WHATSAPP_NUMBER"),
        ) {
            (Some(account_sid), Some(auth_token), Some(from_number)) => Some(TwilioConfig {
                account_sid,
                auth_token,
                from_number,
            }),
            _ => None,
        };

        let webhook_signature = match (env_opt("TWILIO_WEBHOOK_URL"), auth_token) {
            (Some(url), Some(auth_token)) => Some(WebhookSignatureConfig { url, auth_token }),
            _ => None,
        };

        Self {
            host,
            port,
            request_timeout_secs: env_u64("REQUEST_TIMEOUT_SECS", 30),
            query_timeout_secs: env_u64("QUERY_TIMEOUT_SECS", 5),
            gemini,
            qdrant,
            twilio,
            webhook_signature,
            admin_api_token: env_opt("ADMIN_API_TOKEN"),
            sql_cache_ttl_secs: env_u64("SQL_CACHE_TTL_SECS", 3600),
            answer_cache_ttl_secs: env_u64("ANSWER_CACHE_TTL_SECS", 1800),
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Budget for building a webhook reply: four fifths of the request
    /// timeout, leaving room to render the apology before the layer fires.
    pub fn reply_timeout(&self) -> Duration {
        self.request_timeout() * 4 / 5
    }
}
