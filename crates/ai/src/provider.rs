//! Core AI provider traits and error type.

use async_trait::async_trait;

/// Errors from AI provider and vector store calls.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("Provider '{0}' unavailable")]
    ProviderUnavailable(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The model produced SQL that failed the safety guard.
    #[error("Unsafe SQL rejected: {0}")]
    UnsafeSql(String),
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        AiError::Http(e.to_string())
    }
}

/// A provider that generates text completions.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for the given prompt.
    async fn complete(&self, prompt: &str) -> Result<String, AiError>;
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;
}

/// A provider that converts text into float vectors (embeddings).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed one or more texts. Returns one vector per input text.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, AiError>;
    /// Dimensionality of output vectors.
    fn dimensions(&self) -> usize;
    /// Human-readable provider name.
    fn name(&self) -> &str;
}
