//! Google Gemini API provider (text generation and embeddings).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::provider::{AiError, EmbeddingProvider, LlmProvider};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Output size of `text-embedding-004`.
pub const EMBEDDING_DIMENSIONS: usize = 768;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct GeminiProvider {
    api_key: String,
    pub model: String,
    pub embedding_model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(api_key: &str, model: &str, embedding_model: &str) -> Result<Self, AiError> {
        if api_key.trim().is_empty() {
            return Err(AiError::Config("Gemini API key is empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            embedding_model: embedding_model.to_string(),
            base_url: API_BASE.to_string(),
            client,
        })
    }

    /// Point the client at a different API root (test servers, proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn parse_response(json: &Value) -> Result<String, AiError> {
        json.pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .ok_or_else(|| {
                AiError::Parse("Missing candidates[0].content.parts[0].text".to_string())
            })
    }

    pub fn parse_embeddings(json: &Value, expected: usize) -> Result<Vec<Vec<f32>>, AiError> {
        let embeddings = json
            .get("embeddings")
            .and_then(Value::as_array)
            .ok_or_else(|| AiError::Parse("Missing embeddings array".to_string()))?;

        let vectors: Vec<Vec<f32>> = embeddings
            .iter()
            .map(|e| {
                e.get("values")
                    .and_then(Value::as_array)
                    .map(|vals| {
                        vals.iter()
                            .filter_map(Value::as_f64)
                            .map(|f| f as f32)
                            .collect()
                    })
                    .ok_or_else(|| AiError::Parse("Embedding without values".to_string()))
            })
            .collect::<Result<_, _>>()?;

        if vectors.len() != expected {
            return Err(AiError::Parse(format!(
                "Expected {expected} embeddings, got {}",
                vectors.len()
            )));
        }
        Ok(vectors)
    }

    async fn post(&self, url: &str, body: &Value) -> Result<Value, AiError> {
        let resp = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| AiError::ProviderUnavailable(format!("gemini: {e}")))?
            .error_for_status()?;
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = json!({
            "contents": [{"parts": [{"text": prompt}]}]
        });
        let json = self.post(&url, &body).await?;
        Self::parse_response(&json)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiProvider {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, AiError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!(
            "{}/models/{}:batchEmbedContents",
            self.base_url, self.embedding_model
        );
        let model = format!("models/{}", self.embedding_model);
        let requests: Vec<Value> = texts
            .iter()
            .map(|t| json!({"model": model, "content": {"parts": [{"text": t}]}}))
            .collect();
        let json = self.post(&url, &json!({ "requests": requests })).await?;
        Self::parse_embeddings(&json, texts.len())
    }

    fn dimensions(&self) -> usize {
        EMBEDDING_DIMENSIONS
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn new_keeps_models() {
        let p = GeminiProvider::new("key-123", "gemini-1.5-flash", "text-embedding-004").unwrap();
        assert_eq!(LlmProvider::name(&p), "gemini");
        assert_eq!(p.model, "gemini-1.5-flash");
        assert_eq!(p.embedding_model, "text-embedding-004");
    }

    #[test]
    fn new_rejects_blank_key() {
        let err = GeminiProvider::new("  ", "gemini-1.5-flash", "text-embedding-004").err();
        assert_matches!(err, Some(AiError::Config(_)));
    }

    #[test]
    fn parse_response_extracts_first_candidate() {
        let raw = json!({
            "candidates": [{
                "content": {"parts": [{"text": "  SELECT 42;\n"}]}
            }]
        });
        assert_eq!(GeminiProvider::parse_response(&raw).unwrap(), "SELECT 42;");
    }

    #[test]
    fn parse_response_without_candidates_is_parse_error() {
        let raw = json!({"promptFeedback": {"blockReason": "SAFETY"}});
        assert_matches!(GeminiProvider::parse_response(&raw), Err(AiError::Parse(_)));
    }

    #[test]
    fn parse_embeddings_checks_count() {
        let raw = json!({"embeddings": [{"values": [0.5, -0.25]}]});
        let vecs = GeminiProvider::parse_embeddings(&raw, 1).unwrap();
        assert_eq!(vecs, vec![vec![0.5f32, -0.25f32]]);
        assert_matches!(
            GeminiProvider::parse_embeddings(&raw, 2),
            Err(AiError::Parse(_))
        );
    }
}
