//! Composes the final chat reply from query rows.
//!
//! The model is asked for a short WhatsApp-style answer. When no model is
//! configured, or the call fails, the reply degrades to a deterministic dump
//! of the data so the user still gets an answer.

use std::sync::Arc;

use auction_core::format::{fallback_summary, truncate_chars};

use crate::provider::LlmProvider;

/// Characters of serialized data included in the prompt.
pub const MAX_DATA_CHARS: usize = 1000;

/// Maximum characters of the composed reply.
pub const MAX_REPLY_CHARS: usize = 500;

#[derive(Clone)]
pub struct ResponseComposer {
    provider: Option<Arc<dyn LlmProvider>>,
}

impl ResponseComposer {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { provider }
    }

    pub fn build_prompt(question: &str, data: &str) -> String {
        format!(
            "You are an IPL auction expert WhatsApp bot.\n\n\
             User Query: {question}\n\n\
             Data: {}\n\n\
             Generate a concise, friendly WhatsApp response (max {MAX_REPLY_CHARS} chars):\n\
             - Use emojis sparingly (2-3 max)\n\
             - Be direct and informative\n\
             - Format with *bold* for emphasis\n\
             - Keep it conversational\n\n\
             Response:",
            truncate_chars(data, MAX_DATA_CHARS)
        )
    }

    /// Produce a reply for `question` given the result `data`.
    pub async fn compose(&self, question: &str, data: &serde_json::Value) -> String {
        let data = data.to_string();

        let Some(provider) = &self.provider else {
            return fallback_summary(&data);
        };

        match provider.complete(&Self::build_prompt(question, &data)).await {
            Ok(text) if !text.trim().is_empty() => {
                truncate_chars(text.trim(), MAX_REPLY_CHARS).to_string()
            }
            Ok(_) => {
                tracing::warn!(provider = provider.name(), "Composer returned an empty reply");
                fallback_summary(&data)
            }
            Err(e) => {
                tracing::warn!(provider = provider.name(), error = %e, "Composer call failed, using fallback");
                fallback_summary(&data)
            }
        }
    }
}
