//! Language-model and vector-search clients.
//!
//! - [`provider`]: the [`LlmProvider`](provider::LlmProvider) and
//!   [`EmbeddingProvider`](provider::EmbeddingProvider) seams
//! - [`gemini`]: Google Gemini implementation of both
//! - [`text_to_sql`]: question to guarded SQL
//! - [`composer`]: rows to a short chat reply
//! - [`vector_store`]: Qdrant client for semantic player search

pub mod composer;
pub mod gemini;
pub mod provider;
pub mod text_to_sql;
pub mod vector_store;

pub use composer::ResponseComposer;
pub use gemini::GeminiProvider;
pub use provider::{AiError, EmbeddingProvider, LlmProvider};
pub use text_to_sql::TextToSqlEngine;
pub use vector_store::{PlayerIndex, VectorStore};
