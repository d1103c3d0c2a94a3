//! Semantic player search backed by Qdrant.
//!
//! Each player is stored as one point whose id is the player's database id
//! and whose vector embeds [`PlayerProfile::search_text`]. Payloads carry the
//! display fields so search hits need no database round trip.
//!
//! The client speaks Qdrant's gRPC API, so `QDRANT_URL` points at the gRPC
//! port (6334 by default).

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use auction_core::player::{PlayerProfile, PlayerRole, SimilarPlayer};
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{
    point_id, CreateCollectionBuilder, Distance, PointStruct, ScoredPoint, SearchPointsBuilder,
    UpsertPointsBuilder, Value, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant, QdrantError};

use crate::provider::{AiError, EmbeddingProvider};

pub const COLLECTION_NAME: &str = "ipl_players";

/// Hits scoring below this cosine similarity are dropped.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.5;

impl From<QdrantError> for AiError {
    fn from(e: QdrantError) -> Self {
        AiError::Http(format!("qdrant: {e}"))
    }
}

/// Semantic lookup of players by free text.
#[async_trait]
pub trait PlayerIndex: Send + Sync {
    /// Up to `limit` players above the default score threshold.
    async fn search_similar(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SimilarPlayer>, AiError>;
    async fn is_healthy(&self) -> bool;
}

pub struct VectorStore {
    client: Qdrant,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl std::fmt::Debug for VectorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorStore")
            .field("collection", &COLLECTION_NAME)
            .field("embedder", &self.embedder.name())
            .finish()
    }
}

impl VectorStore {
    pub fn new(
        url: &str,
        api_key: Option<String>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, AiError> {
        let client = Qdrant::from_url(url)
            .api_key(api_key)
            .build()
            .map_err(|e| AiError::Config(format!("qdrant client init failed for {url}: {e}")))?;
        Ok(Self { client, embedder })
    }

    // -----------------------------------------------------------------------
    // Collection management
    // -----------------------------------------------------------------------

    /// Create the player collection if it does not exist yet.
    pub async fn ensure_collection(&self) -> Result<(), AiError> {
        if self.client.collection_exists(COLLECTION_NAME).await? {
            tracing::debug!(collection = COLLECTION_NAME, "Qdrant collection exists");
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(COLLECTION_NAME).vectors_config(
                    VectorParamsBuilder::new(self.embedder.dimensions() as u64, Distance::Cosine),
                ),
            )
            .await?;
        tracing::info!(collection = COLLECTION_NAME, "Created Qdrant collection");
        Ok(())
    }

    /// `true` when Qdrant answers its health check.
    pub async fn health_check(&self) -> bool {
        match self.client.health_check().await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(error = %e, "Qdrant health check failed");
                false
            }
        }
    }

    // -----------------------------------------------------------------------
    // Indexing
    // -----------------------------------------------------------------------

    /// Embed and upsert players. Returns the number of points written.
    pub async fn upsert_players(&self, players: &[PlayerProfile]) -> Result<usize, AiError> {
        if players.is_empty() {
            return Ok(0);
        }
        let texts: Vec<String> = players.iter().map(PlayerProfile::search_text).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let vectors = self.embedder.embed(&refs).await?;
        if vectors.len() != players.len() {
            return Err(AiError::Parse(format!(
                "Embedder returned {} vectors for {} players",
                vectors.len(),
                players.len()
            )));
        }

        let points: Vec<PointStruct> = players
            .iter()
            .zip(texts.iter())
            .zip(vectors)
            .map(|((player, text), vector)| {
                PointStruct::new(
                    player.id as u64,
                    vector,
                    Payload::from(player_payload(player, text)),
                )
            })
            .collect();
        let count = points.len();

        self.client
            .upsert_points(UpsertPointsBuilder::new(COLLECTION_NAME, points).wait(true))
            .await?;

        tracing::info!(count, "Indexed players into Qdrant");
        Ok(count)
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    /// Players whose description is semantically close to `query`.
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
        score_threshold: f32,
    ) -> Result<Vec<SimilarPlayer>, AiError> {
        let mut vectors = self.embedder.embed(&[query]).await?;
        let vector = vectors
            .pop()
            .ok_or_else(|| AiError::Parse("Embedder returned no vector".to_string()))?;

        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(COLLECTION_NAME, vector, limit as u64)
                    .with_payload(true)
                    .score_threshold(score_threshold),
            )
            .await?;

        Ok(response.result.into_iter().filter_map(similar_player).collect())
    }
}

#[async_trait]
impl PlayerIndex for VectorStore {
    async fn search_similar(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SimilarPlayer>, AiError> {
        self.search(query, limit, DEFAULT_SCORE_THRESHOLD).await
    }

    async fn is_healthy(&self) -> bool {
        self.health_check().await
    }
}

/// Search text for the hidden-gem lookup.
pub fn hidden_gem_query(role: Option<PlayerRole>) -> String {
    let role = role.map(PlayerRole::as_str).unwrap_or("player");
    format!("underrated {role} good performance low cost")
}

fn player_payload(player: &PlayerProfile, text: &str) -> HashMap<String, Value> {
    let mut payload = HashMap::new();
    payload.insert("player_id".to_string(), Value::from(player.id));
    payload.insert("name".to_string(), Value::from(player.name.clone()));
    payload.insert("text".to_string(), Value::from(text.to_string()));
    if let Some(role) = &player.role {
        payload.insert("role".to_string(), Value::from(role.clone()));
    }
    if let Some(country) = &player.country {
        payload.insert("country".to_string(), Value::from(country.clone()));
    }
    payload
}

fn payload_str(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
    match payload.get(key)?.kind.as_ref()? {
        Kind::StringValue(s) => Some(s.clone()),
        _ => None,
    }
}

/// Map a scored point to a hit; points without a usable id or name are skipped.
fn similar_player(point: ScoredPoint) -> Option<SimilarPlayer> {
    let player_id = match point.payload.get("player_id")?.kind.as_ref()? {
        Kind::IntegerValue(id) => *id,
        _ => match point.id.as_ref()?.point_id_options.as_ref()? {
            point_id::PointIdOptions::Num(n) => *n as i64,
            point_id::PointIdOptions::Uuid(_) => return None,
        },
    };

    Some(SimilarPlayer {
        player_id,
        name: payload_str(&point.payload, "name")?,
        role: payload_str(&point.payload, "role"),
        country: payload_str(&point.payload, "country"),
        similarity_score: point.score,
    })
}
