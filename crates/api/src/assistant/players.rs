//! Player-centric intents: stats, valuation, comparison, hidden gems.

use std::collections::HashSet;

use auction_ai::vector_store::hidden_gem_query;
use auction_core::cache_key::{id_key, CacheNamespace};
use auction_core::format;
use auction_core::intent::mentioned_role;
use auction_core::player::PlayerProfile;
use auction_core::player_name::{extract_player_name, extract_player_names};
use auction_core::valuation::{compare_players, value_player};
use auction_db::repositories::{PlayerRepo, SearchCountRepo};

use super::Assistant;
use crate::error::AppResult;

const NAME_MISSING_STATS: &str = "Please specify a player name.\n\nExample: Show me Virat Kohli stats";
const NAME_MISSING_VALUATION: &str =
    "❌ Please specify a player name.\n\nExample: What's Virat Kohli's auction value?";
const TOO_FEW_NAMES: &str = "❌ Please specify at least 2 players to compare.\n\n\
                             Example: _Compare Virat Kohli and Rohit Sharma_";
const TOO_FEW_FOUND: &str = "❌ Could not find enough players to compare.";
const NO_HIDDEN_GEMS: &str = "❌ No hidden gems found at the moment.";

/// Suggestions offered for an unknown player name.
const SUGGESTION_LIMIT: usize = 3;

/// Hits shown for hidden-gem searches.
const HIDDEN_GEM_LIMIT: usize = 5;

impl Assistant {
    pub(super) async fn player_stats(&self, message: &str) -> AppResult<String> {
        let Some(name) = extract_player_name(message) else {
            return Ok(NAME_MISSING_STATS.to_string());
        };

        match self.find_profile(&name).await? {
            Some(profile) => Ok(format::player_stats(&profile)),
            None => {
                let suggestions = self
                    .search_index(&name, SUGGESTION_LIMIT)
                    .await
                    .unwrap_or_default();
                Ok(format::did_you_mean(&name, &suggestions))
            }
        }
    }

    pub(super) async fn valuation(&self, message: &str) -> AppResult<String> {
        let Some(name) = extract_player_name(message) else {
            return Ok(NAME_MISSING_VALUATION.to_string());
        };

        match self.find_profile(&name).await? {
            Some(profile) => Ok(format::valuation(&value_player(&profile))),
            None => Ok(format!("❌ Player '{name}' not found.")),
        }
    }

    pub(super) async fn comparison(&self, message: &str) -> AppResult<String> {
        let names = extract_player_names(message);
        if names.len() < 2 {
            return Ok(TOO_FEW_NAMES.to_string());
        }

        let mut seen = HashSet::new();
        let mut profiles = Vec::with_capacity(names.len());
        for name in &names {
            if let Some(profile) = self.find_profile(name).await? {
                if seen.insert(profile.id) {
                    profiles.push(profile);
                }
            }
        }

        if profiles.len() < 2 {
            return Ok(TOO_FEW_FOUND.to_string());
        }
        Ok(format::comparison(&compare_players(&profiles)))
    }

    pub(super) async fn hidden_gems(&self, message: &str) -> AppResult<String> {
        let query = hidden_gem_query(mentioned_role(message));
        match self.search_index(&query, HIDDEN_GEM_LIMIT).await {
            Some(hits) if !hits.is_empty() => Ok(format::similar_players(&hits)),
            _ => Ok(NO_HIDDEN_GEMS.to_string()),
        }
    }

    /// Resolve a player name to a full profile, counting the search under
    /// the lowercased name.
    ///
    /// Profiles are served from the player cache when present.
    async fn find_profile(&self, name: &str) -> AppResult<Option<PlayerProfile>> {
        if let Err(e) = SearchCountRepo::increment(&self.pool, &name.to_lowercase()).await {
            tracing::warn!(name, error = %e, "Failed to record player search");
        }

        let Some(player) = PlayerRepo::find_by_name_fuzzy(&self.pool, name).await? else {
            tracing::info!(name, "Player not found");
            return Ok(None);
        };

        let key = id_key(CacheNamespace::Player, player.id);
        if let Some(profile) = self.cache.get_json::<PlayerProfile>(&key).await {
            return Ok(Some(profile));
        }

        let profile = PlayerRepo::find_profile(&self.pool, player.id).await?;
        if let Some(profile) = &profile {
            self.cache
                .set_json(&key, profile, self.settings.player_cache_ttl)
                .await;
        }
        Ok(profile)
    }
}
