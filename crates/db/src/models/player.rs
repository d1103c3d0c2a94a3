//! Player entity model and DTOs.

use auction_core::player::{BattingLine, BowlingLine, PlayerProfile};
use auction_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `players` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Player {
    pub id: DbId,
    pub cricbuzz_id: i64,
    pub name: String,
    pub country: Option<String>,
    pub role: Option<String>,
    pub batting_style: Option<String>,
    pub bowling_style: Option<String>,
    pub profile_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Player {
    /// Combine the row with its stats lines into a domain profile.
    pub fn into_profile(self, batting: Vec<BattingLine>, bowling: Vec<BowlingLine>) -> PlayerProfile {
        PlayerProfile {
            id: self.id,
            cricbuzz_id: self.cricbuzz_id,
            name: self.name,
            country: self.country,
            role: self.role,
            batting_style: self.batting_style,
            bowling_style: self.bowling_style,
            batting,
            bowling,
        }
    }
}

/// DTO for creating or refreshing a player, keyed by `cricbuzz_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlayer {
    pub cricbuzz_id: i64,
    pub name: String,
    pub country: Option<String>,
    pub role: Option<String>,
    pub batting_style: Option<String>,
    pub bowling_style: Option<String>,
    pub profile_url: Option<String>,
}
