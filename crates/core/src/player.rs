//! Player domain types shared by the database, valuation and formatting layers.
//!
//! These are plain data carriers with no I/O. The database crate converts its
//! `FromRow` entities into these, and everything downstream (valuation,
//! WhatsApp formatting, vector indexing) works on them.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Stats format stored in the `format` column of both stats tables.
pub const FORMAT_IPL: &str = "IPL";

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Playing role as stored in `players.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerRole {
    #[serde(rename = "Batsman")]
    Batsman,
    #[serde(rename = "Bowler")]
    Bowler,
    #[serde(rename = "All-Rounder")]
    AllRounder,
    #[serde(rename = "Wicket-Keeper")]
    WicketKeeper,
}

impl PlayerRole {
    pub const ALL: [PlayerRole; 4] = [
        PlayerRole::Batsman,
        PlayerRole::Bowler,
        PlayerRole::AllRounder,
        PlayerRole::WicketKeeper,
    ];

    /// Database spelling of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            PlayerRole::Batsman => "Batsman",
            PlayerRole::Bowler => "Bowler",
            PlayerRole::AllRounder => "All-Rounder",
            PlayerRole::WicketKeeper => "Wicket-Keeper",
        }
    }

    /// Parse the database spelling (case-insensitive). Unknown roles yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl std::fmt::Display for PlayerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Stats lines
// ---------------------------------------------------------------------------

/// One batting line (a player's career batting numbers in one format).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattingLine {
    pub format: String,
    pub matches: i32,
    pub innings: i32,
    pub runs: i32,
    pub highest: Option<String>,
    pub average: f64,
    pub strike_rate: f64,
    pub fifties: i32,
    pub hundreds: i32,
    pub fours: i32,
    pub sixes: i32,
}

/// One bowling line (a player's career bowling numbers in one format).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BowlingLine {
    pub format: String,
    pub matches: i32,
    pub innings: i32,
    pub wickets: i32,
    pub average: f64,
    pub economy: f64,
    pub strike_rate: f64,
    pub five_wicket_haul: i32,
    pub ten_wicket_haul: i32,
    pub best_figures: Option<String>,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// A player with all of their stats lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: DbId,
    pub cricbuzz_id: i64,
    pub name: String,
    pub country: Option<String>,
    pub role: Option<String>,
    pub batting_style: Option<String>,
    pub bowling_style: Option<String>,
    pub batting: Vec<BattingLine>,
    pub bowling: Vec<BowlingLine>,
}

impl PlayerProfile {
    /// The IPL batting line, if the player has one.
    pub fn ipl_batting(&self) -> Option<&BattingLine> {
        self.batting.iter().find(|s| s.format == FORMAT_IPL)
    }

    /// The IPL bowling line, if the player has one.
    pub fn ipl_bowling(&self) -> Option<&BowlingLine> {
        self.bowling.iter().find(|s| s.format == FORMAT_IPL)
    }

    /// Parsed role, when the stored role is one of the known values.
    pub fn parsed_role(&self) -> Option<PlayerRole> {
        self.role.as_deref().and_then(PlayerRole::parse)
    }

    /// Free-text description used for semantic indexing.
    ///
    /// Includes identity fields and an IPL stats summary so that queries like
    /// "aggressive opener with high strike rate" land near the right players.
    pub fn search_text(&self) -> String {
        let mut parts: Vec<String> = vec![self.name.clone()];
        for field in [
            &self.role,
            &self.country,
            &self.batting_style,
            &self.bowling_style,
        ]
        .into_iter()
        .flatten()
        {
            if !field.is_empty() {
                parts.push(field.clone());
            }
        }

        if let Some(b) = self.ipl_batting() {
            parts.push(format!("IPL runs: {}", b.runs));
            parts.push(format!("Average: {}", b.average));
            parts.push(format!("Strike rate: {}", b.strike_rate));
        }
        if let Some(b) = self.ipl_bowling() {
            parts.push(format!("IPL wickets: {}", b.wickets));
            parts.push(format!("Economy: {}", b.economy));
        }

        parts.join(" ")
    }
}

/// A semantic-search hit from the vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarPlayer {
    pub player_id: DbId,
    pub name: String,
    pub role: Option<String>,
    pub country: Option<String>,
    pub similarity_score: f32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
