//! Batting and bowling stats rows.

use auction_core::player::{BattingLine, BowlingLine};
use auction_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `batting_stats` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BattingStats {
    pub id: DbId,
    pub player_id: DbId,
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
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<BattingStats> for BattingLine {
    fn from(row: BattingStats) -> Self {
        BattingLine {
            format: row.format,
            matches: row.matches,
            innings: row.innings,
            runs: row.runs,
            highest: row.highest,
            average: row.average,
            strike_rate: row.strike_rate,
            fifties: row.fifties,
            hundreds: row.hundreds,
            fours: row.fours,
            sixes: row.sixes,
        }
    }
}

/// A row from the `bowling_stats` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BowlingStats {
    pub id: DbId,
    pub player_id: DbId,
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
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<BowlingStats> for BowlingLine {
    fn from(row: BowlingStats) -> Self {
        BowlingLine {
            format: row.format,
            matches: row.matches,
            innings: row.innings,
            wickets: row.wickets,
            average: row.average,
            economy: row.economy,
            strike_rate: row.strike_rate,
            five_wicket_haul: row.five_wicket_haul,
            ten_wicket_haul: row.ten_wicket_haul,
            best_figures: row.best_figures,
        }
    }
}

/// DTO for inserting a batting line. Re-inserting the same
/// `(player_id, format)` replaces the previous numbers.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBattingStats {
    pub player_id: DbId,
    #[serde(flatten)]
    pub line: BattingLine,
}

/// DTO for inserting a bowling line, with the same replace semantics.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBowlingStats {
    pub player_id: DbId,
    #[serde(flatten)]
    pub line: BowlingLine,
}
