//! Repository for players and their stats lines.

use auction_core::player::PlayerProfile;
use auction_core::types::DbId;
use serde::Serialize;
use sqlx::PgPool;

use crate::models::player::{CreatePlayer, Player};
use crate::models::stats::{BattingStats, BowlingStats, CreateBattingStats, CreateBowlingStats};

/// Column list for `players` queries.
const COLUMNS: &str = "id, cricbuzz_id, name, country, role, batting_style, bowling_style, \
                       profile_url, created_at, updated_at";

/// Column list for `batting_stats` queries.
const BATTING_COLUMNS: &str = "id, player_id, format, matches, innings, runs, highest, average, \
                               strike_rate, fifties, hundreds, fours, sixes, created_at, updated_at";

/// Column list for `bowling_stats` queries.
const BOWLING_COLUMNS: &str = "id, player_id, format, matches, innings, wickets, average, economy, \
                               strike_rate, five_wicket_haul, ten_wicket_haul, best_figures, \
                               created_at, updated_at";

/// Row counts of the player tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub players: i64,
    pub batting_stats: i64,
    pub bowling_stats: i64,
}

/// Escape `%`, `_` and `\` so user text matches literally inside ILIKE.
fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Provides player and stats operations.
pub struct PlayerRepo;

impl PlayerRepo {
    // -----------------------------------------------------------------------
    // Players
    // -----------------------------------------------------------------------

    /// Find a player by primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Player>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM players WHERE id = $1");
        sqlx::query_as::<_, Player>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a player by their Cricbuzz id.
    pub async fn find_by_cricbuzz_id(
        pool: &PgPool,
        cricbuzz_id: i64,
    ) -> Result<Option<Player>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM players WHERE cricbuzz_id = $1");
        sqlx::query_as::<_, Player>(&query)
            .bind(cricbuzz_id)
            .fetch_optional(pool)
            .await
    }

    /// Case-insensitive substring match on the player name.
    ///
    /// An exact (case-insensitive) match wins over a longer name containing
    /// the fragment; ties resolve to the lowest id.
    pub async fn find_by_name_fuzzy(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<Player>, sqlx::Error> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        let query = format!(
            "SELECT {COLUMNS} FROM players \
             WHERE name ILIKE $1 \
             ORDER BY (LOWER(name) = LOWER($2)) DESC, id ASC \
             LIMIT 1"
        );
        sqlx::query_as::<_, Player>(&query)
            .bind(format!("%{}%", escape_like(name)))
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List all players ordered by name.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Player>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM players ORDER BY name ASC, id ASC");
        sqlx::query_as::<_, Player>(&query).fetch_all(pool).await
    }

    /// Insert a player, or refresh the identity fields of the existing row
    /// with the same `cricbuzz_id`.
    pub async fn upsert_player(pool: &PgPool, input: &CreatePlayer) -> Result<Player, sqlx::Error> {
        let query = format!(
            "INSERT INTO players \
                (cricbuzz_id, name, country, role, batting_style, bowling_style, profile_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (cricbuzz_id) DO UPDATE SET \
                name = EXCLUDED.name, \
                country = EXCLUDED.country, \
                role = EXCLUDED.role, \
                batting_style = EXCLUDED.batting_style, \
                bowling_style = EXCLUDED.bowling_style, \
                profile_url = EXCLUDED.profile_url, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Player>(&query)
            .bind(input.cricbuzz_id)
            .bind(&input.name)
            .bind(&input.country)
            .bind(&input.role)
            .bind(&input.batting_style)
            .bind(&input.bowling_style)
            .bind(&input.profile_url)
            .fetch_one(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Stats lines
    // -----------------------------------------------------------------------

    /// Insert a batting line; an existing line for the same format is replaced.
    pub async fn insert_batting(
        pool: &PgPool,
        input: &CreateBattingStats,
    ) -> Result<BattingStats, sqlx::Error> {
        let query = format!(
            "INSERT INTO batting_stats \
                (player_id, format, matches, innings, runs, highest, average, strike_rate, \
                 fifties, hundreds, fours, sixes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             ON CONFLICT (player_id, format) DO UPDATE SET \
                matches = EXCLUDED.matches, \
                innings = EXCLUDED.innings, \
                runs = EXCLUDED.runs, \
                highest = EXCLUDED.highest, \
                average = EXCLUDED.average, \
                strike_rate = EXCLUDED.strike_rate, \
                fifties = EXCLUDED.fifties, \
                hundreds = EXCLUDED.hundreds, \
                fours = EXCLUDED.fours, \
                sixes = EXCLUDED.sixes, \
                updated_at = NOW() \
             RETURNING {BATTING_COLUMNS}"
        );
        let line = &input.line;
        sqlx::query_as::<_, BattingStats>(&query)
            .bind(input.player_id)
            .bind(&line.format)
            .bind(line.matches)
            .bind(line.innings)
            .bind(line.runs)
            .bind(&line.highest)
            .bind(line.average)
            .bind(line.strike_rate)
            .bind(line.fifties)
            .bind(line.hundreds)
            .bind(line.fours)
            .bind(line.sixes)
            .fetch_one(pool)
            .await
    }

    /// Insert a bowling line; an existing line for the same format is replaced.
    pub async fn insert_bowling(
        pool: &PgPool,
        input: &CreateBowlingStats,
    ) -> Result<BowlingStats, sqlx::Error> {
        let query = format!(
            "INSERT INTO bowling_stats \
                (player_id, format, matches, innings, wickets, average, economy, strike_rate, \
                 five_wicket_haul, ten_wicket_haul, best_figures) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (player_id, format) DO UPDATE SET \
                matches = EXCLUDED.matches, \
                innings = EXCLUDED.innings, \
                wickets = EXCLUDED.wickets, \
                average = EXCLUDED.average, \
                economy = EXCLUDED.economy, \
                strike_rate = EXCLUDED.strike_rate, \
                five_wicket_haul = EXCLUDED.five_wicket_haul, \
                ten_wicket_haul = EXCLUDED.ten_wicket_haul, \
                best_figures = EXCLUDED.best_figures, \
                updated_at = NOW() \
             RETURNING {BOWLING_COLUMNS}"
        );
        let line = &input.line;
        sqlx::query_as::<_, BowlingStats>(&query)
            .bind(input.player_id)
            .bind(&line.format)
            .bind(line.matches)
            .bind(line.innings)
            .bind(line.wickets)
            .bind(line.average)
            .bind(line.economy)
            .bind(line.strike_rate)
            .bind(line.five_wicket_haul)
            .bind(line.ten_wicket_haul)
            .bind(&line.best_figures)
            .fetch_one(pool)
            .await
    }

    /// All batting lines of a player, ordered by format.
    pub async fn list_batting(
        pool: &PgPool,
        player_id: DbId,
    ) -> Result<Vec<BattingStats>, sqlx::Error> {
        let query = format!(
            "SELECT {BATTING_COLUMNS} FROM batting_stats WHERE player_id = $1 ORDER BY format"
        );
        sqlx::query_as::<_, BattingStats>(&query)
            .bind(player_id)
            .fetch_all(pool)
            .await
    }

    /// All bowling lines of a player, ordered by format.
    pub async fn list_bowling(
        pool: &PgPool,
        player_id: DbId,
    ) -> Result<Vec<BowlingStats>, sqlx::Error> {
        let query = format!(
            "SELECT {BOWLING_COLUMNS} FROM bowling_stats WHERE player_id = $1 ORDER BY format"
        );
        sqlx::query_as::<_, BowlingStats>(&query)
            .bind(player_id)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Profiles
    // -----------------------------------------------------------------------

    /// Load a player with all of their batting and bowling lines.
    pub async fn find_profile(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PlayerProfile>, sqlx::Error> {
        let Some(player) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        Self::load_profile(pool, player).await.map(Some)
    }

    /// Load every player's profile, ordered by name.
    pub async fn list_profiles(pool: &PgPool) -> Result<Vec<PlayerProfile>, sqlx::Error> {
        let players = Self::list_all(pool).await?;
        let mut profiles = Vec::with_capacity(players.len());
        for player in players {
            profiles.push(Self::load_profile(pool, player).await?);
        }
        Ok(profiles)
    }

    async fn load_profile(pool: &PgPool, player: Player) -> Result<PlayerProfile, sqlx::Error> {
        let batting = Self::list_batting(pool, player.id).await?;
        let bowling = Self::list_bowling(pool, player.id).await?;
        Ok(player.into_profile(
            batting.into_iter().map(Into::into).collect(),
            bowling.into_iter().map(Into::into).collect(),
        ))
    }

    // -----------------------------------------------------------------------
    // Diagnostics
    // -----------------------------------------------------------------------

    /// Count rows in the player and stats tables.
    pub async fn counts(pool: &PgPool) -> Result<TableCounts, sqlx::Error> {
        let (players, batting_stats, bowling_stats): (i64, i64, i64) = sqlx::query_as(
            "SELECT \
                (SELECT COUNT(*) FROM players), \
                (SELECT COUNT(*) FROM batting_stats), \
                (SELECT COUNT(*) FROM bowling_stats)",
        )
        .fetch_one(pool)
        .await?;
        Ok(TableCounts {
            players,
            batting_stats,
            bowling_stats,
        })
    }
}
