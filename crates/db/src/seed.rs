//! Sample player data for local development and demos.

use auction_core::player::{BattingLine, BowlingLine, PlayerProfile, FORMAT_IPL};
use sqlx::PgPool;

use crate::models::player::CreatePlayer;
use crate::models::stats::{CreateBattingStats, CreateBowlingStats};
use crate::repositories::PlayerRepo;

/// A player with the stats lines to insert alongside it.
#[derive(Debug, Clone)]
pub struct SamplePlayer {
    pub player: CreatePlayer,
    pub batting: Vec<BattingLine>,
    pub bowling: Vec<BowlingLine>,
}

/// Outcome of [`seed_sample_players`].
#[derive(Debug, Default)]
pub struct SeedReport {
    /// Profiles of the players inserted by this run.
    pub inserted: Vec<PlayerProfile>,
    /// Names of players that already existed and were left untouched.
    pub skipped: Vec<String>,
}

fn player(cricbuzz_id: i64, name: &str, role: &str, bowling_style: &str, slug: &str) -> CreatePlayer {
    CreatePlayer {
        cricbuzz_id,
        name: name.to_string(),
        country: Some("India".to_string()),
        role: Some(role.to_string()),
        batting_style: Some("Right-hand Bat".to_string()),
        bowling_style: Some(bowling_style.to_string()),
        profile_url: Some(format!(
            "https://www.cricbuzz.com/profiles/{cricbuzz_id}/{slug}"
        )),
    }
}

#[allow(clippy::too_many_arguments)]
fn ipl_batting(
    matches: i32,
    innings: i32,
    runs: i32,
    highest: &str,
    average: f64,
    strike_rate: f64,
    fifties: i32,
    hundreds: i32,
    fours: i32,
    sixes: i32,
) -> BattingLine {
    BattingLine {
        format: FORMAT_IPL.to_string(),
        matches,
        innings,
        runs,
        highest: Some(highest.to_string()),
        average,
        strike_rate,
        fifties,
        hundreds,
        fours,
        sixes,
    }
}

/// The five sample players.
pub fn sample_players() -> Vec<SamplePlayer> {
    vec![
        SamplePlayer {
            player: player(1413, "Virat Kohli", "Batsman", "Right-arm Medium", "virat-kohli"),
            batting: vec![ipl_batting(237, 227, 7263, "113", 36.50, 130.02, 50, 7, 674, 235)],
            bowling: vec![],
        },
        SamplePlayer {
            player: player(253802, "Rohit Sharma", "Batsman", "Right-arm Offbreak", "rohit-sharma"),
            batting: vec![ipl_batting(243, 240, 6211, "109*", 30.35, 130.61, 42, 2, 543, 264)],
            bowling: vec![],
        },
        SamplePlayer {
            player: player(4608, "MS Dhoni", "Wicket-Keeper", "Right-arm Medium", "ms-dhoni"),
            batting: vec![ipl_batting(250, 235, 5243, "84*", 39.12, 135.92, 24, 0, 329, 229)],
            bowling: vec![],
        },
        SamplePlayer {
            player: player(4898, "Jasprit Bumrah", "Bowler", "Right-arm Fast", "jasprit-bumrah"),
            batting: vec![],
            bowling: vec![BowlingLine {
                format: FORMAT_IPL.to_string(),
                matches: 133,
                innings: 133,
                wickets: 165,
                average: 22.87,
                economy: 7.18,
                strike_rate: 19.1,
                five_wicket_haul: 1,
                ten_wicket_haul: 0,
                best_figures: None,
            }],
        },
        SamplePlayer {
            player: player(4972, "Hardik Pandya", "All-Rounder", "Right-arm Fast-medium", "hardik-pandya"),
            batting: vec![ipl_batting(143, 128, 2644, "91", 27.52, 145.64, 15, 0, 202, 146)],
            bowling: vec![BowlingLine {
                format: FORMAT_IPL.to_string(),
                matches: 143,
                innings: 126,
                wickets: 63,
                average: 35.65,
                economy: 9.06,
                strike_rate: 23.6,
                five_wicket_haul: 0,
                ten_wicket_haul: 0,
                best_figures: None,
            }],
        },
    ]
}

/// Insert the sample players, skipping any whose `cricbuzz_id` already exists.
pub async fn seed_sample_players(pool: &PgPool) -> Result<SeedReport, sqlx::Error> {
    let mut report = SeedReport::default();

    for sample in sample_players() {
        if PlayerRepo::find_by_cricbuzz_id(pool, sample.player.cricbuzz_id)
            .await?
            .is_some()
        {
            tracing::info!(name = %sample.player.name, "Sample player already exists, skipping");
            report.skipped.push(sample.player.name);
            continue;
        }

        let row = PlayerRepo::upsert_player(pool, &sample.player).await?;
        for line in &sample.batting {
            PlayerRepo::insert_batting(
                pool,
                &CreateBattingStats {
                    player_id: row.id,
                    line: line.clone(),
                },
            )
            .await?;
        }
        for line in &sample.bowling {
            PlayerRepo::insert_bowling(
                pool,
                &CreateBowlingStats {
                    player_id: row.id,
                    line: line.clone(),
                },
            )
            .await?;
        }

        tracing::info!(player_id = row.id, name = %row.name, "Inserted sample player");
        report
            .inserted
            .push(row.into_profile(sample.batting, sample.bowling));
    }

    Ok(report)
}
