//! Auction price estimation from IPL career stats.
//!
//! The model blends five normalized factors (0.0..=1.0) into a total score
//! and scales a role-dependent base price by `1 + score`, capped at
//! [`MAX_PRICE_CR`]. Prices are in INR crore.

use serde::Serialize;

use crate::player::{BattingLine, BowlingLine, PlayerProfile, PlayerRole};
use crate::types::DbId;

/// Hard ceiling on any estimate.
pub const MAX_PRICE_CR: f64 = 20.0;

/// Base price for players with an unknown role.
pub const DEFAULT_BASE_PRICE_CR: f64 = 2.0;

/// Minimum matches before batting or bowling impact counts.
pub const MIN_MATCHES_FOR_IMPACT: i32 = 5;

const WEIGHT_BATTING: f64 = 0.35;
const WEIGHT_BOWLING: f64 = 0.35;
const WEIGHT_FORM: f64 = 0.15;
const WEIGHT_SCARCITY: f64 = 0.10;
const WEIGHT_INTERNATIONAL: f64 = 0.05;

/// Placeholder until per-match data is ingested.
const RECENT_FORM_SCORE: f64 = 0.5;

/// Per-factor scores behind an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValuationBreakdown {
    pub batting_impact: f64,
    pub bowling_impact: f64,
    pub recent_form: f64,
    pub role_scarcity: f64,
    pub international_status: f64,
    pub total_score: f64,
}

/// Headline IPL numbers shown next to an estimate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipl_matches: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipl_runs: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batting_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strike_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipl_wickets: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub economy: Option<f64>,
}

/// A full auction estimate for one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Valuation {
    pub player_id: DbId,
    pub player_name: String,
    pub role: Option<String>,
    pub estimated_price_cr: f64,
    pub breakdown: ValuationBreakdown,
    pub key_stats: KeyStats,
}

pub fn base_price_cr(role: Option<PlayerRole>) -> f64 {
    match role {
        Some(PlayerRole::Batsman) | Some(PlayerRole::Bowler) => 2.0,
        Some(PlayerRole::AllRounder) => 3.0,
        Some(PlayerRole::WicketKeeper) => 2.5,
        None => DEFAULT_BASE_PRICE_CR,
    }
}

pub fn role_scarcity(role: Option<PlayerRole>) -> f64 {
    match role {
        Some(PlayerRole::AllRounder) => 1.0,
        Some(PlayerRole::WicketKeeper) => 0.8,
        Some(PlayerRole::Bowler) => 0.5,
        Some(PlayerRole::Batsman) => 0.3,
        None => 0.5,
    }
}

pub fn international_status(country: Option<&str>) -> f64 {
    match country {
        Some("India") => 0.8,
        _ => 0.0,
    }
}

/// Runs (40%), average (25%), strike rate above 100 (25%), boundaries (10%).
pub fn batting_impact(stats: Option<&BattingLine>) -> f64 {
    let Some(s) = stats.filter(|s| s.matches >= MIN_MATCHES_FOR_IMPACT) else {
        return 0.0;
    };

    let runs_score = (f64::from(s.runs) / 5000.0).min(1.0);
    let avg_score = (s.average / 50.0).min(1.0);
    let sr_score = if s.strike_rate > 100.0 {
        ((s.strike_rate - 100.0) / 100.0).min(1.0)
    } else {
        0.0
    };
    let boundaries = f64::from(s.fours) + f64::from(s.sixes) * 2.0;
    let boundary_score = (boundaries / 1000.0).min(1.0);

    runs_score * 0.4 + avg_score * 0.25 + sr_score * 0.25 + boundary_score * 0.10
}

/// Wickets (50%), economy under 10 (40%), five-wicket hauls (10%).
///
/// The economy term has a floor of zero but no ceiling, so an economy
/// below 6 scores above 1.
pub fn bowling_impact(stats: Option<&BowlingLine>) -> f64 {
    let Some(s) = stats.filter(|s| s.matches >= MIN_MATCHES_FOR_IMPACT) else {
        return 0.0;
    };

    let wickets_score = (f64::from(s.wickets) / 200.0).min(1.0);
    let economy_score = if s.economy > 0.0 {
        (1.0 - (s.economy - 6.0) / 4.0).max(0.0)
    } else {
        0.0
    };
    let fifers_score = (f64::from(s.five_wicket_haul) / 5.0).min(1.0);

    wickets_score * 0.5 + economy_score * 0.4 + fifers_score * 0.1
}

fn key_stats(batting: Option<&BattingLine>, bowling: Option<&BowlingLine>) -> KeyStats {
    let mut stats = KeyStats::default();
    if let Some(b) = batting.filter(|b| b.matches > 0) {
        stats.ipl_matches = Some(b.matches);
        stats.ipl_runs = Some(b.runs);
        stats.batting_avg = Some(b.average);
        stats.strike_rate = Some(b.strike_rate);
    }
    if let Some(b) = bowling.filter(|b| b.matches > 0) {
        stats.ipl_wickets = Some(b.wickets);
        stats.economy = Some(b.economy);
    }
    stats
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Estimate a player's auction price from their IPL stats.
pub fn value_player(profile: &PlayerProfile) -> Valuation {
    let role = profile.parsed_role();
    let batting = profile.ipl_batting();
    let bowling = profile.ipl_bowling();

    let batting_score = batting_impact(batting);
    let bowling_score = bowling_impact(bowling);
    let scarcity = role_scarcity(role);
    let international = international_status(profile.country.as_deref());

    let total = batting_score * WEIGHT_BATTING
        + bowling_score * WEIGHT_BOWLING
        + RECENT_FORM_SCORE * WEIGHT_FORM
        + scarcity * WEIGHT_SCARCITY
        + international * WEIGHT_INTERNATIONAL;

    let price = (base_price_cr(role) * (1.0 + total)).min(MAX_PRICE_CR);

    Valuation {
        player_id: profile.id,
        player_name: profile.name.clone(),
        role: profile.role.clone(),
        estimated_price_cr: round_to(price, 2),
        breakdown: ValuationBreakdown {
            batting_impact: round_to(batting_score, 3),
            bowling_impact: round_to(bowling_score, 3),
            recent_form: RECENT_FORM_SCORE,
            role_scarcity: scarcity,
            international_status: international,
            total_score: round_to(total, 3),
        },
        key_stats: key_stats(batting, bowling),
    }
}

/// Value several players, most expensive first.
pub fn compare_players(profiles: &[PlayerProfile]) -> Vec<Valuation> {
    let mut valuations: Vec<Valuation> = profiles.iter().map(value_player).collect();
    valuations.sort_by(|a, b| b.estimated_price_cr.total_cmp(&a.estimated_price_cr));
    valuations
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn batsman() -> PlayerProfile {
        PlayerProfile {
            id: 1,
            cricbuzz_id: 1413,
            name: "Virat Kohli".into(),
            country: Some("India".into()),
            role: Some("Batsman".into()),
            batting_style: None,
            bowling_style: None,
            batting: vec![BattingLine {
                format: "IPL".into(),
                matches: 237,
                innings: 227,
                runs: 7263,
                highest: Some("113".into()),
                average: 36.50,
                strike_rate: 130.02,
                fifties: 50,
                hundreds: 7,
                fours: 674,
                sixes: 235,
            }],
            bowling: vec![],
        }
    }

    fn bowler() -> PlayerProfile {
        PlayerProfile {
            id: 2,
            cricbuzz_id: 4898,
            name: "Jasprit Bumrah".into(),
            country: Some("India".into()),
            role: Some("Bowler".into()),
            batting_style: None,
            bowling_style: None,
            batting: vec![],
            bowling: vec![BowlingLine {
                format: "IPL".into(),
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
        }
    }

    #[test]
    fn batting_impact_of_prolific_batsman() {
        // runs capped 1.0*0.4 + 36.5/50*0.25 + 0.3002*0.25 + 1.0*0.10
        let impact = batting_impact(batsman().ipl_batting());
        let expected = 0.4 + 0.73 * 0.25 + 0.3002 * 0.25 + 0.10;
        assert!((impact - expected).abs() < 1e-9, "got {impact}");
    }

    #[test]
    fn impact_is_zero_below_minimum_matches() {
        let mut p = batsman();
        p.batting[0].matches = 4;
        assert_eq!(batting_impact(p.ipl_batting()), 0.0);
        assert_eq!(batting_impact(None), 0.0);
        assert_eq!(bowling_impact(None), 0.0);
    }

    #[test]
    fn economy_score_has_a_floor_but_no_ceiling() {
        let mut p = bowler();
        let others = (165.0 / 200.0) * 0.5 + (1.0 / 5.0) * 0.1;

        p.bowling[0].economy = 12.0;
        let expensive = bowling_impact(p.ipl_bowling());
        assert!((expensive - others).abs() < 1e-9);

        p.bowling[0].economy = 5.0;
        let cheap = bowling_impact(p.ipl_bowling());
        assert!((cheap - (others + 1.25 * 0.4)).abs() < 1e-9);
    }

    #[test]
    fn international_status_needs_exact_country_name() {
        assert_eq!(international_status(Some("India")), 0.8);
        assert_eq!(international_status(Some("india")), 0.0);
        assert_eq!(international_status(Some("INDIA")), 0.0);
        assert_eq!(international_status(None), 0.0);
    }

    #[test]
    fn valuation_scales_base_price() {
        let v = value_player(&batsman());
        let batting = batting_impact(batsman().ipl_batting());
        let total = batting * 0.35 + 0.5 * 0.15 + 0.3 * 0.10 + 0.8 * 0.05;
        assert_eq!(v.estimated_price_cr, round_to(2.0 * (1.0 + total), 2));
        assert_eq!(v.breakdown.bowling_impact, 0.0);
        assert_eq!(v.key_stats.ipl_runs, Some(7263));
        assert_eq!(v.key_stats.ipl_wickets, None);
    }

    #[test]
    fn unknown_role_uses_defaults() {
        let mut p = batsman();
        p.role = Some("Captain".into());
        p.country = Some("Australia".into());
        let v = value_player(&p);
        assert_eq!(v.breakdown.role_scarcity, 0.5);
        assert_eq!(v.breakdown.international_status, 0.0);
    }

    #[test]
    fn price_never_exceeds_cap() {
        assert!(value_player(&batsman()).estimated_price_cr <= MAX_PRICE_CR);
    }

    #[test]
    fn comparison_is_sorted_by_price_descending() {
        let ranked = compare_players(&[bowler(), batsman()]);
        assert_eq!(ranked.len(), 2);
        assert!(ranked[0].estimated_price_cr >= ranked[1].estimated_price_cr);
    }

    #[test]
    fn key_stats_omit_missing_sections_when_serialized() {
        let json = serde_json::to_value(value_player(&bowler()).key_stats).unwrap();
        assert!(json.get("ipl_runs").is_none());
        assert_eq!(json["ipl_wickets"], 165);
    }
}
