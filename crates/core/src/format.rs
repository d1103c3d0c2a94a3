//! Deterministic WhatsApp reply formatting.
//!
//! WhatsApp renders `*bold*` and `_italic_`, but Twilio occasionally mangles
//! markup in long bodies, so player cards use plain text and only list-style
//! replies use emphasis.

use serde_json::Value;

use crate::player::{PlayerProfile, SimilarPlayer};
use crate::valuation::Valuation;

/// Maximum rows rendered for a query result.
pub const MAX_RESULT_ROWS: usize = 10;

/// Maximum entries rendered for comparisons and similarity lists.
pub const MAX_LIST_ENTRIES: usize = 5;

/// Characters of raw data shown when nothing better is available.
pub const FALLBACK_DATA_CHARS: usize = 300;

pub const HELP_MESSAGE: &str = "Sorry, I couldn't understand that query. Try:\n\n\
Show me Virat Kohli stats\n\
What's Rohit Sharma's auction value?\n\
Top 5 batsmen by IPL runs";

pub const ERROR_MESSAGE: &str = "❌ Sorry, I encountered an error. Please try again later.";

pub const NO_RESULTS_MESSAGE: &str = "📭 No results found for your query.";

/// Truncate to at most `max` characters without splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Player profile card with IPL batting and bowling sections.
pub fn player_stats(player: &PlayerProfile) -> String {
    let mut out = format!(
        "📊 {}\n🏏 Role: {}\n🌍 Country: {}\n\n",
        player.name,
        player.role.as_deref().unwrap_or("N/A"),
        player.country.as_deref().unwrap_or("N/A"),
    );

    if let Some(b) = player.ipl_batting() {
        out.push_str("IPL Batting:\n");
        out.push_str(&format!("• Matches: {}\n", b.matches));
        out.push_str(&format!("• Runs: {}\n", b.runs));
        out.push_str(&format!("• Average: {:.2}\n", b.average));
        out.push_str(&format!("• Strike Rate: {:.2}\n", b.strike_rate));
        out.push_str(&format!("• 50s/100s: {}/{}\n\n", b.fifties, b.hundreds));
    }

    if let Some(b) = player.ipl_bowling().filter(|b| b.wickets > 0) {
        out.push_str("IPL Bowling:\n");
        out.push_str(&format!("• Wickets: {}\n", b.wickets));
        out.push_str(&format!("• Average: {:.2}\n", b.average));
        out.push_str(&format!("• Economy: {:.2}\n", b.economy));
        out.push_str(&format!("• 5W: {}\n", b.five_wicket_haul));
    }

    out.trim().to_string()
}

/// Auction estimate card.
pub fn valuation(v: &Valuation) -> String {
    let mut out = format!(
        "💰 Auction Valuation: {}\n\n🎯 Estimated Price: ₹{:.2} Cr\n\n",
        v.player_name, v.estimated_price_cr
    );

    let b = &v.breakdown;
    out.push_str("Impact Breakdown:\n");
    out.push_str(&format!("🏏 Batting: {:.1}%\n", b.batting_impact * 100.0));
    out.push_str(&format!("⚡ Bowling: {:.1}%\n", b.bowling_impact * 100.0));
    out.push_str(&format!("📈 Form: {:.1}%\n", b.recent_form * 100.0));
    out.push_str(&format!("🎲 Scarcity: {:.1}%\n\n", b.role_scarcity * 100.0));

    let k = &v.key_stats;
    if k.ipl_runs.is_some() || k.ipl_wickets.is_some() {
        out.push_str("Key Stats:\n");
        if let Some(runs) = k.ipl_runs {
            out.push_str(&format!("• Runs: {runs}\n"));
            out.push_str(&format!("• Avg: {:.1}\n", k.batting_avg.unwrap_or_default()));
        }
        if let Some(wickets) = k.ipl_wickets {
            out.push_str(&format!("• Wickets: {wickets}\n"));
            out.push_str(&format!("• Economy: {:.2}\n", k.economy.unwrap_or_default()));
        }
    }

    out.trim().to_string()
}

/// Ranked comparison of several estimates.
pub fn comparison(valuations: &[Valuation]) -> String {
    let mut out = String::from("⚖️ *Player Comparison*\n\n");

    for (i, v) in valuations.iter().take(MAX_LIST_ENTRIES).enumerate() {
        out.push_str(&format!("{}. *{}*\n", i + 1, v.player_name));
        out.push_str(&format!(
            "   ₹{:.2} Cr | {}\n",
            v.estimated_price_cr,
            v.role.as_deref().unwrap_or("N/A")
        ));

        let mut parts = Vec::new();
        if let Some(runs) = v.key_stats.ipl_runs {
            parts.push(format!("{runs} runs"));
        }
        if let Some(wickets) = v.key_stats.ipl_wickets {
            parts.push(format!("{wickets} wkts"));
        }
        if !parts.is_empty() {
            out.push_str(&format!("   {}\n", parts.join(" | ")));
        }
        out.push('\n');
    }

    out.trim().to_string()
}

/// Column-name fragments of fractional stats. `row_to_json` writes a
/// whole-valued float such as `40.0` as `40`, so these are formatted by
/// name rather than by JSON type.
const FRACTIONAL_COLUMNS: &[&str] = &["average", "avg", "strike_rate", "economy", "price", "score"];

fn is_fractional_column(column: &str) -> bool {
    let column = column.to_lowercase();
    FRACTIONAL_COLUMNS.iter().any(|c| column.contains(c))
}

fn render_cell(column: &str, value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.is_f64() || is_fractional_column(column) => {
            n.as_f64().map(|f| format!("{f:.2}"))
        }
        other => Some(other.to_string()),
    }
}

/// Tabular result of a database query, one numbered line per row.
pub fn query_result(question: &str, rows: &[Value]) -> String {
    if rows.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    let mut out = format!("📊 *Results for: {}...*\n\n", truncate_chars(question, 50));

    for (i, row) in rows.iter().take(MAX_RESULT_ROWS).enumerate() {
        let cells: Vec<String> = match row {
            Value::Object(map) => map
                .iter()
                .filter_map(|(k, v)| render_cell(k, v).map(|cell| format!("{k}: {cell}")))
                .collect(),
            other => render_cell("", other).into_iter().collect(),
        };
        out.push_str(&format!("{}. {}\n", i + 1, cells.join(" | ")));
    }

    if rows.len() > MAX_RESULT_ROWS {
        out.push_str(&format!(
            "\n_...and {} more results_",
            rows.len() - MAX_RESULT_ROWS
        ));
    }

    out.trim().to_string()
}

/// Apology shown when a question could not be turned into data.
pub fn query_failure(reason: &str) -> String {
    format!("❌ Sorry, I couldn't process that query.\n\n_{reason}_")
}

/// Semantic-search hits.
pub fn similar_players(players: &[SimilarPlayer]) -> String {
    if players.is_empty() {
        return "❌ No similar players found.".to_string();
    }

    let mut out = String::from("🔍 *Similar Players:*\n\n");
    for (i, p) in players.iter().take(MAX_LIST_ENTRIES).enumerate() {
        out.push_str(&format!("{}. *{}*\n", i + 1, p.name));
        out.push_str(&format!(
            "   {} | {}\n",
            p.role.as_deref().unwrap_or("N/A"),
            p.country.as_deref().unwrap_or("N/A")
        ));
        out.push_str(&format!(
            "   Similarity: {:.1}%\n\n",
            p.similarity_score * 100.0
        ));
    }

    out.trim().to_string()
}

/// "Did you mean" suggestions for an unknown player name.
pub fn did_you_mean(name: &str, suggestions: &[SimilarPlayer]) -> String {
    if suggestions.is_empty() {
        return format!("Player '{name}' not found in database.");
    }
    let mut out = format!("❌ Player '{name}' not found.\n\n*Did you mean:*\n");
    for s in suggestions {
        out.push_str(&format!("• {}\n", s.name));
    }
    out.trim().to_string()
}

/// Raw data dump used when the composer model is unavailable.
pub fn fallback_summary(data: &str) -> String {
    format!(
        "✅ Here's what I found:\n\n{}",
        truncate_chars(data, FALLBACK_DATA_CHARS)
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::player::{BattingLine, BowlingLine};
    use crate::valuation::value_player;

    fn dhoni() -> PlayerProfile {
        PlayerProfile {
            id: 3,
            cricbuzz_id: 4608,
            name: "MS Dhoni".into(),
            country: Some("India".into()),
            role: Some("Wicket-Keeper".into()),
            batting_style: None,
            bowling_style: None,
            batting: vec![BattingLine {
                format: "IPL".into(),
                matches: 250,
                runs: 5243,
                average: 39.12,
                strike_rate: 135.92,
                fifties: 24,
                ..Default::default()
            }],
            bowling: vec![BowlingLine {
                format: "IPL".into(),
                wickets: 0,
                ..Default::default()
            }],
        }
    }

    #[test]
    fn player_card_shows_batting_and_hides_empty_bowling() {
        let card = player_stats(&dhoni());
        assert!(card.starts_with("📊 MS Dhoni\n🏏 Role: Wicket-Keeper"));
        assert!(card.contains("• Runs: 5243"));
        assert!(card.contains("• Average: 39.12"));
        assert!(card.contains("• 50s/100s: 24/0"));
        assert!(!card.contains("IPL Bowling"));
    }

    #[test]
    fn valuation_card_has_price_and_key_stats() {
        let card = valuation(&value_player(&dhoni()));
        assert!(card.contains("💰 Auction Valuation: MS Dhoni"));
        assert!(card.contains("Cr"));
        assert!(card.contains("• Runs: 5243"));
        assert!(!card.contains("• Wickets"));
    }

    #[test]
    fn query_result_formats_rows_and_overflow() {
        let rows: Vec<Value> = (0..12)
            .map(|i| json!({ "name": format!("P{i}"), "runs": 100 - i, "average": 30.5, "note": null }))
            .collect();
        let out = query_result("Top batsmen by IPL runs", &rows);
        assert!(out.starts_with("📊 *Results for: Top batsmen by IPL runs...*"));
        assert!(out.contains("1. name: P0 | runs: 100 | average: 30.50\n"));
        assert!(!out.contains("note"));
        assert!(out.ends_with("_...and 2 more results_"));
    }

    #[test]
    fn whole_valued_stats_keep_two_decimals() {
        let rows = vec![json!({
            "name": "MS Dhoni",
            "matches": 250,
            "batting_average": 40,
            "strike_rate": 136,
            "estimated_price_cr": 12
        })];
        let out = query_result("Dhoni numbers", &rows);
        assert!(out.contains(
            "1. name: MS Dhoni | matches: 250 | batting_average: 40.00 | \
             strike_rate: 136.00 | estimated_price_cr: 12.00"
        ));
    }

    #[test]
    fn empty_query_result_has_friendly_message() {
        assert_eq!(query_result("anything", &[]), NO_RESULTS_MESSAGE);
    }

    #[test]
    fn similar_players_render_percentages() {
        let out = similar_players(&[SimilarPlayer {
            player_id: 1,
            name: "Rohit Sharma".into(),
            role: Some("Batsman".into()),
            country: Some("India".into()),
            similarity_score: 0.8123,
        }]);
        assert!(out.contains("1. *Rohit Sharma*"));
        assert!(out.contains("Similarity: 81.2%"));
    }

    #[test]
    fn did_you_mean_lists_suggestions_or_reports_missing() {
        assert_eq!(
            did_you_mean("Kohly", &[]),
            "Player 'Kohly' not found in database."
        );
        let out = did_you_mean(
            "Kohly",
            &[SimilarPlayer {
                player_id: 1,
                name: "Virat Kohli".into(),
                role: None,
                country: None,
                similarity_score: 0.9,
            }],
        );
        assert!(out.ends_with("• Virat Kohli"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("₹₹₹₹", 2), "₹₹");
        assert_eq!(truncate_chars("ab", 10), "ab");
        assert_eq!(fallback_summary("x").as_str(), "✅ Here's what I found:\n\nx");
    }
}
