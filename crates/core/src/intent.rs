//! Keyword-based intent detection for inbound chat messages.
//!
//! Rules are evaluated in a fixed order and the first match wins, so a
//! message like "top stats for Kohli" is a [`Intent::PlayerStats`] request,
//! not a ranking.

use serde::Serialize;

use crate::player::PlayerRole;

/// What the user is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    PlayerStats,
    Valuation,
    Comparison,
    HiddenGems,
    Ranking,
    GeneralQuery,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::PlayerStats => "player_stats",
            Intent::Valuation => "valuation",
            Intent::Comparison => "comparison",
            Intent::HiddenGems => "hidden_gems",
            Intent::Ranking => "ranking",
            Intent::GeneralQuery => "general_query",
        }
    }
}

/// Ordered keyword table. Earlier rows take precedence.
const RULES: &[(Intent, &[&str])] = &[
    (Intent::PlayerStats, &["stats", "profile", "about", "tell me"]),
    (
        Intent::Valuation,
        &["price", "value", "worth", "cost", "valuation"],
    ),
    (Intent::Comparison, &["compare", "vs", "versus", "better"]),
    (
        Intent::HiddenGems,
        &["hidden gem", "underrated", "bargain", "cheap"],
    ),
    (Intent::Ranking, &["top", "best", "highest", "most", "list"]),
];

/// Detect the intent of a message by substring keyword match.
pub fn detect_intent(message: &str) -> Intent {
    let lower = message.to_lowercase();
    RULES
        .iter()
        .find(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::GeneralQuery)
}

/// The first playing role mentioned in a message, if any.
pub fn mentioned_role(message: &str) -> Option<PlayerRole> {
    let lower = message.to_lowercase();
    [
        ("batsman", PlayerRole::Batsman),
        ("bowler", PlayerRole::Bowler),
        ("all-rounder", PlayerRole::AllRounder),
        ("wicket-keeper", PlayerRole::WicketKeeper),
    ]
    .into_iter()
    .find(|(word, _)| lower.contains(word))
    .map(|(_, role)| role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_questions_route_to_expected_intents() {
        assert_eq!(detect_intent("Show me Virat Kohli stats"), Intent::PlayerStats);
        assert_eq!(
            detect_intent("What's Rohit Sharma's auction value?"),
            Intent::Valuation
        );
        assert_eq!(
            detect_intent("Compare Virat Kohli and MS Dhoni"),
            Intent::Comparison
        );
        assert_eq!(detect_intent("Any underrated bowlers?"), Intent::HiddenGems);
        assert_eq!(detect_intent("Top 5 batsmen by IPL runs"), Intent::Ranking);
        assert_eq!(
            detect_intent("Which players are from India?"),
            Intent::GeneralQuery
        );
    }

    #[test]
    fn earlier_rules_win() {
        // "stats" (player) beats "top" (ranking).
        assert_eq!(detect_intent("top stats for Bumrah"), Intent::PlayerStats);
        // "worth" (valuation) beats "vs" (comparison).
        assert_eq!(detect_intent("Kohli vs Rohit worth"), Intent::Valuation);
    }

    #[test]
    fn detection_is_case_insensitive() {
        assert_eq!(detect_intent("TELL ME ABOUT DHONI"), Intent::PlayerStats);
    }

    #[test]
    fn mentioned_role_finds_first_role() {
        assert_eq!(
            mentioned_role("hidden gem bowler please"),
            Some(PlayerRole::Bowler)
        );
        assert_eq!(
            mentioned_role("cheap All-Rounder"),
            Some(PlayerRole::AllRounder)
        );
        assert_eq!(mentioned_role("cheap players"), None);
    }

    #[test]
    fn intent_names_are_snake_case() {
        assert_eq!(Intent::HiddenGems.as_str(), "hidden_gems");
        assert_eq!(
            serde_json::to_value(Intent::GeneralQuery).unwrap(),
            "general_query"
        );
    }
}
