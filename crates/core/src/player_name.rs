//! Heuristic player-name extraction from free-text chat messages.
//!
//! Resolution order:
//! 1. A known marquee player whose full name appears in the message.
//! 2. Capitalized words that are not query stop words, stripped to letters,
//!    longer than two characters, at most three of them.

/// Players commonly asked about, matched case-insensitively before the
/// capitalization heuristic runs.
const KNOWN_PLAYERS: &[&str] = &[
    "Virat Kohli",
    "Rohit Sharma",
    "MS Dhoni",
    "Jasprit Bumrah",
    "Hardik Pandya",
];

const STOP_WORDS: &[&str] = &[
    "show", "me", "about", "stats", "profile", "tell", "value", "worth", "price", "what", "is",
    "the", "his", "her", "auction", "find", "get", "display", "give", "whats", "what's", "of",
    "for", "a", "an", "which", "country", "role", "team", "compare", "versus", "ipl",
];

/// Maximum number of words kept for a name (first, middle, last).
const MAX_NAME_WORDS: usize = 3;

/// Extract a single player name from a message.
pub fn extract_player_name(message: &str) -> Option<String> {
    let lower = message.to_lowercase();
    if let Some(known) = KNOWN_PLAYERS
        .iter()
        .find(|p| lower.contains(&p.to_lowercase()))
    {
        return Some((*known).to_string());
    }

    let parts: Vec<String> = message
        .split_whitespace()
        .filter(|word| !is_stop_word(word))
        .filter(|word| word.chars().any(char::is_uppercase))
        .map(clean_word)
        .filter(|w| w.chars().count() > 2 && !is_stop_word(w))
        .take(MAX_NAME_WORDS)
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

/// Extract several player names, splitting on `and`, `vs`, `versus` and commas.
pub fn extract_player_names(message: &str) -> Vec<String> {
    let mut normalized = message.to_string();
    for sep in [" and ", " AND ", " And ", " vs ", " VS ", " Vs ", " vs. ", " versus "] {
        normalized = normalized.replace(sep, "|");
    }

    normalized
        .replace(',', "|")
        .split('|')
        .filter_map(extract_player_name)
        .collect()
}

fn is_stop_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOP_WORDS.contains(&lower.as_str())
}

/// Drop a possessive `'s` and keep alphabetic characters only.
fn clean_word(word: &str) -> String {
    let trimmed = word
        .trim_end_matches(|c: char| !c.is_alphanumeric())
        .trim_end_matches("'s")
        .trim_end_matches("’s");
    trimmed.chars().filter(|c| c.is_alphabetic()).collect()
}
