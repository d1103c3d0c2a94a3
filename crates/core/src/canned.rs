//! Predefined queries for the most common ranking questions.
//!
//! Matching a canned query skips the language model entirely: the SQL is
//! fixed, reviewed, and always passes [`crate::sql_guard::validate_select`].

/// A fixed, keyword-routed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannedQuery {
    TopBatsmen,
    TopBowlers,
    BestStrikeRate,
    BestEconomy,
    AllRounders,
    ListPlayers,
}

impl CannedQuery {
    pub const ALL: [CannedQuery; 6] = [
        CannedQuery::TopBatsmen,
        CannedQuery::TopBowlers,
        CannedQuery::BestStrikeRate,
        CannedQuery::BestEconomy,
        CannedQuery::AllRounders,
        CannedQuery::ListPlayers,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CannedQuery::TopBatsmen => "top_batsmen",
            CannedQuery::TopBowlers => "top_bowlers",
            CannedQuery::BestStrikeRate => "best_strike_rate",
            CannedQuery::BestEconomy => "best_economy",
            CannedQuery::AllRounders => "all_rounders",
            CannedQuery::ListPlayers => "list_players",
        }
    }

    pub fn sql(self) -> &'static str {
        match self {
            CannedQuery::TopBatsmen => {
                "SELECT p.name, b.runs, b.average, b.strike_rate, b.hundreds, b.fifties \
                 FROM players p \
                 INNER JOIN batting_stats b ON p.id = b.player_id \
                 WHERE b.format = 'IPL' \
                 ORDER BY b.runs DESC \
                 LIMIT 5;"
            }
            CannedQuery::TopBowlers => {
                "SELECT p.name, bw.wickets, bw.average, bw.economy \
                 FROM players p \
                 INNER JOIN bowling_stats bw ON p.id = bw.player_id \
                 WHERE bw.format = 'IPL' \
                 ORDER BY bw.wickets DESC \
                 LIMIT 5;"
            }
            CannedQuery::BestStrikeRate => {
                "SELECT p.name, b.strike_rate, b.runs, b.average \
                 FROM players p \
                 INNER JOIN batting_stats b ON p.id = b.player_id \
                 WHERE b.format = 'IPL' AND b.matches > 10 \
                 ORDER BY b.strike_rate DESC \
                 LIMIT 5;"
            }
            CannedQuery::BestEconomy => {
                "SELECT p.name, bw.economy, bw.wickets, bw.average \
                 FROM players p \
                 INNER JOIN bowling_stats bw ON p.id = bw.player_id \
                 WHERE bw.format = 'IPL' AND bw.wickets > 10 \
                 ORDER BY bw.economy ASC \
                 LIMIT 5;"
            }
            CannedQuery::AllRounders => {
                "SELECT p.name, p.role, b.runs, bw.wickets \
                 FROM players p \
                 LEFT JOIN batting_stats b ON p.id = b.player_id AND b.format = 'IPL' \
                 LEFT JOIN bowling_stats bw ON p.id = bw.player_id AND bw.format = 'IPL' \
                 WHERE p.role = 'All-Rounder' \
                 LIMIT 10;"
            }
            CannedQuery::ListPlayers => {
                "SELECT name, role, country \
                 FROM players \
                 ORDER BY name \
                 LIMIT 20;"
            }
        }
    }

    /// Route a question to a canned query, if one fits.
    pub fn match_question(question: &str) -> Option<CannedQuery> {
        let q = question.to_lowercase();
        let has_any = |words: &[&str]| words.iter().any(|w| q.contains(w));

        if has_any(&["top", "best"]) && has_any(&["batsmen", "batsman", "runs"]) {
            return Some(CannedQuery::TopBatsmen);
        }
        if has_any(&["top", "best"]) && has_any(&["bowlers", "bowler", "wickets"]) {
            return Some(CannedQuery::TopBowlers);
        }
        if q.contains("strike") && q.contains("rate") {
            return Some(CannedQuery::BestStrikeRate);
        }
        if q.contains("economy") {
            return Some(CannedQuery::BestEconomy);
        }
        if q.contains("all") && q.contains("round") {
            return Some(CannedQuery::AllRounders);
        }
        if has_any(&["list", "show all", "all players"]) {
            return Some(CannedQuery::ListPlayers);
        }
        None
    }
}
