//! Text-to-SQL engine: converts a cricket question to a guarded SELECT.

use std::sync::Arc;

use auction_core::sql_guard::{clean_sql, validate_select};

use crate::provider::{AiError, LlmProvider};

/// Schema description, aliasing rules and worked examples given to the model.
pub const SCHEMA_CONTEXT: &str = "\
Database Schema:

Table: players
- id (bigint, primary key)
- cricbuzz_id (bigint, unique)
- name (varchar)
- country (varchar)
- role (varchar) - Values: 'Batsman', 'Bowler', 'All-Rounder', 'Wicket-Keeper'
- batting_style (varchar)
- bowling_style (varchar)

Table: batting_stats
- id (bigint, primary key)
- player_id (bigint, foreign key to players.id)
- format (varchar) - Values: 'TEST', 'ODI', 'T20', 'IPL'
- matches (int)
- innings (int)
- runs (int)
- highest (varchar)
- average (float)
- strike_rate (float)
- fifties (int)
- hundreds (int)
- fours (int)
- sixes (int)

Table: bowling_stats
- id (bigint, primary key)
- player_id (bigint, foreign key to players.id)
- format (varchar) - Values: 'TEST', 'ODI', 'T20', 'IPL'
- matches (int)
- innings (int)
- wickets (int)
- average (float)
- economy (float)
- strike_rate (float)
- five_wicket_haul (int)
- ten_wicket_haul (int)

IMPORTANT RULES:
1. ALWAYS use table aliases (p for players, b for batting_stats, bw for bowling_stats)
2. ALWAYS specify format = 'IPL' when filtering IPL stats
3. For IPL runs, use: WHERE b.format = 'IPL'
4. Use INNER JOIN when stats are required
5. Use LEFT JOIN when player data is primary
6. Always LIMIT results to 20 or less

Examples:

1. \"Top 5 batsmen by IPL runs\"
SELECT p.name, b.runs, b.average, b.strike_rate
FROM players p
INNER JOIN batting_stats b ON p.id = b.player_id
WHERE b.format = 'IPL'
ORDER BY b.runs DESC
LIMIT 5;

2. \"Best economy bowlers in IPL\"
SELECT p.name, bw.economy, bw.wickets
FROM players p
INNER JOIN bowling_stats bw ON p.id = bw.player_id
WHERE bw.format = 'IPL' AND bw.wickets > 10
ORDER BY bw.economy ASC
LIMIT 10;

3. \"All-rounders with 1000+ runs and 50+ wickets in IPL\"
SELECT p.name, b.runs, bw.wickets
FROM players p
INNER JOIN batting_stats b ON p.id = b.player_id
INNER JOIN bowling_stats bw ON p.id = bw.player_id
WHERE p.role = 'All-Rounder'
AND b.format = 'IPL' AND b.runs > 1000
AND bw.format = 'IPL' AND bw.wickets > 50;

4. \"Show all batsmen\"
SELECT name, country, batting_style
FROM players
WHERE role = 'Batsman'
LIMIT 20;

5. \"Batsmen with strike rate above 130\"
SELECT p.name, b.strike_rate, b.runs
FROM players p
INNER JOIN batting_stats b ON p.id = b.player_id
WHERE b.format = 'IPL' AND b.strike_rate > 130
ORDER BY b.strike_rate DESC
LIMIT 20;
";

const OUTPUT_RULES: &str = "\
CRITICAL RULES:
1. Generate ONLY SELECT queries (no INSERT, UPDATE, DELETE, DROP)
2. Use proper INNER JOIN or LEFT JOIN syntax
3. ALWAYS use table aliases (p, b, bw)
4. For IPL statistics, ALWAYS include: WHERE format = 'IPL'
5. Limit results to maximum 20 rows
6. Use single quotes for string literals
7. Return ONLY the SQL query, no explanations or markdown
8. Do not include any text before or after the SQL query
9. The query must be a single valid SQL statement ending with semicolon";

pub struct TextToSqlEngine {
    provider: Arc<dyn LlmProvider>,
}

impl TextToSqlEngine {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Build the full prompt: instruction + schema + question + output rules.
    pub fn build_prompt(&self, question: &str) -> String {
        format!(
            "You are a SQL expert. Convert the following natural language question \
             into a valid PostgreSQL SELECT query.\n\n\
             {SCHEMA_CONTEXT}\n\
             User Question: {question}\n\n\
             {OUTPUT_RULES}\n\n\
             SQL Query:"
        )
    }

    /// Translate a question to SQL that has passed the safety guard.
    pub async fn translate(&self, question: &str) -> Result<String, AiError> {
        let prompt = self.build_prompt(question);
        let raw = self.provider.complete(&prompt).await?;

        let sql = clean_sql(&raw);
        if sql.is_empty() {
            return Err(AiError::Parse("model returned no SQL".to_string()));
        }

        if let Err(e) = validate_select(&sql) {
            tracing::warn!(provider = self.provider.name(), sql = %sql, error = %e, "Blocked generated SQL");
            return Err(AiError::UnsafeSql(e.to_string()));
        }

        tracing::debug!(sql = %sql, "Generated SQL");
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;

    use super::*;

    struct MockLlm(String);

    #[async_trait]
    impl LlmProvider for MockLlm {
        async fn complete(&self, _p: &str) -> Result<String, AiError> {
            Ok(self.0.clone())
        }
        fn name(&self) -> &str {
            "mock"
        }
    }

    fn engine(response: &str) -> TextToSqlEngine {
        TextToSqlEngine::new(Arc::new(MockLlm(response.to_string())))
    }

    #[tokio::test]
    async fn fenced_multiline_sql_is_cleaned() {
        let sql = engine("```sql\nSELECT p.name\nFROM players p\nLIMIT 5\n```")
            .translate("list players")
            .await
            .unwrap();
        assert_eq!(sql, "SELECT p.name FROM players p LIMIT 5;");
    }

    #[tokio::test]
    async fn destructive_sql_is_rejected() {
        let result = engine("DROP TABLE players;").translate("drop it").await;
        assert_matches!(result, Err(AiError::UnsafeSql(_)));

        let result = engine("SELECT 1; DELETE FROM players;")
            .translate("sneaky")
            .await;
        assert_matches!(result, Err(AiError::UnsafeSql(_)));
    }

    #[tokio::test]
    async fn column_names_containing_keywords_are_allowed() {
        let sql = engine("SELECT p.name, p.updated_at FROM players p;")
            .translate("recently updated players")
            .await
            .unwrap();
        assert!(sql.contains("updated_at"));
    }

    #[tokio::test]
    async fn blank_completion_is_parse_error() {
        let result = engine("```\n```").translate("anything").await;
        assert_matches!(result, Err(AiError::Parse(_)));
    }

    #[test]
    fn prompt_contains_schema_question_and_rules() {
        let prompt = engine("").build_prompt("Who hit the most sixes?");
        assert!(prompt.contains("Table: bowling_stats"));
        assert!(prompt.contains("'All-Rounder'"));
        assert!(prompt.contains("User Question: Who hit the most sixes?"));
        assert!(prompt.trim_end().ends_with("SQL Query:"));
    }
}
