//! Execution of generated, read-only SQL.
//!
//! Callers pass SQL that has already been through
//! [`auction_core::sql_guard::validate_select`]. The statement additionally
//! runs inside a `READ ONLY` transaction with a `statement_timeout`, so a
//! guard miss can neither write nor hold a connection indefinitely.

use std::time::Duration;

use auction_core::sql_guard::strip_terminator;
use sqlx::PgPool;

/// Runs SELECT statements and returns rows as JSON objects.
pub struct QueryRepo;

impl QueryRepo {
    /// Execute `sql` and return one JSON object per row, columns in SELECT order.
    ///
    /// The statement is wrapped as
    /// `SELECT COALESCE(json_agg(row_to_json(q)), '[]'::json) FROM (<sql>) q`
    /// so arbitrary column sets come back without per-type decoding.
    pub async fn fetch_json_rows(
        pool: &PgPool,
        sql: &str,
        timeout: Duration,
    ) -> Result<Vec<serde_json::Value>, sqlx::Error> {
        let inner = strip_terminator(sql);
        let wrapped =
            format!("SELECT COALESCE(json_agg(row_to_json(q)), '[]'::json) FROM ({inner}) q");

        let mut tx = pool.begin().await?;
        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *tx)
            .await?;
        // SET does not accept bind parameters; the value is an integer we format.
        sqlx::query(&format!(
            "SET LOCAL statement_timeout = {}",
            timeout.as_millis().max(1)
        ))
        .execute(&mut *tx)
        .await?;

        let result: serde_json::Value = sqlx::query_scalar(&wrapped).fetch_one(&mut *tx).await?;
        tx.rollback().await?;

        Ok(match result {
            serde_json::Value::Array(rows) => rows,
            serde_json::Value::Null => Vec::new(),
            other => vec![other],
        })
    }
}
