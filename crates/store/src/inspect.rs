//! Read-only overview of what a database file contains.

use serde::Serialize;

use crate::{Result, SqliteStore};

/// Number of sample rows reported per table.
pub const SAMPLE_ROWS: i64 = 5;

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseReport {
    pub tables: Vec<TableReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub name: String,
    pub row_count: i64,
    /// Up to [`SAMPLE_ROWS`] rows as JSON objects keyed by column name.
    /// BLOB values are rendered as hex strings.
    pub sample_rows: Vec<serde_json::Value>,
    pub schema_sql: Option<String>,
}

impl DatabaseReport {
    pub fn table(&self, name: &str) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.name == name)
    }
}

impl SqliteStore {
    /// Reports every table with its row count, sample rows and schema.
    #[tracing::instrument(skip(self))]
    pub async fn inspect(&self) -> Result<DatabaseReport> {
        let mut conn = self.pool.acquire().await?;

        let tables: Vec<(String, Option<String>)> = sqlx::query_as(
            "SELECT name, sql FROM sqlite_master WHERE type = 'table' ORDER BY name",
        )
        .fetch_all(&mut *conn)
        .await?;

        let mut reports = Vec::with_capacity(tables.len());
        for (name, schema_sql) in tables {
            let table = quote_identifier(&name);

            let row_count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(&mut *conn)
                .await?;

            let columns: Vec<String> =
                sqlx::query_scalar("SELECT name FROM pragma_table_info(?) ORDER BY cid")
                    .bind(&name)
                    .fetch_all(&mut *conn)
                    .await?;

            let sample_rows = if row_count == 0 || columns.is_empty() {
                Vec::new()
            } else {
                let raw: Vec<String> = sqlx::query_scalar(&format!(
                    "SELECT {} FROM {table} LIMIT {SAMPLE_ROWS}",
                    json_object_expr(&columns)
                ))
                .fetch_all(&mut *conn)
                .await?;
                raw.iter()
                    .map(|json| serde_json::from_str::<serde_json::Value>(json))
                    .collect::<std::result::Result<Vec<_>, _>>()?
            };

            reports.push(TableReport {
                name,
                row_count,
                sample_rows,
                schema_sql,
            });
        }

        Ok(DatabaseReport { tables: reports })
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Builds `json_object('col', col, ...)`. JSON cannot hold BLOBs, so those
/// columns are hex-encoded.
fn json_object_expr(columns: &[String]) -> String {
    let pairs = columns
        .iter()
        .map(|column| {
            let ident = quote_identifier(column);
            format!(
                "{}, CASE WHEN typeof({ident}) = 'blob' THEN hex({ident}) ELSE {ident} END",
                quote_literal(column)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("json_object({pairs})")
}
