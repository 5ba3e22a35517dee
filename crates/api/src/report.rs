//! Plain-text rendering of a [`DatabaseReport`] for the `check-db` binary.

use std::fmt::Write;
use std::path::Path;

use store::DatabaseReport;

/// Renders the status of an existing database file.
pub fn render(path: &Path, report: &DatabaseReport) -> String {
    let mut out = header(path);
    let _ = writeln!(out, "Tables found: {}\n", report.tables.len());

    for table in &report.tables {
        let _ = writeln!(out, "Table: {}", table.name);
        let _ = writeln!(out, "   Rows: {}", table.row_count);
        if !table.sample_rows.is_empty() {
            let _ = writeln!(
                out,
                "   Sample data (first {} rows):",
                table.sample_rows.len()
            );
            for (index, row) in table.sample_rows.iter().enumerate() {
                let pretty = serde_json::to_string_pretty(row).unwrap_or_else(|_| row.to_string());
                let _ = writeln!(out, "   {}. {}", index + 1, pretty);
            }
        }
        out.push('\n');
    }

    out.push_str("\nTable Schemas:\n==================\n\n");
    for table in &report.tables {
        let _ = writeln!(out, "{}:", table.name);
        let _ = writeln!(out, "{}\n", table.schema_sql.as_deref().unwrap_or("(no schema)"));
    }

    out.push_str("Database check complete!\n");
    out
}

/// Renders the notice shown when the database file has not been created yet.
pub fn render_missing(path: &Path) -> String {
    let mut out = header(path);
    out.push_str("Database file does not exist yet.\n");
    out.push_str("It will be created automatically when the API server starts.\n");
    out
}

fn header(path: &Path) -> String {
    format!(
        "Database Status:\n==================\n\nDatabase file: {}\n",
        path.display()
    )
}
