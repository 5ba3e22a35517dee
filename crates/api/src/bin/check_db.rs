//! Prints the tables, row counts, sample rows and schemas of a database file.
//!
//! Usage: `check-db [PATH]`. Defaults to `DATABASE_PATH` or `data/recipes.db`.

use std::path::PathBuf;
use std::process::ExitCode;

use api::config::Config;
use store::SqliteStore;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Config::from_env().database_path);

    if !path.exists() {
        print!("{}", api::report::render_missing(&path));
        return ExitCode::SUCCESS;
    }

    let store = match SqliteStore::open_existing(&path).await {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, path = %path.display(), "failed to open database");
            return ExitCode::FAILURE;
        }
    };

    let result = store.inspect().await;
    store.close().await;

    match result {
        Ok(report) => {
            print!("{}", api::report::render(&path, &report));
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "error checking database");
            ExitCode::FAILURE
        }
    }
}
