use store::SqliteStore;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
///
/// The server keeps running when the database cannot be opened; data
/// endpoints then answer 503 while `/api/health` reports the outage.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub store: Option<SqliteStore>,
}

impl AppState {
    pub fn new(store: SqliteStore) -> Self {
        Self { store: Some(store) }
    }

    /// State for a server running without a database.
    pub fn unavailable() -> Self {
        Self { store: None }
    }

    pub fn store(&self) -> Result<&SqliteStore, ApiError> {
        self.store.as_ref().ok_or(ApiError::Unavailable)
    }
}
