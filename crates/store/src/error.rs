use thiserror::Error;

/// Errors that can occur when interacting with the recipe database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A grocery item or meal plan referenced a row that does not exist.
    #[error("Referenced {entity} not found: {id}")]
    MissingReference { entity: &'static str, id: String },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored id column did not hold a UUID.
    #[error("Invalid stored id: {0}")]
    InvalidId(#[from] uuid::Error),

    /// A stored row held a value outside its domain.
    #[error("Invalid stored row: {0}")]
    InvalidRow(String),

    /// The database directory could not be prepared.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn missing_recipe(id: impl std::fmt::Display) -> Self {
        StoreError::MissingReference {
            entity: "recipe",
            id: id.to_string(),
        }
    }

    /// True when the database could not be reached at all, as opposed to a
    /// statement failing.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StoreError::Database(
                sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)
            ) | StoreError::Io(_)
        )
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
