//! SQLite persistence for the recipe book.
//!
//! All operations live on [`SqliteStore`]; each table family has its own
//! module extending it. Referential integrity is left to SQLite's foreign keys.

pub mod error;
mod grocery;
pub mod inspect;
mod meal_plans;
mod recipes;
mod rows;
pub mod sqlite;

pub use error::{Result, StoreError};
pub use inspect::{DatabaseReport, SAMPLE_ROWS, TableReport};
pub use sqlite::SqliteStore;
