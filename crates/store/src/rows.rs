//! Column decoding shared by the table modules.

use std::str::FromStr;

use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::Result;

/// Ids are stored as hyphenated UUID text.
pub(crate) fn id<T>(row: &SqliteRow, column: &str) -> Result<T>
where
    T: FromStr<Err = uuid::Error>,
{
    let raw: String = row.try_get(column)?;
    Ok(raw.parse()?)
}

pub(crate) fn optional_id<T>(row: &SqliteRow, column: &str) -> Result<Option<T>>
where
    T: FromStr<Err = uuid::Error>,
{
    let raw: Option<String> = row.try_get(column)?;
    Ok(raw.map(|raw| raw.parse()).transpose()?)
}
