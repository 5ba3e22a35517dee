use chrono::Utc;
use common::{GroceryItemId, GroceryListId, RecipeId};
use domain::{GroceryItem, GroceryItemChanges, GroceryList, NewGroceryItem, NewGroceryList};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::recipes::{fetch_recipe, recipe_exists};
use crate::rows;
use crate::{Result, SqliteStore, StoreError};

const ITEM_COLUMNS: &str = "id, grocery_list_id, name, amount, unit, checked, recipe_id";

impl SqliteStore {
    #[tracing::instrument(skip(self, list), fields(name = %list.name))]
    pub async fn create_grocery_list(&self, list: &NewGroceryList) -> Result<GroceryList> {
        let id = GroceryListId::new();
        let now = Utc::now();

        let mut conn = self.pool.acquire().await?;
        sqlx::query(
            "INSERT INTO grocery_lists (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&list.name)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        metrics::counter!("grocery_lists_created_total").increment(1);
        fetch_list(&mut conn, id)
            .await?
            .ok_or_else(|| {
                StoreError::InvalidRow(format!("grocery list {id} vanished after insert"))
            })
    }

    /// Loads a grocery list with its items.
    #[tracing::instrument(skip(self))]
    pub async fn get_grocery_list(&self, id: GroceryListId) -> Result<Option<GroceryList>> {
        let mut conn = self.pool.acquire().await?;
        fetch_list(&mut conn, id).await
    }

    /// Lists every grocery list with its items, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_grocery_lists(&self) -> Result<Vec<GroceryList>> {
        let mut conn = self.pool.acquire().await?;
        let list_rows = sqlx::query(
            "SELECT id, name, created_at, updated_at FROM grocery_lists \
             ORDER BY created_at DESC, rowid DESC",
        )
        .fetch_all(&mut *conn)
        .await?;

        let mut lists = Vec::with_capacity(list_rows.len());
        for row in &list_rows {
            lists.push(hydrate_list(&mut conn, row).await?);
        }
        Ok(lists)
    }

    #[tracing::instrument(skip(self, list))]
    pub async fn rename_grocery_list(
        &self,
        id: GroceryListId,
        list: &NewGroceryList,
    ) -> Result<Option<GroceryList>> {
        let mut conn = self.pool.acquire().await?;
        let updated = sqlx::query("UPDATE grocery_lists SET name = ?, updated_at = ? WHERE id = ?")
            .bind(&list.name)
            .bind(Utc::now())
            .bind(id.to_string())
            .execute(&mut *conn)
            .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        fetch_list(&mut conn, id).await
    }

    /// Deletes a grocery list and, through the cascade, all of its items.
    #[tracing::instrument(skip(self))]
    pub async fn delete_grocery_list(&self, id: GroceryListId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM grocery_lists WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            metrics::counter!("grocery_lists_deleted_total").increment(1);
        }
        Ok(deleted)
    }

    /// Appends an unchecked item to a list.
    ///
    /// Returns `None` if the list does not exist, and
    /// [`StoreError::MissingReference`] if the item names an unknown recipe.
    #[tracing::instrument(skip(self, item))]
    pub async fn add_grocery_item(
        &self,
        list_id: GroceryListId,
        item: &NewGroceryItem,
    ) -> Result<Option<GroceryItem>> {
        let mut tx = self.begin_write().await?;

        if !touch_list(&mut tx, list_id).await? {
            return Ok(None);
        }
        if let Some(recipe_id) = item.recipe_id
            && !recipe_exists(&mut tx, recipe_id).await?
        {
            return Err(StoreError::missing_recipe(recipe_id));
        }

        let id = insert_item(&mut tx, list_id, item).await?;
        let stored = fetch_item(&mut tx, list_id, id).await?;
        tx.commit().await?;

        metrics::counter!("grocery_items_added_total").increment(1);
        Ok(stored)
    }

    /// Applies changes to one item of a list.
    ///
    /// Returns `None` if the item does not exist on that list.
    #[tracing::instrument(skip(self, changes))]
    pub async fn update_grocery_item(
        &self,
        list_id: GroceryListId,
        item_id: GroceryItemId,
        changes: GroceryItemChanges,
    ) -> Result<Option<GroceryItem>> {
        let mut tx = self.begin_write().await?;

        let Some(mut item) = fetch_item(&mut tx, list_id, item_id).await? else {
            return Ok(None);
        };
        item.apply(changes);

        sqlx::query(
            "UPDATE grocery_items SET name = ?, amount = ?, unit = ?, checked = ? \
             WHERE id = ? AND grocery_list_id = ?",
        )
        .bind(&item.name)
        .bind(item.amount)
        .bind(&item.unit)
        .bind(item.checked)
        .bind(item_id.to_string())
        .bind(list_id.to_string())
        .execute(&mut *tx)
        .await?;
        touch_list(&mut tx, list_id).await?;

        tx.commit().await?;
        Ok(Some(item))
    }

    #[tracing::instrument(skip(self))]
    pub async fn remove_grocery_item(
        &self,
        list_id: GroceryListId,
        item_id: GroceryItemId,
    ) -> Result<bool> {
        let mut tx = self.begin_write().await?;

        let result = sqlx::query("DELETE FROM grocery_items WHERE id = ? AND grocery_list_id = ?")
            .bind(item_id.to_string())
            .bind(list_id.to_string())
            .execute(&mut *tx)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            touch_list(&mut tx, list_id).await?;
        }
        tx.commit().await?;

        if removed {
            metrics::counter!("grocery_items_removed_total").increment(1);
        }
        Ok(removed)
    }

    /// Adds one item per ingredient of `recipe_id` to a list, each traced back
    /// to the recipe. See [`domain::Recipe::grocery_items`] for scaling.
    ///
    /// Returns `None` if the list does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn add_recipe_to_grocery_list(
        &self,
        list_id: GroceryListId,
        recipe_id: RecipeId,
        servings: Option<u32>,
    ) -> Result<Option<GroceryList>> {
        let mut tx = self.begin_write().await?;

        if !touch_list(&mut tx, list_id).await? {
            return Ok(None);
        }
        let recipe = fetch_recipe(&mut tx, recipe_id)
            .await?
            .ok_or_else(|| StoreError::missing_recipe(recipe_id))?;

        let items = recipe.grocery_items(servings);
        for item in &items {
            insert_item(&mut tx, list_id, item).await?;
        }

        let list = fetch_list(&mut tx, list_id).await?;
        tx.commit().await?;

        metrics::counter!("grocery_items_added_total").increment(items.len() as u64);
        tracing::debug!(added = items.len(), "recipe ingredients added to grocery list");
        Ok(list)
    }

    /// Deletes every checked item of a list and returns how many were removed.
    ///
    /// Returns `None` if the list does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn clear_checked_items(&self, list_id: GroceryListId) -> Result<Option<u64>> {
        let mut tx = self.begin_write().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM grocery_lists WHERE id = ?")
            .bind(list_id.to_string())
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let result =
            sqlx::query("DELETE FROM grocery_items WHERE grocery_list_id = ? AND checked = 1")
                .bind(list_id.to_string())
                .execute(&mut *tx)
                .await?;
        let removed = result.rows_affected();
        if removed > 0 {
            touch_list(&mut tx, list_id).await?;
        }

        tx.commit().await?;
        metrics::counter!("grocery_items_removed_total").increment(removed);
        Ok(Some(removed))
    }
}

/// Bumps `updated_at`; returns false if the list does not exist.
async fn touch_list(conn: &mut SqliteConnection, id: GroceryListId) -> Result<bool> {
    let result = sqlx::query("UPDATE grocery_lists SET updated_at = ? WHERE id = ?")
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

async fn insert_item(
    conn: &mut SqliteConnection,
    list_id: GroceryListId,
    item: &NewGroceryItem,
) -> Result<GroceryItemId> {
    let id = GroceryItemId::new();
    sqlx::query(
        r#"
        INSERT INTO grocery_items (id, grocery_list_id, name, amount, unit, checked, recipe_id)
        VALUES (?, ?, ?, ?, ?, 0, ?)
        "#,
    )
    .bind(id.to_string())
    .bind(list_id.to_string())
    .bind(&item.name)
    .bind(item.amount)
    .bind(&item.unit)
    .bind(item.recipe_id.map(|r| r.to_string()))
    .execute(&mut *conn)
    .await?;
    Ok(id)
}

async fn fetch_item(
    conn: &mut SqliteConnection,
    list_id: GroceryListId,
    item_id: GroceryItemId,
) -> Result<Option<GroceryItem>> {
    let row = sqlx::query(&format!(
        "SELECT {ITEM_COLUMNS} FROM grocery_items WHERE id = ? AND grocery_list_id = ?"
    ))
    .bind(item_id.to_string())
    .bind(list_id.to_string())
    .fetch_optional(&mut *conn)
    .await?;

    row.as_ref().map(row_to_item).transpose()
}

async fn fetch_list(conn: &mut SqliteConnection, id: GroceryListId) -> Result<Option<GroceryList>> {
    let row = sqlx::query("SELECT id, name, created_at, updated_at FROM grocery_lists WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => Ok(Some(hydrate_list(conn, &row).await?)),
        None => Ok(None),
    }
}

async fn hydrate_list(conn: &mut SqliteConnection, row: &SqliteRow) -> Result<GroceryList> {
    let id: GroceryListId = rows::id(row, "id")?;

    let item_rows = sqlx::query(&format!(
        "SELECT {ITEM_COLUMNS} FROM grocery_items WHERE grocery_list_id = ? ORDER BY rowid"
    ))
    .bind(id.to_string())
    .fetch_all(&mut *conn)
    .await?;
    let items = item_rows.iter().map(row_to_item).collect::<Result<Vec<_>>>()?;

    Ok(GroceryList {
        id,
        name: row.try_get("name")?,
        items,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_item(row: &SqliteRow) -> Result<GroceryItem> {
    // `checked` has a DEFAULT but no NOT NULL constraint.
    let checked: Option<bool> = row.try_get("checked")?;
    Ok(GroceryItem {
        id: rows::id(row, "id")?,
        grocery_list_id: rows::id(row, "grocery_list_id")?,
        name: row.try_get("name")?,
        amount: row.try_get("amount")?,
        unit: row.try_get("unit")?,
        checked: checked.unwrap_or(false),
        recipe_id: rows::optional_id(row, "recipe_id")?,
    })
}
