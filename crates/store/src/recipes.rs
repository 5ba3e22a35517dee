use chrono::Utc;
use common::{IngredientId, InstructionId, RecipeId};
use domain::{Ingredient, Instruction, NewRecipe, Recipe, RecipeQuery};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection};

use crate::rows;
use crate::{Result, SqliteStore, StoreError};

const RECIPE_COLUMNS: &str =
    "id, title, description, prep_time, cook_time, servings, tags, created_at, updated_at";

impl SqliteStore {
    /// Inserts a recipe with its ingredients and instructions in one transaction.
    #[tracing::instrument(skip(self, recipe), fields(title = %recipe.title))]
    pub async fn create_recipe(&self, recipe: &NewRecipe) -> Result<Recipe> {
        let id = RecipeId::new();
        let now = Utc::now();
        let tags = serde_json::to_string(&recipe.tags)?;

        let mut tx = self.begin_write().await?;

        sqlx::query(
            r#"
            INSERT INTO recipes
                (id, title, description, prep_time, cook_time, servings, tags,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(recipe.prep_time)
        .bind(recipe.cook_time)
        .bind(recipe.servings)
        .bind(&tags)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        insert_children(&mut tx, id, recipe).await?;

        let stored = fetch_recipe(&mut tx, id)
            .await?
            .ok_or_else(|| StoreError::InvalidRow(format!("recipe {id} vanished after insert")))?;
        tx.commit().await?;

        metrics::counter!("recipes_created_total").increment(1);
        tracing::debug!(recipe_id = %id, "recipe created");
        Ok(stored)
    }

    /// Loads a recipe with its ingredients and instructions.
    #[tracing::instrument(skip(self))]
    pub async fn get_recipe(&self, id: RecipeId) -> Result<Option<Recipe>> {
        let mut conn = self.pool.acquire().await?;
        fetch_recipe(&mut conn, id).await
    }

    /// Lists recipes matching `query`, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_recipes(&self, query: RecipeQuery) -> Result<Vec<Recipe>> {
        let query = query.normalized();

        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE 1=1"));

        if let Some(tag) = &query.tag {
            builder
                .push(" AND EXISTS (SELECT 1 FROM json_each(recipes.tags) WHERE json_each.value = ")
                .push_bind(tag.clone())
                .push(")");
        }
        builder.push(" ORDER BY created_at DESC, rowid DESC");

        let mut conn = self.pool.acquire().await?;
        let rows = builder.build().fetch_all(&mut *conn).await?;

        // SQLite folds case for ASCII only, so the text search runs here.
        let mut recipes = Vec::with_capacity(rows.len());
        for row in rows {
            let title: String = row.try_get("title")?;
            let description: Option<String> = row.try_get("description")?;
            if query.matches_text(&title, description.as_deref()) {
                recipes.push(hydrate(&mut conn, &row).await?);
            }
        }
        Ok(recipes)
    }

    /// Replaces a recipe's fields, ingredients and instructions.
    ///
    /// Ingredients and instructions are rewritten, so they receive new ids.
    /// Returns `None` if the recipe does not exist.
    #[tracing::instrument(skip(self, recipe))]
    pub async fn update_recipe(&self, id: RecipeId, recipe: &NewRecipe) -> Result<Option<Recipe>> {
        let tags = serde_json::to_string(&recipe.tags)?;
        let mut tx = self.begin_write().await?;

        let updated = sqlx::query(
            r#"
            UPDATE recipes
            SET title = ?, description = ?, prep_time = ?, cook_time = ?, servings = ?, tags = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(recipe.prep_time)
        .bind(recipe.cook_time)
        .bind(recipe.servings)
        .bind(&tags)
        .bind(Utc::now())
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        sqlx::query("DELETE FROM ingredients WHERE recipe_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM instructions WHERE recipe_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;
        insert_children(&mut tx, id, recipe).await?;

        let stored = fetch_recipe(&mut tx, id).await?;
        tx.commit().await?;
        Ok(stored)
    }

    /// Deletes a recipe. Ingredients, instructions and meal plans go with it;
    /// grocery items that referenced it keep existing without the reference.
    #[tracing::instrument(skip(self))]
    pub async fn delete_recipe(&self, id: RecipeId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            metrics::counter!("recipes_deleted_total").increment(1);
        }
        Ok(deleted)
    }
}

pub(crate) async fn recipe_exists(conn: &mut SqliteConnection, id: RecipeId) -> Result<bool> {
    let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM recipes WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;
    Ok(found.is_some())
}

pub(crate) async fn fetch_recipe(
    conn: &mut SqliteConnection,
    id: RecipeId,
) -> Result<Option<Recipe>> {
    let row = sqlx::query(&format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = ?"))
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        Some(row) => Ok(Some(hydrate(conn, &row).await?)),
        None => Ok(None),
    }
}

async fn insert_children(
    conn: &mut SqliteConnection,
    id: RecipeId,
    recipe: &NewRecipe,
) -> Result<()> {
    for ingredient in &recipe.ingredients {
        sqlx::query(
            "INSERT INTO ingredients (id, recipe_id, name, amount, unit) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(IngredientId::new().to_string())
        .bind(id.to_string())
        .bind(&ingredient.name)
        .bind(ingredient.amount)
        .bind(&ingredient.unit)
        .execute(&mut *conn)
        .await?;
    }

    for instruction in &recipe.instructions {
        sqlx::query(
            "INSERT INTO instructions (id, recipe_id, step_number, instruction) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(InstructionId::new().to_string())
        .bind(id.to_string())
        .bind(instruction.step_number)
        .bind(&instruction.text)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// Decodes a `recipes` row and loads its children.
async fn hydrate(conn: &mut SqliteConnection, row: &SqliteRow) -> Result<Recipe> {
    let id: RecipeId = rows::id(row, "id")?;
    let tags: Option<String> = row.try_get("tags")?;
    let tags = match tags {
        Some(raw) if !raw.is_empty() => serde_json::from_str(&raw)?,
        _ => Vec::new(),
    };

    let ingredient_rows = sqlx::query(
        "SELECT id, recipe_id, name, amount, unit FROM ingredients \
         WHERE recipe_id = ? ORDER BY rowid",
    )
    .bind(id.to_string())
    .fetch_all(&mut *conn)
    .await?;
    let ingredients = ingredient_rows
        .iter()
        .map(|row| -> Result<Ingredient> {
            Ok(Ingredient {
                id: rows::id(row, "id")?,
                recipe_id: rows::id(row, "recipe_id")?,
                name: row.try_get("name")?,
                amount: row.try_get("amount")?,
                unit: row.try_get("unit")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let instruction_rows = sqlx::query(
        "SELECT id, recipe_id, step_number, instruction FROM instructions \
         WHERE recipe_id = ? ORDER BY step_number, rowid",
    )
    .bind(id.to_string())
    .fetch_all(&mut *conn)
    .await?;
    let instructions = instruction_rows
        .iter()
        .map(|row| -> Result<Instruction> {
            Ok(Instruction {
                id: rows::id(row, "id")?,
                recipe_id: rows::id(row, "recipe_id")?,
                step_number: row.try_get("step_number")?,
                text: row.try_get("instruction")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Recipe {
        id,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        prep_time: row.try_get("prep_time")?,
        cook_time: row.try_get("cook_time")?,
        servings: row.try_get("servings")?,
        tags,
        ingredients,
        instructions,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
