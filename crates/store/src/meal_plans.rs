use common::MealPlanId;
use domain::{MealPlan, MealPlanDraft, MealPlanQuery, MealType};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

use crate::recipes::recipe_exists;
use crate::rows;
use crate::{Result, SqliteStore, StoreError};

const ORDER_BY_DAY: &str = " ORDER BY date ASC, CASE meal_type \
    WHEN 'breakfast' THEN 0 WHEN 'lunch' THEN 1 WHEN 'dinner' THEN 2 ELSE 3 END, rowid ASC";

impl SqliteStore {
    /// Schedules a recipe. Fails with [`StoreError::MissingReference`] if the
    /// recipe does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn create_meal_plan(&self, draft: &MealPlanDraft) -> Result<MealPlan> {
        let id = MealPlanId::new();
        let mut tx = self.begin_write().await?;

        if !recipe_exists(&mut tx, draft.recipe_id).await? {
            return Err(StoreError::missing_recipe(draft.recipe_id));
        }

        sqlx::query("INSERT INTO meal_plans (id, date, recipe_id, meal_type) VALUES (?, ?, ?, ?)")
            .bind(id.to_string())
            .bind(draft.date)
            .bind(draft.recipe_id.to_string())
            .bind(draft.meal_type.as_str())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        metrics::counter!("meal_plans_created_total").increment(1);
        Ok(MealPlan {
            id,
            date: draft.date,
            recipe_id: draft.recipe_id,
            meal_type: draft.meal_type,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_meal_plan(&self, id: MealPlanId) -> Result<Option<MealPlan>> {
        let row = sqlx::query("SELECT id, date, recipe_id, meal_type FROM meal_plans WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_meal_plan).transpose()
    }

    /// Lists meal plans ordered by date, then by meal slot.
    #[tracing::instrument(skip(self))]
    pub async fn list_meal_plans(&self, query: &MealPlanQuery) -> Result<Vec<MealPlan>> {
        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT id, date, recipe_id, meal_type FROM meal_plans WHERE 1=1");

        if let Some(from) = query.from {
            builder.push(" AND date >= ").push_bind(from);
        }
        if let Some(to) = query.to {
            builder.push(" AND date <= ").push_bind(to);
        }
        if let Some(meal_type) = query.meal_type {
            builder.push(" AND meal_type = ").push_bind(meal_type.as_str());
        }
        builder.push(ORDER_BY_DAY);

        let plan_rows = builder.build().fetch_all(&self.pool).await?;
        plan_rows.iter().map(row_to_meal_plan).collect()
    }

    /// Replaces a meal plan. Returns `None` if it does not exist.
    #[tracing::instrument(skip(self))]
    pub async fn update_meal_plan(
        &self,
        id: MealPlanId,
        draft: &MealPlanDraft,
    ) -> Result<Option<MealPlan>> {
        let mut tx = self.begin_write().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM meal_plans WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }
        if !recipe_exists(&mut tx, draft.recipe_id).await? {
            return Err(StoreError::missing_recipe(draft.recipe_id));
        }

        sqlx::query("UPDATE meal_plans SET date = ?, recipe_id = ?, meal_type = ? WHERE id = ?")
            .bind(draft.date)
            .bind(draft.recipe_id.to_string())
            .bind(draft.meal_type.as_str())
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(Some(MealPlan {
            id,
            date: draft.date,
            recipe_id: draft.recipe_id,
            meal_type: draft.meal_type,
        }))
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_meal_plan(&self, id: MealPlanId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM meal_plans WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            metrics::counter!("meal_plans_deleted_total").increment(1);
        }
        Ok(deleted)
    }
}

fn row_to_meal_plan(row: &SqliteRow) -> Result<MealPlan> {
    let meal_type: String = row.try_get("meal_type")?;
    let meal_type: MealType = meal_type
        .parse()
        .map_err(|e: domain::ValidationError| StoreError::InvalidRow(e.to_string()))?;

    Ok(MealPlan {
        id: rows::id(row, "id")?,
        date: row.try_get("date")?,
        recipe_id: rows::id(row, "recipe_id")?,
        meal_type,
    })
}
