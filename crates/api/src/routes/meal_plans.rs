//! Meal plan endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::MealPlanId;
use domain::{MealPlan, MealPlanDraft, MealPlanQuery};

use crate::AppState;
use crate::error::{ApiError, parse_id};
use crate::response::ApiResponse;

fn not_found(id: MealPlanId) -> ApiError {
    ApiError::NotFound(format!("Meal plan not found: {id}"))
}

/// GET /api/meal-plans — optional inclusive `from`/`to` dates and `meal_type`.
#[tracing::instrument(skip(state, query))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MealPlanQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<MealPlan>>, ApiError> {
    let Query(query) = query?;
    let query = query.validate()?;
    let plans = state.store()?.list_meal_plans(&query).await?;
    Ok(ApiResponse::ok(plans))
}

#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<MealPlan>, ApiError> {
    let id: MealPlanId = parse_id(&id)?;
    let plan = state
        .store()?
        .get_meal_plan(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ApiResponse::ok(plan))
}

#[tracing::instrument(skip(state, payload))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MealPlanDraft>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<MealPlan>), ApiError> {
    let Json(draft) = payload?;
    let plan = state.store()?.create_meal_plan(&draft).await?;

    tracing::info!(
        meal_plan_id = %plan.id,
        date = %plan.date,
        meal_type = %plan.meal_type,
        "meal planned"
    );
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(plan).with_message("Meal plan created"),
    ))
}

#[tracing::instrument(skip(state, payload))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<MealPlanDraft>, JsonRejection>,
) -> Result<ApiResponse<MealPlan>, ApiError> {
    let id: MealPlanId = parse_id(&id)?;
    let Json(draft) = payload?;
    let plan = state
        .store()?
        .update_meal_plan(id, &draft)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ApiResponse::ok(plan).with_message("Meal plan updated"))
}

#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let id: MealPlanId = parse_id(&id)?;
    if !state.store()?.delete_meal_plan(id).await? {
        return Err(not_found(id));
    }
    Ok(ApiResponse::message("Meal plan deleted"))
}
