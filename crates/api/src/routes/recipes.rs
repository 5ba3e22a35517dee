//! Recipe CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::RecipeId;
use domain::{Recipe, RecipeDraft, RecipeQuery};

use crate::AppState;
use crate::error::{ApiError, parse_id};
use crate::response::ApiResponse;

fn not_found(id: RecipeId) -> ApiError {
    ApiError::NotFound(format!("Recipe not found: {id}"))
}

/// GET /api/recipes — lists recipes, optionally filtered by `search` and `tag`.
#[tracing::instrument(skip(state, query))]
pub async fn list(
    State(state): State<Arc<AppState>>,
    query: Result<Query<RecipeQuery>, QueryRejection>,
) -> Result<ApiResponse<Vec<Recipe>>, ApiError> {
    let Query(query) = query?;
    let recipes = state.store()?.list_recipes(query).await?;
    Ok(ApiResponse::ok(recipes))
}

/// GET /api/recipes/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Recipe>, ApiError> {
    let id: RecipeId = parse_id(&id)?;
    let recipe = state
        .store()?
        .get_recipe(id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ApiResponse::ok(recipe))
}

/// POST /api/recipes — validates and stores a new recipe.
#[tracing::instrument(skip(state, payload))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RecipeDraft>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<Recipe>), ApiError> {
    let Json(draft) = payload?;
    let recipe = draft.validate()?;
    let created = state.store()?.create_recipe(&recipe).await?;

    tracing::info!(recipe_id = %created.id, title = %created.title, "recipe created");
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(created).with_message("Recipe created"),
    ))
}

/// PUT /api/recipes/{id} — replaces a recipe with its ingredients and instructions.
#[tracing::instrument(skip(state, payload))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<RecipeDraft>, JsonRejection>,
) -> Result<ApiResponse<Recipe>, ApiError> {
    let id: RecipeId = parse_id(&id)?;
    let Json(draft) = payload?;
    let recipe = draft.validate()?;
    let updated = state
        .store()?
        .update_recipe(id, &recipe)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(ApiResponse::ok(updated).with_message("Recipe updated"))
}

/// DELETE /api/recipes/{id}
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let id: RecipeId = parse_id(&id)?;
    if !state.store()?.delete_recipe(id).await? {
        return Err(not_found(id));
    }
    Ok(ApiResponse::message("Recipe deleted"))
}
