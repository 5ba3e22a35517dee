//! Grocery list and grocery item endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use common::{GroceryItemId, GroceryListId, RecipeId};
use domain::{GroceryItem, GroceryItemDraft, GroceryItemPatch, GroceryList, GroceryListDraft};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::{ApiError, parse_id};
use crate::response::ApiResponse;

fn list_not_found(id: GroceryListId) -> ApiError {
    ApiError::NotFound(format!("Grocery list not found: {id}"))
}

fn item_not_found(id: GroceryItemId) -> ApiError {
    ApiError::NotFound(format!("Grocery item not found: {id}"))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddRecipeParams {
    pub servings: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ClearCheckedResponse {
    pub removed: u64,
}

/// GET /api/grocery-lists — every list with its items, newest first.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<Vec<GroceryList>>, ApiError> {
    let lists = state.store()?.list_grocery_lists().await?;
    Ok(ApiResponse::ok(lists))
}

/// GET /api/grocery-lists/{id}
#[tracing::instrument(skip(state))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<GroceryList>, ApiError> {
    let id: GroceryListId = parse_id(&id)?;
    let list = state
        .store()?
        .get_grocery_list(id)
        .await?
        .ok_or_else(|| list_not_found(id))?;
    Ok(ApiResponse::ok(list))
}

/// POST /api/grocery-lists
#[tracing::instrument(skip(state, payload))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GroceryListDraft>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<GroceryList>), ApiError> {
    let Json(draft) = payload?;
    let list = draft.validate()?;
    let created = state.store()?.create_grocery_list(&list).await?;

    tracing::info!(grocery_list_id = %created.id, "grocery list created");
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(created).with_message("Grocery list created"),
    ))
}

/// PUT /api/grocery-lists/{id} — renames a list.
#[tracing::instrument(skip(state, payload))]
pub async fn rename(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<GroceryListDraft>, JsonRejection>,
) -> Result<ApiResponse<GroceryList>, ApiError> {
    let id: GroceryListId = parse_id(&id)?;
    let Json(draft) = payload?;
    let list = draft.validate()?;
    let renamed = state
        .store()?
        .rename_grocery_list(id, &list)
        .await?
        .ok_or_else(|| list_not_found(id))?;
    Ok(ApiResponse::ok(renamed).with_message("Grocery list updated"))
}

/// DELETE /api/grocery-lists/{id} — deletes a list and its items.
#[tracing::instrument(skip(state))]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let id: GroceryListId = parse_id(&id)?;
    if !state.store()?.delete_grocery_list(id).await? {
        return Err(list_not_found(id));
    }
    Ok(ApiResponse::message("Grocery list deleted"))
}

/// POST /api/grocery-lists/{id}/items
#[tracing::instrument(skip(state, payload))]
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<GroceryItemDraft>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<GroceryItem>), ApiError> {
    let id: GroceryListId = parse_id(&id)?;
    let Json(draft) = payload?;
    let item = draft.validate()?;
    let added = state
        .store()?
        .add_grocery_item(id, &item)
        .await?
        .ok_or_else(|| list_not_found(id))?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(added).with_message("Grocery item added"),
    ))
}

/// PATCH /api/grocery-lists/{id}/items/{item_id} — partial update, e.g. checking an item off.
#[tracing::instrument(skip(state, payload))]
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path((id, item_id)): Path<(String, String)>,
    payload: Result<Json<GroceryItemPatch>, JsonRejection>,
) -> Result<ApiResponse<GroceryItem>, ApiError> {
    let id: GroceryListId = parse_id(&id)?;
    let item_id: GroceryItemId = parse_id(&item_id)?;
    let Json(patch) = payload?;
    let changes = patch.validate()?;
    let updated = state
        .store()?
        .update_grocery_item(id, item_id, changes)
        .await?
        .ok_or_else(|| item_not_found(item_id))?;
    Ok(ApiResponse::ok(updated))
}

/// DELETE /api/grocery-lists/{id}/items/{item_id}
#[tracing::instrument(skip(state))]
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path((id, item_id)): Path<(String, String)>,
) -> Result<ApiResponse<()>, ApiError> {
    let id: GroceryListId = parse_id(&id)?;
    let item_id: GroceryItemId = parse_id(&item_id)?;
    if !state.store()?.remove_grocery_item(id, item_id).await? {
        return Err(item_not_found(item_id));
    }
    Ok(ApiResponse::message("Grocery item removed"))
}

/// POST /api/grocery-lists/{id}/recipes/{recipe_id} — adds a recipe's
/// ingredients, scaled when `?servings=` is given.
#[tracing::instrument(skip(state, params))]
pub async fn add_recipe(
    State(state): State<Arc<AppState>>,
    Path((id, recipe_id)): Path<(String, String)>,
    params: Result<Query<AddRecipeParams>, QueryRejection>,
) -> Result<ApiResponse<GroceryList>, ApiError> {
    let id: GroceryListId = parse_id(&id)?;
    let recipe_id: RecipeId = parse_id(&recipe_id)?;
    let Query(params) = params?;
    if params.servings == Some(0) {
        return Err(domain::ValidationError::InvalidServings.into());
    }

    let list = state
        .store()?
        .add_recipe_to_grocery_list(id, recipe_id, params.servings)
        .await?
        .ok_or_else(|| list_not_found(id))?;
    Ok(ApiResponse::ok(list).with_message("Recipe ingredients added"))
}

/// POST /api/grocery-lists/{id}/clear-checked
#[tracing::instrument(skip(state))]
pub async fn clear_checked(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<ApiResponse<ClearCheckedResponse>, ApiError> {
    let id: GroceryListId = parse_id(&id)?;
    let removed = state
        .store()?
        .clear_checked_items(id)
        .await?
        .ok_or_else(|| list_not_found(id))?;
    Ok(ApiResponse::ok(ClearCheckedResponse { removed }))
}
