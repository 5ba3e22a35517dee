//! Route handlers, one module per resource.

pub mod grocery_lists;
pub mod health;
pub mod meal_plans;
pub mod metrics;
pub mod recipes;

use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::response::ApiResponse;

/// Fallback for unknown paths.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, ApiResponse::failure("Route not found"))
}
