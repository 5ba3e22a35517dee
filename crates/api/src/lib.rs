//! HTTP API server for the recipe book.
//!
//! Provides REST endpoints for recipes, grocery lists and meal plans backed
//! by SQLite, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod report;
pub mod response;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, patch, post};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/api/health", get(routes::health::check))
        .route(
            "/api/recipes",
            get(routes::recipes::list).post(routes::recipes::create),
        )
        .route(
            "/api/recipes/{id}",
            get(routes::recipes::get)
                .put(routes::recipes::update)
                .delete(routes::recipes::remove),
        )
        .route(
            "/api/grocery-lists",
            get(routes::grocery_lists::list).post(routes::grocery_lists::create),
        )
        .route(
            "/api/grocery-lists/{id}",
            get(routes::grocery_lists::get)
                .put(routes::grocery_lists::rename)
                .delete(routes::grocery_lists::remove),
        )
        .route(
            "/api/grocery-lists/{id}/items",
            post(routes::grocery_lists::add_item),
        )
        .route(
            "/api/grocery-lists/{id}/items/{item_id}",
            patch(routes::grocery_lists::update_item).delete(routes::grocery_lists::remove_item),
        )
        .route(
            "/api/grocery-lists/{id}/recipes/{recipe_id}",
            post(routes::grocery_lists::add_recipe),
        )
        .route(
            "/api/grocery-lists/{id}/clear-checked",
            post(routes::grocery_lists::clear_checked),
        )
        .route(
            "/api/meal-plans",
            get(routes::meal_plans::list).post(routes::meal_plans::create),
        )
        .route(
            "/api/meal-plans/{id}",
            get(routes::meal_plans::get)
                .put(routes::meal_plans::update)
                .delete(routes::meal_plans::remove),
        )
        .fallback(routes::not_found)
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
