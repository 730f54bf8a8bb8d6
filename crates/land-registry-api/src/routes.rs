//! API route definitions
//!
//! Collection routes answer both with and without a trailing slash.

use axum::{routing::get, Router};

use crate::handlers::{
    create_asset, get_asset, get_asset_timeline, health_check, list_asset_versions, list_assets,
    list_evidence, log_evidence, root, AppState,
};

/// Build the API router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health and info endpoints
        .route("/", get(root))
        .route("/health", get(health_check))
        // Assets
        .route("/assets", get(list_assets).post(create_asset))
        .route("/assets/", get(list_assets).post(create_asset))
        .route("/assets/{id}", get(get_asset))
        .route("/assets/{id}/timeline", get(get_asset_timeline))
        .route("/assets/{id}/versions", get(list_asset_versions))
        // Evidence
        .route("/evidence", get(list_evidence).post(log_evidence))
        .route("/evidence/", get(list_evidence).post(log_evidence))
        .with_state(state)
}
