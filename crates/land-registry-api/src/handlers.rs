//! API request handlers
//!
//! This module implements HTTP request handlers for all API endpoints.

use axum::{extract::State, http::StatusCode, Json};
use land_registry_core::{Asset, AssetId, AssetVersion, Evidence, TimelineEvent};
use land_registry_service::{
    CreateAssetRequest, ListParams, LogEvidenceRequest, ServiceRegistry,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApiResult,
    extract::{ApiJson, ApiPath, ApiQuery},
    responses::{created, ComponentHealth, HealthResponse, ServiceInfo},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Service registry
    pub services: Arc<ServiceRegistry>,
}

impl AppState {
    /// Create new application state
    pub fn new(services: ServiceRegistry) -> Self {
        Self {
            services: Arc::new(services),
        }
    }
}

// ============================================================================
// Asset Handlers
// ============================================================================

/// Register a new asset together with its genesis version
#[instrument(skip(state, request), fields(asset_name = %request.name))]
pub async fn create_asset(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateAssetRequest>,
) -> ApiResult<(StatusCode, Json<Asset>)> {
    info!("Creating asset");

    let asset = state.services.registration().create_asset(request).await?;

    Ok(created(asset))
}

/// List assets with offset pagination
#[instrument(skip(state))]
pub async fn list_assets(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<Vec<Asset>>> {
    let assets = state.services.search().list_assets(params).await?;
    Ok(Json(assets))
}

/// Get asset by ID
#[instrument(skip(state))]
pub async fn get_asset(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AssetId>,
) -> ApiResult<Json<Asset>> {
    debug!("Getting asset: {}", id);

    let asset = state.services.search().get_asset(id).await?;
    Ok(Json(asset))
}

/// Merged history and evidence, newest first
#[instrument(skip(state))]
pub async fn get_asset_timeline(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AssetId>,
) -> ApiResult<Json<Vec<TimelineEvent>>> {
    let timeline = state.services.timeline().get_timeline(id).await?;
    Ok(Json(timeline))
}

/// Version history, oldest first
#[instrument(skip(state))]
pub async fn list_asset_versions(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<AssetId>,
) -> ApiResult<Json<Vec<AssetVersion>>> {
    let versions = state.services.search().list_versions(id).await?;
    Ok(Json(versions))
}

// ============================================================================
// Evidence Handlers
// ============================================================================

/// Attach evidence to an existing asset
#[instrument(skip(state, request), fields(asset_id = %request.asset_id))]
pub async fn log_evidence(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LogEvidenceRequest>,
) -> ApiResult<(StatusCode, Json<Evidence>)> {
    info!("Logging evidence");

    let evidence = state.services.registration().log_evidence(request).await?;

    Ok(created(evidence))
}

/// List evidence across all assets
#[instrument(skip(state))]
pub async fn list_evidence(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> ApiResult<Json<Vec<Evidence>>> {
    let evidence = state.services.search().list_evidence(params).await?;
    Ok(Json(evidence))
}

// ============================================================================
// Health and Info Handlers
// ============================================================================

/// Service banner
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::online())
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> HealthResponse {
    let search = state.services.search();

    let database = match search.health_check().await {
        Ok(()) => match search.stats().await {
            Ok(stats) => ComponentHealth::healthy()
                .with_count("assets", stats.assets)
                .with_count("versions", stats.versions)
                .with_count("evidence", stats.evidence),
            Err(e) => ComponentHealth::unhealthy(e.to_string()),
        },
        Err(e) => {
            warn!("Database health check failed: {}", e);
            ComponentHealth::unhealthy(e.to_string())
        }
    };

    HealthResponse::new(crate::VERSION).with_check("database", database)
}
