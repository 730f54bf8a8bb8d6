//! Land Registry API Layer
//!
//! This crate provides the REST API layer for the Land Registry using Axum.
//! It includes request handlers, middleware, error handling, and response types.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for all API endpoints
//! - **Routes**: Route definitions and router configuration
//! - **Middleware**: Tower middleware for logging, CORS, compression and request ids
//! - **Error Handling**: Conversion of service errors to HTTP responses
//!
//! # Example
//!
//! ```rust,no_run
//! use land_registry_api::build_api_server;
//! use land_registry_service::ServiceRegistry;
//!
//! # async fn example(services: ServiceRegistry) -> std::io::Result<()> {
//! let app = build_api_server(services);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod responses;
pub mod routes;

// Re-export main types for convenience
pub use error::{ApiError, ApiResult, ErrorCode, ErrorResponse};
pub use handlers::AppState;
pub use middleware::{CorsConfig, MiddlewareConfig, UuidRequestIdGenerator};
pub use responses::{ComponentHealth, HealthResponse, HealthStatus, ServiceInfo};
pub use routes::build_router;

use axum::Router;
use land_registry_service::ServiceRegistry;
use tower_http::{
    compression::CompressionLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
};

/// API crate version, reported by the banner and health endpoints
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name reported by the banner
pub const SERVICE_NAME: &str = "Land Truth Registry API";

/// Router with default middleware: any origin, compression and request tracing
pub fn build_api_server(services: ServiceRegistry) -> Router {
    build_api_server_with_config(services, MiddlewareConfig::default())
}

/// Router wrapped in the layers selected by `middleware_config`
///
/// # Example
///
/// ```rust,no_run
/// use land_registry_api::{build_api_server_with_config, CorsConfig, MiddlewareConfig};
/// use land_registry_service::ServiceRegistry;
///
/// # fn example(services: ServiceRegistry) {
/// let middleware_config = MiddlewareConfig::new()
///     .with_cors(CorsConfig {
///         allowed_origins: vec!["http://localhost:5173".to_string()],
///         ..CorsConfig::default()
///     })
///     .with_compression(true);
///
/// let app = build_api_server_with_config(services, middleware_config);
/// # }
/// ```
pub fn build_api_server_with_config(
    services: ServiceRegistry,
    middleware_config: MiddlewareConfig,
) -> Router {
    let state = AppState::new(services);
    let mut router = build_router(state);

    router = router.layer(middleware_config.cors.into_layer());

    if middleware_config.enable_compression {
        router = router.layer(CompressionLayer::new());
    }

    if middleware_config.enable_tracing {
        router = router.layer(middleware::trace_layer());
    }

    // The last layer added runs first: set the id, then propagate it to the response
    router
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(UuidRequestIdGenerator))
}
