//! Tower layers wrapped around the registry router
//!
//! Every response carries an `x-request-id`, taken from the request when the
//! client sent one and generated otherwise.

use axum::http::{header, HeaderName, HeaderValue, Method, Request};
use std::time::Duration;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    request_id::{MakeRequestId, RequestId},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Fresh UUIDv4 per request
#[derive(Clone, Default)]
pub struct UuidRequestIdGenerator;

impl MakeRequestId for UuidRequestIdGenerator {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// One INFO span per request, closed with status and latency
pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .latency_unit(LatencyUnit::Millis)
                .level(Level::INFO),
        )
}

/// Cross-origin access for browser clients such as the registry dashboard
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,

    /// Preflight cache lifetime
    pub max_age_seconds: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            allow_credentials: false,
            max_age_seconds: Some(3600),
        }
    }
}

impl CorsConfig {
    /// The registry only reads and appends, so only GET and POST are allowed
    pub fn into_layer(self) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_origin(self.allow_origin())
            .allow_headers(self.allow_headers())
            .allow_credentials(self.allow_credentials)
            .expose_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)]);

        match self.max_age_seconds {
            Some(secs) => layer.max_age(Duration::from_secs(secs)),
            None => layer,
        }
    }

    // `*` is rejected by browsers (and by tower-http) once credentials are allowed
    fn allow_origin(&self) -> AllowOrigin {
        if !self.allowed_origins.is_empty() {
            let origins: Vec<HeaderValue> = self
                .allowed_origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect();
            AllowOrigin::list(origins)
        } else if self.allow_credentials {
            AllowOrigin::mirror_request()
        } else {
            AllowOrigin::any()
        }
    }

    fn allow_headers(&self) -> AllowHeaders {
        if self.allow_credentials {
            AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        } else {
            AllowHeaders::any()
        }
    }
}

/// Which optional layers `build_api_server_with_config` installs
#[derive(Debug, Clone)]
pub struct MiddlewareConfig {
    pub cors: CorsConfig,

    /// gzip/br/deflate/zstd, negotiated through `Accept-Encoding`
    pub enable_compression: bool,

    /// Per-request spans through [`trace_layer`]
    pub enable_tracing: bool,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            cors: CorsConfig::default(),
            enable_compression: true,
            enable_tracing: true,
        }
    }
}

impl MiddlewareConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cors(mut self, cors: CorsConfig) -> Self {
        self.cors = cors;
        self
    }

    pub fn with_compression(mut self, enable: bool) -> Self {
        self.enable_compression = enable;
        self
    }

    pub fn with_tracing(mut self, enable: bool) -> Self {
        self.enable_tracing = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_request_id_generator() {
        let mut generator = UuidRequestIdGenerator;
        let request = Request::new(());

        let request_id = generator.make_request_id(&request).unwrap();
        let value = request_id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }

    #[test]
    fn test_cors_config_default() {
        let config = CorsConfig::default();
        assert!(config.allowed_origins.is_empty());
        assert!(!config.allow_credentials);
        assert_eq!(config.max_age_seconds, Some(3600));
    }

    #[tokio::test]
    async fn test_cors_preflight() {
        use axum::{body::Body, routing::get, Router};
        use tower::ServiceExt;

        let cors = CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
            allow_credentials: true,
            max_age_seconds: None,
        };
        let app = Router::new()
            .route("/assets", get(|| async { "[]" }))
            .layer(cors.into_layer());

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/assets")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        let headers = response.headers();
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[test]
    fn test_credentials_without_origins_builds() {
        let config = CorsConfig {
            allow_credentials: true,
            ..CorsConfig::default()
        };
        let _layer = config.into_layer();
    }

    #[test]
    fn test_middleware_config_builder() {
        let config = MiddlewareConfig::new()
            .with_compression(false)
            .with_tracing(false);

        assert!(!config.enable_compression);
        assert!(!config.enable_tracing);
    }
}
