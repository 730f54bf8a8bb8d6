//! API response types
//!
//! Resources are returned as bare JSON. This module holds the service banner
//! and the health report.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Return a created response (201)
pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

/// Banner served at the root path
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub status: String,
    pub service: String,
    pub version: String,
}

impl ServiceInfo {
    /// Banner for a running instance
    pub fn online() -> Self {
        Self {
            status: "online".to_string(),
            service: crate::SERVICE_NAME.to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

/// Report served at `/health`
///
/// Overall status is the worst of the component statuses.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub checks: BTreeMap<String, ComponentHealth>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: HealthStatus,

    /// Failure description for unhealthy components
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Row counts, e.g. `{"assets": 12, "versions": 15, "evidence": 40}`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub counts: BTreeMap<String, i64>,
}

impl HealthResponse {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            version: version.into(),
            checks: BTreeMap::new(),
        }
    }

    pub fn with_check(mut self, name: impl Into<String>, health: ComponentHealth) -> Self {
        if health.status == HealthStatus::Unhealthy {
            self.status = HealthStatus::Unhealthy;
        }
        self.checks.insert(name.into(), health);
        self
    }
}

impl IntoResponse for HealthResponse {
    fn into_response(self) -> Response {
        let status_code = match self.status {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        };

        (status_code, Json(self)).into_response()
    }
}

impl ComponentHealth {
    pub fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
            message: None,
            counts: BTreeMap::new(),
        }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            message: Some(message.into()),
            counts: BTreeMap::new(),
        }
    }

    pub fn with_count(mut self, key: impl Into<String>, count: i64) -> Self {
        self.counts.insert(key.into(), count);
        self
    }
}
