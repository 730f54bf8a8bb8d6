//! Shared harness for the integration suites
//!
//! Each `TestApp` serves the full middleware stack on an ephemeral port over
//! its own in-memory registry, so tests never see each other's rows.

use land_registry_api::build_api_server;
use land_registry_db::{create_pool, PoolConfig, SqliteRegistryRepository};
use land_registry_service::ServiceRegistry;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::net::TcpListener;

pub mod fixtures;

pub struct TestApp {
    pub address: String,
    pub services: ServiceRegistry,
}

impl TestApp {
    /// Create a new test application backed by a fresh in-memory database
    pub async fn new() -> Self {
        let pool = create_pool(&PoolConfig::in_memory())
            .await
            .expect("Failed to create database pool");

        let repository = Arc::new(SqliteRegistryRepository::new(pool));
        let services = ServiceRegistry::new(repository);

        let app = build_api_server(services.clone());

        // Start server on random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let address = listener.local_addr().expect("Failed to get local address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Failed to start test server");
        });

        Self {
            address: format!("http://{}", address),
            services,
        }
    }

    /// Get base URL
    pub fn url(&self) -> &str {
        &self.address
    }

    /// Create HTTP client
    pub fn client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("Failed to build client")
    }

    /// GET a path relative to the server root
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client()
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to send request")
    }

    /// POST a JSON body to a path relative to the server root
    pub async fn post_json<T: serde::Serialize>(&self, path: &str, body: &T) -> reqwest::Response {
        self.client()
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }
}

/// Parse JSON response
pub async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> T {
    response
        .json::<T>()
        .await
        .expect("Failed to parse JSON response")
}

/// Assert response status
pub fn assert_status(response: &reqwest::Response, expected: reqwest::StatusCode) {
    assert_eq!(
        response.status(),
        expected,
        "Expected status {}, got {}",
        expected,
        response.status()
    );
}

/// Assert response is successful (2xx)
pub fn assert_success(response: &reqwest::Response) {
    assert!(
        response.status().is_success(),
        "Expected success status, got {}",
        response.status()
    );
}

/// Assert the error body carries the given code
pub async fn assert_error_code(response: reqwest::Response, code: &str) {
    let body: serde_json::Value = parse_json(response).await;
    assert_eq!(body["code"], code, "unexpected error body: {}", body);
}
