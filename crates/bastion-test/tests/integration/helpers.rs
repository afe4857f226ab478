#![allow(clippy::unused_async, clippy::expect_used, dead_code)]
//! Test helpers for integration tests.
//!
//! Provides utilities for:
//! - Building a service with the stock users and policy
//! - Making HTTP requests with Basic credentials
//! - Asserting on responses

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use salvo::http::header::HeaderName;
use salvo::http::{Method, ReqBody, StatusCode};
use salvo::prelude::*;
use salvo::test::{RequestBuilder, ResponseExt, TestClient};

use bastion_test::app::api::routes;
use bastion_test::app::bootstrap::build_security;
use bastion_test::component::config::{HasherConfig, Settings};

pub const USER: (&str, &str) = ("in28minutes", "dummy");
pub const ADMIN: (&str, &str) = ("admin", "dummy");

/// Default settings with a cheap hasher so tests stay fast.
#[must_use]
pub fn test_settings() -> Settings {
    let mut settings = Settings::from_toml("").expect("default settings should load");
    settings.hasher = HasherConfig {
        memory_kib: 256,
        iterations: 1,
        parallelism: 1,
    };
    settings
}

/// ## Summary
/// Creates a fresh service with the stock users and policy.
///
/// Each call gets its own in-memory store, so tests that create users do
/// not interfere with each other.
///
/// ## Panics
/// Panics if the security components cannot be built.
pub async fn create_test_service() -> Service {
    create_test_service_with(&test_settings()).await
}

/// Creates a service from the given settings, for tests that need a
/// non-stock policy or user set.
///
/// ## Panics
/// Panics if the security components cannot be built.
pub async fn create_test_service_with(settings: &Settings) -> Service {
    let security = build_security(settings)
        .await
        .expect("security components should build");
    Service::new(routes(&security))
}

/// Test request builder for constructing HTTP requests.
pub struct TestRequest {
    method: Method,
    path: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl TestRequest {
    #[must_use]
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn options(path: &str) -> Self {
        Self::new(Method::OPTIONS, path)
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Adds an `Authorization: Basic` header for the given account.
    #[must_use]
    pub fn basic_auth(self, (username, password): (&str, &str)) -> Self {
        let encoded = STANDARD.encode(format!("{username}:{password}"));
        self.header("Authorization", &format!("Basic {encoded}"))
    }

    #[must_use]
    pub fn json_body(mut self, value: &serde_json::Value) -> Self {
        self.body = Some(value.to_string().into_bytes());
        self.header("Content-Type", "application/json")
    }

    /// ## Panics
    /// Panics if the response cannot be read.
    pub async fn send(self, service: &Service) -> TestResponse {
        let url = format!("http://127.0.0.1:5800{}", self.path);

        let mut client = match self.method.as_str() {
            "GET" => TestClient::get(&url),
            "POST" => TestClient::post(&url),
            "OPTIONS" => TestClient::options(&url),
            _ => RequestBuilder::new(&url, self.method.clone()),
        };

        for (name, value) in self.headers {
            if let Ok(header_name) = HeaderName::try_from(name.as_str()) {
                client = client.add_header(header_name, value, true);
            }
        }

        if let Some(body_bytes) = self.body {
            client = client.body(ReqBody::Once(body_bytes.into()));
        }

        let mut response = client.send(service).await;

        let status = response
            .status_code
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
            .collect();

        let body: Vec<u8> = response.take_bytes(None).await.unwrap_or_default().to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Represents an HTTP test response for assertions.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl TestResponse {
    #[must_use]
    pub fn assert_status(self, expected: StatusCode) -> Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {expected} but got {}: {}",
            self.status,
            self.body_string()
        );
        self
    }

    /// Asserts the response is a 401 carrying a Basic challenge.
    #[must_use]
    pub fn assert_challenge(self) -> Self {
        self.assert_status(StatusCode::UNAUTHORIZED)
            .assert_header_contains("www-authenticate", "Basic realm=")
    }

    #[must_use]
    pub fn assert_header_contains(self, name: &str, expected: &str) -> Self {
        let value = self
            .get_header(name)
            .unwrap_or_else(|| panic!("Header '{name}' not found in response"));
        assert!(
            value.contains(expected),
            "Header '{name}' expected to contain '{expected}' but got '{value}'"
        );
        self
    }

    #[must_use]
    pub fn assert_header_absent(self, name: &str) -> Self {
        assert!(
            self.get_header(name).is_none(),
            "Header '{name}' should not be present"
        );
        self
    }

    #[must_use]
    pub fn assert_body_contains(self, expected: &str) -> Self {
        let body = self.body_string();
        assert!(
            body.contains(expected),
            "Expected body to contain '{expected}' but got:\n{body}"
        );
        self
    }

    #[must_use]
    pub fn body_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// ## Panics
    /// Panics if the body is not JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body should be JSON")
    }

    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
