//! Common test utilities and harness for acado-api integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use acado_api::{create_router, AppState};
use acado_auth::{AuthConfig, Role, TokenGrant};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

/// Bearer token for a super administrator.
pub const SUPERADMIN_TOKEN: &str = "superadmin-token";
/// Bearer token for an administrator.
pub const ADMIN_TOKEN: &str = "admin-token";
/// Bearer token for an instructor.
pub const INSTRUCTOR_TOKEN: &str = "instructor-token";
/// Bearer token for a learner.
pub const LEARNER_TOKEN: &str = "learner-token";

/// Test harness wrapping an in-memory router.
pub struct TestHarness {
    router: Router,
}

impl TestHarness {
    /// Router with auth enabled and one token per role.
    pub fn new() -> Self {
        let auth = AuthConfig {
            enabled: true,
            domain: "acado.edu".to_string(),
            tokens: vec![
                grant(SUPERADMIN_TOKEN, "root@acado.edu", Role::SuperAdmin),
                grant(ADMIN_TOKEN, "admin@acado.edu", Role::Admin),
                grant(INSTRUCTOR_TOKEN, "lecturer@acado.edu", Role::Instructor),
                grant(LEARNER_TOKEN, "student@acado.edu", Role::Learner),
                grant("outsider-token", "someone@elsewhere.org", Role::Admin),
            ],
        };
        Self::with_auth(auth)
    }

    /// Router with auth switched off.
    pub fn without_auth() -> Self {
        Self::with_auth(AuthConfig::default())
    }

    fn with_auth(auth: AuthConfig) -> Self {
        let state = AppState::in_memory(auth.enabled);
        Self {
            router: create_router(state, &auth),
        }
    }

    /// Send a request and return status and parsed JSON body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send_request(request).await
    }

    /// Send a prebuilt request.
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// `GET` without credentials.
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    /// `GET` with a token.
    pub async fn get_as(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, Some(token), None).await
    }

    /// `POST` a JSON body.
    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    /// `PUT` a JSON body.
    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    /// `DELETE` a resource.
    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Create a document as admin and return its id.
    pub async fn create(&self, collection: &str, body: Value) -> String {
        let (status, created) = self
            .post(&format!("/api/{collection}"), Some(ADMIN_TOKEN), body)
            .await;
        assert_eq!(status, StatusCode::CREATED, "{created}");
        created["id"].as_str().unwrap().to_string()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn grant(token: &str, email: &str, role: Role) -> TokenGrant {
    TokenGrant {
        token: token.to_string(),
        email: email.to_string(),
        role,
    }
}

/// The `error.category` of an error body.
pub fn error_category(body: &Value) -> &str {
    body["error"]["category"].as_str().unwrap_or_default()
}

/// The `error.message` of an error body.
pub fn error_message(body: &Value) -> &str {
    body["error"]["message"].as_str().unwrap_or_default()
}
