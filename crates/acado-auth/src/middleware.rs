//! Tower authentication middleware.
//!
//! `AuthLayer` and `AuthService` wrap any inner service with bearer token
//! validation. Generic over `TokenValidator`, so any identity provider can
//! be plugged in.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::response::IntoResponse;
use http::Request;
use tower::{Layer, Service};

use crate::response::json_error;
use crate::{AuthConfig, AuthError, TokenValidator};

/// Tower `Layer` that wraps services with token authentication.
pub struct AuthLayer<V: TokenValidator> {
    validator: Arc<V>,
    config: AuthConfig,
}

impl<V: TokenValidator> Clone for AuthLayer<V> {
    fn clone(&self) -> Self {
        Self {
            validator: self.validator.clone(),
            config: self.config.clone(),
        }
    }
}

impl<V: TokenValidator> AuthLayer<V> {
    /// Create a new auth layer with the given validator and config.
    pub fn new(validator: Arc<V>, config: AuthConfig) -> Self {
        Self { validator, config }
    }
}

impl<V: TokenValidator, S> Layer<S> for AuthLayer<V> {
    type Service = AuthService<V, S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            validator: self.validator.clone(),
            config: self.config.clone(),
        }
    }
}

/// Tower `Service` that validates tokens before forwarding requests.
///
/// On success, inserts `AuthenticatedUser` into the request extensions.
/// Requests without an `Authorization` header are forwarded anonymously;
/// whether anonymous access is acceptable is decided per route by
/// [`RoleGate`](crate::RoleGate). A header that is present but invalid is
/// rejected here with 401.
pub struct AuthService<V: TokenValidator, S> {
    inner: S,
    validator: Arc<V>,
    config: AuthConfig,
}

impl<V: TokenValidator, S: Clone> Clone for AuthService<V, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            validator: self.validator.clone(),
            config: self.config.clone(),
        }
    }
}

impl<V, S> Service<Request<Body>> for AuthService<V, S>
where
    V: TokenValidator,
    S: Service<Request<Body>, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send,
{
    type Response = axum::response::Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        let validator = self.validator.clone();
        let config = self.config.clone();

        Box::pin(async move {
            // Auth disabled: everything passes through
            if !config.enabled {
                let resp = inner
                    .call(req)
                    .await
                    .unwrap_or_else(|infallible| match infallible {});
                return Ok(resp.into_response());
            }

            let token = match extract_bearer_token(&req) {
                Ok(Some(t)) => Some(t.to_string()),
                Ok(None) => None,
                Err(auth_err) => return Ok(auth_error_response(&auth_err)),
            };

            if let Some(token) = token {
                match validator.validate(&token, &config).await {
                    Ok(user) => {
                        log::debug!("Authenticated {} as {}", user.email, user.role);
                        req.extensions_mut().insert(user);
                    }
                    Err(auth_err) => {
                        log::warn!("Authentication failed: {auth_err}");
                        return Ok(auth_error_response(&auth_err));
                    }
                }
            }

            let resp = inner
                .call(req)
                .await
                .unwrap_or_else(|infallible| match infallible {});
            Ok(resp.into_response())
        })
    }
}

/// Extract the bearer token from the Authorization header.
///
/// `Ok(None)` when the header is absent; an error when it is present but
/// not a bearer token.
fn extract_bearer_token(req: &Request<Body>) -> Result<Option<&str>, AuthError> {
    let Some(value) = req.headers().get(http::header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("non-ASCII authorization header".to_string()))?;
    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim())),
        _ => Err(AuthError::InvalidFormat("expected a bearer token".to_string())),
    }
}

/// Build the JSON error response for an auth failure.
///
/// 401 responses also carry a `WWW-Authenticate` challenge.
pub fn auth_error_response(err: &AuthError) -> axum::response::Response {
    let mut response = json_error(err.status_code(), err.category(), &err.to_string());
    if err.is_authentication_error() {
        response.headers_mut().insert(
            http::header::WWW_AUTHENTICATE,
            http::HeaderValue::from_static("Bearer"),
        );
    }
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{Role, StaticTokenValidator, TokenGrant};
    use axum::body::to_bytes;
    use http::StatusCode;
    use tower::{service_fn, ServiceExt};

    fn layer(enabled: bool) -> AuthLayer<StaticTokenValidator> {
        let grants = [TokenGrant {
            token: "valid-token".to_string(),
            email: "alice@acado.edu".to_string(),
            role: Role::Admin,
        }];
        let config = AuthConfig {
            enabled,
            ..Default::default()
        };
        AuthLayer::new(Arc::new(StaticTokenValidator::new(&grants)), config)
    }

    async fn call(enabled: bool, authorization: Option<&str>) -> (StatusCode, String) {
        let mut builder = Request::builder();
        if let Some(value) = authorization {
            builder = builder.header(http::header::AUTHORIZATION, value);
        }
        // Answers with the caller's email, or "anonymous".
        let whoami = service_fn(|req: Request<Body>| async move {
            let email = req
                .extensions()
                .get::<crate::AuthenticatedUser>()
                .map(|user| user.email.clone())
                .unwrap_or_else(|| "anonymous".to_string());
            Ok::<_, Infallible>(email.into_response())
        });
        let resp = layer(enabled)
            .layer(whoami)
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn request(authorization: &str) -> Request<Body> {
        Request::builder()
            .header(http::header::AUTHORIZATION, authorization)
            .body(Body::empty())
            .unwrap()
    }

    // ------------------------------------------------------------------------
    // extract_bearer_token
    // ------------------------------------------------------------------------

    #[test]
    fn test_bearer_token_extracted_and_trimmed() {
        let req = request("Bearer  abc-123 ");
        assert_eq!(extract_bearer_token(&req).unwrap(), Some("abc-123"));
    }

    #[test]
    fn test_absent_header_is_none() {
        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(extract_bearer_token(&req).unwrap(), None);
    }

    #[test]
    fn test_other_schemes_rejected() {
        for value in ["Basic dXNlcjpwYXNz", "Bearer ", "bearer abc"] {
            assert!(
                matches!(extract_bearer_token(&request(value)), Err(AuthError::InvalidFormat(_))),
                "{value}"
            );
        }
    }

    #[test]
    fn test_error_response_challenge_only_on_401() {
        let resp = auth_error_response(&AuthError::UnknownToken);
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers()[http::header::WWW_AUTHENTICATE], "Bearer");

        let resp = auth_error_response(&AuthError::Forbidden {
            role: "learner".into(),
            allowed: "admin".into(),
        });
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(!resp.headers().contains_key(http::header::WWW_AUTHENTICATE));
    }

    // ------------------------------------------------------------------------
    // AuthService
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_disabled_ignores_credentials() {
        let (status, who) = call(false, Some("Bearer forged")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(who, "anonymous");
    }

    #[tokio::test]
    async fn test_no_header_forwarded_anonymously() {
        let (status, who) = call(true, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(who, "anonymous");
    }

    #[tokio::test]
    async fn test_unknown_token_rejected() {
        let (status, body) = call(true, Some("Bearer forged")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("\"authentication\""));
    }

    #[tokio::test]
    async fn test_malformed_header_rejected() {
        let (status, _) = call(true, Some("Token abc")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_attaches_user() {
        let (status, who) = call(true, Some("Bearer valid-token")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(who, "alice@acado.edu");
    }
}
