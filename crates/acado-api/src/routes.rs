//! Router assembly.

use std::sync::Arc;

use acado_auth::{AuthConfig, AuthLayer, StaticTokenValidator};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::modules::{course_level, course_type, location, wall_post};
use crate::state::AppState;

/// Service name reported by `/health`.
pub const SERVICE_NAME: &str = "acado-api";

/// `GET /health` response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process serves requests.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Crate version.
    pub version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the full application router.
pub fn create_router(state: AppState, auth: &AuthConfig) -> Router {
    let validator = Arc::new(StaticTokenValidator::new(&auth.tokens));

    let api = Router::new()
        .nest("/course-levels", course_level::routes())
        .nest("/course-types", course_type::routes())
        .nest("/locations", location::routes())
        .nest("/wall-posts", wall_post::routes());

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(AuthLayer::new(validator, auth.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
