//! The single JSON error shape shared by auth and API failures.

use axum::response::{IntoResponse, Response};
use http::StatusCode;

/// Build `{"error": {"category": ..., "message": ...}}` with the given status.
pub fn json_error(status: StatusCode, category: &str, message: &str) -> Response {
    let body = serde_json::json!({
        "error": {
            "category": category,
            "message": message,
        }
    });

    (
        status,
        [(http::header::CONTENT_TYPE, "application/json")],
        serde_json::to_string(&body).unwrap_or_default(),
    )
        .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_status_and_content_type() {
        let resp = json_error(StatusCode::FORBIDDEN, "authorization", "nope");
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            resp.headers().get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }
}
