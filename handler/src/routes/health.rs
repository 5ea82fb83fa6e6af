use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::Handler;

/// GET /health
///
/// Runs the `healthcheck` command, for uptime checks and load balancers.
///
/// ### Response
/// - `200 OK` when every check passed.
/// - `503 Service Unavailable` otherwise.
///
/// The body is the healthcheck response either way.
pub async fn health_check(State(handler): State<Handler>) -> impl IntoResponse {
    let event = json!({"headers": {"command": "healthcheck"}});
    let response = match tokio::task::spawn_blocking(move || handler.handle(&event)).await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(error = %err, "Healthcheck task did not complete");
            return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"tests_passed": false})));
        }
    };

    let passed = response
        .result
        .as_ref()
        .and_then(|result| result.get("tests_passed"))
        .and_then(|passed| passed.as_bool())
        .unwrap_or(false);

    let status = if passed {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(serde_json::to_value(response).unwrap_or_default()))
}
