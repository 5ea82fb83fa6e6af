use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde_json::{Map, Value};

use crate::Handler;
use crate::response::{ErrorResponse, Response};

/// POST /
///
/// Wraps the request in an event and hands it to the [`Handler`]. The raw
/// body becomes `event.body` (an empty body counts as missing) and the
/// `command` header becomes `event.headers.command`.
///
/// ### Response
/// - `200 OK` with the handler response, including error responses.
/// - `500 Internal Server Error` when the evaluation task itself dies.
pub async fn handle_event(
    State(handler): State<Handler>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let event = to_event(&headers, body);

    match tokio::task::spawn_blocking(move || handler.handle(&event)).await {
        Ok(response) => (StatusCode::OK, Json(response)),
        Err(err) => {
            tracing::error!(error = %err, "Evaluation task did not complete");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Response::error(ErrorResponse::new(
                    "The evaluation task did not complete.",
                ))),
            )
        }
    }
}

fn to_event(headers: &HeaderMap, body: String) -> Value {
    let mut event_headers = Map::new();
    if let Some(command) = headers.get("command").and_then(|value| value.to_str().ok()) {
        event_headers.insert("command".into(), Value::from(command));
    }

    let body = if body.trim().is_empty() {
        Value::Null
    } else {
        Value::String(body)
    };

    let mut event = Map::new();
    event.insert("headers".into(), Value::Object(event_headers));
    event.insert("body".into(), body);
    Value::Object(event)
}
