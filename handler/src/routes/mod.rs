//! HTTP entry points.
//!
//! - `POST /` → runs one event; the command comes from the `command` header.
//! - `GET /health` → runs the healthcheck command.
//!
//! Every route shares one [`Handler`] as router state.

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};

use crate::Handler;

pub mod event;
pub mod health;
pub mod middleware;

/// Builds the complete application router around `handler`.
pub fn routes(handler: Handler) -> Router {
    Router::new()
        .route("/", post(event::handle_event))
        .route("/health", get(health::health_check))
        .layer(from_fn(middleware::log_request))
        .with_state(handler)
}
