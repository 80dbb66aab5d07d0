pub mod auth;
pub mod middleware;
pub mod todos;

use crate::error::ApiError;
use crate::state::AppState;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing::get, routing::post};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

/// Wrap a payload in the uniform success envelope.
pub(crate) fn envelope(status: StatusCode, message: &str, data: Option<Value>) -> Response {
    let mut body = json!({
        "success": true,
        "message": message,
    });
    if let Some(data) = data {
        body["data"] = data;
    }
    (status, Json(body)).into_response()
}

pub(crate) fn ok(message: &str, data: Value) -> Response {
    envelope(StatusCode::OK, message, Some(data))
}

pub(crate) fn created(message: &str, data: Value) -> Response {
    envelope(StatusCode::CREATED, message, Some(data))
}

pub(crate) fn default_limit() -> i64 {
    50
}

/// Parse a path id, rejecting non-UUID values before any storage call.
pub(crate) fn parse_todo_id(id: &str) -> Result<Uuid, ApiError> {
    id.parse()
        .map_err(|_| ApiError::Validation(vec!["id must be a valid UUID".to_string()]))
}

/// GET /api/health -- public liveness probe
async fn health() -> impl IntoResponse {
    envelope(StatusCode::OK, "gjort is running", None)
}

pub fn build_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        // Auth routes
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/verify", get(auth::verify))
        // Todo routes -- every handler takes a CurrentUser, so none of
        // them is reachable unauthenticated
        .route("/todos", get(todos::list_todos).post(todos::create_todo))
        .route(
            "/todos/{id}",
            get(todos::get_todo)
                .put(todos::update_todo)
                .delete(todos::delete_todo),
        )
        .with_state(state)
}
