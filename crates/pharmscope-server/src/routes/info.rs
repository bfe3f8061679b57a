//! Root info and status-check routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use crate::state::AppState;
use pharmscope_core::StatusCheck;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/status", post(create_status_check).get(list_status_checks))
}

/// GET /api/ — service info.
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "PharmScope market research API",
    }))
}

#[derive(Debug, Deserialize)]
struct StatusCheckCreate {
    client_name: String,
}

/// POST /api/status — record a status check.
async fn create_status_check(
    State(state): State<Arc<AppState>>,
    Json(input): Json<StatusCheckCreate>,
) -> impl IntoResponse {
    let check = StatusCheck::new(input.client_name);
    match state.store.insert_status_check(&check) {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::to_value(&check).unwrap()),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

/// GET /api/status — list recorded status checks.
async fn list_status_checks(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.list_status_checks(1000) {
        Ok(checks) => (
            StatusCode::OK,
            Json(serde_json::to_value(&checks).unwrap()),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}
