//! Clinical-trials registry search route.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/search/clinical-trials", get(search_trials))
}

#[derive(Debug, Deserialize)]
struct TrialsQuery {
    therapy_area: String,
}

/// GET /api/search/clinical-trials?therapy_area= — registry keyword search.
async fn search_trials(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrialsQuery>,
) -> Json<serde_json::Value> {
    let trials = state.trials.search(&query.therapy_area).await;
    let count = trials.len();
    Json(serde_json::json!({
        "trials": trials,
        "count": count,
    }))
}
