//! Regeneration routes: competitive intelligence and scenario modeling.
//!
//! Both re-run their model pass against an existing analysis and update the
//! stored record in place (last write wins).

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;

use crate::state::AppState;
use pharmscope_core::TherapyAreaAnalysis;

const STORED_TRIALS: usize = 15;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/competitive-analysis", post(competitive_analysis))
        .route("/scenario-modeling", post(scenario_modeling))
}

#[derive(Debug, Deserialize)]
struct CompetitiveAnalysisRequest {
    therapy_area: String,
    analysis_id: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ScenarioModelingRequest {
    therapy_area: String,
    analysis_id: String,
    #[serde(default = "default_scenarios")]
    scenarios: Vec<String>,
    api_key: String,
}

fn default_scenarios() -> Vec<String> {
    vec![
        "optimistic".to_string(),
        "realistic".to_string(),
        "pessimistic".to_string(),
    ]
}

fn lookup_analysis(state: &AppState, analysis_id: &str) -> Result<TherapyAreaAnalysis, Response> {
    match state.store.get_analysis(analysis_id) {
        Ok(Some(analysis)) => Ok(analysis),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "Analysis not found" })),
        )
            .into_response()),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response()),
    }
}

/// POST /api/competitive-analysis — regenerate competitive intelligence and
/// refresh the stored trial list.
async fn competitive_analysis(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CompetitiveAnalysisRequest>,
) -> Response {
    let mut analysis = match lookup_analysis(&state, &req.analysis_id) {
        Ok(analysis) => analysis,
        Err(response) => return response,
    };

    let landscape = pharmscope_intel::competitive_landscape(
        state.model.as_ref(),
        &req.api_key,
        &req.therapy_area,
    )
    .await;
    let trials = state.trials.search(&req.therapy_area).await;
    let trials_count = trials.len();

    analysis.competitive_landscape = Some(landscape);
    analysis.clinical_trials_data = Some(trials.into_iter().take(STORED_TRIALS).collect());
    analysis.touch();

    if let Err(e) = state.store.replace_analysis(&analysis) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": format!("Competitive analysis failed: {}", e) })),
        )
            .into_response();
    }

    Json(serde_json::json!({
        "status": "success",
        "competitive_landscape": analysis.competitive_landscape,
        "clinical_trials_count": trials_count,
        "updated_at": analysis.updated_at,
    }))
    .into_response()
}

/// POST /api/scenario-modeling — regenerate the scenario forecast set.
async fn scenario_modeling(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScenarioModelingRequest>,
) -> Response {
    let mut analysis = match lookup_analysis(&state, &req.analysis_id) {
        Ok(analysis) => analysis,
        Err(response) => return response,
    };

    let models = pharmscope_intel::scenario_models(
        state.model.as_ref(),
        &req.api_key,
        &req.therapy_area,
        &req.scenarios,
    )
    .await;

    analysis.scenario_models = models;
    analysis.touch();

    if let Err(e) = state.store.replace_analysis(&analysis) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": format!("Scenario modeling failed: {}", e) })),
        )
            .into_response();
    }

    let visualization = analysis
        .scenario_models
        .as_ref()
        .and_then(|models| pharmscope_charts::scenario_chart(models));

    Json(serde_json::json!({
        "status": "success",
        "scenario_models": analysis.scenario_models,
        "visualization": visualization,
        "updated_at": analysis.updated_at,
    }))
    .into_response()
}
