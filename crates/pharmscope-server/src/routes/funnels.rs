//! Patient-flow funnel routes.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::error;

use crate::state::AppState;
use pharmscope_core::{PatientFlowFunnel, Result, TherapyAreaAnalysis};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate-funnel", post(generate_funnel))
        .route("/funnels/{analysis_id}", get(funnel_by_analysis))
}

#[derive(Debug, Deserialize)]
struct PatientFlowFunnelRequest {
    therapy_area: String,
    analysis_id: String,
    api_key: String,
}

fn default_scenarios() -> Vec<String> {
    vec![
        "optimistic".to_string(),
        "realistic".to_string(),
        "pessimistic".to_string(),
    ]
}

/// POST /api/generate-funnel — generate a funnel for an existing analysis.
async fn generate_funnel(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PatientFlowFunnelRequest>,
) -> Response {
    let analysis = match state.store.get_analysis(&req.analysis_id) {
        Ok(Some(analysis)) => analysis,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({ "error": "Analysis not found" })),
            )
                .into_response();
        }
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response();
        }
    };

    match build_funnel(&state, &req, &analysis).await {
        Ok(funnel) => (
            StatusCode::OK,
            Json(serde_json::to_value(&funnel).unwrap()),
        )
            .into_response(),
        Err(e) => {
            error!("Error in funnel generation: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": format!("Funnel generation failed: {}", e) })),
            )
                .into_response()
        }
    }
}

async fn build_funnel(
    state: &AppState,
    req: &PatientFlowFunnelRequest,
    analysis: &TherapyAreaAnalysis,
) -> Result<PatientFlowFunnel> {
    let model = state.model.as_ref();

    let payload =
        pharmscope_intel::funnel_payload(model, &req.api_key, &req.therapy_area, analysis).await?;

    let scenario_models = pharmscope_intel::scenario_models(
        model,
        &req.api_key,
        &req.therapy_area,
        &default_scenarios(),
    )
    .await;

    let mut visualization = serde_json::json!({
        "funnel_chart": pharmscope_charts::funnel_chart(&payload.funnel_stages),
        "scenario_chart": scenario_models
            .as_ref()
            .and_then(|models| pharmscope_charts::scenario_chart(models)),
    });
    if let Some(landscape) = &analysis.competitive_landscape {
        if let Some(chart) = pharmscope_charts::market_chart(landscape) {
            visualization["market_chart"] = serde_json::to_value(chart)?;
        }
    }

    let mut funnel = PatientFlowFunnel::new(&req.therapy_area, &req.analysis_id);
    funnel.funnel_stages = payload.funnel_stages;
    funnel.total_addressable_population = payload.total_addressable_population;
    funnel.forecasting_notes = payload.forecasting_notes;
    funnel.scenario_models = scenario_models;
    funnel.visualization_data = Some(visualization);

    state.store.insert_funnel(&funnel)?;

    Ok(funnel)
}

/// GET /api/funnels/{analysis_id} — funnel for an analysis, or JSON null.
async fn funnel_by_analysis(
    State(state): State<Arc<AppState>>,
    Path(analysis_id): Path<String>,
) -> Response {
    match state.store.funnel_for_analysis(&analysis_id) {
        Ok(Some(funnel)) => Json(serde_json::to_value(&funnel).unwrap()).into_response(),
        Ok(None) => Json(serde_json::Value::Null).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}
