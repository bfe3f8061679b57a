//! Therapy-area analysis routes: the full generation pipeline plus listing
//! and detail lookup.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::error;

use crate::state::AppState;
use pharmscope_core::{Result, TherapyAreaAnalysis};

const STORED_TRIALS: usize = 10;
const LIST_LIMIT: usize = 50;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/analyze-therapy", post(analyze_therapy))
        .route("/analyses", get(list_analyses))
        .route("/analysis/{analysis_id}", get(analysis_details))
}

#[derive(Debug, Deserialize)]
struct TherapyAreaRequest {
    therapy_area: String,
    product_name: Option<String>,
    api_key: String,
}

/// POST /api/analyze-therapy — generate and persist a full analysis.
async fn analyze_therapy(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TherapyAreaRequest>,
) -> impl IntoResponse {
    match run_analysis(&state, &req).await {
        Ok(analysis) => (
            StatusCode::OK,
            Json(serde_json::to_value(&analysis).unwrap()),
        ),
        Err(e) => {
            error!("Error in therapy analysis: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": format!("Analysis failed: {}", e) })),
            )
        }
    }
}

/// Sequential generation chain: sections first (fatal on failure), then the
/// best-effort intelligence passes.
async fn run_analysis(state: &AppState, req: &TherapyAreaRequest) -> Result<TherapyAreaAnalysis> {
    let model = state.model.as_ref();

    let sections = pharmscope_intel::therapy_sections(
        model,
        &req.api_key,
        &req.therapy_area,
        req.product_name.as_deref(),
    )
    .await?;

    let trials = state.trials.search(&req.therapy_area).await;
    let landscape =
        pharmscope_intel::competitive_landscape(model, &req.api_key, &req.therapy_area).await;
    let regulatory =
        pharmscope_intel::regulatory_intelligence(model, &req.api_key, &req.therapy_area).await;

    let mut analysis = TherapyAreaAnalysis::new(&req.therapy_area, req.product_name.clone());
    analysis.disease_summary = sections.disease_summary;
    analysis.staging = sections.staging;
    analysis.biomarkers = sections.biomarkers;
    analysis.treatment_algorithm = sections.treatment_algorithm;
    analysis.patient_journey = sections.patient_journey;
    analysis.clinical_trials_data = Some(trials.into_iter().take(STORED_TRIALS).collect());
    analysis.competitive_landscape = Some(landscape);
    analysis.regulatory_intelligence = regulatory;
    analysis.risk_assessment =
        pharmscope_intel::risk_assessment(model, &req.api_key, &req.therapy_area).await;

    state.store.insert_analysis(&analysis)?;

    Ok(analysis)
}

/// GET /api/analyses — most recent 50 analyses.
async fn list_analyses(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.list_analyses(LIST_LIMIT) {
        Ok(analyses) => (
            StatusCode::OK,
            Json(serde_json::to_value(&analyses).unwrap()),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}

/// GET /api/analysis/{analysis_id} — one analysis plus its funnel.
async fn analysis_details(
    State(state): State<Arc<AppState>>,
    Path(analysis_id): Path<String>,
) -> Response {
    let analysis = match state.store.get_analysis(&analysis_id) {
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

    let funnel = state
        .store
        .funnel_for_analysis(&analysis_id)
        .unwrap_or_default();

    Json(serde_json::json!({
        "analysis": analysis,
        "funnel": funnel,
    }))
    .into_response()
}
