//! Export routes: stored analysis to base64 PDF or Excel payload.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use tracing::error;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/export", post(export_analysis))
}

#[derive(Debug, Deserialize)]
struct ExportRequest {
    analysis_id: String,
    /// `"pdf"` or `"excel"`.
    export_type: String,
}

/// POST /api/export — render a stored analysis to an encoded byte payload.
async fn export_analysis(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExportRequest>,
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

    let funnel = state
        .store
        .funnel_for_analysis(&req.analysis_id)
        .unwrap_or_default();

    let rendered = match req.export_type.as_str() {
        "pdf" => pharmscope_export::render_pdf(&analysis)
            .map(|bytes| (bytes, pharmscope_export::pdf_filename(&analysis.therapy_area))),
        "excel" => pharmscope_export::render_excel(&analysis, funnel.as_ref())
            .map(|bytes| (bytes, pharmscope_export::excel_filename(&analysis.therapy_area))),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "Invalid export type or generation failed" })),
            )
                .into_response();
        }
    };

    match rendered {
        Ok((bytes, filename)) => Json(serde_json::json!({
            "status": "success",
            "export_type": req.export_type,
            "data": BASE64.encode(&bytes),
            "filename": filename,
        }))
        .into_response(),
        Err(e) => {
            error!("Export error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": format!("Export failed: {}", e) })),
            )
                .into_response()
        }
    }
}
