//! End-to-end handler tests: drive the router with a scripted model client
//! and a throwaway store, and verify response shapes and persistence.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use pharmscope_core::{PharmScopeConfig, Result, TherapyAreaAnalysis};
use pharmscope_llm::{CompletionRequest, ModelClient};
use pharmscope_server::routes::build_router;
use pharmscope_server::state::AppState;
use pharmscope_store::DocumentStore;
use pharmscope_trials::TrialsClient;

/// Model double that replays a fixed script of responses in order.
struct ScriptedModel {
    responses: Mutex<VecDeque<String>>,
}

impl ScriptedModel {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
        }
    }
}

#[async_trait::async_trait]
impl ModelClient for ScriptedModel {
    async fn complete(&self, _request: CompletionRequest) -> Result<String> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| pharmscope_core::Error::Model("script exhausted".into()))
    }
}

fn test_app(responses: &[&str]) -> (tempfile::TempDir, Arc<AppState>, Router) {
    let dir = tempfile::tempdir().unwrap();
    let config = PharmScopeConfig::from_env(dir.path()).unwrap();
    let store = DocumentStore::open(&config.data_paths.db).unwrap();
    // Unroutable registry host: trial lookups degrade to empty lists.
    let trials = TrialsClient::with_base_url("http://127.0.0.1:1");
    let state = Arc::new(AppState::new(
        config,
        store,
        Arc::new(ScriptedModel::new(responses)),
        trials,
    ));
    let router = build_router(state.clone());
    (dir, state, router)
}

async fn request(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

const SECTIONS_RESPONSE: &str = "## DISEASE SUMMARY\nSummary text.\n\
                                 ## STAGING\nStages I-IV.\n\
                                 ## BIOMARKERS\nMarker list.\n\
                                 ## TREATMENT ALGORITHM\nAlgorithm text.\n\
                                 ## PATIENT JOURNEY\nJourney text.";

const COMPETITIVE_RESPONSE: &str = "MAJOR COMPETITORS\n1. Acme Corp: 30% share leader\n";

#[tokio::test]
async fn root_returns_info_message() {
    let (_dir, _state, router) = test_app(&[]);
    let (status, body) = request(&router, "GET", "/api", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("PharmScope"));
}

#[tokio::test]
async fn status_check_round_trip() {
    let (_dir, _state, router) = test_app(&[]);

    let (status, created) = request(
        &router,
        "POST",
        "/api/status",
        Some(serde_json::json!({ "client_name": "tester" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["client_name"], "tester");
    assert!(created["id"].as_str().is_some());

    let (status, listed) = request(&router, "GET", "/api/status", None).await;
    assert_eq!(status, StatusCode::OK);
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], created["id"]);
}

#[tokio::test]
async fn generate_funnel_for_missing_analysis_is_not_found() {
    let (_dir, state, router) = test_app(&[SECTIONS_RESPONSE]);

    let (status, body) = request(
        &router,
        "POST",
        "/api/generate-funnel",
        Some(serde_json::json!({
            "therapy_area": "testitis",
            "analysis_id": "does-not-exist",
            "api_key": "k",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Analysis not found");
    // Nothing was written.
    assert!(state
        .store
        .funnel_for_analysis("does-not-exist")
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn analyze_therapy_runs_the_full_pipeline() {
    let regulatory = r#"{"pathways": "FDA standard review", "trends": "accelerated"}"#;
    let risk = r#"{"overall_score": 7, "clinical_risk": {"level": "High", "factors": ["novel endpoint"]}}"#;
    let (_dir, _state, router) = test_app(&[
        SECTIONS_RESPONSE,
        COMPETITIVE_RESPONSE,
        regulatory,
        risk,
    ]);

    let (status, analysis) = request(
        &router,
        "POST",
        "/api/analyze-therapy",
        Some(serde_json::json!({
            "therapy_area": "testitis",
            "product_name": "drugX",
            "api_key": "k",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(analysis["therapy_area"], "testitis");
    assert_eq!(analysis["disease_summary"], "Summary text.");
    assert_eq!(analysis["patient_journey"], "Journey text.");

    let competitor = &analysis["competitive_landscape"]["competitors"][0];
    assert_eq!(competitor["name"], "Acme Corp");
    assert_eq!(competitor["market_share"], 30);

    assert_eq!(analysis["regulatory_intelligence"]["pathways"], "FDA standard review");
    assert_eq!(analysis["risk_assessment"]["overall_score"], 7.0);
    assert_eq!(analysis["risk_assessment"]["clinical_risk"]["level"], "High");

    // Registry was unreachable: stored trial list is empty, not absent.
    assert_eq!(analysis["clinical_trials_data"].as_array().unwrap().len(), 0);

    // Listed and fetchable afterwards.
    let (status, listed) = request(&router, "GET", "/api/analyses", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let id = analysis["id"].as_str().unwrap();
    let (status, details) = request(&router, "GET", &format!("/api/analysis/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["analysis"]["id"], analysis["id"]);
    assert!(details["funnel"].is_null());
}

#[tokio::test]
async fn generate_funnel_persists_stages_and_charts() {
    let funnel_json = r#"Here is the funnel: {
        "funnel_stages": [
            {"stage": "Total Population at Risk", "description": "All", "percentage": "100%", "notes": ""},
            {"stage": "Diagnosed", "description": "Confirmed", "percentage": "40%", "notes": ""}
        ],
        "total_addressable_population": "About 2M patients",
        "forecasting_notes": "Steady growth"
    }"#;
    // Second response is not JSON: scenario models use the deterministic fallback.
    let (_dir, state, router) = test_app(&[funnel_json, "no structured scenarios"]);

    let analysis = TherapyAreaAnalysis::new("testitis", None);
    state.store.insert_analysis(&analysis).unwrap();

    let (status, funnel) = request(
        &router,
        "POST",
        "/api/generate-funnel",
        Some(serde_json::json!({
            "therapy_area": "testitis",
            "analysis_id": analysis.id,
            "api_key": "k",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(funnel["analysis_id"], analysis.id.as_str());
    assert_eq!(funnel["funnel_stages"].as_array().unwrap().len(), 2);
    assert_eq!(funnel["total_addressable_population"], "About 2M patients");

    // Fallback scenarios scale the base curve by the name-keyed multipliers.
    assert_eq!(
        funnel["scenario_models"]["realistic"]["projections"][0],
        100.0
    );
    assert_eq!(
        funnel["scenario_models"]["pessimistic"]["projections"][0],
        60.0
    );

    assert_eq!(
        funnel["visualization_data"]["funnel_chart"]["chart_type"],
        "funnel"
    );
    assert_eq!(
        funnel["visualization_data"]["scenario_chart"]["chart_type"],
        "line"
    );

    // Fetchable by analysis id.
    let (status, fetched) = request(
        &router,
        "GET",
        &format!("/api/funnels/{}", analysis.id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], funnel["id"]);
}

#[tokio::test]
async fn funnel_lookup_without_record_returns_null() {
    let (_dir, _state, router) = test_app(&[]);
    let (status, body) = request(&router, "GET", "/api/funnels/nothing-here", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_null());
}

#[tokio::test]
async fn competitive_analysis_updates_stored_record() {
    let (_dir, state, router) = test_app(&[COMPETITIVE_RESPONSE]);

    let analysis = TherapyAreaAnalysis::new("testitis", None);
    state.store.insert_analysis(&analysis).unwrap();

    let (status, body) = request(
        &router,
        "POST",
        "/api/competitive-analysis",
        Some(serde_json::json!({
            "therapy_area": "testitis",
            "analysis_id": analysis.id,
            "api_key": "k",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(
        body["competitive_landscape"]["competitors"][0]["name"],
        "Acme Corp"
    );
    assert_eq!(body["clinical_trials_count"], 0);

    let stored = state.store.get_analysis(&analysis.id).unwrap().unwrap();
    let landscape = stored.competitive_landscape.unwrap();
    assert_eq!(landscape.competitors[0].market_share, 30);
    assert!(stored.updated_at >= stored.created_at);
}

#[tokio::test]
async fn scenario_modeling_updates_stored_record() {
    let (_dir, state, router) = test_app(&["not json"]);

    let analysis = TherapyAreaAnalysis::new("testitis", None);
    state.store.insert_analysis(&analysis).unwrap();

    let (status, body) = request(
        &router,
        "POST",
        "/api/scenario-modeling",
        Some(serde_json::json!({
            "therapy_area": "testitis",
            "analysis_id": analysis.id,
            "scenarios": ["pessimistic", "realistic", "optimistic"],
            "api_key": "k",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["scenario_models"]["pessimistic"]["projections"][0], 60.0);
    assert_eq!(body["scenario_models"]["optimistic"]["projections"][0], 180.0);
    assert_eq!(body["visualization"]["chart_type"], "line");

    let stored = state.store.get_analysis(&analysis.id).unwrap().unwrap();
    let models = stored.scenario_models.unwrap();
    assert_eq!(models["realistic"].projections[4], 900.0);
}

#[tokio::test]
async fn export_round_trip_and_error_cases() {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;

    let (_dir, state, router) = test_app(&[]);

    let mut analysis = TherapyAreaAnalysis::new("test area", None);
    analysis.disease_summary = "A disease worth summarizing.".into();
    state.store.insert_analysis(&analysis).unwrap();

    // Missing record.
    let (status, _) = request(
        &router,
        "POST",
        "/api/export",
        Some(serde_json::json!({ "analysis_id": "nope", "export_type": "pdf" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Unknown export type.
    let (status, body) = request(
        &router,
        "POST",
        "/api/export",
        Some(serde_json::json!({ "analysis_id": analysis.id, "export_type": "pptx" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Invalid export type"));

    // PDF export.
    let (status, body) = request(
        &router,
        "POST",
        "/api/export",
        Some(serde_json::json!({ "analysis_id": analysis.id, "export_type": "pdf" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["filename"], "test_area_analysis.pdf");
    let bytes = BASE64.decode(body["data"].as_str().unwrap()).unwrap();
    assert!(bytes.starts_with(b"%PDF"));

    // Excel export.
    let (status, body) = request(
        &router,
        "POST",
        "/api/export",
        Some(serde_json::json!({ "analysis_id": analysis.id, "export_type": "excel" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["filename"], "test_area_model.xlsx");
    let bytes = BASE64.decode(body["data"].as_str().unwrap()).unwrap();
    assert!(bytes.starts_with(b"PK"));
}
