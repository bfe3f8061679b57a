//! Generation pipelines: build the prompt, call the model once, parse the
//! response.
//!
//! The therapy-sections and funnel calls propagate model errors (the request
//! cannot proceed without them); the auxiliary intelligence passes absorb
//! model failures into their designated fallbacks so they never block an
//! analysis.

use tracing::error;

use pharmscope_core::{CompetitiveLandscape, Result, RiskAssessment, ScenarioModels, TherapyAreaAnalysis};
use pharmscope_llm::{CompletionRequest, ModelClient};

use crate::parse::competitive::{error_landscape, parse_competitive};
use crate::parse::embedded::{decode_funnel, decode_regulatory, decode_risk, FunnelPayload};
use crate::parse::sections::{parse_analysis_sections, AnalysisSections};
use crate::prompts::{self, Prompt};
use crate::scenarios::decode_scenarios;

async fn complete(model: &dyn ModelClient, api_key: &str, prompt: Prompt) -> Result<String> {
    model
        .complete(CompletionRequest {
            api_key: api_key.to_string(),
            system: prompt.system,
            prompt: prompt.user,
            max_tokens: prompt.max_tokens,
        })
        .await
}

/// Generate and parse the five therapy-area text sections. Model errors
/// propagate: there is no analysis without them.
pub async fn therapy_sections(
    model: &dyn ModelClient,
    api_key: &str,
    therapy_area: &str,
    product_name: Option<&str>,
) -> Result<AnalysisSections> {
    let raw = complete(model, api_key, prompts::therapy_analysis(therapy_area, product_name)).await?;
    Ok(parse_analysis_sections(&raw))
}

/// Generate and decode the patient-flow funnel body. Model errors propagate.
pub async fn funnel_payload(
    model: &dyn ModelClient,
    api_key: &str,
    therapy_area: &str,
    analysis: &TherapyAreaAnalysis,
) -> Result<FunnelPayload> {
    let raw = complete(model, api_key, prompts::patient_flow_funnel(therapy_area, analysis)).await?;
    Ok(decode_funnel(&raw))
}

/// Generate the competitive landscape. A model failure degrades to the fixed
/// error landscape rather than failing the request.
pub async fn competitive_landscape(
    model: &dyn ModelClient,
    api_key: &str,
    therapy_area: &str,
) -> CompetitiveLandscape {
    match complete(model, api_key, prompts::competitive_analysis(therapy_area)).await {
        Ok(raw) => parse_competitive(&raw),
        Err(e) => {
            error!("Competitive analysis error: {}", e);
            error_landscape(&e.to_string())
        }
    }
}

/// Generate regulatory intelligence. Absent on model failure.
pub async fn regulatory_intelligence(
    model: &dyn ModelClient,
    api_key: &str,
    therapy_area: &str,
) -> Option<serde_json::Value> {
    match complete(model, api_key, prompts::regulatory_intelligence(therapy_area)).await {
        Ok(raw) => Some(decode_regulatory(&raw)),
        Err(e) => {
            error!("Regulatory intelligence error: {}", e);
            None
        }
    }
}

/// Generate the risk assessment. Absent on model failure.
pub async fn risk_assessment(
    model: &dyn ModelClient,
    api_key: &str,
    therapy_area: &str,
) -> Option<RiskAssessment> {
    match complete(model, api_key, prompts::risk_assessment(therapy_area)).await {
        Ok(raw) => Some(decode_risk(&raw)),
        Err(e) => {
            error!("Risk assessment error: {}", e);
            None
        }
    }
}

/// Generate scenario models for the requested scenario names. Absent on
/// model failure.
pub async fn scenario_models(
    model: &dyn ModelClient,
    api_key: &str,
    therapy_area: &str,
    scenarios: &[String],
) -> Option<ScenarioModels> {
    match complete(model, api_key, prompts::scenario_models(therapy_area, scenarios)).await {
        Ok(raw) => Some(decode_scenarios(&raw, scenarios)),
        Err(e) => {
            error!("Scenario modeling error: {}", e);
            None
        }
    }
}
