//! Embedded-JSON extraction for funnel, regulatory, and risk responses.
//!
//! Model responses wrap the requested JSON object in prose. The slice from
//! the first `{` to the last `}` is decoded strictly; on any failure a fixed
//! fallback record is returned with the raw text preserved in a passthrough
//! field so no information is silently lost.

use serde::Deserialize;
use serde_json::json;

use pharmscope_core::text::excerpt;
use pharmscope_core::{FunnelStage, RiskAssessment, RiskCategory, RiskLevel};

/// Slice the candidate JSON object out of a prose-wrapped response.
pub fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

/// Decoded funnel response body (pre-persistence shape).
#[derive(Debug, Clone, Deserialize)]
pub struct FunnelPayload {
    #[serde(default)]
    pub funnel_stages: Vec<FunnelStage>,
    #[serde(default)]
    pub total_addressable_population: String,
    #[serde(default)]
    pub forecasting_notes: String,
}

/// Decode a funnel response, falling back to placeholder stages that carry
/// the raw text.
pub fn decode_funnel(raw: &str) -> FunnelPayload {
    extract_json_object(raw)
        .and_then(|slice| serde_json::from_str(slice).ok())
        .unwrap_or_else(|| fallback_funnel(raw))
}

fn fallback_funnel(raw: &str) -> FunnelPayload {
    FunnelPayload {
        funnel_stages: vec![
            FunnelStage {
                stage: "Total Population".into(),
                description: "Analysis generated".into(),
                percentage: "100%".into(),
                notes: "See full response".into(),
            },
            FunnelStage {
                stage: "Target Population".into(),
                description: "Detailed analysis provided".into(),
                percentage: "Variable".into(),
                notes: excerpt(raw, 200),
            },
        ],
        total_addressable_population: "See full analysis response".into(),
        forecasting_notes: raw.to_string(),
    }
}

/// Decode a regulatory-intelligence response. The success shape is whatever
/// object the model produced; the fallback routes the raw text into
/// `market_access`.
pub fn decode_regulatory(raw: &str) -> serde_json::Value {
    extract_json_object(raw)
        .and_then(|slice| serde_json::from_str(slice).ok())
        .unwrap_or_else(|| {
            json!({
                "pathways": "See full analysis",
                "recent_activity": "See full analysis",
                "trends": "See full analysis",
                "timelines": "See full analysis",
                "market_access": raw,
            })
        })
}

/// Decode a risk-assessment response into the typed record, falling back to
/// a fixed mid-level assessment carrying the raw text.
pub fn decode_risk(raw: &str) -> RiskAssessment {
    extract_json_object(raw)
        .and_then(|slice| serde_json::from_str(slice).ok())
        .unwrap_or_else(|| fallback_risk(raw))
}

fn fallback_risk(raw: &str) -> RiskAssessment {
    let categories = [
        ("clinical_risk", RiskLevel::Medium),
        ("regulatory_risk", RiskLevel::Medium),
        ("commercial_risk", RiskLevel::Medium),
        ("operational_risk", RiskLevel::Low),
        ("market_risk", RiskLevel::Medium),
    ]
    .into_iter()
    .map(|(name, level)| {
        (
            name.to_string(),
            RiskCategory::new(level, &["See analysis"]),
        )
    })
    .collect();

    RiskAssessment {
        overall_score: 5.0,
        full_assessment: Some(raw.to_string()),
        categories,
    }
}
