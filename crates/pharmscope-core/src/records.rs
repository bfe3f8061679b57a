//! Persisted record shapes for therapy analyses, patient-flow funnels, and
//! the nested intelligence fragments built from model responses.
//!
//! Wire format is snake_case JSON, kept stable for existing clients. All
//! free-text sections default to the empty string so a degraded parse still
//! yields a fully-populated record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health-check record written by `POST /api/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCheck {
    pub id: String,
    pub client_name: String,
    pub timestamp: DateTime<Utc>,
}

impl StatusCheck {
    pub fn new(client_name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            client_name: client_name.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A single entry in the competitive landscape. Not globally unique; the
/// parser may emit duplicates or placeholder "Analysis Error" entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorEntry {
    pub name: String,
    #[serde(default)]
    pub products: String,
    /// Estimated market share, 0-100. Defaults to 5 when the source text
    /// carries no percentage.
    #[serde(default = "default_market_share")]
    pub market_share: i64,
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub weaknesses: String,
}

fn default_market_share() -> i64 {
    5
}

/// Competitive intelligence extracted from a free-text model response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitiveLandscape {
    pub competitors: Vec<CompetitorEntry>,
    pub market_dynamics: String,
    pub pipeline: String,
    pub positioning: String,
    pub catalysts: String,
    /// Verbatim raw model response, retained for manual recovery.
    pub full_analysis: String,
}

/// Enumerated risk level for a single risk category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    #[serde(alias = "high")]
    High,
    #[default]
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "low")]
    Low,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::Low => write!(f, "Low"),
        }
    }
}

/// One risk category: level plus contributing factors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RiskCategory {
    #[serde(default)]
    pub level: RiskLevel,
    #[serde(default)]
    pub factors: Vec<String>,
}

impl RiskCategory {
    pub fn new(level: RiskLevel, factors: &[&str]) -> Self {
        Self {
            level,
            factors: factors.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Risk assessment across named categories with an overall 1-10 score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    #[serde(default = "default_overall_score")]
    pub overall_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_assessment: Option<String>,
    /// Category name -> level/factors, flattened into the JSON object.
    #[serde(flatten)]
    pub categories: BTreeMap<String, RiskCategory>,
}

fn default_overall_score() -> f64 {
    5.0
}

/// A named forecast variant with assumptions and multi-year projections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioModel {
    #[serde(default)]
    pub assumptions: Vec<String>,
    /// Six annual revenue projections (millions USD, 2024-2029).
    #[serde(default)]
    pub projections: Vec<f64>,
    #[serde(default)]
    pub peak_sales: f64,
    /// Six market-share points matching the projection years.
    #[serde(default)]
    pub market_share_trajectory: Vec<f64>,
    #[serde(default)]
    pub key_factors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_analysis: Option<String>,
}

/// Scenario name -> model. BTreeMap keeps serialization deterministic.
pub type ScenarioModels = BTreeMap<String, ScenarioModel>;

/// One stage of a patient-flow funnel. Order is meaningful: the population
/// narrows stage by stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunnelStage {
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub description: String,
    /// `"<number>%"`, or `"Variable"`/free text when unknown.
    #[serde(default)]
    pub percentage: String,
    #[serde(default)]
    pub notes: String,
}

/// Full therapy-area analysis record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TherapyAreaAnalysis {
    /// Immutable once created.
    pub id: String,
    pub therapy_area: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default)]
    pub disease_summary: String,
    #[serde(default)]
    pub staging: String,
    #[serde(default)]
    pub biomarkers: String,
    #[serde(default)]
    pub treatment_algorithm: String,
    #[serde(default)]
    pub patient_journey: String,
    /// Declared for wire compatibility; never populated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_size_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitive_landscape: Option<CompetitiveLandscape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulatory_intelligence: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clinical_trials_data: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_assessment: Option<RiskAssessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_models: Option<ScenarioModels>,
    pub created_at: DateTime<Utc>,
    /// Invariant: `updated_at >= created_at`.
    pub updated_at: DateTime<Utc>,
}

impl TherapyAreaAnalysis {
    /// Create a fresh analysis record with generated id and timestamps.
    pub fn new(therapy_area: impl Into<String>, product_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            therapy_area: therapy_area.into(),
            product_name,
            disease_summary: String::new(),
            staging: String::new(),
            biomarkers: String::new(),
            treatment_algorithm: String::new(),
            patient_journey: String::new(),
            market_size_data: None,
            competitive_landscape: None,
            regulatory_intelligence: None,
            clinical_trials_data: None,
            risk_assessment: None,
            scenario_models: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the record as updated now.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Patient-flow funnel. References its parent analysis by id only; deleting
/// the analysis does not cascade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientFlowFunnel {
    pub id: String,
    pub therapy_area: String,
    pub analysis_id: String,
    pub funnel_stages: Vec<FunnelStage>,
    #[serde(default)]
    pub total_addressable_population: String,
    #[serde(default)]
    pub forecasting_notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scenario_models: Option<ScenarioModels>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visualization_data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl PatientFlowFunnel {
    pub fn new(therapy_area: impl Into<String>, analysis_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            therapy_area: therapy_area.into(),
            analysis_id: analysis_id.into(),
            funnel_stages: Vec::new(),
            total_addressable_population: String::new(),
            forecasting_notes: String::new(),
            scenario_models: None,
            visualization_data: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analysis_timestamps_start_equal() {
        let analysis = TherapyAreaAnalysis::new("multiple sclerosis", None);
        assert_eq!(analysis.created_at, analysis.updated_at);
        assert!(!analysis.id.is_empty());
    }

    #[test]
    fn touch_never_moves_updated_at_backwards() {
        let mut analysis = TherapyAreaAnalysis::new("NSCLC", Some("drugX".into()));
        let created = analysis.created_at;
        analysis.touch();
        assert!(analysis.updated_at >= created);
    }

    #[test]
    fn risk_assessment_round_trips_flattened_categories() {
        let json = r#"{
            "overall_score": 7,
            "clinical_risk": {"level": "High", "factors": ["endpoint risk"]},
            "market_risk": {"level": "Low", "factors": []}
        }"#;
        let risk: RiskAssessment = serde_json::from_str(json).unwrap();
        assert_eq!(risk.overall_score, 7.0);
        assert_eq!(risk.categories["clinical_risk"].level, RiskLevel::High);
        assert_eq!(risk.categories["market_risk"].level, RiskLevel::Low);

        let value = serde_json::to_value(&risk).unwrap();
        assert!(value.get("clinical_risk").is_some());
        assert_eq!(value["overall_score"], 7.0);
    }

    #[test]
    fn risk_level_accepts_lowercase_aliases() {
        let category: RiskCategory =
            serde_json::from_str(r#"{"level": "high", "factors": ["x"]}"#).unwrap();
        assert_eq!(category.level, RiskLevel::High);
    }

    #[test]
    fn funnel_stage_defaults_missing_fields() {
        let stage: FunnelStage = serde_json::from_str(r#"{"stage": "Diagnosed"}"#).unwrap();
        assert_eq!(stage.stage, "Diagnosed");
        assert_eq!(stage.percentage, "");
        assert_eq!(stage.notes, "");
    }
}
