//! ClinicalTrials.gov v2 registry client.
//!
//! Best-effort lookup: any failure logs and degrades to an empty result so
//! trial data never blocks an analysis.

use std::time::Duration;

use reqwest::Client;
use tracing::error;

const DEFAULT_BASE_URL: &str = "https://clinicaltrials.gov/api/v2";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_SIZE: usize = 20;
const STUDY_FIELDS: &str = "NCTId,BriefTitle,OverallStatus,Phase,Condition";

/// Client for the ClinicalTrials.gov study registry.
pub struct TrialsClient {
    client: Client,
    base_url: String,
}

impl TrialsClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at a different registry host (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Search studies by therapy-area keyword. Returns the raw study records,
    /// or an empty list on any failure.
    pub async fn search(&self, therapy_area: &str) -> Vec<serde_json::Value> {
        let url = format!("{}/studies", self.base_url);
        let condition = therapy_area.replace(' ', "+");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("query.cond", condition.as_str()),
                ("pageSize", &PAGE_SIZE.to_string()),
                ("format", "json"),
                ("fields", STUDY_FIELDS),
            ])
            .send()
            .await;

        let response = match response {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                error!("Clinical trials search returned status {}", r.status());
                return Vec::new();
            }
            Err(e) => {
                error!("Clinical trials search error: {}", e);
                return Vec::new();
            }
        };

        match response.json::<serde_json::Value>().await {
            Ok(data) => data["studies"]
                .as_array()
                .cloned()
                .unwrap_or_default(),
            Err(e) => {
                error!("Clinical trials response decode error: {}", e);
                Vec::new()
            }
        }
    }
}

impl Default for TrialsClient {
    fn default() -> Self {
        Self::new()
    }
}
