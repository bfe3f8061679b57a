//! Scenario-model decoding and the deterministic numeric fallback.

use pharmscope_core::{ScenarioModel, ScenarioModels};

use crate::parse::embedded::extract_json_object;

/// Base 6-year projection curve (millions USD), scaled per scenario in the
/// fallback.
pub const BASE_PROJECTIONS: [f64; 6] = [100.0, 250.0, 500.0, 750.0, 900.0, 800.0];

const SHARE_TRAJECTORY: [f64; 6] = [2.0, 5.0, 8.0, 12.0, 15.0, 13.0];

/// Positional multipliers, used only for scenario names outside the lookup
/// table; the index clamps at the last entry.
const POSITIONAL_MULTIPLIERS: [f64; 3] = [0.6, 1.0, 1.8];

/// Multiplier for a scenario. Well-known names resolve by name; anything
/// else falls back to the clamped positional mapping.
fn multiplier_for(name: &str, index: usize) -> f64 {
    match name.to_ascii_lowercase().as_str() {
        "pessimistic" => 0.6,
        "realistic" => 1.0,
        "optimistic" => 1.8,
        _ => POSITIONAL_MULTIPLIERS[index.min(POSITIONAL_MULTIPLIERS.len() - 1)],
    }
}

fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode a scenario-modeling response into named models; on decode failure
/// synthesize the deterministic fallback for the requested scenario list.
pub fn decode_scenarios(raw: &str, scenarios: &[String]) -> ScenarioModels {
    extract_json_object(raw)
        .and_then(|slice| serde_json::from_str(slice).ok())
        .unwrap_or_else(|| fallback_scenarios(raw, scenarios))
}

/// Deterministic fallback: base curve scaled per scenario, values
/// integer-truncated, with the raw response retained per model.
pub fn fallback_scenarios(raw: &str, scenarios: &[String]) -> ScenarioModels {
    scenarios
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let multiplier = multiplier_for(name, index);
            let title = title_case(name);
            let model = ScenarioModel {
                assumptions: vec![format!("{} market conditions", title)],
                projections: BASE_PROJECTIONS
                    .iter()
                    .map(|p| (p * multiplier).trunc())
                    .collect(),
                peak_sales: (900.0 * multiplier).trunc(),
                market_share_trajectory: SHARE_TRAJECTORY.to_vec(),
                key_factors: vec![format!("{} execution", title)],
                full_analysis: Some(raw.to_string()),
            };
            (name.clone(), model)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fallback_scales_base_curve_per_scenario() {
        let scenarios = names(&["pessimistic", "realistic", "optimistic"]);
        let models = fallback_scenarios("raw text", &scenarios);

        assert_eq!(
            models["pessimistic"].projections,
            vec![60.0, 150.0, 300.0, 450.0, 540.0, 480.0]
        );
        assert_eq!(
            models["realistic"].projections,
            vec![100.0, 250.0, 500.0, 750.0, 900.0, 800.0]
        );
        assert_eq!(
            models["optimistic"].projections,
            vec![180.0, 450.0, 900.0, 1350.0, 1620.0, 1440.0]
        );
        assert_eq!(models["optimistic"].peak_sales, 1620.0);
        assert_eq!(models["pessimistic"].peak_sales, 540.0);
    }

    #[test]
    fn well_known_names_resolve_by_name_not_position() {
        // Reversed order: name-keyed lookup keeps the right multipliers.
        let scenarios = names(&["optimistic", "realistic", "pessimistic"]);
        let models = fallback_scenarios("raw", &scenarios);
        assert_eq!(models["optimistic"].projections[0], 180.0);
        assert_eq!(models["pessimistic"].projections[0], 60.0);
    }

    #[test]
    fn unknown_names_use_clamped_positional_multipliers() {
        let scenarios = names(&["base", "bull", "moonshot", "extra"]);
        let models = fallback_scenarios("raw", &scenarios);
        assert_eq!(models["base"].projections[0], 60.0);
        assert_eq!(models["bull"].projections[0], 100.0);
        assert_eq!(models["moonshot"].projections[0], 180.0);
        // Index clamps at the last multiplier.
        assert_eq!(models["extra"].projections[0], 180.0);
    }

    #[test]
    fn fallback_carries_raw_response_and_fixed_trajectory() {
        let scenarios = names(&["realistic"]);
        let models = fallback_scenarios("the raw answer", &scenarios);
        let model = &models["realistic"];
        assert_eq!(model.full_analysis.as_deref(), Some("the raw answer"));
        assert_eq!(model.market_share_trajectory, SHARE_TRAJECTORY.to_vec());
        assert_eq!(model.assumptions, vec!["Realistic market conditions"]);
        assert_eq!(model.key_factors, vec!["Realistic execution"]);
    }

    #[test]
    fn valid_embedded_json_wins_over_fallback() {
        let raw = r#"Here you go: {
            "optimistic": {"assumptions": ["fast uptake"], "projections": [1, 2, 3, 4, 5, 6],
                           "peak_sales": 6, "market_share_trajectory": [1, 1, 1, 1, 1, 1],
                           "key_factors": ["launch"]}
        }"#;
        let models = decode_scenarios(raw, &names(&["optimistic"]));
        assert_eq!(models["optimistic"].projections, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(models["optimistic"].assumptions, vec!["fast uptake"]);
        assert!(models["optimistic"].full_analysis.is_none());
    }

    #[test]
    fn unparseable_response_triggers_fallback() {
        let models = decode_scenarios("not json at all", &names(&["realistic"]));
        assert_eq!(models["realistic"].projections[4], 900.0);
        assert_eq!(
            models["realistic"].full_analysis.as_deref(),
            Some("not json at all")
        );
    }
}
