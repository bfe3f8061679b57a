//! Declarative chart specifications.
//!
//! The server never rasterizes charts; it emits serializable descriptions
//! (kind, series, labels, colors) that the client renders.

use serde::Serialize;

use pharmscope_core::{CompetitiveLandscape, FunnelStage, ScenarioModels};

/// Marker colors for funnel stages, cycled in order.
const FUNNEL_COLORS: [&str; 6] = ["deepskyblue", "lightsalmon", "tan", "teal", "silver", "gold"];

/// First and last calendar years on the scenario x-axis.
const FORECAST_YEARS: std::ops::Range<i32> = 2024..2030;

/// Maximum competitors shown on the market pie chart.
const PIE_LIMIT: usize = 10;

/// Maximum points per scenario line.
const LINE_POINTS: usize = 6;

/// One line on the scenario comparison chart.
#[derive(Debug, Clone, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub values: Vec<f64>,
    pub color: String,
}

/// A serializable chart description.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "chart_type", rename_all = "snake_case")]
pub enum ChartSpec {
    Funnel {
        title: String,
        stages: Vec<String>,
        values: Vec<f64>,
        colors: Vec<String>,
    },
    Pie {
        title: String,
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Line {
        title: String,
        x_title: String,
        y_title: String,
        years: Vec<i32>,
        series: Vec<LineSeries>,
    },
}

/// Parse a stage percentage such as `"45%"`. Non-numeric values (e.g.
/// `"Variable"`) degrade to 0 rather than erroring.
fn stage_value(percentage: &str) -> f64 {
    percentage
        .trim()
        .trim_end_matches('%')
        .trim()
        .parse()
        .unwrap_or(0.0)
}

fn scenario_color(name: &str) -> &'static str {
    match name.to_ascii_lowercase().as_str() {
        "optimistic" => "green",
        "realistic" => "blue",
        "pessimistic" => "red",
        _ => "gray",
    }
}

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Build the patient-flow funnel chart: one value per stage, fixed colors.
pub fn funnel_chart(stages: &[FunnelStage]) -> ChartSpec {
    ChartSpec::Funnel {
        title: "Patient Flow Funnel".into(),
        stages: stages.iter().map(|s| s.stage.clone()).collect(),
        values: stages.iter().map(|s| stage_value(&s.percentage)).collect(),
        colors: FUNNEL_COLORS
            .iter()
            .cycle()
            .take(stages.len())
            .map(|c| c.to_string())
            .collect(),
    }
}

/// Build the market-share pie chart: top 10 competitors by input order.
/// Returns `None` when there are no competitors to show.
pub fn market_chart(landscape: &CompetitiveLandscape) -> Option<ChartSpec> {
    if landscape.competitors.is_empty() {
        return None;
    }
    let top = &landscape.competitors[..landscape.competitors.len().min(PIE_LIMIT)];
    Some(ChartSpec::Pie {
        title: "Competitive Market Landscape".into(),
        labels: top.iter().map(|c| c.name.clone()).collect(),
        values: top.iter().map(|c| c.market_share as f64).collect(),
    })
}

/// Build the scenario comparison chart: one line per scenario, at most six
/// points, fixed calendar years. Returns `None` when no scenarios exist.
pub fn scenario_chart(models: &ScenarioModels) -> Option<ChartSpec> {
    if models.is_empty() {
        return None;
    }

    let years: Vec<i32> = FORECAST_YEARS.collect();
    let series = models
        .iter()
        .map(|(name, model)| LineSeries {
            name: title_case(name),
            values: model.projections.iter().take(LINE_POINTS).copied().collect(),
            color: scenario_color(name).to_string(),
        })
        .collect();

    Some(ChartSpec::Line {
        title: "Market Forecast Scenarios".into(),
        x_title: "Year".into(),
        y_title: "Market Value ($M)".into(),
        years,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pharmscope_core::{CompetitorEntry, ScenarioModel};

    fn stage(name: &str, percentage: &str) -> FunnelStage {
        FunnelStage {
            stage: name.into(),
            description: String::new(),
            percentage: percentage.into(),
            notes: String::new(),
        }
    }

    #[test]
    fn funnel_chart_parses_percentages() {
        let stages = vec![stage("At risk", "100%"), stage("Diagnosed", "45%")];
        let ChartSpec::Funnel { values, colors, .. } = funnel_chart(&stages) else {
            panic!("expected funnel spec");
        };
        assert_eq!(values, vec![100.0, 45.0]);
        assert_eq!(colors, vec!["deepskyblue", "lightsalmon"]);
    }

    #[test]
    fn non_numeric_percentage_degrades_to_zero() {
        let stages = vec![stage("Target", "Variable")];
        let ChartSpec::Funnel { values, .. } = funnel_chart(&stages) else {
            panic!("expected funnel spec");
        };
        assert_eq!(values, vec![0.0]);
    }

    #[test]
    fn funnel_colors_cycle_past_six_stages() {
        let stages: Vec<FunnelStage> =
            (0..8).map(|i| stage(&format!("s{}", i), "10%")).collect();
        let ChartSpec::Funnel { colors, .. } = funnel_chart(&stages) else {
            panic!("expected funnel spec");
        };
        assert_eq!(colors.len(), 8);
        assert_eq!(colors[6], "deepskyblue");
    }

    #[test]
    fn pie_takes_top_ten_by_input_order() {
        let competitors: Vec<CompetitorEntry> = (0..12)
            .map(|i| CompetitorEntry {
                name: format!("Company {}", i),
                products: String::new(),
                market_share: i,
                strengths: String::new(),
                weaknesses: String::new(),
            })
            .collect();
        let landscape = CompetitiveLandscape {
            competitors,
            market_dynamics: String::new(),
            pipeline: String::new(),
            positioning: String::new(),
            catalysts: String::new(),
            full_analysis: String::new(),
        };
        let Some(ChartSpec::Pie { labels, values, .. }) = market_chart(&landscape) else {
            panic!("expected pie spec");
        };
        assert_eq!(labels.len(), 10);
        assert_eq!(labels[0], "Company 0");
        assert_eq!(values[9], 9.0);
    }

    #[test]
    fn empty_landscape_has_no_chart() {
        let landscape = CompetitiveLandscape {
            competitors: Vec::new(),
            market_dynamics: String::new(),
            pipeline: String::new(),
            positioning: String::new(),
            catalysts: String::new(),
            full_analysis: String::new(),
        };
        assert!(market_chart(&landscape).is_none());
    }

    #[test]
    fn scenario_chart_fixes_years_and_colors() {
        let mut models = ScenarioModels::new();
        models.insert(
            "optimistic".into(),
            ScenarioModel {
                assumptions: vec![],
                projections: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
                peak_sales: 8.0,
                market_share_trajectory: vec![],
                key_factors: vec![],
                full_analysis: None,
            },
        );
        let Some(ChartSpec::Line { years, series, .. }) = scenario_chart(&models) else {
            panic!("expected line spec");
        };
        assert_eq!(years, vec![2024, 2025, 2026, 2027, 2028, 2029]);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].name, "Optimistic");
        assert_eq!(series[0].color, "green");
        // Truncated to six points.
        assert_eq!(series[0].values.len(), 6);
    }

    #[test]
    fn unknown_scenario_gets_neutral_color() {
        let mut models = ScenarioModels::new();
        models.insert(
            "stretch".into(),
            ScenarioModel {
                assumptions: vec![],
                projections: vec![1.0],
                peak_sales: 1.0,
                market_share_trajectory: vec![],
                key_factors: vec![],
                full_analysis: None,
            },
        );
        let Some(ChartSpec::Line { series, .. }) = scenario_chart(&models) else {
            panic!("expected line spec");
        };
        assert_eq!(series[0].color, "gray");
    }

    #[test]
    fn empty_models_have_no_chart() {
        assert!(scenario_chart(&ScenarioModels::new()).is_none());
    }

    #[test]
    fn chart_spec_serializes_with_tag() {
        let spec = funnel_chart(&[stage("At risk", "100%")]);
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(value["chart_type"], "funnel");
        assert_eq!(value["title"], "Patient Flow Funnel");
    }
}
