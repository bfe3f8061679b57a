//! Heuristic line-classification parsing for competitive-analysis responses.
//!
//! Competitive briefs come back as free text with no reliable JSON, so the
//! parser runs a sequential line scan: uppercase keyword sets switch the
//! current section, bullet lines inside the competitors section are split
//! into name/details, and narrative sections keep a bounded window of the
//! last 10 lines. A rescue pass over known company names runs when the scan
//! finds no competitors at all.

use once_cell::sync::Lazy;
use regex::Regex;

use pharmscope_core::text::{clamp_chars, excerpt};
use pharmscope_core::{CompetitiveLandscape, CompetitorEntry};

static SHARE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)%").unwrap());

const COMPETITOR_KEYWORDS: &[&str] = &["COMPETITOR", "MAJOR", "KEY PLAYER"];
const DYNAMICS_KEYWORDS: &[&str] = &["MARKET DYNAMIC", "MARKET TREND"];
const PIPELINE_KEYWORDS: &[&str] = &["PIPELINE", "DEVELOPMENT"];
const POSITIONING_KEYWORDS: &[&str] = &["POSITIONING", "DIFFERENTIAT"];
const CATALYST_KEYWORDS: &[&str] = &["CATALYST", "UPCOMING", "EVENTS"];

/// Markers that flag a line as a competitor entry.
const BULLET_MARKERS: &[&str] = &["-", "\u{2022}", "1.", "2.", "3."];

/// Prefixes stripped from extracted company names.
const LIST_PREFIXES: &[&str] = &["1.", "2.", "3.", "4.", "5.", "6.", "7.", "-", "\u{2022}"];

/// Companies recognized by the rescue pass.
const KNOWN_COMPANIES: &[&str] = &[
    "NOVARTIS", "PFIZER", "ROCHE", "BRISTOL", "MERCK", "JOHNSON", "ABBVIE", "GILEAD", "BIOGEN",
    "AMGEN",
];

const MAX_COMPETITORS: usize = 7;
const RESCUE_LIMIT: usize = 5;
const SECTION_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Competitors,
    MarketDynamics,
    Pipeline,
    Positioning,
    Catalysts,
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn classify(upper_line: &str) -> Option<Section> {
    if contains_any(upper_line, COMPETITOR_KEYWORDS) {
        Some(Section::Competitors)
    } else if contains_any(upper_line, DYNAMICS_KEYWORDS) {
        Some(Section::MarketDynamics)
    } else if contains_any(upper_line, PIPELINE_KEYWORDS) {
        Some(Section::Pipeline)
    } else if contains_any(upper_line, POSITIONING_KEYWORDS) {
        Some(Section::Positioning)
    } else if contains_any(upper_line, CATALYST_KEYWORDS) {
        Some(Section::Catalysts)
    } else {
        None
    }
}

fn last_lines(lines: &[&str], window: usize) -> String {
    lines[lines.len().saturating_sub(window)..].join("\n")
}

/// Try to extract a competitor entry from a bullet/numbered line.
fn parse_competitor_line(line: &str) -> Option<CompetitorEntry> {
    if !contains_any(line, BULLET_MARKERS) {
        return None;
    }

    let (name_part, details) = match line.split_once(':') {
        Some((name, details)) => (name.trim().to_string(), details.trim()),
        None => (line.trim().to_string(), ""),
    };

    let mut name = name_part;
    for prefix in LIST_PREFIXES {
        name = name.replace(prefix, "");
    }
    let name = name.trim();
    if name.len() <= 2 {
        return None;
    }

    let market_share = SHARE_RE
        .captures(details)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(5);

    Some(CompetitorEntry {
        name: clamp_chars(name, 50).to_string(),
        products: if details.is_empty() {
            "Market presence".into()
        } else {
            clamp_chars(details, 100).to_string()
        },
        market_share,
        strengths: if details.is_empty() {
            "Established player".into()
        } else {
            clamp_chars(details, 100).to_string()
        },
        weaknesses: "See analysis for details".into(),
    })
}

/// Rescue pass: synthesize placeholder entries for known company names.
fn rescue_known_companies(raw: &str) -> Vec<CompetitorEntry> {
    let mut competitors = Vec::new();
    for line in raw.lines() {
        let upper = line.to_uppercase();
        if contains_any(&upper, KNOWN_COMPANIES) {
            competitors.push(CompetitorEntry {
                name: clamp_chars(line.trim(), 30).to_string(),
                products: "Multiple products in portfolio".into(),
                market_share: 15,
                strengths: "Established pharmaceutical company".into(),
                weaknesses: "High competition".into(),
            });
        }
        if competitors.len() >= RESCUE_LIMIT {
            break;
        }
    }
    competitors
}

/// Parse a free-text competitive-analysis response. Never fails; empty
/// sections are backfilled with derived defaults and the verbatim response
/// is retained in `full_analysis`.
pub fn parse_competitive(raw: &str) -> CompetitiveLandscape {
    let mut competitors = Vec::new();
    let mut market_dynamics = String::new();
    let mut pipeline = String::new();
    let mut positioning = String::new();
    let mut catalysts = String::new();

    let mut current = Section::None;
    let mut accumulator: Vec<&str> = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let upper = line.to_uppercase();
        if let Some(next) = classify(&upper) {
            current = next;
            accumulator.clear();
            continue;
        }

        accumulator.push(line);

        if current == Section::Competitors {
            if let Some(entry) = parse_competitor_line(line) {
                competitors.push(entry);
            }
        }

        // Bounded window: narrative sections keep only the last 10 lines.
        match current {
            Section::MarketDynamics => market_dynamics = last_lines(&accumulator, SECTION_WINDOW),
            Section::Pipeline => pipeline = last_lines(&accumulator, SECTION_WINDOW),
            Section::Positioning => positioning = last_lines(&accumulator, SECTION_WINDOW),
            Section::Catalysts => catalysts = last_lines(&accumulator, SECTION_WINDOW),
            Section::Competitors | Section::None => {}
        }
    }

    if competitors.is_empty() {
        competitors = rescue_known_companies(raw);
    }

    if market_dynamics.is_empty() {
        market_dynamics = excerpt(raw, 500);
    }
    if pipeline.is_empty() {
        pipeline = "Pipeline analysis included in full competitive analysis".into();
    }
    if positioning.is_empty() {
        positioning = "Competitive positioning varies by therapeutic focus and market presence".into();
    }
    if catalysts.is_empty() {
        catalysts = "Key market catalysts and events detailed in comprehensive analysis".into();
    }

    competitors.truncate(MAX_COMPETITORS);

    CompetitiveLandscape {
        competitors,
        market_dynamics,
        pipeline,
        positioning,
        catalysts,
        full_analysis: raw.to_string(),
    }
}

/// Fixed landscape returned when the model call itself fails.
pub fn error_landscape(error: &str) -> CompetitiveLandscape {
    CompetitiveLandscape {
        competitors: vec![CompetitorEntry {
            name: "Analysis Error".into(),
            products: clamp_chars(error, 100).to_string(),
            market_share: 0,
            strengths: "Please try again".into(),
            weaknesses: String::new(),
        }],
        market_dynamics: format!("Error generating analysis: {}", error),
        pipeline: "Please regenerate analysis".into(),
        positioning: "Error in analysis generation".into(),
        catalysts: "Please try again with valid API key".into(),
        full_analysis: format!("Error: {}", error),
    }
}
