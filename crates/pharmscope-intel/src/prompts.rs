//! Fixed prompt templates for each generation kind.
//!
//! Section headers and JSON key names are load-bearing: the parsers in
//! [`crate::parse`] key on them.

use pharmscope_core::text::excerpt;
use pharmscope_core::TherapyAreaAnalysis;

/// A prepared prompt: system persona, user message, max token count.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub max_tokens: usize,
}

/// Five-section therapy-area analysis.
pub fn therapy_analysis(therapy_area: &str, product_name: Option<&str>) -> Prompt {
    let product_info = product_name
        .map(|p| format!(" for the product '{}'", p))
        .unwrap_or_default();
    Prompt {
        system: "You are a world-class pharmaceutical consultant specializing in therapy area \
                 analysis and forecasting. You have deep expertise in disease pathology, \
                 treatment algorithms, biomarkers, and patient journey mapping. Provide \
                 comprehensive, accurate, and structured analysis suitable for pharmaceutical \
                 forecasting models."
            .into(),
        user: format!(
            "Please provide a comprehensive analysis of the {therapy_area} therapy \
             area{product_info}.\n\n\
             Structure your response in exactly 5 sections with clear headers:\n\n\
             ## DISEASE SUMMARY\n\
             [Overview of the disease/condition, epidemiology, prevalence, and key clinical \
             characteristics]\n\n\
             ## STAGING\n\
             [The disease staging system, progression stages, and clinical classifications \
             used]\n\n\
             ## BIOMARKERS\n\
             [Key biomarkers, diagnostic markers, prognostic indicators, and companion \
             diagnostics]\n\n\
             ## TREATMENT ALGORITHM\n\
             [Current treatment pathways, standard of care, decision points, and treatment \
             sequencing]\n\n\
             ## PATIENT JOURNEY\n\
             [The complete patient journey from symptoms to diagnosis to treatment and \
             follow-up care]\n\n\
             Focus on current medical standards and include relevant clinical data where \
             appropriate."
        ),
        max_tokens: 4096,
    }
}

/// Patient-flow funnel with the canonical six-stage JSON structure.
pub fn patient_flow_funnel(therapy_area: &str, analysis: &TherapyAreaAnalysis) -> Prompt {
    Prompt {
        system: "You are a pharmaceutical forecasting expert specializing in patient flow \
                 modeling and market analysis. Create detailed patient flow funnels suitable \
                 for pharmaceutical forecasting models based on therapy area analysis."
            .into(),
        user: format!(
            "Based on the following therapy area analysis for {therapy_area}, create a \
             comprehensive patient flow funnel suitable for pharmaceutical forecasting:\n\n\
             THERAPY AREA: {therapy_area}\n\
             DISEASE SUMMARY: {summary}\n\
             TREATMENT ALGORITHM: {algorithm}\n\
             PATIENT JOURNEY: {journey}\n\n\
             Provide your response in exactly this JSON structure:\n\n\
             {{\n\
               \"funnel_stages\": [\n\
                 {{\"stage\": \"Total Population at Risk\", \"description\": \"Overall population \
                 that could develop this condition\", \"percentage\": \"100%\", \"notes\": \"Base \
                 population estimates\"}},\n\
                 {{\"stage\": \"Disease Incidence/Prevalence\", \"description\": \"Population that \
                 develops or has the condition\", \"percentage\": \"X%\", \"notes\": \
                 \"Epidemiological data\"}},\n\
                 {{\"stage\": \"Diagnosis Rate\", \"description\": \"Patients who get properly \
                 diagnosed\", \"percentage\": \"X%\", \"notes\": \"Diagnosis challenges and \
                 rates\"}},\n\
                 {{\"stage\": \"Treatment Eligible\", \"description\": \"Diagnosed patients \
                 eligible for treatment\", \"percentage\": \"X%\", \"notes\": \"Contraindications \
                 and eligibility criteria\"}},\n\
                 {{\"stage\": \"Treated Patients\", \"description\": \"Patients actually receiving \
                 treatment\", \"percentage\": \"X%\", \"notes\": \"Treatment uptake and access\"}},\n\
                 {{\"stage\": \"Target Patient Population\", \"description\": \"Specific target for \
                 your therapy/product\", \"percentage\": \"X%\", \"notes\": \"Specific targeting \
                 criteria\"}}\n\
               ],\n\
               \"total_addressable_population\": \"Detailed TAM analysis with numbers and \
               rationale\",\n\
               \"forecasting_notes\": \"Key assumptions, market dynamics, competitive landscape \
               considerations, and forecasting methodology recommendations\"\n\
             }}\n\n\
             Fill in realistic percentages and detailed descriptions based on current medical \
             literature and market data for {therapy_area}.",
            summary = excerpt(&analysis.disease_summary, 500),
            algorithm = excerpt(&analysis.treatment_algorithm, 500),
            journey = excerpt(&analysis.patient_journey, 500),
        ),
        max_tokens: 4096,
    }
}

/// Free-text competitive brief, parsed heuristically.
pub fn competitive_analysis(therapy_area: &str) -> Prompt {
    Prompt {
        system: "You are a pharmaceutical competitive intelligence analyst with expertise in \
                 market dynamics and competitive positioning."
            .into(),
        user: format!(
            "Conduct a comprehensive competitive analysis for the {therapy_area} therapy \
             area.\n\n\
             Provide a structured analysis covering:\n\n\
             1. MAJOR COMPETITORS: List the top 5-7 companies/products in this space with:\n\
                - Company name\n\
                - Key products/drugs\n\
                - Estimated market share\n\
                - Main strengths\n\
                - Key weaknesses\n\n\
             2. MARKET DYNAMICS: Current market trends, growth drivers, challenges\n\n\
             3. PIPELINE ANALYSIS: Key drugs in development (Phase II/III)\n\n\
             4. COMPETITIVE POSITIONING: How different players differentiate\n\n\
             5. UPCOMING CATALYSTS: Key events, approvals, patent expiries in next 2 years\n\n\
             Be specific with actual company names, drug names, and real market data where \
             possible. Focus on providing actionable competitive intelligence."
        ),
        max_tokens: 3072,
    }
}

/// Regulatory intelligence as a JSON object.
pub fn regulatory_intelligence(therapy_area: &str) -> Prompt {
    Prompt {
        system: "You are a regulatory affairs expert specializing in pharmaceutical approvals \
                 and market access."
            .into(),
        user: format!(
            "Provide comprehensive regulatory intelligence for {therapy_area} including:\n\n\
             1. Key regulatory pathways (FDA, EMA, other major markets)\n\
             2. Recent approvals and rejections in this space\n\
             3. Regulatory trends and guidance updates\n\
             4. Timeline expectations for new therapies\n\
             5. Market access considerations and reimbursement landscape\n\n\
             Structure as JSON with these sections: pathways, recent_activity, trends, \
             timelines, market_access"
        ),
        max_tokens: 2048,
    }
}

/// Risk assessment as a JSON object with per-category levels.
pub fn risk_assessment(therapy_area: &str) -> Prompt {
    Prompt {
        system: "You are a pharmaceutical risk assessment expert specializing in clinical, \
                 regulatory, and commercial risk analysis."
            .into(),
        user: format!(
            "Based on the therapy area analysis for {therapy_area}, assess key risks across:\n\n\
             1. Clinical Risks (efficacy, safety, trial design, endpoints)\n\
             2. Regulatory Risks (approval pathways, requirements, precedents)\n\
             3. Commercial Risks (competition, market access, pricing pressure)\n\
             4. Operational Risks (manufacturing, supply chain, partnerships)\n\
             5. Market Risks (market size, adoption, reimbursement)\n\n\
             For each category, provide: high/medium/low risk level and key factors.\n\
             Structure as JSON with risk categories and overall risk score (1-10)"
        ),
        max_tokens: 2048,
    }
}

/// Multi-scenario forecast as a JSON object keyed by scenario name.
pub fn scenario_models(therapy_area: &str, scenarios: &[String]) -> Prompt {
    let scenario_list = scenarios.join(", ");
    Prompt {
        system: "You are a pharmaceutical forecasting expert specializing in scenario modeling \
                 and market projections."
            .into(),
        user: format!(
            "Create detailed forecasting scenarios for {therapy_area} across: \
             {scenario_list}.\n\n\
             For each scenario, provide:\n\
             1. Key assumptions (market penetration, pricing, competition)\n\
             2. 6-year revenue projections (2024-2029) in millions USD\n\
             3. Peak sales estimates\n\
             4. Market share trajectory\n\
             5. Key success/failure factors\n\n\
             Structure as JSON with scenario names as keys, each containing:\n\
             - assumptions: list of key assumptions\n\
             - projections: array of 6 annual revenue numbers\n\
             - peak_sales: number\n\
             - market_share_trajectory: array of 6 percentages\n\
             - key_factors: list of critical success factors"
        ),
        max_tokens: 3072,
    }
}
