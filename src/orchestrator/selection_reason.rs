//! `engine_selection_reason`: a structured explanation of why an engine was
//! picked, built for the caller's UI rather than internal bookkeeping.

use serde::Serialize;

use crate::analyzer::SiteAnalysis;

#[derive(Debug, Clone, Serialize)]
pub struct SiteCharacteristics {
    pub site_type: String,
    pub js_complexity: String,
    pub js_complexity_score: u32,
    pub anti_bot_risk: String,
    pub requires_js_execution: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct EngineSelectionReason {
    pub selected_engine: String,
    pub confidence: f64,
    pub analysis_method: &'static str,
    pub site_characteristics: Option<SiteCharacteristics>,
    pub reasons: Vec<String>,
    pub attempted_engines: Vec<String>,
    pub success_on_attempt: usize,
}

impl EngineSelectionReason {
    #[must_use]
    pub fn build(
        selected_engine: &str,
        analysis: Option<&SiteAnalysis>,
        is_fallback: bool,
        attempted_engines: &[String],
        success_on_attempt: usize,
    ) -> Self {
        let analysis_method = if is_fallback { "fallback" } else { "ai-driven" };
        let confidence = if is_fallback { 0.0 } else { 1.0 };

        let (site_characteristics, reasons) = match analysis {
            Some(analysis) => {
                let mut reasons = Vec::new();
                if analysis.spa_score >= 70 {
                    reasons.push(format!("SPA score {} crossed the complex_spa threshold (70)", analysis.spa_score));
                } else if analysis.spa_score >= 40 {
                    reasons.push(format!("SPA score {} crossed the standard_dynamic threshold (40)", analysis.spa_score));
                }
                if analysis.requires_js_execution {
                    reasons.push(format!("JS complexity score {} requires execution", analysis.js_complexity_score));
                }
                if analysis.anti_bot_score > 0 {
                    reasons.push(format!("anti-bot score {} ({:?})", analysis.anti_bot_score, analysis.anti_bot_risk));
                }
                if reasons.is_empty() {
                    reasons.push("no elevated signals; default engine priority applied".to_string());
                }

                let characteristics = SiteCharacteristics {
                    site_type: analysis.site_type.as_str().to_string(),
                    js_complexity: format!("{:?}", analysis.js_complexity).to_lowercase(),
                    js_complexity_score: analysis.js_complexity_score,
                    anti_bot_risk: format!("{:?}", analysis.anti_bot_risk).to_lowercase(),
                    requires_js_execution: analysis.requires_js_execution,
                };

                (Some(characteristics), reasons)
            }
            None => (None, vec!["site analysis unavailable; URL-heuristic fallback used".to_string()]),
        };

        Self {
            selected_engine: selected_engine.to_string(),
            confidence,
            analysis_method,
            site_characteristics,
            reasons,
            attempted_engines: attempted_engines.to_vec(),
            success_on_attempt,
        }
    }
}
