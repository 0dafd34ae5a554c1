//! Site Analyzer: samples a URL and classifies it along three independent
//! axes (site type, JS complexity, anti-bot risk) so the Strategy Builder can
//! pick an engine priority without guessing.

mod patterns;

use serde::Serialize;
use std::time::Duration;

use crate::utils::constants::CHROME_USER_AGENT;

pub use patterns::{AntiBotRisk, ContentLoadingPattern, JsComplexity, SiteType};

/// Supplemental, diagnostics-only signals: never consulted by the
/// recommendation itself.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceIndicators {
    pub estimated_html_size: usize,
    pub script_heavy: bool,
    pub image_heavy: bool,
    pub external_resource_count: usize,
    pub domain: String,
    pub likely_cdn: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionHints {
    pub bypass_strategy: &'static str,
    pub wait_for_js: bool,
    pub scroll_needed: bool,
    pub interaction_needed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteAnalysis {
    pub url: String,
    pub site_type: SiteType,
    pub spa_score: u32,
    pub js_complexity: JsComplexity,
    pub js_complexity_score: u32,
    pub requires_js_execution: bool,
    pub anti_bot_risk: AntiBotRisk,
    pub anti_bot_score: u32,
    pub content_loading_patterns: Vec<ContentLoadingPattern>,
    pub performance: PerformanceIndicators,
    pub extraction_hints: ExtractionHints,
}

/// Raised when the sample fetch itself fails (403, network error, …). The
/// Strategy Builder catches this and falls back to its URL heuristic.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("sample fetch failed: {0}")]
    FetchFailed(String),
}

pub struct SiteAnalyzer {
    client: reqwest::Client,
}

impl SiteAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(CHROME_USER_AGENT)
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self { client }
    }

    /// Fetch a sample of `url` and classify it. Returns `AnalyzerError` if the
    /// sample itself cannot be fetched — callers fall back to the URL heuristic.
    pub async fn analyze(&self, url: &str) -> Result<SiteAnalysis, AnalyzerError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AnalyzerError::FetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AnalyzerError::FetchFailed(format!("HTTP {}", response.status())));
        }

        let headers = response.headers().clone();
        let html = response
            .text()
            .await
            .map_err(|e| AnalyzerError::FetchFailed(e.to_string()))?;

        Ok(self.classify(url, &html, &headers))
    }

    fn classify(&self, url: &str, html: &str, headers: &reqwest::header::HeaderMap) -> SiteAnalysis {
        let spa_score = patterns::spa_score(html);
        let site_type = patterns::site_type_for(spa_score);

        let js_complexity_score = patterns::js_complexity_score(html);
        let js_complexity = patterns::js_complexity_for(js_complexity_score);
        let requires_js_execution = js_complexity_score > 30;

        let anti_bot_indicators = patterns::anti_bot_indicator_count(html, headers);
        let anti_bot_score = anti_bot_indicators * 25;
        let anti_bot_risk = patterns::anti_bot_risk_for(anti_bot_score);

        let content_loading_patterns = patterns::content_loading_patterns(html);

        let domain = url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();

        let performance = PerformanceIndicators {
            estimated_html_size: html.len(),
            script_heavy: html.matches("<script").count() > 20,
            image_heavy: html.matches("<img").count() > 50,
            external_resource_count: patterns::external_resource_count(html),
            likely_cdn: domain.contains("cdn") || domain.contains("static") || domain.contains("assets"),
            domain,
        };

        let bypass_strategy = match anti_bot_risk {
            AntiBotRisk::Low => "standard_headers",
            AntiBotRisk::Medium => "rotating_user_agents",
            AntiBotRisk::High => "premium_proxy_rotation",
            AntiBotRisk::VeryHigh => "professional_service_required",
        };

        let extraction_hints = ExtractionHints {
            bypass_strategy,
            wait_for_js: requires_js_execution,
            scroll_needed: content_loading_patterns.contains(&ContentLoadingPattern::InfiniteScroll),
            interaction_needed: content_loading_patterns.contains(&ContentLoadingPattern::RequiresInteraction),
        };

        SiteAnalysis {
            url: url.to_string(),
            site_type,
            spa_score,
            js_complexity,
            js_complexity_score,
            requires_js_execution,
            anti_bot_risk,
            anti_bot_score,
            content_loading_patterns,
            performance,
            extraction_hints,
        }
    }
}

impl Default for SiteAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_simple_static_html() {
        let analyzer = SiteAnalyzer::new();
        let html = "<html><body><p>Hello world</p></body></html>";
        let analysis = analyzer.classify("https://example.com", html, &reqwest::header::HeaderMap::new());
        assert_eq!(analysis.site_type, SiteType::SimpleStatic);
        assert_eq!(analysis.anti_bot_risk, AntiBotRisk::Low);
    }

    #[test]
    fn classify_next_js_app_as_complex_spa() {
        let analyzer = SiteAnalyzer::new();
        let html = r#"<html><body><div id="__next"></div><script>window.__NEXT_DATA__ = {}</script></body></html>"#;
        let analysis = analyzer.classify("https://example.com", html, &reqwest::header::HeaderMap::new());
        assert_eq!(analysis.site_type, SiteType::ComplexSpa);
    }

    #[test]
    fn cloudflare_header_raises_anti_bot_risk() {
        let analyzer = SiteAnalyzer::new();
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("cf-ray", "abc123".parse().unwrap());
        let analysis = analyzer.classify("https://example.com", "<html></html>", &headers);
        assert!(analysis.anti_bot_score >= 25);
    }
}
