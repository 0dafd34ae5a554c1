//! Orchestrator: the single `crawl(url, override_strategy?) -> CrawlResult`
//! entry point. Resolves a strategy (analyzer + strategy builder, or a
//! caller-supplied override), then runs engines in priority order until one
//! succeeds or the list is exhausted.

mod selection_reason;

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Instant;

use crate::analyzer::{SiteAnalysis, SiteAnalyzer};
use crate::crawl_engine::{CrawlResult, CrawlStatus, CrawlStrategy};
use crate::engines::registry::EngineRegistry;
use crate::strategy::{build_strategy, classify_by_url_heuristic};

pub use selection_reason::EngineSelectionReason;

/// Conservative host-label regex: letters/digits/hyphens separated by dots,
/// at least one dot, no leading/trailing hyphen per label.
fn host_label_regex() -> Regex {
    Regex::new(r"^([a-zA-Z0-9]([a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}$")
        .expect("static host-label pattern is valid")
}

fn validate_url(url: &str) -> Result<(), String> {
    if url.trim().is_empty() || url.trim() == "#" {
        return Err("URL is empty".to_string());
    }

    let parsed = url::Url::parse(url).map_err(|e| format!("invalid URL: {e}"))?;

    match parsed.scheme() {
        "http" | "https" => {}
        "javascript" => return Err("unsupported scheme: javascript:".to_string()),
        "mailto" => return Err("unsupported scheme: mailto:".to_string()),
        other => return Err(format!("unsupported scheme: {other}:")),
    }

    let host = parsed.host_str().ok_or_else(|| "URL has no host".to_string())?;
    if !host_label_regex().is_match(host) {
        return Err(format!("host '{host}' does not look like a valid hostname"));
    }

    Ok(())
}

pub struct Orchestrator {
    registry: Arc<EngineRegistry>,
    analyzer: SiteAnalyzer,
}

impl Orchestrator {
    #[must_use]
    pub fn new(registry: Arc<EngineRegistry>) -> Self {
        Self { registry, analyzer: SiteAnalyzer::new() }
    }

    /// Resolve a strategy via the Site Analyzer + Strategy Builder, falling
    /// back to the URL heuristic when the sample fetch fails.
    async fn resolve_strategy(&self, url: &str) -> (CrawlStrategy, Option<SiteAnalysis>, bool) {
        match self.analyzer.analyze(url).await {
            Ok(analysis) => {
                let built = build_strategy(analysis.site_type, &self.registry, false);
                (built.strategy, Some(analysis), false)
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "site analysis failed, using URL heuristic");
                let site_type = classify_by_url_heuristic(url);
                let built = build_strategy(site_type, &self.registry, true);
                (built.strategy, None, true)
            }
        }
    }

    /// Run the full crawl: validate, resolve strategy (or use `override_strategy`
    /// if given), then try engines in priority order until one succeeds.
    pub async fn crawl(&self, url: &str, override_strategy: Option<CrawlStrategy>) -> CrawlResult {
        if let Err(reason) = validate_url(url) {
            let mut metadata = Map::new();
            metadata.insert("error_type".to_string(), "invalid_url".into());
            return CrawlResult::failure(url, reason, metadata);
        }

        let (strategy, analysis, is_fallback) = match override_strategy {
            Some(strategy) => (strategy, None, false),
            None => self.resolve_strategy(url).await,
        };

        let total_available_engines = self.registry.available_names().len();
        let mut attempted_engines: Vec<String> = Vec::new();
        let mut last_error = String::new();

        for (index, engine_name) in strategy.engine_priority.iter().enumerate() {
            let Some(engine) = self.registry.get(engine_name) else {
                tracing::warn!(engine = engine_name.as_str(), "engine not in registry, skipping");
                continue;
            };

            attempted_engines.push(engine_name.clone());
            let started = Instant::now();
            let mut result = engine.crawl_with_retry(url, &strategy).await;
            let elapsed = started.elapsed();

            if result.status == CrawlStatus::Complete {
                let reason = EngineSelectionReason::build(
                    engine_name,
                    analysis.as_ref(),
                    is_fallback,
                    &attempted_engines,
                    index + 1,
                );

                result.metadata.insert("attempted_engines".to_string(), attempted_engines.clone().into());
                result.metadata.insert("successful_engine_index".to_string(), (index + 1).into());
                result.metadata.insert("total_available_engines".to_string(), total_available_engines.into());
                result.metadata.insert("engine_used".to_string(), engine_name.clone().into());
                result.metadata.insert("processing_time".to_string(), format!("{:.1}s", elapsed.as_secs_f64()).into());
                result.metadata.insert("execution_time".to_string(), elapsed.as_secs_f64().into());
                if let Some(analysis) = &analysis {
                    result
                        .metadata
                        .insert("mcp_analysis".to_string(), serde_json::to_value(analysis).unwrap_or(Value::Null));
                }
                result.metadata.insert(
                    "engine_selection_reason".to_string(),
                    serde_json::to_value(&reason).unwrap_or(Value::Null),
                );

                return result;
            }

            last_error = result.error.clone().unwrap_or_else(|| "unknown engine error".to_string());
            tracing::debug!(engine = engine_name.as_str(), error = %last_error, "engine failed, trying next");
        }

        let mut metadata = Map::new();
        metadata.insert("attempted_engines".to_string(), attempted_engines.into());
        metadata.insert("all_engines_failed".to_string(), true.into());
        CrawlResult::failure(
            url,
            if last_error.is_empty() { "no engines available in registry".to_string() } else { last_error },
            metadata,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_javascript_scheme() {
        assert!(validate_url("javascript:alert(1)").is_err());
    }

    #[test]
    fn rejects_mailto_scheme() {
        assert!(validate_url("mailto:a@b.com").is_err());
    }

    #[test]
    fn rejects_bare_anchor() {
        assert!(validate_url("#").is_err());
    }

    #[test]
    fn accepts_plain_https_url() {
        assert!(validate_url("https://example.com/path").is_ok());
    }

    #[tokio::test]
    async fn crawl_fails_fast_on_invalid_url() {
        let registry = Arc::new(EngineRegistry::build(&crate::config::AppConfig::default()).await);
        let orchestrator = Orchestrator::new(registry);
        let result = orchestrator.crawl("javascript:void(0)", None).await;
        assert!(!result.is_success());
        assert!(result.error.is_some());
    }
}
