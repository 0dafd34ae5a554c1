//! Premium-SaaS engine adapter: delegates the fetch itself to a hosted
//! scraping service (Firecrawl) so anti-bot evasion and JS rendering happen
//! upstream. Disables itself without an API key.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::time::{Duration, Instant};

use crate::crawl_engine::{CrawlResult, CrawlStrategy};
use crate::engines::{hierarchy, quality, stats::EngineStats, EngineAdapter, EngineCapability};

const FIRECRAWL_SCRAPE_URL: &str = "https://api.firecrawl.dev/v1/scrape";

pub struct PremiumEngine {
    client: reqwest::Client,
    api_key: Option<String>,
    stats: EngineStats,
}

impl PremiumEngine {
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            stats: EngineStats::new(),
        }
    }

    async fn scrape(&self, api_key: &str, url: &str, timeout: Duration) -> anyhow::Result<Value> {
        let body = json!({
            "url": url,
            "formats": ["markdown", "html"],
        });

        let response = self
            .client
            .post(FIRECRAWL_SCRAPE_URL)
            .bearer_auth(api_key)
            .json(&body)
            .timeout(timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("premium service returned HTTP {}", response.status());
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl EngineAdapter for PremiumEngine {
    fn name(&self) -> &str {
        "premium_scraper"
    }

    async fn initialize(&self) -> anyhow::Result<()> {
        if self.api_key.is_none() {
            tracing::warn!("premium_scraper: no FIRECRAWL_API_KEY configured, engine disabled");
            anyhow::bail!("missing FIRECRAWL_API_KEY");
        }
        self.stats.mark_initialized(true);
        Ok(())
    }

    async fn cleanup(&self) {
        self.stats.mark_initialized(false);
    }

    fn capabilities(&self) -> Vec<EngineCapability> {
        vec![
            EngineCapability::PremiumService,
            EngineCapability::AntiBotBypass,
            EngineCapability::JavascriptRendering,
        ]
    }

    fn stats(&self) -> &EngineStats {
        &self.stats
    }

    async fn crawl(&self, url: &str, strategy: &CrawlStrategy) -> CrawlResult {
        let started = Instant::now();

        let Some(api_key) = self.api_key.clone() else {
            let mut metadata = Map::new();
            metadata.insert("crawler_used".to_string(), "premium_scraper".into());
            metadata.insert("error_type".to_string(), "missing_credentials".into());
            return CrawlResult::failure(url, "premium engine has no API key configured", metadata);
        };

        let payload = match self
            .scrape(&api_key, url, Duration::from_secs(strategy.timeout))
            .await
        {
            Ok(payload) => payload,
            Err(e) => {
                let mut metadata = Map::new();
                metadata.insert("crawler_used".to_string(), "premium_scraper".into());
                metadata.insert("error_type".to_string(), "request_failed".into());
                return CrawlResult::failure(url, e.to_string(), metadata);
            }
        };

        let data = payload.get("data").unwrap_or(&payload);
        let text = data
            .get("markdown")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let html = data.get("html").and_then(Value::as_str).unwrap_or_default();
        let title = data
            .get("metadata")
            .and_then(|m| m.get("title"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        if text.is_empty() {
            let mut metadata = Map::new();
            metadata.insert("crawler_used".to_string(), "premium_scraper".into());
            metadata.insert("error_type".to_string(), "empty_response".into());
            return CrawlResult::failure(url, "premium service returned no content", metadata);
        }

        let hierarchy = if html.is_empty() {
            hierarchy::extract_from_markdown(&text, &title)
        } else {
            hierarchy::extract_from_html(html, &title)
        };

        let has_description = data
            .get("metadata")
            .and_then(|m| m.get("description"))
            .and_then(Value::as_str)
            .is_some_and(|d| !d.is_empty());
        let score = quality::score(55, &text, !title.is_empty(), has_description);
        let elapsed = started.elapsed();

        let mut metadata = Map::new();
        metadata.insert("crawler_used".to_string(), "premium_scraper".into());
        metadata.insert("processing_time".to_string(), format!("{:.1}s", elapsed.as_secs_f64()).into());
        metadata.insert("execution_time".to_string(), elapsed.as_secs_f64().into());
        metadata.insert("quality_score".to_string(), score.into());
        metadata.insert("content_quality".to_string(), quality::content_quality_for(score).as_str().into());
        metadata.insert("extraction_confidence".to_string(), (f64::from(score) / 100.0).into());
        metadata.insert("text_length".to_string(), text.len().into());
        metadata.insert("premium".to_string(), json!({ "provider": "firecrawl" }));

        let result = CrawlResult::success(url, title, text, hierarchy, metadata);
        if html.is_empty() {
            result
        } else {
            result.with_raw_html(html.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initialize_fails_without_api_key() {
        let engine = PremiumEngine::new(None);
        assert!(engine.initialize().await.is_err());
    }

    #[tokio::test]
    async fn crawl_fails_cleanly_without_api_key() {
        let engine = PremiumEngine::new(None);
        let strategy = CrawlStrategy::default();
        let result = engine.crawl("https://example.com", &strategy).await;
        assert!(!result.is_success());
    }
}
