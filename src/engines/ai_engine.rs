//! AI-assisted engine adapter: fetches raw HTML itself, then hands it to a
//! chat-completions model to pull out a cleaned document. Disables itself
//! (fails `initialize`) without an API key rather than crawling half-blind.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::time::{Duration, Instant};

use crate::crawl_engine::{CrawlResult, CrawlStrategy};
use crate::engines::{hierarchy, quality, stats::EngineStats, EngineAdapter, EngineCapability};
use crate::utils::constants::CHROME_USER_AGENT;

const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o-mini";
const SYSTEM_PROMPT: &str = "You extract the main readable content from a web page's HTML. \
Reply with clean markdown only: a single top-level title followed by the body text, \
preserving heading structure. Drop navigation, ads, and boilerplate.";

pub struct AiEngine {
    client: reqwest::Client,
    api_key: Option<String>,
    stats: EngineStats,
}

impl AiEngine {
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(CHROME_USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { client, api_key, stats: EngineStats::new() }
    }

    async fn fetch_html(&self, url: &str, timeout: Duration) -> anyhow::Result<String> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("HTTP {}", response.status());
        }
        Ok(response.text().await?)
    }

    async fn summarize(&self, api_key: &str, html: &str, timeout: Duration) -> anyhow::Result<String> {
        let truncated: String = html.chars().take(24_000).collect();
        let body = json!({
            "model": MODEL,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": truncated },
            ],
            "temperature": 0.2,
        });

        let response = self
            .client
            .post(OPENAI_CHAT_COMPLETIONS_URL)
            .bearer_auth(api_key)
            .json(&body)
            .timeout(timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("AI provider returned HTTP {}", response.status());
        }

        let payload: Value = response.json().await?;
        payload
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("AI provider response missing choices[0].message.content"))
    }
}

#[async_trait]
impl EngineAdapter for AiEngine {
    fn name(&self) -> &str {
        "ai_crawler"
    }

    async fn initialize(&self) -> anyhow::Result<()> {
        if self.api_key.is_none() {
            tracing::warn!("ai_crawler: no OPENAI_API_KEY configured, engine disabled");
            anyhow::bail!("missing OPENAI_API_KEY");
        }
        self.stats.mark_initialized(true);
        Ok(())
    }

    async fn cleanup(&self) {
        self.stats.mark_initialized(false);
    }

    fn capabilities(&self) -> Vec<EngineCapability> {
        vec![EngineCapability::AiExtraction, EngineCapability::AntiBotBypass]
    }

    fn stats(&self) -> &EngineStats {
        &self.stats
    }

    async fn crawl(&self, url: &str, strategy: &CrawlStrategy) -> CrawlResult {
        let started = Instant::now();

        let Some(api_key) = self.api_key.clone() else {
            let mut metadata = Map::new();
            metadata.insert("crawler_used".to_string(), "ai_crawler".into());
            metadata.insert("error_type".to_string(), "missing_credentials".into());
            return CrawlResult::failure(url, "AI engine has no API key configured", metadata);
        };

        let timeout = Duration::from_secs(strategy.timeout);

        let html = match self.fetch_html(url, timeout).await {
            Ok(html) => html,
            Err(e) => {
                let mut metadata = Map::new();
                metadata.insert("crawler_used".to_string(), "ai_crawler".into());
                metadata.insert("error_type".to_string(), "request_failed".into());
                return CrawlResult::failure(url, e.to_string(), metadata);
            }
        };

        let text = match self.summarize(&api_key, &html, timeout).await {
            Ok(text) => text,
            Err(e) => {
                let mut metadata = Map::new();
                metadata.insert("crawler_used".to_string(), "ai_crawler".into());
                metadata.insert("error_type".to_string(), "ai_provider_failed".into());
                return CrawlResult::failure(url, e.to_string(), metadata);
            }
        };

        let title = text
            .lines()
            .find(|line| !line.trim().is_empty())
            .map(|line| line.trim_start_matches('#').trim().to_string())
            .unwrap_or_default();

        let hierarchy = hierarchy::extract_from_markdown(&text, &title);
        let score = quality::score(50, &text, !title.is_empty(), html.contains("description"));
        let elapsed = started.elapsed();

        let mut metadata = Map::new();
        metadata.insert("crawler_used".to_string(), "ai_crawler".into());
        metadata.insert("processing_time".to_string(), format!("{:.1}s", elapsed.as_secs_f64()).into());
        metadata.insert("execution_time".to_string(), elapsed.as_secs_f64().into());
        metadata.insert("quality_score".to_string(), score.into());
        metadata.insert("content_quality".to_string(), quality::content_quality_for(score).as_str().into());
        metadata.insert("extraction_confidence".to_string(), (f64::from(score) / 100.0).into());
        metadata.insert("text_length".to_string(), text.len().into());
        metadata.insert("ai".to_string(), json!({ "model": MODEL }));

        CrawlResult::success(url, title, text, hierarchy, metadata).with_raw_html(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn initialize_fails_without_api_key() {
        let engine = AiEngine::new(None);
        assert!(engine.initialize().await.is_err());
        assert!(!engine.stats().is_initialized());
    }

    #[tokio::test]
    async fn crawl_fails_cleanly_without_api_key() {
        let engine = AiEngine::new(None);
        let strategy = CrawlStrategy::default();
        let result = engine.crawl("https://example.com", &strategy).await;
        assert!(!result.is_success());
    }
}
