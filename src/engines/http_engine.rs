//! Plain HTTP engine adapter: fast static-page fetcher with activity-based
//! chunked reads.

use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::{json, Map};
use std::time::{Duration, Instant};

use crate::content_saver::markdown_converter::{convert_html_to_markdown, ConversionOptions};
use crate::crawl_engine::{CrawlResult, CrawlStrategy};
use crate::engines::{quality, hierarchy, stats::EngineStats, EngineAdapter, EngineCapability};
use crate::utils::constants::CHROME_USER_AGENT;

const CHUNK_SIZE_HINT: usize = 8 * 1024;

pub struct HttpEngine {
    client: reqwest::Client,
    stats: EngineStats,
}

impl HttpEngine {
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(CHROME_USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            stats: EngineStats::new(),
        }
    }

    /// Read the response body in bounded chunks, resetting an inactivity
    /// clock on every chunk; abort when silence exceeds `activity_timeout` or
    /// total elapsed time exceeds `max_total_time`. A partial buffer is kept
    /// (not discarded) when the ceiling is hit and bytes were already received.
    async fn read_with_activity_timeout(
        response: reqwest::Response,
        activity_timeout: Duration,
        max_total_time: Duration,
    ) -> anyhow::Result<String> {
        let started = Instant::now();
        let mut buffer: Vec<u8> = Vec::with_capacity(CHUNK_SIZE_HINT * 4);
        let mut stream = response.bytes_stream();

        loop {
            if started.elapsed() >= max_total_time {
                if buffer.is_empty() {
                    anyhow::bail!("max_total_time exceeded before any bytes were received");
                }
                break;
            }

            match tokio::time::timeout(activity_timeout, stream.next()).await {
                Ok(Some(Ok(chunk))) => buffer.extend_from_slice(&chunk),
                Ok(Some(Err(e))) => return Err(anyhow::anyhow!("stream read error: {e}")),
                Ok(None) => break,
                Err(_elapsed) => {
                    if buffer.is_empty() {
                        anyhow::bail!("activity timeout: no bytes received within {activity_timeout:?}");
                    }
                    tracing::debug!("activity timeout reached with partial buffer, returning what we have");
                    break;
                }
            }
        }

        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl Default for HttpEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EngineAdapter for HttpEngine {
    fn name(&self) -> &str {
        "requests"
    }

    async fn initialize(&self) -> anyhow::Result<()> {
        self.stats.mark_initialized(true);
        Ok(())
    }

    async fn cleanup(&self) {
        self.stats.mark_initialized(false);
    }

    fn capabilities(&self) -> Vec<EngineCapability> {
        vec![EngineCapability::FastStatic, EngineCapability::BulkProcessing]
    }

    fn stats(&self) -> &EngineStats {
        &self.stats
    }

    async fn crawl(&self, url: &str, strategy: &CrawlStrategy) -> CrawlResult {
        let started = Instant::now();

        let request = self
            .client
            .get(url)
            .timeout(Duration::from_secs(strategy.timeout));

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let mut metadata = Map::new();
                metadata.insert("crawler_used".to_string(), "requests".into());
                metadata.insert("error_type".to_string(), "request_failed".into());
                return CrawlResult::failure(url, e.to_string(), metadata);
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            let mut metadata = Map::new();
            metadata.insert("crawler_used".to_string(), "requests".into());
            metadata.insert("error_type".to_string(), "http_status".into());
            return CrawlResult::failure(url, format!("HTTP {status}"), metadata);
        }

        let html = match Self::read_with_activity_timeout(
            response,
            Duration::from_secs(strategy.activity_timeout),
            Duration::from_secs(strategy.max_total_time),
        )
        .await
        {
            Ok(html) => html,
            Err(e) => {
                let mut metadata = Map::new();
                metadata.insert("crawler_used".to_string(), "requests".into());
                metadata.insert("error_type".to_string(), "activity_timeout".into());
                return CrawlResult::failure(url, e.to_string(), metadata);
            }
        };

        let title = scraper::Html::parse_document(&html)
            .select(&scraper::Selector::parse("title").unwrap_or_else(|_| scraper::Selector::parse("x-none").unwrap()))
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let options = ConversionOptions {
            base_url: Some(url.to_string()),
            ..Default::default()
        };
        let text = match convert_html_to_markdown(&html, &options).await {
            Ok(markdown) => markdown,
            Err(e) => {
                let mut metadata = Map::new();
                metadata.insert("crawler_used".to_string(), "requests".into());
                metadata.insert("error_type".to_string(), "conversion_failed".into());
                return CrawlResult::failure(url, e.to_string(), metadata);
            }
        };

        let hierarchy = hierarchy::extract_from_html(&html, &title);
        let score = quality::score(40, &text, !title.is_empty(), html.contains("og:description") || html.contains("name=\"description\""));
        let elapsed = started.elapsed();

        let mut metadata = Map::new();
        metadata.insert("crawler_used".to_string(), "requests".into());
        metadata.insert("processing_time".to_string(), format!("{:.1}s", elapsed.as_secs_f64()).into());
        metadata.insert("execution_time".to_string(), elapsed.as_secs_f64().into());
        metadata.insert("quality_score".to_string(), score.into());
        metadata.insert("content_quality".to_string(), quality::content_quality_for(score).as_str().into());
        metadata.insert("extraction_confidence".to_string(), (f64::from(score) / 100.0).into());
        metadata.insert("text_length".to_string(), text.len().into());
        metadata.insert("http".to_string(), json!({ "html_bytes": html.len() }));

        CrawlResult::success(url, title, text, hierarchy, metadata).with_raw_html(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn crawl_fails_gracefully_on_unreachable_host() {
        let engine = HttpEngine::new();
        let strategy = CrawlStrategy {
            timeout: 1,
            activity_timeout: 1,
            max_total_time: 2,
            ..Default::default()
        };
        let result = engine.crawl("http://127.0.0.1:1", &strategy).await;
        assert!(!result.is_success());
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn crawl_converts_stubbed_page_and_keeps_raw_html() {
        let mut server = mockito::Server::new_async().await;
        let html = "<html><head><title>Stubbed Page</title></head>\
                    <body><h1>Stubbed Page</h1><p>hello from the mock.</p></body></html>";
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(html)
            .create_async()
            .await;

        let engine = HttpEngine::new();
        let strategy = CrawlStrategy::default();
        let result = engine.crawl(&server.url(), &strategy).await;

        mock.assert_async().await;
        assert!(result.is_success());
        assert_eq!(result.title, "Stubbed Page");
        assert!(result.text.contains("hello from the mock"));
        assert_eq!(result.raw_html.as_deref(), Some(html));
    }

    #[tokio::test]
    async fn crawl_reports_http_status_failure_from_stub() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/missing").with_status(404).create_async().await;

        let engine = HttpEngine::new();
        let strategy = CrawlStrategy::default();
        let url = format!("{}/missing", server.url());
        let result = engine.crawl(&url, &strategy).await;

        assert!(!result.is_success());
        assert!(result.error.as_deref().unwrap_or_default().contains("404"));
    }
}
