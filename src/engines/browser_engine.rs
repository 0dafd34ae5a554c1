//! Headless-browser engine adapter: renders JavaScript-heavy pages via a
//! pooled Chrome instance, polling page state instead of waiting on a single
//! network-idle event.

use async_trait::async_trait;
use serde_json::{json, Map};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::browser_pool::{BrowserPool, BrowserPoolConfig};
use crate::content_saver::markdown_converter::{convert_html_to_markdown, ConversionOptions};
use crate::crawl_engine::{CrawlResult, CrawlStrategy};
use crate::engines::{hierarchy, quality, stats::EngineStats, EngineAdapter, EngineCapability};

const POLL_INTERVAL: Duration = Duration::from_secs(1);
const IDLE_SAMPLES_REQUIRED: u32 = 3;

pub struct BrowserEngine {
    pool: Arc<BrowserPool>,
    stats: EngineStats,
}

impl BrowserEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pool: BrowserPool::new(BrowserPoolConfig::default()),
            stats: EngineStats::new(),
        }
    }

    /// Sample page state at ~1s intervals. Exit once inactivity has lasted
    /// `activity_timeout`, the document has been idle for at least
    /// `IDLE_SAMPLES_REQUIRED` consecutive samples and `readyState == complete`,
    /// or `max_total_time` elapses.
    async fn wait_until_settled(
        page: &chromiumoxide::Page,
        activity_timeout: Duration,
        max_total_time: Duration,
    ) -> anyhow::Result<()> {
        let started = Instant::now();
        let mut last_len = 0usize;
        let mut last_change = Instant::now();
        let mut idle_samples = 0u32;

        loop {
            if started.elapsed() >= max_total_time {
                return Ok(());
            }

            tokio::time::sleep(POLL_INTERVAL).await;

            let html_len = page
                .content()
                .await
                .map(|html| html.len())
                .unwrap_or(last_len);

            let ready_state: String = page
                .evaluate("document.readyState")
                .await
                .ok()
                .and_then(|r| r.into_value().ok())
                .unwrap_or_default();

            if html_len.abs_diff(last_len) > 1024 {
                last_change = Instant::now();
                idle_samples = 0;
            } else {
                idle_samples += 1;
            }
            last_len = html_len;

            let inactive_for = last_change.elapsed();
            if inactive_for >= activity_timeout
                && idle_samples >= IDLE_SAMPLES_REQUIRED
                && ready_state == "complete"
            {
                return Ok(());
            }
        }
    }
}

impl Default for BrowserEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EngineAdapter for BrowserEngine {
    fn name(&self) -> &str {
        "playwright"
    }

    async fn initialize(&self) -> anyhow::Result<()> {
        self.pool.start().await?;
        self.stats.mark_initialized(true);
        Ok(())
    }

    async fn cleanup(&self) {
        let _ = self.pool.shutdown().await;
        self.stats.mark_initialized(false);
    }

    fn capabilities(&self) -> Vec<EngineCapability> {
        vec![
            EngineCapability::JavascriptRendering,
            EngineCapability::InfiniteScroll,
            EngineCapability::AntiBotBypass,
        ]
    }

    fn stats(&self) -> &EngineStats {
        &self.stats
    }

    async fn crawl(&self, url: &str, strategy: &CrawlStrategy) -> CrawlResult {
        let started = Instant::now();

        let guard = match self.pool.acquire().await {
            Ok(guard) => guard,
            Err(e) => {
                let mut metadata = Map::new();
                metadata.insert("crawler_used".to_string(), "playwright".into());
                metadata.insert("error_type".to_string(), "browser_unavailable".into());
                return CrawlResult::failure(url, format!("page goto failed: {e}"), metadata);
            }
        };

        let navigation = tokio::time::timeout(
            Duration::from_secs(strategy.timeout),
            guard.browser().new_page(url),
        )
        .await;

        let page = match navigation {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                let mut metadata = Map::new();
                metadata.insert("crawler_used".to_string(), "playwright".into());
                metadata.insert("error_type".to_string(), "navigation_failed".into());
                return CrawlResult::failure(url, format!("page goto failed: {e}"), metadata);
            }
            Err(_elapsed) => {
                let mut metadata = Map::new();
                metadata.insert("crawler_used".to_string(), "playwright".into());
                metadata.insert("error_type".to_string(), "connection_timeout".into());
                return CrawlResult::failure(url, "connection timeout exceeded", metadata);
            }
        };

        if let Err(e) = Self::wait_until_settled(
            &page,
            Duration::from_secs(strategy.activity_timeout),
            Duration::from_secs(strategy.max_total_time),
        )
        .await
        {
            tracing::debug!(error = %e, "page settle wait ended early");
        }

        let html = match page.content().await {
            Ok(html) => html,
            Err(e) => {
                let mut metadata = Map::new();
                metadata.insert("crawler_used".to_string(), "playwright".into());
                metadata.insert("error_type".to_string(), "content_extraction_failed".into());
                return CrawlResult::failure(url, e.to_string(), metadata);
            }
        };

        let title = page.get_title().await.ok().flatten().unwrap_or_default();

        let options = ConversionOptions {
            base_url: Some(url.to_string()),
            ..Default::default()
        };
        let text = match convert_html_to_markdown(&html, &options).await {
            Ok(markdown) => markdown,
            Err(e) => {
                let mut metadata = Map::new();
                metadata.insert("crawler_used".to_string(), "playwright".into());
                metadata.insert("error_type".to_string(), "conversion_failed".into());
                return CrawlResult::failure(url, e.to_string(), metadata);
            }
        };

        let hierarchy = hierarchy::extract_from_html(&html, &title);
        let score = quality::score(45, &text, !title.is_empty(), html.contains("og:description"));
        let elapsed = started.elapsed();

        let mut metadata = Map::new();
        metadata.insert("crawler_used".to_string(), "playwright".into());
        metadata.insert("processing_time".to_string(), format!("{:.1}s", elapsed.as_secs_f64()).into());
        metadata.insert("execution_time".to_string(), elapsed.as_secs_f64().into());
        metadata.insert("quality_score".to_string(), score.into());
        metadata.insert("content_quality".to_string(), quality::content_quality_for(score).as_str().into());
        metadata.insert("extraction_confidence".to_string(), (f64::from(score) / 100.0).into());
        metadata.insert("text_length".to_string(), text.len().into());
        metadata.insert("browser".to_string(), json!({ "anti_bot_mode": strategy.anti_bot_mode }));

        CrawlResult::success(url, title, text, hierarchy, metadata).with_raw_html(html)
    }
}
