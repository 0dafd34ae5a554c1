//! Engine adapters: four concrete fetch strategies behind one uniform contract.

pub mod ai_engine;
pub mod browser_engine;
pub mod hierarchy;
pub mod http_engine;
pub mod premium_engine;
pub mod quality;
pub mod registry;
pub mod stats;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::crawl_engine::{is_permanent_error, retry_delay_secs, CrawlResult, CrawlStrategy};

/// Declarative capability tags used by the Strategy Builder to reason about engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineCapability {
    JavascriptRendering,
    AntiBotBypass,
    BulkProcessing,
    AiExtraction,
    FastStatic,
    PremiumService,
    InfiniteScroll,
    LoginSupport,
}

/// Snapshot of an adapter's health, returned by `health_check`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub initialized: bool,
    pub stats: stats::EngineStatsSnapshot,
    pub capabilities: Vec<EngineCapability>,
}

/// The uniform contract every concrete fetch strategy (HTTP, browser, AI, premium
/// SaaS) implements. Engines never propagate exceptions: failures become a
/// failed [`CrawlResult`].
#[async_trait]
pub trait EngineAdapter: Send + Sync {
    /// Stable engine name used in strategy priority lists and result metadata.
    fn name(&self) -> &str;

    /// Acquire backing resources (client handles, browser process, credentials).
    /// Returns an error if the backing capability cannot be reached; the
    /// registry then drops this engine rather than keeping it half-initialized.
    async fn initialize(&self) -> anyhow::Result<()>;

    /// Idempotent resource release.
    async fn cleanup(&self);

    /// Declarative capability tag set consulted by the Strategy Builder.
    fn capabilities(&self) -> Vec<EngineCapability>;

    /// Fetch `url` once, honoring `strategy`'s timeouts. Never panics or
    /// propagates an error outward: failures are encoded as a failed `CrawlResult`.
    async fn crawl(&self, url: &str, strategy: &CrawlStrategy) -> CrawlResult;

    /// Running per-engine counters for `health_check`.
    fn stats(&self) -> &stats::EngineStats;

    /// Wrap `crawl` with the shared retry policy: permanent errors abort
    /// immediately, everything else retries with exponential back-off up to
    /// `strategy.max_retries`.
    async fn crawl_with_retry(&self, url: &str, strategy: &CrawlStrategy) -> CrawlResult {
        let mut last_error = String::new();

        for attempt in 0..strategy.max_retries {
            let started = std::time::Instant::now();
            let result = self.crawl(url, strategy).await;

            if result.is_success() {
                self.stats().record(true, started.elapsed().as_secs_f64());
                return result;
            }

            last_error = result.error.clone().unwrap_or_else(|| "unknown engine error".to_string());

            if is_permanent_error(&last_error) {
                tracing::debug!(engine = self.name(), error = %last_error, "permanent error, not retrying");
                break;
            }

            if attempt + 1 < strategy.max_retries {
                let delay = retry_delay_secs(strategy.wait_time, attempt);
                tracing::debug!(engine = self.name(), attempt, delay, "retrying after transient error");
                tokio::time::sleep(std::time::Duration::from_secs(delay)).await;
            }
        }

        self.stats().record(false, 0.0);

        let mut metadata = serde_json::Map::new();
        metadata.insert("crawler_used".to_string(), self.name().into());
        metadata.insert("error_type".to_string(), "exhausted_retries".into());
        CrawlResult::failure(url, last_error, metadata)
    }

    /// Health snapshot for the `/engines/status` endpoint.
    fn health_check(&self) -> HealthCheck {
        HealthCheck {
            name: self.name().to_string(),
            initialized: self.stats().is_initialized(),
            stats: self.stats().snapshot(),
            capabilities: self.capabilities(),
        }
    }
}
