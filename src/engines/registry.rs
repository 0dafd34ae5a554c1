//! Process-wide `name -> Arc<dyn EngineAdapter>` registry, built once at
//! startup. Engines whose `initialize()` fails (typically missing
//! credentials) are dropped entirely rather than kept around half-initialized.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::engines::{
    ai_engine::AiEngine, browser_engine::BrowserEngine, http_engine::HttpEngine,
    premium_engine::PremiumEngine, EngineAdapter,
};

/// Declared-order list rather than a hash map: the Strategy Builder's
/// full-registry fallback and `attempted_engines` ordering both depend on
/// engines coming back in the order they were registered (http, browser, ai,
/// premium), not hash-iteration order.
pub struct EngineRegistry {
    engines: Vec<(String, Arc<dyn EngineAdapter>)>,
}

impl EngineRegistry {
    /// Construct every known adapter, initialize it, and keep only the ones
    /// that succeed. Always includes `http_engine` (no external credentials
    /// required); `ai_engine`/`premium_engine` are skipped when their API key
    /// is absent; `browser_engine` is skipped if the browser pool fails to start.
    pub async fn build(config: &AppConfig) -> Self {
        let candidates: Vec<Arc<dyn EngineAdapter>> = vec![
            Arc::new(HttpEngine::new()),
            Arc::new(BrowserEngine::new()),
            Arc::new(AiEngine::new(config.openai_api_key.clone())),
            Arc::new(PremiumEngine::new(config.firecrawl_api_key.clone())),
        ];

        let mut engines = Vec::with_capacity(candidates.len());
        for engine in candidates {
            match engine.initialize().await {
                Ok(()) => {
                    tracing::info!(engine = engine.name(), "engine initialized");
                    engines.push((engine.name().to_string(), engine));
                }
                Err(e) => {
                    tracing::warn!(engine = engine.name(), error = %e, "engine failed to initialize, dropping");
                }
            }
        }

        Self { engines }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn EngineAdapter>> {
        self.engines.iter().find(|(n, _)| n == name).map(|(_, engine)| Arc::clone(engine))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.engines.iter().any(|(n, _)| n == name)
    }

    /// Declared-registration order, not hash order.
    #[must_use]
    pub fn available_names(&self) -> Vec<String> {
        self.engines.iter().map(|(n, _)| n.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn EngineAdapter>> {
        self.engines.iter().map(|(_, engine)| engine)
    }

    /// Release every registered engine's resources. Called once during
    /// graceful shutdown.
    pub async fn cleanup_all(&self) {
        for (_, engine) in &self.engines {
            engine.cleanup().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn http_engine_is_always_available() {
        let registry = EngineRegistry::build(&AppConfig::default()).await;
        assert!(registry.contains("requests"));
    }

    #[tokio::test]
    async fn engines_requiring_credentials_are_dropped_when_absent() {
        let registry = EngineRegistry::build(&AppConfig::default()).await;
        assert!(!registry.contains("ai_crawler"));
        assert!(!registry.contains("premium_scraper"));
    }
}
