//! Typed process configuration, read once at startup and threaded through
//! application state rather than re-read at call sites.

use std::path::PathBuf;

/// Process-wide configuration, populated from environment variables via
/// [`AppConfig::from_env`] with documented defaults and validated at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `PORT`, default `8080`.
    pub port: u16,
    /// Default `0.0.0.0`.
    pub bind_address: String,
    /// `FIRECRAWL_API_KEY`; premium engine disables itself without it.
    pub firecrawl_api_key: Option<String>,
    /// `OPENAI_API_KEY`; AI engine disables itself without it.
    pub openai_api_key: Option<String>,
    /// Default bulk fan-out width.
    pub default_max_concurrent: usize,
    /// Hard cap on bulk fan-out width regardless of what a caller requests.
    pub max_concurrent_ceiling: usize,
    /// Directory persisted job summaries are written under.
    pub results_dir: PathBuf,
    /// `RUST_LOG` filter string for `tracing_subscriber::EnvFilter`.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "0.0.0.0".to_string(),
            firecrawl_api_key: None,
            openai_api_key: None,
            default_max_concurrent: 5,
            max_concurrent_ceiling: 16,
            results_dir: PathBuf::from("./results"),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to
    /// [`AppConfig::default`] for anything unset or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port);

        let bind_address = std::env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address);

        let firecrawl_api_key = std::env::var("FIRECRAWL_API_KEY").ok().filter(|v| !v.is_empty());
        let openai_api_key = std::env::var("OPENAI_API_KEY").ok().filter(|v| !v.is_empty());

        let default_max_concurrent = std::env::var("DEFAULT_MAX_CONCURRENT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.default_max_concurrent);

        let max_concurrent_ceiling = std::env::var("MAX_CONCURRENT_CEILING")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.max_concurrent_ceiling);

        let results_dir = std::env::var("RESULTS_DIR")
            .ok()
            .map(PathBuf::from)
            .unwrap_or(defaults.results_dir);

        let log_filter = std::env::var("RUST_LOG").unwrap_or(defaults.log_filter);

        Self {
            port,
            bind_address,
            firecrawl_api_key,
            openai_api_key,
            default_max_concurrent: default_max_concurrent.clamp(1, max_concurrent_ceiling),
            max_concurrent_ceiling,
            results_dir,
            log_filter,
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    #[must_use]
    pub fn has_firecrawl_key(&self) -> bool {
        self.firecrawl_api_key.is_some()
    }

    #[must_use]
    pub fn has_openai_key(&self) -> bool {
        self.openai_api_key.is_some()
    }

    /// Clamp a caller-requested concurrency value to `[1, max_concurrent_ceiling]`.
    #[must_use]
    pub fn clamp_concurrency(&self, requested: usize) -> usize {
        requested.clamp(1, self.max_concurrent_ceiling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.default_max_concurrent, 5);
        assert_eq!(config.max_concurrent_ceiling, 16);
        assert!(!config.has_firecrawl_key());
    }

    #[test]
    fn clamp_concurrency_respects_ceiling() {
        let config = AppConfig::default();
        assert_eq!(config.clamp_concurrency(100), 16);
        assert_eq!(config.clamp_concurrency(0), 1);
        assert_eq!(config.clamp_concurrency(3), 3);
    }
}
