pub mod analyzer;
pub mod browser_pool;
pub mod browser_profile;
pub mod browser_setup;
pub mod bulk;
pub mod config;
pub mod content_saver;
pub mod crawl_engine;
pub mod engines;
pub mod extract;
pub mod http;
pub mod intent;
pub mod orchestrator;
pub mod postprocess;
pub mod progress;
pub mod strategy;
pub mod utils;

pub use browser_pool::{BrowserPool, BrowserPoolConfig, PooledBrowserGuard};
pub use browser_setup::{apply_stealth_measures, download_managed_browser, find_browser_executable, launch_browser};
pub use config::AppConfig;
pub use crawl_engine::{CrawlResult, CrawlStatus, CrawlStrategy, Hierarchy};
pub use http::{router, AppState};
pub use orchestrator::Orchestrator;
