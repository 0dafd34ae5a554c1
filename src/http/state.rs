//! Shared application state threaded through every handler via
//! `axum::extract::State`, built once at startup.

use std::sync::Arc;

use crate::bulk::BulkJobManager;
use crate::config::AppConfig;
use crate::engines::registry::EngineRegistry;
use crate::orchestrator::Orchestrator;
use crate::progress::ProgressHub;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub registry: Arc<EngineRegistry>,
    pub orchestrator: Arc<Orchestrator>,
    pub bulk: Arc<BulkJobManager>,
    pub progress: Arc<ProgressHub>,
}

impl AppState {
    pub async fn build(config: AppConfig) -> Self {
        let config = Arc::new(config);
        let registry = Arc::new(EngineRegistry::build(&config).await);
        let orchestrator = Arc::new(Orchestrator::new(Arc::clone(&registry)));
        let progress = Arc::new(ProgressHub::new());
        let store = Arc::new(crate::bulk::JobStore::new());
        let bulk = Arc::new(BulkJobManager::new(store, Arc::clone(&progress), Arc::clone(&orchestrator), &config));

        Self { config, registry, orchestrator, bulk, progress }
    }
}
