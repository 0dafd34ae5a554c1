//! Bulk Job Manager: accepts a URL list, returns immediately with a job id,
//! and fans work out across a semaphore-bounded worker pool in the background.

use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::config::AppConfig;
use crate::orchestrator::Orchestrator;
use crate::postprocess::clean_crawled_text;
use crate::progress::{ProgressHub, ServerMessage};

use super::job::{Job, JobStatus};
use super::store::JobStore;

pub struct BulkJobManager {
    store: Arc<JobStore>,
    progress: Arc<ProgressHub>,
    orchestrator: Arc<Orchestrator>,
    results_dir: PathBuf,
    max_concurrent_ceiling: usize,
}

pub struct StartedJob {
    pub job_id: String,
    pub total: usize,
}

impl BulkJobManager {
    #[must_use]
    pub fn new(
        store: Arc<JobStore>,
        progress: Arc<ProgressHub>,
        orchestrator: Arc<Orchestrator>,
        config: &AppConfig,
    ) -> Self {
        Self {
            store,
            progress,
            orchestrator,
            results_dir: config.results_dir.clone(),
            max_concurrent_ceiling: config.max_concurrent_ceiling,
        }
    }

    /// Accept the job, spawn the background fan-out, and return immediately.
    pub fn submit(self: &Arc<Self>, urls: Vec<String>, max_concurrent: usize, clean_text: bool) -> StartedJob {
        let job_id = uuid::Uuid::new_v4().to_string();
        let total = urls.len();
        let job = Job::new(job_id.clone(), total);
        self.store.insert(job);

        self.progress.publish(&job_id, ServerMessage::progress(&job_id, "started", 5, "job accepted"));

        let manager = Arc::clone(self);
        let concurrency = max_concurrent.clamp(1, self.max_concurrent_ceiling);
        tokio::spawn(async move {
            manager.run(job_id, urls, concurrency, clean_text).await;
        });

        StartedJob { job_id, total }
    }

    async fn run(&self, job_id: String, urls: Vec<String>, max_concurrent: usize, clean_text: bool) {
        let Some(handle) = self.store.get(&job_id) else {
            tracing::warn!(job_id = job_id.as_str(), "job handle vanished before fan-out could start");
            self.progress.publish(
                &job_id,
                ServerMessage::error(&job_id, "job setup failed before any URL was processed"),
            );
            return;
        };

        if let Err(reason) = self.prepare_results_dir().await {
            tracing::warn!(job_id = job_id.as_str(), error = %reason, "job setup failed before fan-out could start");
            handle.lock().await.fail_before_start();
            self.progress.publish(&job_id, ServerMessage::error(&job_id, reason));
            return;
        }

        let total = urls.len();
        let semaphore = Arc::new(Semaphore::new(max_concurrent));
        let mut tasks = Vec::with_capacity(total);

        for (index, url) in urls.into_iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let orchestrator = Arc::clone(&self.orchestrator);
            tasks.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                let mut result = orchestrator.crawl(&url, None).await;
                if clean_text && result.is_success() {
                    clean_crawled_text(&mut result);
                }
                (index, result)
            }));
        }

        let mut ordered_results: Vec<Option<crate::crawl_engine::CrawlResult>> = (0..total).map(|_| None).collect();

        for task in tasks {
            match task.await {
                Ok((index, result)) => {
                    {
                        let mut job = handle.lock().await;
                        job.record_result(result.clone());
                        let progress = 10 + ((job.completed as f64 / job.total.max(1) as f64) * 80.0).floor() as u8;
                        job.progress = progress;
                        let message = format!("{}/{} (success: {})", job.completed, job.total, job.success);
                        self.progress.publish(&job_id, ServerMessage::progress(&job_id, "processing", progress, message));
                    }
                    ordered_results[index] = Some(result);
                }
                Err(e) => {
                    tracing::warn!(job_id = job_id.as_str(), error = %e, "bulk worker task panicked");
                }
            }
        }

        let results: Vec<crate::crawl_engine::CrawlResult> = ordered_results.into_iter().flatten().collect();

        let result_file = self.persist_summary(&job_id, &results).await;

        let mut job = handle.lock().await;
        job.finish(result_file);

        let summary = json!({
            "job_id": job.job_id,
            "total": job.total,
            "successful": job.success,
            "failed": job.failed,
            "success_rate": job.success_rate(),
        });
        self.progress.publish(&job_id, ServerMessage::complete(&job_id, summary));
    }

    /// Setup step that must succeed before any per-URL task is spawned.
    async fn prepare_results_dir(&self) -> Result<(), String> {
        tokio::fs::create_dir_all(&self.results_dir)
            .await
            .map_err(|e| format!("could not create results directory: {e}"))
    }

    async fn persist_summary(&self, job_id: &str, results: &[crate::crawl_engine::CrawlResult]) -> Option<String> {
        if tokio::fs::create_dir_all(&self.results_dir).await.is_err() {
            tracing::warn!(job_id, "could not create results directory");
            return None;
        }

        let success = results.iter().filter(|r| r.is_success()).count();
        let failed = results.len() - success;
        let summary = json!({
            "job_id": job_id,
            "total": results.len(),
            "successful": success,
            "failed": failed,
            "success_rate": if results.is_empty() { 0.0 } else { (success as f64 / results.len() as f64) * 100.0 },
            "results": results,
        });

        let path = self.results_dir.join(format!("{job_id}.json"));
        match serde_json::to_vec_pretty(&summary) {
            Ok(bytes) => match tokio::fs::write(&path, bytes).await {
                Ok(()) => Some(path.display().to_string()),
                Err(e) => {
                    tracing::warn!(job_id, error = %e, "failed to persist job summary");
                    None
                }
            },
            Err(e) => {
                tracing::warn!(job_id, error = %e, "failed to serialize job summary");
                None
            }
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<JobStore> {
        &self.store
    }

    /// `DELETE /jobs/{id}`: purge a finished job. In-flight jobs are left
    /// alone with an explanatory message.
    pub async fn cancel(&self, job_id: &str) -> Result<bool, &'static str> {
        self.store.remove_if_finished(job_id).await
    }
}
