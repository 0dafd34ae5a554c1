//! Process-wide `job_id -> Job` map. Mutated by one owning worker task at a
//! time; counter updates from fan-out tasks go through the owning worker's
//! mutex, never directly.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::job::Job;

#[derive(Default)]
pub struct JobStore {
    jobs: DashMap<String, Arc<Mutex<Job>>>,
}

impl JobStore {
    #[must_use]
    pub fn new() -> Self {
        Self { jobs: DashMap::new() }
    }

    pub fn insert(&self, job: Job) -> Arc<Mutex<Job>> {
        let job_id = job.job_id.clone();
        let handle = Arc::new(Mutex::new(job));
        self.jobs.insert(job_id, handle.clone());
        handle
    }

    #[must_use]
    pub fn get(&self, job_id: &str) -> Option<Arc<Mutex<Job>>> {
        self.jobs.get(job_id).map(|entry| entry.clone())
    }

    /// Remove `job_id` if it is finished (not `processing`). Returns `true` if removed.
    pub async fn remove_if_finished(&self, job_id: &str) -> Result<bool, &'static str> {
        let Some(handle) = self.jobs.get(job_id).map(|entry| entry.clone()) else {
            return Err("job not found");
        };

        let is_processing = {
            let job = handle.lock().await;
            job.status == super::job::JobStatus::Processing
        };

        if is_processing {
            return Ok(false);
        }

        self.jobs.remove(job_id);
        Ok(true)
    }
}
