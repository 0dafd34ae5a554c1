//! `Job`: bulk-crawl execution state, scoped to a single API request and
//! kept in process memory for the life of the process.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::crawl_engine::CrawlResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Processing,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub job_id: String,
    pub status: JobStatus,
    pub total: usize,
    pub completed: usize,
    pub success: usize,
    pub failed: usize,
    pub progress: u8,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub results: Vec<CrawlResult>,
    pub result_file: Option<String>,
}

impl Job {
    #[must_use]
    pub fn new(job_id: String, total: usize) -> Self {
        Self {
            job_id,
            status: JobStatus::Processing,
            total,
            completed: 0,
            success: 0,
            failed: 0,
            progress: 0,
            start_time: Utc::now(),
            end_time: None,
            results: Vec::with_capacity(total),
            result_file: None,
        }
    }

    pub fn record_result(&mut self, result: CrawlResult) {
        if result.is_success() {
            self.success += 1;
        } else {
            self.failed += 1;
        }
        self.completed += 1;
        self.results.push(result);
    }

    pub fn finish(&mut self, result_file: Option<String>) {
        self.status = JobStatus::Completed;
        self.progress = 100;
        self.end_time = Some(Utc::now());
        self.result_file = result_file;
    }

    pub fn fail_before_start(&mut self) {
        self.status = JobStatus::Failed;
        self.progress = 100;
        self.end_time = Some(Utc::now());
    }

    #[must_use]
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }
}
