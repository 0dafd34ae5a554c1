//! Running per-engine counters shared by every adapter.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Point-in-time view of [`EngineStats`] suitable for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct EngineStatsSnapshot {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub avg_response_time_secs: f64,
}

/// Thread-safe rolling counters: total/success/failure plus a rolling-average
/// response time, updated after every `crawl_with_retry` attempt.
#[derive(Debug, Default)]
pub struct EngineStats {
    total: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
    /// Average response time in milliseconds, fixed-point (avoids atomic f64).
    avg_response_time_ms: AtomicU64,
    initialized: AtomicBool,
}

impl EngineStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_initialized(&self, initialized: bool) {
        self.initialized.store(initialized, Ordering::Release);
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    /// Record the outcome of one `crawl` attempt. `response_time_secs` is
    /// ignored on failure (matches the source's `_update_stats(False, 0)` call).
    pub fn record(&self, success: bool, response_time_secs: f64) {
        let total = self.total.fetch_add(1, Ordering::AcqRel) + 1;

        if success {
            self.successful.fetch_add(1, Ordering::AcqRel);

            let response_ms = (response_time_secs * 1000.0) as u64;
            let current_avg = self.avg_response_time_ms.load(Ordering::Acquire);
            let new_avg = ((current_avg * (total - 1)) + response_ms) / total;
            self.avg_response_time_ms.store(new_avg, Ordering::Release);
        } else {
            self.failed.fetch_add(1, Ordering::AcqRel);
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> EngineStatsSnapshot {
        EngineStatsSnapshot {
            total_requests: self.total.load(Ordering::Acquire),
            successful_requests: self.successful.load(Ordering::Acquire),
            failed_requests: self.failed.load(Ordering::Acquire),
            avg_response_time_secs: self.avg_response_time_ms.load(Ordering::Acquire) as f64 / 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rolling_average_matches_arithmetic_mean() {
        let stats = EngineStats::new();
        stats.record(true, 1.0);
        stats.record(true, 3.0);
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_requests, 2);
        assert!((snapshot.avg_response_time_secs - 2.0).abs() < 0.01);
    }

    #[test]
    fn failures_do_not_skew_average() {
        let stats = EngineStats::new();
        stats.record(true, 2.0);
        stats.record(false, 0.0);
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.successful_requests, 1);
        assert_eq!(snapshot.failed_requests, 1);
        assert!((snapshot.avg_response_time_secs - 2.0).abs() < 0.01);
    }
}
