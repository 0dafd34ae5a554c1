//! Core data types shared by every engine adapter and the orchestrator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Three-level heading outline extracted from a crawled document.
///
/// `depth1` is the page title or H1. `depth2` maps each H1 topic to its list
/// of H2 sub-headings (using `"other"` when an H2 has no preceding H1).
/// `depth3` maps each H2 (or H1, if no H2 preceded it) to its H3s.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Hierarchy {
    #[serde(default)]
    pub depth1: String,
    #[serde(default)]
    pub depth2: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub depth3: HashMap<String, Vec<String>>,
}

impl Hierarchy {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.depth1.is_empty() && self.depth2.is_empty() && self.depth3.is_empty()
    }
}

/// Crawl outcome status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlStatus {
    Complete,
    Failed,
}

/// The normalized output of every engine adapter.
///
/// Invariant: `status == Complete` implies `error` is `None`; `status ==
/// Failed` implies `text`, `title` are empty and `hierarchy` is empty, with
/// `error` set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub hierarchy: Hierarchy,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub status: CrawlStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The page's HTML before markdown conversion, kept for selector-based
    /// extraction. Not every engine has raw HTML to offer (the AI engine
    /// only ever sees a model-produced summary).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_html: Option<String>,
}

impl CrawlResult {
    /// Build a successful result. `metadata` must already carry the required
    /// keys from the engine contract (`crawler_used`, `processing_time`, ...).
    #[must_use]
    pub fn success(
        url: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
        hierarchy: Hierarchy,
        metadata: Map<String, Value>,
    ) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            text: text.into(),
            hierarchy,
            metadata,
            status: CrawlStatus::Complete,
            timestamp: Utc::now(),
            error: None,
            raw_html: None,
        }
    }

    /// Attach the raw HTML this result's text was derived from.
    #[must_use]
    pub fn with_raw_html(mut self, html: impl Into<String>) -> Self {
        self.raw_html = Some(html.into());
        self
    }

    /// Build a failed result. `metadata` typically carries `crawler_used` and `error_type`.
    #[must_use]
    pub fn failure(url: impl Into<String>, error: impl Into<String>, metadata: Map<String, Value>) -> Self {
        Self {
            url: url.into(),
            title: String::new(),
            text: String::new(),
            hierarchy: Hierarchy::default(),
            metadata,
            status: CrawlStatus::Failed,
            timestamp: Utc::now(),
            error: Some(error.into()),
            raw_html: None,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == CrawlStatus::Complete
    }
}

/// Input to an engine adapter: ordered fallback list plus timing/behavior knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlStrategy {
    pub engine_priority: Vec<String>,
    /// Initial-connection timeout, seconds.
    pub timeout: u64,
    pub max_retries: u32,
    /// Retry base delay, seconds; exponential back-off applies (`wait_time * 2^attempt`).
    pub wait_time: u64,
    /// Seconds of inactivity tolerated mid-fetch before abort.
    pub activity_timeout: u64,
    /// Hard ceiling for a single fetch attempt, seconds.
    pub max_total_time: u64,
    pub anti_bot_mode: bool,
    pub extract_images: bool,
    pub extract_links: bool,
    #[serde(default)]
    pub custom_selectors: Vec<String>,
    /// Set by the Strategy Builder when this came from the keyword fallback
    /// rather than the Site Analyzer; forwarded into result metadata.
    #[serde(default)]
    pub is_fallback: bool,
}

impl Default for CrawlStrategy {
    fn default() -> Self {
        Self {
            engine_priority: vec!["http".to_string()],
            timeout: 30,
            max_retries: 3,
            wait_time: 2,
            activity_timeout: 15,
            max_total_time: 300,
            anti_bot_mode: false,
            extract_images: false,
            extract_links: true,
            custom_selectors: Vec::new(),
            is_fallback: false,
        }
    }
}

/// Substrings that mark an error as permanent (never worth retrying).
///
/// Matched against the lower-cased error message. Order is irrelevant; any
/// match short-circuits the retry loop.
const PERMANENT_ERROR_SUBSTRINGS: &[&str] = &[
    "404",
    "not found",
    "403",
    "forbidden",
    "dns",
    "name resolution failed",
    "connection refused",
    "invalid url",
    "malformed url",
    "ssl certificate",
    "certificate verify failed",
];

/// Whether `error_message` matches one of the permanent-failure substrings.
///
/// Pure substring classification: feeding the same string always yields the
/// same verdict (no time-dependent or randomized behavior).
#[must_use]
pub fn is_permanent_error(error_message: &str) -> bool {
    let lower = error_message.to_lowercase();
    PERMANENT_ERROR_SUBSTRINGS.iter().any(|needle| lower.contains(needle))
}

/// Exponential retry back-off delay for a given attempt, in seconds.
///
/// `attempt` is zero-based (0 = first retry after the initial failed attempt).
#[must_use]
pub fn retry_delay_secs(wait_time: u64, attempt: u32) -> u64 {
    wait_time.saturating_mul(2u64.saturating_pow(attempt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_exact_permanent_error_list() {
        for needle in PERMANENT_ERROR_SUBSTRINGS {
            assert!(is_permanent_error(&format!("Error: {needle} happened")));
        }
    }

    #[test]
    fn transient_error_is_not_permanent() {
        assert!(!is_permanent_error("connection reset by peer"));
        assert!(!is_permanent_error("timeout exceeded"));
    }

    #[test]
    fn classification_is_case_insensitive_and_idempotent() {
        let msg = "HTTP 404 Not Found";
        assert_eq!(is_permanent_error(msg), is_permanent_error(msg));
        assert!(is_permanent_error(msg));
    }

    #[test]
    fn retry_delay_grows_exponentially() {
        assert_eq!(retry_delay_secs(2, 0), 2);
        assert_eq!(retry_delay_secs(2, 1), 4);
        assert_eq!(retry_delay_secs(2, 2), 8);
    }

    #[test]
    fn failed_result_has_empty_payload() {
        let result = CrawlResult::failure("https://example.com", "boom", Map::new());
        assert_eq!(result.status, CrawlStatus::Failed);
        assert!(result.text.is_empty());
        assert!(result.title.is_empty());
        assert!(result.hierarchy.is_empty());
        assert_eq!(result.error.as_deref(), Some("boom"));
    }
}
