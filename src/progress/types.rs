//! Message types pushed from the Progress Hub to subscribed WebSocket connections.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message fanned out to every connection subscribed to a job.
///
/// Serializes to the externally-tagged `{"type": "...", ...}` shape expected
/// by WebSocket clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Incremental progress for a single job.
    ProgressUpdate {
        job_id: String,
        step: String,
        progress: u8,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<Value>,
    },
    /// Terminal success for a job; `result` carries the job summary or a single `CrawlResult`.
    CrawlingComplete { job_id: String, result: Value },
    /// Terminal failure for a job.
    CrawlingError { job_id: String, error: String },
    /// Reply to a client `{"type": "ping"}`.
    Pong,
}

impl ServerMessage {
    #[must_use]
    pub fn progress(job_id: impl Into<String>, step: impl Into<String>, progress: u8, message: impl Into<String>) -> Self {
        Self::ProgressUpdate {
            job_id: job_id.into(),
            step: step.into(),
            progress,
            message: message.into(),
            data: None,
        }
    }

    #[must_use]
    pub fn complete(job_id: impl Into<String>, result: Value) -> Self {
        Self::CrawlingComplete {
            job_id: job_id.into(),
            result,
        }
    }

    #[must_use]
    pub fn error(job_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self::CrawlingError {
            job_id: job_id.into(),
            error: error.into(),
        }
    }
}

/// Message a client may send over the WebSocket connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe { job_id: String },
    Ping,
}
