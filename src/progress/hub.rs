//! Job-scoped pub/sub: one broadcast channel per job, subscribers attach and
//! detach freely, a single publish path per job.

use dashmap::DashMap;
use tokio::sync::broadcast;

use super::types::ServerMessage;

const CHANNEL_CAPACITY: usize = 256;

/// Fans progress events from bulk-job workers to subscribed WebSocket connections.
///
/// Each job gets its own `broadcast::Sender` created lazily on first use.
/// Channels are not torn down automatically; call [`ProgressHub::remove_job`]
/// once a job's terminal event has been published and no further subscribers
/// are expected.
#[derive(Debug, Default)]
pub struct ProgressHub {
    channels: DashMap<String, broadcast::Sender<ServerMessage>>,
}

impl ProgressHub {
    #[must_use]
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
        }
    }

    fn sender_for(&self, job_id: &str) -> broadcast::Sender<ServerMessage> {
        self.channels
            .entry(job_id.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }

    /// Subscribe to a job's event stream, creating the channel if this is the first subscriber.
    #[must_use]
    pub fn subscribe(&self, job_id: &str) -> broadcast::Receiver<ServerMessage> {
        self.sender_for(job_id).subscribe()
    }

    /// Publish an event to every current subscriber of `job_id`.
    ///
    /// Best-effort: if nobody is currently subscribed the event is simply
    /// dropped, which is expected when a job completes faster than a client
    /// opens its WebSocket connection.
    pub fn publish(&self, job_id: &str, message: ServerMessage) {
        let sender = self.sender_for(job_id);
        if sender.send(message).is_err() {
            tracing::debug!(job_id, "progress event published with no active subscribers");
        }
    }

    /// Number of connections currently subscribed to `job_id`.
    #[must_use]
    pub fn subscriber_count(&self, job_id: &str) -> usize {
        self.channels
            .get(job_id)
            .map(|entry| entry.receiver_count())
            .unwrap_or(0)
    }

    /// Drop the channel for a job. Existing receivers keep working until dropped;
    /// a new `subscribe` call after this creates a fresh, empty channel.
    pub fn remove_job(&self, job_id: &str) {
        self.channels.remove(job_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_to_subscriber() {
        let hub = ProgressHub::new();
        let mut rx = hub.subscribe("job-1");
        hub.publish("job-1", ServerMessage::progress("job-1", "processing", 10, "1/10"));
        let msg = rx.recv().await.unwrap();
        match msg {
            ServerMessage::ProgressUpdate { job_id, progress, .. } => {
                assert_eq!(job_id, "job-1");
                assert_eq!(progress, 10);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn publish_without_subscribers_does_not_panic() {
        let hub = ProgressHub::new();
        hub.publish("job-none", ServerMessage::Pong);
        assert_eq!(hub.subscriber_count("job-none"), 0);
    }

    #[test]
    fn remove_job_drops_channel() {
        let hub = ProgressHub::new();
        let _rx = hub.subscribe("job-2");
        assert_eq!(hub.subscriber_count("job-2"), 1);
        hub.remove_job("job-2");
        assert_eq!(hub.subscriber_count("job-2"), 0);
    }
}
