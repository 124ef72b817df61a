//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`JobEvent`]s. It is
//! designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use mediaforge_core::job::{Job, JobStatus};
use mediaforge_core::types::{JobId, UserId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event names
// ---------------------------------------------------------------------------

pub const JOB_SUBMITTED: &str = "job.submitted";
pub const JOB_PROGRESS: &str = "job.progress";
pub const JOB_COMPLETED: &str = "job.completed";
pub const JOB_FAILED: &str = "job.failed";
pub const JOB_CANCELLED: &str = "job.cancelled";
pub const JOB_RETRIED: &str = "job.retried";

// ---------------------------------------------------------------------------
// JobEvent
// ---------------------------------------------------------------------------

/// A job status change pushed to live listeners.
///
/// Constructed via [`JobEvent::for_job`] and enriched with
/// [`with_payload`](JobEvent::with_payload). The envelope carries the
/// owner id so a delivery layer can route per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEvent {
    /// Dot-separated event name, e.g. `"job.completed"`.
    pub event_type: String,

    /// Id of the job the event refers to.
    pub job_id: JobId,

    /// Owner of the job; used for routing, never for authorization.
    pub owner: UserId,

    /// Job status at the time the event was published.
    pub status: JobStatus,

    /// Free-form JSON payload carrying event-specific data
    /// (progress snapshot, error message, result count).
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl JobEvent {
    /// Create an event describing `job`'s current state.
    pub fn for_job(event_type: impl Into<String>, job: &Job) -> Self {
        Self {
            event_type: event_type.into(),
            job_id: job.id,
            owner: job.owner,
            status: job.status,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`JobEvent`].
pub struct EventBus {
    sender: broadcast::Sender<JobEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are
    /// dropped and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped;
    /// the job record store remains authoritative.
    pub fn publish(&self, event: JobEvent) {
        // Ignore the SendError — it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<JobEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mediaforge_core::job::JobKind;
    use mediaforge_core::params::GenerationParams;

    fn job() -> Job {
        Job::new(
            JobKind::Image,
            GenerationParams::prompt_only("a red fox"),
            uuid::Uuid::new_v4(),
        )
    }

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        let job = job();
        bus.publish(
            JobEvent::for_job(JOB_SUBMITTED, &job)
                .with_payload(serde_json::json!({"kind": "image"})),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, JOB_SUBMITTED);
        assert_eq!(received.job_id, job.id);
        assert_eq!(received.owner, job.owner);
        assert_eq!(received.status, JobStatus::Pending);
        assert_eq!(received.payload["kind"], "image");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let job = job();
        bus.publish(JobEvent::for_job(JOB_PROGRESS, &job));

        let e1 = rx1.recv().await.expect("subscriber 1 should receive");
        let e2 = rx2.recv().await.expect("subscriber 2 should receive");

        assert_eq!(e1.job_id, job.id);
        assert_eq!(e2.job_id, job.id);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        // No subscribers — this must not panic.
        bus.publish(JobEvent::for_job(JOB_COMPLETED, &job()));
    }
}
