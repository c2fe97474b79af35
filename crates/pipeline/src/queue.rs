//! In-memory job queue.
//!
//! Single-process and volatile: queue state does not survive a
//! restart. FIFO pending entries plus an in-flight set tracking the
//! job currently being processed. A lock-free pending counter backs
//! `size()` so status endpoints may read a slightly stale value
//! without touching the lock.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use planforge_core::job::JobPayload;
use tokio::sync::Mutex;

/// One queued submission.
#[derive(Debug, Clone)]
pub struct QueueEntry {
    pub job_id: String,
    pub payload: JobPayload,
    pub enqueued_at: DateTime<Utc>,
}

#[derive(Default)]
struct QueueInner {
    pending: VecDeque<QueueEntry>,
    processing: HashSet<String>,
}

/// FIFO queue with an exclusivity invariant: a job id is pending,
/// in-flight, or absent, never more than one at a time.
#[derive(Default)]
pub struct JobQueue {
    inner: Mutex<QueueInner>,
    pending_count: AtomicUsize,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a job to the tail of the queue.
    pub async fn enqueue(&self, job_id: impl Into<String>, payload: JobPayload) {
        let job_id = job_id.into();
        let mut inner = self.inner.lock().await;
        inner.pending.push_back(QueueEntry {
            job_id: job_id.clone(),
            payload,
            enqueued_at: Utc::now(),
        });
        self.pending_count.store(inner.pending.len(), Ordering::Release);
        tracing::debug!(job_id = %job_id, depth = inner.pending.len(), "job enqueued");
    }

    /// Pop the head of the queue, moving it into the in-flight set.
    /// Never blocks waiting for work.
    pub async fn dequeue(&self) -> Option<QueueEntry> {
        let mut inner = self.inner.lock().await;
        let entry = inner.pending.pop_front()?;
        inner.processing.insert(entry.job_id.clone());
        self.pending_count.store(inner.pending.len(), Ordering::Release);
        Some(entry)
    }

    /// Release a job from the in-flight set. Idempotent: completing
    /// an unknown or already-released id is a no-op.
    pub async fn complete(&self, job_id: &str) {
        let mut inner = self.inner.lock().await;
        if inner.processing.remove(job_id) {
            tracing::debug!(job_id = %job_id, "job released from in-flight set");
        }
    }

    /// Number of pending entries, excluding the in-flight job. May be
    /// stale relative to concurrent mutation.
    pub fn size(&self) -> usize {
        self.pending_count.load(Ordering::Acquire)
    }

    pub async fn is_processing(&self, job_id: &str) -> bool {
        self.inner.lock().await.processing.contains(job_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planforge_core::options::GenerationOptions;

    fn payload() -> JobPayload {
        JobPayload {
            image_url: "https://example.com/house.jpg".to_string(),
            options: GenerationOptions::default(),
        }
    }

    #[tokio::test]
    async fn fifo_order_is_preserved() {
        let queue = JobQueue::new();
        queue.enqueue("a", payload()).await;
        queue.enqueue("b", payload()).await;
        let first = queue.dequeue().await.unwrap();
        assert_eq!(first.job_id, "a");
        assert_eq!(first.payload.image_url, "https://example.com/house.jpg");
        assert_eq!(queue.dequeue().await.unwrap().job_id, "b");
        assert!(queue.dequeue().await.is_none());
    }

    #[tokio::test]
    async fn dequeue_moves_job_to_in_flight() {
        let queue = JobQueue::new();
        queue.enqueue("a", payload()).await;
        assert_eq!(queue.size(), 1);
        assert!(!queue.is_processing("a").await);

        let entry = queue.dequeue().await.unwrap();
        assert_eq!(queue.size(), 0);
        assert!(queue.is_processing(&entry.job_id).await);

        queue.complete(&entry.job_id).await;
        assert!(!queue.is_processing(&entry.job_id).await);
    }

    #[tokio::test]
    async fn complete_is_idempotent() {
        let queue = JobQueue::new();
        queue.enqueue("a", payload()).await;
        queue.dequeue().await.unwrap();
        queue.complete("a").await;
        queue.complete("a").await;
        queue.complete("never-queued").await;
        assert!(!queue.is_processing("a").await);
    }

    #[tokio::test]
    async fn size_excludes_in_flight() {
        let queue = JobQueue::new();
        queue.enqueue("a", payload()).await;
        queue.enqueue("b", payload()).await;
        assert_eq!(queue.size(), 2);
        queue.dequeue().await.unwrap();
        assert_eq!(queue.size(), 1);
    }

    #[tokio::test]
    async fn entries_are_timestamped() {
        let queue = JobQueue::new();
        let before = Utc::now();
        queue.enqueue("a", payload()).await;
        let entry = queue.dequeue().await.unwrap();
        assert!(entry.enqueued_at >= before);
        assert!(entry.enqueued_at <= Utc::now());
    }
}
