pub mod clock;
pub mod job;
mod leases;
mod pending;
pub mod sweeper;

pub use clock::{Clock, ManualClock, SystemClock};
pub use job::{Job, JobId, JobStatus, JobType};
pub use sweeper::Sweeper;

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::config::QueueConfig;
use crate::error::{QueueError, Result};

use leases::LeaseRegistry;
use pending::PendingStore;

/// Per-state job counts, taken in one snapshot under the queue lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueStats {
    pub pending: usize,
    pub in_progress: usize,
}

/// Everything guarded by the queue's one lock. The id index, the
/// pending store and the lease registry always move together.
struct QueueState {
    jobs: HashMap<JobId, Job>,
    pending: PendingStore,
    leases: LeaseRegistry,
}

/// In-memory job queue. Every operation takes a single exclusion lock
/// over the whole state, so callers observe each transition atomically.
pub struct Queue {
    state: RwLock<QueueState>,
    clock: Arc<dyn Clock>,
    lease_timeout: Duration,
}

impl Queue {
    pub fn new(config: QueueConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build a queue that reads time from `clock` instead of the system.
    pub fn with_clock(config: QueueConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(QueueState {
                jobs: HashMap::new(),
                pending: PendingStore::new(config.order, config.compact_fill),
                leases: LeaseRegistry::new(),
            }),
            clock,
            lease_timeout: Duration::from_secs(config.lease_timeout_secs),
        }
    }

    /// Admit a new job and return its queued snapshot.
    pub async fn enqueue(&self, job_type: JobType, priority: i32) -> Job {
        let mut state = self.state.write().await;
        let job = Job::new(job_type, priority);
        state.pending.push(job.id, job.priority);
        state.jobs.insert(job.id, job.clone());
        tracing::debug!(job_id = %job.id, job_type = %job.job_type, priority = job.priority, "Job enqueued");
        job
    }

    /// Hand the next pending job to a consumer and start its lease.
    pub async fn dequeue(&self) -> Result<Job> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let id = state.pending.pop().ok_or(QueueError::Empty)?;
        let job = state
            .jobs
            .get_mut(&id)
            .expect("pending entries always reference indexed jobs");
        job.status = JobStatus::InProgress;
        let snapshot = job.clone();
        state.leases.claim(id, self.clock.now());
        tracing::debug!(job_id = %id, "Job dequeued");
        Ok(snapshot)
    }

    /// Finish an in-progress job, removing it from the queue entirely.
    pub async fn conclude(&self, id: JobId) -> Result<Job> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        match state.jobs.entry(id) {
            Entry::Occupied(entry) => {
                if entry.get().status != JobStatus::InProgress {
                    return Err(QueueError::JobNotInProgress(id));
                }
                let mut job = entry.remove();
                job.status = JobStatus::Concluded;
                state.leases.release(id);
                tracing::debug!(job_id = %id, "Job concluded");
                Ok(job)
            }
            Entry::Vacant(_) => Err(QueueError::JobNotFound(id)),
        }
    }

    /// Look up a job by id. Concluded jobs are gone and read as `None`.
    pub async fn get_job(&self, id: JobId) -> Option<Job> {
        self.state.read().await.jobs.get(&id).cloned()
    }

    /// Snapshot the per-state counts.
    pub async fn stats(&self) -> QueueStats {
        let state = self.state.read().await;
        QueueStats {
            pending: state.pending.len(),
            in_progress: state.leases.live(),
        }
    }

    /// Return every job whose lease has outlived the timeout to the
    /// pending store, oldest claim first. Returns how many moved.
    pub async fn sweep_expired(&self) -> usize {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let now = self.clock.now();
        let expired = state.leases.take_expired(now, self.lease_timeout);
        for id in &expired {
            let priority = {
                let job = state
                    .jobs
                    .get_mut(id)
                    .expect("live leases always reference indexed jobs");
                job.status = JobStatus::Queued;
                job.priority
            };
            state.pending.push(*id, priority);
            tracing::debug!(job_id = %id, "Lease expired, job requeued");
        }
        state.leases.compact();
        expired.len()
    }
}
