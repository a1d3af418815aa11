use std::time::{Duration, Instant};

use super::job::JobId;

/// One claim held by a consumer. `job` is cleared when the job is
/// concluded or expired, leaving a tombstone until the next compaction.
struct Lease {
    job: Option<JobId>,
    claimed_at: Instant,
}

/// In-progress claims ordered by claim time, oldest first.
pub(crate) struct LeaseRegistry {
    entries: Vec<Lease>,
}

impl LeaseRegistry {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn claim(&mut self, id: JobId, at: Instant) {
        self.entries.push(Lease {
            job: Some(id),
            claimed_at: at,
        });
    }

    /// Tombstone the lease for `id`, if one is live.
    pub(crate) fn release(&mut self, id: JobId) {
        for lease in &mut self.entries {
            if lease.job == Some(id) {
                lease.job = None;
                return;
            }
        }
    }

    /// Clear and return every lease at least `timeout` old at `now`,
    /// oldest first.
    ///
    /// Entries are claim-ordered, so the scan stops at the first live
    /// lease younger than the timeout.
    pub(crate) fn take_expired(&mut self, now: Instant, timeout: Duration) -> Vec<JobId> {
        let mut expired = Vec::new();
        for lease in &mut self.entries {
            let Some(id) = lease.job else { continue };
            if now.duration_since(lease.claimed_at) < timeout {
                break;
            }
            lease.job = None;
            expired.push(id);
        }
        expired
    }

    /// Drop tombstones, keeping live leases in claim order.
    pub(crate) fn compact(&mut self) {
        self.entries.retain(|lease| lease.job.is_some());
    }

    pub(crate) fn live(&self) -> usize {
        self.entries
            .iter()
            .filter(|lease| lease.job.is_some())
            .count()
    }
}
