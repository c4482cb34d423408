//! Bounded admission for solver subprocesses.
//!
//! At most `max_concurrent` children run at once. Up to `max_queued` callers
//! wait for a slot; anyone past that is turned away with
//! [`SolverError::Overloaded`].

use crate::domain::solver_service::{Result, SolverError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};

pub struct AdmissionControl {
    permits: Arc<Semaphore>,
    max_concurrent: usize,
    max_queued: usize,
    queued: AtomicUsize,
}

impl AdmissionControl {
    /// `max_concurrent` is capped at [`Semaphore::MAX_PERMITS`]
    pub fn new(max_concurrent: usize, max_queued: usize) -> Self {
        let max_concurrent = max_concurrent.min(Semaphore::MAX_PERMITS);
        Self {
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            max_queued,
            queued: AtomicUsize::new(0),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Slots not currently held by a running invocation
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Callers currently waiting for a slot
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }

    /// Wait for a slot. The returned permit frees the slot when dropped.
    pub async fn admit(&self) -> Result<OwnedSemaphorePermit> {
        if let Ok(permit) = Arc::clone(&self.permits).try_acquire_owned() {
            return Ok(permit);
        }

        let Some(_slot) = QueueSlot::reserve(&self.queued, self.max_queued) else {
            warn!(
                max_concurrent = self.max_concurrent,
                max_queued = self.max_queued,
                "admission queue full, rejecting solver invocation"
            );
            return Err(SolverError::Overloaded {
                limit: self.max_queued,
            });
        };

        debug!(queued = self.queued(), "waiting for solver slot");

        Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| SolverError::Overloaded {
                limit: self.max_concurrent,
            })
    }
}

/// Queue position held while waiting; released on drop, including when the
/// waiting future is cancelled.
struct QueueSlot<'a>(&'a AtomicUsize);

impl<'a> QueueSlot<'a> {
    fn reserve(counter: &'a AtomicUsize, limit: usize) -> Option<Self> {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < limit).then_some(n + 1)
            })
            .ok()
            .map(|_| QueueSlot(counter))
    }
}

impl Drop for QueueSlot<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
