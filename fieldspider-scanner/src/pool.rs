//! Bounded task pool with an outstanding-work counter.
//!
//! A task counts as outstanding from the moment it is spawned until its
//! future has completed (or unwound), so a caller that observes
//! `outstanding() == 0` knows no task can still produce more work.

use crate::error::{Result, ScanError};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Notify, OwnedSemaphorePermit, Semaphore};
use tokio::task::{AbortHandle, JoinError, JoinSet};
use tracing::{debug, error};

/// A reserved worker slot. Dropping it unused gives the slot back.
#[derive(Debug)]
pub struct Slot(#[allow(dead_code)] OwnedSemaphorePermit);

#[derive(Debug, Default)]
struct Outstanding {
    count: AtomicUsize,
    changed: Notify,
}

/// Held by a running task; releases its slot and decrements the counter on drop.
struct WorkGuard {
    outstanding: Arc<Outstanding>,
    _slot: Slot,
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        self.outstanding.count.fetch_sub(1, Ordering::AcqRel);
        self.outstanding.changed.notify_one();
    }
}

pub struct TaskPool {
    limit: usize,
    slots: Arc<Semaphore>,
    outstanding: Arc<Outstanding>,
    tasks: JoinSet<()>,
}

impl TaskPool {
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            limit,
            slots: Arc::new(Semaphore::new(limit)),
            outstanding: Arc::new(Outstanding::default()),
            tasks: JoinSet::new(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Wait until a worker slot is free and reserve it.
    pub async fn reserve(&self) -> Result<Slot> {
        let permit = self
            .slots
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| ScanError::PoolClosed)?;
        Ok(Slot(permit))
    }

    /// Run `task` in the reserved slot. The task is outstanding until it returns.
    pub fn spawn<F>(&mut self, slot: Slot, task: F) -> AbortHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.outstanding.count.fetch_add(1, Ordering::AcqRel);
        let guard = WorkGuard {
            outstanding: self.outstanding.clone(),
            _slot: slot,
        };

        let handle = self.tasks.spawn(async move {
            let _guard = guard;
            task.await;
        });

        self.reap();
        handle
    }

    pub fn outstanding(&self) -> usize {
        self.outstanding.count.load(Ordering::Acquire)
    }

    pub fn in_flight(&self) -> usize {
        self.limit - self.slots.available_permits()
    }

    /// Resolves after some task finished since the last call. May resolve
    /// spuriously; callers re-check their condition.
    pub async fn changed(&self) {
        self.outstanding.changed.notified().await;
    }

    /// Wait for every spawned task to finish.
    pub async fn join(&mut self) {
        while let Some(result) = self.tasks.join_next().await {
            log_join(result);
        }
        debug!("Task pool drained");
    }

    fn reap(&mut self) {
        while let Some(result) = self.tasks.try_join_next() {
            log_join(result);
        }
    }
}

fn log_join(result: std::result::Result<(), JoinError>) {
    if let Err(e) = result
        && e.is_panic()
    {
        error!("Worker task panicked: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_in_flight_never_exceeds_limit() {
        let mut pool = TaskPool::new(3);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        for _ in 0..20 {
            let slot = pool.reserve().await.unwrap();
            let running = running.clone();
            let peak = peak.clone();
            pool.spawn(slot, async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            });
        }
        pool.join().await;

        assert_eq!(pool.outstanding(), 0);
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn test_single_slot_serializes_tasks() {
        let mut pool = TaskPool::new(0);
        assert_eq!(pool.limit(), 1);

        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        for _ in 0..5 {
            let slot = pool.reserve().await.unwrap();
            let running = running.clone();
            let peak = peak.clone();
            pool.spawn(slot, async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::task::yield_now().await;
                running.fetch_sub(1, Ordering::SeqCst);
            });
        }
        pool.join().await;

        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_outstanding_tracks_running_tasks() {
        let mut pool = TaskPool::new(2);
        let release = Arc::new(Notify::new());

        let slot = pool.reserve().await.unwrap();
        let wait = release.clone();
        pool.spawn(slot, async move { wait.notified().await });
        assert_eq!(pool.outstanding(), 1);
        assert_eq!(pool.in_flight(), 1);

        release.notify_one();
        pool.changed().await;
        assert_eq!(pool.outstanding(), 0);

        pool.join().await;
        assert_eq!(pool.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_panicking_task_still_releases_its_slot() {
        let mut pool = TaskPool::new(1);

        let slot = pool.reserve().await.unwrap();
        pool.spawn(slot, async { panic!("boom"); });
        pool.join().await;

        assert_eq!(pool.outstanding(), 0);
        // The only slot must be free again.
        let slot = tokio::time::timeout(Duration::from_secs(1), pool.reserve()).await;
        assert!(slot.is_ok());
    }
}
