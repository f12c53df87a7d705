use crate::normalize::identity_key;
use crate::scope::ScopeGuard;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use tracing::info;
use url::Url;

#[derive(Debug, Default)]
struct FrontierState {
    visited: HashSet<String>,
    pending: VecDeque<Url>,
}

/// Pending queue plus visited set, guarded together so that the
/// "already seen?" check and the enqueue are one atomic step.
///
/// The lock is a blocking mutex: it is never held across an `.await`, and
/// the critical sections are a couple of hash lookups long.
#[derive(Debug)]
pub struct Frontier {
    scope: Arc<ScopeGuard>,
    state: StdMutex<FrontierState>,
}

impl Frontier {
    pub fn new(scope: Arc<ScopeGuard>) -> Self {
        Self {
            scope,
            state: StdMutex::new(FrontierState::default()),
        }
    }

    pub fn scope(&self) -> &ScopeGuard {
        &self.scope
    }

    /// Enqueue `url` unless it is out of scope or its identity was seen before.
    /// Returns whether the URL was enqueued.
    pub fn offer(&self, mut url: Url) -> bool {
        if !self.scope.in_scope(&url) {
            return false;
        }

        url.set_fragment(None);
        let full = url.as_str().to_string();
        let key = identity_key(&url);

        let mut state = self.lock();
        if state.visited.contains(&full) || state.visited.contains(&key) {
            return false;
        }
        state.visited.insert(key);
        state.pending.push_back(url);
        drop(state);

        info!("[{}] URL found", full);
        true
    }

    /// Pop the next pending URL; `None` means the queue is currently empty.
    pub fn take(&self) -> Option<Url> {
        self.lock().pending.pop_front()
    }

    pub fn visited_count(&self) -> usize {
        self.lock().visited.len()
    }

    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    // A panic while holding the lock cannot leave the set and queue
    // inconsistent (each section is a single insert + push), so keep going.
    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
