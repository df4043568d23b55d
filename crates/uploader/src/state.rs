//! Upload state store and change notification.
//!
//! Single source of truth for the aggregate upload snapshot. The
//! orchestrator is the only writer; everyone else pulls snapshots or
//! subscribes for push notification.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use shotput_protocol::types::UploadState;

/// Observer callback invoked with each new snapshot.
type Observer = Arc<dyn Fn(&UploadState) + Send + Sync>;

struct StoreInner {
    state: Mutex<UploadState>,
    observers: Mutex<Vec<(u64, Observer)>>,
    next_id: AtomicU64,
}

/// Shared upload state with synchronous change notification.
///
/// Clone handles freely; all clones view the same state. `update` is meant
/// to be called from a single writer — concurrent writers would interleave
/// their notifications.
#[derive(Clone)]
pub struct UploadStore {
    inner: Arc<StoreInner>,
}

impl Default for UploadStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadStore {
    /// Creates a store holding the idle state.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(UploadState::default()),
                observers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> UploadState {
        self.inner.state.lock().unwrap().clone()
    }

    /// Mutates the state and notifies every observer with the new snapshot,
    /// in registration order. One call, one notification per observer.
    ///
    /// Observers registered while a notification pass runs are not invoked
    /// for that pass.
    pub fn update<F: FnOnce(&mut UploadState)>(&self, apply: F) {
        let snapshot = {
            let mut state = self.inner.state.lock().unwrap();
            apply(&mut state);
            state.clone()
        };

        let observers: Vec<Observer> = {
            let registered = self.inner.observers.lock().unwrap();
            registered.iter().map(|(_, o)| Arc::clone(o)).collect()
        };
        for observer in observers {
            observer(&snapshot);
        }
    }

    /// Registers an observer. Dropping the returned [`Subscription`] does
    /// not unregister; call [`Subscription::unsubscribe`].
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&UploadState) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .observers
            .lock()
            .unwrap()
            .push((id, Arc::new(observer)));
        Subscription {
            store: Arc::downgrade(&self.inner),
            id,
        }
    }
}

/// Capability to remove one registered observer.
pub struct Subscription {
    store: Weak<StoreInner>,
    id: u64,
}

impl Subscription {
    /// Removes the observer. Idempotent; a second call is a no-op, as is
    /// unsubscribing after the store itself is gone.
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.store.upgrade() {
            inner
                .observers
                .lock()
                .unwrap()
                .retain(|(id, _)| *id != self.id);
        }
    }
}
