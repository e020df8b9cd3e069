use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use tracing::warn;

use crate::{QueueAction, QueueError, QueueEvent, QueueResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

static LISTENER_ID: AtomicU64 = AtomicU64::new(1);

fn next_listener_id() -> ListenerId {
    ListenerId(LISTENER_ID.fetch_add(1, Ordering::Relaxed))
}

/// Observer signature (sync, runs on the mutating thread).
pub type Observer<T> = Arc<dyn Fn(&QueueEvent<T>) -> anyhow::Result<()> + Send + Sync>;

struct ObserverEntry<T> {
    id: ListenerId,
    action: QueueAction,
    observer: Observer<T>,
    once: bool,
}

/// Multicast observer registry for enqueue and dequeue events.
///
/// Emission works in two phases so no lock is held while user code runs:
/// 1) snapshot the matching observers (and unlink `once` entries)
/// 2) call them in registration order
///
/// The first observer error stops the chain and is returned to the caller.
/// A `once` observer is unlinked when its event fires, even if an earlier
/// observer's failure means it never got called.
pub struct ObserverHub<T> {
    entries: RwLock<Vec<ObserverEntry<T>>>,
}

impl<T> Default for ObserverHub<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ObserverHub<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    pub fn on<F>(&self, action: QueueAction, observer: F) -> ListenerId
    where
        F: Fn(&QueueEvent<T>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(action, Arc::new(observer), false)
    }

    /// Observer that fires at most once
    pub fn once<F>(&self, action: QueueAction, observer: F) -> ListenerId
    where
        F: Fn(&QueueEvent<T>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register(action, Arc::new(observer), true)
    }

    fn register(&self, action: QueueAction, observer: Observer<T>, once: bool) -> ListenerId {
        let id = next_listener_id();
        self.entries.write().push(ObserverEntry {
            id,
            action,
            observer,
            once,
        });
        id
    }

    /// Unregister an observer; `false` if it was already gone
    pub fn off(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|e| e.id != id);
        before != entries.len()
    }

    /// Remove every observer, or only those for one action
    pub fn remove_all(&self, action: Option<QueueAction>) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        match action {
            Some(action) => entries.retain(|e| e.action != action),
            None => entries.clear(),
        }
        before - entries.len()
    }

    pub fn count(&self, action: QueueAction) -> usize {
        self.entries.read().iter().filter(|e| e.action == action).count()
    }

    /// Phase 1: matching observers in registration order.
    ///
    /// The once-check and the collect share one guard, so an observer
    /// registered concurrently is either fully seen or not seen at all.
    fn snapshot(&self, action: QueueAction) -> Vec<Observer<T>> {
        let entries = self.entries.upgradable_read();
        let has_once = entries.iter().any(|e| e.once && e.action == action);

        if !has_once {
            return entries
                .iter()
                .filter(|e| e.action == action)
                .map(|e| e.observer.clone())
                .collect();
        }

        // Unlink under the write lock so two racing emitters can't both run a `once` observer
        let mut entries = RwLockUpgradableReadGuard::upgrade(entries);
        let mut to_call = Vec::new();
        entries.retain(|e| {
            if e.action != action {
                return true;
            }
            to_call.push(e.observer.clone());
            !e.once
        });
        to_call
    }

    /// Phase 2: deliver `event` to every observer registered for its action.
    pub fn emit(&self, event: &QueueEvent<T>) -> QueueResult<()> {
        for observer in self.snapshot(event.action) {
            if let Err(err) = observer(event) {
                warn!("{} observer failed at level {}: {:#}", event.action, event.priority, err);
                return Err(QueueError::observer(err));
            }
        }
        Ok(())
    }
}
