//! Shared dataset store.
//!
//! [`DatasetStore`] is a single-slot broadcast cell holding "the current
//! dataset". Every replacement is pushed to the registered observers as an
//! immutable [`Arc<Dataset>`] snapshot, so a dataset in a reader's hand is
//! never mutated underneath it.
//!
//! # Delivery guarantees
//!
//! - A new observer receives the current value (or `None`) immediately on
//!   [`DatasetStore::subscribe`], before any later update.
//! - Updates are delivered in the order of the `set`/`clear` calls that
//!   produced them, to observers in registration order.
//! - A `set` issued from inside an observer callback is queued and delivered
//!   after the current broadcast finishes, so ordering still holds.
//! - After [`Subscription::unsubscribe`] returns, the observer receives
//!   nothing further. Unsubscribing is idempotent and never implicit: dropping
//!   a [`Subscription`] leaves the observer registered.
//!
//! # Thread Safety
//!
//! The store is a cheap `Clone` handle. Writers are serialized by a
//! `parking_lot` mutex; delivery runs outside that lock, so observers may
//! freely call back into the store.

use std::cell::Cell;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, ReentrantMutex};
use tracing::{debug, trace};

use crate::types::Dataset;

// ============================================================================
// Observers
// ============================================================================

/// Receives every value the store holds, starting with the current one.
pub trait DatasetObserver: Send + Sync {
    /// Called with the new value; `None` means the store was cleared or has
    /// never been set.
    fn on_dataset(&self, dataset: Option<Arc<Dataset>>);
}

/// A dataset observer that wraps a closure.
///
/// # Example
///
/// ```rust
/// use datalens_processing::store::{ClosureObserver, DatasetStore};
///
/// let store = DatasetStore::new();
/// let subscription = store.subscribe(ClosureObserver::new(|dataset| {
///     if let Some(ds) = dataset {
///         println!("{} rows", ds.row_count());
///     }
/// }));
/// subscription.unsubscribe();
/// ```
pub struct ClosureObserver<F>
where
    F: Fn(Option<Arc<Dataset>>) + Send + Sync,
{
    callback: F,
}

impl<F> ClosureObserver<F>
where
    F: Fn(Option<Arc<Dataset>>) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> DatasetObserver for ClosureObserver<F>
where
    F: Fn(Option<Arc<Dataset>>) + Send + Sync,
{
    fn on_dataset(&self, dataset: Option<Arc<Dataset>>) {
        (self.callback)(dataset);
    }
}

// ============================================================================
// Store
// ============================================================================

struct Registration {
    id: u64,
    /// Version current at registration; only later versions are delivered.
    since_version: u64,
    active: Arc<AtomicBool>,
    observer: Arc<dyn DatasetObserver>,
}

#[derive(Default)]
struct Inner {
    current: Option<Arc<Dataset>>,
    version: u64,
    pending: VecDeque<(u64, Option<Arc<Dataset>>)>,
    observers: Vec<Registration>,
    next_id: u64,
}

struct Shared {
    inner: Mutex<Inner>,
    /// Held while broadcasting. The flag marks an active drain on this thread.
    delivery: ReentrantMutex<Cell<bool>>,
}

/// Single-slot broadcast cell for the current [`Dataset`].
#[derive(Clone)]
pub struct DatasetStore {
    shared: Arc<Shared>,
}

impl Default for DatasetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DatasetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.shared.inner.lock();
        f.debug_struct("DatasetStore")
            .field("version", &inner.version)
            .field("observers", &inner.observers.len())
            .field("has_dataset", &inner.current.is_some())
            .finish()
    }
}

impl DatasetStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner::default()),
                delivery: ReentrantMutex::new(Cell::new(false)),
            }),
        }
    }

    /// Current value, without side effects.
    pub fn get(&self) -> Option<Arc<Dataset>> {
        self.shared.inner.lock().current.clone()
    }

    /// Replace the held dataset and notify every observer.
    pub fn set(&self, dataset: Dataset) {
        self.replace(Some(Arc::new(dataset)));
    }

    /// Reset the store to empty and notify every observer with `None`.
    pub fn clear(&self) {
        self.replace(None);
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.shared.inner.lock().observers.len()
    }

    /// Register `observer`, replaying the current value to it immediately.
    pub fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: DatasetObserver + 'static,
    {
        self.subscribe_arc(Arc::new(observer))
    }

    /// Register a closure as an observer.
    pub fn subscribe_fn<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<Arc<Dataset>>) + Send + Sync + 'static,
    {
        self.subscribe(ClosureObserver::new(callback))
    }

    /// Register an already shared observer.
    pub fn subscribe_arc(&self, observer: Arc<dyn DatasetObserver>) -> Subscription {
        // Holding the delivery lock keeps a concurrent broadcast from slipping
        // between the replay and the first streamed update.
        let _delivery = self.shared.delivery.lock();

        let active = Arc::new(AtomicBool::new(true));
        let (id, current) = {
            let mut inner = self.shared.inner.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            let since_version = inner.version;
            inner.observers.push(Registration {
                id,
                since_version,
                active: Arc::clone(&active),
                observer: Arc::clone(&observer),
            });
            (id, inner.current.clone())
        };

        debug!("Observer {} subscribed", id);
        observer.on_dataset(current);

        Subscription {
            id,
            shared: Arc::downgrade(&self.shared),
            active,
        }
    }

    /// Replace the held dataset only if it is still `expected`.
    ///
    /// Returns `false`, leaving the store and its observers untouched, when
    /// another writer published or cleared in the meantime.
    pub fn compare_and_set(&self, expected: &Arc<Dataset>, dataset: Dataset) -> bool {
        {
            let mut inner = self.shared.inner.lock();
            let unchanged = inner
                .current
                .as_ref()
                .is_some_and(|current| Arc::ptr_eq(current, expected));
            if !unchanged {
                debug!("Snapshot is stale at version {}; not replacing", inner.version);
                return false;
            }
            Self::enqueue(&mut inner, Some(Arc::new(dataset)));
        }
        self.drain();
        true
    }

    fn replace(&self, value: Option<Arc<Dataset>>) {
        Self::enqueue(&mut self.shared.inner.lock(), value);
        self.drain();
    }

    fn enqueue(inner: &mut Inner, value: Option<Arc<Dataset>>) {
        inner.version += 1;
        let version = inner.version;
        inner.current = value.clone();
        inner.pending.push_back((version, value));
        trace!("Queued dataset version {}", version);
    }

    fn drain(&self) {
        let delivery = self.shared.delivery.lock();
        if delivery.get() {
            // Re-entrant call from an observer: the outer drain delivers it.
            return;
        }
        delivery.set(true);
        let _reset = DrainGuard(&delivery);

        loop {
            let (version, value, targets) = {
                let mut inner = self.shared.inner.lock();
                let Some((version, value)) = inner.pending.pop_front() else {
                    break;
                };
                let targets: Vec<_> = inner
                    .observers
                    .iter()
                    .filter(|r| r.since_version < version)
                    .map(|r| (Arc::clone(&r.active), Arc::clone(&r.observer)))
                    .collect();
                (version, value, targets)
            };

            debug!(
                "Broadcasting dataset version {} to {} observers",
                version,
                targets.len()
            );
            for (active, observer) in targets {
                if active.load(Ordering::Acquire) {
                    observer.on_dataset(value.clone());
                }
            }
        }
    }
}

struct DrainGuard<'a>(&'a Cell<bool>);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

// ============================================================================
// Subscription handle
// ============================================================================

/// Handle returned by [`DatasetStore::subscribe`].
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    shared: Weak<Shared>,
    active: Arc<AtomicBool>,
}

impl Subscription {
    /// Deregister the observer. Calling it again does nothing.
    pub fn unsubscribe(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        if let Some(shared) = self.shared.upgrade() {
            shared.inner.lock().observers.retain(|r| r.id != self.id);
            debug!("Observer {} unsubscribed", self.id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

static_assertions::assert_impl_all!(DatasetStore: Send, Sync, Clone);
static_assertions::assert_impl_all!(Subscription: Send, Sync);
