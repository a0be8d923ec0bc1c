//! Synchronous listener fan-out.
//!
//! A [`Bus`] holds a set of callbacks and invokes each of them, in registration
//! order, every time [`Bus::notify`] is called. Subscribing returns a
//! [`Subscription`] handle; calling [`Subscription::unsubscribe`] removes exactly
//! that callback and is a no-op on repeat calls or once the bus is gone.
//!
//! Notification is re-entrant: a callback may subscribe, unsubscribe or notify
//! again while it runs. A callback removed during a notification pass is not
//! invoked for the remainder of that pass. A panicking callback is caught and
//! logged; the remaining callbacks still run.

use std::{
    any::Any,
    fmt,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::{
        Arc, Weak,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;
use tracing::{trace, warn};

/// Boxed listener callback.
type Callback<E> = Box<dyn Fn(&E) + Send + Sync>;

/// A registered callback plus its liveness flag.
struct Listener<E> {
    /// Registry key, unique for the lifetime of the bus.
    id: u64,
    /// Cleared on unsubscribe so in-flight notification passes skip it.
    active: AtomicBool,
    /// The callback itself.
    callback: Callback<E>,
}

/// Shared registry state.
struct Inner<E> {
    /// Next listener id.
    next_id: AtomicU64,
    /// Listeners in registration order.
    listeners: Mutex<Vec<Arc<Listener<E>>>>,
}

impl<E> Inner<E> {
    /// Remove the listener with `id`, returning whether it was present.
    fn remove(&self, id: u64) -> bool {
        let mut listeners = self.listeners.lock();
        let Some(pos) = listeners.iter().position(|l| l.id == id) else {
            return false;
        };
        let listener = listeners.remove(pos);
        listener.active.store(false, Ordering::Release);
        true
    }
}

/// Outcome of a single [`Bus::notify`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Callbacks that returned normally.
    pub delivered: usize,
    /// Callbacks that panicked.
    pub panicked: usize,
}

/// A synchronous event bus delivering `&E` to every current subscriber.
pub struct Bus<E> {
    /// Shared registry; subscriptions hold a weak reference to it.
    inner: Arc<Inner<E>>,
}

impl<E> Clone for Bus<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<E> Default for Bus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for Bus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bus")
            .field("listeners", &self.len())
            .finish_non_exhaustive()
    }
}

impl<E> Bus<E> {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(1),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Register `callback`. The returned handle removes it again.
    pub fn subscribe<F>(&self, callback: F) -> Subscription<E>
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners.lock().push(Arc::new(Listener {
            id,
            active: AtomicBool::new(true),
            callback: Box::new(callback),
        }));
        trace!(id, "bus_subscribe");
        Subscription {
            id,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Invoke every current subscriber with `event`.
    ///
    /// The subscriber list is snapshotted before the pass, so callbacks added
    /// during the pass are first invoked on the next notification.
    pub fn notify(&self, event: &E) -> Delivery {
        let snapshot: Vec<Arc<Listener<E>>> = self.inner.listeners.lock().clone();
        let mut delivery = Delivery::default();
        for listener in snapshot {
            if !listener.active.load(Ordering::Acquire) {
                continue;
            }
            match catch_unwind(AssertUnwindSafe(|| (listener.callback)(event))) {
                Ok(()) => delivery.delivered += 1,
                Err(payload) => {
                    delivery.panicked += 1;
                    warn!(
                        id = listener.id,
                        panic = %panic_message(payload.as_ref()),
                        "listener_panicked"
                    );
                }
            }
        }
        delivery
    }

    /// Number of registered callbacks.
    pub fn len(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    /// True when no callbacks are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Best-effort rendering of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

/// Handle for a single registered callback.
///
/// Dropping the handle leaves the callback registered; call
/// [`Subscription::unsubscribe`] to remove it.
pub struct Subscription<E> {
    /// Listener id within the bus.
    id: u64,
    /// Weak link back to the registry.
    bus: Weak<Inner<E>>,
}

impl<E> Clone for Subscription<E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            bus: Weak::clone(&self.bus),
        }
    }
}

impl<E> fmt::Debug for Subscription<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl<E> Subscription<E> {
    /// Remove the callback. Returns true only for the call that removed it.
    pub fn unsubscribe(&self) -> bool {
        let removed = self.bus.upgrade().is_some_and(|inner| inner.remove(self.id));
        if removed {
            trace!(id = self.id, "bus_unsubscribe");
        }
        removed
    }

    /// True while the callback is still registered.
    pub fn is_active(&self) -> bool {
        self.bus
            .upgrade()
            .is_some_and(|inner| inner.listeners.lock().iter().any(|l| l.id == self.id))
    }
}
