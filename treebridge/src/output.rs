//! Typed, subscribable outputs.
//!
//! An [`Output`] is the adapter's side of an event stream: the adapter emits
//! values, the hosting application subscribes handlers. Emission is
//! synchronous; every handler runs before `emit` returns, in subscription
//! order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Handler closure for an output.
pub type OutputHandler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Identifies a subscription so it can be removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// A typed event stream.
///
/// Clones share the same subscriber list.
pub struct Output<T> {
    handlers: Arc<RwLock<Vec<(Subscription, OutputHandler<T>)>>>,
    next_id: Arc<AtomicU64>,
}

impl<T> Output<T> {
    /// Create an output with no subscribers.
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Register a handler.
    pub fn subscribe(&self, handler: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = Subscription(self.next_id.fetch_add(1, Ordering::SeqCst));
        if let Ok(mut guard) = self.handlers.write() {
            guard.push((id, Arc::new(handler)));
        }
        id
    }

    /// Remove a handler. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.handlers
            .write()
            .map(|mut guard| {
                let before = guard.len();
                guard.retain(|(id, _)| *id != subscription);
                guard.len() != before
            })
            .unwrap_or(false)
    }

    /// Remove every handler.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.handlers.write() {
            guard.clear();
        }
    }

    /// Number of registered handlers.
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().map(|g| g.len()).unwrap_or(0)
    }

    /// Deliver `value` to every handler.
    pub fn emit(&self, value: &T) {
        // Snapshot so handlers can subscribe or unsubscribe while running.
        let handlers: Vec<OutputHandler<T>> = self
            .handlers
            .read()
            .map(|g| g.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default();
        for handler in handlers {
            handler(value);
        }
    }
}

impl<T> Default for Output<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Output<T> {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<T> std::fmt::Debug for Output<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Output")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
