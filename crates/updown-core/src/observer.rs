//! Per-instance typed notifications.
//!
//! Each widget owns one [`Observers`] list per notification it raises, wired
//! at construction. Dispatch is synchronous and in subscription order.
//!
//! # Example
//!
//! ```
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::sync::Arc;
//! use updown_core::Observers;
//!
//! let seen = Arc::new(AtomicU32::new(0));
//! let mut changed: Observers<u32> = Observers::new();
//! let sink = Arc::clone(&seen);
//! changed.subscribe(move |v| sink.store(*v, Ordering::SeqCst));
//! changed.notify(&7);
//! assert_eq!(seen.load(Ordering::SeqCst), 7);
//! ```

use std::fmt;

/// Type alias for subscriber callbacks.
type SubscriberFn<T> = Box<dyn Fn(&T) + Send + Sync>;

/// Handle returned by [`Observers::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A list of subscribers for one kind of notification.
pub struct Observers<T> {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, SubscriberFn<T>)>,
}

impl<T> Observers<T> {
    /// Create an empty subscriber list.
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    /// Subscribe to notifications.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    /// Deliver a notification to every subscriber.
    pub fn notify(&self, payload: &T) {
        for (_, sub) in &self.subscribers {
            sub(payload);
        }
    }

    /// Number of active subscribers.
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Check if there are no subscribers.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

impl<T> Default for Observers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Observers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}
