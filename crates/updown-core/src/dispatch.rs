//! Deferred operations run after the current input event is processed.

use std::fmt;

/// A queued operation against the owning widget.
pub type DeferredOp<T> = Box<dyn FnOnce(&mut T) + Send + Sync>;

/// Queue of operations posted during event handling.
///
/// The owner drains the queue once it has finished dispatching the event that
/// posted them, so a deferred operation never observes a half-handled event.
pub struct Dispatcher<T> {
    pending: Vec<DeferredOp<T>>,
}

impl<T> Dispatcher<T> {
    /// Create an empty dispatcher.
    pub const fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Queue an operation for later.
    pub fn post<F>(&mut self, op: F)
    where
        F: FnOnce(&mut T) + Send + Sync + 'static,
    {
        self.pending.push(Box::new(op));
    }

    /// Take all pending operations, in posting order.
    pub fn drain(&mut self) -> Vec<DeferredOp<T>> {
        std::mem::take(&mut self.pending)
    }

    /// Get the number of pending operations.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl<T> Default for Dispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Dispatcher<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("pending", &self.pending.len())
            .finish()
    }
}
