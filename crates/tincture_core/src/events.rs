//! Observer lists
//!
//! A small dispatch primitive used for change notifications. Handlers are
//! keyed by a [`SubscriptionId`] so callers can detach them again.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle returned by [`Observers::subscribe`]
    pub struct SubscriptionId;
}

/// Event handler function type
pub type Handler<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Dispatches events to registered handlers
pub struct Observers<E> {
    handlers: SlotMap<SubscriptionId, Handler<E>>,
}

impl<E> Observers<E> {
    pub fn new() -> Self {
        Self {
            handlers: SlotMap::with_key(),
        }
    }

    /// Register a handler
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.handlers.insert(Box::new(handler))
    }

    /// Remove a handler. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.handlers.remove(id).is_some()
    }

    /// Dispatch an event to all registered handlers
    pub fn notify(&self, event: &E) {
        for (_, handler) in self.handlers.iter() {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<E> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Observers<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
