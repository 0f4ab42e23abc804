//! Fire-and-forget dispatch bus
//!
//! Listeners are called in subscription order. Nothing a listener returns is
//! observed by the emitter.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a registered listener
    pub struct ListenerId;
}

/// Callback type for bus listeners
pub type Listener<E> = Box<dyn FnMut(&E)>;

/// A listener list for events of type `E`
pub struct Dispatcher<E> {
    listeners: SlotMap<ListenerId, Listener<E>>,
    order: Vec<ListenerId>,
}

impl<E> Default for Dispatcher<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for Dispatcher<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("listeners", &self.order.len())
            .finish()
    }
}

impl<E> Dispatcher<E> {
    pub fn new() -> Self {
        Self {
            listeners: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Register a listener; it receives every event dispatched afterwards
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&E) + 'static,
    {
        let id = self.listeners.insert(Box::new(listener));
        self.order.push(id);
        id
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        if self.listeners.remove(id).is_some() {
            self.order.retain(|l| *l != id);
            true
        } else {
            false
        }
    }

    /// Deliver `event` to every listener
    pub fn dispatch(&mut self, event: &E) {
        for id in &self.order {
            if let Some(listener) = self.listeners.get_mut(*id) {
                listener(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
