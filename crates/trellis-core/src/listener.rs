//! Listener registry
//!
//! Listeners are keyed by the exact [`EventKind`] they handle and kept in
//! registration order, which is also the dispatch order.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::{Event, EventKind};

/// Error type returned by failing listeners
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// Something that reacts to events
pub trait EventListener {
    fn process(&self, event: &Event) -> Result<(), ListenerError>;
}

impl<F> EventListener for F
where
    F: Fn(&Event) -> Result<(), ListenerError>,
{
    fn process(&self, event: &Event) -> Result<(), ListenerError> {
        self(event)
    }
}

/// Listener handle, used for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Ordered list of listeners
#[derive(Default)]
pub struct ListenerList {
    entries: Vec<(ListenerId, Rc<dyn EventListener>)>,
    next_id: u64,
}

impl ListenerList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure listener
    pub fn add<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&Event) -> Result<(), ListenerError> + 'static,
    {
        self.add_listener(Rc::new(listener))
    }

    /// Register a shared listener
    pub fn add_listener(&mut self, listener: Rc<dyn EventListener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Remove a listener, returns false if it was not registered
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() < before
    }

    /// Clone the current listeners, in registration order.
    ///
    /// Dispatch iterates the snapshot so listeners registered while an
    /// event is being delivered only see later events.
    pub fn snapshot(&self) -> Vec<Rc<dyn EventListener>> {
        self.entries.iter().map(|(_, l)| Rc::clone(l)).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for ListenerList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerList")
            .field("ids", &self.entries.iter().map(|(id, _)| id.0).collect::<Vec<_>>())
            .finish()
    }
}

/// Per-component mapping from event kind to listeners
#[derive(Debug, Default)]
pub struct ListenerMap {
    listeners: HashMap<EventKind, ListenerList>,
}

impl ListenerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure listener for `kind`
    pub fn add<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: Fn(&Event) -> Result<(), ListenerError> + 'static,
    {
        self.listeners.entry(kind).or_default().add(listener)
    }

    /// Register a shared listener for `kind`
    pub fn add_listener(&mut self, kind: EventKind, listener: Rc<dyn EventListener>) -> ListenerId {
        self.listeners.entry(kind).or_default().add_listener(listener)
    }

    pub fn remove(&mut self, kind: EventKind, id: ListenerId) -> bool {
        self.listeners
            .get_mut(&kind)
            .is_some_and(|list| list.remove(id))
    }

    /// Listeners registered for exactly `kind`, in registration order
    pub fn get_listeners(&self, kind: EventKind) -> Vec<Rc<dyn EventListener>> {
        self.listeners
            .get(&kind)
            .map(ListenerList::snapshot)
            .unwrap_or_default()
    }

    /// Number of listeners registered for `kind`
    pub fn count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map_or(0, ListenerList::len)
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.values().all(ListenerList::is_empty)
    }

    pub fn clear(&mut self, kind: EventKind) {
        self.listeners.remove(&kind);
    }
}
