use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::{AppEvent, EventKind};

type Handler = Arc<dyn Fn(&AppEvent) + Send + Sync>;

#[derive(Default)]
struct EventBusInner {
    next_id: AtomicU64,
    handlers: Mutex<HashMap<EventKind, Vec<(u64, Handler)>>>,
}

impl EventBusInner {
    fn remove(&self, kind: EventKind, id: u64) -> bool {
        let mut handlers = self.handlers.lock();
        let Some(list) = handlers.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(handler_id, _)| *handler_id != id);
        list.len() != before
    }
}

/// Publish/subscribe hub for [`AppEvent`]s. Cloning yields another handle to
/// the same bus.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<EventBusInner>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for events of `kind` until the returned
    /// subscription is dropped.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .handlers
            .lock()
            .entry(kind)
            .or_default()
            .push((id, Arc::new(handler)));
        tracing::trace!(event = kind.name(), id, "Subscribed");
        Subscription {
            bus: Arc::downgrade(&self.inner),
            kind,
            id,
            active: true,
        }
    }

    /// Delivers `event` to the handlers subscribed when the call starts and
    /// returns how many were called.
    pub fn emit(&self, event: &AppEvent) -> usize {
        let kind = event.kind();
        // Handlers run without the lock so they may (un)subscribe.
        let handlers: Vec<Handler> = match self.inner.handlers.lock().get(&kind) {
            Some(list) => list.iter().map(|(_, handler)| handler.clone()).collect(),
            None => Vec::new(),
        };
        tracing::debug!(event = kind.name(), listeners = handlers.len(), "Emitting event");
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.inner
            .handlers
            .lock()
            .get(&kind)
            .map_or(0, |list| list.len())
    }
}

/// Live registration on an [`EventBus`]; unsubscribes when dropped.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    bus: Weak<EventBusInner>,
    kind: EventKind,
    id: u64,
    active: bool,
}

impl Subscription {
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(bus) = self.bus.upgrade() {
            if bus.remove(self.kind, self.id) {
                tracing::trace!(event = self.kind.name(), id = self.id, "Unsubscribed");
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}
