//! Navigation event source and an in-process emitter implementing it

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use super::events::{NavigationEvent, NavigationEventKind};

/// Callback invoked for each delivered navigation event
pub type NavigationHandler = Arc<dyn Fn(&NavigationEvent) + Send + Sync>;

/// Identifies a registered handler so it can be removed again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(Uuid);

impl HandlerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for HandlerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A source of navigation lifecycle events with named subscription points
pub trait NavigationSource: Send + Sync {
    /// Register `handler` for events of `kind`
    fn on(&self, kind: NavigationEventKind, handler: NavigationHandler) -> HandlerId;

    /// Remove a handler. Returns false if it was not registered for `kind`.
    fn off(&self, kind: NavigationEventKind, id: HandlerId) -> bool;
}

/// Synchronous in-process navigation event emitter
#[derive(Default)]
pub struct NavigationBus {
    handlers: Mutex<HashMap<NavigationEventKind, Vec<(HandlerId, NavigationHandler)>>>,
}

impl NavigationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` to every handler registered for its kind.
    ///
    /// Handlers run outside the registry lock, so they may call `on`/`off`.
    /// Returns the number of handlers invoked.
    pub fn emit(&self, event: &NavigationEvent) -> usize {
        let kind = event.kind();
        let handlers: Vec<NavigationHandler> = self
            .handlers
            .lock()
            .get(&kind)
            .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();

        tracing::trace!(event = %kind, url = event.url(), handlers = handlers.len(), "Emitting navigation event");

        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Number of handlers currently registered for `kind`
    pub fn handler_count(&self, kind: NavigationEventKind) -> usize {
        self.handlers.lock().get(&kind).map_or(0, Vec::len)
    }
}

impl NavigationSource for NavigationBus {
    fn on(&self, kind: NavigationEventKind, handler: NavigationHandler) -> HandlerId {
        let id = HandlerId::new();
        self.handlers
            .lock()
            .entry(kind)
            .or_default()
            .push((id, handler));
        id
    }

    fn off(&self, kind: NavigationEventKind, id: HandlerId) -> bool {
        let mut handlers = self.handlers.lock();
        let Some(list) = handlers.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(existing, _)| *existing != id);
        let removed = list.len() != before;
        if list.is_empty() {
            handlers.remove(&kind);
        }
        removed
    }
}

impl fmt::Debug for NavigationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.lock();
        let mut s = f.debug_struct("NavigationBus");
        for kind in NavigationEventKind::all() {
            s.field(kind.as_str(), &handlers.get(kind).map_or(0, Vec::len));
        }
        s.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_handler(counter: &Arc<AtomicUsize>) -> NavigationHandler {
        let counter = counter.clone();
        Arc::new(move |_event: &NavigationEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_emit_reaches_matching_kind_only() {
        let bus = NavigationBus::new();
        let complete = Arc::new(AtomicUsize::new(0));
        let start = Arc::new(AtomicUsize::new(0));
        bus.on(NavigationEventKind::Complete, counting_handler(&complete));
        bus.on(NavigationEventKind::Start, counting_handler(&start));

        assert_eq!(bus.emit(&NavigationEvent::complete("/a", false)), 1);
        assert_eq!(complete.load(Ordering::SeqCst), 1);
        assert_eq!(start.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_off_removes_only_that_handler() {
        let bus = NavigationBus::new();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let id = bus.on(NavigationEventKind::Complete, counting_handler(&first));
        bus.on(NavigationEventKind::Complete, counting_handler(&second));

        assert!(bus.off(NavigationEventKind::Complete, id));
        assert!(!bus.off(NavigationEventKind::Complete, id));
        assert!(!bus.off(NavigationEventKind::Start, id));

        bus.emit(&NavigationEvent::complete("/a", false));
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert_eq!(bus.handler_count(NavigationEventKind::Complete), 1);
    }

    #[test]
    fn test_handler_may_unregister_itself() {
        let bus = Arc::new(NavigationBus::new());
        let slot: Arc<Mutex<Option<HandlerId>>> = Arc::new(Mutex::new(None));

        let bus_ref = Arc::downgrade(&bus);
        let slot_ref = slot.clone();
        let id = bus.on(
            NavigationEventKind::Start,
            Arc::new(move |_event: &NavigationEvent| {
                if let (Some(bus), Some(id)) = (bus_ref.upgrade(), *slot_ref.lock()) {
                    bus.off(NavigationEventKind::Start, id);
                }
            }),
        );
        *slot.lock() = Some(id);

        assert_eq!(bus.emit(&NavigationEvent::start("/a", false)), 1);
        assert_eq!(bus.emit(&NavigationEvent::start("/b", false)), 0);
    }
}
