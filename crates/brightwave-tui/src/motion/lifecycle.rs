//! L4 Atomic Layer: Listener registration with paired teardown
//!
//! Every scroll/resize/intersection/frame/timer listener a component registers
//! is represented by a [`Listener`] guard. Dropping the guard removes the
//! registration, so dropping a component releases everything it registered.
//!
//! The registry is single-threaded (`Rc<RefCell<_>>`); it lives on the UI
//! loop together with the components that use it.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Event source a listener is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListenerKind {
    Scroll,
    Resize,
    Intersection,
    Frame,
    Timer,
}

impl fmt::Display for ListenerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ListenerKind::Scroll => "scroll",
            ListenerKind::Resize => "resize",
            ListenerKind::Intersection => "intersection",
            ListenerKind::Frame => "frame",
            ListenerKind::Timer => "timer",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Default)]
struct RegistryInner {
    next_id: u64,
    active: BTreeMap<u64, (ListenerKind, &'static str)>,
}

/// Shared registry of live listeners
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener owned by `owner`; it stays registered until the
    /// returned guard is dropped
    pub fn register(&self, kind: ListenerKind, owner: &'static str) -> Listener {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.active.insert(id, (kind, owner));
        tracing::trace!(id, %kind, owner, "Listener registered");

        Listener {
            id,
            kind,
            registry: Rc::downgrade(&self.inner),
        }
    }

    /// Number of live listeners
    pub fn count(&self) -> usize {
        self.inner.borrow().active.len()
    }

    pub fn count_kind(&self, kind: ListenerKind) -> usize {
        self.inner
            .borrow()
            .active
            .values()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    /// Live listeners belonging to one owner
    pub fn count_owner(&self, owner: &str) -> usize {
        self.inner
            .borrow()
            .active
            .values()
            .filter(|(_, o)| *o == owner)
            .count()
    }
}

/// Registration guard; unregisters on drop
#[must_use = "dropping a Listener unregisters it immediately"]
pub struct Listener {
    id: u64,
    kind: ListenerKind,
    registry: Weak<RefCell<RegistryInner>>,
}

impl Listener {
    pub fn kind(&self) -> ListenerKind {
        self.kind
    }

    /// Unregister now
    pub fn release(self) {}
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            if let Ok(mut inner) = inner.try_borrow_mut() {
                inner.active.remove(&self.id);
            } else {
                tracing::warn!(id = self.id, kind = %self.kind, "Registry busy, listener leaked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_unregisters() {
        let registry = ListenerRegistry::new();
        let scroll = registry.register(ListenerKind::Scroll, "test");
        let resize = registry.register(ListenerKind::Resize, "test");
        assert_eq!(registry.count(), 2);
        assert_eq!(registry.count_kind(ListenerKind::Scroll), 1);

        drop(scroll);
        assert_eq!(registry.count(), 1);
        resize.release();
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_owned_by_component() {
        struct Component {
            _listeners: Vec<Listener>,
        }

        let registry = ListenerRegistry::new();
        let component = Component {
            _listeners: vec![
                registry.register(ListenerKind::Scroll, "component"),
                registry.register(ListenerKind::Intersection, "component"),
                registry.register(ListenerKind::Timer, "component"),
            ],
        };
        assert_eq!(registry.count_owner("component"), 3);

        drop(component);
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_guard_outliving_registry() {
        let registry = ListenerRegistry::new();
        let listener = registry.register(ListenerKind::Frame, "late");
        drop(registry);
        // No registry left to update; dropping must not panic
        drop(listener);
    }
}
