//! L3 Molecular Layer: Scoped palette overrides
//!
//! Sections push a palette while they are in view. The effective palette is
//! the most recently pushed live override, or the base palette when none is
//! live. Each push returns a guard that removes the override on drop, so a
//! section unmounted mid-override cannot leave the page themed.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

#[derive(Debug)]
struct StackInner<P> {
    base: P,
    next_id: u64,
    /// (id, key, palette), most recent last
    overrides: Vec<(u64, &'static str, P)>,
}

#[derive(Debug)]
pub struct ThemeStack<P> {
    inner: Rc<RefCell<StackInner<P>>>,
}

impl<P> Clone for ThemeStack<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P: Clone> ThemeStack<P> {
    pub fn new(base: P) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StackInner {
                base,
                next_id: 0,
                overrides: Vec::new(),
            })),
        }
    }

    /// Override the palette for `key`; a previous override with the same key
    /// is replaced
    pub fn push(&self, key: &'static str, palette: P) -> OverrideGuard<P> {
        let mut inner = self.inner.borrow_mut();
        inner.overrides.retain(|(_, k, _)| *k != key);
        let id = inner.next_id;
        inner.next_id += 1;
        inner.overrides.push((id, key, palette));
        tracing::debug!(key, depth = inner.overrides.len(), "Theme override pushed");

        OverrideGuard {
            id,
            key,
            stack: Rc::downgrade(&self.inner),
        }
    }

    /// Effective palette
    pub fn current(&self) -> P {
        let inner = self.inner.borrow();
        inner
            .overrides
            .last()
            .map(|(_, _, p)| p.clone())
            .unwrap_or_else(|| inner.base.clone())
    }

    pub fn base(&self) -> P {
        self.inner.borrow().base.clone()
    }

    /// Live overrides
    pub fn depth(&self) -> usize {
        self.inner.borrow().overrides.len()
    }

    pub fn is_overridden(&self) -> bool {
        self.depth() > 0
    }
}

/// Restores the previous palette when dropped
#[must_use = "dropping an OverrideGuard removes the override immediately"]
pub struct OverrideGuard<P> {
    id: u64,
    key: &'static str,
    stack: Weak<RefCell<StackInner<P>>>,
}

impl<P> OverrideGuard<P> {
    pub fn key(&self) -> &'static str {
        self.key
    }
}

impl<P> fmt::Debug for OverrideGuard<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverrideGuard")
            .field("id", &self.id)
            .field("key", &self.key)
            .finish()
    }
}

impl<P> Drop for OverrideGuard<P> {
    fn drop(&mut self) {
        if let Some(inner) = self.stack.upgrade() {
            if let Ok(mut inner) = inner.try_borrow_mut() {
                // A replaced override already left the stack
                inner.overrides.retain(|(id, _, _)| *id != self.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_restore() {
        let stack = ThemeStack::new("light");
        assert_eq!(stack.current(), "light");

        let guard = stack.push("rings", "dark");
        assert_eq!(stack.current(), "dark");
        drop(guard);
        assert_eq!(stack.current(), "light");
        assert!(!stack.is_overridden());
    }

    #[test]
    fn test_most_recent_wins_and_out_of_order_release() {
        let stack = ThemeStack::new("light");
        let rings = stack.push("rings", "dark");
        let footer = stack.push("footer", "accent");
        assert_eq!(stack.current(), "accent");

        drop(rings);
        assert_eq!(stack.current(), "accent");
        drop(footer);
        assert_eq!(stack.current(), "light");
    }

    #[test]
    fn test_same_key_replaces() {
        let stack = ThemeStack::new("light");
        let first = stack.push("rings", "dark");
        let second = stack.push("rings", "darker");
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.current(), "darker");

        // Dropping the stale guard leaves the replacement in place
        drop(first);
        assert_eq!(stack.current(), "darker");
        drop(second);
        assert_eq!(stack.current(), "light");
    }

    #[test]
    fn test_abrupt_unmount_restores() {
        struct Section {
            _theme: OverrideGuard<&'static str>,
        }

        let stack = ThemeStack::new("light");
        let section = Section {
            _theme: stack.push("rings", "dark"),
        };
        assert_eq!(stack.current(), "dark");
        drop(section);
        assert_eq!(stack.current(), "light");
    }
}
