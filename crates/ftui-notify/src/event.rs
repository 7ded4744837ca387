#![forbid(unsafe_code)]

//! Multicast notification events with explicit, detachable subscriptions.
//!
//! # Design
//!
//! [`EventSource<A>`] owns a shared handler list (`Rc<RefCell<..>>`). Each
//! call to [`subscribe`](EventSource::subscribe) appends a handler and hands
//! back a [`Subscription`]; dropping (or [`detach`](Subscription::detach)ing)
//! the subscription removes the handler again.
//!
//! # Performance
//!
//! | Operation     | Complexity               |
//! |---------------|--------------------------|
//! | `subscribe()` | O(1) amortized           |
//! | `detach()`    | O(H) where H = handlers  |
//! | `raise()`     | O(H)                     |
//!
//! # Invariants
//!
//! 1. Handlers are invoked in subscription order.
//! 2. `raise()` snapshots the handler list before invoking anything, so
//!    handlers may subscribe or detach re-entrantly without a borrow panic.
//! 3. A handler detached while a raise is in flight is skipped for the rest
//!    of that raise.
//! 4. Detaching a subscription whose source is gone is a no-op.
//! 5. A detached handler is dropped outside the list borrow, so its callback
//!    may own further subscriptions to the same event.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

/// Handler entry shared between the list and in-flight raise snapshots.
struct HandlerEntry<A> {
    id: u64,
    attached: Cell<bool>,
    callback: Box<dyn Fn(&A)>,
}

struct HandlerList<A> {
    next_id: u64,
    entries: Vec<Rc<HandlerEntry<A>>>,
}

impl<A> HandlerList<A> {
    /// Unlink handler `id` and hand the entry back. Drop it only after the
    /// list borrow is released: the callback may own subscriptions to this
    /// same event.
    fn detach(&mut self, id: u64) -> Option<Rc<HandlerEntry<A>>> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        let entry = self.entries.remove(pos);
        entry.attached.set(false);
        Some(entry)
    }
}

/// A multicast event carrying arguments of type `A`.
///
/// Cloning an `EventSource` creates another handle to the **same** handler
/// list.
pub struct EventSource<A> {
    inner: Rc<RefCell<HandlerList<A>>>,
}

impl<A> Clone for EventSource<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A> fmt::Debug for EventSource<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSource")
            .field("handler_count", &self.inner.borrow().entries.len())
            .finish()
    }
}

impl<A: 'static> Default for EventSource<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: 'static> EventSource<A> {
    /// Create an event with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(HandlerList {
                next_id: 1,
                entries: Vec::new(),
            })),
        }
    }

    /// Attach `handler`. It stays attached until the returned
    /// [`Subscription`] is dropped or detached.
    pub fn subscribe(&self, handler: impl Fn(&A) + 'static) -> Subscription {
        let id = {
            let mut list = self.inner.borrow_mut();
            let id = list.next_id;
            list.next_id += 1;
            list.entries.push(Rc::new(HandlerEntry {
                id,
                attached: Cell::new(true),
                callback: Box::new(handler),
            }));
            id
        };
        let weak: Weak<RefCell<HandlerList<A>>> = Rc::downgrade(&self.inner);
        Subscription {
            detach: Some(Box::new(move || {
                let Some(list) = weak.upgrade() else {
                    return false;
                };
                let removed = list.borrow_mut().detach(id);
                let detached = removed.is_some();
                drop(removed);
                detached
            })),
        }
    }

    /// Invoke every attached handler with `args`.
    pub fn raise(&self, args: &A) {
        let snapshot: Vec<Rc<HandlerEntry<A>>> = self.inner.borrow().entries.clone();
        for entry in &snapshot {
            if entry.attached.get() {
                (entry.callback)(args);
            }
        }
    }

    /// Number of attached handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Whether no handler is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handler_count() == 0
    }
}

/// Handle for one attached handler.
///
/// Dropping the `Subscription` detaches the handler. The handle is
/// type-erased so records of different event types can be stored together.
#[must_use = "dropping a Subscription detaches its handler immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce() -> bool>>,
}

impl Subscription {
    /// Detach the handler now. Returns `true` if it was still attached.
    pub fn detach(mut self) -> bool {
        self.detach.take().is_some_and(|detach| detach())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
