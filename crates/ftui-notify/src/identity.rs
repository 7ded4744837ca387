#![forbid(unsafe_code)]

//! Reference identity for shared participants.
//!
//! Bindings compare participants by identity, never by value. An
//! [`ObjectId`] is the address of an `Rc` allocation. As long as something
//! holds a `Weak` to that allocation the address cannot be reused, so a
//! binding record that keeps a `Weak` alongside the id is never confused by
//! a later object landing at the same address.

use std::fmt;
use std::rc::{Rc, Weak};

/// Identity of an object shared through `Rc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(usize);

impl ObjectId {
    /// Identity of the allocation behind `rc`.
    #[inline]
    #[must_use]
    pub fn of<T: ?Sized>(rc: &Rc<T>) -> Self {
        Self(Rc::as_ptr(rc).cast::<()>() as usize)
    }

    /// Identity of the allocation behind `weak`.
    #[inline]
    #[must_use]
    pub fn of_weak<T: ?Sized>(weak: &Weak<T>) -> Self {
        Self(weak.as_ptr().cast::<()>() as usize)
    }

    /// Raw address value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> usize {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{:x}", self.0)
    }
}
