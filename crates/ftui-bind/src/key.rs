#![forbid(unsafe_code)]

//! Identity keys used to scope and match bindings.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use ftui_notify::ObjectId;

static CONTEXT_COUNTER: AtomicU64 = AtomicU64::new(1);
static TRIGGER_COUNTER: AtomicU64 = AtomicU64::new(1);
static DEEP_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ContextRepr {
    Token(u64),
    Raw(u64),
    Object(ObjectId),
}

/// Opaque key grouping bindings for bulk removal.
///
/// Typically the view that owns the bindings. Three flavours never collide
/// with each other:
///
/// - [`ContextId::new`]: a fresh, process-unique token.
/// - [`ContextId::from_raw`]: a caller-chosen number.
/// - [`ContextId::of`]: the identity of an `Rc`-shared owner. Valid while
///   the owner is alive; unbind before dropping it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(ContextRepr);

impl ContextId {
    /// Allocate a fresh context.
    #[must_use]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(ContextRepr::Token(
            CONTEXT_COUNTER.fetch_add(1, Ordering::Relaxed),
        ))
    }

    /// Context keyed by a caller-chosen number.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(ContextRepr::Raw(raw))
    }

    /// Context keyed by the identity of `owner`.
    #[must_use]
    pub fn of<T: ?Sized>(owner: &Rc<T>) -> Self {
        Self(ContextRepr::Object(ObjectId::of(owner)))
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            ContextRepr::Token(n) => write!(f, "ctx#{n}"),
            ContextRepr::Raw(n) => write!(f, "ctx:{n}"),
            ContextRepr::Object(id) => write!(f, "ctx@{id}"),
        }
    }
}

/// Identity of a trigger callback. Clones of a trigger share it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerId(u64);

impl TriggerId {
    pub(crate) fn next() -> Self {
        Self(TRIGGER_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Handle of one deep collection-item binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeepBindingId(u64);

impl DeepBindingId {
    pub(crate) fn next() -> Self {
        Self(DEEP_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Who created a trigger record.
///
/// Records created by a deep collection binding belong to it alone: plain
/// trigger unbinds skip them, and the deep binding's reconciliation never
/// touches direct records on the same item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Bound by the caller.
    Direct,
    /// Maintained by the deep binding with this id.
    Collection(DeepBindingId),
}
