#![forbid(unsafe_code)]

//! Collection change notification and an observable vector.
//!
//! A [`CollectionChange`] describes one mutation: an action tag plus the
//! items that entered and left the collection. `Move` reorders without any
//! change of membership. `Reset` means "contents changed drastically" and
//! carries no item lists; consumers re-scan the collection.
//!
//! # Invariants
//!
//! 1. `ObservableVec` raises exactly one change per mutating call that
//!    alters the contents.
//! 2. The change is raised after the mutation, with no borrow held, so
//!    handlers may enumerate the collection.
//! 3. `Move` never lists items in `new_items`/`old_items` as added or
//!    removed; it repeats the moved item in both with the two indices.

use std::cell::RefCell;
use std::fmt;

use crate::event::EventSource;

/// What kind of mutation a [`CollectionChange`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionAction {
    /// Items were inserted.
    Add,
    /// Items were removed.
    Remove,
    /// Items were replaced in place.
    Replace,
    /// An item changed position.
    Move,
    /// The contents changed in a way that is not described item by item.
    Reset,
}

impl fmt::Display for CollectionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Remove => write!(f, "remove"),
            Self::Replace => write!(f, "replace"),
            Self::Move => write!(f, "move"),
            Self::Reset => write!(f, "reset"),
        }
    }
}

/// One collection mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionChange<T> {
    /// The mutation kind.
    pub action: CollectionAction,
    /// Items that entered the collection (or the moved item for `Move`).
    pub new_items: Vec<T>,
    /// Items that left the collection (or the moved item for `Move`).
    pub old_items: Vec<T>,
    /// Index of the first new item, when known.
    pub new_index: Option<usize>,
    /// Index of the first old item, when known.
    pub old_index: Option<usize>,
}

impl<T> CollectionChange<T> {
    /// Items inserted at `index`.
    #[must_use]
    pub fn added(items: Vec<T>, index: usize) -> Self {
        Self {
            action: CollectionAction::Add,
            new_items: items,
            old_items: Vec::new(),
            new_index: Some(index),
            old_index: None,
        }
    }

    /// Items removed from `index`.
    #[must_use]
    pub fn removed(items: Vec<T>, index: usize) -> Self {
        Self {
            action: CollectionAction::Remove,
            new_items: Vec::new(),
            old_items: items,
            new_index: None,
            old_index: Some(index),
        }
    }

    /// `old` replaced by `new` at `index`.
    #[must_use]
    pub fn replaced(new: Vec<T>, old: Vec<T>, index: usize) -> Self {
        Self {
            action: CollectionAction::Replace,
            new_items: new,
            old_items: old,
            new_index: Some(index),
            old_index: Some(index),
        }
    }

    /// `item` moved from `from` to `to`.
    #[must_use]
    pub fn moved(item: T, from: usize, to: usize) -> Self
    where
        T: Clone,
    {
        Self {
            action: CollectionAction::Move,
            new_items: vec![item.clone()],
            old_items: vec![item],
            new_index: Some(to),
            old_index: Some(from),
        }
    }

    /// Contents changed wholesale.
    #[must_use]
    pub fn reset() -> Self {
        Self {
            action: CollectionAction::Reset,
            new_items: Vec::new(),
            old_items: Vec::new(),
            new_index: None,
            old_index: None,
        }
    }
}

/// Capability: raises collection-changed and can enumerate its items.
pub trait NotifyCollectionChanged {
    /// Element handle type. Usually an `Rc` so identity is preserved.
    type Item: Clone + 'static;

    /// The collection-changed event.
    fn collection_changed(&self) -> &EventSource<CollectionChange<Self::Item>>;

    /// Snapshot of the current items, in order.
    fn items(&self) -> Vec<Self::Item>;
}

/// A `Vec` that raises [`CollectionChange`] on every mutation.
pub struct ObservableVec<T> {
    items: RefCell<Vec<T>>,
    changed: EventSource<CollectionChange<T>>,
}

impl<T: fmt::Debug> fmt::Debug for ObservableVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableVec")
            .field("items", &self.items.borrow())
            .field("changed", &self.changed)
            .finish()
    }
}

impl<T: Clone + 'static> Default for ObservableVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> ObservableVec<T> {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Create a collection holding `items`. No change is raised.
    #[must_use]
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items: RefCell::new(items),
            changed: EventSource::new(),
        }
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Clone of the item at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.borrow().get(index).cloned()
    }

    /// Append an item.
    pub fn push(&self, item: T) {
        let index = {
            let mut items = self.items.borrow_mut();
            items.push(item.clone());
            items.len() - 1
        };
        self.changed
            .raise(&CollectionChange::added(vec![item], index));
    }

    /// Insert an item at `index`, clamped to the length.
    pub fn insert(&self, index: usize, item: T) {
        let index = {
            let mut items = self.items.borrow_mut();
            let index = index.min(items.len());
            items.insert(index, item.clone());
            index
        };
        self.changed
            .raise(&CollectionChange::added(vec![item], index));
    }

    /// Remove and return the item at `index`, if any.
    pub fn remove(&self, index: usize) -> Option<T> {
        let removed = {
            let mut items = self.items.borrow_mut();
            if index >= items.len() {
                return None;
            }
            items.remove(index)
        };
        self.changed
            .raise(&CollectionChange::removed(vec![removed.clone()], index));
        Some(removed)
    }

    /// Replace the item at `index`, returning the old one.
    pub fn replace(&self, index: usize, item: T) -> Option<T> {
        let old = {
            let mut items = self.items.borrow_mut();
            let slot = items.get_mut(index)?;
            std::mem::replace(slot, item.clone())
        };
        self.changed.raise(&CollectionChange::replaced(
            vec![item],
            vec![old.clone()],
            index,
        ));
        Some(old)
    }

    /// Move the item at `from` to position `to`. Out-of-range indices and
    /// `from == to` are ignored.
    pub fn move_item(&self, from: usize, to: usize) {
        let moved = {
            let mut items = self.items.borrow_mut();
            if from == to || from >= items.len() || to >= items.len() {
                return;
            }
            let item = items.remove(from);
            items.insert(to, item.clone());
            item
        };
        self.changed
            .raise(&CollectionChange::moved(moved, from, to));
    }

    /// Remove every item. Raises `Reset`.
    pub fn clear(&self) {
        let was_empty = {
            let mut items = self.items.borrow_mut();
            let was_empty = items.is_empty();
            items.clear();
            was_empty
        };
        if !was_empty {
            self.changed.raise(&CollectionChange::reset());
        }
    }

    /// Swap in entirely new contents. Raises `Reset`.
    pub fn reset_with(&self, items: Vec<T>) {
        *self.items.borrow_mut() = items;
        self.changed.raise(&CollectionChange::reset());
    }
}

impl<T: Clone + 'static> NotifyCollectionChanged for ObservableVec<T> {
    type Item = T;

    fn collection_changed(&self) -> &EventSource<CollectionChange<T>> {
        &self.changed
    }

    fn items(&self) -> Vec<T> {
        self.items.borrow().clone()
    }
}
