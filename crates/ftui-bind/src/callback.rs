#![forbid(unsafe_code)]

//! Trigger callbacks with identity.
//!
//! Every trigger is stored behind one internal signature (sender plus
//! payload). The arity-specific constructors adapt narrower closures to it,
//! so a single registry path serves all of them. Identity is assigned at
//! construction; clone a trigger to refer to the same one again when
//! unbinding.

use std::fmt;
use std::rc::Rc;

use ftui_notify::{CollectionChange, NotifyCollectionChanged};

use crate::key::TriggerId;

type PropertyCallback<O, V> = Rc<dyn Fn(&Rc<O>, &V)>;
type CollectionCallback<C, T> = Rc<dyn Fn(&Rc<C>, &CollectionChange<T>)>;

/// Callback fired when a property of `O` (with value type `V`) changes.
pub struct Trigger<O, V> {
    id: TriggerId,
    callback: PropertyCallback<O, V>,
}

impl<O, V> Clone for Trigger<O, V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<O, V> fmt::Debug for Trigger<O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger").field("id", &self.id).finish()
    }
}

impl<O: 'static, V: 'static> Trigger<O, V> {
    /// Trigger receiving the sender and the property value.
    #[must_use]
    pub fn new(callback: impl Fn(&Rc<O>, &V) + 'static) -> Self {
        Self {
            id: TriggerId::next(),
            callback: Rc::new(callback),
        }
    }

    /// Trigger receiving only the property value.
    #[must_use]
    pub fn from_value(callback: impl Fn(&V) + 'static) -> Self {
        Self::new(move |_, value| callback(value))
    }

    /// Trigger receiving nothing.
    #[must_use]
    pub fn from_fn(callback: impl Fn() + 'static) -> Self {
        Self::new(move |_, _| callback())
    }

    /// Identity used for duplicate detection and selective unbind.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TriggerId {
        self.id
    }

    pub(crate) fn invoke(&self, sender: &Rc<O>, value: &V) {
        (self.callback)(sender, value);
    }
}

/// Callback fired when a collection `C` changes.
pub struct CollectionTrigger<C: NotifyCollectionChanged> {
    id: TriggerId,
    callback: CollectionCallback<C, C::Item>,
}

impl<C: NotifyCollectionChanged> Clone for CollectionTrigger<C> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<C: NotifyCollectionChanged> fmt::Debug for CollectionTrigger<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionTrigger")
            .field("id", &self.id)
            .finish()
    }
}

impl<C: NotifyCollectionChanged + 'static> CollectionTrigger<C> {
    /// Trigger receiving the collection and the change.
    #[must_use]
    pub fn new(callback: impl Fn(&Rc<C>, &CollectionChange<C::Item>) + 'static) -> Self {
        Self {
            id: TriggerId::next(),
            callback: Rc::new(callback),
        }
    }

    /// Trigger receiving only the change.
    #[must_use]
    pub fn from_change(callback: impl Fn(&CollectionChange<C::Item>) + 'static) -> Self {
        Self::new(move |_, change| callback(change))
    }

    /// Trigger receiving nothing.
    #[must_use]
    pub fn from_fn(callback: impl Fn() + 'static) -> Self {
        Self::new(move |_, _| callback())
    }

    /// Identity used for duplicate detection and selective unbind.
    #[inline]
    #[must_use]
    pub fn id(&self) -> TriggerId {
        self.id
    }

    pub(crate) fn invoke(&self, sender: &Rc<C>, change: &CollectionChange<C::Item>) {
        (self.callback)(sender, change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ftui_notify::ObservableVec;
    use std::cell::Cell;

    #[test]
    fn clones_share_identity() {
        let t = Trigger::<(), i32>::from_fn(|| {});
        assert_eq!(t.id(), t.clone().id());
        assert_ne!(t.id(), Trigger::<(), i32>::from_fn(|| {}).id());
    }

    #[test]
    fn arity_adapters_forward() {
        let hits = Rc::new(Cell::new(0));
        let sender = Rc::new(());

        let h = Rc::clone(&hits);
        Trigger::<(), i32>::new(move |_, v| h.set(h.get() + v)).invoke(&sender, &1);
        let h = Rc::clone(&hits);
        Trigger::<(), i32>::from_value(move |v| h.set(h.get() + v * 10)).invoke(&sender, &1);
        let h = Rc::clone(&hits);
        Trigger::<(), i32>::from_fn(move || h.set(h.get() + 100)).invoke(&sender, &1);

        assert_eq!(hits.get(), 111);
    }

    #[test]
    fn collection_trigger_adapters_forward() {
        let hits = Rc::new(Cell::new(0));
        let coll = Rc::new(ObservableVec::<i32>::new());
        let change = CollectionChange::added(vec![4], 0);

        let h = Rc::clone(&hits);
        let trigger = CollectionTrigger::<ObservableVec<i32>>::from_change(move |c| {
            h.set(c.new_items[0]);
        });
        trigger.invoke(&coll, &change);
        assert_eq!(hits.get(), 4);

        let h = Rc::clone(&hits);
        let trigger = CollectionTrigger::<ObservableVec<i32>>::from_fn(move || h.set(0));
        trigger.invoke(&coll, &change);
        assert_eq!(hits.get(), 0);
    }
}
