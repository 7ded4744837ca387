#![forbid(unsafe_code)]

//! Deep collection bindings: one item trigger kept attached to every item of
//! a collection as the collection changes.
//!
//! Binding registers the item trigger on each current item, then listens to
//! the collection. Per change, the optional collection trigger runs first,
//! then the item records are reconciled:
//!
//! | Action | Reconciliation |
//! |--------|----------------|
//! | Move | none |
//! | Reset | detach every owned record, attach to every current item |
//! | Add / Remove / Replace | attach added items, detach removed items |
//!
//! Membership is judged against the collection's contents after the change,
//! so an item present twice keeps its binding when one copy leaves, and is
//! never bound twice.
//!
//! Item records are tagged [`Origin::Collection`] and belong to their deep
//! binding alone. A caller-created trigger on the same item is a separate
//! record; neither side ever removes the other's.

use std::rc::{Rc, Weak};

use ahash::AHashSet;
use ftui_notify::{
    CollectionAction, CollectionChange, NotifyCollectionChanged, NotifyPropertyChanged, ObjectId,
};

use crate::accessor::Property;
use crate::callback::{CollectionTrigger, Trigger};
use crate::error::{BindError, BindResult, BindingKind};
use crate::key::{ContextId, DeepBindingId, Origin, TriggerId};
use crate::registry::{BindingRegistry, RegistryState, validate_name};
use crate::selector::Selector;
use crate::table::{Record, anchor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct DeepKey {
    pub(crate) context: ContextId,
    pub(crate) collection: ObjectId,
    pub(crate) item_property: &'static str,
    pub(crate) item_trigger: TriggerId,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DeepMeta {
    pub(crate) id: DeepBindingId,
}

/// Everything the collection handler needs to reconcile one deep binding.
struct Reconciler<I, V> {
    context: ContextId,
    id: DeepBindingId,
    property: Property<I, V>,
    trigger: Trigger<I, V>,
}

impl<I, V> Reconciler<I, V>
where
    I: NotifyPropertyChanged + 'static,
    V: 'static,
{
    const fn origin(&self) -> Origin {
        Origin::Collection(self.id)
    }

    /// Returns `true` if a new item trigger was registered.
    fn attach(&self, registry: &BindingRegistry, item: &Rc<I>) -> bool {
        let item_id = ObjectId::of(item);
        match registry.attach_changed(
            self.context,
            item,
            &self.property,
            &self.trigger,
            self.origin(),
        ) {
            Ok(()) => {
                tracing::trace!(deep = self.id.raw(), item = %item_id, "attached item trigger");
                true
            }
            Err(BindError::Conflict { .. }) => {
                tracing::trace!(deep = self.id.raw(), item = %item_id, "item already bound");
                false
            }
            Err(err) => {
                tracing::warn!(
                    deep = self.id.raw(),
                    item = %item_id,
                    error = %err,
                    "item trigger rejected"
                );
                false
            }
        }
    }

    fn attach_all(&self, registry: &BindingRegistry, items: &[Rc<I>]) {
        for item in items {
            self.attach(registry, item);
        }
    }

    fn reconcile<C>(
        &self,
        registry: &BindingRegistry,
        collection: &C,
        change: &CollectionChange<Rc<I>>,
    ) where
        C: NotifyCollectionChanged<Item = Rc<I>>,
    {
        match change.action {
            CollectionAction::Move => {}
            CollectionAction::Reset => {
                let detached = registry.detach_origin(self.origin());
                tracing::trace!(deep = self.id.raw(), detached, "reset item triggers");
                self.attach_all(registry, &collection.items());
            }
            CollectionAction::Add | CollectionAction::Remove | CollectionAction::Replace => {
                let present: AHashSet<ObjectId> =
                    collection.items().iter().map(ObjectId::of).collect();
                for old in &change.old_items {
                    let id = ObjectId::of(old);
                    if present.contains(&id) {
                        continue;
                    }
                    let detached = registry.detach_changed(
                        self.context,
                        id,
                        self.property.name(),
                        self.trigger.id(),
                        self.origin(),
                    );
                    if detached {
                        tracing::trace!(deep = self.id.raw(), item = %id, "detached item trigger");
                    }
                }
                for new in &change.new_items {
                    if present.contains(&ObjectId::of(new)) {
                        self.attach(registry, new);
                    }
                }
            }
        }
    }
}

impl BindingRegistry {
    /// Call `item_trigger` whenever `item_property` changes on any item of
    /// `collection`, following items as they are added and removed.
    ///
    /// `collection_trigger`, when given, runs on every collection change
    /// before the item bindings are reconciled.
    ///
    /// # Errors
    ///
    /// - [`BindError::InvalidArgument`](crate::BindError::InvalidArgument)
    ///   if the property name is empty.
    /// - [`BindError::Conflict`](crate::BindError::Conflict) if this item
    ///   trigger is already bound to this collection and property under
    ///   `context`.
    pub fn on_item_property_changed<C, I, V>(
        &self,
        context: ContextId,
        collection: &Rc<C>,
        item_property: &Property<I, V>,
        item_trigger: &Trigger<I, V>,
        collection_trigger: Option<&CollectionTrigger<C>>,
    ) -> BindResult<DeepBindingId>
    where
        C: NotifyCollectionChanged<Item = Rc<I>> + 'static,
        I: NotifyPropertyChanged + 'static,
        V: 'static,
    {
        validate_name(item_property.name(), "item_property")?;
        let key = DeepKey {
            context,
            collection: ObjectId::of(collection),
            item_property: item_property.name(),
            item_trigger: item_trigger.id(),
        };
        Self::ensure_vacant(
            &self.state.deep,
            &key,
            BindingKind::ItemPropertyChanged,
            context,
        )?;

        let id = DeepBindingId::next();
        let reconciler = Rc::new(Reconciler {
            context,
            id,
            property: *item_property,
            trigger: item_trigger.clone(),
        });

        let state: Weak<RegistryState> = Rc::downgrade(&self.state);
        let sender = Rc::downgrade(collection);
        let collection_trigger = collection_trigger.cloned();
        let handler = Rc::clone(&reconciler);
        let subscription = collection.collection_changed().subscribe(move |change| {
            let (Some(state), Some(collection)) = (state.upgrade(), sender.upgrade()) else {
                return;
            };
            if let Some(trigger) = &collection_trigger {
                trigger.invoke(&collection, change);
            }
            let registry = BindingRegistry { state };
            if !registry.state.deep.borrow().any(|_, r| r.meta.id == id) {
                return;
            }
            handler.reconcile(&registry, collection.as_ref(), change);
        });

        let meta = DeepMeta { id };
        Self::store(
            &self.state.deep,
            key,
            Record::new(meta, vec![subscription], vec![anchor(collection)]),
            BindingKind::ItemPropertyChanged,
            context,
        )?;
        reconciler.attach_all(self, &collection.items());
        tracing::debug!(
            context = %context,
            collection = %key.collection,
            property = key.item_property,
            deep = id.raw(),
            items = self.item_binding_count(id),
            "bound item-property trigger"
        );
        Ok(id)
    }

    /// Remove deep bindings matching `selector`, together with the item
    /// triggers they maintain. The selector's object is the collection.
    ///
    /// Returns the number of records removed, item triggers included.
    pub fn unbind_item_property_changed(&self, selector: Selector<'_>) -> usize {
        let removed = self.unbind_deep_where(|k, _| {
            selector.matches(
                k.context,
                k.collection,
                Some(k.item_property),
                k.item_trigger,
            )
        });
        tracing::debug!(context = %selector.scope(), removed, "unbound item-property triggers");
        removed
    }

    /// Remove the deep binding `id` and its item triggers.
    pub fn unbind_deep(&self, id: DeepBindingId) -> usize {
        self.unbind_deep_where(|_, r| r.meta.id == id)
    }

    /// Number of item triggers currently maintained by deep binding `id`.
    #[must_use]
    pub fn item_binding_count(&self, id: DeepBindingId) -> usize {
        self.state
            .triggers
            .borrow()
            .count_where(|k, _| k.origin == Origin::Collection(id))
    }

    pub(crate) fn unbind_deep_where(
        &self,
        pred: impl Fn(&DeepKey, &Record<DeepMeta>) -> bool,
    ) -> usize {
        let taken = self.state.deep.borrow_mut().take_where(pred);
        let items: usize = taken
            .iter()
            .map(|(_, record)| self.detach_origin(Origin::Collection(record.meta.id)))
            .sum();
        let removed = taken.len() + items;
        drop(taken);
        removed
    }
}
