#![forbid(unsafe_code)]

//! Trigger bindings: callbacks on property-changed, property-changing and
//! collection-changed notifications.
//!
//! A trigger binding only calls back; it never writes a value. The handler
//! attached to the observable filters by property name, reads the current
//! value through the [`Property`] getter and hands it to the [`Trigger`].
//! For the changing variant the value is read before the change lands.
//!
//! # Invariants
//!
//! 1. No two records share (context, kind, observable, property, trigger,
//!    origin).
//! 2. Plain unbinds only remove records the caller created
//!    ([`Origin::Direct`]); item triggers maintained by a deep collection
//!    binding are left to that binding.

use std::rc::Rc;

use ftui_notify::{
    NotifyCollectionChanged, NotifyPropertyChanged, NotifyPropertyChanging, ObjectId,
    PropertyChangedArgs,
};

use crate::accessor::Property;
use crate::callback::{CollectionTrigger, Trigger};
use crate::error::{BindResult, BindingKind};
use crate::key::{ContextId, Origin, TriggerId};
use crate::registry::{BindingRegistry, validate_name};
use crate::selector::Selector;
use crate::table::{Record, anchor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum TriggerKind {
    Changed,
    Changing,
}

impl TriggerKind {
    const fn binding_kind(self) -> BindingKind {
        match self {
            Self::Changed => BindingKind::PropertyChanged,
            Self::Changing => BindingKind::PropertyChanging,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TriggerKey {
    pub(crate) context: ContextId,
    pub(crate) kind: TriggerKind,
    pub(crate) observable: ObjectId,
    pub(crate) property: &'static str,
    pub(crate) trigger: TriggerId,
    pub(crate) origin: Origin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct CollectionKey {
    pub(crate) context: ContextId,
    pub(crate) collection: ObjectId,
    pub(crate) trigger: TriggerId,
}

/// Handler that filters by property name and forwards the current value.
fn property_handler<O: 'static, V: 'static>(
    observable: &Rc<O>,
    property: &Property<O, V>,
    trigger: &Trigger<O, V>,
) -> impl Fn(&PropertyChangedArgs) + 'static {
    let weak = Rc::downgrade(observable);
    let property = *property;
    let trigger = trigger.clone();
    move |args| {
        if !args.affects(property.name()) {
            return;
        }
        let Some(sender) = weak.upgrade() else {
            return;
        };
        let value = property.get(&sender);
        trigger.invoke(&sender, &value);
    }
}

impl BindingRegistry {
    /// Call `trigger` after `property` of `observable` changes.
    ///
    /// # Errors
    ///
    /// - [`BindError::InvalidArgument`](crate::BindError::InvalidArgument)
    ///   if the property name is empty.
    /// - [`BindError::Conflict`](crate::BindError::Conflict) if this trigger
    ///   is already bound to this property under `context`.
    pub fn on_property_changed<O, V>(
        &self,
        context: ContextId,
        observable: &Rc<O>,
        property: &Property<O, V>,
        trigger: &Trigger<O, V>,
    ) -> BindResult<()>
    where
        O: NotifyPropertyChanged + 'static,
        V: 'static,
    {
        self.attach_changed(context, observable, property, trigger, Origin::Direct)
    }

    /// Call `trigger` before `property` of `observable` changes. The trigger
    /// receives the value that is about to be replaced.
    ///
    /// # Errors
    ///
    /// Same as [`on_property_changed`](Self::on_property_changed).
    pub fn on_property_changing<O, V>(
        &self,
        context: ContextId,
        observable: &Rc<O>,
        property: &Property<O, V>,
        trigger: &Trigger<O, V>,
    ) -> BindResult<()>
    where
        O: NotifyPropertyChanging + 'static,
        V: 'static,
    {
        let key = Self::trigger_key(
            context,
            TriggerKind::Changing,
            observable,
            property,
            trigger,
            Origin::Direct,
        )?;
        Self::ensure_vacant(
            &self.state.triggers,
            &key,
            BindingKind::PropertyChanging,
            context,
        )?;
        let handler = property_handler(observable, property, trigger);
        let subscription = observable.property_changing().subscribe(handler);
        let record = Record::new((), vec![subscription], vec![anchor(observable)]);
        self.store_trigger(key, record)
    }

    /// Call `trigger` on every change of `collection`.
    ///
    /// # Errors
    ///
    /// [`BindError::Conflict`](crate::BindError::Conflict) if this trigger is
    /// already bound to this collection under `context`.
    pub fn on_collection_changed<C>(
        &self,
        context: ContextId,
        collection: &Rc<C>,
        trigger: &CollectionTrigger<C>,
    ) -> BindResult<()>
    where
        C: NotifyCollectionChanged + 'static,
    {
        let key = CollectionKey {
            context,
            collection: ObjectId::of(collection),
            trigger: trigger.id(),
        };
        Self::ensure_vacant(
            &self.state.collections,
            &key,
            BindingKind::CollectionChanged,
            context,
        )?;

        let weak = Rc::downgrade(collection);
        let callback = trigger.clone();
        let subscription = collection.collection_changed().subscribe(move |change| {
            if let Some(sender) = weak.upgrade() {
                callback.invoke(&sender, change);
            }
        });
        Self::store(
            &self.state.collections,
            key,
            Record::new((), vec![subscription], vec![anchor(collection)]),
            BindingKind::CollectionChanged,
            context,
        )?;
        tracing::debug!(
            context = %context,
            collection = %key.collection,
            trigger = key.trigger.raw(),
            "bound collection-changed trigger"
        );
        Ok(())
    }

    /// Remove caller-created property-changed triggers matching `selector`.
    pub fn unbind_property_changed(&self, selector: Selector<'_>) -> usize {
        self.unbind_triggers(TriggerKind::Changed, selector)
    }

    /// Remove caller-created property-changing triggers matching `selector`.
    pub fn unbind_property_changing(&self, selector: Selector<'_>) -> usize {
        self.unbind_triggers(TriggerKind::Changing, selector)
    }

    /// Remove collection-changed triggers matching `selector`.
    pub fn unbind_collection_changed(&self, selector: Selector<'_>) -> usize {
        let removed = Self::drain(&self.state.collections, |k, _| {
            selector.matches(k.context, k.collection, None, k.trigger)
        });
        tracing::debug!(
            context = %selector.scope(),
            removed,
            "unbound collection-changed triggers"
        );
        removed
    }

    // -----------------------------------------------------------------------
    // Shared with deep bindings
    // -----------------------------------------------------------------------

    /// Attach a property-changed trigger on behalf of `origin`.
    pub(crate) fn attach_changed<O, V>(
        &self,
        context: ContextId,
        observable: &Rc<O>,
        property: &Property<O, V>,
        trigger: &Trigger<O, V>,
        origin: Origin,
    ) -> BindResult<()>
    where
        O: NotifyPropertyChanged + 'static,
        V: 'static,
    {
        let key = Self::trigger_key(
            context,
            TriggerKind::Changed,
            observable,
            property,
            trigger,
            origin,
        )?;
        Self::ensure_vacant(
            &self.state.triggers,
            &key,
            BindingKind::PropertyChanged,
            context,
        )?;
        let handler = property_handler(observable, property, trigger);
        let subscription = observable.property_changed().subscribe(handler);
        let record = Record::new((), vec![subscription], vec![anchor(observable)]);
        self.store_trigger(key, record)
    }

    /// Remove the single item trigger identified by its parts.
    pub(crate) fn detach_changed(
        &self,
        context: ContextId,
        observable: ObjectId,
        property: &'static str,
        trigger: TriggerId,
        origin: Origin,
    ) -> bool {
        let key = TriggerKey {
            context,
            kind: TriggerKind::Changed,
            observable,
            property,
            trigger,
            origin,
        };
        let removed = self.state.triggers.borrow_mut().remove(&key);
        removed.is_some()
    }

    /// Remove every item trigger owned by `origin`.
    pub(crate) fn detach_origin(&self, origin: Origin) -> usize {
        Self::drain(&self.state.triggers, |k, _| k.origin == origin)
    }

    fn trigger_key<O, V>(
        context: ContextId,
        kind: TriggerKind,
        observable: &Rc<O>,
        property: &Property<O, V>,
        trigger: &Trigger<O, V>,
        origin: Origin,
    ) -> BindResult<TriggerKey>
    where
        O: 'static,
        V: 'static,
    {
        validate_name(property.name(), "property")?;
        Ok(TriggerKey {
            context,
            kind,
            observable: ObjectId::of(observable),
            property: property.name(),
            trigger: trigger.id(),
            origin,
        })
    }

    fn store_trigger(&self, key: TriggerKey, record: Record) -> BindResult<()> {
        Self::store(
            &self.state.triggers,
            key,
            record,
            key.kind.binding_kind(),
            key.context,
        )?;
        tracing::trace!(
            context = %key.context,
            kind = %key.kind.binding_kind(),
            observable = %key.observable,
            property = key.property,
            trigger = key.trigger.raw(),
            origin = ?key.origin,
            "bound trigger"
        );
        Ok(())
    }

    fn unbind_triggers(&self, kind: TriggerKind, selector: Selector<'_>) -> usize {
        let removed = Self::drain(&self.state.triggers, |k, _| {
            k.kind == kind
                && k.origin == Origin::Direct
                && selector.matches(k.context, k.observable, Some(k.property), k.trigger)
        });
        tracing::debug!(
            context = %selector.scope(),
            kind = %kind.binding_kind(),
            removed,
            "unbound triggers"
        );
        removed
    }
}
