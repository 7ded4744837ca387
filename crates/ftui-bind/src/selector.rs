#![forbid(unsafe_code)]

//! Scoped matching for trigger unbinds.
//!
//! One selector type covers every unbind flavour, from broadest to exact:
//!
//! ```ignore
//! registry.unbind_property_changed(Selector::context(ctx));
//! registry.unbind_property_changed(Selector::context(ctx).object(&vm));
//! registry.unbind_property_changed(Selector::context(ctx).object(&vm).property("Text"));
//! registry.unbind_property_changed(
//!     Selector::context(ctx).object(&vm).property("Text").trigger(trigger.id()),
//! );
//! ```
//!
//! Collection-changed records have no property, so a selector that names a
//! property never matches them.

use std::rc::Rc;

use ftui_notify::ObjectId;

use crate::key::{ContextId, TriggerId};

/// Which trigger records an unbind call removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selector<'a> {
    context: ContextId,
    object: Option<ObjectId>,
    property: Option<&'a str>,
    trigger: Option<TriggerId>,
}

impl<'a> Selector<'a> {
    /// Everything under `context`.
    #[must_use]
    pub const fn context(context: ContextId) -> Self {
        Self {
            context,
            object: None,
            property: None,
            trigger: None,
        }
    }

    /// Narrow to records on `object`.
    #[must_use]
    pub fn object<T: ?Sized>(self, object: &Rc<T>) -> Self {
        self.object_id(ObjectId::of(object))
    }

    /// Narrow to records on the object with identity `id`.
    #[must_use]
    pub const fn object_id(mut self, id: ObjectId) -> Self {
        self.object = Some(id);
        self
    }

    /// Narrow to records on property `name`.
    #[must_use]
    pub const fn property(mut self, name: &'a str) -> Self {
        self.property = Some(name);
        self
    }

    /// Narrow to records of one trigger.
    #[must_use]
    pub const fn trigger(mut self, trigger: TriggerId) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Context this selector is scoped to.
    #[must_use]
    pub const fn scope(&self) -> ContextId {
        self.context
    }

    pub(crate) fn matches(
        &self,
        context: ContextId,
        object: ObjectId,
        property: Option<&str>,
        trigger: TriggerId,
    ) -> bool {
        context == self.context
            && self.object.is_none_or(|o| o == object)
            && self.trigger.is_none_or(|t| t == trigger)
            && match (self.property, property) {
                (None, _) => true,
                (Some(wanted), Some(actual)) => wanted == actual,
                (Some(_), None) => false,
            }
    }
}
