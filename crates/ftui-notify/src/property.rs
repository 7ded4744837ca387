#![forbid(unsafe_code)]

//! Property change notification.
//!
//! View-model objects expose two events: one raised just before a property
//! value changes and one raised right after. Both carry the name of the
//! property. An absent name means "every property may have changed" and
//! matches every filter.
//!
//! [`PropertyNotifier`] is the embeddable implementation: put one in a
//! view-model struct, forward the two trait methods to it, and use
//! [`set_field`](PropertyNotifier::set_field) from property setters.

use std::borrow::Cow;
use std::cell::RefCell;

use crate::event::EventSource;

/// Arguments carried by property-changed and property-changing events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyChangedArgs {
    /// Name of the property, or `None` when all properties are affected.
    pub property_name: Option<Cow<'static, str>>,
}

impl PropertyChangedArgs {
    /// Arguments naming a single property.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            property_name: Some(name.into()),
        }
    }

    /// Arguments announcing that every property may have changed.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            property_name: None,
        }
    }

    /// Whether a handler filtering on `name` should react.
    #[must_use]
    pub fn affects(&self, name: &str) -> bool {
        match &self.property_name {
            None => true,
            Some(n) => n.is_empty() || n == name,
        }
    }
}

/// Capability: raises an event after a property value changed.
pub trait NotifyPropertyChanged {
    /// The post-change event.
    fn property_changed(&self) -> &EventSource<PropertyChangedArgs>;
}

/// Capability: raises an event before a property value changes.
pub trait NotifyPropertyChanging {
    /// The pre-change event.
    fn property_changing(&self) -> &EventSource<PropertyChangedArgs>;
}

/// Both property events, ready to embed in a view-model.
#[derive(Debug, Clone, Default)]
pub struct PropertyNotifier {
    changing: EventSource<PropertyChangedArgs>,
    changed: EventSource<PropertyChangedArgs>,
}

impl PropertyNotifier {
    /// Create a notifier with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `slot` when it differs from the current value.
    ///
    /// Raises property-changing before the write and property-changed after
    /// it. Returns whether the value changed. The slot is not borrowed while
    /// either event is raised, so handlers may read it.
    pub fn set_field<T: PartialEq>(
        &self,
        slot: &RefCell<T>,
        value: T,
        name: &'static str,
    ) -> bool {
        if *slot.borrow() == value {
            return false;
        }
        self.changing.raise(&PropertyChangedArgs::new(name));
        *slot.borrow_mut() = value;
        self.changed.raise(&PropertyChangedArgs::new(name));
        true
    }

    /// Raise property-changed for `name`.
    pub fn notify_changed(&self, name: impl Into<Cow<'static, str>>) {
        self.changed.raise(&PropertyChangedArgs::new(name));
    }

    /// Raise property-changing for `name`.
    pub fn notify_changing(&self, name: impl Into<Cow<'static, str>>) {
        self.changing.raise(&PropertyChangedArgs::new(name));
    }

    /// Raise property-changed for every property.
    pub fn notify_all_changed(&self) {
        self.changed.raise(&PropertyChangedArgs::all());
    }
}

impl NotifyPropertyChanged for PropertyNotifier {
    fn property_changed(&self) -> &EventSource<PropertyChangedArgs> {
        &self.changed
    }
}

impl NotifyPropertyChanging for PropertyNotifier {
    fn property_changing(&self) -> &EventSource<PropertyChangedArgs> {
        &self.changing
    }
}
