//! Shared view-model fixtures for integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use ftui_bind::Property;
use ftui_notify::{
    EventSource, NotifyPropertyChanged, NotifyPropertyChanging, PropertyChangedArgs,
    PropertyNotifier,
};

/// A view model with one text property.
#[derive(Default)]
pub struct TextBox {
    pub notifier: PropertyNotifier,
    pub text: RefCell<String>,
}

impl TextBox {
    pub fn new(text: &str) -> Rc<Self> {
        let b = Self::default();
        *b.text.borrow_mut() = text.to_string();
        Rc::new(b)
    }

    pub fn set_text(&self, value: &str) {
        self.notifier
            .set_field(&self.text, value.to_string(), "Text");
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn handler_count(&self) -> usize {
        self.notifier.property_changed().handler_count()
    }
}

impl NotifyPropertyChanged for TextBox {
    fn property_changed(&self) -> &EventSource<PropertyChangedArgs> {
        self.notifier.property_changed()
    }
}

impl NotifyPropertyChanging for TextBox {
    fn property_changing(&self) -> &EventSource<PropertyChangedArgs> {
        self.notifier.property_changing()
    }
}

pub const TEXT: Property<TextBox, String> = Property::new(
    "Text",
    |b: &TextBox| b.text(),
    |b: &TextBox, v: String| b.set_text(&v),
);
