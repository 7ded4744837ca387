#![forbid(unsafe_code)]

//! Compile-time checked property references.
//!
//! A [`Property`] names one property of a view-model type and carries its
//! getter and (optionally) setter as plain function pointers. The name is
//! what change notifications are filtered on; the accessors are what
//! bindings read and write through.
//!
//! ```
//! use std::cell::RefCell;
//! use ftui_bind::Property;
//!
//! struct Label {
//!     text: RefCell<String>,
//! }
//!
//! const TEXT: Property<Label, String> = Property::new(
//!     "Text",
//!     |l: &Label| l.text.borrow().clone(),
//!     |l: &Label, v: String| *l.text.borrow_mut() = v,
//! );
//!
//! let label = Label { text: RefCell::new("a".into()) };
//! TEXT.set(&label, "b".into());
//! assert_eq!(TEXT.get(&label), "b");
//! ```

use std::fmt;

/// Getter/setter pair for one named property of `O`.
pub struct Property<O, V> {
    name: &'static str,
    getter: fn(&O) -> V,
    setter: Option<fn(&O, V)>,
}

impl<O, V> Clone for Property<O, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<O, V> Copy for Property<O, V> {}

impl<O, V> fmt::Debug for Property<O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("writable", &self.setter.is_some())
            .finish()
    }
}

impl<O, V> Property<O, V> {
    /// A read/write property.
    #[must_use]
    pub const fn new(name: &'static str, getter: fn(&O) -> V, setter: fn(&O, V)) -> Self {
        Self {
            name,
            getter,
            setter: Some(setter),
        }
    }

    /// A property that can only be read. Usable as a binding source or a
    /// trigger filter, never as a binding target.
    #[must_use]
    pub const fn read_only(name: &'static str, getter: fn(&O) -> V) -> Self {
        Self {
            name,
            getter,
            setter: None,
        }
    }

    /// Property name matched against change notifications.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the property has a setter.
    #[inline]
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Read the value from `owner`.
    #[inline]
    pub fn get(&self, owner: &O) -> V {
        (self.getter)(owner)
    }

    /// Write `value` to `owner`. Returns `false` for read-only properties.
    #[inline]
    pub fn set(&self, owner: &O, value: V) -> bool {
        match self.setter {
            Some(setter) => {
                setter(owner, value);
                true
            }
            None => false,
        }
    }
}
