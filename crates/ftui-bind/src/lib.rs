#![forbid(unsafe_code)]

//! Context-scoped data bindings for FrankenTUI view models.
//!
//! [`BindingRegistry`] wires change notifications from `ftui-notify`
//! participants to each other:
//!
//! - **Property bindings** keep a target property equal to a (converted)
//!   source property, one-way or two-way.
//! - **Trigger bindings** call back on property-changed, property-changing
//!   or collection-changed notifications.
//! - **Deep collection bindings** keep an item trigger attached to every
//!   item of a collection while items come and go.
//! - **Command bindings** route an executor's requests to a command and
//!   mirror the command's can-execute state onto the executor.
//!
//! Every binding is registered under a [`ContextId`], usually one per view.
//! [`BindingRegistry::unbind`] (or dropping a [`BindingScope`]) removes
//! everything registered under a context in one call.
//!
//! # Architecture
//!
//! Single-threaded: the registry is an `Rc` handle over `RefCell` tables and
//! is `!Send`. [`BindingRegistry::global`] returns a thread-local instance.
//! Records hold weak handles on participants, so bindings never keep view
//! models alive.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use ftui_bind::{BindingRegistry, BindingScope, Property};
//! use ftui_notify::{EventSource, NotifyPropertyChanged, PropertyChangedArgs, PropertyNotifier};
//!
//! #[derive(Default)]
//! struct Vm {
//!     notifier: PropertyNotifier,
//!     title: RefCell<String>,
//! }
//!
//! impl NotifyPropertyChanged for Vm {
//!     fn property_changed(&self) -> &EventSource<PropertyChangedArgs> {
//!         self.notifier.property_changed()
//!     }
//! }
//!
//! const TITLE: Property<Vm, String> = Property::new(
//!     "Title",
//!     |vm: &Vm| vm.title.borrow().clone(),
//!     |vm: &Vm, v: String| {
//!         vm.notifier.set_field(&vm.title, v, "Title");
//!     },
//! );
//!
//! let registry = BindingRegistry::default();
//! let (header, model) = (Rc::new(Vm::default()), Rc::new(Vm::default()));
//! {
//!     let scope = BindingScope::new(&registry);
//!     registry.bind_one_way(scope.context(), &header, &TITLE, &model, &TITLE).unwrap();
//!     TITLE.set(&model, "Inbox".into());
//!     assert_eq!(TITLE.get(&header), "Inbox");
//! }
//! assert!(registry.is_empty());
//! ```

pub mod accessor;
pub mod callback;
pub mod config;
pub mod error;
pub mod key;
pub mod registry;
pub mod scope;
pub mod selector;

mod command;
mod deep;
mod property;
mod table;
mod trigger;

pub use accessor::Property;
pub use callback::{CollectionTrigger, Trigger};
pub use config::{CyclePolicy, RegistryConfig};
pub use error::{BindError, BindResult, BindingKind};
pub use key::{ContextId, DeepBindingId, Origin, TriggerId};
pub use registry::{BindingRegistry, BindingStats};
pub use scope::BindingScope;
pub use selector::Selector;
