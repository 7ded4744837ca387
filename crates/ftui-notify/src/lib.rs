#![forbid(unsafe_code)]

//! Change-notification primitives for FrankenTUI view models.
//!
//! This crate provides the notification capabilities that data bindings
//! attach to:
//!
//! - [`EventSource`]: a multicast event with detachable [`Subscription`]s.
//! - [`NotifyPropertyChanged`] / [`NotifyPropertyChanging`]: post- and
//!   pre-change property events, with [`PropertyNotifier`] as the embeddable
//!   implementation.
//! - [`NotifyCollectionChanged`]: collection mutations described by
//!   [`CollectionChange`], implemented by [`ObservableVec`].
//! - [`Command`] / [`CommandExecutor`]: the two halves of a command binding,
//!   implemented by [`DelegateCommand`] and [`CommandSource`].
//! - [`ObjectId`]: reference identity of an `Rc`-shared participant.
//!
//! # Architecture
//!
//! Everything is single-threaded: events use `Rc<RefCell<..>>` and are
//! `!Send`. Raising an event never holds a borrow while handlers run.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use ftui_notify::{NotifyPropertyChanged, PropertyNotifier};
//!
//! let notifier = PropertyNotifier::new();
//! let title = RefCell::new(String::new());
//! let _sub = notifier
//!     .property_changed()
//!     .subscribe(|args| assert!(args.affects("Title")));
//!
//! assert!(notifier.set_field(&title, "Inbox".to_string(), "Title"));
//! ```

pub mod collection;
pub mod command;
pub mod event;
pub mod identity;
pub mod property;

pub use collection::{CollectionAction, CollectionChange, NotifyCollectionChanged, ObservableVec};
pub use command::{Command, CommandExecutor, CommandSource, DelegateCommand};
pub use event::{EventSource, Subscription};
pub use identity::ObjectId;
pub use property::{
    NotifyPropertyChanged, NotifyPropertyChanging, PropertyChangedArgs, PropertyNotifier,
};
