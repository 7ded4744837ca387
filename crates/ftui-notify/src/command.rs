#![forbid(unsafe_code)]

//! Command and command-executor capabilities.
//!
//! A [`Command`] is the view-model side: it executes with a parameter and
//! reports whether it currently can. A [`CommandExecutor`] is the UI side:
//! a button or menu item that asks for execution and shows an enabled flag.
//!
//! The executor owns its gating. [`CommandSource::request_execute`] only
//! raises the execution-requested event while the source is enabled;
//! whatever connects the two sides trusts that and does not re-check
//! `can_execute` before executing.

use std::cell::Cell;
use std::fmt;

use crate::event::EventSource;

/// Capability: something that can be executed with a parameter.
pub trait Command {
    /// Parameter passed to `execute` and `can_execute`.
    type Parameter: 'static;

    /// Run the command.
    fn execute(&self, parameter: &Self::Parameter);

    /// Whether the command can run with `parameter` right now.
    fn can_execute(&self, parameter: &Self::Parameter) -> bool;

    /// Raised whenever the answer of `can_execute` may have changed.
    fn can_execute_changed(&self) -> &EventSource<()>;
}

/// Capability: a UI element that requests command execution.
pub trait CommandExecutor {
    /// Raised when the user asks for execution.
    fn execute_requested(&self) -> &EventSource<()>;

    /// Update the element's enabled state.
    fn set_can_execute(&self, can_execute: bool);
}

type ExecuteFn<P> = Box<dyn Fn(&P)>;
type CanExecuteFn<P> = Box<dyn Fn(&P) -> bool>;

/// A [`Command`] backed by closures.
pub struct DelegateCommand<P> {
    execute: ExecuteFn<P>,
    can_execute: Option<CanExecuteFn<P>>,
    can_execute_changed: EventSource<()>,
}

impl<P: 'static> DelegateCommand<P> {
    /// A command that can always execute.
    #[must_use]
    pub fn new(execute: impl Fn(&P) + 'static) -> Self {
        Self {
            execute: Box::new(execute),
            can_execute: None,
            can_execute_changed: EventSource::new(),
        }
    }

    /// Gate execution with `predicate`.
    #[must_use]
    pub fn with_can_execute(mut self, predicate: impl Fn(&P) -> bool + 'static) -> Self {
        self.can_execute = Some(Box::new(predicate));
        self
    }

    /// Tell listeners that `can_execute` may answer differently now.
    pub fn raise_can_execute_changed(&self) {
        self.can_execute_changed.raise(&());
    }
}

impl<P: 'static> Command for DelegateCommand<P> {
    type Parameter = P;

    fn execute(&self, parameter: &P) {
        (self.execute)(parameter);
    }

    fn can_execute(&self, parameter: &P) -> bool {
        self.can_execute.as_ref().is_none_or(|p| p(parameter))
    }

    fn can_execute_changed(&self) -> &EventSource<()> {
        &self.can_execute_changed
    }
}

impl<P> fmt::Debug for DelegateCommand<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateCommand")
            .field("gated", &self.can_execute.is_some())
            .field("can_execute_changed", &self.can_execute_changed)
            .finish()
    }
}

/// A button-like [`CommandExecutor`].
#[derive(Debug)]
pub struct CommandSource {
    enabled: Cell<bool>,
    requested: EventSource<()>,
}

impl Default for CommandSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandSource {
    /// Create an enabled source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: Cell::new(true),
            requested: EventSource::new(),
        }
    }

    /// Current enabled state as last pushed through `set_can_execute`.
    #[must_use]
    pub fn can_execute(&self) -> bool {
        self.enabled.get()
    }

    /// Simulate activation (click, key press). Returns whether the request
    /// was raised; a disabled source swallows it.
    pub fn request_execute(&self) -> bool {
        if !self.enabled.get() {
            return false;
        }
        self.requested.raise(&());
        true
    }
}

impl CommandExecutor for CommandSource {
    fn execute_requested(&self) -> &EventSource<()> {
        &self.requested
    }

    fn set_can_execute(&self, can_execute: bool) {
        self.enabled.set(can_execute);
    }
}
