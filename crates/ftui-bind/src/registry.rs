#![forbid(unsafe_code)]

//! The binding registry service.
//!
//! [`BindingRegistry`] is a cheap-to-clone handle over one set of binding
//! tables. Applications either create an explicit instance at startup and
//! pass it around, or use the thread-local instance from
//! [`BindingRegistry::global`].
//!
//! # Invariants
//!
//! 1. A record exists iff its subscriptions are attached.
//! 2. No table borrow is held while user code runs (triggers, getters,
//!    setters, converters, command callbacks). Matching records are taken
//!    out of the table first and dropped afterwards, so unbinding from
//!    inside a trigger is safe.
//! 3. Unbind calls that match nothing return 0 and change nothing.

use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use ahash::AHashSet;
use ftui_notify::ObjectId;

use crate::command::CommandKey;
use crate::config::RegistryConfig;
use crate::deep::{DeepKey, DeepMeta};
use crate::error::{BindError, BindResult, BindingKind};
use crate::key::{ContextId, Origin};
use crate::property::PropertyKey;
use crate::table::{Record, RecordTable};
use crate::trigger::{CollectionKey, TriggerKey};

thread_local! {
    static GLOBAL_REGISTRY: BindingRegistry = BindingRegistry::new(RegistryConfig::default());
}

pub(crate) struct RegistryState {
    pub(crate) config: RegistryConfig,
    pub(crate) properties: RefCell<RecordTable<PropertyKey>>,
    pub(crate) triggers: RefCell<RecordTable<TriggerKey>>,
    pub(crate) collections: RefCell<RecordTable<CollectionKey>>,
    pub(crate) deep: RefCell<RecordTable<DeepKey, DeepMeta>>,
    pub(crate) commands: RefCell<RecordTable<CommandKey, ObjectId>>,
}

/// Registry of property, trigger, deep collection and command bindings.
///
/// Cloning creates another handle to the **same** tables.
#[derive(Clone)]
pub struct BindingRegistry {
    pub(crate) state: Rc<RegistryState>,
}

/// Live binding counts per registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindingStats {
    /// One-way property bindings (a two-way binding counts twice).
    pub properties: usize,
    /// Caller-created property-changed and property-changing triggers.
    pub property_triggers: usize,
    /// Collection-changed triggers.
    pub collection_triggers: usize,
    /// Deep collection-item bindings.
    pub deep_bindings: usize,
    /// Item triggers maintained by deep bindings.
    pub item_triggers: usize,
    /// Command bindings.
    pub commands: usize,
    /// Attached event handlers across all records.
    pub subscriptions: usize,
}

impl BindingStats {
    /// Number of binding records of every kind.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.properties
            + self.property_triggers
            + self.collection_triggers
            + self.deep_bindings
            + self.item_triggers
            + self.commands
    }
}

impl Default for BindingRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl fmt::Debug for BindingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingRegistry")
            .field("config", &self.state.config)
            .field("stats", &self.stats())
            .finish()
    }
}

impl BindingRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            state: Rc::new(RegistryState {
                config,
                properties: RefCell::default(),
                triggers: RefCell::default(),
                collections: RefCell::default(),
                deep: RefCell::default(),
                commands: RefCell::default(),
            }),
        }
    }

    /// The thread-local registry shared by everything on this thread.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL_REGISTRY.with(Clone::clone)
    }

    /// Configuration this registry was created with.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.state.config
    }

    /// Remove every binding registered under `context`, in every registry.
    ///
    /// Returns the number of records removed, including item triggers
    /// cascaded from deep bindings.
    pub fn unbind(&self, context: ContextId) -> usize {
        let deep = self.unbind_deep_where(|k, _| k.context == context);
        let triggers = Self::drain(&self.state.triggers, |k, _| {
            k.context == context && k.origin == Origin::Direct
        });
        let collections = Self::drain(&self.state.collections, |k, _| k.context == context);
        let properties = Self::drain(&self.state.properties, |k, _| k.context == context);
        let commands = Self::drain(&self.state.commands, |k, _| k.context == context);
        let removed = deep + triggers + collections + properties + commands;
        tracing::debug!(
            context = %context,
            removed,
            properties,
            triggers,
            collections,
            deep,
            commands,
            "unbound context"
        );
        removed
    }

    /// Live binding counts.
    #[must_use]
    pub fn stats(&self) -> BindingStats {
        let triggers = self.state.triggers.borrow();
        let properties = self.state.properties.borrow();
        let collections = self.state.collections.borrow();
        let deep = self.state.deep.borrow();
        let commands = self.state.commands.borrow();
        let item_triggers = triggers.count_where(|k, _| k.origin != Origin::Direct);
        BindingStats {
            properties: properties.len(),
            property_triggers: triggers.len() - item_triggers,
            collection_triggers: collections.len(),
            deep_bindings: deep.len(),
            item_triggers,
            commands: commands.len(),
            subscriptions: properties.subscription_count()
                + triggers.subscription_count()
                + collections.subscription_count()
                + deep.subscription_count()
                + commands.subscription_count(),
        }
    }

    /// Number of binding records of every kind.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.stats().total()
    }

    /// Whether nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.binding_count() == 0
    }

    /// Number of records registered under `context`.
    #[must_use]
    pub fn context_binding_count(&self, context: ContextId) -> usize {
        self.state
            .properties
            .borrow()
            .count_where(|k, _| k.context == context)
            + self
                .state
                .triggers
                .borrow()
                .count_where(|k, _| k.context == context)
            + self
                .state
                .collections
                .borrow()
                .count_where(|k, _| k.context == context)
            + self
                .state
                .deep
                .borrow()
                .count_where(|k, _| k.context == context)
            + self
                .state
                .commands
                .borrow()
                .count_where(|k, _| k.context == context)
    }

    /// Contexts that currently own at least one binding.
    #[must_use]
    pub fn contexts(&self) -> Vec<ContextId> {
        let mut seen = AHashSet::new();
        let mut out = Vec::new();
        let mut visit = |ctx: ContextId| {
            if seen.insert(ctx) {
                out.push(ctx);
            }
        };
        for k in self.state.properties.borrow().keys() {
            visit(k.context);
        }
        for k in self.state.triggers.borrow().keys() {
            visit(k.context);
        }
        for k in self.state.collections.borrow().keys() {
            visit(k.context);
        }
        for k in self.state.deep.borrow().keys() {
            visit(k.context);
        }
        for k in self.state.commands.borrow().keys() {
            visit(k.context);
        }
        out
    }

    /// Remove records with at least one dropped participant. Returns the
    /// number removed.
    pub fn prune(&self) -> usize {
        let deep = self.unbind_deep_where(|_, r| !r.is_alive());
        let triggers = Self::drain(&self.state.triggers, |_, r| !r.is_alive());
        let collections = Self::drain(&self.state.collections, |_, r| !r.is_alive());
        let properties = Self::drain(&self.state.properties, |_, r| !r.is_alive());
        let commands = Self::drain(&self.state.commands, |_, r| !r.is_alive());
        let removed = deep + triggers + collections + properties + commands;
        if removed > 0 {
            tracing::debug!(removed, "pruned bindings with dropped participants");
        }
        removed
    }

    // -----------------------------------------------------------------------
    // Shared plumbing
    // -----------------------------------------------------------------------

    /// Take matching records out of `table`, then drop them with the borrow
    /// released.
    pub(crate) fn drain<K: Copy + Eq + Hash, M>(
        table: &RefCell<RecordTable<K, M>>,
        pred: impl Fn(&K, &Record<M>) -> bool,
    ) -> usize {
        let taken = table.borrow_mut().take_where(pred);
        let count = taken.len();
        drop(taken);
        count
    }

    /// Fail with a conflict when `key` is already present.
    pub(crate) fn ensure_vacant<K: Copy + Eq + Hash, M>(
        table: &RefCell<RecordTable<K, M>>,
        key: &K,
        kind: BindingKind,
        context: ContextId,
    ) -> BindResult<()> {
        if table.borrow().contains(key) {
            tracing::debug!(context = %context, kind = %kind, "rejected duplicate binding");
            return Err(BindError::conflict(kind, context));
        }
        Ok(())
    }

    /// Store `record`, or drop it (detaching its handlers) and report a
    /// conflict when the key is taken.
    pub(crate) fn store<K: Copy + Eq + Hash, M>(
        table: &RefCell<RecordTable<K, M>>,
        key: K,
        record: Record<M>,
        kind: BindingKind,
        context: ContextId,
    ) -> BindResult<()> {
        let outcome = table.borrow_mut().insert(key, record);
        match outcome {
            Ok(()) => Ok(()),
            Err(rejected) => {
                drop(rejected);
                Err(BindError::conflict(kind, context))
            }
        }
    }
}

pub(crate) fn validate_name(name: &'static str, parameter: &'static str) -> BindResult<()> {
    if name.is_empty() {
        return Err(BindError::invalid(parameter, "property name is empty"));
    }
    Ok(())
}
