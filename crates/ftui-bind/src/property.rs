#![forbid(unsafe_code)]

//! Property bindings: keep a target property in sync with a source property.
//!
//! A one-way binding subscribes to the source's property-changed event,
//! filtered by the source property name. On every matching notification,
//! and once immediately at bind time, it reads the source value, converts
//! it, and writes it to the target only when it differs from the target's
//! current value.
//!
//! A two-way binding is two one-way bindings in opposite directions. The
//! equality check normally stops the echo; [`RegistryConfig::max_sync_depth`]
//! and [`CyclePolicy`] cover converters that never settle.
//!
//! [`RegistryConfig::max_sync_depth`]: crate::RegistryConfig::max_sync_depth

use std::cell::Cell;
use std::rc::{Rc, Weak};

use ftui_notify::{NotifyPropertyChanged, ObjectId};

use crate::accessor::Property;
use crate::config::CyclePolicy;
use crate::error::{BindError, BindResult, BindingKind};
use crate::key::ContextId;
use crate::registry::{BindingRegistry, validate_name};
use crate::table::{Record, anchor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PropertyKey {
    pub(crate) context: ContextId,
    pub(crate) target: ObjectId,
    pub(crate) target_property: &'static str,
    pub(crate) source: ObjectId,
    pub(crate) source_property: &'static str,
}

impl PropertyKey {
    fn new<T, TV, S, SV>(
        context: ContextId,
        target: &Rc<T>,
        target_property: &Property<T, TV>,
        source: &Rc<S>,
        source_property: &Property<S, SV>,
    ) -> Self {
        Self {
            context,
            target: ObjectId::of(target),
            target_property: target_property.name(),
            source: ObjectId::of(source),
            source_property: source_property.name(),
        }
    }

    fn reversed(self) -> Self {
        Self {
            context: self.context,
            target: self.source,
            target_property: self.source_property,
            source: self.target,
            source_property: self.target_property,
        }
    }
}

type Converter<SV, TV> = Box<dyn Fn(SV) -> TV>;

/// Live state of one one-way binding, owned by its source subscription.
struct Link<T, TV, S, SV> {
    target: Weak<T>,
    target_property: Property<T, TV>,
    source: Weak<S>,
    source_property: Property<S, SV>,
    convert: Converter<SV, TV>,
    depth: Cell<u32>,
    max_depth: u32,
    policy: CyclePolicy,
}

struct DepthGuard<'a>(&'a Cell<u32>);

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

impl<T, TV: PartialEq, S, SV> Link<T, TV, S, SV> {
    fn sync(&self) {
        let (Some(target), Some(source)) = (self.target.upgrade(), self.source.upgrade()) else {
            return;
        };
        if self.depth.get() >= self.max_depth {
            match self.policy {
                CyclePolicy::Break => {
                    tracing::warn!(
                        target_property = self.target_property.name(),
                        source_property = self.source_property.name(),
                        depth = self.depth.get(),
                        "property binding cycle broken"
                    );
                    return;
                }
                CyclePolicy::Panic => panic!(
                    "property binding cycle: {} <- {} re-entered {} times",
                    self.target_property.name(),
                    self.source_property.name(),
                    self.depth.get()
                ),
            }
        }
        self.depth.set(self.depth.get() + 1);
        let _guard = DepthGuard(&self.depth);

        let value = (self.convert)(self.source_property.get(&source));
        if self.target_property.get(&target) != value {
            self.target_property.set(&target, value);
        }
    }
}

fn validate<T, TV, S, SV>(
    target: &Rc<T>,
    target_property: &Property<T, TV>,
    source: &Rc<S>,
    source_property: &Property<S, SV>,
) -> BindResult<()> {
    validate_name(target_property.name(), "target_property")?;
    validate_name(source_property.name(), "source_property")?;
    if !target_property.is_writable() {
        return Err(BindError::invalid(
            "target_property",
            "target property is read-only",
        ));
    }
    if ObjectId::of(target) == ObjectId::of(source)
        && target_property.name() == source_property.name()
    {
        return Err(BindError::invalid(
            "source_property",
            "cannot bind a property to itself",
        ));
    }
    Ok(())
}

impl BindingRegistry {
    /// Keep `target.target_property` equal to `source.source_property`.
    ///
    /// The target is written immediately and then on every change of the
    /// source property.
    ///
    /// # Errors
    ///
    /// - [`BindError::InvalidArgument`] for an empty property name, a
    ///   read-only target property, or a property bound to itself.
    /// - [`BindError::Conflict`] if the same pair is already bound under
    ///   `context`.
    pub fn bind_one_way<T, S, V>(
        &self,
        context: ContextId,
        target: &Rc<T>,
        target_property: &Property<T, V>,
        source: &Rc<S>,
        source_property: &Property<S, V>,
    ) -> BindResult<()>
    where
        T: 'static,
        S: NotifyPropertyChanged + 'static,
        V: PartialEq + 'static,
    {
        self.bind_one_way_with(
            context,
            target,
            target_property,
            source,
            source_property,
            |v| v,
        )
    }

    /// Like [`bind_one_way`](Self::bind_one_way), passing every source value
    /// through `convert` first.
    ///
    /// # Errors
    ///
    /// Same as [`bind_one_way`](Self::bind_one_way).
    pub fn bind_one_way_with<T, TV, S, SV>(
        &self,
        context: ContextId,
        target: &Rc<T>,
        target_property: &Property<T, TV>,
        source: &Rc<S>,
        source_property: &Property<S, SV>,
        convert: impl Fn(SV) -> TV + 'static,
    ) -> BindResult<()>
    where
        T: 'static,
        TV: PartialEq + 'static,
        S: NotifyPropertyChanged + 'static,
        SV: 'static,
    {
        validate(target, target_property, source, source_property)?;
        let key = PropertyKey::new(context, target, target_property, source, source_property);
        Self::ensure_vacant(&self.state.properties, &key, BindingKind::Property, context)?;
        self.attach_link(
            key,
            target,
            target_property,
            source,
            source_property,
            Box::new(convert),
        )
    }

    /// Keep `source.source_property` equal to `target.target_property`: the
    /// reverse direction of [`bind_one_way`](Self::bind_one_way).
    ///
    /// # Errors
    ///
    /// Same as [`bind_one_way`](Self::bind_one_way), with the roles swapped.
    pub fn bind_one_way_to_source<T, S, V>(
        &self,
        context: ContextId,
        target: &Rc<T>,
        target_property: &Property<T, V>,
        source: &Rc<S>,
        source_property: &Property<S, V>,
    ) -> BindResult<()>
    where
        T: NotifyPropertyChanged + 'static,
        S: 'static,
        V: PartialEq + 'static,
    {
        self.bind_one_way(context, source, source_property, target, target_property)
    }

    /// Reverse direction with a converter.
    ///
    /// # Errors
    ///
    /// Same as [`bind_one_way_to_source`](Self::bind_one_way_to_source).
    pub fn bind_one_way_to_source_with<T, TV, S, SV>(
        &self,
        context: ContextId,
        target: &Rc<T>,
        target_property: &Property<T, TV>,
        source: &Rc<S>,
        source_property: &Property<S, SV>,
        convert: impl Fn(TV) -> SV + 'static,
    ) -> BindResult<()>
    where
        T: NotifyPropertyChanged + 'static,
        TV: 'static,
        S: 'static,
        SV: PartialEq + 'static,
    {
        self.bind_one_way_with(
            context,
            source,
            source_property,
            target,
            target_property,
            convert,
        )
    }

    /// Keep both properties equal, whichever one changes.
    ///
    /// The target takes the source's value first. Both directions are
    /// registered or neither is.
    ///
    /// # Errors
    ///
    /// Same as [`bind_one_way`](Self::bind_one_way); both properties must be
    /// writable.
    pub fn bind_two_way<T, S, V>(
        &self,
        context: ContextId,
        target: &Rc<T>,
        target_property: &Property<T, V>,
        source: &Rc<S>,
        source_property: &Property<S, V>,
    ) -> BindResult<()>
    where
        T: NotifyPropertyChanged + 'static,
        S: NotifyPropertyChanged + 'static,
        V: PartialEq + 'static,
    {
        self.bind_two_way_with(
            context,
            target,
            target_property,
            source,
            source_property,
            |v| v,
            |v| v,
        )
    }

    /// Two-way binding with a converter per direction.
    ///
    /// # Errors
    ///
    /// Same as [`bind_two_way`](Self::bind_two_way).
    #[allow(clippy::too_many_arguments)]
    pub fn bind_two_way_with<T, TV, S, SV>(
        &self,
        context: ContextId,
        target: &Rc<T>,
        target_property: &Property<T, TV>,
        source: &Rc<S>,
        source_property: &Property<S, SV>,
        to_target: impl Fn(SV) -> TV + 'static,
        to_source: impl Fn(TV) -> SV + 'static,
    ) -> BindResult<()>
    where
        T: NotifyPropertyChanged + 'static,
        TV: PartialEq + 'static,
        S: NotifyPropertyChanged + 'static,
        SV: PartialEq + 'static,
    {
        validate(target, target_property, source, source_property)?;
        validate(source, source_property, target, target_property)?;
        let forward = PropertyKey::new(context, target, target_property, source, source_property);
        let backward = forward.reversed();
        for key in [&forward, &backward] {
            Self::ensure_vacant(&self.state.properties, key, BindingKind::Property, context)?;
        }

        self.attach_link(
            forward,
            target,
            target_property,
            source,
            source_property,
            Box::new(to_target),
        )?;
        let attached = self.attach_link(
            backward,
            source,
            source_property,
            target,
            target_property,
            Box::new(to_source),
        );
        if let Err(err) = attached {
            Self::drain(&self.state.properties, |k, _| *k == forward);
            return Err(err);
        }
        Ok(())
    }

    /// Remove both directions of a two-way binding. Returns the number of
    /// records removed (0, 1 or 2).
    pub fn unbind_two_way<T, S>(
        &self,
        context: ContextId,
        target: &Rc<T>,
        target_property: &str,
        source: &Rc<S>,
        source_property: &str,
    ) -> usize {
        self.unbind_property(context, target, target_property, source, source_property)
            + self.unbind_property(context, source, source_property, target, target_property)
    }

    /// Remove the one-way binding `source.source_property -> target.target_property`.
    pub fn unbind_property<T, S>(
        &self,
        context: ContextId,
        target: &Rc<T>,
        target_property: &str,
        source: &Rc<S>,
        source_property: &str,
    ) -> usize {
        let (target, source) = (ObjectId::of(target), ObjectId::of(source));
        self.unbind_properties_where(context, |k| {
            k.target == target
                && k.target_property == target_property
                && k.source == source
                && k.source_property == source_property
        })
    }

    /// Remove every binding writing to `target.target_property`.
    pub fn unbind_target_property<T>(
        &self,
        context: ContextId,
        target: &Rc<T>,
        target_property: &str,
    ) -> usize {
        let target = ObjectId::of(target);
        self.unbind_properties_where(context, |k| {
            k.target == target && k.target_property == target_property
        })
    }

    /// Remove every binding writing to `target`.
    pub fn unbind_target<T>(&self, context: ContextId, target: &Rc<T>) -> usize {
        let target = ObjectId::of(target);
        self.unbind_properties_where(context, |k| k.target == target)
    }

    /// Remove every binding reading from `source.source_property`.
    pub fn unbind_source_property<S>(
        &self,
        context: ContextId,
        source: &Rc<S>,
        source_property: &str,
    ) -> usize {
        let source = ObjectId::of(source);
        self.unbind_properties_where(context, |k| {
            k.source == source && k.source_property == source_property
        })
    }

    /// Remove every binding reading from `source`.
    pub fn unbind_source<S>(&self, context: ContextId, source: &Rc<S>) -> usize {
        let source = ObjectId::of(source);
        self.unbind_properties_where(context, |k| k.source == source)
    }

    /// Remove every property binding under `context`.
    pub fn unbind_properties(&self, context: ContextId) -> usize {
        self.unbind_properties_where(context, |_| true)
    }

    fn unbind_properties_where(
        &self,
        context: ContextId,
        pred: impl Fn(&PropertyKey) -> bool,
    ) -> usize {
        let removed = Self::drain(&self.state.properties, |k, _| {
            k.context == context && pred(k)
        });
        tracing::debug!(context = %context, removed, "unbound property bindings");
        removed
    }

    fn attach_link<T, TV, S, SV>(
        &self,
        key: PropertyKey,
        target: &Rc<T>,
        target_property: &Property<T, TV>,
        source: &Rc<S>,
        source_property: &Property<S, SV>,
        convert: Converter<SV, TV>,
    ) -> BindResult<()>
    where
        T: 'static,
        TV: PartialEq + 'static,
        S: NotifyPropertyChanged + 'static,
        SV: 'static,
    {
        let link = Rc::new(Link {
            target: Rc::downgrade(target),
            target_property: *target_property,
            source: Rc::downgrade(source),
            source_property: *source_property,
            convert,
            depth: Cell::new(0),
            max_depth: self.state.config.effective_depth(),
            policy: self.state.config.cycle_policy,
        });

        let handler_link = Rc::clone(&link);
        let name = source_property.name();
        let subscription = source.property_changed().subscribe(move |args| {
            if args.affects(name) {
                handler_link.sync();
            }
        });
        Self::store(
            &self.state.properties,
            key,
            Record::new((), vec![subscription], vec![anchor(target), anchor(source)]),
            BindingKind::Property,
            key.context,
        )?;
        tracing::debug!(
            context = %key.context,
            target_object = %key.target,
            target_property = key.target_property,
            source_object = %key.source,
            source_property = key.source_property,
            "bound property"
        );
        link.sync();
        Ok(())
    }
}
