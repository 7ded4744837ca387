#![forbid(unsafe_code)]

//! End-to-end binding scenarios.
//!
//! 1. Unbind is idempotent and detaches handlers on the first call.
//! 2. One-way bindings propagate synchronously.
//! 3. Two-way bindings converge from either side without recursion.
//! 4. Duplicate registrations are rejected; the first stays intact.
//! 5. Deep item triggers follow appends and removals.
//! 6. Command gating follows can-execute-changed.
//! 7. Unbinding a context tears down every kind of binding at once.

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::{TEXT, TextBox};
use ftui_bind::{
    BindError, BindingKind, BindingRegistry, BindingScope, ContextId, Property, Selector, Trigger,
};
use ftui_notify::{
    CommandExecutor, CommandSource, DelegateCommand, NotifyCollectionChanged,
    NotifyPropertyChanging, ObservableVec,
};

fn counter<O: 'static, V: 'static>() -> (Rc<Cell<u32>>, Trigger<O, V>) {
    let hits = Rc::new(Cell::new(0));
    let h = Rc::clone(&hits);
    (hits, Trigger::from_fn(move || h.set(h.get() + 1)))
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Idempotent unbind
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn unbind_twice_is_silent() {
    let registry = BindingRegistry::default();
    let ctx = ContextId::new();
    let target = TextBox::new("");
    let source = TextBox::new("a");
    registry
        .bind_one_way(ctx, &target, &TEXT, &source, &TEXT)
        .unwrap();
    assert_eq!(source.handler_count(), 1);

    assert_eq!(registry.unbind(ctx), 1);
    assert_eq!(source.handler_count(), 0);
    assert_eq!(registry.unbind(ctx), 0);

    source.set_text("b");
    assert_eq!(target.text(), "a");
}

#[test]
fn unbind_by_participant_twice_is_silent() {
    let registry = BindingRegistry::default();
    let ctx = ContextId::new();
    let model = TextBox::new("");
    let (hits, trigger) = counter();
    registry
        .on_property_changed(ctx, &model, &TEXT, &trigger)
        .unwrap();

    let sel = Selector::context(ctx).object(&model);
    assert_eq!(registry.unbind_property_changed(sel), 1);
    assert_eq!(registry.unbind_property_changed(sel), 0);
    model.set_text("x");
    assert_eq!(hits.get(), 0);
}

// ═════════════════════════════════════════════════════════════════════════
// 2. One-way round trip
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn one_way_round_trip_is_synchronous() {
    let registry = BindingRegistry::default();
    let target = TextBox::new("");
    let source = TextBox::new("");
    registry
        .bind_one_way(ContextId::new(), &target, &TEXT, &source, &TEXT)
        .unwrap();

    source.set_text("X");
    assert_eq!(target.text(), "X");
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Two-way convergence
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn two_way_converges() {
    let registry = BindingRegistry::default();
    let a = TextBox::new("");
    let b = TextBox::new("");
    registry
        .bind_two_way(ContextId::new(), &a, &TEXT, &b, &TEXT)
        .unwrap();

    a.set_text("v");
    assert_eq!(b.text(), "v");
    b.set_text("v2");
    assert_eq!(a.text(), "v2");
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Duplicate rejection
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn duplicate_property_binding_conflicts() {
    let registry = BindingRegistry::default();
    let ctx = ContextId::new();
    let target = TextBox::new("");
    let source = TextBox::new("s");

    registry
        .bind_one_way(ctx, &target, &TEXT, &source, &TEXT)
        .unwrap();
    let err = registry
        .bind_one_way(ctx, &target, &TEXT, &source, &TEXT)
        .unwrap_err();
    assert_eq!(
        err,
        BindError::Conflict {
            kind: BindingKind::Property,
            context: ctx,
        }
    );
    assert_eq!(
        err.to_string(),
        format!("property binding already registered for {ctx}")
    );

    source.set_text("t");
    assert_eq!(target.text(), "t");
    assert_eq!(registry.binding_count(), 1);
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Deep collection trigger reconciliation
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn deep_trigger_follows_append_and_remove() {
    let registry = BindingRegistry::default();
    let ctx = ContextId::new();
    let (i1, i2, i3) = (TextBox::new("1"), TextBox::new("2"), TextBox::new("3"));
    let items = Rc::new(ObservableVec::from_vec(vec![Rc::clone(&i1), Rc::clone(&i2)]));

    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let trigger = Trigger::from_value(move |v: &String| s.borrow_mut().push(v.clone()));
    let id = registry
        .on_item_property_changed(ctx, &items, &TEXT, &trigger, None)
        .unwrap();
    assert_eq!(registry.item_binding_count(id), 2);

    items.push(Rc::clone(&i3));
    i3.set_text("three");
    assert_eq!(*seen.borrow(), vec!["three"]);

    items.remove(0);
    i1.set_text("one");
    assert_eq!(*seen.borrow(), vec!["three"]);
    assert_eq!(i1.handler_count(), 0);

    i2.set_text("two");
    assert_eq!(*seen.borrow(), vec!["three", "two"]);
    assert_eq!(registry.item_binding_count(id), items.items().len());
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Command gating
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn command_gating_follows_parameter() {
    let registry = BindingRegistry::default();
    let text = Rc::new(RefCell::new(String::new()));
    let executed = Rc::new(RefCell::new(Vec::new()));

    let e = Rc::clone(&executed);
    let command = Rc::new(
        DelegateCommand::new(move |p: &String| e.borrow_mut().push(p.clone()))
            .with_can_execute(|p| !p.is_empty()),
    );
    let button = Rc::new(CommandSource::new());
    let t = Rc::clone(&text);
    let parameter = move || t.borrow().clone();
    registry
        .bind_command_with(ContextId::new(), &button, &command, parameter)
        .unwrap();
    assert!(!button.can_execute());
    assert!(!button.request_execute());

    *text.borrow_mut() = "hi".to_string();
    command.raise_can_execute_changed();
    assert!(button.can_execute());

    assert!(button.request_execute());
    assert_eq!(*executed.borrow(), vec!["hi"]);
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Context-scoped teardown
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn context_teardown_detaches_everything() {
    let registry = BindingRegistry::default();
    let ctx = ContextId::new();
    let other = ContextId::new();

    let target = TextBox::new("");
    let source = TextBox::new("a");
    registry
        .bind_one_way(ctx, &target, &TEXT, &source, &TEXT)
        .unwrap();

    let observed = TextBox::new("");
    let (hits, trigger) = counter();
    registry
        .on_property_changed(ctx, &observed, &TEXT, &trigger)
        .unwrap();

    let runs = Rc::new(Cell::new(0u32));
    let r = Rc::clone(&runs);
    let command = Rc::new(DelegateCommand::new(move |_: &()| r.set(r.get() + 1)));
    let button = Rc::new(CommandSource::new());
    registry.bind_command(ctx, &button, &command).unwrap();

    let bystander = TextBox::new("");
    let (bystander_hits, bystander_trigger) = counter();
    registry
        .on_property_changed(other, &bystander, &TEXT, &bystander_trigger)
        .unwrap();

    assert_eq!(registry.context_binding_count(ctx), 3);
    assert_eq!(registry.unbind(ctx), 3);

    assert_eq!(source.handler_count(), 0);
    assert_eq!(observed.handler_count(), 0);
    assert!(button.execute_requested().is_empty());
    source.set_text("b");
    observed.set_text("c");
    button.request_execute();
    assert_eq!(target.text(), "a");
    assert_eq!(hits.get(), 0);
    assert_eq!(runs.get(), 0);

    bystander.set_text("still here");
    assert_eq!(bystander_hits.get(), 1);
    assert_eq!(registry.contexts(), vec![other]);
}

#[test]
fn scope_drop_tears_down_like_unbind() {
    let registry = BindingRegistry::default();
    let items = Rc::new(ObservableVec::from_vec(vec![TextBox::new("")]));
    let (_, trigger) = counter();
    {
        let scope = BindingScope::new(&registry);
        registry
            .on_item_property_changed(scope.context(), &items, &TEXT, &trigger, None)
            .unwrap();
        assert_eq!(scope.binding_count(), 2);
    }
    assert!(registry.is_empty());
    assert!(items.collection_changed().is_empty());
}

#[test]
fn teardown_drops_trigger_owning_a_scope_on_the_same_source() {
    let registry = BindingRegistry::default();
    let parent = ContextId::new();
    let model = TextBox::new("");

    let child = BindingScope::new(&registry);
    let (child_hits, child_trigger) = counter();
    registry
        .on_property_changed(child.context(), &model, &TEXT, &child_trigger)
        .unwrap();
    let owner = Trigger::from_fn(move || {
        let _ = child.context();
    });
    registry
        .on_property_changed(parent, &model, &TEXT, &owner)
        .unwrap();
    drop(owner);
    assert_eq!(model.handler_count(), 2);

    assert_eq!(registry.unbind(parent), 1);
    assert_eq!(model.handler_count(), 0);
    assert!(registry.is_empty());
    model.set_text("after");
    assert_eq!(child_hits.get(), 0);
}

// ═════════════════════════════════════════════════════════════════════════
// Misc
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn changing_and_changed_see_old_and_new() {
    let registry = BindingRegistry::default();
    let ctx = ContextId::new();
    let model = TextBox::new("old");
    let log = Rc::new(RefCell::new(Vec::new()));

    let l = Rc::clone(&log);
    let before = Trigger::from_value(move |v: &String| l.borrow_mut().push(format!("before:{v}")));
    let l = Rc::clone(&log);
    let after = Trigger::from_value(move |v: &String| l.borrow_mut().push(format!("after:{v}")));
    registry
        .on_property_changing(ctx, &model, &TEXT, &before)
        .unwrap();
    registry
        .on_property_changed(ctx, &model, &TEXT, &after)
        .unwrap();

    model.set_text("new");
    assert_eq!(*log.borrow(), vec!["before:old", "after:new"]);
}

#[test]
fn unbind_property_changing_leaves_changed_triggers() {
    let registry = BindingRegistry::default();
    let ctx = ContextId::new();
    let model = TextBox::new("old");
    let (before_hits, before) = counter();
    let (after_hits, after) = counter();
    registry
        .on_property_changing(ctx, &model, &TEXT, &before)
        .unwrap();
    registry
        .on_property_changed(ctx, &model, &TEXT, &after)
        .unwrap();

    let sel = Selector::context(ctx).object(&model).property("Text");
    assert_eq!(registry.unbind_property_changing(sel), 1);
    assert_eq!(registry.unbind_property_changing(sel), 0);
    assert!(model.notifier.property_changing().is_empty());
    assert_eq!(model.handler_count(), 1);

    model.set_text("new");
    assert_eq!(before_hits.get(), 0);
    assert_eq!(after_hits.get(), 1);
}

#[test]
fn one_way_to_source_with_converter_writes_back() {
    let registry = BindingRegistry::default();
    let view = TextBox::new("abc");
    let model = TextBox::new("");
    registry
        .bind_one_way_to_source_with(ContextId::new(), &view, &TEXT, &model, &TEXT, |s: String| {
            s.to_uppercase()
        })
        .unwrap();
    assert_eq!(model.text(), "ABC");

    view.set_text("xyz");
    assert_eq!(model.text(), "XYZ");

    model.set_text("ignored");
    assert_eq!(view.text(), "xyz");
    assert_eq!(model.handler_count(), 0);
}

#[test]
fn read_only_target_is_invalid_argument() {
    const LEN: Property<TextBox, String> =
        Property::read_only("Len", |b: &TextBox| b.text().len().to_string());
    let registry = BindingRegistry::default();
    let a = TextBox::new("");
    let b = TextBox::new("");
    let err = registry
        .bind_one_way(ContextId::new(), &a, &LEN, &b, &TEXT)
        .unwrap_err();
    let expected = BindError::InvalidArgument {
        parameter: "target_property",
        reason: "target property is read-only",
    };
    assert_eq!(err, expected);
    assert!(registry.is_empty());
}

#[test]
fn global_registry_is_usable() {
    let registry = BindingRegistry::global();
    let ctx = ContextId::new();
    let target = TextBox::new("");
    let source = TextBox::new("g");
    registry
        .bind_one_way(ctx, &target, &TEXT, &source, &TEXT)
        .unwrap();
    assert_eq!(target.text(), "g");
    assert_eq!(BindingRegistry::global().unbind(ctx), 1);
}
