//! Benchmarks for binding registration, propagation and teardown.
//!
//! Run with: `cargo bench --package ftui-bind --bench registry_bench`
//!
//! # Performance Baselines
//!
//! - Bind + unbind of N one-way property bindings under one context
//! - Change propagation through a bound property
//! - Deep collection reconciliation on push/remove

use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use ftui_bind::{BindingRegistry, ContextId, Property, Trigger};
use ftui_notify::{
    EventSource, NotifyPropertyChanged, ObservableVec, PropertyChangedArgs, PropertyNotifier,
};

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Default)]
struct Cellish {
    notifier: PropertyNotifier,
    value: Cell<u64>,
}

impl Cellish {
    fn set(&self, value: u64) {
        if self.value.get() != value {
            self.value.set(value);
            self.notifier.notify_changed("Value");
        }
    }
}

impl NotifyPropertyChanged for Cellish {
    fn property_changed(&self) -> &EventSource<PropertyChangedArgs> {
        self.notifier.property_changed()
    }
}

const VALUE: Property<Cellish, u64> = Property::new(
    "Value",
    |c: &Cellish| c.value.get(),
    |c: &Cellish, v: u64| c.set(v),
);

fn cells(n: usize) -> Vec<Rc<Cellish>> {
    (0..n).map(|_| Rc::new(Cellish::default())).collect()
}

// ============================================================================
// Registration
// ============================================================================

fn bench_bind_unbind(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind_unbind");
    for n in [16usize, 256, 1024] {
        group.throughput(Throughput::Elements(n as u64));
        let source = Rc::new(Cellish::default());
        let targets = cells(n);
        group.bench_with_input(BenchmarkId::new("one_way", n), &targets, |b, targets| {
            let registry = BindingRegistry::default();
            b.iter(|| {
                let ctx = ContextId::new();
                for target in targets {
                    registry
                        .bind_one_way(ctx, target, &VALUE, &source, &VALUE)
                        .expect("fresh binding");
                }
                black_box(registry.unbind(ctx))
            });
        });
    }
    group.finish();
}

// ============================================================================
// Propagation
// ============================================================================

fn bench_propagate(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagate");
    for n in [1usize, 64, 512] {
        group.throughput(Throughput::Elements(n as u64));
        let registry = BindingRegistry::default();
        let ctx = ContextId::new();
        let source = Rc::new(Cellish::default());
        let targets = cells(n);
        for target in &targets {
            registry
                .bind_one_way(ctx, target, &VALUE, &source, &VALUE)
                .expect("fresh binding");
        }
        let mut next = 0u64;
        group.bench_function(BenchmarkId::new("fan_out", n), |b| {
            b.iter(|| {
                next += 1;
                source.set(black_box(next));
            });
        });
        registry.unbind(ctx);
    }
    group.finish();
}

// ============================================================================
// Deep reconciliation
// ============================================================================

fn bench_deep_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("deep_reconcile");
    for n in [16usize, 256] {
        let registry = BindingRegistry::default();
        let ctx = ContextId::new();
        let items = Rc::new(ObservableVec::from_vec(cells(n)));
        let trigger = Trigger::from_fn(|| {});
        registry
            .on_item_property_changed(ctx, &items, &VALUE, &trigger, None)
            .expect("fresh binding");
        group.bench_function(BenchmarkId::new("push_remove", n), |b| {
            b.iter(|| {
                items.push(Rc::new(Cellish::default()));
                black_box(items.remove(0));
            });
        });
        registry.unbind(ctx);
    }
    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_bind_unbind,
    bench_propagate,
    bench_deep_reconcile
);

criterion_main!(benches);
