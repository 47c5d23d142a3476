//! Propagation throughput for bindings and view context swaps.
//!
//! Run with: cargo bench -p bindery-runtime --bench binding_bench

use std::cell::RefCell;
use std::collections::HashMap;
use std::hint::black_box;
use std::rc::Rc;

use bindery_core::{
    BindResult, ChangeNotifier, Event, ObjectRef, Observable, PropertyChange, PropertyInfo, Value,
    Widget,
};
use bindery_runtime::{BindFlags, Binding, ModelProperty, View, ViewModel, shared};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

// =============================================================================
// Fixtures
// =============================================================================

struct Sink {
    props: [PropertyInfo; 1],
    value: RefCell<Value>,
    signals: HashMap<&'static str, Event<()>>,
}

impl Sink {
    fn new() -> Rc<Self> {
        let mut signals = HashMap::new();
        signals.insert("textChanged", Event::new());
        Rc::new(Self {
            props: [PropertyInfo::setter("text")],
            value: RefCell::new(Value::Null),
            signals,
        })
    }
}

impl Widget for Sink {
    fn class_name(&self) -> &'static str {
        "Sink"
    }

    fn properties(&self) -> &[PropertyInfo] {
        &self.props
    }

    fn property(&self, _name: &str) -> Option<Value> {
        Some(self.value.borrow().clone())
    }

    fn call_setter(&self, _name: &str, value: Value) -> BindResult<()> {
        *self.value.borrow_mut() = value;
        self.signals["textChanged"].emit(&())
    }

    fn signal(&self, name: &str) -> Option<&Event<()>> {
        self.signals.get(name)
    }
}

fn person(name: &str) -> Rc<ViewModel<String>> {
    Rc::new(ViewModel::new(
        shared(name.to_owned()),
        vec![ModelProperty::text("name", |s: &String| s, |s| s)],
    ))
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_source_to_target(c: &mut Criterion) {
    let mut group = c.benchmark_group("binding/source_to_target");
    for flags in [BindFlags::READ, BindFlags::READ_WRITE] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{flags:?}")),
            &flags,
            |b, &flags| {
                let vm = person("a");
                let sink = Sink::new();
                let _binding = Binding::builder("name", "text")
                    .flags(flags)
                    .source(ObjectRef::new(Rc::clone(&vm)))
                    .target(sink)
                    .build()
                    .unwrap();
                let mut n = 0_u64;
                b.iter(|| {
                    n += 1;
                    vm.notifier()
                        .emit_change(&PropertyChange::property("name", n.to_string()))
                        .unwrap();
                });
            },
        );
    }
    group.finish();
}

fn bench_context_swap(c: &mut Criterion) {
    let mut group = c.benchmark_group("view/context_swap");
    for bindings in [1_usize, 8, 64] {
        group.bench_with_input(
            BenchmarkId::from_parameter(bindings),
            &bindings,
            |b, &bindings| {
                let view = View::new();
                for _ in 0..bindings {
                    view.bind("name", Sink::new(), "text", BindFlags::READ_WRITE)
                        .unwrap();
                }
                let contexts = [person("a"), person("b")];
                let mut flip = 0;
                b.iter(|| {
                    flip ^= 1;
                    view.set_context(ObjectRef::new(Rc::clone(&contexts[flip])))
                        .unwrap();
                    black_box(&view);
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_source_to_target, bench_context_swap);
criterion_main!(benches);
