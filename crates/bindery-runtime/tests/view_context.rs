mod common;

use std::cell::RefCell;
use std::rc::Rc;

use bindery_core::{BindError, Value};
use bindery_runtime::{BindFlags, View};
use common::{FakeWidget, Model};

#[test]
fn bind_without_context_then_set_context() {
    let view = View::new();
    let widget = FakeWidget::setter("text");
    view.bind("name", widget.dyn_ref(), "text", BindFlags::READ)
        .unwrap();
    assert_eq!(widget.value(), Value::Null);

    let model = Model::with(&[("name", "Alice".into())]);
    view.set_context(model.object()).unwrap();
    assert_eq!(widget.value(), Value::from("Alice"));
}

#[test]
fn context_swap_keeps_binding_identity() {
    let first = Model::with(&[("name", "A".into())]);
    let second = Model::with(&[("name", "B".into())]);
    let view = View::new();
    view.set_context(first.object()).unwrap();

    let widget = FakeWidget::setter("text");
    let id = view
        .bind("name", widget.dyn_ref(), "text", BindFlags::READ_WRITE)
        .unwrap();
    let signal_listeners = widget.dyn_ref().signal("textChanged").unwrap().listener_count();

    view.set_context(second.object()).unwrap();
    assert_eq!(view.binding_ids(), vec![id]);
    assert_eq!(widget.value(), Value::from("B"));
    assert_eq!(
        widget.dyn_ref().signal("textChanged").unwrap().listener_count(),
        signal_listeners
    );
    assert_eq!(first.changed.listener_count(), 0);
    assert_eq!(second.changed.listener_count(), 1);

    widget.edit("typed");
    assert_eq!(second.get("name"), Value::from("typed"));
    assert_eq!(first.get("name"), Value::from("A"));
}

#[test]
fn equal_context_does_no_work() {
    let model = Model::with(&[("name", "Alice".into())]);
    let view = View::new();
    let widget = FakeWidget::setter("text");
    view.set_context(model.object()).unwrap();
    view.bind("name", widget.dyn_ref(), "text", BindFlags::READ)
        .unwrap();

    let hook_calls = Rc::new(RefCell::new(0));
    let h = Rc::clone(&hook_calls);
    view.set_context_hook(move |_, _| *h.borrow_mut() += 1);

    let before = widget.assignments.get();
    view.set_context(model.object()).unwrap();
    assert_eq!(widget.assignments.get(), before);
    assert_eq!(*hook_calls.borrow(), 0);
}

#[test]
fn scalar_contexts_compare_by_value() {
    let view = View::new();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let c = Rc::clone(&calls);
    view.set_context_hook(move |old, new| c.borrow_mut().push((old.clone(), new.clone())));

    view.set_context(7_i64).unwrap();
    view.set_context(7_i64).unwrap();
    view.set_context(Value::Null).unwrap();
    assert_eq!(
        *calls.borrow(),
        vec![
            (Value::Null, Value::Int(7)),
            (Value::Int(7), Value::Null),
        ]
    );
}

#[test]
fn hook_runs_after_rebinding() {
    let model = Model::with(&[("name", "Alice".into())]);
    let view = Rc::new(View::new());
    let widget = FakeWidget::setter("text");
    view.bind("name", widget.dyn_ref(), "text", BindFlags::READ)
        .unwrap();

    let seen = Rc::new(RefCell::new(None));
    let s = Rc::clone(&seen);
    let w = Rc::clone(&widget);
    view.set_context_hook(move |_, _| *s.borrow_mut() = Some(w.value()));
    view.set_context(model.object()).unwrap();
    assert_eq!(*seen.borrow(), Some(Value::from("Alice")));
}

#[test]
fn rebind_errors_surface_after_all_bindings_ran() {
    common::init_tracing();
    let model = Model::with(&[("name", "Alice".into())]);
    let view = View::new();
    let broken = FakeWidget::read_only("text");
    let healthy = FakeWidget::setter("text");
    view.bind("name", broken.dyn_ref(), "text", BindFlags::READ)
        .unwrap();
    view.bind("name", healthy.dyn_ref(), "text", BindFlags::READ)
        .unwrap();

    let err = view.set_context(model.object()).unwrap_err();
    assert!(matches!(err, BindError::UnsupportedTargetProperty { .. }));
    assert_eq!(healthy.value(), Value::from("Alice"));
    assert_eq!(view.context(), Value::Object(model.object()));
}

#[test]
fn dropping_the_view_releases_sources() {
    let model = Model::with(&[("name", "Alice".into())]);
    let widget = FakeWidget::setter("text");
    {
        let view = View::new();
        view.set_context(model.object()).unwrap();
        view.bind("name", widget.dyn_ref(), "text", BindFlags::READ_WRITE)
            .unwrap();
        assert_eq!(model.changed.listener_count(), 1);
    }
    assert_eq!(model.changed.listener_count(), 0);
    assert_eq!(
        widget.dyn_ref().signal("textChanged").unwrap().listener_count(),
        0
    );
}

#[test]
fn unbind_one_binding() {
    let view = View::new();
    let a = FakeWidget::setter("text");
    let b = FakeWidget::setter("text");
    let first = view.bind("x", a.dyn_ref(), "text", BindFlags::READ).unwrap();
    view.bind("y", b.dyn_ref(), "text", BindFlags::READ).unwrap();
    assert!(view.unbind(first));
    assert!(!view.unbind(first));
    assert_eq!(view.binding_count(), 1);
}
