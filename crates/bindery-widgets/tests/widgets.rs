#![forbid(unsafe_code)]

//! Reference widgets driven through views and bindings.

use std::rc::Rc;

use bindery_core::{ObjectRef, Observable, Role, Value, Widget};
use bindery_runtime::{BindFlags, ModelProperty, ObservableList, ViewModel, shared};
use bindery_widgets::{CheckBox, Form, Label, LineEdit, ListView, SpinBox, TextEdit};
use proptest::prelude::*;

#[derive(Debug, Default)]
struct Note {
    title: String,
    body: String,
    done: bool,
    priority: i64,
}

type NoteVm = ViewModel<Note>;

fn note(title: &str) -> Rc<NoteVm> {
    Rc::new(
        ViewModel::new(
            shared(Note {
                title: title.into(),
                ..Note::default()
            }),
            vec![
                ModelProperty::text("title", |n: &Note| &n.title, |n| &mut n.title),
                ModelProperty::text("body", |n: &Note| &n.body, |n| &mut n.body),
                ModelProperty::read_write(
                    "done",
                    |n: &Note| Value::Bool(n.done),
                    |n, v| {
                        n.done = v.as_bool().unwrap_or_default();
                        Ok(())
                    },
                ),
                ModelProperty::read_write(
                    "priority",
                    |n: &Note| Value::Int(n.priority),
                    |n, v| {
                        n.priority = v.as_int().unwrap_or_default();
                        Ok(())
                    },
                ),
            ],
        )
        .named("NoteViewModel"),
    )
}

fn notes() -> Rc<ObservableList<NoteVm>> {
    ObservableList::new().with_delegate(|item: &NoteVm, role| match role {
        Role::Display => Some(item.with_model(|n| n.title.clone()).into()),
        _ => None,
    })
}

struct Board {
    notes: Rc<ObservableList<NoteVm>>,
    current: Option<Rc<NoteVm>>,
}

fn board(notes: Rc<ObservableList<NoteVm>>) -> Rc<ViewModel<Board>> {
    Rc::new(ViewModel::new(
        shared(Board {
            notes,
            current: None,
        }),
        vec![
            ModelProperty::read_only("notes", |b: &Board| {
                Value::Object(ObjectRef::new(Rc::clone(&b.notes)))
            }),
            ModelProperty::read_only("current", |b: &Board| {
                b.current.clone().map(ObjectRef::new).into()
            }),
        ],
    ))
}

#[test]
fn line_edit_round_trip_through_form() {
    let form = Form::new();
    let edit = LineEdit::new();
    form.view()
        .bind("title", edit.clone(), "text", BindFlags::READ_WRITE)
        .unwrap();

    let first = note("groceries");
    form.set_context(ObjectRef::new(Rc::clone(&first))).unwrap();
    assert_eq!(edit.text(), "groceries");

    edit.edit("shopping").unwrap();
    assert_eq!(first.model().borrow().title, "shopping");

    let second = note("taxes");
    form.set_context(ObjectRef::new(Rc::clone(&second))).unwrap();
    assert_eq!(edit.text(), "taxes");
    edit.edit("tax return").unwrap();
    assert_eq!(first.model().borrow().title, "shopping");
    assert_eq!(second.model().borrow().title, "tax return");
}

#[test]
fn text_edit_writes_plain_text_back() {
    let form = Form::new();
    let body = TextEdit::new();
    form.view()
        .bind("body", body.clone(), "text", BindFlags::READ_WRITE)
        .unwrap();
    let n = note("letter");
    form.set_context(ObjectRef::new(Rc::clone(&n))).unwrap();

    body.edit("Dear <you>").unwrap();
    assert_eq!(n.model().borrow().body, "Dear <you>");
    assert!(body.html().contains("Dear &lt;you&gt;"));
    assert_eq!(
        body.property("text"),
        Some(Value::from(body.html())),
        "text reads markup while the binding reads plainText"
    );
}

#[test]
fn check_box_and_spin_box_bind_scalars() {
    let form = Form::new();
    let done = CheckBox::new();
    let priority = SpinBox::with_range(0, 5);
    form.view()
        .bind("done", done.clone(), "checked", BindFlags::READ_WRITE)
        .unwrap();
    form.view()
        .bind("priority", priority.clone(), "value", BindFlags::READ_WRITE)
        .unwrap();
    let n = note("gym");
    form.set_context(ObjectRef::new(Rc::clone(&n))).unwrap();

    done.toggle().unwrap();
    assert!(n.model().borrow().done);

    priority.step_by(9).unwrap();
    assert_eq!(priority.value(), 5);
    assert_eq!(n.model().borrow().priority, 5);

    n.set_property("priority", Value::Int(2)).unwrap();
    assert_eq!(priority.value(), 2);
}

#[test]
fn label_displays_any_value() {
    let form = Form::new();
    let label = Label::new();
    form.view()
        .bind("priority", label.clone(), "text", BindFlags::READ)
        .unwrap();
    let n = note("x");
    form.set_context(ObjectRef::new(Rc::clone(&n))).unwrap();
    assert_eq!(label.text(), "0");
    n.set_property("priority", Value::Int(4)).unwrap();
    assert_eq!(label.text(), "4");
}

#[test]
fn list_view_follows_list_mutations() {
    let list = notes();
    let form = Form::new();
    let view = ListView::new();
    form.view()
        .bind("notes", view.clone(), "model", BindFlags::READ)
        .unwrap();
    form.set_context(ObjectRef::new(board(Rc::clone(&list))))
        .unwrap();
    assert!(view.rows().is_empty());

    let a = note("a");
    list.append(Rc::clone(&a)).unwrap();
    list.append(note("b")).unwrap();
    assert_eq!(view.rows(), vec!["a", "b"]);
    assert_eq!(view.property("count"), Some(Value::Int(2)));

    a.set_property("title", "alpha".into()).unwrap();
    assert_eq!(view.rows(), vec!["alpha", "b"]);

    view.select(1).unwrap();
    let b = list.get(1).unwrap();
    list.remove(&b).unwrap();
    assert_eq!(view.rows(), vec!["alpha"]);
    assert_eq!(view.current_row(), None, "selection past the end is cleared");
}

#[test]
fn list_view_selection_stays_on_its_item_across_removals() {
    let list = notes();
    let form = Form::new();
    let view = ListView::new();
    form.view()
        .bind("notes", view.clone(), "model", BindFlags::READ)
        .unwrap();
    form.set_context(ObjectRef::new(board(Rc::clone(&list))))
        .unwrap();
    for title in ["a", "b", "c", "d"] {
        list.append(note(title)).unwrap();
    }
    let moves = Rc::new(std::cell::RefCell::new(Vec::new()));
    let m = Rc::clone(&moves);
    let weak = Rc::downgrade(&view);
    view.signal("currentRowChanged").unwrap().connect(move |_| {
        if let Some(view) = weak.upgrade() {
            m.borrow_mut().push(view.current_row());
        }
        Ok(())
    });

    view.select(2).unwrap();
    let a = list.get(0).unwrap();
    list.remove(&a).unwrap();
    assert_eq!(view.current_row(), Some(1), "shifted down with its item");
    assert_eq!(view.rows()[1], "c");

    let c = list.get(1).unwrap();
    list.remove(&c).unwrap();
    assert_eq!(view.current_row(), None, "removing the selected row clears it");
    assert_eq!(view.property("currentRow"), Some(Value::Int(-1)));

    view.select(0).unwrap();
    assert_eq!(view.current_row(), Some(0));
    let d = list.get(1).unwrap();
    list.remove(&d).unwrap();
    assert_eq!(view.current_row(), Some(0), "rows below the selection leave it alone");
    assert_eq!(*moves.borrow(), vec![Some(2), Some(1), None, Some(0)]);
}

#[test]
fn list_view_rejects_non_list_models() {
    let view = ListView::new();
    let err = view
        .write_property("model", Value::Object(ObjectRef::new(note("x"))))
        .unwrap_err();
    assert!(!err.is_configuration());
    assert!(view.model().is_none());
}

#[test]
fn nested_form_gets_its_context_from_the_parent() {
    let list = notes();
    let b = board(Rc::clone(&list));
    let outer = Form::new();
    let details = Form::new();
    let title = LineEdit::new();
    details
        .view()
        .bind("title", title.clone(), "text", BindFlags::READ_WRITE)
        .unwrap();
    outer
        .view()
        .bind("current", details.clone(), "context", BindFlags::READ)
        .unwrap();
    outer.set_context(ObjectRef::new(Rc::clone(&b))).unwrap();
    assert!(details.context().is_null());
    assert_eq!(title.text(), "");

    let picked = note("picked");
    b.model().borrow_mut().current = Some(Rc::clone(&picked));
    b.notify("current", ObjectRef::new(Rc::clone(&picked))).unwrap();
    assert_eq!(title.text(), "picked");

    title.edit("renamed").unwrap();
    assert_eq!(picked.model().borrow().title, "renamed");
}

#[test]
fn form_emits_context_changed_once_per_swap() {
    let form = Form::new();
    let hits = Rc::new(std::cell::Cell::new(0));
    let h = Rc::clone(&hits);
    form.signal("contextChanged").unwrap().connect(move |_| {
        h.set(h.get() + 1);
        Ok(())
    });
    let n = ObjectRef::new(note("x"));
    form.set_context(n.clone()).unwrap();
    form.set_context(n).unwrap();
    assert_eq!(hits.get(), 1);
}

proptest! {
    #[test]
    fn spin_box_keeps_model_within_range(steps in proptest::collection::vec(-7i64..7, 1..24)) {
        let form = Form::new();
        let spin = SpinBox::with_range(-3, 3);
        form.view()
            .bind("priority", spin.clone(), "value", BindFlags::READ_WRITE)
            .unwrap();
        let n = note("p");
        form.set_context(ObjectRef::new(Rc::clone(&n))).unwrap();
        for step in steps {
            spin.step_by(step).unwrap();
            let stored = n.model().borrow().priority;
            prop_assert!((-3..=3).contains(&stored));
            prop_assert_eq!(stored, spin.value());
        }
    }
}
