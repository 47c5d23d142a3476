#![forbid(unsafe_code)]

//! View-models for the example models.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::{Arc, Mutex, PoisonError};

use bindery::core::{
    BindError, BindResult, ChangeNotifier, Event, NotifyHandle, ObjectRef, Observable,
    PropertyChange, QueuedNotifier, Role, Value,
};
use bindery::runtime::{ModelProperty, ObservableList, Shared, ViewModel, shared};
use tracing::debug;

use crate::models::{Group, Person};

/// Change-notifying wrapper over a [`Person`].
pub type PersonViewModel = ViewModel<Person>;

pub fn person_view_model(person: Shared<Person>) -> Rc<PersonViewModel> {
    Rc::new(
        ViewModel::new(
            person,
            vec![
                ModelProperty::text("name", |p: &Person| &p.name, |p| &mut p.name),
                ModelProperty::text(
                    "family_name",
                    |p: &Person| &p.family_name,
                    |p| &mut p.family_name,
                ),
            ],
        )
        .named("PersonViewModel"),
    )
}

/// `"Family, Name"`, as shown in the people list.
fn display_name(person: &PersonViewModel) -> String {
    person.with_model(|p| format!("{}, {}", p.family_name, p.name))
}

/// Group of people with a current selection.
///
/// Properties: `name` and `people` (read-only), `current` (read-only, moved
/// with [`GroupViewModel::set_current`]), `leader` (read-write, a person
/// object or null).
pub struct GroupViewModel {
    name: String,
    group: Shared<Group>,
    people: Rc<ObservableList<PersonViewModel>>,
    current: RefCell<Option<Rc<PersonViewModel>>>,
    changed: Event<PropertyChange>,
}

impl std::fmt::Debug for GroupViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupViewModel")
            .field("name", &self.name)
            .field("people", &self.people.len())
            .field("current", &self.current_row())
            .finish()
    }
}

impl GroupViewModel {
    pub fn new(name: impl Into<String>, group: Group) -> Rc<Self> {
        let group = shared(group);
        let backing = Rc::clone(&group.borrow().people);
        let people = ObservableList::with_backing(backing, person_view_model).with_delegate(
            |person: &PersonViewModel, role| match role {
                Role::Display => Some(display_name(person).into()),
                Role::ToolTip => Some(person.with_model(|p| p.name.clone()).into()),
                _ => None,
            },
        );
        Rc::new(Self {
            name: name.into(),
            group,
            people,
            current: RefCell::new(None),
            changed: Event::new(),
        })
    }

    #[must_use]
    pub fn group(&self) -> Shared<Group> {
        Rc::clone(&self.group)
    }

    #[must_use]
    pub fn people(&self) -> Rc<ObservableList<PersonViewModel>> {
        Rc::clone(&self.people)
    }

    #[must_use]
    pub fn current(&self) -> Option<Rc<PersonViewModel>> {
        self.current.borrow().clone()
    }

    #[must_use]
    pub fn current_row(&self) -> Option<usize> {
        self.current
            .borrow()
            .as_ref()
            .and_then(|c| self.people.index_of(c))
    }

    /// Select the person at `row`; anything out of range clears the selection.
    pub fn set_current(&self, row: i64) -> BindResult<()> {
        let person = usize::try_from(row).ok().and_then(|r| self.people.get(r));
        self.replace_current(person)
    }

    /// Append an empty person and make it current.
    pub fn add_new_person(&self) -> BindResult<Rc<PersonViewModel>> {
        let person = person_view_model(shared(Person::default()));
        self.people.append(Rc::clone(&person))?;
        debug!(people = self.people.len(), "person added");
        self.replace_current(Some(Rc::clone(&person)))?;
        Ok(person)
    }

    /// Remove the current person, if any.
    pub fn remove_current(&self) -> BindResult<bool> {
        let Some(person) = self.current() else {
            return Ok(false);
        };
        let removed = self.people.remove(&person)?;
        let leader_left = self
            .group
            .borrow()
            .leader
            .as_ref()
            .is_some_and(|l| Rc::ptr_eq(l, &person.model()));
        if leader_left {
            self.group.borrow_mut().leader = None;
            self.changed
                .emit(&PropertyChange::property("leader", Value::Null))?;
        }
        self.replace_current(None)?;
        Ok(removed)
    }

    fn replace_current(&self, person: Option<Rc<PersonViewModel>>) -> BindResult<()> {
        let unchanged = match (&*self.current.borrow(), &person) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        };
        if unchanged {
            return Ok(());
        }
        self.current.replace(person.clone());
        self.changed.emit(&PropertyChange::property(
            "current",
            person.map(ObjectRef::new),
        ))
    }

    fn leader_value(&self) -> Value {
        let group = self.group.borrow();
        let Some(leader) = &group.leader else {
            return Value::Null;
        };
        self.people
            .items()
            .into_iter()
            .find(|p| Rc::ptr_eq(&p.model(), leader))
            .map_or(Value::Null, |p| Value::Object(ObjectRef::new(p)))
    }

    fn set_leader(&self, value: Value) -> BindResult<()> {
        let leader = match &value {
            Value::Null => None,
            Value::Object(object) => Some(
                object
                    .downcast::<PersonViewModel>()
                    .ok_or_else(|| BindError::TypeMismatch {
                        property: "leader".to_owned(),
                        expected: "PersonViewModel",
                        found: object.get().type_name(),
                    })?
                    .model(),
            ),
            other => {
                return Err(BindError::TypeMismatch {
                    property: "leader".to_owned(),
                    expected: "PersonViewModel",
                    found: other.type_name(),
                });
            }
        };
        let unchanged = match (&self.group.borrow().leader, &leader) {
            (None, None) => true,
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        };
        if unchanged {
            return Ok(());
        }
        self.group.borrow_mut().leader = leader;
        let stored = self.leader_value();
        self.changed
            .emit(&PropertyChange::property("leader", stored))
    }
}

impl Observable for GroupViewModel {
    fn type_name(&self) -> &'static str {
        "GroupViewModel"
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(self.name.as_str().into()),
            "people" => Some(Value::Object(ObjectRef::new(self.people()))),
            "current" => Some(self.current().map(ObjectRef::new).into()),
            "leader" => Some(self.leader_value()),
            _ => None,
        }
    }

    fn set_property(&self, name: &str, value: Value) -> BindResult<()> {
        match name {
            "leader" => self.set_leader(value),
            "name" | "people" | "current" => Err(BindError::read_only(self.type_name(), name)),
            _ => Err(BindError::unknown(self.type_name(), name)),
        }
    }

    fn notifier(&self) -> &dyn ChangeNotifier {
        &self.changed
    }
}

// ---------------------------------------------------------------------------
// Comment model with off-thread updates
// ---------------------------------------------------------------------------

/// Model behind the declarative comment form.
///
/// `name` is read-only; `comment` is read-write. The comment text may also be
/// replaced from another thread through a [`CommentFeed`]; those changes are
/// delivered when the owning thread calls [`CommentModel::pump`].
pub struct CommentModel {
    name: String,
    comment: Arc<Mutex<String>>,
    notifier: QueuedNotifier,
}

impl std::fmt::Debug for CommentModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentModel")
            .field("name", &self.name)
            .field("comment", &self.comment())
            .finish_non_exhaustive()
    }
}

impl CommentModel {
    pub fn new(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            name: name.into(),
            comment: Arc::new(Mutex::new(String::new())),
            notifier: QueuedNotifier::new(),
        })
    }

    #[must_use]
    pub fn comment(&self) -> String {
        self.comment
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A `Send` handle for updating the comment from other threads.
    #[must_use]
    pub fn feed(&self) -> CommentFeed {
        CommentFeed {
            comment: Arc::clone(&self.comment),
            handle: self.notifier.handle(),
        }
    }

    /// Deliver queued changes. Returns how many were delivered.
    pub fn pump(&self) -> BindResult<usize> {
        self.notifier.pump()
    }
}

impl Observable for CommentModel {
    fn type_name(&self) -> &'static str {
        "CommentModel"
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "name" => Some(self.name.as_str().into()),
            "comment" => Some(self.comment().into()),
            _ => None,
        }
    }

    fn set_property(&self, name: &str, value: Value) -> BindResult<()> {
        match name {
            "comment" => {
                let found = value.type_name();
                let text = value.into_text().map_err(|_| BindError::TypeMismatch {
                    property: name.to_owned(),
                    expected: "text",
                    found,
                })?;
                {
                    let mut comment = self.comment.lock().unwrap_or_else(PoisonError::into_inner);
                    if *comment == text {
                        return Ok(());
                    }
                    comment.clone_from(&text);
                }
                self.notifier.notify_property(name, text.into())
            }
            "name" => Err(BindError::read_only(self.type_name(), name)),
            _ => Err(BindError::unknown(self.type_name(), name)),
        }
    }

    fn notifier(&self) -> &dyn ChangeNotifier {
        &self.notifier
    }
}

/// Cross-thread writer for a [`CommentModel`].
#[derive(Clone)]
pub struct CommentFeed {
    comment: Arc<Mutex<String>>,
    handle: NotifyHandle,
}

impl std::fmt::Debug for CommentFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentFeed").finish_non_exhaustive()
    }
}

impl CommentFeed {
    /// Replace the comment and queue a change. Returns `false` once the
    /// model is gone.
    pub fn replace(&self, text: impl Into<String>) -> bool {
        let text = text.into();
        self.comment
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone_from(&text);
        self.handle.post_property("comment", text)
    }
}
