#![forbid(unsafe_code)]

//! View-models over plain data.
//!
//! A [`ViewModel<M>`] wraps a shared plain model and exposes a fixed table of
//! [`ModelProperty`] accessors as observable properties. Writes that leave a
//! property unchanged are dropped before they reach the model; writes that
//! change it emit a [`PropertyChange`] carrying the value read back from the
//! model.
//!
//! Replacing the model with [`ViewModel::set_model`] emits the
//! [`ChangeScope::All`](bindery_core::ChangeScope::All) sentinel, so every
//! binding re-reads its property.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bindery_core::{
    BindError, BindResult, ChangeNotifier, Event, Observable, PropertyChange, Value,
};
use tracing::trace;

/// Plain model shared between a view-model and the backing collection.
pub type Shared<M> = Rc<RefCell<M>>;

/// Wrap a plain model for sharing.
pub fn shared<M>(model: M) -> Shared<M> {
    Rc::new(RefCell::new(model))
}

/// An observable item that wraps a plain model.
pub trait ModelWrapper: Observable {
    type Model: 'static;

    /// The wrapped model.
    fn model(&self) -> Shared<Self::Model>;
}

type Getter<M> = Box<dyn Fn(&M) -> Value>;
type Setter<M> = Box<dyn Fn(&mut M, Value) -> BindResult<()>>;

/// One named property of a [`ViewModel`].
pub struct ModelProperty<M> {
    name: &'static str,
    get: Getter<M>,
    set: Option<Setter<M>>,
}

impl<M> fmt::Debug for ModelProperty<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelProperty")
            .field("name", &self.name)
            .field("writable", &self.set.is_some())
            .finish()
    }
}

impl<M: 'static> ModelProperty<M> {
    pub fn read_only(name: &'static str, get: impl Fn(&M) -> Value + 'static) -> Self {
        Self {
            name,
            get: Box::new(get),
            set: None,
        }
    }

    pub fn read_write(
        name: &'static str,
        get: impl Fn(&M) -> Value + 'static,
        set: impl Fn(&mut M, Value) -> BindResult<()> + 'static,
    ) -> Self {
        Self {
            name,
            get: Box::new(get),
            set: Some(Box::new(set)),
        }
    }

    /// A read-write text field.
    pub fn text(
        name: &'static str,
        field: impl Fn(&M) -> &String + 'static,
        field_mut: impl Fn(&mut M) -> &mut String + 'static,
    ) -> Self {
        Self::read_write(
            name,
            move |m| Value::Text(field(m).clone()),
            move |m, value| {
                let found = value.type_name();
                let text = value.into_text().map_err(|_| BindError::TypeMismatch {
                    property: name.to_owned(),
                    expected: "text",
                    found,
                })?;
                *field_mut(m) = text;
                Ok(())
            },
        )
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn is_writable(&self) -> bool {
        self.set.is_some()
    }
}

/// Observable wrapper around a shared plain model.
pub struct ViewModel<M: 'static> {
    type_name: &'static str,
    model: RefCell<Shared<M>>,
    properties: Vec<ModelProperty<M>>,
    changed: Event<PropertyChange>,
}

impl<M: 'static> fmt::Debug for ViewModel<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewModel")
            .field("type_name", &self.type_name)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

impl<M: 'static> ViewModel<M> {
    pub fn new(model: Shared<M>, properties: Vec<ModelProperty<M>>) -> Self {
        Self {
            type_name: std::any::type_name::<Self>(),
            model: RefCell::new(model),
            properties,
            changed: Event::new(),
        }
    }

    /// Override the name used in logs and errors.
    #[must_use]
    pub fn named(mut self, type_name: &'static str) -> Self {
        self.type_name = type_name;
        self
    }

    /// The current model.
    #[must_use]
    pub fn model(&self) -> Shared<M> {
        Rc::clone(&self.model.borrow())
    }

    /// Replace the model and announce that every property changed.
    ///
    /// A no-op when `model` is already the current model.
    pub fn set_model(&self, model: Shared<M>) -> BindResult<()> {
        if Rc::ptr_eq(&self.model.borrow(), &model) {
            return Ok(());
        }
        *self.model.borrow_mut() = model;
        trace!(view_model = self.type_name, "model replaced");
        self.changed.emit(&PropertyChange::all())
    }

    /// Emit a change for a derived property.
    pub fn notify(&self, name: &str, value: impl Into<Value>) -> BindResult<()> {
        self.changed.emit(&PropertyChange::property(name, value))
    }

    /// Borrow the model immutably.
    pub fn with_model<R>(&self, f: impl FnOnce(&M) -> R) -> R {
        let model = self.model();
        let borrowed = model.borrow();
        f(&borrowed)
    }

    #[must_use]
    pub fn property_names(&self) -> Vec<&'static str> {
        self.properties.iter().map(ModelProperty::name).collect()
    }

    /// The change event, for composite view-models that share it.
    #[must_use]
    pub fn changed(&self) -> &Event<PropertyChange> {
        &self.changed
    }

    fn find(&self, name: &str) -> Option<&ModelProperty<M>> {
        self.properties.iter().find(|p| p.name == name)
    }
}

impl<M: 'static> Observable for ViewModel<M> {
    fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn property(&self, name: &str) -> Option<Value> {
        let prop = self.find(name)?;
        Some(self.with_model(|m| (prop.get)(m)))
    }

    fn set_property(&self, name: &str, value: Value) -> BindResult<()> {
        let prop = self
            .find(name)
            .ok_or_else(|| BindError::unknown(self.type_name, name))?;
        let Some(set) = &prop.set else {
            return Err(BindError::read_only(self.type_name, name));
        };
        let model = self.model();
        let current = (prop.get)(&model.borrow());
        if current == value {
            return Ok(());
        }
        set(&mut model.borrow_mut(), value)?;
        let stored = (prop.get)(&model.borrow());
        trace!(view_model = self.type_name, property = name, "property changed");
        self.changed.emit(&PropertyChange::property(name, stored))
    }

    fn notifier(&self) -> &dyn ChangeNotifier {
        &self.changed
    }
}

impl<M: 'static> ModelWrapper for ViewModel<M> {
    type Model = M;

    fn model(&self) -> Shared<M> {
        ViewModel::model(self)
    }
}
