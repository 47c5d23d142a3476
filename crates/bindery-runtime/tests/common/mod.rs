//! Test doubles for both ends of a binding.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use bindery_core::{
    BindError, BindResult, ChangeNotifier, Event, ObjectRef, Observable, PropertyAccess,
    PropertyChange, PropertyInfo, Value, Widget, change_signal_name,
};

/// Route `tracing` output to the test harness; `RUST_LOG` selects levels.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Observable that emits on every write and counts writes per property.
#[derive(Default)]
pub struct Model {
    values: RefCell<HashMap<String, Value>>,
    writes: RefCell<HashMap<String, usize>>,
    pub changed: Event<PropertyChange>,
}

impl Model {
    pub fn with(props: &[(&str, Value)]) -> Rc<Self> {
        let model = Self::default();
        for (name, value) in props {
            model
                .values
                .borrow_mut()
                .insert((*name).to_owned(), value.clone());
        }
        Rc::new(model)
    }

    pub fn object(self: &Rc<Self>) -> ObjectRef {
        ObjectRef::new(Rc::clone(self))
    }

    pub fn writes(&self, name: &str) -> usize {
        self.writes.borrow().get(name).copied().unwrap_or(0)
    }

    pub fn get(&self, name: &str) -> Value {
        self.values.borrow().get(name).cloned().unwrap_or_default()
    }

    /// Overwrite a value without notifying.
    pub fn set_silently(&self, name: &str, value: impl Into<Value>) {
        self.values
            .borrow_mut()
            .insert(name.to_owned(), value.into());
    }

    /// Change a property from "application code".
    pub fn change(&self, name: &str, value: impl Into<Value>) {
        self.set_property(name, value.into()).unwrap();
    }
}

impl Observable for Model {
    fn type_name(&self) -> &'static str {
        "Model"
    }

    fn property(&self, name: &str) -> Option<Value> {
        self.values.borrow().get(name).cloned()
    }

    fn set_property(&self, name: &str, value: Value) -> BindResult<()> {
        if !self.values.borrow().contains_key(name) {
            return Err(BindError::unknown("Model", name));
        }
        *self.writes.borrow_mut().entry(name.to_owned()).or_default() += 1;
        self.values
            .borrow_mut()
            .insert(name.to_owned(), value.clone());
        self.changed.emit(&PropertyChange::property(name, value))
    }

    fn notifier(&self) -> &dyn ChangeNotifier {
        &self.changed
    }
}

/// Widget with one configurable property.
pub struct FakeWidget {
    props: Vec<PropertyInfo>,
    values: RefCell<HashMap<&'static str, Value>>,
    signals: HashMap<String, Event<()>>,
    pub assignments: Cell<usize>,
}

impl FakeWidget {
    fn build(info: PropertyInfo, with_signal: bool) -> Rc<Self> {
        let mut signals = HashMap::new();
        if with_signal {
            signals.insert(change_signal_name(info.name), Event::new());
        }
        let mut values = HashMap::new();
        values.insert(info.name, Value::Null);
        if let Some(read_as) = info.read_as {
            values.insert(read_as, Value::Null);
        }
        Rc::new(Self {
            props: vec![info],
            values: RefCell::new(values),
            signals,
            assignments: Cell::new(0),
        })
    }

    /// `name` written through a setter, with a change signal.
    pub fn setter(name: &'static str) -> Rc<Self> {
        Self::build(PropertyInfo::setter(name), true)
    }

    /// `name` written as a plain attribute, with a change signal.
    pub fn attribute(name: &'static str) -> Rc<Self> {
        Self::build(PropertyInfo::attribute(name), true)
    }

    /// `name` readable but not writable in any style.
    pub fn read_only(name: &'static str) -> Rc<Self> {
        Self::build(PropertyInfo::read_only(name), true)
    }

    /// `name` writable but without a change signal.
    pub fn silent(name: &'static str) -> Rc<Self> {
        Self::build(PropertyInfo::setter(name), false)
    }

    /// `name` whose value reads back through `read_as`.
    pub fn reading(name: &'static str, read_as: &'static str) -> Rc<Self> {
        Self::build(PropertyInfo::setter(name).reading(read_as), true)
    }

    pub fn dyn_ref(self: &Rc<Self>) -> Rc<dyn Widget> {
        Rc::clone(self) as Rc<dyn Widget>
    }

    pub fn value(&self) -> Value {
        self.values.borrow()[self.props[0].name].clone()
    }

    /// Set the alternate read-back value directly.
    pub fn set_raw(&self, name: &'static str, value: Value) {
        self.values.borrow_mut().insert(name, value);
    }

    /// Simulate a user edit: store and emit the change signal.
    pub fn edit(&self, value: impl Into<Value>) {
        let info = self.props[0];
        let value = value.into();
        self.values.borrow_mut().insert(info.name, value.clone());
        if let Some(read_as) = info.read_as {
            self.values.borrow_mut().insert(read_as, value);
        }
        if let Some(signal) = self.signals.get(&change_signal_name(info.name)) {
            signal.emit(&()).unwrap();
        }
    }

    /// Emit the change signal without touching any value.
    pub fn emit_changed(&self) {
        if let Some(signal) = self.signals.get(&change_signal_name(self.props[0].name)) {
            signal.emit(&()).unwrap();
        }
    }

    fn store(&self, name: &str, value: Value) -> BindResult<()> {
        let info = self.props[0];
        if info.name != name {
            return Err(BindError::unknown("FakeWidget", name));
        }
        self.assignments.set(self.assignments.get() + 1);
        let changed = self.values.borrow_mut().insert(info.name, value.clone()) != Some(value);
        if changed && let Some(signal) = self.signals.get(&change_signal_name(name)) {
            signal.emit(&())?;
        }
        Ok(())
    }
}

impl Widget for FakeWidget {
    fn class_name(&self) -> &'static str {
        "FakeWidget"
    }

    fn properties(&self) -> &[PropertyInfo] {
        &self.props
    }

    fn property(&self, name: &str) -> Option<Value> {
        self.values.borrow().get(name).cloned()
    }

    fn call_setter(&self, name: &str, value: Value) -> BindResult<()> {
        if self.props[0].access == PropertyAccess::Setter {
            self.store(name, value)
        } else {
            Err(BindError::UnsupportedTargetProperty {
                target: "FakeWidget",
                property: name.to_owned(),
            })
        }
    }

    fn assign_attribute(&self, name: &str, value: Value) -> BindResult<()> {
        if self.props[0].access == PropertyAccess::Attribute {
            self.store(name, value)
        } else {
            Err(BindError::UnsupportedTargetProperty {
                target: "FakeWidget",
                property: name.to_owned(),
            })
        }
    }

    fn signal(&self, name: &str) -> Option<&Event<()>> {
        self.signals.get(name)
    }
}
