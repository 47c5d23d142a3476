#![forbid(unsafe_code)]

//! Plumbing shared by the reference widgets.

use bindery_core::{BindError, BindResult, Event, Value};

/// Fixed set of named change signals.
pub(crate) struct Signals(Vec<(&'static str, Event<()>)>);

impl Signals {
    pub(crate) fn new(names: &[&'static str]) -> Self {
        Self(names.iter().map(|&name| (name, Event::new())).collect())
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Event<()>> {
        self.0
            .iter()
            .find(|(signal, _)| *signal == name)
            .map(|(_, event)| event)
    }

    pub(crate) fn emit(&self, name: &str) -> BindResult<()> {
        match self.get(name) {
            Some(event) => event.emit(&()),
            None => Ok(()),
        }
    }
}

pub(crate) fn mismatch(property: &str, expected: &'static str, value: &Value) -> BindError {
    BindError::TypeMismatch {
        property: property.to_owned(),
        expected,
        found: value.type_name(),
    }
}

/// Text argument; `Null` reads as empty.
pub(crate) fn text_arg(property: &str, value: Value) -> BindResult<String> {
    value
        .into_text()
        .map_err(|other| mismatch(property, "text", &other))
}

pub(crate) fn bool_arg(property: &str, value: Value) -> BindResult<bool> {
    value
        .as_bool()
        .ok_or_else(|| mismatch(property, "bool", &value))
}

pub(crate) fn int_arg(property: &str, value: Value) -> BindResult<i64> {
    value.as_int().ok_or_else(|| mismatch(property, "int", &value))
}

pub(crate) fn unsupported(target: &'static str, property: &str) -> BindError {
    BindError::UnsupportedTargetProperty {
        target,
        property: property.to_owned(),
    }
}
