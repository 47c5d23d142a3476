#![forbid(unsafe_code)]

//! Read-only text display.

use std::cell::RefCell;
use std::rc::Rc;

use bindery_core::{BindResult, Event, PropertyInfo, Value, Widget};

use crate::base::unsupported;

const PROPERTIES: &[PropertyInfo] = &[PropertyInfo::setter("text")];

/// Displays any scalar as text. Has no change signal, so it only supports
/// READ bindings.
pub struct Label {
    text: RefCell<String>,
}

impl Label {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            text: RefCell::new(String::new()),
        })
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.text.replace(text.into());
    }
}

impl Widget for Label {
    fn class_name(&self) -> &'static str {
        "Label"
    }

    fn properties(&self) -> &[PropertyInfo] {
        PROPERTIES
    }

    fn property(&self, name: &str) -> Option<Value> {
        (name == "text").then(|| self.text().into())
    }

    fn call_setter(&self, name: &str, value: Value) -> BindResult<()> {
        match name {
            "text" => {
                self.set_text(value.to_string());
                Ok(())
            }
            _ => Err(unsupported(self.class_name(), name)),
        }
    }

    fn signal(&self, _name: &str) -> Option<&Event<()>> {
        None
    }
}
