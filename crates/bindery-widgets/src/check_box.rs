#![forbid(unsafe_code)]

//! Two-state check box.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bindery_core::{BindResult, Event, PropertyInfo, Value, Widget};

use crate::base::{Signals, bool_arg, text_arg, unsupported};

const PROPERTIES: &[PropertyInfo] = &[
    PropertyInfo::attribute("checked"),
    PropertyInfo::attribute("text"),
];

/// Check box whose `checked` state is a plain attribute.
pub struct CheckBox {
    checked: Cell<bool>,
    text: RefCell<String>,
    signals: Signals,
}

impl CheckBox {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            checked: Cell::new(false),
            text: RefCell::new(String::new()),
            signals: Signals::new(&["checkedChanged"]),
        })
    }

    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.checked.get()
    }

    pub fn set_checked(&self, checked: bool) -> BindResult<()> {
        if self.checked.replace(checked) == checked {
            return Ok(());
        }
        self.signals.emit("checkedChanged")
    }

    /// Simulate a click.
    pub fn toggle(&self) -> BindResult<()> {
        self.set_checked(!self.checked.get())
    }
}

impl Widget for CheckBox {
    fn class_name(&self) -> &'static str {
        "CheckBox"
    }

    fn properties(&self) -> &[PropertyInfo] {
        PROPERTIES
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "checked" => Some(self.checked.get().into()),
            "text" => Some(self.text.borrow().clone().into()),
            _ => None,
        }
    }

    fn assign_attribute(&self, name: &str, value: Value) -> BindResult<()> {
        match name {
            "checked" => self.set_checked(bool_arg(name, value)?),
            "text" => {
                self.text.replace(text_arg(name, value)?);
                Ok(())
            }
            _ => Err(unsupported(self.class_name(), name)),
        }
    }

    fn signal(&self, name: &str) -> Option<&Event<()>> {
        self.signals.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_and_signals() {
        let check = CheckBox::new();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        check.signal("checkedChanged").unwrap().connect(move |_| {
            h.set(h.get() + 1);
            Ok(())
        });
        check.toggle().unwrap();
        check.assign_attribute("checked", true.into()).unwrap();
        assert!(check.is_checked());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn checked_has_no_setter() {
        let check = CheckBox::new();
        assert!(check.call_setter("checked", true.into()).is_err());
    }
}
