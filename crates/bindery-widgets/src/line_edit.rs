#![forbid(unsafe_code)]

//! Single-line text input.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bindery_core::{BindResult, Event, PropertyInfo, Value, Widget};

use crate::base::{Signals, bool_arg, text_arg, unsupported};

const PROPERTIES: &[PropertyInfo] = &[
    PropertyInfo::setter("text"),
    PropertyInfo::attribute("placeholder"),
    PropertyInfo::attribute("readOnly"),
];

/// Editable single line of text.
///
/// `text` is written through its setter and announces edits on
/// `textChanged`; `placeholder` and `readOnly` are plain attributes.
pub struct LineEdit {
    text: RefCell<String>,
    placeholder: RefCell<String>,
    read_only: Cell<bool>,
    signals: Signals,
}

impl LineEdit {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            text: RefCell::new(String::new()),
            placeholder: RefCell::new(String::new()),
            read_only: Cell::new(false),
            signals: Signals::new(&["textChanged"]),
        })
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    /// Replace the text; emits `textChanged` only when it differs.
    pub fn set_text(&self, text: &str) -> BindResult<()> {
        if *self.text.borrow() == text {
            return Ok(());
        }
        self.text.replace(text.to_owned());
        self.signals.emit("textChanged")
    }

    /// Simulate the user typing `text`. Ignored while read-only.
    pub fn edit(&self, text: &str) -> BindResult<()> {
        if self.read_only.get() {
            return Ok(());
        }
        self.set_text(text)
    }

    #[must_use]
    pub fn placeholder(&self) -> String {
        self.placeholder.borrow().clone()
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only.get()
    }
}

impl Widget for LineEdit {
    fn class_name(&self) -> &'static str {
        "LineEdit"
    }

    fn properties(&self) -> &[PropertyInfo] {
        PROPERTIES
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "text" => Some(self.text().into()),
            "placeholder" => Some(self.placeholder().into()),
            "readOnly" => Some(self.read_only.get().into()),
            _ => None,
        }
    }

    fn call_setter(&self, name: &str, value: Value) -> BindResult<()> {
        match name {
            "text" => self.set_text(&text_arg(name, value)?),
            _ => Err(unsupported(self.class_name(), name)),
        }
    }

    fn assign_attribute(&self, name: &str, value: Value) -> BindResult<()> {
        match name {
            "placeholder" => {
                self.placeholder.replace(text_arg(name, value)?);
                Ok(())
            }
            "readOnly" => {
                self.read_only.set(bool_arg(name, value)?);
                Ok(())
            }
            _ => Err(unsupported(self.class_name(), name)),
        }
    }

    fn signal(&self, name: &str) -> Option<&Event<()>> {
        self.signals.get(name)
    }
}
