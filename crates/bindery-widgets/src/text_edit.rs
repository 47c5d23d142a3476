#![forbid(unsafe_code)]

//! Multi-line text input with a rich-text representation.
//!
//! Reading `text` yields markup; bindings read the widget back through
//! `plainText` (declared with [`PropertyInfo::reading`]) so markup never
//! reaches the model.

use std::cell::RefCell;
use std::rc::Rc;

use bindery_core::{BindResult, Event, PropertyInfo, Value, Widget};

use crate::base::{Signals, text_arg, unsupported};

const PROPERTIES: &[PropertyInfo] = &[
    PropertyInfo::setter("text").reading("plainText"),
    PropertyInfo::read_only("plainText"),
];

pub struct TextEdit {
    plain: RefCell<String>,
    signals: Signals,
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

impl TextEdit {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            plain: RefCell::new(String::new()),
            signals: Signals::new(&["textChanged"]),
        })
    }

    #[must_use]
    pub fn plain_text(&self) -> String {
        self.plain.borrow().clone()
    }

    /// The document as markup, one paragraph per line.
    #[must_use]
    pub fn html(&self) -> String {
        let body: String = self
            .plain
            .borrow()
            .lines()
            .map(|line| format!("<p>{}</p>", escape(line)))
            .collect();
        format!("<html><body>{body}</body></html>")
    }

    pub fn set_text(&self, text: &str) -> BindResult<()> {
        if *self.plain.borrow() == text {
            return Ok(());
        }
        self.plain.replace(text.to_owned());
        self.signals.emit("textChanged")
    }

    /// Simulate the user replacing the document.
    pub fn edit(&self, text: &str) -> BindResult<()> {
        self.set_text(text)
    }
}

impl Widget for TextEdit {
    fn class_name(&self) -> &'static str {
        "TextEdit"
    }

    fn properties(&self) -> &[PropertyInfo] {
        PROPERTIES
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "text" => Some(self.html().into()),
            "plainText" => Some(self.plain_text().into()),
            _ => None,
        }
    }

    fn call_setter(&self, name: &str, value: Value) -> BindResult<()> {
        match name {
            "text" => self.set_text(&text_arg(name, value)?),
            _ => Err(unsupported(self.class_name(), name)),
        }
    }

    fn signal(&self, name: &str) -> Option<&Event<()>> {
        self.signals.get(name)
    }
}
