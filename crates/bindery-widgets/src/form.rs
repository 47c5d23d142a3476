#![forbid(unsafe_code)]

//! Container that hosts a [`View`].
//!
//! A `Form` is the widget-side owner of bindings: its `context` setter
//! forwards to the hosted view, so a parent view can bind a property of its
//! own context to a child form's `context` and get nested views.

use std::cell::RefCell;
use std::rc::Rc;

use bindery_core::{BindResult, Event, PropertyInfo, Value, Widget};
use bindery_runtime::View;

use crate::base::{Signals, text_arg, unsupported};
use crate::panel::Container;

const PROPERTIES: &[PropertyInfo] = &[
    PropertyInfo::setter("context"),
    PropertyInfo::attribute("title"),
];

pub struct Form {
    view: View,
    title: RefCell<String>,
    children: RefCell<Vec<Rc<dyn Widget>>>,
    signals: Signals,
}

impl Form {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            view: View::new(),
            title: RefCell::new(String::new()),
            children: RefCell::new(Vec::new()),
            signals: Signals::new(&["contextChanged"]),
        })
    }

    /// The hosted view.
    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    #[must_use]
    pub fn context(&self) -> Value {
        self.view.context()
    }

    /// Swap the hosted view's context and emit `contextChanged` if it moved.
    pub fn set_context(&self, context: impl Into<Value>) -> BindResult<()> {
        let context = context.into();
        if self.view.context() == context {
            return Ok(());
        }
        let rebound = self.view.set_context(context);
        let emitted = self.signals.emit("contextChanged");
        rebound.and(emitted)
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }
}

impl Container for Form {
    fn add_child(&self, child: Rc<dyn Widget>) {
        self.children.borrow_mut().push(child);
    }

    fn children(&self) -> Vec<Rc<dyn Widget>> {
        self.children.borrow().clone()
    }
}

impl Widget for Form {
    fn class_name(&self) -> &'static str {
        "Form"
    }

    fn properties(&self) -> &[PropertyInfo] {
        PROPERTIES
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "context" => Some(self.context()),
            "title" => Some(self.title().into()),
            _ => None,
        }
    }

    fn call_setter(&self, name: &str, value: Value) -> BindResult<()> {
        match name {
            "context" => self.set_context(value),
            _ => Err(unsupported(self.class_name(), name)),
        }
    }

    fn assign_attribute(&self, name: &str, value: Value) -> BindResult<()> {
        match name {
            "title" => {
                self.title.replace(text_arg(name, value)?);
                Ok(())
            }
            _ => Err(unsupported(self.class_name(), name)),
        }
    }

    fn signal(&self, name: &str) -> Option<&Event<()>> {
        self.signals.get(name)
    }
}
