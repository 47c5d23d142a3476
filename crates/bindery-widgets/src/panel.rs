#![forbid(unsafe_code)]

//! Plain container widget.

use std::cell::RefCell;
use std::rc::Rc;

use bindery_core::{BindResult, Event, PropertyInfo, Value, Widget};

use crate::base::{text_arg, unsupported};

/// Something that holds child widgets.
pub trait Container {
    fn add_child(&self, child: Rc<dyn Widget>);

    /// Children in insertion order.
    fn children(&self) -> Vec<Rc<dyn Widget>>;
}

const PROPERTIES: &[PropertyInfo] = &[PropertyInfo::attribute("title")];

/// Titled group of child widgets with no view of its own.
pub struct Panel {
    title: RefCell<String>,
    children: RefCell<Vec<Rc<dyn Widget>>>,
}

impl Panel {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            title: RefCell::new(String::new()),
            children: RefCell::new(Vec::new()),
        })
    }

    #[must_use]
    pub fn title(&self) -> String {
        self.title.borrow().clone()
    }
}

impl Container for Panel {
    fn add_child(&self, child: Rc<dyn Widget>) {
        self.children.borrow_mut().push(child);
    }

    fn children(&self) -> Vec<Rc<dyn Widget>> {
        self.children.borrow().clone()
    }
}

impl Widget for Panel {
    fn class_name(&self) -> &'static str {
        "Panel"
    }

    fn properties(&self) -> &[PropertyInfo] {
        PROPERTIES
    }

    fn property(&self, name: &str) -> Option<Value> {
        (name == "title").then(|| self.title().into())
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

    fn signal(&self, _name: &str) -> Option<&Event<()>> {
        None
    }
}
