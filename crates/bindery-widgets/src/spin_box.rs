#![forbid(unsafe_code)]

//! Integer spin box.

use std::cell::Cell;
use std::rc::Rc;

use bindery_core::{BindResult, Event, PropertyInfo, Value, Widget};

use crate::base::{Signals, int_arg, unsupported};

const PROPERTIES: &[PropertyInfo] = &[
    PropertyInfo::setter("value"),
    PropertyInfo::attribute("minimum"),
    PropertyInfo::attribute("maximum"),
];

/// Integer input clamped to `minimum..=maximum`.
pub struct SpinBox {
    value: Cell<i64>,
    minimum: Cell<i64>,
    maximum: Cell<i64>,
    signals: Signals,
}

impl SpinBox {
    /// A spin box over `0..=99`.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Self::with_range(0, 99)
    }

    #[must_use]
    pub fn with_range(minimum: i64, maximum: i64) -> Rc<Self> {
        let maximum = maximum.max(minimum);
        Rc::new(Self {
            value: Cell::new(minimum),
            minimum: Cell::new(minimum),
            maximum: Cell::new(maximum),
            signals: Signals::new(&["valueChanged"]),
        })
    }

    #[must_use]
    pub fn value(&self) -> i64 {
        self.value.get()
    }

    /// Set the value, clamped to the range.
    pub fn set_value(&self, value: i64) -> BindResult<()> {
        let clamped = value.clamp(self.minimum.get(), self.maximum.get());
        if self.value.replace(clamped) == clamped {
            return Ok(());
        }
        self.signals.emit("valueChanged")
    }

    /// Simulate arrow-key steps.
    pub fn step_by(&self, steps: i64) -> BindResult<()> {
        self.set_value(self.value.get().saturating_add(steps))
    }

    fn set_range(&self, minimum: i64, maximum: i64) -> BindResult<()> {
        self.minimum.set(minimum);
        self.maximum.set(maximum.max(minimum));
        self.set_value(self.value.get())
    }
}

impl Widget for SpinBox {
    fn class_name(&self) -> &'static str {
        "SpinBox"
    }

    fn properties(&self) -> &[PropertyInfo] {
        PROPERTIES
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "value" => Some(self.value.get().into()),
            "minimum" => Some(self.minimum.get().into()),
            "maximum" => Some(self.maximum.get().into()),
            _ => None,
        }
    }

    fn call_setter(&self, name: &str, value: Value) -> BindResult<()> {
        match name {
            "value" => self.set_value(int_arg(name, value)?),
            _ => Err(unsupported(self.class_name(), name)),
        }
    }

    fn assign_attribute(&self, name: &str, value: Value) -> BindResult<()> {
        match name {
            "minimum" => self.set_range(int_arg(name, value)?, self.maximum.get()),
            "maximum" => self.set_range(self.minimum.get(), int_arg(name, value)?),
            _ => Err(unsupported(self.class_name(), name)),
        }
    }

    fn signal(&self, name: &str) -> Option<&Event<()>> {
        self.signals.get(name)
    }
}
