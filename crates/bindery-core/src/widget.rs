#![forbid(unsafe_code)]

//! The widget contract consumed by bindings.
//!
//! A widget declares its bindable properties up front through
//! [`Widget::properties`]. Each [`PropertyInfo`] states how the property is
//! written ([`PropertyAccess`]) and, optionally, which property to read back
//! instead ([`PropertyInfo::read_as`]). Bindings resolve this once when the
//! target is attached rather than probing on every write.
//!
//! Change signals follow the `"<property>Changed"` naming convention and carry
//! no payload; listeners read the current value back from the widget.

use crate::error::{BindError, BindResult};
use crate::notify::Event;
use crate::observable::AsAny;
use crate::value::Value;

/// How a widget property is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyAccess {
    /// Through [`Widget::call_setter`].
    Setter,
    /// Through [`Widget::assign_attribute`].
    Attribute,
    /// Not writable.
    ReadOnly,
}

/// Static description of one widget property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyInfo {
    pub name: &'static str,
    pub access: PropertyAccess,
    /// Property to read instead of `name` when pulling the widget's value.
    pub read_as: Option<&'static str>,
}

impl PropertyInfo {
    #[must_use]
    pub const fn setter(name: &'static str) -> Self {
        Self {
            name,
            access: PropertyAccess::Setter,
            read_as: None,
        }
    }

    #[must_use]
    pub const fn attribute(name: &'static str) -> Self {
        Self {
            name,
            access: PropertyAccess::Attribute,
            read_as: None,
        }
    }

    #[must_use]
    pub const fn read_only(name: &'static str) -> Self {
        Self {
            name,
            access: PropertyAccess::ReadOnly,
            read_as: None,
        }
    }

    /// Read this property back through `other`.
    #[must_use]
    pub const fn reading(mut self, other: &'static str) -> Self {
        self.read_as = Some(other);
        self
    }

    /// Name to read when pulling the current value.
    #[must_use]
    pub fn read_name(&self) -> &'static str {
        self.read_as.unwrap_or(self.name)
    }
}

/// A UI element a binding can target.
pub trait Widget: AsAny {
    /// Class name, used in errors and by the UI loader.
    fn class_name(&self) -> &'static str;

    /// Every property this widget exposes.
    fn properties(&self) -> &[PropertyInfo];

    /// Current value of `name`.
    fn property(&self, name: &str) -> Option<Value>;

    /// Write through a setter method.
    fn call_setter(&self, name: &str, _value: Value) -> BindResult<()> {
        Err(BindError::UnsupportedTargetProperty {
            target: self.class_name(),
            property: name.to_owned(),
        })
    }

    /// Write a plain attribute.
    fn assign_attribute(&self, name: &str, _value: Value) -> BindResult<()> {
        Err(BindError::UnsupportedTargetProperty {
            target: self.class_name(),
            property: name.to_owned(),
        })
    }

    /// A named change signal, e.g. `"textChanged"`.
    fn signal(&self, name: &str) -> Option<&Event<()>>;

    /// Look up a declared property.
    fn find_property(&self, name: &str) -> Option<PropertyInfo> {
        self.properties().iter().find(|p| p.name == name).copied()
    }

    /// Write `name` using whatever access style it declares.
    fn write_property(&self, name: &str, value: Value) -> BindResult<()> {
        match self.find_property(name).map(|p| p.access) {
            Some(PropertyAccess::Setter) => self.call_setter(name, value),
            Some(PropertyAccess::Attribute) => self.assign_attribute(name, value),
            Some(PropertyAccess::ReadOnly) => Err(BindError::read_only(self.class_name(), name)),
            None => Err(BindError::UnsupportedTargetProperty {
                target: self.class_name(),
                property: name.to_owned(),
            }),
        }
    }
}

/// `"<property>Changed"`.
#[must_use]
pub fn change_signal_name(property: &str) -> String {
    format!("{property}Changed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_name_prefers_read_as() {
        let plain = PropertyInfo::setter("text");
        assert_eq!(plain.read_name(), "text");
        let rich = PropertyInfo::setter("text").reading("plainText");
        assert_eq!(rich.read_name(), "plainText");
        assert_eq!(rich.access, PropertyAccess::Setter);
    }

    #[test]
    fn signal_naming() {
        assert_eq!(change_signal_name("currentRow"), "currentRowChanged");
    }
}
