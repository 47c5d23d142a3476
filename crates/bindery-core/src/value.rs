#![forbid(unsafe_code)]

//! Dynamically typed property values.
//!
//! Properties travel between observables and widgets as [`Value`]s. Scalars
//! compare by value; [`Value::Object`] compares by the identity of the
//! referenced observable, which is what a binding or view needs when deciding
//! whether its source actually changed.

use std::fmt;
use std::rc::Rc;

use crate::list_model::ListModel;
use crate::observable::Observable;

/// Shared handle to an observable object, compared by identity.
#[derive(Clone)]
pub struct ObjectRef(Rc<dyn Observable>);

impl ObjectRef {
    /// Wrap a concrete observable.
    pub fn new<T: Observable>(object: Rc<T>) -> Self {
        Self(object)
    }

    /// Wrap an already type-erased observable.
    #[must_use]
    pub fn from_dyn(object: Rc<dyn Observable>) -> Self {
        Self(object)
    }

    /// Borrow the observable.
    #[must_use]
    pub fn get(&self) -> &dyn Observable {
        &*self.0
    }

    /// Clone the inner `Rc`.
    #[must_use]
    pub fn to_rc(&self) -> Rc<dyn Observable> {
        Rc::clone(&self.0)
    }

    /// Whether both handles point at the same object.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }

    /// Recover the concrete type.
    #[must_use]
    pub fn downcast<T: Observable>(&self) -> Option<Rc<T>> {
        Rc::clone(&self.0).into_any_rc().downcast::<T>().ok()
    }

    /// View the object as a list model, if it is one.
    #[must_use]
    pub fn as_list_model(&self) -> Option<Rc<dyn ListModel>> {
        Rc::clone(&self.0).as_list_model()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:p}", self.0.type_name(), Rc::as_ptr(&self.0))
    }
}

impl<T: Observable> From<Rc<T>> for ObjectRef {
    fn from(object: Rc<T>) -> Self {
        Self::new(object)
    }
}

/// A property value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Absent value; also the "no context" marker for views.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating point.
    Float(f64),
    /// Text.
    Text(String),
    /// An observable object (view-model, list, ...).
    Object(ObjectRef),
}

impl Value {
    /// Short name of the variant, used in type-mismatch errors.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Object(_) => "object",
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Floats, and integers widened to floats.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Consume into text, treating `Null` as the empty string.
    ///
    /// Returns the original value back when it is neither text nor null.
    pub fn into_text(self) -> Result<String, Self> {
        match self {
            Self::Text(s) => Ok(s),
            Self::Null => Ok(String::new()),
            other => Err(other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Object(o) => write!(f, "{o:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        Self::Int(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Self::Object(o)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BindError;
    use crate::notify::{ChangeNotifier, Event, PropertyChange};

    struct Dummy {
        changed: Event<PropertyChange>,
    }

    impl Observable for Dummy {
        fn property(&self, _name: &str) -> Option<Value> {
            None
        }

        fn set_property(&self, name: &str, _value: Value) -> Result<(), BindError> {
            Err(BindError::unknown(self.type_name(), name))
        }

        fn notifier(&self) -> &dyn ChangeNotifier {
            &self.changed
        }
    }

    fn dummy() -> Rc<Dummy> {
        Rc::new(Dummy {
            changed: Event::new(),
        })
    }

    #[test]
    fn scalars_compare_by_value() {
        assert_eq!(Value::from("a"), Value::Text("a".into()));
        assert_eq!(Value::from(3_i32), Value::Int(3));
        assert_ne!(Value::from(3_i32), Value::Float(3.0));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn objects_compare_by_identity() {
        let a = dummy();
        let b = dummy();
        let ra = Value::from(ObjectRef::new(Rc::clone(&a)));
        let ra2 = Value::from(ObjectRef::new(a));
        let rb = Value::from(ObjectRef::new(b));
        assert_eq!(ra, ra2);
        assert_ne!(ra, rb);
    }

    #[test]
    fn downcast_recovers_concrete_type() {
        let a = dummy();
        let obj = ObjectRef::new(Rc::clone(&a));
        let back = obj.downcast::<Dummy>().expect("same type");
        assert!(Rc::ptr_eq(&a, &back));
        assert!(obj.as_list_model().is_none());
    }

    #[test]
    fn into_text_treats_null_as_empty() {
        assert_eq!(Value::Null.into_text(), Ok(String::new()));
        assert_eq!(Value::from("x").into_text(), Ok("x".to_string()));
        assert_eq!(Value::Int(1).into_text(), Err(Value::Int(1)));
    }

    #[test]
    fn display_is_plain() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from(42_i64).to_string(), "42");
        assert_eq!(Value::from("hi").to_string(), "hi");
    }
}
