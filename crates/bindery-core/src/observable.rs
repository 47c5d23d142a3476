#![forbid(unsafe_code)]

//! The observable-object contract.
//!
//! Anything used as a binding source (a view-model, a list, a hand-written
//! model) implements [`Observable`]: named property get/set plus a change
//! channel. Implementations emit a [`PropertyChange`](crate::PropertyChange)
//! after every successful write that changed a value.

use std::any::Any;
use std::rc::Rc;

use crate::error::BindResult;
use crate::list_model::ListModel;
use crate::notify::ChangeNotifier;
use crate::value::Value;

/// Conversion of a shared trait object back to `Rc<dyn Any>` for downcasting.
pub trait AsAny: Any {
    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn into_any_rc(self: Rc<Self>) -> Rc<dyn Any> {
        self
    }
}

/// An object exposing named properties and a change-notification channel.
pub trait Observable: AsAny {
    /// Name used in logs and errors.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Current value of `name`, or `None` if the property is unknown.
    fn property(&self, name: &str) -> Option<Value>;

    /// Write `name`. Emits a change when the stored value actually changes.
    fn set_property(&self, name: &str, value: Value) -> BindResult<()>;

    /// The object's change channel.
    fn notifier(&self) -> &dyn ChangeNotifier;

    /// This object as a list model, for list-consuming widgets.
    fn as_list_model(self: Rc<Self>) -> Option<Rc<dyn ListModel>> {
        None
    }
}
