#![forbid(unsafe_code)]

//! bindery: property bindings between observable models and widgets.
//!
//! This crate re-exports the workspace crates under one name:
//!
//! - [`core`]: values, change notification, the reentrancy guard, and the
//!   `Observable` / `Widget` / `ListModel` contracts.
//! - [`runtime`]: `Binding`, `View`, `ViewModel`, and `ObservableList`.
//! - [`widgets`] (feature `widgets`, on by default): headless reference
//!   widgets and the declarative UI loader.
//!
//! Most programs only need the [`prelude`].

pub use bindery_core as core;
pub use bindery_runtime as runtime;
#[cfg(feature = "widgets")]
pub use bindery_widgets as widgets;

pub use bindery_core::{BindError, BindResult, ObjectRef, Observable, Value, Widget};
pub use bindery_runtime::{BindFlags, Binding, View, ViewModel};

pub mod prelude {
    pub use bindery_core::{
        BindError, BindResult, ChangeNotifier, ChangeScope, Event, ListModel, NotifyHandle,
        ObjectRef, Observable, PropertyChange, QueuedNotifier, Role, Value, Widget,
    };
    pub use bindery_runtime::{
        BindFlags, Binding, ModelProperty, ModelWrapper, ObservableList, Shared, View, ViewModel,
        shared,
    };
    #[cfg(feature = "widgets")]
    pub use bindery_widgets::{
        CheckBox, Container, Form, Label, LineEdit, ListView, Panel, SpinBox, TextEdit,
        UiDescriptor, UiLoader, downcast,
    };
}
