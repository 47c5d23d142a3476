#![forbid(unsafe_code)]

//! Reference widgets for bindery.
//!
//! These are headless widgets: they hold state, declare their bindable
//! properties through [`Widget::properties`], and emit `<property>Changed`
//! signals when that state moves. They are enough to drive bindings from
//! tests, the demo, and the declarative [`loader`].
//!
//! | Widget | Bindable properties | Signals |
//! |--------|---------------------|---------|
//! | [`LineEdit`] | `text` (setter), `placeholder`, `readOnly` | `textChanged` |
//! | [`TextEdit`] | `text` (setter, read back as `plainText`) | `textChanged` |
//! | [`Label`] | `text` (setter) | none |
//! | [`CheckBox`] | `checked`, `text` | `checkedChanged` |
//! | [`SpinBox`] | `value` (setter), `minimum`, `maximum` | `valueChanged` |
//! | [`ListView`] | `model` (setter), `currentRow`, `count` (read-only) | `currentRowChanged` |
//! | [`Form`] | `context` (setter), `title` | `contextChanged` |
//! | [`Panel`] | `title` | none |

mod base;
pub mod check_box;
pub mod form;
pub mod label;
pub mod line_edit;
pub mod list_view;
pub mod loader;
pub mod panel;
pub mod spin_box;
pub mod text_edit;

use std::rc::Rc;

use bindery_core::Widget;

pub use check_box::CheckBox;
pub use form::Form;
pub use label::Label;
pub use line_edit::LineEdit;
pub use list_view::ListView;
pub use loader::{
    BindMode, BindingDescriptor, LiteralValue, LoadError, LoadedUi, LoaderOptions,
    SkippedBinding, UiDescriptor, UiLoader, WidgetDescriptor,
};
pub use panel::{Container, Panel};
pub use spin_box::SpinBox;
pub use text_edit::TextEdit;

/// Recover the concrete widget behind a trait object.
#[must_use]
pub fn downcast<T: Widget>(widget: &Rc<dyn Widget>) -> Option<Rc<T>> {
    Rc::clone(widget).into_any_rc().downcast::<T>().ok()
}
