#![forbid(unsafe_code)]

//! Error type shared by every layer of the binding engine.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Surfaces at |
//! |---------|-------|-------------|
//! | `UnsupportedTargetProperty` | Target has neither setter nor attribute access | First value assignment |
//! | `MissingChangeSignal` | WRITE binding on a target without `<prop>Changed` | `set_target` |
//! | `UnknownProperty` | Observable/widget does not know the name | Read or write |
//! | `ReadOnlyProperty` | Property has no write accessor | Write |
//! | `TypeMismatch` | Value variant not accepted by the property | Write |
//! | `BackingMismatch` | List items and backing sequence out of lockstep | List construction |

use thiserror::Error;

/// Errors raised by bindings, observables, and widgets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    /// The target exposes neither a setter nor an attribute for the property.
    #[error("don't know how to assign `{property}` on {target}")]
    UnsupportedTargetProperty {
        /// Class name of the target widget.
        target: &'static str,
        /// The bound target property.
        property: String,
    },

    /// A WRITE binding needs a `<property>Changed` signal on the target.
    #[error("{target} has no `{signal}` signal")]
    MissingChangeSignal {
        /// Class name of the target widget.
        target: &'static str,
        /// The signal that was looked up.
        signal: String,
    },

    /// The object has no property with this name.
    #[error("{object} has no property `{property}`")]
    UnknownProperty {
        /// Type or class name of the object.
        object: &'static str,
        /// The requested property.
        property: String,
    },

    /// The property exists but cannot be written.
    #[error("property `{property}` on {object} is read-only")]
    ReadOnlyProperty {
        /// Type or class name of the object.
        object: &'static str,
        /// The property that was written.
        property: String,
    },

    /// The value variant is not accepted by the property.
    #[error("`{property}` expects {expected}, got {found}")]
    TypeMismatch {
        /// The property that was written.
        property: String,
        /// Accepted variant name.
        expected: &'static str,
        /// Supplied variant name.
        found: &'static str,
    },

    /// Items and backing sequence do not correspond at `index`.
    #[error("list item {index} does not wrap backing entry {index}")]
    BackingMismatch {
        /// First index where the sequences disagree.
        index: usize,
    },
}

impl BindError {
    /// Shorthand for [`BindError::UnknownProperty`].
    pub fn unknown(object: &'static str, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            object,
            property: property.into(),
        }
    }

    /// Shorthand for [`BindError::ReadOnlyProperty`].
    pub fn read_only(object: &'static str, property: impl Into<String>) -> Self {
        Self::ReadOnlyProperty {
            object,
            property: property.into(),
        }
    }

    /// Whether this error is a programmer configuration error (as opposed to a
    /// value-level rejection).
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedTargetProperty { .. }
                | Self::MissingChangeSignal { .. }
                | Self::UnknownProperty { .. }
                | Self::BackingMismatch { .. }
        )
    }
}

/// Result alias used throughout bindery.
pub type BindResult<T> = Result<T, BindError>;
