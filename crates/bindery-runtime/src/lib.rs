#![forbid(unsafe_code)]

//! Binding runtime for bindery.
//!
//! - [`Binding`]: couples one observable property to one widget property,
//!   in either or both directions, with loop prevention.
//! - [`View`]: owns a context and the bindings declared against it.
//! - [`ViewModel`]: observable wrapper over a plain shared model.
//! - [`ObservableList`]: observable container of view-model items, usable as
//!   a [`ListModel`](bindery_core::ListModel).
//!
//! # Architecture
//!
//! Everything is single-threaded and synchronous. Listeners registered on
//! either end of a binding capture a `Weak` to the binding, so ends never
//! keep a binding alive; the binding unsubscribes from both ends when it is
//! dropped.
//!
//! # Invariants
//!
//! 1. A change that a binding applies is never written back by the same
//!    binding.
//! 2. Context swaps re-point existing bindings; they never create new ones.
//! 3. Lists keep items and backing models in lockstep.

pub mod binding;
pub mod list;
pub mod view;
pub mod viewmodel;

pub use binding::{
    BindFlags, Binding, BindingBuilder, BindingId, BindingState, Converter, ParseBindFlagsError,
};
pub use list::{Delegate, ItemChange, ObservableList};
pub use view::{ContextHook, View};
pub use viewmodel::{ModelProperty, ModelWrapper, Shared, ViewModel, shared};
