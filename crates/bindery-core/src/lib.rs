#![forbid(unsafe_code)]

//! Core contracts for bindery.
//!
//! This crate holds everything a binding needs to talk to both of its ends:
//!
//! - [`Value`] / [`ObjectRef`]: the dynamically typed property payload.
//! - [`Event`], [`ChangeNotifier`], [`QueuedNotifier`]: change notification,
//!   single-threaded or fed from other threads.
//! - [`ReentrancyGuard`]: scoped "propagation in progress" marker.
//! - [`Observable`]: the source-side contract.
//! - [`Widget`]: the target-side contract.
//! - [`ListModel`]: what list widgets consume.
//! - [`BindError`]: the shared error type.
//!
//! # Threading
//!
//! Everything here is single-threaded (`Rc`, `Cell`, `RefCell`) and driven by
//! a host event loop. The only cross-thread entry point is
//! [`NotifyHandle`], which queues changes for the owning thread.

pub mod error;
pub mod guard;
pub mod list_model;
pub mod notify;
pub mod observable;
pub mod queued;
pub mod value;
pub mod widget;

pub use error::{BindError, BindResult};
pub use guard::{GuardScope, ReentrancyGuard};
pub use list_model::{ListModel, Role, RowsChange, RowsKind, RowsPhase};
pub use notify::{ChangeNotifier, ChangeScope, Event, Listener, ListenerId, PropertyChange};
pub use observable::{AsAny, Observable};
pub use queued::{NotifyHandle, QueuedNotifier};
pub use value::{ObjectRef, Value};
pub use widget::{PropertyAccess, PropertyInfo, Widget, change_signal_name};
