#![forbid(unsafe_code)]

//! Thread-safe change notification.
//!
//! A [`QueuedNotifier`] lives on the thread that owns the observable and
//! behaves exactly like an [`Event<PropertyChange>`] there. Other threads
//! reach it through a [`NotifyHandle`], which queues changes instead of
//! calling listeners. The host event loop calls [`QueuedNotifier::pump`] to
//! deliver queued changes on the owning thread, in posting order.
//!
//! Values holding an [`ObjectRef`](crate::ObjectRef) are not `Send`, so a
//! handle posts a builder closure; the [`Value`] is built on the owning thread
//! during `pump`.
//!
//! # Failure Modes
//!
//! - Posting after the notifier is dropped returns `false`; nothing panics.
//! - A listener error during `pump` is returned after the remaining queued
//!   changes are still delivered.

use std::fmt;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::trace;

use crate::error::BindResult;
use crate::notify::{ChangeNotifier, Event, Listener, ListenerId, PropertyChange};
use crate::value::Value;

type Posted = Box<dyn FnOnce() -> PropertyChange + Send>;

/// Change notifier whose emissions may originate on any thread.
pub struct QueuedNotifier {
    local: Event<PropertyChange>,
    tx: Sender<Posted>,
    rx: Receiver<Posted>,
}

impl Default for QueuedNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QueuedNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueuedNotifier")
            .field("listeners", &self.local.listener_count())
            .finish_non_exhaustive()
    }
}

impl QueuedNotifier {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            local: Event::new(),
            tx,
            rx,
        }
    }

    /// A cloneable, `Send` handle for posting changes from other threads.
    #[must_use]
    pub fn handle(&self) -> NotifyHandle {
        NotifyHandle {
            tx: self.tx.clone(),
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.local.listener_count()
    }

    /// Deliver every queued change, returning how many were delivered.
    pub fn pump(&self) -> BindResult<usize> {
        let mut delivered = 0;
        let mut first_err = None;
        while let Ok(build) = self.rx.try_recv() {
            let change = build();
            trace!(scope = ?change.scope, "delivering queued change");
            if let Err(err) = self.local.emit(&change)
                && first_err.is_none()
            {
                first_err = Some(err);
            }
            delivered += 1;
        }
        first_err.map_or(Ok(delivered), Err)
    }
}

impl ChangeNotifier for QueuedNotifier {
    fn connect_change(&self, listener: Rc<Listener<PropertyChange>>) -> ListenerId {
        self.local.connect_rc(listener)
    }

    fn disconnect_change(&self, id: ListenerId) -> bool {
        self.local.disconnect(id)
    }

    fn emit_change(&self, change: &PropertyChange) -> BindResult<()> {
        self.local.emit(change)
    }
}

/// Posting side of a [`QueuedNotifier`].
#[derive(Clone)]
pub struct NotifyHandle {
    tx: Sender<Posted>,
}

impl fmt::Debug for NotifyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyHandle").finish_non_exhaustive()
    }
}

impl NotifyHandle {
    /// Queue a change of one named property.
    pub fn post_property<V>(&self, name: impl Into<String>, value: V) -> bool
    where
        V: Into<Value> + Send + 'static,
    {
        let name = name.into();
        self.post_with(move || PropertyChange::property(name, value))
    }

    /// Queue the "all properties changed" sentinel.
    pub fn post_all(&self) -> bool {
        self.post_with(PropertyChange::all)
    }

    /// Queue a change built lazily on the owning thread.
    pub fn post_with(&self, build: impl FnOnce() -> PropertyChange + Send + 'static) -> bool {
        self.tx.send(Box::new(build)).is_ok()
    }
}
