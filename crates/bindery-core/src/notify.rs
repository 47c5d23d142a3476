#![forbid(unsafe_code)]

//! Change notification.
//!
//! [`Event<A>`] is the plain in-process listener list: listeners are
//! registered with [`Event::connect`], which hands back a [`ListenerId`], and
//! removed with [`Event::disconnect`] using that token. [`Event::emit`] calls
//! every live listener synchronously in registration order.
//!
//! Observables expose their property channel through the object-safe
//! [`ChangeNotifier`] trait so a binding can subscribe without knowing whether
//! the channel is a bare [`Event`] or a [`QueuedNotifier`](crate::QueuedNotifier).
//!
//! # Invariants
//!
//! 1. Listeners run in registration order.
//! 2. `emit` holds no internal borrow while a listener runs; listeners may
//!    connect, disconnect, or emit re-entrantly.
//! 3. A listener disconnected during an emission is not called later in that
//!    same emission. A listener connected during an emission first runs on
//!    the next one.
//! 4. Every live listener runs even when an earlier one fails.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Listener error | A binding rejects the change | First error returned from `emit`, rest still run |
//! | Unknown token | `disconnect` with a stale id | Returns `false`, no effect |

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::BindResult;
use crate::value::Value;

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque subscription token returned by `connect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw token value.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// A listener callback.
pub type Listener<A> = dyn Fn(&A) -> BindResult<()>;

// ---------------------------------------------------------------------------
// Event<A>
// ---------------------------------------------------------------------------

struct Slot<A> {
    id: ListenerId,
    callback: Rc<Listener<A>>,
}

/// Single-threaded listener list.
pub struct Event<A> {
    slots: RefCell<Vec<Slot<A>>>,
}

impl<A> Default for Event<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Event<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<A> Event<A> {
    /// Create an event with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: RefCell::new(Vec::new()),
        }
    }

    /// Register a listener.
    pub fn connect(&self, callback: impl Fn(&A) -> BindResult<()> + 'static) -> ListenerId {
        self.connect_rc(Rc::new(callback))
    }

    /// Register an already shared listener.
    pub fn connect_rc(&self, callback: Rc<Listener<A>>) -> ListenerId {
        let id = ListenerId::next();
        self.slots.borrow_mut().push(Slot { id, callback });
        id
    }

    /// Remove a listener. Returns `false` if the token was not registered.
    pub fn disconnect(&self, id: ListenerId) -> bool {
        let mut slots = self.slots.borrow_mut();
        let before = slots.len();
        slots.retain(|slot| slot.id != id);
        slots.len() != before
    }

    #[must_use]
    pub fn is_connected(&self, id: ListenerId) -> bool {
        self.slots.borrow().iter().any(|slot| slot.id == id)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Drop every listener.
    pub fn clear(&self) {
        self.slots.borrow_mut().clear();
    }

    /// Call every listener with `args`.
    ///
    /// Returns the first listener error after all listeners have run.
    pub fn emit(&self, args: &A) -> BindResult<()> {
        let snapshot: Vec<(ListenerId, Rc<Listener<A>>)> = self
            .slots
            .borrow()
            .iter()
            .map(|slot| (slot.id, Rc::clone(&slot.callback)))
            .collect();

        let mut first_err = None;
        for (id, callback) in snapshot {
            if !self.is_connected(id) {
                continue;
            }
            if let Err(err) = callback(args)
                && first_err.is_none()
            {
                first_err = Some(err);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

// ---------------------------------------------------------------------------
// Property changes
// ---------------------------------------------------------------------------

/// Which properties a change refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeScope {
    /// A single named property.
    Property(String),
    /// Every property; listeners re-read whatever they track.
    All,
}

/// Payload of a property-change notification.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    pub scope: ChangeScope,
    /// New value for `Property`, `Null` for `All`.
    pub value: Value,
}

impl PropertyChange {
    /// A change of one named property.
    pub fn property(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            scope: ChangeScope::Property(name.into()),
            value: value.into(),
        }
    }

    /// The "all properties changed" sentinel.
    #[must_use]
    pub fn all() -> Self {
        Self {
            scope: ChangeScope::All,
            value: Value::Null,
        }
    }

    /// The property name, or `None` for [`ChangeScope::All`].
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match &self.scope {
            ChangeScope::Property(name) => Some(name),
            ChangeScope::All => None,
        }
    }

    /// Whether a listener tracking `property` should react.
    #[must_use]
    pub fn affects(&self, property: &str) -> bool {
        self.name().is_none_or(|name| name == property)
    }
}

/// The change channel an observable exposes.
pub trait ChangeNotifier {
    /// Register a change listener.
    fn connect_change(&self, listener: Rc<Listener<PropertyChange>>) -> ListenerId;

    /// Remove a change listener by token.
    fn disconnect_change(&self, id: ListenerId) -> bool;

    /// Deliver `change` to every listener on the owning thread.
    fn emit_change(&self, change: &PropertyChange) -> BindResult<()>;

    /// Emit a change of one named property.
    fn notify_property(&self, name: &str, value: Value) -> BindResult<()> {
        self.emit_change(&PropertyChange::property(name, value))
    }

    /// Emit the "all properties changed" sentinel.
    fn notify_all(&self) -> BindResult<()> {
        self.emit_change(&PropertyChange::all())
    }
}

impl ChangeNotifier for Event<PropertyChange> {
    fn connect_change(&self, listener: Rc<Listener<PropertyChange>>) -> ListenerId {
        self.connect_rc(listener)
    }

    fn disconnect_change(&self, id: ListenerId) -> bool {
        self.disconnect(id)
    }

    fn emit_change(&self, change: &PropertyChange) -> BindResult<()> {
        self.emit(change)
    }
}
