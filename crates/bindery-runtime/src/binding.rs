#![forbid(unsafe_code)]

//! Property bindings between an [`Observable`] source and a [`Widget`] target.
//!
//! A [`Binding`] couples one source property to one target property. With
//! [`BindFlags::READ`] it pushes source changes into the widget; with
//! [`BindFlags::WRITE`] it writes widget edits back into the source. Either
//! end can be swapped at any time with [`Binding::set_source`] /
//! [`Binding::set_target`]; the binding object itself survives.
//!
//! # Usage
//!
//! ```ignore
//! let binding = Binding::builder("name", "text")
//!     .source(ObjectRef::new(person_vm.clone()))
//!     .target(line_edit.clone())
//!     .build()?;
//! assert_eq!(line_edit.text(), "Alice");
//! ```
//!
//! # State machine
//!
//! | State | Source | Target |
//! |-------|--------|--------|
//! | `Detached` | none | none |
//! | `SourceOnly` | set | none |
//! | `TargetOnly` | none | set |
//! | `Bound` | set | set |
//!
//! Every transition that ends in `Bound` runs exactly one synchronization
//! pass: READ pushes the source value to the target, otherwise WRITE pulls the
//! target value into the source.
//!
//! # Invariants
//!
//! 1. At most one propagation (source→target or target→source) is active per
//!    binding; the reentrancy guard is held for its full duration and
//!    notifications arriving meanwhile are ignored.
//! 2. With READ off, source notifications never write the target.
//! 3. The target's write access is resolved once, when the target is set.
//! 4. Setting the same source or target again is a no-op.
//! 5. Dropping the last handle unsubscribes from both ends.
//! 6. A `to_source` converter that normalizes an edit is not echoed back:
//!    the source's own notification arrives while the guard is held, so the
//!    target keeps the text as typed until the next source change or sync.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | Target has no setter or attribute for the property | `UnsupportedTargetProperty` on the first assignment |
//! | WRITE on a target lacking `<prop>Changed` | `MissingChangeSignal`; binding unchanged |
//! | Source lacks the property | `UnknownProperty` from the sync pass |
//! | End dropped while bound | Listener holds a `Weak`; notification becomes a no-op |

use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use bindery_core::{
    BindError, BindResult, ChangeScope, ListenerId, ObjectRef, PropertyAccess, PropertyChange,
    ReentrancyGuard, Value, Widget, change_signal_name,
};
use bitflags::bitflags;
use tracing::{debug, trace};

bitflags! {
    /// Propagation directions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BindFlags: u8 {
        /// Source → target.
        const READ = 1;
        /// Target → source.
        const WRITE = 2;
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
    }
}

impl Default for BindFlags {
    fn default() -> Self {
        Self::READ_WRITE
    }
}

/// Error parsing a [`BindFlags`] name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBindFlagsError(String);

impl fmt::Display for ParseBindFlagsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown bind mode `{}` (expected READ, WRITE or READ_WRITE)",
            self.0
        )
    }
}

impl std::error::Error for ParseBindFlagsError {}

impl FromStr for BindFlags {
    type Err = ParseBindFlagsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "READ" => Ok(Self::READ),
            "WRITE" => Ok(Self::WRITE),
            "READ_WRITE" | "READ|WRITE" => Ok(Self::READ_WRITE),
            other => Err(ParseBindFlagsError(other.to_owned())),
        }
    }
}

static BINDING_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(u64);

impl BindingId {
    fn new() -> Self {
        Self(BINDING_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Value converter applied in one direction.
pub type Converter = Rc<dyn Fn(Value) -> Value>;

/// Which ends are attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingState {
    Detached,
    SourceOnly,
    TargetOnly,
    Bound,
}

// ---------------------------------------------------------------------------
// Ends
// ---------------------------------------------------------------------------

struct SourceEnd {
    object: ObjectRef,
    listener: ListenerId,
}

/// How values reach the target, resolved once per target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteAccess {
    Setter,
    Attribute,
    Unsupported,
}

struct TargetEnd {
    widget: Rc<dyn Widget>,
    write: WriteAccess,
    read_name: Cow<'static, str>,
    listener: Option<ListenerId>,
}

struct BindingInner {
    id: BindingId,
    source_property: String,
    target_property: String,
    signal_name: String,
    flags: BindFlags,
    to_target: Option<Converter>,
    to_source: Option<Converter>,
    guard: ReentrancyGuard,
    source: RefCell<Option<SourceEnd>>,
    target: RefCell<Option<TargetEnd>>,
}

impl BindingInner {
    fn source_object(&self) -> Option<ObjectRef> {
        self.source.borrow().as_ref().map(|end| end.object.clone())
    }

    fn target_parts(&self) -> Option<(Rc<dyn Widget>, WriteAccess, Cow<'static, str>)> {
        self.target
            .borrow()
            .as_ref()
            .map(|end| (Rc::clone(&end.widget), end.write, end.read_name.clone()))
    }

    fn read_source(&self, source: &ObjectRef) -> BindResult<Value> {
        source
            .get()
            .property(&self.source_property)
            .ok_or_else(|| BindError::unknown(source.get().type_name(), &self.source_property))
    }

    fn sync(&self) -> BindResult<()> {
        let Some(source) = self.source_object() else {
            return Ok(());
        };
        if self.target.borrow().is_none() {
            return Ok(());
        }
        if self.flags.contains(BindFlags::READ) {
            let value = self.read_source(&source)?;
            self.push_to_target(value)
        } else if self.flags.contains(BindFlags::WRITE) {
            self.pull_from_target()
        } else {
            Ok(())
        }
    }

    fn push_to_target(&self, value: Value) -> BindResult<()> {
        let Some((widget, write, _)) = self.target_parts() else {
            return Ok(());
        };
        let value = match &self.to_target {
            Some(convert) => convert(value),
            None => value,
        };
        let _scope = self.guard.enter();
        trace!(
            binding = self.id.id(),
            target = widget.class_name(),
            property = %self.target_property,
            "source -> target"
        );
        match write {
            WriteAccess::Setter => widget.call_setter(&self.target_property, value),
            WriteAccess::Attribute => widget.assign_attribute(&self.target_property, value),
            WriteAccess::Unsupported => Err(BindError::UnsupportedTargetProperty {
                target: widget.class_name(),
                property: self.target_property.clone(),
            }),
        }
    }

    fn pull_from_target(&self) -> BindResult<()> {
        let (Some(source), Some((widget, _, read_name))) =
            (self.source_object(), self.target_parts())
        else {
            return Ok(());
        };
        let value = widget
            .property(&read_name)
            .ok_or_else(|| BindError::unknown(widget.class_name(), read_name.as_ref()))?;
        let value = match &self.to_source {
            Some(convert) => convert(value),
            None => value,
        };
        let _scope = self.guard.enter();
        trace!(
            binding = self.id.id(),
            source = source.get().type_name(),
            property = %self.source_property,
            "target -> source"
        );
        source.get().set_property(&self.source_property, value)
    }

    fn on_source_changed(&self, change: &PropertyChange) -> BindResult<()> {
        if !self.flags.contains(BindFlags::READ)
            || self.guard.is_held()
            || !change.affects(&self.source_property)
        {
            return Ok(());
        }
        let value = match change.scope {
            ChangeScope::All => match self.source_object() {
                Some(source) => self.read_source(&source)?,
                None => return Ok(()),
            },
            ChangeScope::Property(_) => change.value.clone(),
        };
        self.push_to_target(value)
    }

    fn on_target_changed(&self) -> BindResult<()> {
        if self.guard.is_held() {
            return Ok(());
        }
        self.pull_from_target()
    }

    fn detach_source(&self) -> Option<ObjectRef> {
        let old = self.source.borrow_mut().take()?;
        old.object.get().notifier().disconnect_change(old.listener);
        Some(old.object)
    }

    fn detach_target(&self) -> Option<Rc<dyn Widget>> {
        let old = self.target.borrow_mut().take()?;
        if let Some(listener) = old.listener
            && let Some(signal) = old.widget.signal(&self.signal_name)
        {
            signal.disconnect(listener);
        }
        Some(old.widget)
    }
}

impl Drop for BindingInner {
    fn drop(&mut self) {
        self.detach_source();
        self.detach_target();
    }
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

/// One source property bound to one target property.
///
/// Not `Clone`: a binding is owned by exactly one host, and dropping it tears
/// down both subscriptions.
pub struct Binding {
    inner: Rc<BindingInner>,
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("id", &self.inner.id)
            .field("source_property", &self.inner.source_property)
            .field("target_property", &self.inner.target_property)
            .field("flags", &self.inner.flags)
            .field("state", &self.state())
            .finish()
    }
}

impl Binding {
    /// Create a detached binding.
    pub fn new(
        source_property: impl Into<String>,
        target_property: impl Into<String>,
        flags: BindFlags,
    ) -> Self {
        Self::from_parts(source_property.into(), target_property.into(), flags, None, None)
    }

    /// Start a [`BindingBuilder`].
    pub fn builder(
        source_property: impl Into<String>,
        target_property: impl Into<String>,
    ) -> BindingBuilder {
        BindingBuilder {
            source_property: source_property.into(),
            target_property: target_property.into(),
            flags: BindFlags::default(),
            to_target: None,
            to_source: None,
            source: None,
            target: None,
        }
    }

    fn from_parts(
        source_property: String,
        target_property: String,
        flags: BindFlags,
        to_target: Option<Converter>,
        to_source: Option<Converter>,
    ) -> Self {
        let signal_name = change_signal_name(&target_property);
        Self {
            inner: Rc::new(BindingInner {
                id: BindingId::new(),
                source_property,
                target_property,
                signal_name,
                flags,
                to_target,
                to_source,
                guard: ReentrancyGuard::new(),
                source: RefCell::new(None),
                target: RefCell::new(None),
            }),
        }
    }

    /// Another handle to the same binding, for iterating outside a borrow.
    pub(crate) fn share(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }

    #[must_use]
    pub fn id(&self) -> BindingId {
        self.inner.id
    }

    #[must_use]
    pub fn flags(&self) -> BindFlags {
        self.inner.flags
    }

    #[must_use]
    pub fn source_property(&self) -> &str {
        &self.inner.source_property
    }

    #[must_use]
    pub fn target_property(&self) -> &str {
        &self.inner.target_property
    }

    #[must_use]
    pub fn source(&self) -> Option<ObjectRef> {
        self.inner.source_object()
    }

    #[must_use]
    pub fn target(&self) -> Option<Rc<dyn Widget>> {
        self.inner
            .target
            .borrow()
            .as_ref()
            .map(|end| Rc::clone(&end.widget))
    }

    /// How the current target property is written, if a target is set.
    #[must_use]
    pub fn target_access(&self) -> Option<PropertyAccess> {
        self.inner.target.borrow().as_ref().map(|end| match end.write {
            WriteAccess::Setter => PropertyAccess::Setter,
            WriteAccess::Attribute => PropertyAccess::Attribute,
            WriteAccess::Unsupported => PropertyAccess::ReadOnly,
        })
    }

    #[must_use]
    pub fn state(&self) -> BindingState {
        let has_source = self.inner.source.borrow().is_some();
        let has_target = self.inner.target.borrow().is_some();
        match (has_source, has_target) {
            (false, false) => BindingState::Detached,
            (true, false) => BindingState::SourceOnly,
            (false, true) => BindingState::TargetOnly,
            (true, true) => BindingState::Bound,
        }
    }

    /// Whether a propagation is currently in progress.
    #[must_use]
    pub fn is_propagating(&self) -> bool {
        self.inner.guard.is_held()
    }

    /// Replace the source, then synchronize.
    ///
    /// A no-op when `source` is the current source (by identity).
    pub fn set_source(&self, source: Option<ObjectRef>) -> BindResult<()> {
        let unchanged = match (self.inner.source.borrow().as_ref(), source.as_ref()) {
            (None, None) => true,
            (Some(current), Some(new)) => current.object.ptr_eq(new),
            _ => false,
        };
        if unchanged {
            return Ok(());
        }

        self.inner.detach_source();
        if let Some(object) = source {
            let weak: Weak<BindingInner> = Rc::downgrade(&self.inner);
            let listener = object
                .get()
                .notifier()
                .connect_change(Rc::new(move |change: &PropertyChange| {
                    match weak.upgrade() {
                        Some(inner) => inner.on_source_changed(change),
                        None => Ok(()),
                    }
                }));
            debug!(
                binding = self.inner.id.id(),
                source = object.get().type_name(),
                property = %self.inner.source_property,
                "source attached"
            );
            *self.inner.source.borrow_mut() = Some(SourceEnd { object, listener });
        } else {
            debug!(binding = self.inner.id.id(), "source detached");
        }
        self.inner.sync()
    }

    /// Replace the target, then synchronize.
    ///
    /// With WRITE enabled the target must expose `"<prop>Changed"`; otherwise
    /// this fails with [`BindError::MissingChangeSignal`] and nothing changes.
    pub fn set_target(&self, target: Option<Rc<dyn Widget>>) -> BindResult<()> {
        let unchanged = match (self.inner.target.borrow().as_ref(), target.as_ref()) {
            (None, None) => true,
            (Some(current), Some(new)) => {
                std::ptr::addr_eq(Rc::as_ptr(&current.widget), Rc::as_ptr(new))
            }
            _ => false,
        };
        if unchanged {
            return Ok(());
        }

        let writes_back = self.inner.flags.contains(BindFlags::WRITE);
        if writes_back
            && let Some(widget) = &target
            && widget.signal(&self.inner.signal_name).is_none()
        {
            return Err(BindError::MissingChangeSignal {
                target: widget.class_name(),
                signal: self.inner.signal_name.clone(),
            });
        }

        self.inner.detach_target();
        if let Some(widget) = target {
            let info = widget.find_property(&self.inner.target_property);
            let write = match info.map(|p| p.access) {
                Some(PropertyAccess::Setter) => WriteAccess::Setter,
                Some(PropertyAccess::Attribute) => WriteAccess::Attribute,
                Some(PropertyAccess::ReadOnly) | None => WriteAccess::Unsupported,
            };
            let read_name = info.map_or_else(
                || Cow::Owned(self.inner.target_property.clone()),
                |p| Cow::Borrowed(p.read_name()),
            );

            let listener = if writes_back {
                let weak: Weak<BindingInner> = Rc::downgrade(&self.inner);
                widget.signal(&self.inner.signal_name).map(|signal| {
                    signal.connect(move |_| match weak.upgrade() {
                        Some(inner) => inner.on_target_changed(),
                        None => Ok(()),
                    })
                })
            } else {
                None
            };
            debug!(
                binding = self.inner.id.id(),
                target = widget.class_name(),
                property = %self.inner.target_property,
                access = ?write,
                "target attached"
            );
            *self.inner.target.borrow_mut() = Some(TargetEnd {
                widget,
                write,
                read_name,
                listener,
            });
        } else {
            debug!(binding = self.inner.id.id(), "target detached");
        }
        self.inner.sync()
    }

    /// Detach both ends. Idempotent.
    pub fn unbind(&self) {
        let had_source = self.inner.detach_source().is_some();
        let had_target = self.inner.detach_target().is_some();
        if had_source || had_target {
            debug!(binding = self.inner.id.id(), "unbound");
        }
    }
}

// ---------------------------------------------------------------------------
// BindingBuilder
// ---------------------------------------------------------------------------

/// Builder for a [`Binding`] with converters and initial ends.
#[must_use]
pub struct BindingBuilder {
    source_property: String,
    target_property: String,
    flags: BindFlags,
    to_target: Option<Converter>,
    to_source: Option<Converter>,
    source: Option<ObjectRef>,
    target: Option<Rc<dyn Widget>>,
}

impl BindingBuilder {
    pub fn flags(mut self, flags: BindFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Converter applied to values flowing source → target.
    pub fn to_target(mut self, convert: impl Fn(Value) -> Value + 'static) -> Self {
        self.to_target = Some(Rc::new(convert));
        self
    }

    /// Converter applied to values flowing target → source.
    pub fn to_source(mut self, convert: impl Fn(Value) -> Value + 'static) -> Self {
        self.to_source = Some(Rc::new(convert));
        self
    }

    /// Both converters at once, as shared handles.
    pub fn converters(
        mut self,
        to_target: Option<Converter>,
        to_source: Option<Converter>,
    ) -> Self {
        self.to_target = to_target;
        self.to_source = to_source;
        self
    }

    pub fn source(mut self, source: ObjectRef) -> Self {
        self.source = Some(source);
        self
    }

    pub fn target(mut self, target: Rc<dyn Widget>) -> Self {
        self.target = Some(target);
        self
    }

    /// Build the binding, attaching the target first and then the source.
    pub fn build(self) -> BindResult<Binding> {
        let binding = Binding::from_parts(
            self.source_property,
            self.target_property,
            self.flags,
            self.to_target,
            self.to_source,
        );
        binding.set_target(self.target)?;
        binding.set_source(self.source)?;
        Ok(binding)
    }
}
