#![forbid(unsafe_code)]

//! Binding host.
//!
//! A [`View`] holds one context value and the bindings declared against it.
//! Swapping the context re-points every binding's source instead of
//! recreating bindings, so the widget-side subscriptions stay in place.
//!
//! # Invariants
//!
//! 1. `set_context` with a value equal to the current one does nothing.
//!    Equality is [`Value`] equality: identity for objects, value for scalars.
//! 2. Binding identity survives context swaps.
//! 3. The post-change hook runs after every binding has been re-pointed.
//! 4. Dropping the view drops its bindings, which unsubscribe both ends.
//!
//! # Failure Modes
//!
//! - A binding that fails to re-point does not stop the others; the first
//!   error is returned after the hook has run.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bindery_core::{BindResult, ObjectRef, Value, Widget};
use tracing::{debug, debug_span};

use crate::binding::{BindFlags, Binding, BindingId, Converter};

/// Hook invoked as `(old, new)` after a context swap.
pub type ContextHook = dyn Fn(&Value, &Value);

/// A UI-side object owning a context and bindings against it.
#[derive(Default)]
pub struct View {
    context: RefCell<Value>,
    bindings: RefCell<Vec<Binding>>,
    hook: RefCell<Option<Rc<ContextHook>>>,
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("context", &*self.context.borrow())
            .field("bindings", &self.bindings.borrow().len())
            .finish()
    }
}

fn source_of(context: &Value) -> Option<ObjectRef> {
    context.as_object().cloned()
}

impl View {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current context.
    #[must_use]
    pub fn context(&self) -> Value {
        self.context.borrow().clone()
    }

    /// Install the post-change hook, replacing any previous one.
    pub fn set_context_hook(&self, hook: impl Fn(&Value, &Value) + 'static) {
        *self.hook.borrow_mut() = Some(Rc::new(hook));
    }

    /// Swap the context and re-point every binding at it.
    ///
    /// Only object contexts are observable; any other value leaves bindings
    /// without a source.
    pub fn set_context(&self, context: impl Into<Value>) -> BindResult<()> {
        let new = context.into();
        if *self.context.borrow() == new {
            return Ok(());
        }
        let old = self.context.replace(new.clone());
        let _span = debug_span!("view.set_context", bindings = self.binding_count()).entered();
        debug!(old = %old, new = %new, "context changed");

        let source = source_of(&new);
        let bindings: Vec<Binding> = self.bindings.borrow().iter().map(Binding::share).collect();
        let mut first_err = None;
        for binding in &bindings {
            if let Err(err) = binding.set_source(source.clone()) {
                debug!(binding = binding.id().id(), error = %err, "rebind failed");
                first_err.get_or_insert(err);
            }
        }

        let hook = self.hook.borrow().clone();
        if let Some(hook) = hook {
            hook(&old, &new);
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Bind context `property` to `widget_property` on `widget`.
    ///
    /// The binding is sourced from the current context and follows every
    /// later context swap.
    pub fn bind(
        &self,
        property: impl Into<String>,
        widget: Rc<dyn Widget>,
        widget_property: impl Into<String>,
        flags: BindFlags,
    ) -> BindResult<BindingId> {
        self.bind_with(property, widget, widget_property, flags, None, None)
    }

    /// [`View::bind`] with value converters.
    pub fn bind_with(
        &self,
        property: impl Into<String>,
        widget: Rc<dyn Widget>,
        widget_property: impl Into<String>,
        flags: BindFlags,
        to_target: Option<Converter>,
        to_source: Option<Converter>,
    ) -> BindResult<BindingId> {
        let mut builder = Binding::builder(property, widget_property)
            .flags(flags)
            .converters(to_target, to_source)
            .target(widget);
        let source = source_of(&self.context.borrow());
        if let Some(source) = source {
            builder = builder.source(source);
        }
        let binding = builder.build()?;
        let id = binding.id();
        debug!(
            binding = id.id(),
            property = binding.source_property(),
            widget_property = binding.target_property(),
            "bound"
        );
        self.bindings.borrow_mut().push(binding);
        Ok(id)
    }

    /// Drop one binding. Returns `false` if the id is not owned by this view.
    pub fn unbind(&self, id: BindingId) -> bool {
        let removed = {
            let mut bindings = self.bindings.borrow_mut();
            bindings
                .iter()
                .position(|b| b.id() == id)
                .map(|index| bindings.remove(index))
        };
        removed.is_some()
    }

    /// Drop every binding.
    pub fn clear_bindings(&self) {
        let bindings = std::mem::take(&mut *self.bindings.borrow_mut());
        drop(bindings);
    }

    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.borrow().len()
    }

    #[must_use]
    pub fn binding_ids(&self) -> Vec<BindingId> {
        self.bindings.borrow().iter().map(Binding::id).collect()
    }

    /// A shared handle to one of this view's bindings.
    #[must_use]
    pub fn binding(&self, id: BindingId) -> Option<Binding> {
        self.bindings
            .borrow()
            .iter()
            .find(|b| b.id() == id)
            .map(Binding::share)
    }
}
