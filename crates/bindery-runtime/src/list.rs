#![forbid(unsafe_code)]

//! Observable container of view-model items.
//!
//! An [`ObservableList<V>`] keeps an ordered sequence of observable items and
//! a parallel backing sequence of the plain models they wrap. It forwards
//! structural changes and per-item property changes to list consumers that
//! only know the [`ListModel`] contract.
//!
//! # Invariants
//!
//! 1. `items[i].model()` and `backing[i]` are the same allocation for every
//!    valid `i`, and both sequences have the same length.
//! 2. Every `append`/`remove` emits a `Begin` notification before the
//!    mutation is visible through read access and an `End` notification
//!    after.
//! 3. Each item holds exactly one subscription, tracked by a token kept
//!    parallel to the items.
//!
//! # Failure Modes
//!
//! | Case | Behavior |
//! |------|----------|
//! | `remove` of an absent item | `Ok(false)`, nothing emitted |
//! | Item removed by an earlier listener while its change is in flight | Dropped silently, `Ok` |
//! | Change delivered to a subscription that outlived its disconnection | Logged at `warn`, dropped |
//! | `from_items` with mismatched sequences | `BindError::BackingMismatch` |

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use bindery_core::{
    BindError, BindResult, ChangeNotifier, Event, ListModel, ListenerId, Observable,
    PropertyChange, Role, RowsChange, RowsKind, Value,
};
use tracing::{trace, warn};

use crate::viewmodel::{ModelWrapper, Shared};

/// Renders one item for a role; `None` means no opinion.
pub type Delegate<V> = dyn Fn(&V, Role) -> Option<Value>;

/// An item's property change, re-emitted by its container.
pub struct ItemChange<V> {
    pub item: Rc<V>,
    /// Row of the item when the change was delivered.
    pub row: usize,
    pub change: PropertyChange,
}

impl<V> fmt::Debug for ItemChange<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemChange")
            .field("row", &self.row)
            .field("change", &self.change)
            .finish_non_exhaustive()
    }
}

/// Observable ordered collection of `V` items over a backing `Vec`.
pub struct ObservableList<V: ModelWrapper> {
    this: Weak<Self>,
    items: RefCell<Vec<Rc<V>>>,
    tokens: RefCell<Vec<ListenerId>>,
    backing: Shared<Vec<Shared<V::Model>>>,
    delegate: RefCell<Option<Rc<Delegate<V>>>>,
    rows_changed: Event<RowsChange>,
    data_changed: Event<usize>,
    item_changed: Event<ItemChange<V>>,
    changed: Event<PropertyChange>,
}

impl<V: ModelWrapper> fmt::Debug for ObservableList<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableList")
            .field("len", &self.len())
            .field("delegate", &self.delegate.borrow().is_some())
            .finish_non_exhaustive()
    }
}

impl<V: ModelWrapper> ObservableList<V> {
    /// An empty list with a fresh backing sequence.
    #[must_use]
    pub fn new() -> Rc<Self> {
        Self::build(Rc::new(RefCell::new(Vec::new())), Vec::new())
    }

    /// Wrap every entry of an existing backing sequence.
    pub fn with_backing(
        backing: Shared<Vec<Shared<V::Model>>>,
        wrap: impl Fn(Shared<V::Model>) -> Rc<V>,
    ) -> Rc<Self> {
        let items: Vec<Rc<V>> = backing.borrow().iter().cloned().map(wrap).collect();
        Self::build(backing, items)
    }

    /// Adopt items that already wrap `backing`, checking lockstep.
    pub fn from_items(
        backing: Shared<Vec<Shared<V::Model>>>,
        items: Vec<Rc<V>>,
    ) -> BindResult<Rc<Self>> {
        {
            let entries = backing.borrow();
            if let Some(index) = (0..entries.len().max(items.len())).find(|&i| {
                match (items.get(i), entries.get(i)) {
                    (Some(item), Some(entry)) => !Rc::ptr_eq(&item.model(), entry),
                    _ => true,
                }
            }) {
                return Err(BindError::BackingMismatch { index });
            }
        }
        Ok(Self::build(backing, items))
    }

    fn build(backing: Shared<Vec<Shared<V::Model>>>, items: Vec<Rc<V>>) -> Rc<Self> {
        let list = Rc::new_cyclic(|this| Self {
            this: this.clone(),
            items: RefCell::new(Vec::with_capacity(items.len())),
            tokens: RefCell::new(Vec::with_capacity(items.len())),
            backing,
            delegate: RefCell::new(None),
            rows_changed: Event::new(),
            data_changed: Event::new(),
            item_changed: Event::new(),
            changed: Event::new(),
        });
        for item in items {
            let token = list.subscribe(&item);
            list.items.borrow_mut().push(item);
            list.tokens.borrow_mut().push(token);
        }
        list
    }

    fn subscribe(&self, item: &Rc<V>) -> ListenerId {
        let list = self.this.clone();
        let weak_item = Rc::downgrade(item);
        item.notifier()
            .connect_change(Rc::new(move |change: &PropertyChange| {
                match (list.upgrade(), weak_item.upgrade()) {
                    (Some(list), Some(item)) => list.on_item_changed(item, change),
                    _ => Ok(()),
                }
            }))
    }

    fn on_item_changed(&self, item: Rc<V>, change: &PropertyChange) -> BindResult<()> {
        let Some(row) = self.index_of(&item) else {
            warn!(scope = ?change.scope, "change from an item no longer in the list dropped");
            return Ok(());
        };
        trace!(row, scope = ?change.scope, "item changed");
        let cell = self.data_changed.emit(&row);
        let semantic = self.item_changed.emit(&ItemChange {
            item,
            row,
            change: change.clone(),
        });
        cell.and(semantic)
    }

    /// Append `item`, whose model is appended to the backing sequence.
    pub fn append(&self, item: Rc<V>) -> BindResult<()> {
        let row = self.len();
        let begin = self
            .rows_changed
            .emit(&RowsChange::begin(RowsKind::Insert, row, row));
        let token = self.subscribe(&item);
        self.backing.borrow_mut().push(item.model());
        self.items.borrow_mut().push(item);
        self.tokens.borrow_mut().push(token);
        let end = self
            .rows_changed
            .emit(&RowsChange::end(RowsKind::Insert, row, row));
        trace!(row, "item appended");
        begin.and(end).and(self.emit_count())
    }

    /// Remove `item`. Returns `Ok(false)` when it is not in the list.
    pub fn remove(&self, item: &Rc<V>) -> BindResult<bool> {
        let Some(row) = self.index_of(item) else {
            return Ok(false);
        };
        let begin = self
            .rows_changed
            .emit(&RowsChange::begin(RowsKind::Remove, row, row));
        let removed = self.items.borrow_mut().remove(row);
        self.backing.borrow_mut().remove(row);
        let token = self.tokens.borrow_mut().remove(row);
        removed.notifier().disconnect_change(token);
        let end = self
            .rows_changed
            .emit(&RowsChange::end(RowsKind::Remove, row, row));
        trace!(row, "item removed");
        begin.and(end).and(self.emit_count()).map(|()| true)
    }

    fn emit_count(&self) -> BindResult<()> {
        self.changed
            .emit(&PropertyChange::property("count", self.len()))
    }

    #[must_use]
    pub fn get(&self, row: usize) -> Option<Rc<V>> {
        self.items.borrow().get(row).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Row of `item`, compared by identity.
    #[must_use]
    pub fn index_of(&self, item: &Rc<V>) -> Option<usize> {
        self.items.borrow().iter().position(|i| Rc::ptr_eq(i, item))
    }

    /// Snapshot of the items.
    #[must_use]
    pub fn items(&self) -> Vec<Rc<V>> {
        self.items.borrow().clone()
    }

    /// The backing sequence.
    #[must_use]
    pub fn backing(&self) -> Shared<Vec<Shared<V::Model>>> {
        Rc::clone(&self.backing)
    }

    /// Install or clear the rendering delegate.
    pub fn set_delegate(&self, delegate: Option<Rc<Delegate<V>>>) {
        *self.delegate.borrow_mut() = delegate;
    }

    /// Install a rendering delegate from a closure.
    pub fn with_delegate(
        self: Rc<Self>,
        delegate: impl Fn(&V, Role) -> Option<Value> + 'static,
    ) -> Rc<Self> {
        self.set_delegate(Some(Rc::new(delegate)));
        self
    }

    /// Fine-grained per-item changes.
    #[must_use]
    pub fn item_changed(&self) -> &Event<ItemChange<V>> {
        &self.item_changed
    }
}

impl<V: ModelWrapper> ListModel for ObservableList<V> {
    fn row_count(&self) -> usize {
        self.len()
    }

    fn data(&self, row: usize, role: Role) -> Option<Value> {
        let item = self.get(row)?;
        let delegate = self.delegate.borrow().clone()?;
        delegate(&item, role)
    }

    fn rows_changed(&self) -> &Event<RowsChange> {
        &self.rows_changed
    }

    fn data_changed(&self) -> &Event<usize> {
        &self.data_changed
    }
}

impl<V: ModelWrapper> Observable for ObservableList<V> {
    fn type_name(&self) -> &'static str {
        "ObservableList"
    }

    fn property(&self, name: &str) -> Option<Value> {
        (name == "count").then(|| Value::from(self.len()))
    }

    fn set_property(&self, name: &str, _value: Value) -> BindResult<()> {
        if name == "count" {
            Err(BindError::read_only("ObservableList", name))
        } else {
            Err(BindError::unknown("ObservableList", name))
        }
    }

    fn notifier(&self) -> &dyn ChangeNotifier {
        &self.changed
    }

    fn as_list_model(self: Rc<Self>) -> Option<Rc<dyn ListModel>> {
        Some(self)
    }
}
