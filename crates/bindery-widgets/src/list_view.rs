#![forbid(unsafe_code)]

//! List display over any [`ListModel`].
//!
//! The view keeps a cache of each row's display text. The cache is rebuilt
//! wholesale when a structural change ends and patched per row on cell
//! changes, mirroring how a real list widget would repaint.
//!
//! # Invariants
//!
//! 1. `rows().len() == model.row_count()` after every notification.
//! 2. `currentRow` is `-1` or a valid row index, and keeps pointing at the
//!    same item across inserts and removes. Removing the selected row
//!    clears the selection. Every move emits `currentRowChanged`.
//! 3. Swapping models drops both subscriptions on the old one.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use bindery_core::{
    BindResult, Event, ListModel, ListenerId, ObjectRef, PropertyInfo, Role, RowsChange, RowsKind,
    RowsPhase, Value, Widget,
};
use tracing::trace;

use crate::base::{Signals, int_arg, mismatch, unsupported};

const PROPERTIES: &[PropertyInfo] = &[
    PropertyInfo::setter("model"),
    PropertyInfo::attribute("currentRow"),
    PropertyInfo::read_only("count"),
];

struct Attached {
    object: ObjectRef,
    list: Rc<dyn ListModel>,
    rows_token: ListenerId,
    data_token: ListenerId,
}

/// A selectable list of rows.
pub struct ListView {
    this: Weak<Self>,
    model: RefCell<Option<Attached>>,
    rows: RefCell<Vec<String>>,
    current_row: Cell<i64>,
    signals: Signals,
}

impl ListView {
    #[must_use]
    pub fn new() -> Rc<Self> {
        Rc::new_cyclic(|this| Self {
            this: this.clone(),
            model: RefCell::new(None),
            rows: RefCell::new(Vec::new()),
            current_row: Cell::new(-1),
            signals: Signals::new(&["currentRowChanged"]),
        })
    }

    /// Cached display text of every row.
    #[must_use]
    pub fn rows(&self) -> Vec<String> {
        self.rows.borrow().clone()
    }

    #[must_use]
    pub fn current_row(&self) -> Option<usize> {
        usize::try_from(self.current_row.get()).ok()
    }

    /// The attached model object, if any.
    #[must_use]
    pub fn model(&self) -> Option<ObjectRef> {
        self.model.borrow().as_ref().map(|m| m.object.clone())
    }

    /// Attach `model`, or detach with `None`. Clears the selection.
    pub fn set_model(&self, model: Option<ObjectRef>) -> BindResult<()> {
        let same = match (self.model.borrow().as_ref(), model.as_ref()) {
            (None, None) => true,
            (Some(current), Some(new)) => current.object.ptr_eq(new),
            _ => false,
        };
        if same {
            return Ok(());
        }

        let list = match &model {
            Some(object) => Some(object.as_list_model().ok_or_else(|| {
                mismatch("model", "list model", &Value::Object(object.clone()))
            })?),
            None => None,
        };

        if let Some(old) = self.model.borrow_mut().take() {
            old.list.rows_changed().disconnect(old.rows_token);
            old.list.data_changed().disconnect(old.data_token);
        }

        if let (Some(object), Some(list)) = (model, list) {
            let weak = self.this.clone();
            let rows_token = list.rows_changed().connect(move |change| {
                if change.phase == RowsPhase::End
                    && let Some(view) = weak.upgrade()
                {
                    view.refresh_all();
                    return view.follow_rows(change);
                }
                Ok(())
            });
            let weak = self.this.clone();
            let data_token = list.data_changed().connect(move |row| {
                if let Some(view) = weak.upgrade() {
                    view.refresh_row(*row);
                }
                Ok(())
            });
            *self.model.borrow_mut() = Some(Attached {
                object,
                list,
                rows_token,
                data_token,
            });
        }
        self.refresh_all();
        self.select(-1)
    }

    /// Select `row`; anything out of range clears the selection.
    pub fn select(&self, row: i64) -> BindResult<()> {
        let count = i64::try_from(self.rows.borrow().len()).unwrap_or(i64::MAX);
        let row = if (0..count).contains(&row) { row } else { -1 };
        if self.current_row.replace(row) == row {
            return Ok(());
        }
        trace!(row, "selection changed");
        self.signals.emit("currentRowChanged")
    }

    fn list(&self) -> Option<Rc<dyn ListModel>> {
        self.model.borrow().as_ref().map(|m| Rc::clone(&m.list))
    }

    fn row_text(list: &dyn ListModel, row: usize) -> String {
        list.data(row, Role::Display)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    fn refresh_all(&self) {
        let rows = match self.list() {
            Some(list) => (0..list.row_count())
                .map(|row| Self::row_text(&*list, row))
                .collect(),
            None => Vec::new(),
        };
        *self.rows.borrow_mut() = rows;
    }

    fn refresh_row(&self, row: usize) {
        let Some(list) = self.list() else {
            return;
        };
        let text = Self::row_text(&*list, row);
        if let Some(slot) = self.rows.borrow_mut().get_mut(row) {
            *slot = text;
        }
    }

    fn follow_rows(&self, change: &RowsChange) -> BindResult<()> {
        let current = self.current_row.get();
        if current < 0 {
            return Ok(());
        }
        let first = i64::try_from(change.first).unwrap_or(i64::MAX);
        let last = i64::try_from(change.last).unwrap_or(i64::MAX);
        let span = last.saturating_sub(first).saturating_add(1);
        let row = match change.kind {
            RowsKind::Remove if current > last => current - span,
            RowsKind::Remove if current >= first => -1,
            RowsKind::Insert if current >= first => current.saturating_add(span),
            _ => current,
        };
        trace!(from = current, to = row, kind = ?change.kind, "selection follows rows");
        self.select(row)
    }
}

impl Widget for ListView {
    fn class_name(&self) -> &'static str {
        "ListView"
    }

    fn properties(&self) -> &[PropertyInfo] {
        PROPERTIES
    }

    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "model" => Some(self.model().into()),
            "currentRow" => Some(self.current_row.get().into()),
            "count" => Some(self.rows.borrow().len().into()),
            _ => None,
        }
    }

    fn call_setter(&self, name: &str, value: Value) -> BindResult<()> {
        match (name, value) {
            ("model", Value::Null) => self.set_model(None),
            ("model", Value::Object(object)) => self.set_model(Some(object)),
            ("model", other) => Err(mismatch(name, "list model", &other)),
            _ => Err(unsupported(self.class_name(), name)),
        }
    }

    fn assign_attribute(&self, name: &str, value: Value) -> BindResult<()> {
        match name {
            "currentRow" => self.select(int_arg(name, value)?),
            _ => Err(unsupported(self.class_name(), name)),
        }
    }

    fn signal(&self, name: &str) -> Option<&Event<()>> {
        self.signals.get(name)
    }
}

impl Drop for ListView {
    fn drop(&mut self) {
        if let Some(old) = self.model.get_mut().take() {
            old.list.rows_changed().disconnect(old.rows_token);
            old.list.data_changed().disconnect(old.data_token);
        }
    }
}
