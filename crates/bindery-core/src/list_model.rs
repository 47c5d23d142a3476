#![forbid(unsafe_code)]

//! What a list widget needs from a container without knowing its item type.

use crate::notify::Event;
use crate::value::Value;

/// Display role passed to [`ListModel::data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Display,
    Edit,
    ToolTip,
    Decoration,
    User(u32),
}

/// Whether a structural notification precedes or follows the mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowsPhase {
    Begin,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowsKind {
    Insert,
    Remove,
}

/// Structural change notification covering rows `first..=last`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsChange {
    pub phase: RowsPhase,
    pub kind: RowsKind,
    pub first: usize,
    pub last: usize,
}

impl RowsChange {
    #[must_use]
    pub fn begin(kind: RowsKind, first: usize, last: usize) -> Self {
        Self {
            phase: RowsPhase::Begin,
            kind,
            first,
            last,
        }
    }

    #[must_use]
    pub fn end(kind: RowsKind, first: usize, last: usize) -> Self {
        Self {
            phase: RowsPhase::End,
            kind,
            first,
            last,
        }
    }
}

/// Row-oriented read access plus structural and per-row change events.
pub trait ListModel {
    fn row_count(&self) -> usize;

    /// Value for `row` under `role`; `None` means no opinion.
    fn data(&self, row: usize, role: Role) -> Option<Value>;

    /// Begin/end bracketed insert and remove notifications.
    fn rows_changed(&self) -> &Event<RowsChange>;

    /// A single row's data changed.
    fn data_changed(&self) -> &Event<usize>;
}
