//! Reorder Protocol
//!
//! Drag-and-drop over the record list expressed as an explicit state
//! machine. Input technology is abstracted into `DragEvent`s carrying the
//! pointer's x coordinate and the bounding box of the record under it; the
//! machine produces at most one `ReorderCommit` per gesture, which the caller
//! applies to the `RecordStore`.
//!
//! Insertion points use a midpoint rule: a pointer in the left half of a
//! record targets that record's index, the right half targets index + 1.

use serde::{Deserialize, Serialize};

use crate::store::{Mutation, RecordStore};

/// Screen-space bounding box of a record card.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f64,
    pub width: f64,
}

impl Bounds {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Insertion index for a pointer at `x` over the record at `index`.
    pub fn insertion_index(&self, index: usize, x: f64) -> usize {
        if x - self.left < self.width / 2.0 {
            index
        } else {
            index.saturating_add(1)
        }
    }
}

/// Current phase of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        from: usize,
        pending: Option<usize>,
    },
}

/// Gesture input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DragEvent {
    /// Gesture started on the record at `index`.
    Start { index: usize },
    /// Pointer moved over the record at `index`.
    Over { index: usize, x: f64, bounds: Bounds },
    /// Pointer left the whole list container.
    LeaveContainer,
    /// Released over the record at `index`.
    DropOnRecord { index: usize, x: f64, bounds: Bounds },
    /// Released past the last record.
    DropAtEnd,
    /// Gesture aborted.
    Cancel,
}

/// A move to apply to the store, already index-corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderCommit {
    pub from: usize,
    pub to: usize,
}

impl ReorderCommit {
    pub fn apply(&self, store: &mut RecordStore) -> Mutation {
        store.reorder(self.from, self.to)
    }
}

/// Drag state machine over a list of `len` records.
#[derive(Debug, Clone, Default)]
pub struct ReorderProtocol {
    state: DragState,
}

impl ReorderProtocol {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Whether the record at `index` is the one being dragged.
    pub fn is_dragged(&self, index: usize) -> bool {
        matches!(self.state, DragState::Dragging { from, .. } if from == index)
    }

    /// Index where the insertion marker should be drawn, if any. No marker
    /// is shown directly before the dragged record itself.
    pub fn insertion_marker(&self) -> Option<usize> {
        match self.state {
            DragState::Dragging {
                from,
                pending: Some(to),
            } if to != from => Some(to),
            _ => None,
        }
    }

    /// Feed one event. `len` is the current record count. Returns a commit
    /// when a drop results in an actual move.
    ///
    /// Starting on an index past the end is ignored; pointer indices past
    /// the end are treated as the last record, so targets never exceed `len`.
    pub fn handle(&mut self, event: DragEvent, len: usize) -> Option<ReorderCommit> {
        let last = len.saturating_sub(1);
        match event {
            DragEvent::Start { index } => {
                if index < len {
                    self.start(index);
                }
                None
            }
            DragEvent::Over { index, x, bounds } => {
                self.over(index.min(last), x, bounds);
                None
            }
            DragEvent::LeaveContainer => {
                self.leave_container();
                None
            }
            DragEvent::DropOnRecord { index, x, bounds } => {
                self.drop_on_record(index.min(last), x, bounds)
            }
            DragEvent::DropAtEnd => self.drop_at_end(len),
            DragEvent::Cancel => {
                self.cancel();
                None
            }
        }
    }

    pub fn start(&mut self, index: usize) {
        self.state = DragState::Dragging {
            from: index,
            pending: None,
        };
    }

    pub fn over(&mut self, index: usize, x: f64, bounds: Bounds) {
        if let DragState::Dragging { pending, .. } = &mut self.state {
            *pending = Some(bounds.insertion_index(index, x));
        }
    }

    /// Clears the pending target; the drag itself continues.
    pub fn leave_container(&mut self) {
        if let DragState::Dragging { pending, .. } = &mut self.state {
            *pending = None;
        }
    }

    pub fn drop_on_record(&mut self, index: usize, x: f64, bounds: Bounds) -> Option<ReorderCommit> {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging { from, pending } = state else {
            return None;
        };
        let to = pending.unwrap_or_else(|| bounds.insertion_index(index, x));
        Self::commit(from, to)
    }

    pub fn drop_at_end(&mut self, len: usize) -> Option<ReorderCommit> {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging { from, .. } = state else {
            return None;
        };
        Self::commit(from, len)
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    fn commit(from: usize, to: usize) -> Option<ReorderCommit> {
        let to = if from < to { to - 1 } else { to };
        if to == from {
            None
        } else {
            Some(ReorderCommit { from, to })
        }
    }
}
