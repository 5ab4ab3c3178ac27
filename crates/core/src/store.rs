//! Record Store
//!
//! Ordered, never-empty collection of parameter records plus the cached
//! total quantity. Every structural mutation recomputes the total before
//! returning.

use serde::{Deserialize, Serialize};

use crate::record::{ParameterRecord, QuantityRow, RecordField, RowColumn};

/// Outcome of a store mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    /// State changed.
    Applied,
    /// The call was valid but left state untouched (unknown id, equal
    /// indices, last record or last row).
    Unchanged,
}

impl Mutation {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Ordered collection of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<ParameterRecord>,
    total_quantity: u64,
}

impl RecordStore {
    /// A store holding a single default record.
    pub fn new() -> Self {
        Self::from_records(Vec::new())
    }

    /// Build a store from existing records. An empty list is replaced by a
    /// single default record, and records without rows get one empty row.
    pub fn from_records(mut records: Vec<ParameterRecord>) -> Self {
        if records.is_empty() {
            records.push(ParameterRecord::new());
        }
        for record in &mut records {
            if record.quantity_rows.is_empty() {
                record.quantity_rows.push(QuantityRow::default());
            }
        }
        let mut store = Self {
            records,
            total_quantity: 0,
        };
        store.recompute();
        store
    }

    pub fn records(&self) -> &[ParameterRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ParameterRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn get_index(&self, index: usize) -> Option<&ParameterRecord> {
        self.records.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// Cached total, refreshed after every mutation.
    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    /// Append a default record. Returns the new record's id.
    pub fn add_record(&mut self) -> String {
        let record = ParameterRecord::new();
        let id = record.id.clone();
        self.records.push(record);
        self.recompute();
        id
    }

    /// Remove a record unless it is the only one left.
    pub fn remove_record(&mut self, id: &str) -> Mutation {
        if self.records.len() <= 1 {
            return Mutation::Unchanged;
        }
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.recompute();
        if self.records.len() == before {
            Mutation::Unchanged
        } else {
            Mutation::Applied
        }
    }

    /// Replace one field. No validation happens here.
    pub fn update_field(&mut self, id: &str, field: RecordField, value: impl Into<String>) -> Mutation {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            return Mutation::Unchanged;
        };
        record.set_field(field, value);
        Mutation::Applied
    }

    /// Append an empty length/quantity row.
    pub fn add_quantity_row(&mut self, id: &str) -> Mutation {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            return Mutation::Unchanged;
        };
        record.quantity_rows.push(QuantityRow::default());
        self.recompute();
        Mutation::Applied
    }

    /// Remove a row unless it is the record's last one.
    pub fn remove_quantity_row(&mut self, id: &str, index: usize) -> Mutation {
        let Some(record) = self.records.iter_mut().find(|r| r.id == id) else {
            return Mutation::Unchanged;
        };
        if record.quantity_rows.len() <= 1 || index >= record.quantity_rows.len() {
            return Mutation::Unchanged;
        }
        record.quantity_rows.remove(index);
        self.recompute();
        Mutation::Applied
    }

    /// Edit one cell of a row.
    pub fn update_quantity_row(
        &mut self,
        id: &str,
        index: usize,
        column: RowColumn,
        value: impl Into<String>,
    ) -> Mutation {
        let Some(row) = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .and_then(|r| r.quantity_rows.get_mut(index))
        else {
            return Mutation::Unchanged;
        };
        match column {
            RowColumn::Length => row.length = value.into(),
            RowColumn::Quantity => row.quantity = value.into(),
        }
        self.recompute();
        Mutation::Applied
    }

    /// Move the record at `from` to `to`, shifting the records in between.
    /// Both indices are clamped into range.
    pub fn reorder(&mut self, from: usize, to: usize) -> Mutation {
        let last = self.records.len() - 1;
        let (from, to) = (from.min(last), to.min(last));
        if from == to {
            return Mutation::Unchanged;
        }
        let moved = self.records.remove(from);
        self.records.insert(to, moved);
        self.recompute();
        Mutation::Applied
    }

    /// Replace every record at once (project load / reset).
    pub fn replace(&mut self, records: Vec<ParameterRecord>) {
        *self = Self::from_records(records);
    }

    /// Recompute the total from scratch without touching the cache.
    pub fn compute_total(&self) -> u64 {
        compute_total(&self.records)
    }

    fn recompute(&mut self) {
        self.total_quantity = compute_total(&self.records);
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Sum of every row quantity across `records`; unparseable text counts as 0.
/// Saturates at `u64::MAX`.
pub fn compute_total(records: &[ParameterRecord]) -> u64 {
    records
        .iter()
        .map(ParameterRecord::total_quantity)
        .fold(0, u64::saturating_add)
}
