//! Persistence Bridge
//!
//! Mirrors the live workspace into a `KeyValueStore` under three fixed keys.
//! The store is read once at startup and written after every mutation.
//! Storage failures are logged and never abort the mutation that caused them.

use std::sync::Arc;

use brb_designer_core::codec::decode_records;
use brb_designer_core::{ParameterRecord, RecordStore};
use tracing::{debug, warn};

use crate::storage::kv::KeyValueStore;
use crate::utils::error::AppResult;

pub const KEY_PROJECT_NAME: &str = "brb_projectName";
pub const KEY_TOTAL_QUANTITY: &str = "brb_totalQuantity";
pub const KEY_PARAMETER_TABLES: &str = "brb_parameterTables";

/// What a previous session left behind
#[derive(Debug, Clone)]
pub struct RestoredState {
    pub project_name: String,
    pub store: RecordStore,
}

impl Default for RestoredState {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            store: RecordStore::new(),
        }
    }
}

#[derive(Clone)]
pub struct PersistenceBridge {
    store: Arc<dyn KeyValueStore>,
}

impl PersistenceBridge {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the last checkpoint. Anything missing or unreadable falls back
    /// to the default workspace; the stored total is ignored and recomputed.
    pub fn load(&self) -> RestoredState {
        match self.try_load() {
            Ok(state) => state,
            Err(e) => {
                warn!("[Persistence] Failed to restore workspace, starting fresh: {}", e);
                RestoredState::default()
            }
        }
    }

    fn try_load(&self) -> AppResult<RestoredState> {
        let project_name = self.store.get(KEY_PROJECT_NAME)?.unwrap_or_default();

        let records: Vec<ParameterRecord> = match self.store.get(KEY_PARAMETER_TABLES)? {
            // Exact shape first so raw field text survives untouched; older
            // or hand-edited entries go through the tolerant decoder.
            Some(raw) => match serde_json::from_str::<Vec<ParameterRecord>>(&raw) {
                Ok(records) => records,
                Err(_) => {
                    let value: serde_json::Value = serde_json::from_str(&raw)?;
                    decode_records(&value)
                }
            },
            None => Vec::new(),
        };

        let store = RecordStore::from_records(records);

        if let Some(stored) = self.store.get(KEY_TOTAL_QUANTITY)? {
            if stored.trim() != store.total_quantity().to_string() {
                debug!(
                    "[Persistence] Stored total {} differs from recomputed {}",
                    stored,
                    store.total_quantity()
                );
            }
        }

        Ok(RestoredState {
            project_name,
            store,
        })
    }

    /// Write the current state as one batch. Returns whether it was written.
    pub fn checkpoint(&self, project_name: &str, records: &RecordStore) -> bool {
        match self.try_checkpoint(project_name, records) {
            Ok(()) => true,
            Err(e) => {
                warn!("[Persistence] Checkpoint failed: {}", e);
                false
            }
        }
    }

    fn try_checkpoint(&self, project_name: &str, records: &RecordStore) -> AppResult<()> {
        let tables = serde_json::to_string(records.records())?;
        let total = records.total_quantity().to_string();
        self.store.set_many(&[
            (KEY_PROJECT_NAME, project_name),
            (KEY_TOTAL_QUANTITY, &total),
            (KEY_PARAMETER_TABLES, &tables),
        ])
    }

    /// Forget the stored workspace.
    pub fn reset(&self) -> bool {
        let result = [KEY_PROJECT_NAME, KEY_TOTAL_QUANTITY, KEY_PARAMETER_TABLES]
            .iter()
            .try_for_each(|key| self.store.delete(key));
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("[Persistence] Reset failed: {}", e);
                false
            }
        }
    }
}

impl std::fmt::Debug for PersistenceBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceBridge").finish_non_exhaustive()
    }
}
