//! Key-Value Store
//!
//! The durable string store the workspace mirrors itself into. SQLite backs
//! it in the application; `MemoryKvStore` backs it in tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::storage::database::Database;
use crate::utils::error::{AppError, AppResult};

/// Durable string key-value storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    /// Write every entry or none of them.
    fn set_many(&self, entries: &[(&str, &str)]) -> AppResult<()>;
    fn delete(&self, key: &str) -> AppResult<()>;
}

impl KeyValueStore for Database {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.get_setting(key)
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.set_setting(key, value)
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> AppResult<()> {
        self.set_settings(entries)
    }

    fn delete(&self, key: &str) -> AppResult<()> {
        self.delete_setting(key)
    }
}

/// In-process store with no durability
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| AppError::internal("key-value store lock poisoned"))
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> AppResult<()> {
        let mut map = self.lock()?;
        for (key, value) in entries {
            map.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> AppResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
