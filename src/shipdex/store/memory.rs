use super::DataStore;
use crate::error::{Result, ShipdexError};
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    slots: HashMap<String, String>,
    fail_writes: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, like a full quota would.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn with_slot(mut self, key: &str, value: &str) -> Self {
        self.slots.insert(key.to_string(), value.to_string());
        self
    }
}

impl DataStore for InMemoryStore {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn write_slot(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(ShipdexError::Persistence(format!(
                "simulated write failure for '{}'",
                key
            )));
        }
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_slot(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }

    fn slot_path(&self, _key: &str) -> Option<PathBuf> {
        None
    }
}
