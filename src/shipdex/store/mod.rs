//! # Storage Layer
//!
//! The durable cache behind the catalog is a set of named **slots**, each
//! holding one string (the JSON-serialized collection). This is the same
//! shape as a browser's key/value storage, so a snapshot cached by the web
//! catalog under `fandomShips` and one cached here are the same document.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: one `<key>.json` file per slot inside the data dir.
//!   Writes go to a temp file first and are renamed into place.
//! - [`memory::InMemoryStore`]: a map, for tests. It can be told to fail
//!   writes so the persistence-failure path can be exercised.
//!
//! ## Storage Format
//!
//! ```text
//! <data dir>/
//! ├── fandomShips.json    # the collection, pretty JSON array
//! └── config.json         # ShipdexConfig
//! ```

use crate::error::Result;
use std::path::PathBuf;

pub mod fs;
pub mod memory;

/// Abstract interface for the catalog's durable cache.
pub trait DataStore {
    /// Read a slot. `Ok(None)` when nothing was ever written under `key`.
    fn read_slot(&self, key: &str) -> Result<Option<String>>;

    /// Replace a slot's content.
    fn write_slot(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove a slot. Removing a missing slot is not an error.
    fn remove_slot(&mut self, key: &str) -> Result<()>;

    /// Where the slot lives, for stores that have a location.
    fn slot_path(&self, key: &str) -> Option<PathBuf>;
}
