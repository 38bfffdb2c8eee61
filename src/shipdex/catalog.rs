//! # Record Store
//!
//! [`Catalog`] is the single owner of the pairing collection for a session.
//! Nothing else holds a mutable reference to the records; readers get a
//! slice (`list`) or clones (the query engine).
//!
//! ## Ordering
//!
//! Storage order is newest first: `create` prepends. `update` and
//! `toggle_favorite` mutate in place, so a record keeps its position.
//!
//! ## Mirroring
//!
//! Every mutation ends by writing the whole collection to the cache slot.
//! A failed write does not undo the mutation: memory stays authoritative
//! for the session. The failure is logged and parked until the caller
//! collects it with [`Catalog::take_persist_failure`].

use crate::error::{Result, ShipdexError};
use crate::model::{PairingDraft, PairingId, PairingRecord};
use crate::store::DataStore;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// How fresh ids are minted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdStrategy {
    /// Milliseconds since the epoch, bumped past the current maximum.
    #[default]
    Timestamp,
    /// Current maximum plus one, starting at 1.
    Sequential,
}

impl IdStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "timestamp" => Some(IdStrategy::Timestamp),
            "sequential" => Some(IdStrategy::Sequential),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IdStrategy::Timestamp => "timestamp",
            IdStrategy::Sequential => "sequential",
        }
    }
}

pub struct Catalog<S: DataStore> {
    store: S,
    key: String,
    records: Vec<PairingRecord>,
    id_strategy: IdStrategy,
    clock: fn() -> DateTime<Utc>,
    persist_failure: Option<ShipdexError>,
}

impl<S: DataStore> Catalog<S> {
    /// An empty catalog mirroring to `key`. Call [`crate::bootstrap::bootstrap`]
    /// to populate it.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            records: Vec::new(),
            id_strategy: IdStrategy::default(),
            clock: Utc::now,
            persist_failure: None,
        }
    }

    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn list(&self) -> &[PairingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: PairingId) -> Result<&PairingRecord> {
        self.records
            .iter()
            .find(|r| r.id == id)
            .ok_or(ShipdexError::NotFound(id))
    }

    /// Records whose name equals `name`, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Vec<&PairingRecord> {
        let wanted = name.trim().to_lowercase();
        self.records
            .iter()
            .filter(|r| r.name.trim().to_lowercase() == wanted)
            .collect()
    }

    pub fn create(&mut self, draft: PairingDraft) -> PairingRecord {
        let id = self.next_id();
        let record = PairingRecord::from_draft(id, self.today(), draft);
        debug!(%id, name = %record.name, "created pairing");

        self.records.insert(0, record.clone());
        self.persist();
        record
    }

    pub fn update(&mut self, id: PairingId, draft: PairingDraft) -> Result<PairingRecord> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ShipdexError::NotFound(id))?;
        record.apply(draft);
        let updated = record.clone();
        debug!(%id, "updated pairing");

        self.persist();
        Ok(updated)
    }

    pub fn toggle_favorite(&mut self, id: PairingId) -> Result<PairingRecord> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ShipdexError::NotFound(id))?;
        record.favorite = !record.favorite;
        let toggled = record.clone();
        debug!(%id, favorite = toggled.favorite, "toggled favorite");

        self.persist();
        Ok(toggled)
    }

    /// Removes the record. An unknown id leaves the collection as it was and
    /// returns `None`.
    pub fn delete(&mut self, id: PairingId) -> Option<PairingRecord> {
        let position = match self.records.iter().position(|r| r.id == id) {
            Some(p) => p,
            None => {
                debug!(%id, "delete ignored, no such pairing");
                return None;
            }
        };
        let removed = self.records.remove(position);
        self.persist();
        Some(removed)
    }

    /// Wholesale replacement, trusted as-is apart from records that arrived
    /// without a usable id, which get fresh ones. Returns how many did.
    pub fn replace_all(&mut self, mut records: Vec<PairingRecord>) -> usize {
        debug!(count = records.len(), "replacing collection");
        let assigned = assign_missing_ids(&mut records);
        self.records = records;
        self.persist();
        assigned
    }

    /// Sets the collection without writing it back, for content that was just
    /// read from the cache.
    pub(crate) fn restore(&mut self, mut records: Vec<PairingRecord>) {
        assign_missing_ids(&mut records);
        self.records = records;
    }

    /// Reads and parses a cache slot without touching the collection.
    pub fn read_slot(&self, key: &str) -> Result<Option<Vec<PairingRecord>>> {
        match self.store.read_slot(key)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| ShipdexError::InvalidFormat(format!("cache slot '{}': {}", key, e))),
        }
    }

    pub(crate) fn remove_slot(&mut self, key: &str) -> Result<()> {
        self.store.remove_slot(key)
    }

    /// The last mirroring failure, if any, clearing it.
    pub fn take_persist_failure(&mut self) -> Option<ShipdexError> {
        self.persist_failure.take()
    }

    pub(crate) fn next_id(&self) -> PairingId {
        let taken: BTreeSet<u64> = self.records.iter().map(|r| r.id.0).collect();
        let above = id_after(&taken);
        let candidate = match self.id_strategy {
            IdStrategy::Timestamp if above > max_id(&taken) => {
                let now = (self.clock)().timestamp_millis().max(0) as u64;
                now.max(above)
            }
            _ => above,
        };
        PairingId(candidate)
    }

    fn today(&self) -> NaiveDate {
        (self.clock)().date_naive()
    }

    fn persist(&mut self) {
        let outcome = serde_json::to_string_pretty(&self.records)
            .map_err(ShipdexError::Serialization)
            .and_then(|json| self.store.write_slot(&self.key, &json));

        if let Err(e) = outcome {
            warn!(key = %self.key, error = %e, "catalog not saved, keeping in-memory state");
            self.persist_failure = Some(ShipdexError::Persistence(e.to_string()));
        }
    }
}

fn max_id(taken: &BTreeSet<u64>) -> u64 {
    taken.last().copied().unwrap_or(0)
}

/// One above the largest id in use. When the largest id is `u64::MAX`, the
/// lowest free id instead.
pub(crate) fn id_after(taken: &BTreeSet<u64>) -> u64 {
    match max_id(taken).checked_add(1) {
        Some(id) => id,
        None => (1..u64::MAX).find(|id| !taken.contains(id)).unwrap_or(0),
    }
}

/// Gives every unassigned record an id above the ones in use.
fn assign_missing_ids(records: &mut [PairingRecord]) -> usize {
    let mut taken: BTreeSet<u64> = records
        .iter()
        .filter(|r| r.id.is_assigned())
        .map(|r| r.id.0)
        .collect();
    let mut assigned = 0;
    // oldest last in storage order, so walk backwards to number oldest first
    for record in records.iter_mut().rev().filter(|r| !r.id.is_assigned()) {
        let id = id_after(&taken);
        taken.insert(id);
        record.id = PairingId(id);
        assigned += 1;
    }
    if assigned > 0 {
        warn!(count = assigned, "records without a usable id were given new ones");
    }
    assigned
}
