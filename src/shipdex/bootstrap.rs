//! # Bootstrap
//!
//! Fills an empty [`Catalog`] once per session. Sources, in the order the
//! policy dictates:
//!
//! - the **local cache** (current key, then legacy keys, migrating the first
//!   non-empty legacy slot to the current key)
//! - the **remote snapshot**, a static JSON array behind a URL
//! - the **seed**, so the catalog is never empty
//!
//! With [`BootstrapPolicy::LocalFirst`] the remote is only asked when nothing
//! is cached, which keeps local edits from being overwritten. With
//! [`BootstrapPolicy::RemoteFirst`] a usable remote snapshot replaces the
//! cache every time.
//!
//! No step is fatal. Remote and cache failures are logged and the next
//! source is tried.

use crate::catalog::Catalog;
use crate::error::{Result, ShipdexError};
use crate::model::{seed_records, PairingRecord};
use crate::store::DataStore;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BootstrapPolicy {
    #[default]
    LocalFirst,
    RemoteFirst,
}

impl BootstrapPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "local-first" | "local" => Some(BootstrapPolicy::LocalFirst),
            "remote-first" | "remote" => Some(BootstrapPolicy::RemoteFirst),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BootstrapPolicy::LocalFirst => "local-first",
            BootstrapPolicy::RemoteFirst => "remote-first",
        }
    }
}

/// Somewhere a full snapshot can be fetched from.
pub trait SnapshotSource {
    fn fetch(&self) -> Result<Vec<PairingRecord>>;

    /// Human-readable origin, for messages.
    fn describe(&self) -> String;
}

/// A static JSON file served over HTTP. One attempt, bounded by `timeout`.
pub struct HttpSnapshot {
    url: String,
    client: Client,
}

impl HttpSnapshot {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl SnapshotSource for HttpSnapshot {
    fn fetch(&self) -> Result<Vec<PairingRecord>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| ShipdexError::RemoteUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShipdexError::RemoteUnavailable(format!(
                "{} answered {}",
                self.url, status
            )));
        }

        let body = response
            .text()
            .map_err(|e| ShipdexError::RemoteUnavailable(e.to_string()))?;
        serde_json::from_str(&body)
            .map_err(|e| ShipdexError::RemoteUnavailable(format!("unparseable snapshot: {}", e)))
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapSource {
    LocalCache,
    LegacyCache(String),
    Remote,
    Seed,
}

#[derive(Debug, Clone)]
pub struct BootstrapReport {
    pub source: BootstrapSource,
    pub count: usize,
    /// Recovered problems worth telling the user about.
    pub notes: Vec<String>,
}

pub fn bootstrap<S: DataStore>(
    catalog: &mut Catalog<S>,
    remote: Option<&dyn SnapshotSource>,
    policy: BootstrapPolicy,
    legacy_keys: &[String],
) -> BootstrapReport {
    let mut notes = Vec::new();

    let source = match policy {
        BootstrapPolicy::LocalFirst => {
            if let Some(source) = from_local(catalog, legacy_keys, &mut notes) {
                source
            } else if from_remote(catalog, remote) {
                BootstrapSource::Remote
            } else {
                seed(catalog)
            }
        }
        BootstrapPolicy::RemoteFirst => {
            if from_remote(catalog, remote) {
                BootstrapSource::Remote
            } else if let Some(source) = from_local(catalog, legacy_keys, &mut notes) {
                source
            } else {
                seed(catalog)
            }
        }
    };

    if let Some(e) = catalog.take_persist_failure() {
        notes.push(e.to_string());
    }

    info!(?source, count = catalog.len(), "catalog ready");
    BootstrapReport {
        source,
        count: catalog.len(),
        notes,
    }
}

fn from_local<S: DataStore>(
    catalog: &mut Catalog<S>,
    legacy_keys: &[String],
    notes: &mut Vec<String>,
) -> Option<BootstrapSource> {
    let current = catalog.key().to_string();
    if let Some(records) = read_non_empty(catalog, &current, notes) {
        debug!(key = %current, count = records.len(), "using local cache");
        catalog.restore(records);
        return Some(BootstrapSource::LocalCache);
    }

    for legacy in legacy_keys.iter().filter(|k| **k != current) {
        if let Some(records) = read_non_empty(catalog, legacy, notes) {
            info!(from = %legacy, to = %current, "migrating legacy cache slot");
            catalog.replace_all(records);
            if catalog.take_persist_failure().is_none() {
                if let Err(e) = catalog.remove_slot(legacy) {
                    warn!(key = %legacy, error = %e, "could not remove legacy slot");
                }
            } else {
                notes.push(format!(
                    "Legacy cache '{}' loaded but could not be migrated",
                    legacy
                ));
            }
            return Some(BootstrapSource::LegacyCache(legacy.clone()));
        }
    }

    None
}

fn read_non_empty<S: DataStore>(
    catalog: &Catalog<S>,
    key: &str,
    notes: &mut Vec<String>,
) -> Option<Vec<PairingRecord>> {
    match catalog.read_slot(key) {
        Ok(Some(records)) if !records.is_empty() => Some(records),
        Ok(_) => None,
        Err(e) => {
            warn!(key, error = %e, "ignoring unreadable cache slot");
            notes.push(format!("Ignored unreadable cache '{}': {}", key, e));
            None
        }
    }
}

fn from_remote<S: DataStore>(
    catalog: &mut Catalog<S>,
    remote: Option<&dyn SnapshotSource>,
) -> bool {
    let Some(remote) = remote else {
        return false;
    };

    match remote.fetch() {
        Ok(records) if records.is_empty() => {
            debug!(origin = %remote.describe(), "remote snapshot is empty");
            false
        }
        Ok(records) => {
            debug!(origin = %remote.describe(), count = records.len(), "using remote snapshot");
            catalog.replace_all(records);
            true
        }
        Err(e) => {
            // never surfaced as an error, the next source takes over
            warn!(origin = %remote.describe(), error = %e, "remote snapshot unavailable");
            false
        }
    }
}

fn seed<S: DataStore>(catalog: &mut Catalog<S>) -> BootstrapSource {
    debug!("nothing cached or remote, seeding");
    catalog.replace_all(seed_records());
    BootstrapSource::Seed
}
