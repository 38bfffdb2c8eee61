use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ShipdexError};
use crate::model::{PairingId, PairingRecord};
use crate::store::DataStore;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::helpers::report_persist_failure;

pub fn run<S: DataStore>(catalog: &mut Catalog<S>, path: &Path) -> Result<CmdResult> {
    let text = fs::read_to_string(path).map_err(ShipdexError::Io)?;
    import_snapshot(catalog, &text)
}

/// Replaces the whole catalog with the records in `text`.
///
/// Nothing changes unless the whole document parses. The records are taken
/// as they are: duplicate ids only produce a warning, and records without a
/// usable id get a fresh one.
pub fn import_snapshot<S: DataStore>(catalog: &mut Catalog<S>, text: &str) -> Result<CmdResult> {
    let records: Vec<PairingRecord> =
        serde_json::from_str(text).map_err(|e| ShipdexError::InvalidFormat(e.to_string()))?;

    let count = records.len();
    let assigned = catalog.replace_all(records);
    let duplicates = duplicate_ids(catalog.list());

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Imported {} pairing(s).",
        count
    )));
    if assigned > 0 {
        result.add_message(CmdMessage::warning(format!(
            "{} pairing(s) had no usable id and were given new ones.",
            assigned
        )));
    }
    if !duplicates.is_empty() {
        let ids: Vec<String> = duplicates.iter().map(|id| id.to_string()).collect();
        result.add_message(CmdMessage::warning(format!(
            "Snapshot repeats id(s) {}. Run `shipdex doctor` to give them fresh ids.",
            ids.join(", ")
        )));
    }
    report_persist_failure(catalog, &mut result);
    Ok(result)
}

pub(crate) fn duplicate_ids(records: &[PairingRecord]) -> Vec<PairingId> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    records
        .iter()
        .filter(|r| !seen.insert(r.id) && reported.insert(r.id))
        .map(|r| r.id)
        .collect()
}
