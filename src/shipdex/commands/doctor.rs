use crate::catalog::{id_after, Catalog};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{PairingId, MAX_RATING};
use crate::store::DataStore;
use std::collections::{BTreeSet, HashSet};

use super::helpers::report_persist_failure;

/// Repairs what imports can bring in: repeated ids and out-of-range ratings.
pub fn run<S: DataStore>(catalog: &mut Catalog<S>) -> Result<CmdResult> {
    let mut records = catalog.list().to_vec();
    let mut taken: BTreeSet<u64> = records.iter().map(|r| r.id.0).collect();
    let mut seen = HashSet::new();
    let mut reassigned = Vec::new();
    let mut clamped = 0;

    // storage order is newest first, so the oldest copy keeps the id
    for record in records.iter_mut().rev() {
        if !seen.insert(record.id) {
            let old = record.id;
            let fresh = id_after(&taken);
            taken.insert(fresh);
            record.id = PairingId(fresh);
            reassigned.push((old, record.id, record.label().to_string()));
        }
        if record.rating > MAX_RATING {
            record.rating = MAX_RATING;
            clamped += 1;
        }
    }

    let mut result = CmdResult::default();
    let blank_fandoms = records.iter().filter(|r| r.fandom.trim().is_empty()).count();

    if reassigned.is_empty() && clamped == 0 {
        result.add_message(CmdMessage::success("No inconsistencies found."));
    } else {
        catalog.replace_all(records);
        result.add_message(CmdMessage::warning("Inconsistencies found and fixed:"));
        for (old, new, label) in &reassigned {
            result.add_message(CmdMessage::info(format!(
                "  - Duplicate id {} on \"{}\" replaced with {}.",
                old, label, new
            )));
        }
        if clamped > 0 {
            result.add_message(CmdMessage::info(format!(
                "  - Clamped {} rating(s) to {}.",
                clamped, MAX_RATING
            )));
        }
        report_persist_failure(catalog, &mut result);
    }

    if blank_fandoms > 0 {
        result.add_message(CmdMessage::info(format!(
            "{} pairing(s) have no fandom; edit them to set one.",
            blank_fandoms
        )));
    }

    Ok(result)
}
