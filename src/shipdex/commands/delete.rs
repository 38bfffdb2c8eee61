use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::selector::PairingSelector;
use crate::store::DataStore;

use super::helpers::{report_persist_failure, resolve_selector};

/// Deletes the selected pairings. An id that is not in the catalog is
/// skipped with a note; names must resolve.
pub fn run<S: DataStore>(
    catalog: &mut Catalog<S>,
    selectors: &[PairingSelector],
) -> Result<CmdResult> {
    let mut ids = Vec::with_capacity(selectors.len());
    for selector in selectors {
        match selector {
            PairingSelector::Id(id) => ids.push(*id),
            PairingSelector::Name(_) => ids.push(resolve_selector(catalog, selector)?),
        }
    }

    let mut result = CmdResult::default();
    for id in ids {
        match catalog.delete(id) {
            Some(record) => {
                result.add_message(CmdMessage::success(format!(
                    "Pairing deleted ({}): {}",
                    record.id,
                    record.label()
                )));
                result.affected_records.push(record);
            }
            None => result.add_message(CmdMessage::info(format!(
                "No pairing with id {}, nothing deleted.",
                id
            ))),
        }
    }

    report_persist_failure(catalog, &mut result);
    Ok(result)
}
