use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::selector::PairingSelector;
use crate::store::DataStore;

use super::helpers::{report_persist_failure, resolve_selectors};

pub fn toggle<S: DataStore>(
    catalog: &mut Catalog<S>,
    selectors: &[PairingSelector],
) -> Result<CmdResult> {
    let ids = resolve_selectors(catalog, selectors)?;
    let mut result = CmdResult::default();

    for id in ids {
        let record = catalog.toggle_favorite(id)?;
        let verb = if record.favorite {
            "Added to favorites"
        } else {
            "Removed from favorites"
        };
        result.add_message(CmdMessage::success(format!(
            "{} ({}): {}",
            verb,
            record.id,
            record.label()
        )));
        result.affected_records.push(record);
    }

    report_persist_failure(catalog, &mut result);
    Ok(result)
}
