use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult, PairingPatch};
use crate::error::Result;
use crate::model::PairingDraft;
use crate::selector::PairingSelector;
use crate::store::DataStore;

use super::helpers::{report_persist_failure, resolve_selector, validate_draft};

pub fn run<S: DataStore>(
    catalog: &mut Catalog<S>,
    selector: &PairingSelector,
    patch: PairingPatch,
    max_image_bytes: u64,
) -> Result<CmdResult> {
    let id = resolve_selector(catalog, selector)?;
    if patch.is_empty() {
        let mut result = CmdResult::default();
        result.add_message(CmdMessage::info("Nothing to change."));
        return Ok(result);
    }

    let current = PairingDraft::from(catalog.get(id)?);
    let draft = patch.onto(current, max_image_bytes)?;
    validate_draft(&draft)?;

    let record = catalog.update(id, draft)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Pairing updated ({}): {}",
        record.id,
        record.label()
    )));
    report_persist_failure(catalog, &mut result);
    Ok(result.with_affected_records(vec![record]))
}
