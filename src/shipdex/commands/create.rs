use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult, PairingPatch};
use crate::error::Result;
use crate::model::PairingDraft;
use crate::store::DataStore;

use super::helpers::{report_persist_failure, validate_draft};

pub fn run<S: DataStore>(
    catalog: &mut Catalog<S>,
    patch: PairingPatch,
    max_image_bytes: u64,
) -> Result<CmdResult> {
    let draft = patch.onto(PairingDraft::default(), max_image_bytes)?;
    validate_draft(&draft)?;

    let record = catalog.create(draft);
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Pairing added ({}): {}",
        record.id,
        record.label()
    )));
    report_persist_failure(catalog, &mut result);
    result.add_message(CmdMessage::info(
        "Remember to export pairings.json to keep a copy of your catalog.",
    ));
    Ok(result.with_affected_records(vec![record]))
}
