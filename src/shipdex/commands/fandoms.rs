use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::PairingRecord;
use crate::query;

pub fn run(records: &[PairingRecord]) -> Result<CmdResult> {
    let fandoms = query::fandom_counts(records);
    let mut result = CmdResult::default();
    if fandoms.is_empty() {
        result.add_message(CmdMessage::info("No fandoms yet."));
    }
    Ok(result.with_fandoms(fandoms))
}
