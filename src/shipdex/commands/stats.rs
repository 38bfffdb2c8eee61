use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::PairingRecord;
use crate::query;

pub fn run(records: &[PairingRecord]) -> Result<CmdResult> {
    Ok(CmdResult::default().with_stats(query::stats(records)))
}
