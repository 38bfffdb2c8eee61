use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ShipdexError};
use crate::model::PairingRecord;
use std::fs;
use std::path::Path;

pub const DEFAULT_EXPORT_FILE: &str = "pairings.json";

/// The catalog as a pretty-printed JSON array, in storage order.
pub fn export_snapshot(records: &[PairingRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).map_err(ShipdexError::Serialization)
}

/// Writes the snapshot to `output`, or hands it back in the result when no
/// file is given.
pub fn run(records: &[PairingRecord], output: Option<&Path>) -> Result<CmdResult> {
    let snapshot = export_snapshot(records)?;

    let Some(path) = output else {
        return Ok(CmdResult::default().with_snapshot(snapshot));
    };

    fs::write(path, snapshot).map_err(ShipdexError::Io)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} pairing(s) to {}",
        records.len(),
        path.display()
    )));
    Ok(result)
}
