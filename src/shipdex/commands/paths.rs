use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::DataStore;

pub fn run<S: DataStore>(catalog: &Catalog<S>) -> Result<CmdResult> {
    match catalog.store().slot_path(catalog.key()) {
        Some(path) => Ok(CmdResult::default().with_slot_paths(vec![path])),
        None => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::info("The catalog is only held in memory."));
            Ok(result)
        }
    }
}
