use crate::catalog::Catalog;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::selector::PairingSelector;
use crate::store::DataStore;

use super::helpers::records_by_selectors;

pub fn run<S: DataStore>(catalog: &Catalog<S>, selectors: &[PairingSelector]) -> Result<CmdResult> {
    let records = records_by_selectors(catalog, selectors)?;
    Ok(CmdResult::default().with_listed_records(records))
}
