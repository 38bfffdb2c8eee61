use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::PairingRecord;
use crate::query::{self, PairingQuery};

pub fn run(records: &[PairingRecord], query: &PairingQuery) -> Result<CmdResult> {
    let listed = query::run(records, query);
    let mut result = CmdResult::default();

    if listed.is_empty() && !records.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "No pairings match ({} in catalog).",
            records.len()
        )));
    }

    Ok(result.with_listed_records(listed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PairingDraft, PairingId};
    use chrono::NaiveDate;

    fn collection() -> Vec<PairingRecord> {
        vec![PairingRecord::from_draft(
            PairingId(1),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            PairingDraft::new("Stony", "MCU"),
        )]
    }

    #[test]
    fn search_hits_and_misses() {
        let records = collection();

        let hit = run(&records, &PairingQuery::search("stony")).unwrap();
        assert_eq!(hit.listed_records.len(), 1);

        let miss = run(&records, &PairingQuery::search("potter")).unwrap();
        assert!(miss.listed_records.is_empty());
        assert_eq!(miss.messages.len(), 1);
    }

    #[test]
    fn listing_does_not_touch_input() {
        let records = collection();
        let before = records.clone();
        run(&records, &PairingQuery::default()).unwrap();
        assert_eq!(records, before);
    }
}
