use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, ShipdexError};
use crate::model::{PairingDraft, PairingId, PairingRecord};
use crate::selector::PairingSelector;
use crate::store::DataStore;

pub fn resolve_selector<S: DataStore>(
    catalog: &Catalog<S>,
    selector: &PairingSelector,
) -> Result<PairingId> {
    match selector {
        PairingSelector::Id(id) => catalog.get(*id).map(|r| r.id),
        PairingSelector::Name(name) => {
            let matches = catalog.find_by_name(name);
            match matches.as_slice() {
                [] => Err(ShipdexError::Api(format!("No pairing named \"{}\"", name))),
                [only] => Ok(only.id),
                many => {
                    let ids: Vec<String> = many.iter().map(|r| r.id.to_string()).collect();
                    Err(ShipdexError::Api(format!(
                        "\"{}\" matches several pairings, use an id instead: {}",
                        name,
                        ids.join(", ")
                    )))
                }
            }
        }
    }
}

pub fn resolve_selectors<S: DataStore>(
    catalog: &Catalog<S>,
    selectors: &[PairingSelector],
) -> Result<Vec<PairingId>> {
    selectors
        .iter()
        .map(|s| resolve_selector(catalog, s))
        .collect()
}

pub fn records_by_selectors<S: DataStore>(
    catalog: &Catalog<S>,
    selectors: &[PairingSelector],
) -> Result<Vec<PairingRecord>> {
    let ids = resolve_selectors(catalog, selectors)?;
    ids.into_iter()
        .map(|id| catalog.get(id).cloned())
        .collect()
}

/// Fandom is what the catalog groups by, so it can't be blank; a pairing also
/// needs something to be listed under.
pub fn validate_draft(draft: &PairingDraft) -> Result<()> {
    if draft.fandom.trim().is_empty() {
        return Err(ShipdexError::Api("Fandom is required".to_string()));
    }
    if draft.name.trim().is_empty() && draft.characters.trim().is_empty() {
        return Err(ShipdexError::Api(
            "A pairing needs a name or characters".to_string(),
        ));
    }
    Ok(())
}

/// Turns a parked write failure into a user-facing warning.
pub fn report_persist_failure<S: DataStore>(catalog: &mut Catalog<S>, result: &mut CmdResult) {
    if let Some(e) = catalog.take_persist_failure() {
        result.add_message(CmdMessage::warning(format!(
            "{}. Changes are kept for this session but may not survive a restart.",
            e
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryStore;

    fn catalog() -> Catalog<InMemoryStore> {
        Catalog::new(InMemoryStore::new(), "fandomShips")
    }

    #[test]
    fn resolves_by_id_and_name() {
        let mut catalog = catalog();
        let stony = catalog.create(PairingDraft::new("Stony", "MCU"));

        assert_eq!(
            resolve_selector(&catalog, &PairingSelector::Id(stony.id)).unwrap(),
            stony.id
        );
        assert_eq!(
            resolve_selector(&catalog, &PairingSelector::Name("STONY".into())).unwrap(),
            stony.id
        );
    }

    #[test]
    fn unknown_id_is_not_found() {
        let catalog = catalog();
        assert!(matches!(
            resolve_selector(&catalog, &PairingSelector::Id(PairingId(3))),
            Err(ShipdexError::NotFound(_))
        ));
    }

    #[test]
    fn ambiguous_name_lists_candidates() {
        let mut catalog = catalog();
        let a = catalog.create(PairingDraft::new("Same", "One"));
        let b = catalog.create(PairingDraft::new("same", "Two"));

        let err = resolve_selector(&catalog, &PairingSelector::Name("Same".into())).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains(&a.id.to_string()));
        assert!(msg.contains(&b.id.to_string()));
    }

    #[test]
    fn drafts_need_fandom_and_a_label() {
        assert!(validate_draft(&PairingDraft::new("A", "")).is_err());
        assert!(validate_draft(&PairingDraft::new("", "F")).is_err());

        let mut draft = PairingDraft::new("", "F");
        draft.characters = "A x B".into();
        assert!(validate_draft(&draft).is_ok());
    }

    #[test]
    fn persist_failure_becomes_warning() {
        let mut store = InMemoryStore::new();
        store.set_fail_writes(true);
        let mut catalog = Catalog::new(store, "fandomShips");
        catalog.create(PairingDraft::new("A", "F"));

        let mut result = CmdResult::default();
        report_persist_failure(&mut catalog, &mut result);
        assert_eq!(result.messages.len(), 1);
        assert!(matches!(
            result.messages[0].level,
            crate::commands::MessageLevel::Warning
        ));
    }
}
