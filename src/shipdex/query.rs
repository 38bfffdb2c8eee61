//! # Query Engine
//!
//! A pure projection from the collection to an ordered view:
//!
//! 1. copy the collection
//! 2. keep records passing every active filter (AND)
//! 3. keep records where any searched field contains the term
//! 4. sort by name (stable) or keep storage order
//!
//! Nothing here touches the catalog; callers pass a slice and get owned
//! clones back, so a view can never alias the backing collection.

use crate::model::{PairingRecord, Status, Universe};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Sentinel accepted from user input meaning "no filter on this axis".
pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Ascending by lowercased name, ties keep storage order.
    #[default]
    Name,
    /// Storage order, newest first.
    Stored,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Some(SortOrder::Name),
            "stored" | "newest" => Some(SortOrder::Stored),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Name => "name",
            SortOrder::Stored => "stored",
        }
    }
}

/// Which fields free-text search looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchScope {
    /// name, characters, fandom
    #[default]
    Basic,
    /// Basic plus tags, notes, trope and dynamic
    Extended,
}

impl SearchScope {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Some(SearchScope::Basic),
            "extended" => Some(SearchScope::Extended),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchScope::Basic => "basic",
            SearchScope::Extended => "extended",
        }
    }
}

/// Categorical filters. `None` on an axis lets everything through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairingFilter {
    pub favorites_only: bool,
    pub status: Option<Status>,
    /// Substring of the relationship kind, e.g. "Romantic".
    pub relationship: Option<String>,
    pub dynamic: Option<String>,
    pub fandom: Option<String>,
    pub media: Option<String>,
    pub universe: Option<Universe>,
    pub min_rating: Option<u8>,
}

impl PairingFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, record: &PairingRecord) -> bool {
        if self.favorites_only && !record.favorite {
            return false;
        }
        if let Some(status) = &self.status {
            if !eq_ci(record.status.as_str(), status.as_str()) {
                return false;
            }
        }
        if let Some(kind) = &self.relationship {
            if !contains_ci(&record.relationship, kind) {
                return false;
            }
        }
        if let Some(dynamic) = &self.dynamic {
            if !record
                .dynamic
                .as_deref()
                .is_some_and(|d| eq_ci(d, dynamic))
            {
                return false;
            }
        }
        if let Some(fandom) = &self.fandom {
            if !eq_ci(&record.fandom, fandom) {
                return false;
            }
        }
        if let Some(media) = &self.media {
            if !record
                .media
                .as_deref()
                .is_some_and(|m| eq_ci(m, media))
            {
                return false;
            }
        }
        if let Some(universe) = &self.universe {
            if !eq_ci(record.universe.as_str(), universe.as_str()) {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            if record.rating < min {
                return false;
            }
        }
        true
    }
}

/// Turns a user-supplied filter value into an axis setting; empty and
/// `"all"` mean no filter.
pub fn axis(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
        .map(str::to_string)
}

#[derive(Debug, Clone, Default)]
pub struct PairingQuery {
    pub search: Option<String>,
    pub filter: PairingFilter,
    pub scope: SearchScope,
    pub sort: SortOrder,
}

impl PairingQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }
}

pub fn run(records: &[PairingRecord], query: &PairingQuery) -> Vec<PairingRecord> {
    let term = query
        .search
        .as_deref()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty());

    let mut view: Vec<PairingRecord> = records
        .iter()
        .filter(|r| query.filter.matches(r))
        .filter(|r| match &term {
            Some(t) => matches_search(r, t, query.scope),
            None => true,
        })
        .cloned()
        .collect();

    if query.sort == SortOrder::Name {
        // stable: equal names keep storage order
        view.sort_by_key(|r| r.name.to_lowercase());
    }

    view
}

/// `term` must already be lowercased.
fn matches_search(record: &PairingRecord, term: &str, scope: SearchScope) -> bool {
    let basic = [&record.name, &record.characters, &record.fandom];
    if basic.iter().any(|f| f.to_lowercase().contains(term)) {
        return true;
    }

    if scope == SearchScope::Extended {
        let extra = [
            record.notes.as_deref(),
            record.trope.as_deref(),
            record.dynamic.as_deref(),
        ];
        if extra.iter().flatten().any(|f| f.to_lowercase().contains(term)) {
            return true;
        }
        if record.tags.iter().any(|t| t.to_lowercase().contains(term)) {
            return true;
        }
    }

    false
}

/// Same case folding as search, so a filter and a search agree on "Pokémon".
fn eq_ci(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub favorites: usize,
    pub canon: usize,
    pub fandoms: usize,
    pub fanfics: u64,
    pub art: u64,
}

pub fn stats(records: &[PairingRecord]) -> CatalogStats {
    let fandoms: HashSet<&str> = records
        .iter()
        .map(|r| r.fandom.trim())
        .filter(|f| !f.is_empty())
        .collect();

    CatalogStats {
        total: records.len(),
        favorites: records.iter().filter(|r| r.favorite).count(),
        canon: records.iter().filter(|r| r.status.is_canon()).count(),
        fandoms: fandoms.len(),
        fanfics: records.iter().map(|r| u64::from(r.fanfic_count)).sum(),
        art: records.iter().map(|r| u64::from(r.art_count)).sum(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FandomCount {
    pub fandom: String,
    pub count: usize,
}

/// Distinct fandoms with their pairing counts, alphabetical.
pub fn fandom_counts(records: &[PairingRecord]) -> Vec<FandomCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        let fandom = record.fandom.trim();
        if !fandom.is_empty() {
            *counts.entry(fandom).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(fandom, count)| FandomCount {
            fandom: fandom.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PairingDraft, PairingId};
    use chrono::NaiveDate;

    fn record(id: u64, name: &str, fandom: &str) -> PairingRecord {
        PairingRecord::from_draft(
            PairingId(id),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            PairingDraft::new(name, fandom),
        )
    }

    fn with(mut r: PairingRecord, f: impl FnOnce(&mut PairingRecord)) -> PairingRecord {
        f(&mut r);
        r
    }

    fn names(view: &[PairingRecord]) -> Vec<&str> {
        view.iter().map(|r| r.name.as_str()).collect()
    }

    fn sample() -> Vec<PairingRecord> {
        vec![
            with(record(1, "Stony", "MCU"), |r| {
                r.characters = "Steve Rogers x Tony Stark".into();
                r.status = Status::Fanon;
                r.relationship = "Romantic/Platonic".into();
                r.favorite = true;
                r.media = Some("Film Series".into());
                r.dynamic = Some("Active".into());
            }),
            with(record(2, "Drarry", "Harry Potter"), |r| {
                r.characters = "Harry Potter x Draco Malfoy".into();
                r.status = Status::Fanon;
                r.relationship = "Rivals/Romantic".into();
                r.media = Some("Literature/Books".into());
                r.tags = vec!["enemies to lovers".into()];
            }),
            with(record(3, "Romione", "Harry Potter"), |r| {
                r.characters = "Ron Weasley x Hermione Granger".into();
                r.status = Status::Canon;
                r.relationship = "Romantic".into();
                r.favorite = true;
                r.media = Some("Literature/Books".into());
                r.rating = 4;
                r.notes = Some("bickering".into());
            }),
        ]
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let records = vec![record(1, "Stony", "MCU")];
        assert_eq!(run(&records, &PairingQuery::search("stony")).len(), 1);
        assert!(run(&records, &PairingQuery::search("potter")).is_empty());
    }

    #[test]
    fn search_covers_characters_and_fandom() {
        let records = sample();
        assert_eq!(names(&run(&records, &PairingQuery::search("malfoy"))), vec!["Drarry"]);
        assert_eq!(
            names(&run(&records, &PairingQuery::search("HARRY POTTER"))),
            vec!["Drarry", "Romione"]
        );
    }

    #[test]
    fn empty_search_matches_all() {
        let records = sample();
        assert_eq!(run(&records, &PairingQuery::search("   ")).len(), 3);
        assert_eq!(run(&records, &PairingQuery::default()).len(), 3);
    }

    #[test]
    fn extended_scope_reaches_tags_and_notes() {
        let records = sample();
        let mut query = PairingQuery::search("enemies");
        assert!(run(&records, &query).is_empty());

        query.scope = SearchScope::Extended;
        assert_eq!(names(&run(&records, &query)), vec!["Drarry"]);

        query.search = Some("bicker".into());
        assert_eq!(names(&run(&records, &query)), vec!["Romione"]);
    }

    #[test]
    fn sorts_by_name_ignoring_case() {
        let records = vec![
            record(1, "zeta", "F"),
            record(2, "Alpha", "F"),
            record(3, "beta", "F"),
        ];
        assert_eq!(
            names(&run(&records, &PairingQuery::default())),
            vec!["Alpha", "beta", "zeta"]
        );
    }

    #[test]
    fn sort_is_stable_for_equal_names() {
        let records = vec![
            record(10, "Same", "F"),
            record(11, "b", "F"),
            record(12, "same", "F"),
            record(13, "SAME", "F"),
        ];
        let view = run(&records, &PairingQuery::default());
        let ids: Vec<u64> = view.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec![11, 10, 12, 13]);
    }

    #[test]
    fn stored_order_is_kept_when_unsorted() {
        let records = vec![record(1, "b", "F"), record(2, "a", "F")];
        let query = PairingQuery {
            sort: SortOrder::Stored,
            ..PairingQuery::default()
        };
        assert_eq!(names(&run(&records, &query)), vec!["b", "a"]);
    }

    #[test]
    fn filters_are_conjunctive() {
        let records = sample();
        let filter = PairingFilter {
            favorites_only: true,
            relationship: Some("romantic".into()),
            ..PairingFilter::default()
        };

        for r in &records {
            let expected = r.favorite && r.relationship.to_lowercase().contains("romantic");
            assert_eq!(filter.matches(r), expected, "record {}", r.name);
        }

        let query = PairingQuery {
            filter: PairingFilter {
                status: Some(Status::Canon),
                ..filter
            },
            ..PairingQuery::default()
        };
        assert_eq!(names(&run(&records, &query)), vec!["Romione"]);
    }

    #[test]
    fn filter_and_search_combine() {
        let records = sample();
        let query = PairingQuery {
            search: Some("harry".into()),
            filter: PairingFilter {
                favorites_only: true,
                ..PairingFilter::default()
            },
            ..PairingQuery::default()
        };
        assert_eq!(names(&run(&records, &query)), vec!["Romione"]);
    }

    #[test]
    fn each_axis_filters() {
        let records = sample();
        let by = |filter: PairingFilter| -> Vec<String> {
            let query = PairingQuery {
                filter,
                ..PairingQuery::default()
            };
            let view = run(&records, &query);
            let found: Vec<String> = view.iter().map(|r| r.name.clone()).collect();
            found
        };

        assert_eq!(
            by(PairingFilter {
                dynamic: Some("active".into()),
                ..Default::default()
            }),
            vec!["Stony"]
        );
        assert_eq!(
            by(PairingFilter {
                fandom: Some("harry potter".into()),
                ..Default::default()
            }),
            vec!["Drarry", "Romione"]
        );
        assert_eq!(
            by(PairingFilter {
                media: Some("Film Series".into()),
                ..Default::default()
            }),
            vec!["Stony"]
        );
        assert_eq!(
            by(PairingFilter {
                min_rating: Some(3),
                ..Default::default()
            }),
            vec!["Romione"]
        );
        assert_eq!(
            by(PairingFilter {
                universe: Some(Universe::AlternateUniverse),
                ..Default::default()
            }),
            Vec::<String>::new()
        );
    }

    #[test]
    fn filters_fold_case_like_search() {
        let records = vec![with(record(1, "Pokéshipping", "Pokémon"), |r| {
            r.media = Some("Animé".into());
            r.dynamic = Some("Élan".into());
        })];
        let filter = PairingFilter {
            fandom: Some("POKÉMON".into()),
            media: Some("ANIMÉ".into()),
            dynamic: Some("élan".into()),
            ..PairingFilter::default()
        };
        assert!(filter.matches(&records[0]));
        assert_eq!(run(&records, &PairingQuery::search("POKÉMON")).len(), 1);
    }

    #[test]
    fn view_is_a_copy() {
        let records = sample();
        let mut view = run(&records, &PairingQuery::default());
        view[0].name = "changed".into();
        assert!(records.iter().all(|r| r.name != "changed"));
    }

    #[test]
    fn all_sentinel_disables_axis() {
        assert_eq!(axis(Some("all")), None);
        assert_eq!(axis(Some("  ")), None);
        assert_eq!(axis(None), None);
        assert_eq!(axis(Some(" MCU ")), Some("MCU".to_string()));
    }

    #[test]
    fn stats_count_the_collection() {
        let mut records = sample();
        records[0].fanfic_count = 3;
        records[2].fanfic_count = 4;
        records[1].art_count = 2;

        let s = stats(&records);
        assert_eq!(
            s,
            CatalogStats {
                total: 3,
                favorites: 2,
                canon: 1,
                fandoms: 2,
                fanfics: 7,
                art: 2,
            }
        );
    }

    #[test]
    fn fandom_counts_are_sorted() {
        let counts = fandom_counts(&sample());
        assert_eq!(
            counts,
            vec![
                FandomCount {
                    fandom: "Harry Potter".into(),
                    count: 2
                },
                FandomCount {
                    fandom: "MCU".into(),
                    count: 1
                },
            ]
        );
    }
}
