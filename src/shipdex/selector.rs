//! # Selecting pairings
//!
//! Users address pairings either by id (the number shown in listings) or by
//! name. Ids are the stored record ids, never positions in a listing, so a
//! selector keeps pointing at the same record no matter how the view was
//! sorted or filtered.
//!
//! Names match exactly, ignoring case and surrounding whitespace. A name that
//! matches more than one record is rejected with the candidate ids.

use crate::model::PairingId;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingSelector {
    Id(PairingId),
    Name(String),
}

impl PairingSelector {
    /// A bare number is an id; anything else is a name.
    pub fn parse(input: &str) -> Self {
        match input.trim().parse::<PairingId>() {
            Ok(id) => PairingSelector::Id(id),
            Err(_) => PairingSelector::Name(input.trim().to_string()),
        }
    }
}

impl fmt::Display for PairingSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairingSelector::Id(id) => write!(f, "{}", id),
            PairingSelector::Name(name) => write!(f, "\"{}\"", name),
        }
    }
}

/// Turns command-line words into selectors.
///
/// When every word is an id, each one selects a record. Otherwise the words
/// are joined back into a single name, so `shipdex view Harry x Draco` works
/// without quoting.
pub fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Vec<PairingSelector> {
    let ids: Option<Vec<PairingId>> = inputs
        .iter()
        .map(|s| s.as_ref().trim().parse::<PairingId>().ok())
        .collect();

    match ids {
        Some(ids) => ids.into_iter().map(PairingSelector::Id).collect(),
        None => {
            let name = inputs
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<&str>>()
                .join(" ");
            vec![PairingSelector::Name(name.trim().to_string())]
        }
    }
}
