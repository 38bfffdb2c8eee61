//! # Data Model
//!
//! A catalog holds [`PairingRecord`]s. The JSON shape is the one the browser
//! catalog used (`name`, `characters`, `addedDate`, ...), so snapshots move
//! freely between the two.
//!
//! Reading is lenient, writing is canonical:
//! - `"NA"` and empty strings in `dynamic`/`trope` become `None`
//! - legacy `char1`/`char2` pairs are folded into `characters`
//! - `rating` is clamped into `0..=5`, negative counters become 0
//! - `tags` may be a comma-delimited string or an array
//! - `id` may be a number, a numeric string or an integral float; a record
//!   without a usable id is read as [`PairingId::UNASSIGNED`]
//!
//! Unset optionals are written back as `null`.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const MAX_RATING: u8 = 5;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PairingId(pub u64);

impl PairingId {
    /// Placeholder for records read without a usable id. The catalog replaces
    /// it with a fresh id when the records are loaded.
    pub const UNASSIGNED: PairingId = PairingId(0);

    pub fn is_assigned(&self) -> bool {
        *self != Self::UNASSIGNED
    }
}

impl fmt::Display for PairingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PairingId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(PairingId)
    }
}

/// Whether the pairing lives in the source's own setting or in an AU.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Universe {
    #[default]
    InUniverse,
    AlternateUniverse,
    Other(String),
}

impl Universe {
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "in-universe" | "in universe" | "canon universe" => Universe::InUniverse,
            "au" | "alternate universe" | "alternate-universe" | "alternate universe (au)" => {
                Universe::AlternateUniverse
            }
            _ => Universe::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Universe::InUniverse => "In-universe",
            Universe::AlternateUniverse => "Alternate Universe",
            Universe::Other(s) => s,
        }
    }
}

impl From<String> for Universe {
    fn from(s: String) -> Self {
        Universe::parse(&s)
    }
}

impl From<Universe> for String {
    fn from(u: Universe) -> Self {
        u.as_str().to_string()
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognition level of a pairing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Canon,
    #[default]
    Fanon,
    Otp,
    Other(String),
}

impl Status {
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "canon" => Status::Canon,
            "fanon" => Status::Fanon,
            "otp" => Status::Otp,
            _ => Status::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Status::Canon => "Canon",
            Status::Fanon => "Fanon",
            Status::Otp => "OTP",
            Status::Other(s) => s,
        }
    }

    pub fn is_canon(&self) -> bool {
        matches!(self, Status::Canon)
    }
}

impl From<String> for Status {
    fn from(s: String) -> Self {
        Status::parse(&s)
    }
}

impl From<Status> for String {
    fn from(s: Status) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a pairing's picture comes from. Never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageSource {
    DataUri(String),
    Url(String),
}

impl ImageSource {
    pub fn as_str(&self) -> &str {
        match self {
            ImageSource::DataUri(s) | ImageSource::Url(s) => s,
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, ImageSource::DataUri(_))
    }
}

impl From<String> for ImageSource {
    fn from(s: String) -> Self {
        if s.starts_with("data:") {
            ImageSource::DataUri(s)
        } else {
            ImageSource::Url(s)
        }
    }
}

impl From<ImageSource> for String {
    fn from(i: ImageSource) -> Self {
        match i {
            ImageSource::DataUri(s) | ImageSource::Url(s) => s,
        }
    }
}

/// The mutable part of a pairing: everything except `id` and `added_date`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PairingDraft {
    pub name: String,
    pub characters: String,
    pub fandom: String,
    pub universe: Universe,
    pub status: Status,
    pub relationship: String,
    pub year_started: Option<String>,
    pub media: Option<String>,
    pub dynamic: Option<String>,
    pub trope: Option<String>,
    pub tags: Vec<String>,
    pub fanfic_count: u32,
    pub art_count: u32,
    pub rating: u8,
    pub notes: Option<String>,
    pub favorite: bool,
    pub image: Option<ImageSource>,
}

impl PairingDraft {
    pub fn new(name: impl Into<String>, fandom: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fandom: fandom.into(),
            ..Self::default()
        }
    }
}

impl From<&PairingRecord> for PairingDraft {
    fn from(r: &PairingRecord) -> Self {
        Self {
            name: r.name.clone(),
            characters: r.characters.clone(),
            fandom: r.fandom.clone(),
            universe: r.universe.clone(),
            status: r.status.clone(),
            relationship: r.relationship.clone(),
            year_started: r.year_started.clone(),
            media: r.media.clone(),
            dynamic: r.dynamic.clone(),
            trope: r.trope.clone(),
            tags: r.tags.clone(),
            fanfic_count: r.fanfic_count,
            art_count: r.art_count,
            rating: r.rating,
            notes: r.notes.clone(),
            favorite: r.favorite,
            image: r.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RecordRepr")]
pub struct PairingRecord {
    pub id: PairingId,
    pub name: String,
    pub characters: String,
    pub fandom: String,
    pub universe: Universe,
    pub status: Status,
    pub relationship: String,
    pub year_started: Option<String>,
    pub media: Option<String>,
    pub dynamic: Option<String>,
    pub trope: Option<String>,
    #[serde(serialize_with = "serialize_tags")]
    pub tags: Vec<String>,
    pub fanfic_count: u32,
    pub art_count: u32,
    pub rating: u8,
    pub notes: Option<String>,
    pub favorite: bool,
    pub image: Option<ImageSource>,
    pub added_date: NaiveDate,
}

impl PairingRecord {
    pub fn from_draft(id: PairingId, added_date: NaiveDate, draft: PairingDraft) -> Self {
        let mut record = Self {
            id,
            name: String::new(),
            characters: String::new(),
            fandom: String::new(),
            universe: Universe::default(),
            status: Status::default(),
            relationship: String::new(),
            year_started: None,
            media: None,
            dynamic: None,
            trope: None,
            tags: Vec::new(),
            fanfic_count: 0,
            art_count: 0,
            rating: 0,
            notes: None,
            favorite: false,
            image: None,
            added_date,
        };
        record.apply(draft);
        record
    }

    /// Replaces every mutable field. `id` and `added_date` are untouched.
    pub fn apply(&mut self, draft: PairingDraft) {
        self.name = draft.name;
        self.characters = draft.characters;
        self.fandom = draft.fandom;
        self.universe = draft.universe;
        self.status = draft.status;
        self.relationship = draft.relationship;
        self.year_started = non_empty(draft.year_started);
        self.media = non_empty(draft.media);
        self.dynamic = not_applicable(draft.dynamic);
        self.trope = not_applicable(draft.trope);
        // commas are the wire separator, so they can't live inside a tag
        self.tags = draft.tags.iter().flat_map(|t| split_tags(t)).collect();
        self.fanfic_count = draft.fanfic_count;
        self.art_count = draft.art_count;
        self.rating = draft.rating.min(MAX_RATING);
        self.notes = non_empty(draft.notes);
        self.favorite = draft.favorite;
        self.image = draft.image;
    }

    /// Character names, split out of the free-text `characters` field.
    pub fn participants(&self) -> Vec<&str> {
        self.characters
            .split(" x ")
            .flat_map(|part| part.split(" X "))
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }

    /// Label used in listings: the name, or the characters when unnamed.
    pub fn label(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.characters
        } else {
            &self.name
        }
    }
}

/// The seed shown on a first run with nothing cached and nothing remote.
pub fn seed_records() -> Vec<PairingRecord> {
    let draft = PairingDraft {
        name: "Stony".into(),
        characters: "Steve Rogers x Tony Stark".into(),
        fandom: "Marvel Cinematic Universe".into(),
        universe: Universe::InUniverse,
        status: Status::Fanon,
        relationship: "Romantic/Platonic".into(),
        media: Some("Film Series".into()),
        dynamic: Some("Opposing Energies".into()),
        trope: Some("Friends to Lovers".into()),
        notes: Some("The loyalty and history between them gets me every time".into()),
        favorite: true,
        ..PairingDraft::default()
    };
    let added = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap_or_else(|| Utc::now().date_naive());
    vec![PairingRecord::from_draft(PairingId(1), added, draft)]
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn not_applicable(value: Option<String>) -> Option<String> {
    non_empty(value).filter(|v| !v.eq_ignore_ascii_case("na"))
}

fn serialize_tags<S: Serializer>(tags: &[String], serializer: S) -> Result<S::Ok, S::Error> {
    if tags.is_empty() {
        serializer.serialize_none()
    } else {
        serializer.serialize_str(&tags.join(", "))
    }
}

pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Wire shape accepted on read.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordRepr {
    #[serde(default, deserialize_with = "loose_id")]
    id: PairingId,
    #[serde(default, deserialize_with = "loose_text")]
    name: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    characters: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    char1: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    char2: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    fandom: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    universe: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    status: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    relationship: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    year_started: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    media: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    dynamic: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    trope: Option<String>,
    #[serde(default)]
    tags: Option<Value>,
    #[serde(default, deserialize_with = "loose_count")]
    fanfic_count: u32,
    #[serde(default, deserialize_with = "loose_count")]
    art_count: u32,
    #[serde(default, deserialize_with = "loose_count")]
    rating: u32,
    #[serde(default, deserialize_with = "loose_text")]
    notes: Option<String>,
    #[serde(default)]
    favorite: Option<bool>,
    #[serde(default, deserialize_with = "loose_text")]
    image: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    added_date: Option<String>,
}

impl From<RecordRepr> for PairingRecord {
    fn from(r: RecordRepr) -> Self {
        let characters = match (r.characters, r.char1, r.char2) {
            (Some(c), _, _) => c,
            (None, Some(a), Some(b)) => format!("{} x {}", a, b),
            (None, Some(a), None) | (None, None, Some(a)) => a,
            (None, None, None) => String::new(),
        };

        let tags = match r.tags {
            Some(Value::String(s)) => split_tags(&s),
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };

        let added_date = r
            .added_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.get(..10).unwrap_or(d), "%Y-%m-%d").ok())
            .unwrap_or_else(|| Utc::now().date_naive());

        let draft = PairingDraft {
            name: r.name.unwrap_or_default(),
            characters,
            fandom: r.fandom.unwrap_or_default(),
            universe: r.universe.map(|u| Universe::parse(&u)).unwrap_or_default(),
            status: r.status.map(|s| Status::parse(&s)).unwrap_or_default(),
            relationship: r.relationship.unwrap_or_default(),
            year_started: r.year_started,
            media: r.media,
            dynamic: r.dynamic,
            trope: r.trope,
            tags,
            fanfic_count: r.fanfic_count,
            art_count: r.art_count,
            rating: r.rating.min(MAX_RATING as u32) as u8,
            notes: r.notes,
            favorite: r.favorite.unwrap_or(false),
            image: r.image.filter(|i| !i.trim().is_empty()).map(ImageSource::from),
        };

        PairingRecord::from_draft(r.id, added_date, draft)
    }
}

fn loose_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Ids may arrive as numbers, numeric strings or integral floats. Anything
/// else leaves the record unassigned.
fn loose_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PairingId, D::Error> {
    let id = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().and_then(integral)),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    };
    Ok(id.map(PairingId).unwrap_or(PairingId::UNASSIGNED))
}

fn integral(n: f64) -> Option<u64> {
    (n.is_finite() && n >= 1.0 && n.fract() == 0.0 && n < u64::MAX as f64).then(|| n as u64)
}

fn loose_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let n = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(n.round().clamp(0.0, u32::MAX as f64) as u32)
}
