use crate::config::ShipdexConfig;
use crate::error::Result;
use crate::model::{ImageSource, PairingDraft, PairingRecord, Status, Universe};
use crate::query::{CatalogStats, FandomCount};
use crate::upload;
use std::path::PathBuf;

pub mod config;
pub mod create;
pub mod delete;
pub mod doctor;
pub mod export;
pub mod fandoms;
pub mod favorite;
pub mod get;
pub mod helpers;
pub mod import;
pub mod paths;
pub mod stats;
pub mod update;
pub mod view;

/// Where shipdex keeps its files.
#[derive(Debug, Clone)]
pub struct ShipdexPaths {
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_records: Vec<PairingRecord>,
    pub listed_records: Vec<PairingRecord>,
    pub stats: Option<CatalogStats>,
    pub fandoms: Vec<FandomCount>,
    /// Exported snapshot text, when it was not written to a file.
    pub snapshot: Option<String>,
    pub slot_paths: Vec<PathBuf>,
    pub config: Option<ShipdexConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_records(mut self, records: Vec<PairingRecord>) -> Self {
        self.affected_records = records;
        self
    }

    pub fn with_listed_records(mut self, records: Vec<PairingRecord>) -> Self {
        self.listed_records = records;
        self
    }

    pub fn with_stats(mut self, stats: CatalogStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_fandoms(mut self, fandoms: Vec<FandomCount>) -> Self {
        self.fandoms = fandoms;
        self
    }

    pub fn with_snapshot(mut self, snapshot: String) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    pub fn with_slot_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.slot_paths = paths;
        self
    }

    pub fn with_config(mut self, config: ShipdexConfig) -> Self {
        self.config = Some(config);
        self
    }
}

/// What to do with a pairing's picture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageChange {
    #[default]
    Keep,
    Clear,
    File(PathBuf),
    Url(String),
}

/// Field changes for create and edit. `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct PairingPatch {
    pub name: Option<String>,
    pub characters: Option<String>,
    pub fandom: Option<String>,
    pub universe: Option<Universe>,
    pub status: Option<Status>,
    pub relationship: Option<String>,
    pub year_started: Option<String>,
    pub media: Option<String>,
    pub dynamic: Option<String>,
    pub trope: Option<String>,
    pub tags: Option<Vec<String>>,
    pub fanfic_count: Option<u32>,
    pub art_count: Option<u32>,
    pub rating: Option<u8>,
    pub notes: Option<String>,
    pub favorite: Option<bool>,
    pub image: ImageChange,
}

impl PairingPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.characters.is_none()
            && self.fandom.is_none()
            && self.universe.is_none()
            && self.status.is_none()
            && self.relationship.is_none()
            && self.year_started.is_none()
            && self.media.is_none()
            && self.dynamic.is_none()
            && self.trope.is_none()
            && self.tags.is_none()
            && self.fanfic_count.is_none()
            && self.art_count.is_none()
            && self.rating.is_none()
            && self.notes.is_none()
            && self.favorite.is_none()
            && self.image == ImageChange::Keep
    }

    /// Applies the patch on top of `base`.
    ///
    /// The image is read first, so a rejected upload fails before anything
    /// else is touched.
    pub fn onto(self, mut base: PairingDraft, max_image_bytes: u64) -> Result<PairingDraft> {
        let image: Option<Option<ImageSource>> = match &self.image {
            ImageChange::Keep => None,
            ImageChange::Clear => Some(None),
            ImageChange::File(path) => Some(Some(upload::from_file(path, max_image_bytes)?)),
            ImageChange::Url(url) => Some(Some(upload::from_url(url)?)),
        };

        if let Some(v) = self.name {
            base.name = v;
        }
        if let Some(v) = self.characters {
            base.characters = v;
        }
        if let Some(v) = self.fandom {
            base.fandom = v;
        }
        if let Some(v) = self.universe {
            base.universe = v;
        }
        if let Some(v) = self.status {
            base.status = v;
        }
        if let Some(v) = self.relationship {
            base.relationship = v;
        }
        if let Some(v) = self.year_started {
            base.year_started = Some(v);
        }
        if let Some(v) = self.media {
            base.media = Some(v);
        }
        if let Some(v) = self.dynamic {
            base.dynamic = Some(v);
        }
        if let Some(v) = self.trope {
            base.trope = Some(v);
        }
        if let Some(v) = self.tags {
            base.tags = v;
        }
        if let Some(v) = self.fanfic_count {
            base.fanfic_count = v;
        }
        if let Some(v) = self.art_count {
            base.art_count = v;
        }
        if let Some(v) = self.rating {
            base.rating = v;
        }
        if let Some(v) = self.notes {
            base.notes = Some(v);
        }
        if let Some(v) = self.favorite {
            base.favorite = v;
        }
        if let Some(v) = image {
            base.image = v;
        }
        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn empty_patch_keeps_draft() {
        let base = PairingDraft::new("Stony", "MCU");
        assert!(PairingPatch::default().is_empty());
        let out = PairingPatch::default().onto(base.clone(), 1024).unwrap();
        assert_eq!(out, base);
    }

    #[test]
    fn patch_overrides_only_given_fields() {
        let mut base = PairingDraft::new("Stony", "MCU");
        base.notes = Some("keep me".into());
        let patch = PairingPatch {
            favorite: Some(true),
            rating: Some(4),
            ..PairingPatch::default()
        };
        let out = patch.onto(base, 1024).unwrap();
        assert!(out.favorite);
        assert_eq!(out.rating, 4);
        assert_eq!(out.notes.as_deref(), Some("keep me"));
        assert_eq!(out.name, "Stony");
    }

    #[test]
    fn clear_removes_image() {
        let mut base = PairingDraft::new("A", "F");
        base.image = Some(ImageSource::Url("https://x.test/a.png".into()));
        let patch = PairingPatch {
            image: ImageChange::Clear,
            ..PairingPatch::default()
        };
        assert_eq!(patch.onto(base, 1024).unwrap().image, None);
    }

    #[test]
    fn rejected_image_fails_whole_patch() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "hi").unwrap();

        let patch = PairingPatch {
            name: Some("Renamed".into()),
            image: ImageChange::File(path),
            ..PairingPatch::default()
        };
        assert!(patch.onto(PairingDraft::new("A", "F"), 1024).is_err());
    }
}
