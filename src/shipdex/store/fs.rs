use super::DataStore;
use crate::error::{Result, ShipdexError};
use std::fs;
use std::path::{Path, PathBuf};

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn slot_file(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(ShipdexError::Io)?;
        }
        Ok(())
    }
}

impl DataStore for FileStore {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_file(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(ShipdexError::Io)?;
        Ok(Some(content))
    }

    fn write_slot(&mut self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        let target = self.slot_file(key);

        let tmp = self.root.join(format!(".{}.tmp", sanitize_key(key)));
        fs::write(&tmp, value).map_err(ShipdexError::Io)?;
        fs::rename(&tmp, target).map_err(ShipdexError::Io)?;
        Ok(())
    }

    fn remove_slot(&mut self, key: &str) -> Result<()> {
        let path = self.slot_file(key);
        if path.exists() {
            fs::remove_file(path).map_err(ShipdexError::Io)?;
        }
        Ok(())
    }

    fn slot_path(&self, key: &str) -> Option<PathBuf> {
        Some(self.slot_file(key))
    }
}

/// Keys become file names, so anything but `[A-Za-z0-9_-]` is replaced.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_slot_reads_as_none() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("data"));
        assert!(store.read_slot("fandomShips").unwrap().is_none());
    }

    #[test]
    fn write_creates_dir_and_reads_back() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::new(temp.path().join("nested").join("data"));
        store.write_slot("fandomShips", "[]").unwrap();

        assert_eq!(store.read_slot("fandomShips").unwrap().as_deref(), Some("[]"));
        assert!(temp
            .path()
            .join("nested/data/fandomShips.json")
            .exists());
    }

    #[test]
    fn write_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::new(temp.path().to_path_buf());
        store.write_slot("k", "one").unwrap();
        store.write_slot("k", "two").unwrap();

        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
        assert_eq!(store.read_slot("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn remove_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::new(temp.path().to_path_buf());
        store.write_slot("k", "v").unwrap();
        store.remove_slot("k").unwrap();
        store.remove_slot("k").unwrap();
        assert!(store.read_slot("k").unwrap().is_none());
    }

    #[test]
    fn keys_are_sanitized() {
        assert_eq!(sanitize_key("../evil key"), "___evil_key");
        assert_eq!(sanitize_key("fandomShips"), "fandomShips");
    }
}
