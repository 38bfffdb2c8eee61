use crate::bootstrap::BootstrapPolicy;
use crate::catalog::IdStrategy;
use crate::error::{Result, ShipdexError};
use crate::query::{SearchScope, SortOrder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_CACHE_KEY: &str = "fandomShips";
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Keys accepted by `shipdex config`, in display order.
pub const CONFIG_KEYS: &[&str] = &[
    "remote-url",
    "remote-timeout",
    "bootstrap",
    "cache-key",
    "legacy-keys",
    "ids",
    "sort",
    "search",
    "max-image-bytes",
];

/// Configuration for shipdex, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShipdexConfig {
    /// Static JSON snapshot consulted during bootstrap. Unset means offline.
    #[serde(default)]
    pub remote_url: Option<String>,

    #[serde(default = "default_remote_timeout")]
    pub remote_timeout_secs: u64,

    #[serde(default)]
    pub bootstrap_policy: BootstrapPolicy,

    /// Slot the collection is mirrored to.
    #[serde(default = "default_cache_key")]
    pub cache_key: String,

    /// Older slot names read once and migrated when the current slot is empty.
    #[serde(default)]
    pub legacy_cache_keys: Vec<String>,

    #[serde(default)]
    pub id_strategy: IdStrategy,

    #[serde(default)]
    pub sort: SortOrder,

    #[serde(default)]
    pub search_scope: SearchScope,

    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
}

fn default_remote_timeout() -> u64 {
    DEFAULT_REMOTE_TIMEOUT_SECS
}

fn default_cache_key() -> String {
    DEFAULT_CACHE_KEY.to_string()
}

fn default_max_image_bytes() -> u64 {
    DEFAULT_MAX_IMAGE_BYTES
}

impl Default for ShipdexConfig {
    fn default() -> Self {
        Self {
            remote_url: None,
            remote_timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
            bootstrap_policy: BootstrapPolicy::default(),
            cache_key: default_cache_key(),
            legacy_cache_keys: Vec::new(),
            id_strategy: IdStrategy::default(),
            sort: SortOrder::default(),
            search_scope: SearchScope::default(),
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl ShipdexConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ShipdexError::Io)?;
        let config: ShipdexConfig =
            serde_json::from_str(&content).map_err(ShipdexError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ShipdexError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(ShipdexError::Serialization)?;
        fs::write(config_path, content).map_err(ShipdexError::Io)?;
        Ok(())
    }

    /// Current value of a CLI key, rendered as text.
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "remote-url" => self.remote_url.clone().unwrap_or_default(),
            "remote-timeout" => self.remote_timeout_secs.to_string(),
            "bootstrap" => self.bootstrap_policy.as_str().to_string(),
            "cache-key" => self.cache_key.clone(),
            "legacy-keys" => self.legacy_cache_keys.join(","),
            "ids" => self.id_strategy.as_str().to_string(),
            "sort" => self.sort.as_str().to_string(),
            "search" => self.search_scope.as_str().to_string(),
            "max-image-bytes" => self.max_image_bytes.to_string(),
            other => return Err(unknown_key(other)),
        };
        Ok(value)
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "remote-url" => {
                self.remote_url = if value.is_empty() || value == "none" {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "remote-timeout" => self.remote_timeout_secs = parse_number(key, value)?,
            "bootstrap" => {
                self.bootstrap_policy = BootstrapPolicy::parse(value)
                    .ok_or_else(|| invalid_value(key, value, "local-first, remote-first"))?;
            }
            "cache-key" => {
                if value.is_empty() {
                    return Err(invalid_value(key, value, "a non-empty name"));
                }
                self.cache_key = value.to_string();
            }
            "legacy-keys" => {
                self.legacy_cache_keys = value
                    .split(',')
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect();
            }
            "ids" => {
                self.id_strategy = IdStrategy::parse(value)
                    .ok_or_else(|| invalid_value(key, value, "timestamp, sequential"))?;
            }
            "sort" => {
                self.sort =
                    SortOrder::parse(value).ok_or_else(|| invalid_value(key, value, "name, stored"))?;
            }
            "search" => {
                self.search_scope = SearchScope::parse(value)
                    .ok_or_else(|| invalid_value(key, value, "basic, extended"))?;
            }
            "max-image-bytes" => self.max_image_bytes = parse_number(key, value)?,
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }

    pub fn entries(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|k| self.get(k).ok().map(|v| (*k, v)))
            .collect()
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| invalid_value(key, value, "a whole number"))
}

fn unknown_key(key: &str) -> ShipdexError {
    ShipdexError::Config(format!(
        "Unknown config key '{}'. Known keys: {}",
        key,
        CONFIG_KEYS.join(", ")
    ))
}

fn invalid_value(key: &str, value: &str, expected: &str) -> ShipdexError {
    ShipdexError::Config(format!(
        "Invalid value '{}' for {} (expected {})",
        value, key, expected
    ))
}
