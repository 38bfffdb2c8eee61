use crate::api::{ShipdexApi, ShipdexPaths};
use crate::bootstrap::{BootstrapReport, HttpSnapshot, SnapshotSource};
use crate::config::ShipdexConfig;
use crate::error::{Result, ShipdexError};
use crate::store::fs::FileStore;
use directories::ProjectDirs;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

pub const HOME_ENV: &str = "SHIPDEX_HOME";

pub struct ShipdexContext {
    pub api: ShipdexApi<FileStore>,
    pub config: ShipdexConfig,
    pub report: BootstrapReport,
}

/// `$SHIPDEX_HOME` when set, otherwise the platform data directory.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "shipdex", "shipdex")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| ShipdexError::Config("Could not determine a data directory".to_string()))
}

/// The remote snapshot to consult, if one is configured and we're online.
pub fn remote_source(config: &ShipdexConfig, offline: bool) -> Option<HttpSnapshot> {
    if offline {
        debug!("offline, skipping remote snapshot");
        return None;
    }
    config.remote_url.as_ref().map(|url| {
        HttpSnapshot::new(url.clone(), Duration::from_secs(config.remote_timeout_secs))
    })
}

pub fn initialize(offline: bool) -> Result<ShipdexContext> {
    let data_dir = data_dir()?;
    let config = match ShipdexConfig::load(&data_dir) {
        Ok(config) => config,
        Err(e) => {
            warn!(dir = %data_dir.display(), error = %e, "unreadable config, using defaults");
            ShipdexConfig::default()
        }
    };

    let store = FileStore::new(data_dir.clone());
    let paths = ShipdexPaths { data_dir };
    let mut api = ShipdexApi::new(store, paths, config.clone());

    let remote = remote_source(&config, offline);
    let report = api.bootstrap(remote.as_ref().map(|r| r as &dyn SnapshotSource));

    Ok(ShipdexContext {
        api,
        config,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_never_builds_a_remote() {
        let config = ShipdexConfig {
            remote_url: Some("https://example.org/pairings.json".into()),
            ..ShipdexConfig::default()
        };
        assert!(remote_source(&config, true).is_none());
        assert!(remote_source(&config, false).is_some());
    }

    #[test]
    fn no_url_means_no_remote() {
        assert!(remote_source(&ShipdexConfig::default(), false).is_none());
    }
}
