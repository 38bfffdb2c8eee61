//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for every shipdex operation, whatever UI sits on top.
//!
//! It:
//! - **Dispatches** to the matching `commands::*` function
//! - **Normalizes inputs** (command-line words into [`PairingSelector`]s)
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does not print, exit, or hold business rules.
//!
//! ## Generic Over DataStore
//!
//! `ShipdexApi<S: DataStore>` owns one [`Catalog`]:
//! - Production: `ShipdexApi<FileStore>`
//! - Testing: `ShipdexApi<InMemoryStore>`

use crate::bootstrap::{self, BootstrapReport, SnapshotSource};
use crate::catalog::Catalog;
use crate::commands;
use crate::config::ShipdexConfig;
use crate::error::Result;
use crate::query::PairingQuery;
use crate::selector::{parse_selectors, PairingSelector};
use crate::store::DataStore;
use std::path::Path;

pub struct ShipdexApi<S: DataStore> {
    catalog: Catalog<S>,
    paths: commands::ShipdexPaths,
    config: ShipdexConfig,
}

impl<S: DataStore> ShipdexApi<S> {
    pub fn new(store: S, paths: commands::ShipdexPaths, config: ShipdexConfig) -> Self {
        let catalog =
            Catalog::new(store, config.cache_key.clone()).with_id_strategy(config.id_strategy);
        Self {
            catalog,
            paths,
            config,
        }
    }

    /// Populates the catalog for this session using the configured policy.
    pub fn bootstrap(&mut self, remote: Option<&dyn SnapshotSource>) -> BootstrapReport {
        bootstrap::bootstrap(
            &mut self.catalog,
            remote,
            self.config.bootstrap_policy,
            &self.config.legacy_cache_keys,
        )
    }

    pub fn create_pairing(&mut self, patch: commands::PairingPatch) -> Result<commands::CmdResult> {
        commands::create::run(&mut self.catalog, patch, self.config.max_image_bytes)
    }

    pub fn update_pairing(
        &mut self,
        selector: &str,
        patch: commands::PairingPatch,
    ) -> Result<commands::CmdResult> {
        let selector = PairingSelector::parse(selector);
        commands::update::run(
            &mut self.catalog,
            &selector,
            patch,
            self.config.max_image_bytes,
        )
    }

    pub fn get_pairings(&self, query: &PairingQuery) -> Result<commands::CmdResult> {
        commands::get::run(self.catalog.list(), query)
    }

    /// A query carrying the configured search scope and sort order.
    pub fn default_query(&self) -> PairingQuery {
        PairingQuery {
            scope: self.config.search_scope,
            sort: self.config.sort,
            ..PairingQuery::default()
        }
    }

    pub fn view_pairings<I: AsRef<str>>(&self, selectors: &[I]) -> Result<commands::CmdResult> {
        commands::view::run(&self.catalog, &parse_selectors(selectors))
    }

    pub fn toggle_favorites<I: AsRef<str>>(
        &mut self,
        selectors: &[I],
    ) -> Result<commands::CmdResult> {
        commands::favorite::toggle(&mut self.catalog, &parse_selectors(selectors))
    }

    pub fn delete_pairings<I: AsRef<str>>(
        &mut self,
        selectors: &[I],
    ) -> Result<commands::CmdResult> {
        commands::delete::run(&mut self.catalog, &parse_selectors(selectors))
    }

    pub fn export_pairings(&self, output: Option<&Path>) -> Result<commands::CmdResult> {
        commands::export::run(self.catalog.list(), output)
    }

    pub fn import_pairings(&mut self, path: &Path) -> Result<commands::CmdResult> {
        commands::import::run(&mut self.catalog, path)
    }

    pub fn import_snapshot(&mut self, text: &str) -> Result<commands::CmdResult> {
        commands::import::import_snapshot(&mut self.catalog, text)
    }

    pub fn stats(&self) -> Result<commands::CmdResult> {
        commands::stats::run(self.catalog.list())
    }

    pub fn fandoms(&self) -> Result<commands::CmdResult> {
        commands::fandoms::run(self.catalog.list())
    }

    pub fn doctor(&mut self) -> Result<commands::CmdResult> {
        commands::doctor::run(&mut self.catalog)
    }

    pub fn slot_paths(&self) -> Result<commands::CmdResult> {
        commands::paths::run(&self.catalog)
    }

    pub fn config(&self, action: ConfigAction) -> Result<commands::CmdResult> {
        commands::config::run(&self.paths, action)
    }

    pub fn catalog(&self) -> &Catalog<S> {
        &self.catalog
    }

    pub fn settings(&self) -> &ShipdexConfig {
        &self.config
    }

    pub fn paths(&self) -> &commands::ShipdexPaths {
        &self.paths
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{
    CmdMessage, CmdResult, ImageChange, MessageLevel, PairingPatch, ShipdexPaths,
};
pub use crate::query::{PairingFilter, SearchScope, SortOrder};
