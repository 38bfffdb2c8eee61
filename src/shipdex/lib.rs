//! # Shipdex Architecture
//!
//! Shipdex is a **catalog library for fictional relationship pairings**
//! ("ships") with a command-line client on top. The CLI is one client; the
//! library owns every rule about what a pairing is and how the collection
//! behaves.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (words → selectors → record ids)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per operation, returns CmdResult              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Catalog (catalog.rs) + Query engine (query.rs)             │
//! │  - Owned collection, mirrored to the cache on every change  │
//! │  - Pure filtering, search, sorting and counts               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DataStore trait over named slots                         │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`bootstrap`] runs once per session and decides where the initial
//! collection comes from: the local cache, a remote JSON snapshot, or the
//! built-in seed.
//!
//! ## Ids
//!
//! Every pairing carries a stable numeric id assigned at creation. Listings
//! show that id and every command takes it back, so sorting or filtering a
//! view can never redirect an edit or delete to a different record. Exact
//! names are accepted too, see [`selector`].
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits
//! the process. Recoverable trouble (a failed cache write, an unreachable
//! remote) is logged with `tracing` and turned into warning messages.
//!
//! ## Testing Strategy
//!
//! - **Commands and catalog**: unit tests against `InMemoryStore`, which can
//!   be told to fail writes
//! - **Bootstrap**: stub snapshot sources plus a one-shot local HTTP server
//! - **Stores and config**: `tempfile` directories
//! - **CLI**: `tests/` drive the binary with `assert_cmd`, isolated through
//!   `SHIPDEX_HOME` and `--offline`

pub mod api;
pub mod bootstrap;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod query;
pub mod selector;
pub mod store;
pub mod upload;
