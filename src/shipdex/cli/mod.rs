//! # CLI Behavior
//!
//! This is **one possible UI client** for shipdex, not the application
//! itself. It is the only place that knows about terminal I/O, exit codes
//! and output formatting.
//!
//! ### Naked Execution (`shipdex`)
//!
//! Running `shipdex` with no arguments defaults to `shipdex list`.
//!
//! ### Addressing pairings
//!
//! Listings print each pairing's id. Commands that take pairings accept those
//! ids, or an exact name: `shipdex fav Stony`, `shipdex view Harry x Draco`.
//!
//! ### Startup
//!
//! Every invocation loads the catalog once: the local cache, or a configured
//! remote snapshot, or the seed. `--offline` skips the remote.
//!
//! ## Module Structure
//!
//! - `commands`: per-command handlers that call the API and print results
//! - `render`: output formatting (rows, detail cards, stats, messages)
//! - `setup`: argument parsing via clap, help text

mod commands;
mod render;
pub mod setup;

pub use commands::run;
