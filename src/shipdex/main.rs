//! # Shipdex CLI
//!
//! The binary is intentionally thin: the CLI lives in `cli/`, and this file
//! only invokes `cli::run()` and handles process termination.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (src/shipdex/cli/)                               │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Context wiring, logging, dispatch (commands.rs)          │
//! │  - Terminal rendering (render.rs)                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs) → commands → catalog → store            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors bubble up as `ShipdexError`, are printed as `Error: ...` on stderr
//! and end the process with status 1.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
