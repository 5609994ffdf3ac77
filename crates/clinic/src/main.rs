//! # Clinic CLI
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/clinicapp/`: UI-agnostic library (store, codecs, DAOs, commands, API)
//! - `crates/clinic/`: this CLI, one client of the library
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/clinic/src/cli/)                         │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Sign-in, context wiring and dispatch (commands.rs)       │
//! │  - Colored text or JSON output (render.rs)                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/clinicapp/src/api.rs)                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every invocation is stateless: commands that act on behalf of a user take
//! `--login` and `--login-password` each time.
//!
//! ## Testing Approach
//!
//! - Library behavior is tested inside `clinicapp`.
//! - `render.rs` is tested by feeding canned `CmdResult` values.
//! - `tests/cli_e2e.rs` drives the real binary against a temp data directory.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
