//! # CLI Behavior
//!
//! This is **one possible UI client** for the clinic library. It is the only
//! place that knows about terminal I/O, exit codes and output formatting.
//!
//! ## Signing In
//!
//! There is no stored session. `--login <EMAIL> --login-password <PASSWORD>`
//! authenticates for the duration of one command:
//!
//! - `clinic --login ana@x.com --login-password p case mine`
//!
//! Without them, the registry commands (`center`, `user`, most of `case`) run
//! anonymously and unrestricted. With an administrator login they are confined
//! to the administrator's center.
//!
//! ## Output
//!
//! `--output text` (default) prints aligned, colored tables and messages.
//! `--output json` prints the raw command result, suitable for scripts.
//!
//! ## Module Structure
//!
//! - `commands`: Context wiring, sign-in and per-command handlers
//! - `render`: Text and JSON output
//! - `setup`: Argument parsing via clap

mod commands;
mod render;
pub mod setup;

pub use commands::run;
