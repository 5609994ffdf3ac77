//! # Clinic Records Architecture
//!
//! `clinicapp` is a **UI-agnostic records library** for medical centers, their
//! users (doctors, patients, administrators) and patient case files. The
//! `clinic` binary is one client of it.
//!
//! Everything is persisted as plain delimited text: one file per entity kind,
//! one entity per line, columns separated by `|`, first column the numeric id.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (clinic crate)                                         │
//! │  - Parses arguments, signs in, renders text or JSON         │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, normalizes inputs             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Reference validation and role rules                      │
//! │  - Returns CmdResult with entities and messages             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  DAOs (dao/) over entity codecs (codec.rs)                  │
//! │  - Typed CRUD, soft delete, search, filtered queries        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Record Store (store/)                                      │
//! │  - Ids, rows and lines over a StorageBackend                │
//! │  - FsBackend (production), MemBackend (testing)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits
//! the process. Diagnostics go through `tracing`; the library does not install
//! a subscriber, so it is silent unless the host opts in.
//!
//! ## Testing Strategy
//!
//! 1. **Store, codecs, DAOs**: unit tests against `MemBackend`.
//! 2. **Commands**: role rules and reference validation, the bulk of the tests.
//! 3. **API**: dispatch and input normalization.
//! 4. **Integration** (`tests/`): the same flows on real files in a temp dir.
//!
//! ## Module Overview
//!
//! - [`api`]: Facade for UI clients
//! - [`commands`]: Business logic
//! - [`session`]: Login and role helpers
//! - [`stats`]: Per-center head counts
//! - [`dao`]: Typed access per entity
//! - [`codec`]: Entity ⇄ row conversion
//! - [`model`]: Center, User, CaseFile and friends
//! - [`store`]: Record store and backends
//! - [`config`]: `clinic.toml` and environment settings
//! - [`init`]: Data directory resolution and wiring
//! - [`error`]: `ClinicError`

pub mod api;
pub mod codec;
pub mod commands;
pub mod config;
pub mod dao;
pub mod error;
pub mod init;
pub mod model;
pub mod session;
pub mod stats;
pub mod store;

#[cfg(test)]
pub mod test_utils;
